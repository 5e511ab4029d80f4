//! `autobackup backup` — snapshot the configured directories.
//!
//! ```text
//! restic -r <url> backup <dir>... [--exclude <path>]... --password-file <pw> --tag autobackup
//! ```
//!
//! restic's own progress output goes straight to the terminal.

use std::{io::Write, path::Path};

use super::{password_file_args, utf8_path};
use crate::{
    config::{self, RepoSpec, Settings, SourceSpec},
    error::Result,
    runner::{Capture, Executor, Invocation, restic_base},
    ui::Reporter,
};

/// Load both configs and run `restic backup`.
///
/// Any failure, including restic exiting non-zero, is returned as an error.
pub fn run<E: Executor, W: Write>(
    settings: &Settings,
    executor: &mut E,
    reporter: &mut Reporter<W>,
    repo_config: &Path,
    password_file: &Path,
    source_config: &Path,
) -> Result<()> {
    let source = config::load_source_spec(source_config)?;
    let repo = config::load_repo_spec(repo_config)?;

    tracing::info!("Backing up files to {}", repo.url);
    for dir in &source.dirs {
        tracing::info!("- {dir}");
    }

    let password_file = utf8_path(password_file)?;
    let invocation = build_backup_args(settings, &repo, password_file, &source);
    let result = executor.execute(&invocation, Capture::Inherit);
    reporter.stage("Backup", result.is_ok())?;
    result.map(drop)
}

/// Arguments for `restic backup …`, directories and excludes in config order.
pub fn build_backup_args(
    settings: &Settings,
    repo: &RepoSpec,
    password_file: &str,
    source: &SourceSpec,
) -> Invocation {
    let mut cmd = restic_base(settings, repo);
    cmd.args.push("backup".into());
    cmd.args.extend(source.dirs.iter().cloned());
    for path in &source.exclude {
        cmd.args.extend(["--exclude".into(), path.clone()]);
    }
    cmd.args.extend(password_file_args(password_file));
    cmd.args.extend(["--tag".into(), settings.restic.tag.clone()]);
    cmd
}

// ─── Tests ────────────────────────────────────────────────────────────────────
