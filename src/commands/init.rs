//! `autobackup init` — create the repository.
//!
//! ```text
//! restic -r <url> init --password-file <pw>
//! ```

use std::{io::Write, path::Path};

use super::{password_file_args, utf8_path};
use crate::{
    config::{self, RepoSpec, Settings},
    error::Result,
    runner::{Capture, Executor, Invocation, restic_base},
    ui::Reporter,
};

/// Load the repo config and run `restic init`.
pub fn run<E: Executor, W: Write>(
    settings: &Settings,
    executor: &mut E,
    reporter: &mut Reporter<W>,
    repo_config: &Path,
    password_file: &Path,
) -> Result<()> {
    let repo = config::load_repo_spec(repo_config)?;
    let password_file = utf8_path(password_file)?;

    let result = executor.execute(
        &build_init_args(settings, &repo, password_file),
        Capture::Inherit,
    );
    reporter.stage("Init", result.is_ok())?;
    result.map(drop)
}

pub fn build_init_args(settings: &Settings, repo: &RepoSpec, password_file: &str) -> Invocation {
    let mut cmd = restic_base(settings, repo);
    cmd.args.push("init".into());
    cmd.args.extend(password_file_args(password_file));
    cmd
}
