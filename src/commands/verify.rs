//! `autobackup verify` — repository health and snapshot cadence.
//!
//! # Stages
//!
//! | # | Stage             | Command                                                          |
//! |---|-------------------|------------------------------------------------------------------|
//! | 1 | Consistency check | `restic -r URL check --read-data-subset=5% --password-file PW`   |
//! | 2 | Snapshot listing  | `restic -r URL snapshots --group-by path --password-file PW --tag autobackup --json` |
//!
//! A failed consistency check is reported and ends the operation without
//! running stage 2.  Every group from stage 2 is evaluated and printed even
//! after one has failed.

use std::{io::Write, path::Path};

use chrono::{DateTime, Utc};

use super::{password_file_args, utf8_path};
use crate::{
    config::{self, RepoSpec, Settings},
    error::Result,
    runner::{Capture, Executor, Invocation, restic_base},
    snapshots::{self, GroupReport, Policy},
    ui::Reporter,
};

/// How a verify run ended, when it ended without an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// `restic check` failed; snapshots were not listed.
    ConsistencyFailed,
    /// At least one group is below the minimum.
    Insufficient(Vec<GroupReport>),
    /// Every group met the minimum.
    Healthy(Vec<GroupReport>),
}

impl VerifyOutcome {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Healthy(_))
    }
}

/// Run both stages.
///
/// `now` is called once, after the listing has been read, to fix the end of
/// the evaluation window.
///
/// Errors are reserved for conditions that make the result meaningless:
/// unreadable config, a failing `restic snapshots`, or malformed listing
/// output.
pub fn run<E, W, F>(
    settings: &Settings,
    executor: &mut E,
    reporter: &mut Reporter<W>,
    repo_config: &Path,
    password_file: &Path,
    now: F,
) -> Result<VerifyOutcome>
where
    E: Executor,
    W: Write,
    F: FnOnce() -> DateTime<Utc>,
{
    let repo = config::load_repo_spec(repo_config)?;
    let password_file = utf8_path(password_file)?;

    // 1. Consistency check
    let check = build_check_args(settings, &repo, password_file);
    match executor.execute(&check, Capture::Inherit) {
        Ok(_) => {
            tracing::info!("Repo consistency OK");
            reporter.stage("Consistency check", true)?;
        },
        Err(e) if e.is_execution() => {
            tracing::error!("Repo consistency check failed: {e}");
            reporter.stage("Consistency check", false)?;
            reporter.summary(false, "Repository consistency check failed.")?;
            return Ok(VerifyOutcome::ConsistencyFailed);
        },
        Err(e) => return Err(e),
    }

    // 2. Snapshot cadence
    let listing = executor.execute(
        &build_listing_args(settings, &repo, password_file),
        Capture::Stdout,
    )?;
    let groups = snapshots::parse_listing(&listing)?;
    if groups.is_empty() {
        tracing::warn!(
            "No snapshots tagged `{}` found in {}",
            settings.restic.tag,
            repo.url
        );
    }

    let policy = Policy::from(&settings.verify);
    let reports = snapshots::evaluate(&groups, &policy, now());

    for report in &reports {
        tracing::debug!(
            paths = %report.paths.join(" "),
            recent = report.recent,
            passed = report.passed,
            "evaluated snapshot group"
        );
        reporter.group(report, &policy)?;
    }

    if snapshots::all_passed(&reports) {
        reporter.summary(true, "All snapshot groups are fresh.")?;
        Ok(VerifyOutcome::Healthy(reports))
    } else {
        tracing::error!("Insufficient number of snapshots!");
        reporter.summary(false, "Not enough snapshots taken!")?;
        Ok(VerifyOutcome::Insufficient(reports))
    }
}

/// Arguments for `restic check --read-data-subset=…`.
pub fn build_check_args(settings: &Settings, repo: &RepoSpec, password_file: &str) -> Invocation {
    let mut cmd = restic_base(settings, repo);
    cmd.args.extend([
        "check".into(),
        format!("--read-data-subset={}", settings.restic.read_data_subset),
    ]);
    cmd.args.extend(password_file_args(password_file));
    cmd
}

/// Arguments for the grouped, tag-filtered JSON snapshot listing.
pub fn build_listing_args(settings: &Settings, repo: &RepoSpec, password_file: &str) -> Invocation {
    let mut cmd = restic_base(settings, repo);
    cmd.args.extend([
        "snapshots".into(),
        "--group-by".into(),
        "path".into(),
    ]);
    cmd.args.extend(password_file_args(password_file));
    cmd.args.extend([
        "--tag".into(),
        settings.restic.tag.clone(),
        "--json".into(),
    ]);
    cmd
}

// ─── Tests ────────────────────────────────────────────────────────────────────
