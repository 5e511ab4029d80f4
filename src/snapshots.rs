//! Snapshot freshness evaluation.
//!
//! Consumes the output of
//!
//! ```text
//! restic snapshots --group-by path --tag autobackup --json
//! ```
//!
//! which is a JSON array of groups, each with the path set that defines it
//! and the snapshots taken for it.  A group is *fresh* when at least
//! [`Policy::min_snapshots`] of its snapshots are strictly newer than
//! `now - window`.

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use serde::Deserialize;

use crate::{
    config::VerifySettings,
    error::{Error, Result},
};

// ─── Listing types ────────────────────────────────────────────────────────────

/// Snapshots sharing one backed-up path set.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SnapshotGroup {
    pub group_key: GroupKey,
    pub snapshots: Vec<Snapshot>,
}

/// The grouping criteria restic reports.  Only `paths` is used.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GroupKey {
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub time: DateTime<FixedOffset>,
}

/// Parse `restic snapshots --group-by … --json` output.
///
/// restic prints `null` when no snapshot matches, which yields an empty
/// list.  Empty output means restic did not answer and is an error, as is
/// anything else that is not a well-formed list of groups, including a
/// snapshot without a parseable `time`.
pub fn parse_listing(text: &str) -> Result<Vec<SnapshotGroup>> {
    if text.trim().is_empty() {
        return Err(Error::parse("snapshot listing", "empty output"));
    }
    let groups: Option<Vec<SnapshotGroup>> =
        serde_json::from_str(text).map_err(|e| Error::parse("snapshot listing", e))?;
    Ok(groups.unwrap_or_default())
}

// ─── Policy ───────────────────────────────────────────────────────────────────

/// How many snapshots a group needs, and how far back they may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    pub min_snapshots: usize,
    pub window: TimeDelta,
}

impl Default for Policy {
    fn default() -> Self {
        Self::from(&VerifySettings::default())
    }
}

impl From<&VerifySettings> for Policy {
    fn from(settings: &VerifySettings) -> Self {
        Self {
            min_snapshots: settings.min_snapshots,
            window: TimeDelta::days(i64::from(settings.window_days)),
        }
    }
}

// ─── Evaluation ───────────────────────────────────────────────────────────────

/// Verdict for one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupReport {
    pub paths: Vec<String>,
    /// Snapshots strictly newer than `now - window`.
    pub recent: usize,
    pub passed: bool,
}

/// Evaluate every group against `policy` as of `now`.
///
/// No group is skipped: the result has one report per input group, in
/// input order.  A window reaching past the earliest representable instant
/// counts every snapshot.
pub fn evaluate(groups: &[SnapshotGroup], policy: &Policy, now: DateTime<Utc>) -> Vec<GroupReport> {
    let cutoff = now
        .checked_sub_signed(policy.window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    groups
        .iter()
        .map(|group| {
            let recent = group
                .snapshots
                .iter()
                .filter(|s| s.time > cutoff)
                .count();
            GroupReport {
                paths: group.group_key.paths.clone(),
                recent,
                passed: recent >= policy.min_snapshots,
            }
        })
        .collect()
}

/// `true` when every group passed.  Vacuously true for no groups.
pub fn all_passed(reports: &[GroupReport]) -> bool {
    reports.iter().all(|r| r.passed)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
