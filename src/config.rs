//! Configuration types and loading logic.
//!
//! Three documents feed every run:
//!
//! | Document          | Format | Location                                | Required |
//! |-------------------|--------|-----------------------------------------|----------|
//! | Source config     | JSON   | CLI argument (`backup` only)            | yes      |
//! | Repository config | JSON   | CLI argument                            | yes      |
//! | Tool settings     | TOML   | `<config_dir>/autobackup/config.toml`   | no       |
//!
//! # Source config
//!
//! ```json
//! { "dirs": ["/home/alice", "/etc"], "exclude": ["/home/alice/.cache"] }
//! ```
//!
//! # Repository config
//!
//! ```json
//! {
//!     "url": "s3:s3.amazonaws.com/bucket_name",
//!     "env": { "AWS_ACCESS_KEY_ID": "id", "AWS_SECRET_ACCESS_KEY": "key" }
//! }
//! ```
//!
//! # Tool settings
//!
//! ```toml
//! [restic]
//! binary           = "restic"
//! tag              = "autobackup"
//! read_data_subset = "5%"
//!
//! [verify]
//! min_snapshots = 5
//! window_days   = 7
//! ```

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::error::Category;

use crate::error::{Error, Result};

// ─── Source config ────────────────────────────────────────────────────────────

/// What to back up and what to leave out.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SourceSpec {
    /// Directories passed to `restic backup`, in order.  Must not be empty.
    pub dirs: Vec<String>,

    /// Paths forwarded one-by-one as `--exclude <path>`.
    #[serde(default)]
    pub exclude: Vec<String>,
}

// ─── Repository config ────────────────────────────────────────────────────────

/// Where the repository lives and how to reach it.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RepoSpec {
    /// restic repository URL (`s3:…`, `sftp:…`, `b2:…`, or a local path).
    pub url: String,

    /// Extra environment for every restic invocation, typically backend
    /// credentials.  Overrides inherited variables of the same name.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

// ─── Tool settings ────────────────────────────────────────────────────────────

/// Optional per-user settings.  Every field defaults to the stock behaviour.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub restic: ResticSettings,

    #[serde(default)]
    pub verify: VerifySettings,
}

/// How restic itself is invoked.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ResticSettings {
    /// Executable name (looked up on `PATH`) or absolute path.
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Tag attached by `backup` and used to filter snapshots in `verify`.
    #[serde(default = "default_tag")]
    pub tag: String,

    /// Fraction of pack data read by `restic check`.
    #[serde(default = "default_read_data_subset")]
    pub read_data_subset: String,
}

impl Default for ResticSettings {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            tag: default_tag(),
            read_data_subset: default_read_data_subset(),
        }
    }
}

/// Snapshot cadence enforced by `verify`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct VerifySettings {
    /// Minimum snapshots per group inside the window (inclusive).
    #[serde(default = "default_min_snapshots")]
    pub min_snapshots: usize,

    /// Length of the trailing window, in days.
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

impl Default for VerifySettings {
    fn default() -> Self {
        Self {
            min_snapshots: default_min_snapshots(),
            window_days: default_window_days(),
        }
    }
}

// ─── Defaults ─────────────────────────────────────────────────────────────────

pub fn default_binary() -> String {
    "restic".into()
}

pub fn default_tag() -> String {
    "autobackup".into()
}

pub fn default_read_data_subset() -> String {
    "5%".into()
}

pub const fn default_min_snapshots() -> usize {
    5
}

pub const fn default_window_days() -> u32 {
    7
}

/// Longest accepted `window_days`: a century.
pub const MAX_WINDOW_DAYS: u32 = 36_500;

// ─── Loaders ──────────────────────────────────────────────────────────────────

/// Read and validate a source config.
pub fn load_source_spec(path: &Path) -> Result<SourceSpec> {
    tracing::info!("Reading config: {}", path.display());
    let spec: SourceSpec = read_json(path)?;
    if spec.dirs.is_empty() {
        return Err(Error::config(path, "`dirs` must list at least one directory"));
    }
    Ok(spec)
}

/// Read and validate a repository config.
pub fn load_repo_spec(path: &Path) -> Result<RepoSpec> {
    tracing::info!("Reading config: {}", path.display());
    let spec: RepoSpec = read_json(path)?;
    if spec.url.trim().is_empty() {
        return Err(Error::config(path, "`url` must not be empty"));
    }
    Ok(spec)
}

/// Read a JSON document, separating malformed input from schema mismatches.
///
/// Unreadable files, syntax errors and truncated documents are
/// [`Error::Parse`]; a valid document with missing or mistyped fields is
/// [`Error::Config`].
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::parse(path.display().to_string(), e))?;

    serde_json::from_str(&text).map_err(|e| match e.classify() {
        Category::Data => Error::config(path, e.to_string()),
        _ => Error::parse(path.display().to_string(), e),
    })
}

/// Default location of the tool settings file.
pub fn settings_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|d| d.join("autobackup").join("config.toml"))
}

/// Load tool settings from `path`, or defaults when `path` is `None` or the
/// file does not exist.
///
/// A file that exists but cannot be read or parsed is an error: silently
/// falling back would change which binary and thresholds are used.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path.filter(|p| p.exists()) else {
        return Ok(Settings::default());
    };

    tracing::debug!("Reading settings: {}", path.display());
    let text = std::fs::read_to_string(path).map_err(|e| Error::config(path, e.to_string()))?;
    let settings: Settings = toml::from_str(&text).map_err(|e| Error::config(path, e.to_string()))?;
    if settings.verify.window_days > MAX_WINDOW_DAYS {
        return Err(Error::config(
            path,
            format!(
                "`verify.window_days` is {}, at most {MAX_WINDOW_DAYS} is supported",
                settings.verify.window_days
            ),
        ));
    }
    Ok(settings)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
