//! Command-line interface definition.
//!
//! All argument parsing lives here so the rest of the codebase can stay
//! agnostic to `clap`.  The surface is positional only:
//!
//! ```text
//! autobackup backup          <REPO_CONFIG> <PASSWORD_FILE> <SOURCE_CONFIG>
//! autobackup init            <REPO_CONFIG> <PASSWORD_FILE>
//! autobackup verify          <REPO_CONFIG> <PASSWORD_FILE>
//! autobackup compile-dotenv  <REPO_CONFIG>
//! ```

use std::path::PathBuf;

use clap::Parser;

const AFTER_HELP: &str = "\
Source config (JSON):
    { \"dirs\": [\"/path/to/dir1\", \"/path/to/dir2\"],
      \"exclude\": [\"/path/to/dir1/exclude1\"] }

Repo config (JSON):
    { \"url\": \"s3:s3.amazonaws.com/bucket_name\",
      \"env\": { \"AWS_ACCESS_KEY_ID\": \"id\", \"AWS_SECRET_ACCESS_KEY\": \"key\" } }

Password file:
    Plain text; its path is handed to restic via --password-file.";

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(
    name    = "autobackup",
    about   = "Back up directories with restic and check that snapshots keep coming",
    version,
    arg_required_else_help = true,
    after_help = AFTER_HELP,
    help_template = "\
{before-help}{name} {version}
{about}

{usage-heading} {usage}

{all-args}{after-help}"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Operation,
}

/// The four operations.  Each takes only positional arguments.
#[derive(clap::Subcommand, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Create a snapshot of the source directories, tagged as automated.
    Backup {
        #[arg(value_name = "REPO_CONFIG_FILE")]
        repo_config: PathBuf,
        #[arg(value_name = "PASSWORD_FILE")]
        password_file: PathBuf,
        #[arg(value_name = "SOURCE_CONFIG_FILE")]
        source_config: PathBuf,
    },

    /// Initialise the repository.
    Init {
        #[arg(value_name = "REPO_CONFIG_FILE")]
        repo_config: PathBuf,
        #[arg(value_name = "PASSWORD_FILE")]
        password_file: PathBuf,
    },

    /// Check repository consistency, then require at least 5 automated
    /// snapshots per source group within the last 7 days.
    Verify {
        #[arg(value_name = "REPO_CONFIG_FILE")]
        repo_config: PathBuf,
        #[arg(value_name = "PASSWORD_FILE")]
        password_file: PathBuf,
    },

    /// Print the repo config's environment as `export` lines.
    ///
    /// In bash: `source <(autobackup compile-dotenv repo.json)`.
    CompileDotenv {
        #[arg(value_name = "REPO_CONFIG_FILE")]
        repo_config: PathBuf,
    },
}

// ─── Tests ────────────────────────────────────────────────────────────────────
