//! Error taxonomy shared by every operation.
//!
//! | Variant     | Raised when                                                   |
//! |-------------|---------------------------------------------------------------|
//! | `Config`    | a config document is well-formed but missing/invalid fields   |
//! | `Parse`     | a config file is unreadable, or JSON/TOML is malformed        |
//! | `Execution` | restic could not be spawned or exited non-zero                |
//! | `Usage`     | bad command line, or a path argument that is not UTF-8        |
//! | `Io`        | the report stream could not be written                        |
//!
//! Only `Execution` during the consistency check of `verify` is recovered;
//! everything else ends the process with status 1.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("cannot parse {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    #[error("`{command}` {status}{}", stderr_suffix(.stderr))]
    Execution {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("{0}")]
    Usage(String),

    #[error("cannot write report: {0}")]
    Io(#[from] std::io::Error),
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{trimmed}")
    }
}

impl Error {
    /// A config document that parsed but failed validation.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn parse(source_name: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    /// Returns `true` for failures of the external tool itself.
    pub const fn is_execution(&self) -> bool {
        matches!(self, Self::Execution { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
