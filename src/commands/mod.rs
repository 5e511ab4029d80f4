//! Operation handlers.
//!
//! Each file in this module corresponds to one user-facing operation:
//!
//! | File         | Invocation                   | Description                           |
//! |--------------|------------------------------|---------------------------------------|
//! | `backup.rs`  | `autobackup backup`          | Snapshot sources into the repo        |
//! | `init.rs`    | `autobackup init`            | Create the repository                 |
//! | `verify.rs`  | `autobackup verify`          | Consistency check + snapshot cadence  |
//! | `dotenv.rs`  | `autobackup compile-dotenv`  | Print repo env as `export` lines      |
//!
//! Every handler that talks to restic takes the [`Executor`] and
//! [`Reporter`] from `main` rather than creating its own.
//!
//! [`Executor`]: crate::runner::Executor
//! [`Reporter`]: crate::ui::Reporter

pub mod backup;
pub mod dotenv;
pub mod init;
pub mod verify;

use std::path::Path;

use crate::error::{Error, Result};

/// `--password-file <path>`.  Only the path is passed; restic reads the file.
fn password_file_args(password_file: &str) -> [String; 2] {
    ["--password-file".into(), password_file.into()]
}

/// `path` as UTF-8.  Arguments are passed to restic as strings, and a lossy
/// conversion would point restic at a different file.
fn utf8_path(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| {
        Error::Usage(format!(
            "path is not valid UTF-8: {}",
            path.display()
        ))
    })
}
