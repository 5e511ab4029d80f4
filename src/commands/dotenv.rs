//! `autobackup compile-dotenv` — export the repo environment for a shell.
//!
//! Handy for running restic by hand against the same repository:
//!
//! ```text
//! source <(autobackup compile-dotenv repo.json)
//! restic -r "$URL" snapshots
//! ```

use std::{io::Write, path::Path};

use crate::{config, error::Result};

/// Print one `export NAME=VALUE` line per `env` entry to `out`.
///
/// Entries whose name is not a shell identifier are skipped with a warning,
/// since the name is printed unquoted.
pub fn run<W: Write>(repo_config: &Path, out: &mut W) -> Result<()> {
    let repo = config::load_repo_spec(repo_config)?;

    tracing::info!(
        "In bash, you can source by running: source <({} compile-dotenv {})",
        env!("CARGO_PKG_NAME"),
        repo_config.display()
    );
    for (name, value) in &repo.env {
        if !is_shell_name(name) {
            tracing::warn!("Skipping env entry {name:?}: not a valid shell variable name");
            continue;
        }
        writeln!(out, "export {name}={}", shell_quote(value))?;
    }
    Ok(())
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_shell_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Single-quote `value` unless it is made only of characters a POSIX shell
/// reads literally.
fn shell_quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_./:@%+=,-".contains(c));
    if plain {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}
