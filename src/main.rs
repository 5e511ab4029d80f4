//! `autobackup` — scheduled restic backups with a freshness check.
//!
//! # Overview
//!
//! This binary is a thin orchestration layer around [`restic`](https://restic.net).
//! Cron runs `autobackup backup` regularly; a monitor runs `autobackup verify`
//! and alerts on a non-zero exit, which means either the repository failed its
//! consistency check or some source stopped producing snapshots.
//!
//! # Usage
//!
//! ```text
//! autobackup backup          repo.json password.txt source.json
//! autobackup init            repo.json password.txt
//! autobackup verify          repo.json password.txt
//! autobackup compile-dotenv  repo.json
//! ```
//!
//! # Exit status
//!
//! `0` on success; `1` on usage errors, config errors, restic failures, or a
//! failed verification.
//!
//! # Module layout
//!
//! | Module                   | Responsibility                              |
//! |--------------------------|---------------------------------------------|
//! | [`cli`]                  | Argument types parsed by clap               |
//! | [`config`]               | Source/repo JSON specs, TOML tool settings  |
//! | [`error`]                | Error taxonomy                              |
//! | [`logging`]              | `tracing` subscriber setup                  |
//! | [`runner`]               | Invocation building and process execution   |
//! | [`snapshots`]            | Snapshot listing parser and freshness rule  |
//! | [`ui`]                   | Spinner and ✓/✗ status lines                |
//! | [`commands`]             | One handler per operation                   |

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod runner;
mod snapshots;
mod ui;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Operation};
use error::Error;
use runner::ProcessExecutor;
use ui::Reporter;

fn main() -> ExitCode {
    logging::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help / --version
        Err(e) if !e.use_stderr() => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        },
        Err(e) => {
            let err = Error::Usage(e.render().to_string());
            eprintln!("{}", err.to_string().trim_end());
            return ExitCode::FAILURE;
        },
    };

    match dispatch(&cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Run one operation.  `Ok(false)` is a clean but negative verification.
fn dispatch(operation: &Operation) -> anyhow::Result<bool> {
    let mut executor = ProcessExecutor;
    let mut reporter = Reporter::stderr();

    match operation {
        // ── autobackup backup ─────────────────────────────────────────────────
        Operation::Backup {
            repo_config,
            password_file,
            source_config,
        } => {
            commands::backup::run(
                &load_settings()?,
                &mut executor,
                &mut reporter,
                repo_config,
                password_file,
                source_config,
            )
            .context("backup failed")?;
            Ok(true)
        },

        // ── autobackup init ───────────────────────────────────────────────────
        Operation::Init {
            repo_config,
            password_file,
        } => {
            commands::init::run(
                &load_settings()?,
                &mut executor,
                &mut reporter,
                repo_config,
                password_file,
            )
            .context("init failed")?;
            Ok(true)
        },

        // ── autobackup verify ─────────────────────────────────────────────────
        Operation::Verify {
            repo_config,
            password_file,
        } => {
            let outcome = commands::verify::run(
                &load_settings()?,
                &mut executor,
                &mut reporter,
                repo_config,
                password_file,
                chrono::Utc::now,
            )
            .context("verify failed")?;
            Ok(outcome.is_success())
        },

        // ── autobackup compile-dotenv ─────────────────────────────────────────
        Operation::CompileDotenv { repo_config } => {
            commands::dotenv::run(repo_config, &mut std::io::stdout().lock())?;
            Ok(true)
        },
    }
}

/// Tool settings from `<config_dir>/autobackup/config.toml`, or defaults.
fn load_settings() -> anyhow::Result<config::Settings> {
    let path = config::settings_path();
    Ok(config::load_settings(path.as_deref())?)
}
