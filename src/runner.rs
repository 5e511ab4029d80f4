//! Command construction and process execution.
//!
//! Commands are built as discrete argument vectors ([`Invocation`]) and run
//! without a shell, so repository URLs and paths containing spaces or shell
//! metacharacters reach restic verbatim.
//!
//! Execution sits behind the [`Executor`] trait.  [`ProcessExecutor`] spawns
//! real processes; tests substitute a recording fake so that operations can
//! be checked without restic installed.

use std::{
    collections::BTreeMap,
    ffi::OsString,
    process::{Command, ExitStatus, Stdio},
};

use crate::{
    config::{RepoSpec, Settings},
    error::{Error, Result},
    ui,
};

// ─── Invocation ───────────────────────────────────────────────────────────────

/// A fully-resolved external command: program, arguments, and the
/// environment entries to layer over the inherited environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

impl Invocation {
    /// Space-joined rendering for diagnostics.  Not re-parseable by a shell.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The restic subcommand, i.e. the first argument after `-r <url>`.
    #[cfg(test)]
    pub fn subcommand(&self) -> Option<&str> {
        self.args.get(2).map(String::as_str)
    }
}

// ─── restic base command ──────────────────────────────────────────────────────

/// Builds the part shared by every restic invocation:
///
/// ```text
/// restic  -r <repo.url>
/// ```
///
/// with the repository's `env` attached.  Callers append the subcommand and
/// its flags.
pub fn restic_base(settings: &Settings, repo: &RepoSpec) -> Invocation {
    Invocation {
        program: settings.restic.binary.clone(),
        args: vec!["-r".into(), repo.url.clone()],
        env: repo.env.clone(),
    }
}

// ─── Environment ──────────────────────────────────────────────────────────────

/// `base` with every key in `overrides` replaced or added.
///
/// Keys absent from `overrides` pass through untouched.
pub fn overlay_env<I, K, V>(base: I, overrides: &BTreeMap<String, String>) -> BTreeMap<OsString, OsString>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<OsString>,
    V: Into<OsString>,
{
    let mut env: BTreeMap<OsString, OsString> = base
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    for (k, v) in overrides {
        env.insert(k.into(), v.into());
    }
    env
}

// ─── Executor ─────────────────────────────────────────────────────────────────

/// What to do with the child's standard output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// Let the child write straight to the terminal.
    Inherit,
    /// Collect stdout (and stderr, for error reports) behind a spinner.
    Stdout,
}

/// Runs an [`Invocation`] to completion.
///
/// Returns the captured stdout (empty for [`Capture::Inherit`]), or
/// [`Error::Execution`] if the program could not be started or exited
/// non-zero.
pub trait Executor {
    fn execute(&mut self, invocation: &Invocation, capture: Capture) -> Result<String>;
}

/// Spawns real child processes, one at a time.
#[derive(Debug, Default)]
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    fn execute(&mut self, invocation: &Invocation, capture: Capture) -> Result<String> {
        let command_line = invocation.command_line();
        tracing::info!("Running: {command_line}");

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .env_clear()
            .envs(overlay_env(std::env::vars_os(), &invocation.env));

        match capture {
            Capture::Inherit => {
                let status = cmd
                    .status()
                    .map_err(|e| spawn_failed(&command_line, &e))?;
                check_status(status, command_line, String::new())?;
                Ok(String::new())
            },
            Capture::Stdout => {
                let spinner = ui::make_spinner(&command_line);
                let output = cmd
                    .stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped())
                    .output();
                spinner.finish_and_clear();

                let output = output.map_err(|e| spawn_failed(&command_line, &e))?;
                let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
                check_status(output.status, command_line, stderr)?;
                Ok(String::from_utf8_lossy(&output.stdout).into_owned())
            },
        }
    }
}

fn spawn_failed(command_line: &str, err: &std::io::Error) -> Error {
    Error::Execution {
        command: command_line.to_string(),
        status: format!("could not be started: {err}"),
        stderr: String::new(),
    }
}

fn check_status(status: ExitStatus, command: String, stderr: String) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    Err(Error::Execution {
        command,
        status: format!("exited with {status}"),
        stderr,
    })
}

// ─── Test support ─────────────────────────────────────────────────────────────


// ─── Tests ────────────────────────────────────────────────────────────────────
