//! End-to-end tests against a real `restic`.
//!
//! These tests spawn the `autobackup` binary **and** call `restic` directly
//! to inspect the resulting local repository.
//!
//! # Running
//!
//! All tests are `#[ignore]`d so a plain `cargo test` stays green on machines
//! without restic.  With restic on `PATH`:
//!
//! ```sh
//! cargo test --test e2e -- --ignored
//! ```
//!
//! # What is tested
//!
//! - `init` creates a repository; a second `init` fails.
//! - `backup` creates a snapshot carrying the `autobackup` tag.
//! - Excluded paths are left out of the snapshot.
//! - `verify` fails with one snapshot and passes after five.

use std::{fs, path::PathBuf, process::Command};

const BIN: &str = env!("CARGO_BIN_EXE_autobackup");

// ─── Fixture ──────────────────────────────────────────────────────────────────

/// A local repository, a password file, and a small source tree.
struct Fixture {
    /// Root temp dir; everything lives under here and is deleted on drop.
    _root: tempfile::TempDir,
    pub source_dir: PathBuf,
    pub repo_dir: PathBuf,
    pub password_file: PathBuf,
    pub repo_config: PathBuf,
    pub source_config: PathBuf,
    /// Empty settings dir so the developer's own settings are not picked up.
    config_home: PathBuf,
    counter: std::sync::atomic::AtomicU32,
}

impl Fixture {
    fn new(test_name: &str) -> Self {
        let root = tempfile::tempdir().unwrap();
        let source_dir = root.path().join("source");
        let repo_dir = root.path().join("repo");
        let config_home = root.path().join("config");

        fs::create_dir_all(source_dir.join("subdir")).unwrap();
        fs::create_dir_all(source_dir.join("cache")).unwrap();
        fs::create_dir_all(&config_home).unwrap();

        fs::write(
            source_dir.join("hello.txt"),
            format!("hello from {test_name}"),
        )
        .unwrap();
        fs::write(source_dir.join("subdir").join("nested.txt"), "nested").unwrap();
        fs::write(source_dir.join("cache").join("skip-me.txt"), "cached").unwrap();

        let password_file = root.path().join("password");
        fs::write(&password_file, "correct horse battery staple").unwrap();

        let repo_config = root.path().join("repo.json");
        fs::write(
            &repo_config,
            serde_json::json!({ "url": repo_dir.display().to_string(), "env": {} }).to_string(),
        )
        .unwrap();

        let source_config = root.path().join("source.json");
        fs::write(
            &source_config,
            serde_json::json!({
                "dirs": [source_dir.display().to_string()],
                "exclude": [source_dir.join("cache").display().to_string()],
            })
            .to_string(),
        )
        .unwrap();

        Self {
            _root: root,
            source_dir,
            repo_dir,
            password_file,
            repo_config,
            source_config,
            config_home,
            counter: std::sync::atomic::AtomicU32::new(0),
        }
    }

    /// Run `autobackup <op> …`, returning `(success, stdout, stderr)`.
    fn run(&self, op: &str) -> (bool, String, String) {
        let mut cmd = Command::new(BIN);
        cmd.arg(op).arg(&self.repo_config);
        if op != "compile-dotenv" {
            cmd.arg(&self.password_file);
        }
        if op == "backup" {
            cmd.arg(&self.source_config);
        }
        let out = cmd
            .env("XDG_CONFIG_HOME", &self.config_home)
            .output()
            .unwrap_or_else(|e| panic!("failed to spawn {BIN}: {e}"));
        (
            out.status.success(),
            String::from_utf8_lossy(&out.stdout).into_owned(),
            String::from_utf8_lossy(&out.stderr).into_owned(),
        )
    }

    /// Run `restic` directly against this fixture's repo.
    fn restic(&self, args: &[&str]) -> (bool, String, String) {
        let out = Command::new("restic")
            .arg("-r")
            .arg(&self.repo_dir)
            .arg("--password-file")
            .arg(&self.password_file)
            .args(args)
            .output()
            .unwrap_or_else(|e| panic!("failed to spawn restic: {e}"));
        (
            out.status.success(),
            String::from_utf8_lossy(&out.stdout).into_owned(),
            String::from_utf8_lossy(&out.stderr).into_owned(),
        )
    }

    /// Write a new uniquely-named file so the next snapshot differs.
    fn write_unique(&self) {
        let n = self
            .counter
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        fs::write(self.source_dir.join(format!("unique_{n}.txt")), n.to_string()).unwrap();
    }

    /// Snapshots carrying the `autobackup` tag.
    fn tagged_snapshots(&self) -> Vec<serde_json::Value> {
        let (ok, stdout, stderr) = self.restic(&["snapshots", "--tag", "autobackup", "--json"]);
        assert!(ok, "restic snapshots should succeed; stderr:\n{stderr}");
        serde_json::from_str::<Option<Vec<serde_json::Value>>>(&stdout)
            .unwrap()
            .unwrap_or_default()
    }

    fn init(&self) {
        let (ok, _, stderr) = self.run("init");
        assert!(ok, "init should succeed; stderr:\n{stderr}");
    }

    fn backup(&self) {
        self.write_unique();
        let (ok, _, stderr) = self.run("backup");
        assert!(ok, "backup should succeed; stderr:\n{stderr}");
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[ignore]
#[test]
fn init_creates_repository() {
    let fx = Fixture::new("init");
    fx.init();
    assert!(fx.repo_dir.join("config").exists(), "repo config should exist");
}

#[ignore]
#[test]
fn second_init_fails() {
    let fx = Fixture::new("second_init");
    fx.init();
    let (ok, _, _) = fx.run("init");
    assert!(!ok, "initialising an existing repository should fail");
}

#[ignore]
#[test]
fn backup_creates_tagged_snapshot() {
    let fx = Fixture::new("backup");
    fx.init();
    fx.backup();

    let snapshots = fx.tagged_snapshots();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0]["tags"], serde_json::json!(["autobackup"]));
}

#[ignore]
#[test]
fn backup_leaves_out_excluded_paths() {
    let fx = Fixture::new("exclude");
    fx.init();
    fx.backup();

    let (ok, stdout, stderr) = fx.restic(&["ls", "latest"]);
    assert!(ok, "restic ls should succeed; stderr:\n{stderr}");
    assert!(stdout.contains("nested.txt"), "listing:\n{stdout}");
    assert!(!stdout.contains("skip-me.txt"), "listing:\n{stdout}");
}

#[ignore]
#[test]
fn backup_without_repository_fails() {
    let fx = Fixture::new("no_repo");
    let (ok, _, _) = fx.run("backup");
    assert!(!ok, "backup into a missing repository should fail");
}

#[ignore]
#[test]
fn verify_fails_with_a_single_snapshot() {
    let fx = Fixture::new("verify_one");
    fx.init();
    fx.backup();

    let (ok, _, stderr) = fx.run("verify");
    assert!(!ok, "one snapshot is below the weekly minimum");
    assert!(stderr.contains("insufficient"), "stderr:\n{stderr}");
}

#[ignore]
#[test]
fn verify_passes_after_five_backups() {
    let fx = Fixture::new("verify_five");
    fx.init();
    for _ in 0..5 {
        fx.backup();
    }

    let (ok, _, stderr) = fx.run("verify");
    assert!(ok, "five fresh snapshots should pass; stderr:\n{stderr}");
}
