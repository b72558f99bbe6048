//! # PackRS CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file
//! declares `mod common;` and uses what it needs.
//!

#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const MB: u64 = 1024 * 1024;

/// # Get PackRS Command (`packrs_cmd`)
///
/// An `assert_cmd::Command` for the compiled `packrs` binary.
///
/// ## Panics
/// Panics if the `packrs` binary cannot be found via `Command::cargo_bin`.
pub fn packrs_cmd() -> Command {
    Command::cargo_bin("packrs").expect("Failed to find packrs binary for testing")
}

/// A scratch workspace: `<tmp>/.git` stops the project config search,
/// `<tmp>/app` is the application root and `<tmp>/home` isolates user config.
pub struct Workspace {
    pub temp_dir: TempDir,
    pub app: PathBuf,
    pub home: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let root = temp_dir.path();
        fs::create_dir(root.join(".git")).expect("Failed to create .git marker");
        let app = root.join("app");
        fs::create_dir(&app).expect("Failed to create app dir");
        let home = root.join("home");
        fs::create_dir(&home).expect("Failed to create home dir");
        Self { temp_dir, app, home }
    }

    pub fn build_dir(&self) -> PathBuf {
        self.temp_dir.path().join("build")
    }

    pub fn archive(&self) -> PathBuf {
        self.build_dir().join("app.zip")
    }

    /// Writes `.packrs.toml` beside `.git`, found by searching up from the
    /// application root without adding to the application's size.
    pub fn config(&self, contents: &str) {
        fs::write(self.temp_dir.path().join(".packrs.toml"), contents)
            .expect("Failed to write config");
    }

    /// `packrs package --app <app> --build <tmp>/build` with an isolated environment.
    pub fn package(&self) -> Command {
        let mut cmd = packrs_cmd();
        cmd.env("HOME", &self.home)
            .env("XDG_CONFIG_HOME", self.home.join(".config"))
            .env_remove("PACKRS_ENV")
            .env_remove("RUST_LOG")
            .arg("package")
            .arg("--app")
            .arg(&self.app)
            .arg("--build")
            .arg(self.build_dir());
        cmd
    }
}

/// Creates a sparse file of `len` bytes, with parents.
pub fn sized_file(path: &Path, len: u64) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    File::create(path)
        .and_then(|f| f.set_len(len))
        .expect("Failed to create sized file");
}
