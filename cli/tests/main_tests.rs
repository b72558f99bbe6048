//! # PackRS CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//!
//! ## Overview
//!
//! Top-level behavior of the `packrs` binary: `--help`, `--version` and
//! argument errors.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_version() {
    packrs_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_package() {
    packrs_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("package"));
}

#[test]
fn test_package_help() {
    packrs_cmd()
        .args(["package", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--backend"))
        .stdout(predicate::str::contains("--build"));
}

#[test]
fn test_no_subcommand_fails() {
    packrs_cmd().assert().failure();
}

#[test]
fn test_unknown_backend_rejected() {
    packrs_cmd()
        .args(["package", "--backend", "tar"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
