//! # PackRS Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! Top-level commands of the PackRS CLI. Each command module defines its
//! argument struct (`clap::Parser`) and an async `handle_*` function that
//! `main.rs` routes to.
//!
//! ## Commands
//!
//! - `package`: Compresses the application tree into `app.zip`.
//!

/// Builds the deployable `app.zip` from an application root.
pub mod package;
