//! # PackRS Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared utilities used by the command handlers, kept apart from
//! command-specific logic (`commands::`) and core infrastructure (`core::`).
//!
//! ## Architecture
//!
//! - **`archive`**: The `app.zip` data model, the zip backends, the permission
//!   policy, the size ceiling and the `ArchiveBuilder` that ties them together.
//! - **`fs`**: Tree enumeration, size measurement and small I/O helpers.
//! - **`process`**: Running external programs with captured output and an optional timeout.
//! - **`system`**: Host platform detection.
//! - **`ui`**: The `Reporter` trait for user-facing progress lines.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::{fs, system};
//! use crate::core::error::Result;
//! use std::path::Path;
//!
//! # fn run_example() -> Result<()> {
//! let bytes = fs::size::directory_size(Path::new("."))?;
//! let platform = system::HostPlatform::detect();
//! # Ok(())
//! # }
//! ```
//!

/// Zip archive creation for deployable application packages.
pub mod archive;
/// Filesystem operations (enumeration, size, I/O).
pub mod fs;
/// External process execution.
pub mod process;
/// Host platform detection.
pub mod system;
/// Progress reporting.
pub mod ui;
