//! # PackRS Archive Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! This module turns a built application tree into the deployable `app.zip`.
//! It defines the shared data model (`FileEntry`, `ArchiveTarget`), the
//! `ArchiveBackend` seam, and how a backend is chosen for the current host.
//!
//! ## Architecture
//!
//! - **`permissions`**: The mode embedded for each entry (`PermissionPolicy`).
//! - **`limits`**: Megabyte conversions and the fixed 250MB ceiling.
//! - **`zip_writer`**: Structured backend. Adds entries one at a time with explicit
//!   Unix attributes and explicit empty-directory records.
//! - **`zip_command`**: External-tool backend. Runs `zip -r` over the whole tree;
//!   used on macOS.
//! - **`builder`**: `ArchiveBuilder`, which measures, reports, selects a backend,
//!   writes the artifact and enforces the ceiling.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::builder::ArchiveBuilder;
//! use crate::common::system::HostPlatform;
//! use crate::common::ui::ConsoleReporter;
//!
//! # async fn run(app_dir: &std::path::Path, build_dir: &std::path::Path, entries: &[FileEntry]) -> anyhow::Result<()> {
//! let builder = ArchiveBuilder::new(ConsoleReporter, HostPlatform::detect());
//! let report = builder.build(app_dir, build_dir, entries, false).await?;
//! # Ok(())
//! # }
//! ```
//!
use crate::common::system::HostPlatform;
use crate::core::error::Result;
use serde::Deserialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};

pub mod builder;
pub mod limits;
pub mod permissions;
pub mod zip_command;
pub mod zip_writer;

/// File name of the artifact written into the build directory.
pub const ARCHIVE_FILE_NAME: &str = "app.zip";

/// One file or directory of the application tree, as handed to the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Location on disk.
    pub real_path: PathBuf,
    /// Path inside the archive, always `/`-separated.
    pub relative_path: String,
    pub is_dir: bool,
    /// Byte size for files; 0 for directories.
    pub size: u64,
}

impl FileEntry {
    pub fn file(real_path: impl Into<PathBuf>, relative_path: impl Into<String>, size: u64) -> Self {
        Self {
            real_path: real_path.into(),
            relative_path: relative_path.into(),
            is_dir: false,
            size,
        }
    }

    pub fn directory(real_path: impl Into<PathBuf>, relative_path: impl Into<String>) -> Self {
        Self {
            real_path: real_path.into(),
            relative_path: relative_path.into(),
            is_dir: true,
            size: 0,
        }
    }

    /// Last path component of the archive path.
    pub fn file_name(&self) -> &str {
        self.relative_path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }
}

/// Joins the normal components of a relative path with `/`, whatever the host separator.
pub fn archive_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Backend preference, as configured or passed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    /// Pick by host platform.
    #[default]
    Auto,
    /// Always use the structured zip writer.
    Writer,
    /// Always shell out to the external `zip` tool.
    Command,
}

/// The backend actually used for one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    ZipWriter,
    ZipCommand,
}

impl BackendKind {
    /// Resolves a preference against the host. `Auto` shells out only where the
    /// host prefers the external tool (macOS).
    pub fn select(choice: BackendChoice, platform: HostPlatform) -> Self {
        match choice {
            BackendChoice::Writer => BackendKind::ZipWriter,
            BackendChoice::Command => BackendKind::ZipCommand,
            BackendChoice::Auto if platform.prefers_external_zip() => BackendKind::ZipCommand,
            BackendChoice::Auto => BackendKind::ZipWriter,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::ZipWriter => f.write_str("zip writer"),
            BackendKind::ZipCommand => f.write_str("zip command"),
        }
    }
}

/// Where one build writes its artifact, and with which backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveTarget {
    pub destination: PathBuf,
    pub backend: BackendKind,
}

/// Entry counts reported by backends that add entries individually.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    pub files: usize,
    pub empty_dirs: usize,
}

/// A strategy that produces the archive at `destination`.
///
/// Implementations own the artifact for the duration of the call and must
/// surface every failure. Backends that add entries individually return
/// their counts; whole-tree backends return `None`.
pub trait ArchiveBackend {
    fn kind(&self) -> BackendKind;

    async fn write_archive(
        &self,
        app_dir: &Path,
        entries: &[FileEntry],
        destination: &Path,
    ) -> Result<Option<ArchiveStats>>;
}
