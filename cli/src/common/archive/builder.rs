//! # Archive Builder (`common::archive::builder`)
//!
//! File: cli/src/common/archive/builder.rs
//!
//! ## Overview
//!
//! `ArchiveBuilder` runs the compression step once per build:
//!
//! 1. Container-image environments skip packaging entirely.
//! 2. The application root is measured (uncompressed) and the size reported.
//! 3. A backend is chosen from the configured preference and the host platform.
//! 4. The backend writes `<build_dir>/app.zip`.
//! 5. The measured size is checked against the 250MB ceiling.
//!
//! The ceiling is checked against the size measured in step 2, not against the
//! compressed artifact. When any step after measurement fails, the artifact is
//! removed so a half-written or oversized `app.zip` is never left for a later
//! deploy step to pick up.
//!
//! Output goes through the injected `Reporter`; failures are returned to the
//! caller, which decides how to exit.
//!
use super::limits::{self, format_megabytes};
use super::permissions::PermissionPolicy;
use super::zip_command::ZipCommandBackend;
use super::zip_writer::ZipWriterBackend;
use super::{
    ArchiveBackend, ArchiveStats, ArchiveTarget, BackendChoice, BackendKind, FileEntry,
    ARCHIVE_FILE_NAME,
};
use crate::common::fs::{io, size};
use crate::common::system::HostPlatform;
use crate::common::ui::Reporter;
use crate::core::config::PackageConfig;
use crate::core::error::Result;
use anyhow::Context;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome of a successful packaging run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReport {
    pub target: ArchiveTarget,
    /// Uncompressed size of the application root.
    pub bytes: u64,
    /// `bytes` in whole megabytes, rounded up.
    pub size_mb: u64,
    /// Entry counts, when the backend reports them.
    pub stats: Option<ArchiveStats>,
}

/// Orchestrates measurement, backend selection, archive writing and the size check.
#[derive(Debug)]
pub struct ArchiveBuilder<R: Reporter> {
    reporter: R,
    platform: HostPlatform,
    choice: BackendChoice,
    writer: ZipWriterBackend,
    command: ZipCommandBackend,
}

impl<R: Reporter> ArchiveBuilder<R> {
    pub fn new(reporter: R, platform: HostPlatform) -> Self {
        Self {
            reporter,
            platform,
            choice: BackendChoice::Auto,
            writer: ZipWriterBackend::new(PermissionPolicy::new()),
            command: ZipCommandBackend::default(),
        }
    }

    /// Builder configured from the `[package]` settings.
    pub fn from_config(reporter: R, platform: HostPlatform, config: &PackageConfig) -> Self {
        Self::new(reporter, platform)
            .with_backend_choice(config.backend)
            .with_permission_policy(PermissionPolicy::with_overrides(
                config.permissions.clone(),
            ))
            .with_zip_command(
                ZipCommandBackend::new(
                    config.zip_program.clone(),
                    config.zip_timeout_secs.map(Duration::from_secs),
                )
                .with_exclusions(config.exclude.clone()),
            )
    }

    pub fn with_backend_choice(mut self, choice: BackendChoice) -> Self {
        self.choice = choice;
        self
    }

    pub fn with_permission_policy(mut self, policy: PermissionPolicy) -> Self {
        self.writer = ZipWriterBackend::new(policy);
        self
    }

    pub fn with_zip_command(mut self, command: ZipCommandBackend) -> Self {
        self.command = command;
        self
    }

    #[cfg(test)]
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// The backend this builder will use on its host.
    pub fn backend_kind(&self) -> BackendKind {
        BackendKind::select(self.choice, self.platform)
    }

    /// # Build the Application Archive (`build`)
    ///
    /// Packages `app_dir` into `build_dir/app.zip` from the pre-ordered
    /// `entries`. Returns `Ok(None)` without touching anything when
    /// `uses_container_image` is set.
    ///
    /// ## Errors
    ///
    /// - `PackrsError::Traversal` if the application root cannot be measured.
    /// - `PackrsError::ArchiveIo` / `PackrsError::ExternalCommand` from the backend.
    /// - `PackrsError::SizeLimitExceeded` when the application exceeds 250MB.
    pub async fn build(
        &self,
        app_dir: &Path,
        build_dir: &Path,
        entries: &[FileEntry],
        uses_container_image: bool,
    ) -> Result<Option<PackageReport>> {
        if uses_container_image {
            info!("Environment deploys a container image; skipping application archive.");
            return Ok(None);
        }

        io::ensure_dir_exists(build_dir)?;
        let build_dir = fs::canonicalize(build_dir)
            .with_context(|| format!("Failed to resolve build directory {:?}", build_dir))?;
        let target = ArchiveTarget {
            destination: build_dir.join(ARCHIVE_FILE_NAME),
            backend: self.backend_kind(),
        };
        // A previous artifact must not count towards this build's size.
        io::remove_file_if_exists(&target.destination)?;

        let bytes = size::directory_size(app_dir)?;
        self.reporter.step(&format!(
            "Compressing Application ({}MB)",
            format_megabytes(bytes)
        ));

        info!(
            "Writing {} with the {} backend ({} host)",
            target.destination.display(),
            target.backend,
            self.platform
        );
        let written = match target.backend {
            BackendKind::ZipWriter => self.write_with(&self.writer, app_dir, entries, &target).await,
            BackendKind::ZipCommand => {
                self.write_with(&self.command, app_dir, entries, &target)
                    .await
            }
        };
        let stats = match written {
            Ok(stats) => stats,
            Err(e) => {
                self.discard(&target);
                return Err(e);
            }
        };

        let size_mb = match limits::ensure_within_size_limit(bytes) {
            Ok(size_mb) => size_mb,
            Err(e) => {
                self.reporter.line();
                self.discard(&target);
                return Err(e);
            }
        };

        Ok(Some(PackageReport {
            target,
            bytes,
            size_mb,
            stats,
        }))
    }

    async fn write_with<B: ArchiveBackend>(
        &self,
        backend: &B,
        app_dir: &Path,
        entries: &[FileEntry],
        target: &ArchiveTarget,
    ) -> Result<Option<ArchiveStats>> {
        debug!("Running {} backend over {} entries", backend.kind(), entries.len());
        backend
            .write_archive(app_dir, entries, &target.destination)
            .await
    }

    fn discard(&self, target: &ArchiveTarget) {
        match io::remove_file_if_exists(&target.destination) {
            Ok(true) => info!("Removed unusable archive {}", target.destination.display()),
            Ok(false) => {}
            Err(e) => warn!("{:#}", e),
        }
    }
}
