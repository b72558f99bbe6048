//! # PackRS Package Command
//!
//! File: cli/src/commands/package.rs
//!
//! ## Overview
//!
//! Implements `packrs package`, which compresses a built application tree
//! into `app.zip` for deployment to a serverless runtime.
//!
//! ## Architecture
//!
//! 1. Resolve the application root (`--app`, default `.`) and load configuration
//!    from it (see `core::config`).
//! 2. Resolve the build directory: `--build`, else `package.build_dir` relative to
//!    the application root, else the application root's parent.
//! 3. Enumerate the tree with the configured exclusions. A build directory nested
//!    inside the application root is always excluded, by either backend.
//! 4. Hand the entries to `ArchiveBuilder`, which skips container-image
//!    environments, reports the size, writes the archive and enforces the 250MB
//!    ceiling.
//!
//! ## Examples
//!
//! ```bash
//! # Package the current directory into ../app.zip
//! packrs package
//!
//! # Package a specific build, writing into ./dist
//! packrs package --app .build/app --build dist
//!
//! # Force the external zip tool for the staging environment
//! packrs package --env staging --backend command
//! ```
//!
use crate::common::archive::builder::ArchiveBuilder;
use crate::common::archive::{archive_path, BackendChoice};
use crate::common::fs::entries;
use crate::common::system::HostPlatform;
use crate::common::ui::ConsoleReporter;
use crate::core::config::{self, PackageConfig};
use crate::core::error::{PackrsError, Result};
use anyhow::Context;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// # Package Arguments (`PackageArgs`)
///
/// Command-line options for `packrs package`. Flags take precedence over the
/// `[package]` configuration table.
#[derive(Parser, Debug)]
pub struct PackageArgs {
    /// Application root to package.
    #[arg(long, default_value = ".")]
    app: PathBuf,

    /// Directory receiving `app.zip`. Defaults to `package.build_dir`, or the
    /// application root's parent when that is unset.
    #[arg(long)]
    build: Option<PathBuf>,

    /// Deployment environment. Environments whose runtime is a container image
    /// are not packaged.
    #[arg(short, long, default_value = "production", env = "PACKRS_ENV")]
    env: String,

    /// Archive backend. `auto` uses the external zip tool on macOS and the
    /// built-in writer elsewhere.
    #[arg(long, value_enum)]
    backend: Option<BackendChoice>,
}

/// # Handle Package Command (`handle_package`)
///
/// Packages the application root described by `args`.
///
/// ## Returns
///
/// * `Result<()>`: `Ok(())` when the archive was written or packaging was skipped.
///   Size-limit failures are returned unwrapped so `main` prints their message as is.
pub async fn handle_package(args: PackageArgs) -> Result<()> {
    info!("Handling package command...");
    debug!("Package args: {:?}", args);

    let app_dir = fs::canonicalize(&args.app)
        .with_context(|| format!("Failed to resolve application directory {:?}", args.app))?;
    if !app_dir.is_dir() {
        anyhow::bail!(PackrsError::ArgumentParsing(format!(
            "Application path is not a directory: {}",
            app_dir.display()
        )));
    }

    let cfg = config::load_config(&app_dir).context("Failed to load PackRS configuration")?;
    let mut package = cfg.package.clone();
    if let Some(backend) = args.backend {
        debug!("Backend overridden from the command line: {:?}", backend);
        package.backend = backend;
    }

    let build_dir = resolve_build_dir(&app_dir, args.build.as_deref(), &package)?;
    debug!("Build directory: {}", build_dir.display());

    // Both backends read the exclusions from the package settings.
    if let Some(nested) = nested_build_dir(&app_dir, &build_dir) {
        debug!("Excluding nested build directory {}", nested);
        package.exclude.push(nested);
    }
    let entries = entries::collect_entries(&app_dir, &package.exclude)?;

    let builder = ArchiveBuilder::from_config(ConsoleReporter, HostPlatform::detect(), &package);
    let skip = cfg.uses_container_image(&args.env);
    match builder.build(&app_dir, &build_dir, &entries, skip).await? {
        Some(report) => {
            info!(
                "Packaged {} bytes ({}MB) with the {} backend",
                report.bytes, report.size_mb, report.target.backend
            );
            if let Some(stats) = report.stats {
                debug!("{} files, {} empty directories", stats.files, stats.empty_dirs);
            }
            println!(
                "Application packaged: {}",
                report.target.destination.display()
            );
        }
        None => {
            println!(
                "Environment '{}' deploys a container image; packaging skipped.",
                args.env
            );
        }
    }
    Ok(())
}

/// Picks the build directory: flag, then configuration, then the application root's parent.
fn resolve_build_dir(
    app_dir: &Path,
    flag: Option<&Path>,
    package: &PackageConfig,
) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = &package.build_dir {
        return Ok(app_dir.join(dir));
    }
    app_dir.parent().map(Path::to_path_buf).ok_or_else(|| {
        anyhow::anyhow!(PackrsError::Config(format!(
            "Application directory {} has no parent; set package.build_dir or pass --build",
            app_dir.display()
        )))
    })
}

/// Archive-relative path of `build_dir` when it lies inside `app_dir`.
fn nested_build_dir(app_dir: &Path, build_dir: &Path) -> Option<String> {
    let build_dir = if build_dir.is_absolute() {
        build_dir.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(build_dir)
    };
    let build_dir = fs::canonicalize(&build_dir).unwrap_or(build_dir);
    let relative = build_dir.strip_prefix(app_dir).ok()?;
    let relative = archive_path(relative);
    (!relative.is_empty()).then_some(relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_build_dir_precedence() -> Result<()> {
        let temp_dir = tempdir()?;
        let app = temp_dir.path().join("app");
        let mut package = PackageConfig::default();

        assert_eq!(resolve_build_dir(&app, None, &package)?, temp_dir.path());

        package.build_dir = Some(".packrs/build".to_string());
        assert_eq!(
            resolve_build_dir(&app, None, &package)?,
            app.join(".packrs/build")
        );

        let flag = temp_dir.path().join("dist");
        assert_eq!(resolve_build_dir(&app, Some(&flag), &package)?, flag);
        Ok(())
    }

    #[test]
    fn test_nested_build_dir() -> Result<()> {
        let temp_dir = tempdir()?;
        let app = fs::canonicalize(temp_dir.path())?.join("app");
        fs::create_dir_all(app.join(".packrs/build"))?;

        assert_eq!(
            nested_build_dir(&app, &app.join(".packrs/build")),
            Some(".packrs/build".to_string())
        );
        assert_eq!(nested_build_dir(&app, app.parent().unwrap()), None);
        assert_eq!(nested_build_dir(&app, &app), None);
        Ok(())
    }

    #[test]
    fn test_package_args_defaults() {
        let args = PackageArgs::try_parse_from(["package"]).unwrap();
        assert_eq!(args.app, PathBuf::from("."));
        assert!(args.build.is_none());
        assert!(args.backend.is_none());

        let args =
            PackageArgs::try_parse_from(["package", "--backend", "writer", "-e", "staging"])
                .unwrap();
        assert_eq!(args.backend, Some(BackendChoice::Writer));
        assert_eq!(args.env, "staging");
    }
}
