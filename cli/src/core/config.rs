//! # PackRS Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements the configuration system for PackRS, handling loading,
//! merging, validation, and access to configuration data. It combines built-in
//! defaults, user settings, and project-specific overrides.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.packrs.toml` in the application directory or its ancestors
//! 2. User-specific `config.toml` in the platform config directory
//! 3. Default values defined in the code
//!
//! The project search stops at the first directory containing `.git`.
//!
//! ## Examples
//!
//! ```rust
//! let cfg = config::load_config(app_dir)?;
//!
//! // Is this environment deployed as a container image?
//! let skip = cfg.uses_container_image("production");
//!
//! // Permission overrides for the archive
//! let overrides = &cfg.package.permissions;
//! ```
//!
//! The configuration is loaded once per command execution and passed
//! to the modules that need it.
//!
use crate::common::archive::BackendChoice;
use crate::core::error::{PackrsError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub package: PackageConfig,
    /// Deployment environments keyed by name (e.g. `production`, `staging`).
    #[serde(default)]
    pub environments: HashMap<String, EnvironmentConfig>,
}

/// Settings for the `package` step.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PackageConfig {
    /// Which archive backend to use. `auto` selects by host platform.
    #[serde(default)]
    pub backend: BackendChoice,
    /// Program invoked by the external-tool backend.
    #[serde(default = "default_zip_program")]
    pub zip_program: String,
    /// Optional timeout for the external-tool backend, in seconds.
    #[serde(default)]
    pub zip_timeout_secs: Option<u64>,
    /// Archive-relative paths left out of the package (matched as path prefixes).
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Build directory receiving `app.zip`. Relative paths resolve against the
    /// application root; unset means the application root's parent.
    #[serde(default)]
    pub build_dir: Option<String>,
    /// Mode overrides, keyed by archive-relative path.
    #[serde(default)]
    pub permissions: BTreeMap<String, u32>,
}

/// A single deployment environment.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Runtime identifier. `docker` runtimes deploy a container image instead of `app.zip`.
    pub runtime: Option<String>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            backend: BackendChoice::default(),
            zip_program: default_zip_program(),
            zip_timeout_secs: None,
            exclude: Vec::new(),
            build_dir: None,
            permissions: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Whether the named environment is deployed from a container image,
    /// in which case no archive is built.
    pub fn uses_container_image(&self, environment: &str) -> bool {
        self.environments
            .get(environment)
            .and_then(|env| env.runtime.as_deref())
            .map_or(false, |runtime| runtime.starts_with("docker"))
    }
}

fn default_zip_program() -> String {
    "zip".to_string()
}

const PROJECT_CONFIG_FILENAME: &str = ".packrs.toml";

/// Loads, merges, expands and validates the configuration for the
/// application rooted at `app_dir`.
pub fn load_config(app_dir: &Path) -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config(app_dir)?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "PackRS", "packrs") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config(app_dir: &Path) -> Result<Option<Config>> {
    if let Some(project_config_path) = find_project_config_path(app_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!(
            "No project configuration file ({}) found in {} or its ancestors.",
            PROJECT_CONFIG_FILENAME,
            app_dir.display()
        );
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    let defaults = PackageConfig::default();
    let mut merged = Config::default();
    merged.package.backend = if project_cfg.package.backend != defaults.backend {
        project_cfg.package.backend
    } else {
        user.package.backend
    };
    merged.package.zip_program = if project_cfg.package.zip_program != defaults.zip_program {
        project_cfg.package.zip_program
    } else {
        user.package.zip_program
    };
    merged.package.zip_timeout_secs = project_cfg
        .package
        .zip_timeout_secs
        .or(user.package.zip_timeout_secs);
    merged.package.exclude = if !project_cfg.package.exclude.is_empty() {
        project_cfg.package.exclude
    } else {
        user.package.exclude
    };
    merged.package.build_dir = project_cfg.package.build_dir.or(user.package.build_dir);
    // Per-path overrides combine; the project wins on conflicts.
    merged.package.permissions = user.package.permissions;
    merged
        .package
        .permissions
        .extend(project_cfg.package.permissions);
    merged.environments = user.environments;
    merged.environments.extend(project_cfg.environments);
    merged
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    if let Some(build_dir) = config.package.build_dir.as_mut() {
        *build_dir = shellexpand::tilde(build_dir.as_str()).into_owned();
        debug!("Expanded build directory: {}", build_dir);
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    let package = &config.package;
    if package.zip_program.trim().is_empty() {
        return Err(anyhow!(PackrsError::Config(
            "package.zip_program cannot be empty.".to_string()
        )));
    }
    if package.zip_timeout_secs == Some(0) {
        return Err(anyhow!(PackrsError::Config(
            "package.zip_timeout_secs must be greater than zero.".to_string()
        )));
    }
    if matches!(package.build_dir.as_deref(), Some(dir) if dir.trim().is_empty()) {
        return Err(anyhow!(PackrsError::Config(
            "package.build_dir cannot be empty.".to_string()
        )));
    }
    for pattern in &package.exclude {
        if pattern.trim().is_empty() {
            return Err(anyhow!(PackrsError::Config(
                "package.exclude cannot contain empty entries.".to_string()
            )));
        }
    }
    for (path, mode) in &package.permissions {
        if path.is_empty() || path.starts_with('/') || path.contains('\\') {
            return Err(anyhow!(PackrsError::Config(format!(
                "Invalid permission override path '{}'. Expected a relative path using '/'.",
                path
            ))));
        }
        if *mode > 0xFFFF {
            return Err(anyhow!(PackrsError::Config(format!(
                "Permission override for '{}' is not a 16-bit mode: {:#o}",
                path, mode
            ))));
        }
    }
    info!("Configuration validation successful.");
    Ok(())
}
