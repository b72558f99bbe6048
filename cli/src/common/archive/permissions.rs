//! # Archive Entry Permissions (`common::archive::permissions`)
//!
//! File: cli/src/common/archive/permissions.rs
//!
//! Decides which Unix mode each archive entry carries. Directories and the
//! embedded `php` runtime binary always get `-r-xr-xr-x` (`0o100555`, decimal
//! 33133): source checkouts do not reliably keep the execute bit on the
//! runtime. Everything else carries the mode reported by the filesystem,
//! unless an override is configured for its archive path.
//!
use super::FileEntry;
use crate::core::error::Result;
use anyhow::Context;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Mode given to directories and the runtime binary.
pub const FIXED_MODE: u32 = 0o100555;

/// File name of the embedded runtime binary.
pub const RUNTIME_BINARY: &str = "php";

/// Mode assumed for regular files on hosts that report no Unix mode.
#[cfg(not(unix))]
pub const FALLBACK_FILE_MODE: u32 = 0o100644;

/// Derives the 16-bit Unix mode embedded for an entry.
#[derive(Debug, Clone, Default)]
pub struct PermissionPolicy {
    overrides: BTreeMap<String, u32>,
}

impl PermissionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Modes keyed by archive-relative path. Consulted for regular files only.
    pub fn with_overrides(overrides: BTreeMap<String, u32>) -> Self {
        Self { overrides }
    }

    /// Returns the mode for `entry`.
    ///
    /// # Errors
    ///
    /// Fails when the entry's filesystem metadata cannot be read.
    pub fn mode_for(&self, entry: &FileEntry) -> Result<u32> {
        if entry.is_dir || entry.file_name() == RUNTIME_BINARY {
            return Ok(FIXED_MODE);
        }
        if let Some(mode) = self.overrides.get(&entry.relative_path) {
            return Ok(mode & 0xFFFF);
        }
        reported_mode(&entry.real_path)
    }
}

#[cfg(unix)]
fn reported_mode(path: &Path) -> Result<u32> {
    use std::os::unix::fs::PermissionsExt;
    let metadata = fs::metadata(path)
        .with_context(|| format!("Failed to read permissions of {}", path.display()))?;
    Ok(metadata.permissions().mode() & 0xFFFF)
}

#[cfg(not(unix))]
fn reported_mode(path: &Path) -> Result<u32> {
    fs::metadata(path)
        .with_context(|| format!("Failed to read permissions of {}", path.display()))?;
    Ok(FALLBACK_FILE_MODE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_fixed_mode_is_read_execute_only() {
        assert_eq!(FIXED_MODE, 33133);
        assert_eq!(FIXED_MODE & 0o777, 0o555);
    }

    #[test]
    fn test_directories_and_runtime_get_fixed_mode() -> Result<()> {
        let temp_dir = tempdir()?;
        let policy = PermissionPolicy::new();

        // Neither path needs to exist: the fixed mode never touches the filesystem.
        let dir = FileEntry::directory(temp_dir.path().join("public"), "public");
        let php = FileEntry::file(temp_dir.path().join("missing/php"), "php", 0);
        assert_eq!(policy.mode_for(&dir)?, FIXED_MODE);
        assert_eq!(policy.mode_for(&php)?, FIXED_MODE);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_runtime_ignores_real_mode() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let temp_dir = tempdir()?;
        let php_path = temp_dir.path().join("php");
        fs::write(&php_path, "#!/bin/sh\n")?;
        fs::set_permissions(&php_path, fs::Permissions::from_mode(0o644))?;

        let entry = FileEntry::file(&php_path, "php", 10);
        assert_eq!(PermissionPolicy::new().mode_for(&entry)?, FIXED_MODE);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_regular_file_uses_reported_mode() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let temp_dir = tempdir()?;
        let script = temp_dir.path().join("artisan");
        fs::write(&script, "<?php\n")?;
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;

        let entry = FileEntry::file(&script, "artisan", 6);
        assert_eq!(PermissionPolicy::new().mode_for(&entry)?, 0o100755);
        Ok(())
    }

    #[test]
    fn test_override_applies_to_files_only() -> Result<()> {
        let temp_dir = tempdir()?;
        let console = temp_dir.path().join("console");
        fs::write(&console, "")?;

        let mut overrides = BTreeMap::new();
        overrides.insert("bin/console".to_string(), 0o100750);
        overrides.insert("public".to_string(), 0o40700);
        overrides.insert("php".to_string(), 0o100700);
        let policy = PermissionPolicy::with_overrides(overrides);

        let file = FileEntry::file(&console, "bin/console", 0);
        assert_eq!(policy.mode_for(&file)?, 0o100750);
        let dir = FileEntry::directory(temp_dir.path(), "public");
        assert_eq!(policy.mode_for(&dir)?, FIXED_MODE);
        let php = FileEntry::file(&console, "php", 0);
        assert_eq!(policy.mode_for(&php)?, FIXED_MODE);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let entry = FileEntry::file("/nonexistent/packrs/file.txt", "file.txt", 0);
        let result = PermissionPolicy::new().mode_for(&entry);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to read permissions"));
    }
}
