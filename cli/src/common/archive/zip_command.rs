//! # External Zip Tool Backend (`common::archive::zip_command`)
//!
//! File: cli/src/common/archive/zip_command.rs
//!
//! Compresses the whole application directory with the platform's `zip`
//! utility (`zip -r <destination> .`, run from the application root). Used on
//! macOS.
//!
//! The tool's own behavior preserves permission bits and empty directories, so
//! the entry list is not consulted. Exclusions are passed to the tool instead:
//! each excluded path `p` becomes the `-x` patterns `p` and `p/*`, which cover
//! the path and everything below it. The tool is never retried: a non-zero exit
//! fails the step with the tool's output attached.
//!
use super::{ArchiveBackend, ArchiveStats, BackendKind, FileEntry};
use crate::common::fs::entries::exclusion_patterns;
use crate::common::process;
use crate::core::error::{PackrsError, Result};
use anyhow::anyhow;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Shells out to an external recursive zip command.
#[derive(Debug, Clone)]
pub struct ZipCommandBackend {
    program: String,
    timeout: Option<Duration>,
    exclude: Vec<String>,
}

impl Default for ZipCommandBackend {
    fn default() -> Self {
        Self::new("zip", None)
    }
}

impl ZipCommandBackend {
    pub fn new(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
            exclude: Vec::new(),
        }
    }

    /// Archive-relative paths the tool must leave out.
    pub fn with_exclusions(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    fn arguments(&self, destination: &str) -> Vec<String> {
        let mut args = vec!["-r".to_string(), destination.to_string(), ".".to_string()];
        let patterns = exclusion_patterns(&self.exclude);
        if !patterns.is_empty() {
            args.push("-x".to_string());
            for pattern in patterns {
                args.push(pattern.to_string());
                args.push(format!("{}/*", pattern));
            }
        }
        args
    }
}

impl ArchiveBackend for ZipCommandBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::ZipCommand
    }

    async fn write_archive(
        &self,
        app_dir: &Path,
        _entries: &[FileEntry],
        destination: &Path,
    ) -> Result<Option<ArchiveStats>> {
        if !destination.is_absolute() {
            return Err(anyhow!(PackrsError::FileSystem(format!(
                "Archive destination must be absolute when running '{}': {}",
                self.program,
                destination.display()
            ))));
        }
        // zip updates an existing archive in place instead of replacing it.
        if destination.exists() {
            debug!("Removing existing archive {}", destination.display());
            fs::remove_file(destination).map_err(|e| {
                PackrsError::FileSystem(format!(
                    "Failed to remove existing archive {}: {}",
                    destination.display(),
                    e
                ))
            })?;
        }

        let destination_arg = destination.to_string_lossy();
        let args = self.arguments(&destination_arg);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let output =
            process::run_command_capture(&self.program, &args, Some(app_dir), self.timeout)
                .await?;
        debug!("{} output:\n{}", self.program, output.stdout);
        info!("Compressed {} with {}", app_dir.display(), self.program);
        Ok(None)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_failing_tool_is_external_command_error() {
        let temp_dir = tempdir().unwrap();
        let destination = temp_dir.path().join("app.zip");
        let backend = ZipCommandBackend::new("false", None);

        let err = backend
            .write_archive(temp_dir.path(), &[], &destination)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PackrsError>(),
            Some(PackrsError::ExternalCommand { status, .. }) if status == "1"
        ));
    }

    #[tokio::test]
    async fn test_removes_stale_archive_and_passes_arguments() -> Result<()> {
        let temp_dir = tempdir()?;
        let app = temp_dir.path().join("app");
        fs::create_dir(&app)?;
        let destination = temp_dir.path().join("app.zip");
        fs::write(&destination, "stale")?;

        // Stand-in for zip: records its arguments and working directory in the archive path.
        let script = temp_dir.path().join("fake-zip.sh");
        fs::write(&script, "#!/bin/sh\necho \"$@\" > \"$2\"\npwd >> \"$2\"\n")?;
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;
        }

        let backend = ZipCommandBackend::new(script.to_string_lossy(), None);
        let stats = backend.write_archive(&app, &[], &destination).await?;
        assert_eq!(stats, None);

        let recorded = fs::read_to_string(&destination)?;
        let mut lines = recorded.lines();
        assert_eq!(
            lines.next(),
            Some(format!("-r {} .", destination.display()).as_str())
        );
        assert_eq!(
            fs::canonicalize(lines.next().unwrap())?,
            fs::canonicalize(&app)?
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_exclusions_become_tool_patterns() -> Result<()> {
        let temp_dir = tempdir()?;
        let app = temp_dir.path().join("app");
        fs::create_dir(&app)?;
        let destination = temp_dir.path().join("app.zip");

        let script = temp_dir.path().join("fake-zip.sh");
        fs::write(&script, "#!/bin/sh\necho \"$@\" > \"$2\"\n")?;
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;
        }

        let backend = ZipCommandBackend::new(script.to_string_lossy(), None).with_exclusions(vec![
            "node_modules/".to_string(),
            ".packrs/build".to_string(),
        ]);
        backend.write_archive(&app, &[], &destination).await?;

        // The shell does not glob-expand quoted "$@", so patterns arrive verbatim.
        assert_eq!(
            fs::read_to_string(&destination)?.trim_end(),
            format!(
                "-r {} . -x node_modules node_modules/* .packrs/build .packrs/build/*",
                destination.display()
            )
        );
        Ok(())
    }

    #[test]
    fn test_arguments_without_exclusions() {
        let backend = ZipCommandBackend::default();
        assert_eq!(backend.arguments("/tmp/app.zip"), vec!["-r", "/tmp/app.zip", "."]);
    }

    #[tokio::test]
    async fn test_rejects_relative_destination() {
        let temp_dir = tempdir().unwrap();
        let backend = ZipCommandBackend::default();
        let err = backend
            .write_archive(temp_dir.path(), &[], Path::new("build/app.zip"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("must be absolute"));
    }
}
