//! # PackRS Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout PackRS. Every failure
//! in the packaging step is fatal: nothing here is retried or recovered in
//! place, so the error's message is what the user sees before the process
//! exits with a non-zero status.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `PackrsError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover:
//! - Configuration errors
//! - Filesystem and traversal errors
//! - Archive I/O errors raised by the structured zip writer
//! - External command failures (the `zip` tool)
//! - The 250MB size ceiling
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if !path.is_dir() {
//!     return Err(PackrsError::FileSystem(format!("Not a directory: {}", path.display())))?;
//! }
//!
//! // Pattern matching on error types
//! match result {
//!     Err(e) if matches!(e.downcast_ref::<PackrsError>(), Some(PackrsError::SizeLimitExceeded { .. })) => {
//!         // The application is too large to deploy.
//!     }
//!     other => other?,
//! }
//! ```
//!
//! `SizeLimitExceeded` is returned without added context so that `main`
//! prints its message verbatim.
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the PackRS application.
#[derive(Error, Debug)]
pub enum PackrsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Failed to traverse '{}': {source}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to write archive '{}': {source}", path.display())]
    ArchiveIo {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("External command failed: {cmd}, Status: {status}, Output:\n{output}")]
    ExternalCommand {
        cmd: String,
        status: String,
        output: String,
    },

    #[error("Application is greater than {limit_mb}MB. Your application is {size_mb}MB.")]
    SizeLimitExceeded { size_mb: u64, limit_mb: u64 },

    #[error("Argument parsing error: {0}")]
    ArgumentParsing(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = PackrsError::Config("Missing setting 'foo'".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: Missing setting 'foo'"
        );

        let too_large = PackrsError::SizeLimitExceeded {
            size_mb: 260,
            limit_mb: 250,
        };
        assert_eq!(
            too_large.to_string(),
            "Application is greater than 250MB. Your application is 260MB."
        );

        let tool = PackrsError::ExternalCommand {
            cmd: "zip -r /tmp/app.zip .".into(),
            status: "1".into(),
            output: "zip error: Nothing to do!".into(),
        };
        assert!(tool.to_string().contains("Status: 1"));
        assert!(tool.to_string().contains("Nothing to do!"));
    }

    #[test]
    fn test_size_limit_survives_anyhow() {
        let err: anyhow::Error = PackrsError::SizeLimitExceeded {
            size_mb: 251,
            limit_mb: 250,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Application is greater than 250MB. Your application is 251MB."
        );
        assert!(matches!(
            err.downcast_ref::<PackrsError>(),
            Some(PackrsError::SizeLimitExceeded { size_mb: 251, .. })
        ));
    }
}
