//! # Package Size Limits (`common::archive::limits`)
//!
//! File: cli/src/common/archive/limits.rs
//!
//! The deployment target rejects packages whose *uncompressed* contents exceed
//! 250MB, so the ceiling is checked against the tree's pre-compression byte
//! total, never against the size of `app.zip` itself.
//!
use crate::core::error::{PackrsError, Result};
use tracing::debug;

pub const BYTES_PER_MEGABYTE: u64 = 1_048_576;

/// Uncompressed package ceiling, in whole megabytes.
pub const SIZE_LIMIT_MB: u64 = 250;

/// Whole megabytes, rounded up.
pub fn megabytes_ceil(bytes: u64) -> u64 {
    bytes.div_ceil(BYTES_PER_MEGABYTE)
}

/// Megabytes rounded to two decimals, formatted without trailing zeros (`10`, `10.5`, `10.25`).
pub fn format_megabytes(bytes: u64) -> String {
    let megabytes = bytes as f64 / BYTES_PER_MEGABYTE as f64;
    let rounded = (megabytes * 100.0).round() / 100.0;
    format!("{}", rounded)
}

/// Checks `bytes` against the 250MB ceiling and returns the measured size in megabytes.
///
/// Exactly 250MB passes; anything that rounds up to 251MB fails.
///
/// # Errors
///
/// Returns `PackrsError::SizeLimitExceeded` carrying the measured size.
pub fn ensure_within_size_limit(bytes: u64) -> Result<u64> {
    let size_mb = megabytes_ceil(bytes);
    debug!("Application measures {} bytes ({}MB)", bytes, size_mb);
    if size_mb > SIZE_LIMIT_MB {
        return Err(PackrsError::SizeLimitExceeded {
            size_mb,
            limit_mb: SIZE_LIMIT_MB,
        }
        .into());
    }
    Ok(size_mb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_megabytes_ceil() {
        assert_eq!(megabytes_ceil(0), 0);
        assert_eq!(megabytes_ceil(1), 1);
        assert_eq!(megabytes_ceil(BYTES_PER_MEGABYTE), 1);
        assert_eq!(megabytes_ceil(BYTES_PER_MEGABYTE + 1), 2);
    }

    #[test]
    fn test_format_megabytes() {
        assert_eq!(format_megabytes(0), "0");
        assert_eq!(format_megabytes(10 * BYTES_PER_MEGABYTE), "10");
        assert_eq!(format_megabytes(10 * BYTES_PER_MEGABYTE + 42), "10");
        assert_eq!(format_megabytes(BYTES_PER_MEGABYTE / 2), "0.5");
        assert_eq!(format_megabytes(BYTES_PER_MEGABYTE / 4), "0.25");
        assert_eq!(format_megabytes(1_234_567), "1.18");
    }

    #[test]
    fn test_limit_boundary() {
        let exact = SIZE_LIMIT_MB * BYTES_PER_MEGABYTE;
        assert_eq!(ensure_within_size_limit(exact).unwrap(), 250);

        let err = ensure_within_size_limit(exact + 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Application is greater than 250MB. Your application is 251MB."
        );
    }

    #[test]
    fn test_limit_reports_measured_size() {
        let err = ensure_within_size_limit(260 * BYTES_PER_MEGABYTE).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PackrsError>(),
            Some(PackrsError::SizeLimitExceeded { size_mb: 260, limit_mb: 250 })
        ));
    }
}
