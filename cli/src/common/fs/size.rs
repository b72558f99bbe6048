//! # Directory Size Measurement (`common::fs::size`)
//!
//! File: cli/src/common/fs/size.rs
//!
//! Sums the bytes of every regular file below a root. Directories contribute
//! nothing themselves. Symbolic links are followed, so a linked file counts
//! with its target's size. The total does not depend on traversal order.
//!
//! An entry that cannot be read aborts the measurement with
//! `PackrsError::Traversal`: reporting zero for an unreadable tree would let an
//! oversized package through the size check.
//!
use crate::core::error::{PackrsError, Result};
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Total size in bytes of all regular files under `root`.
pub fn directory_size(root: &Path) -> Result<u64> {
    let traversal_err = |source: walkdir::Error| PackrsError::Traversal {
        path: source
            .path()
            .map_or_else(|| root.to_path_buf(), Path::to_path_buf),
        source,
    };

    let mut total: u64 = 0;
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(traversal_err)?;
        if entry.file_type().is_file() {
            total += entry.metadata().map_err(traversal_err)?.len();
        }
    }
    debug!("Measured {} bytes under {}", total, root.display());
    Ok(total)
}
