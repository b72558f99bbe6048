//! # PackRS Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Filesystem helpers used by the packaging step:
//!
//! - **`entries`**: Walks the application root and produces the ordered `FileEntry` list.
//! - **`io`**: Build-directory preparation and artifact cleanup.
//! - **`size`**: Measures the uncompressed size of a tree (`directory_size`).
//!
//! As elsewhere in `common`, callers import the submodule they need
//! (`crate::common::fs::size::directory_size`).
//!

/// Application file enumeration (`collect_entries`).
pub mod entries;
/// Basic file I/O operations (`ensure_dir_exists`, `remove_file_if_exists`).
pub mod io;
/// Recursive size measurement (`directory_size`).
pub mod size;
