//! # Application File Enumeration (`common::fs::entries`)
//!
//! File: cli/src/common/fs/entries.rs
//!
//! ## Overview
//!
//! Produces the ordered `FileEntry` list handed to the archive builder. The
//! walk is sorted by file name so two runs over the same tree produce the same
//! entry order. Both files and directories are listed; whether a directory
//! becomes an archive entry is the writer's decision.
//!
//! ## Exclusions
//!
//! Each exclusion is an archive-relative path (`node_modules`, `storage/logs`).
//! It matches that path and everything below it, on component boundaries only:
//! excluding `storage/logs` keeps `storage/logs-archive`.
//!
use crate::common::archive::{archive_path, FileEntry};
use crate::core::error::{PackrsError, Result};
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Lists everything under `app_dir` except `exclude`d paths, in sorted walk order.
pub fn collect_entries(app_dir: &Path, exclude: &[String]) -> Result<Vec<FileEntry>> {
    let patterns = exclusion_patterns(exclude);

    let mut entries = Vec::new();
    let walker = WalkDir::new(app_dir)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let relative = relative_archive_path(app_dir, entry.path());
            !is_excluded(&relative, &patterns)
        });

    for entry in walker {
        let entry = entry.map_err(|source| PackrsError::Traversal {
            path: source
                .path()
                .map_or_else(|| app_dir.to_path_buf(), Path::to_path_buf),
            source,
        })?;
        let relative = relative_archive_path(app_dir, entry.path());
        let file_type = entry.file_type();
        if file_type.is_dir() {
            entries.push(FileEntry::directory(entry.path(), relative));
        } else if !file_type.is_file() {
            // Sockets, FIFOs and device nodes cannot be archived.
            warn!("Skipping {}: not a regular file or directory", relative);
        } else {
            let size = entry
                .metadata()
                .map_err(|source| PackrsError::Traversal {
                    path: entry.path().to_path_buf(),
                    source,
                })?
                .len();
            entries.push(FileEntry::file(entry.path(), relative, size));
        }
    }

    info!(
        "Collected {} entries from {}",
        entries.len(),
        app_dir.display()
    );
    Ok(entries)
}

/// Exclusions as bare archive-relative paths: trimmed, no leading or trailing `/`, blanks dropped.
pub fn exclusion_patterns(exclude: &[String]) -> Vec<&str> {
    exclude
        .iter()
        .map(|p| p.trim().trim_matches('/'))
        .filter(|p| !p.is_empty())
        .collect()
}

fn relative_archive_path(app_dir: &Path, path: &Path) -> String {
    let relative = pathdiff::diff_paths(path, app_dir).unwrap_or_else(|| path.to_path_buf());
    archive_path(&relative)
}

fn is_excluded(relative: &str, patterns: &[&str]) -> bool {
    let excluded = patterns.iter().any(|pattern| {
        relative == *pattern
            || relative
                .strip_prefix(pattern)
                .map_or(false, |rest| rest.starts_with('/'))
    });
    if excluded {
        debug!("Excluding {}", relative);
    }
    excluded
}
