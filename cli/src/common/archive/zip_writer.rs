//! # Structured Zip Writer Backend (`common::archive::zip_writer`)
//!
//! File: cli/src/common/archive/zip_writer.rs
//!
//! ## Overview
//!
//! Builds `app.zip` entry by entry with the `zip` crate, in the order the entries
//! are given. Naive enumeration loses two things this backend restores:
//!
//! - **Unix modes.** Every entry is tagged as Unix-originated and its mode from
//!   `PermissionPolicy` is stored, unchanged, in the upper 16 bits of the
//!   external attributes.
//! - **Empty directories.** A directory with no children becomes an explicit
//!   directory record. Non-empty directories are skipped: they appear through
//!   the paths of their files.
//!
//! `zip` only accepts `mode & 0o777` and then ORs in its own file-type bits, so
//! the writer records each entry's full mode and, once the archive is finished,
//! rewrites the external-attribute field of every central directory record
//! (`stamp_external_attributes`). Local headers carry no external attributes.
//!
//! Every open, write and finalize failure is returned as
//! `PackrsError::ArchiveIo`.
//!
use super::permissions::PermissionPolicy;
use super::{ArchiveBackend, ArchiveStats, BackendKind, FileEntry};
use crate::core::error::{PackrsError, Result};
use anyhow::Context;
use chrono::{Datelike, Local, Timelike};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Entries at or above this size are written with Zip64 extensions.
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// Offset of the external-attribute field within a central directory record.
const CENTRAL_EXTERNAL_ATTRIBUTES_OFFSET: u64 = 38;

/// Writes archives entry by entry with explicit metadata.
#[derive(Debug, Clone, Default)]
pub struct ZipWriterBackend {
    policy: PermissionPolicy,
}

impl ZipWriterBackend {
    pub fn new(policy: PermissionPolicy) -> Self {
        Self { policy }
    }

    /// Creates (or overwrites) `destination` and writes `entries` into it.
    pub fn write_entries(&self, entries: &[FileEntry], destination: &Path) -> Result<ArchiveStats> {
        let archive_err = |source: zip::result::ZipError| PackrsError::ArchiveIo {
            path: destination.to_path_buf(),
            source,
        };

        // Read access is needed to locate the central directory afterwards.
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(destination)
            .map_err(|e| archive_err(e.into()))?;
        let mut zip = ZipWriter::new(file);
        let mut stats = ArchiveStats::default();
        let mut modes = Vec::with_capacity(entries.len());

        for entry in entries {
            let mode = self.policy.mode_for(entry)?;
            if entry.is_dir {
                if !is_empty_dir(&entry.real_path)? {
                    continue;
                }
                let options = FileOptions::default()
                    .unix_permissions(mode)
                    .last_modified_time(entry_timestamp(&entry.real_path));
                zip.add_directory(entry.relative_path.as_str(), options)
                    .map_err(archive_err)?;
                debug!("Added empty directory {} (mode {:o})", entry.relative_path, mode);
                modes.push(mode);
                stats.empty_dirs += 1;
                continue;
            }

            let metadata = fs::metadata(&entry.real_path)
                .with_context(|| format!("Failed to stat {}", entry.real_path.display()))?;
            if !metadata.is_file() {
                anyhow::bail!(PackrsError::FileSystem(format!(
                    "Not a regular file, cannot archive: {}",
                    entry.real_path.display()
                )));
            }
            let size = metadata.len();
            let mut source = File::open(&entry.real_path)
                .with_context(|| format!("Failed to open {}", entry.real_path.display()))?;
            let options = FileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .unix_permissions(mode)
                .last_modified_time(entry_timestamp(&entry.real_path))
                .large_file(size >= ZIP64_THRESHOLD);
            zip.start_file(entry.relative_path.as_str(), options)
                .map_err(archive_err)?;
            io::copy(&mut source, &mut zip).map_err(|e| archive_err(e.into()))?;
            debug!("Added {} ({} bytes, mode {:o})", entry.relative_path, size, mode);
            modes.push(mode);
            stats.files += 1;
        }

        let file = zip.finish().map_err(archive_err)?;
        let mut file = stamp_external_attributes(file, &modes).map_err(archive_err)?;
        file.flush().map_err(|e| archive_err(e.into()))?;
        file.sync_all().map_err(|e| archive_err(e.into()))?;

        info!(
            "Wrote {} files and {} empty directories to {}",
            stats.files,
            stats.empty_dirs,
            destination.display()
        );
        Ok(stats)
    }
}

impl ArchiveBackend for ZipWriterBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::ZipWriter
    }

    async fn write_archive(
        &self,
        _app_dir: &Path,
        entries: &[FileEntry],
        destination: &Path,
    ) -> Result<Option<ArchiveStats>> {
        self.write_entries(entries, destination).map(Some)
    }
}

/// Overwrites the external attributes of each central directory record with
/// `mode << 16`, `modes` being in archive order.
fn stamp_external_attributes(file: File, modes: &[u32]) -> zip::result::ZipResult<File> {
    let mut archive = ZipArchive::new(file)?;
    if archive.len() != modes.len() {
        return Err(zip::result::ZipError::InvalidArchive(
            "central directory does not match the written entries",
        ));
    }
    let offsets = (0..archive.len())
        .map(|index| {
            archive
                .by_index_raw(index)
                .map(|entry| entry.central_header_start())
        })
        .collect::<zip::result::ZipResult<Vec<u64>>>()?;

    let mut file = archive.into_inner();
    for (offset, mode) in offsets.into_iter().zip(modes) {
        file.seek(SeekFrom::Start(offset + CENTRAL_EXTERNAL_ATTRIBUTES_OFFSET))?;
        file.write_all(&((mode & 0xFFFF) << 16).to_le_bytes())?;
    }
    Ok(file)
}

/// True when `path` has no children.
fn is_empty_dir(path: &Path) -> Result<bool> {
    let mut children = fs::read_dir(path)
        .with_context(|| format!("Failed to read directory {}", path.display()))?;
    Ok(children.next().is_none())
}

/// Local modification time as a zip timestamp. Times outside the zip range
/// (before 1980 or after 2107) fall back to 1980-01-01.
fn entry_timestamp(path: &Path) -> zip::DateTime {
    let Ok(modified) = fs::metadata(path).and_then(|m| m.modified()) else {
        return zip::DateTime::default();
    };
    let local: chrono::DateTime<Local> = modified.into();
    let Ok(year) = u16::try_from(local.year()) else {
        return zip::DateTime::default();
    };
    zip::DateTime::from_date_and_time(
        year,
        local.month() as u8,
        local.day() as u8,
        local.hour() as u8,
        local.minute() as u8,
        local.second().min(59) as u8,
    )
    .unwrap_or_default()
}
