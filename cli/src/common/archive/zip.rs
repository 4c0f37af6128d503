//! # Zip Archive Writer (`common::archive::zip`)
//!
//! File: cli/src/common/archive/zip.rs
//!
//! ## Overview
//!
//! This module writes a single `.zip` container from an ordered list of
//! `ArchiveEntry` values. It is the only place that talks to the `zip` crate.
//!
//! ## Behaviour
//!
//! - Every entry is stored with Deflate at level 9. The level is fixed and not
//!   configurable.
//! - Entries are added in the order supplied. An `Archived` progress event is
//!   reported once an entry's data has been handed to the writer completely.
//! - The central directory is written last (`ZipWriter::finish`), so the file
//!   is only a readable archive once `write` has returned `Ok`.
//! - The writer is owned by the `write` call and dropped on every exit path.
//!   When anything fails, the partially written file is deleted and a
//!   `ArchiverError::WriteFailure` is returned.
//!
//! ## Usage
//!
//! ```rust
//! let entries = vec![ArchiveEntry::file("/home/me/notes.md", "notes.md")];
//! let size = ZipCompressor.write(&target.path(), &entries, &mut sink)?;
//! ```
//!
use super::ArchiveEntry;
use crate::core::error::{ArchiverError, Result};
use crate::core::progress::{ProgressEvent, ProgressSink};
use ::zip::result::ZipError;
use ::zip::write::SimpleFileOptions;
use ::zip::{CompressionMethod, ZipWriter};
use anyhow::anyhow;
use chrono::{Datelike, Local, Timelike};
use std::fs::{self, File, Metadata};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Highest Deflate level; slowest, smallest output.
pub const MAX_COMPRESSION_LEVEL: i64 = 9;

/// Entries at or above this size need zip64 headers.
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// Failure while appending one entry; `path` names the file at fault (the
/// source being read, or the archive being written).
struct EntryError {
    path: PathBuf,
    source: ZipError,
}

/// Writes zip archives at maximum compression.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipCompressor;

impl ZipCompressor {
    /// # Write Archive (`write`)
    ///
    /// Creates (or overwrites) `destination` and writes `entries` into it.
    ///
    /// ## Returns
    ///
    /// * `Result<u64>` - The size of the finished archive in bytes.
    ///
    /// ## Errors
    ///
    /// Returns `ArchiverError::WriteFailure` if the destination cannot be
    /// created, a source entry cannot be read, or the container cannot be
    /// written or finalized (disk full, permission denied, path too long).
    /// No partial archive is left behind in that case.
    pub fn write(
        &self,
        destination: &Path,
        entries: &[ArchiveEntry],
        sink: &mut dyn ProgressSink,
    ) -> Result<u64> {
        let file = File::create(destination).map_err(|e| write_failure(destination, e.into()))?;
        debug!("Opened archive {} for writing", destination.display());

        let mut writer = ZipWriter::new(file);
        let written = match append_entries(&mut writer, destination, entries, sink) {
            Ok(()) => writer.finish().map_err(|source| EntryError {
                path: destination.to_path_buf(),
                source,
            }),
            Err(e) => {
                // Release the handle before the file is removed.
                drop(writer);
                Err(e)
            }
        };

        match written {
            Ok(file) => {
                let size = file
                    .metadata()
                    .map_err(|e| write_failure(destination, e.into()))?
                    .len();
                debug!(
                    "Finished archive {} ({} entries, {} bytes)",
                    destination.display(),
                    entries.len(),
                    size
                );
                Ok(size)
            }
            Err(EntryError { path, source }) => {
                discard_partial(destination);
                Err(write_failure(&path, source))
            }
        }
    }
}

fn append_entries(
    writer: &mut ZipWriter<File>,
    destination: &Path,
    entries: &[ArchiveEntry],
    sink: &mut dyn ProgressSink,
) -> std::result::Result<(), EntryError> {
    let at_destination = |source: ZipError| EntryError {
        path: destination.to_path_buf(),
        source,
    };
    let at_source = |path: &Path, source: io::Error| EntryError {
        path: path.to_path_buf(),
        source: source.into(),
    };

    for entry in entries {
        if entry.is_directory {
            let metadata = fs::metadata(&entry.source_path)
                .map_err(|e| at_source(&entry.source_path, e))?;
            writer
                .add_directory(entry.archive_path.clone(), entry_options(&metadata))
                .map_err(at_destination)?;
        } else {
            let mut source =
                File::open(&entry.source_path).map_err(|e| at_source(&entry.source_path, e))?;
            let metadata = source
                .metadata()
                .map_err(|e| at_source(&entry.source_path, e))?;
            writer
                .start_file(entry.archive_path.clone(), entry_options(&metadata))
                .map_err(at_destination)?;
            copy_entry(&mut source, writer).map_err(|e| match e {
                CopyError::Read(e) => at_source(&entry.source_path, e),
                CopyError::Write(e) => at_destination(e.into()),
            })?;
        }
        sink.report(ProgressEvent::Archived {
            entry: entry.archive_path.clone(),
        });
    }
    Ok(())
}

/// Which side of an entry copy failed.
#[derive(Debug)]
enum CopyError {
    Read(io::Error),
    Write(io::Error),
}

const COPY_BUFFER_SIZE: usize = 64 * 1024;

fn copy_entry(
    source: &mut impl Read,
    writer: &mut impl Write,
) -> std::result::Result<(), CopyError> {
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    loop {
        let read = match source.read(&mut buffer) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };
        writer.write_all(&buffer[..read]).map_err(CopyError::Write)?;
    }
}

fn entry_options(metadata: &Metadata) -> SimpleFileOptions {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(MAX_COMPRESSION_LEVEL))
        .large_file(metadata.len() >= ZIP64_THRESHOLD);
    let options = match modified_time(metadata) {
        Some(time) => options.last_modified_time(time),
        None => options,
    };
    #[cfg(unix)]
    let options = {
        use std::os::unix::fs::PermissionsExt;
        options.unix_permissions(metadata.permissions().mode())
    };
    options
}

/// Converts a file's mtime to a zip timestamp. Zip stores local time with a
/// 1980..=2107 range; anything outside it is left at the format's default.
fn modified_time(metadata: &Metadata) -> Option<::zip::DateTime> {
    let modified: chrono::DateTime<Local> = metadata.modified().ok()?.into();
    ::zip::DateTime::from_date_and_time(
        u16::try_from(modified.year()).ok()?,
        modified.month() as u8,
        modified.day() as u8,
        modified.hour() as u8,
        modified.minute() as u8,
        modified.second() as u8,
    )
    .ok()
}

fn discard_partial(destination: &Path) {
    match fs::remove_file(destination) {
        Ok(()) => debug!("Removed partial archive {}", destination.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(
            "Could not remove partial archive {}: {}",
            destination.display(),
            e
        ),
    }
}

fn write_failure(path: &Path, source: ZipError) -> anyhow::Error {
    anyhow!(ArchiverError::WriteFailure {
        path: path.to_path_buf(),
        source,
    })
}
