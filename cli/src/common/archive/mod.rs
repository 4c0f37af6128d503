//! # Archiver Archive Utilities Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! This module holds the building blocks for producing one archive file:
//!
//! - **`naming`**: Derives the destination file name
//!   (`<stem>_<yyyyMMdd_HHmmss_fff>_<user>.zip`).
//! - **`zip`**: The compressor. Writes an ordered list of entries into a single
//!   `.zip` container at maximum Deflate compression.
//!
//! The shared value types (`ArchiveEntry`, `ArchiveTarget`) live here so that the
//! filesystem walker, the compressor and the archiver command agree on them.
//!
//! ```rust
//! use crate::common::archive::{naming::Namer, zip::ZipCompressor, ArchiveTarget};
//!
//! let namer = Namer::from_env();
//! let target = ArchiveTarget::new(archive_dir, namer.name("report.txt", false));
//! ZipCompressor.write(&target.path(), &entries, &mut sink)?;
//! ```
//!
use std::path::PathBuf;

pub mod naming;
pub mod zip;

/// Extension of every produced archive.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// One item to place in an archive: where it is read from and the path it
/// gets inside the archive.
///
/// `archive_path` always uses `/` separators. A directory entry has no source
/// content to copy and its archive path ends with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub source_path: PathBuf,
    pub archive_path: String,
    pub is_directory: bool,
}

impl ArchiveEntry {
    /// Entry for a regular file.
    pub fn file(source_path: impl Into<PathBuf>, archive_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            archive_path: archive_path.into(),
            is_directory: false,
        }
    }

    /// Entry for a (possibly empty) directory. A trailing `/` is added if missing.
    pub fn directory(source_path: impl Into<PathBuf>, archive_path: impl Into<String>) -> Self {
        let mut archive_path = archive_path.into();
        if !archive_path.ends_with('/') {
            archive_path.push('/');
        }
        Self {
            source_path: source_path.into(),
            archive_path,
            is_directory: true,
        }
    }
}

/// Where an archive is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveTarget {
    pub destination_directory: PathBuf,
    pub file_name: String,
}

impl ArchiveTarget {
    pub fn new(destination_directory: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            destination_directory: destination_directory.into(),
            file_name: file_name.into(),
        }
    }

    /// Full path of the archive file.
    pub fn path(&self) -> PathBuf {
        self.destination_directory.join(&self.file_name)
    }
}
