//! # Archive Entry Collection (`common::fs::walk`)
//!
//! File: cli/src/common/fs/walk.rs
//!
//! Turns a source path into the `ArchiveEntry` list handed to the compressor.
//!
//! - A regular file becomes one entry named by its bare file name.
//! - A directory becomes one entry per descendant, with archive paths relative to
//!   the directory itself. The directory's own name is not part of any archive
//!   path, so extracting the archive reproduces the directory's contents at the
//!   extraction root. Empty sub-directories are kept as `name/` entries.
//!
//! The walk is sorted by file name, so the same tree always yields the same
//! entry order. Symbolic links are followed: a link to a directory is archived
//! as that directory's contents under the link's name, and a link to a file as
//! the file's bytes. A link cycle or a dangling link makes the tree
//! unreadable.
//!
use crate::common::archive::ArchiveEntry;
use crate::core::error::{ArchiverError, Result};
use anyhow::anyhow;
use std::io;
use std::path::{Component, Path};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Single entry for the file at `path`, named by its file name.
pub fn file_entry(path: &Path) -> Result<ArchiveEntry> {
    let name = path
        .file_name()
        .ok_or_else(|| {
            anyhow!(ArchiverError::SourceUnreadable {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
            })
        })?
        .to_string_lossy()
        .into_owned();
    Ok(ArchiveEntry::file(path, name))
}

/// Entries for every file and directory below `root` (not `root` itself).
///
/// # Errors
///
/// Returns `ArchiverError::SourceUnreadable` if any part of the tree cannot be
/// read.
pub fn directory_entries(root: &Path) -> Result<Vec<ArchiveEntry>> {
    let mut entries = Vec::new();
    for dir_entry in WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let dir_entry = dir_entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            let source = e.into_io_error().unwrap_or_else(|| {
                io::Error::new(io::ErrorKind::Other, "symbolic link loop detected")
            });
            anyhow!(ArchiverError::SourceUnreadable { path, source })
        })?;

        let relative = dir_entry
            .path()
            .strip_prefix(root)
            .map_err(|e| anyhow!("Walked outside of {}: {}", root.display(), e))?;
        let archive_path = to_archive_path(relative);

        if dir_entry.file_type().is_dir() {
            trace!("Directory entry: {}", archive_path);
            entries.push(ArchiveEntry::directory(dir_entry.path(), archive_path));
        } else {
            trace!("File entry: {}", archive_path);
            entries.push(ArchiveEntry::file(dir_entry.path(), archive_path));
        }
    }
    debug!(
        "Collected {} entries under {}",
        entries.len(),
        root.display()
    );
    Ok(entries)
}

/// Joins the normal components of `relative` with `/`, whatever the host
/// separator is.
fn to_archive_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
