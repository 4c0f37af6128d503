//! # Single-Path Archive Operation
//!
//! File: cli/src/commands/archive.rs
//!
//! ## Overview
//!
//! Archives one input path into one `.zip` file in the archive directory.
//!
//! ## Workflow
//!
//! 1. Classify the path with a filesystem stat (`ArchiveRequest::classify`):
//!    a missing path is `SourceNotFound`, any other stat failure is `SourceUnreadable`.
//! 2. Name the archive with `Namer`:
//!    `<stem>_<yyyyMMdd_HHmmss_fff>_<user>.zip`.
//! 3. Collect entries. A file yields a single entry named by its base name. A
//!    directory yields its whole subtree relative to itself.
//! 4. Write the archive with `ZipCompressor`, which reports one `Archived` event
//!    per entry.
//!
//! The source path is only read, never modified or removed.
//!
use crate::common::archive::{naming::Namer, zip::ZipCompressor, ArchiveTarget};
use crate::common::fs::walk;
use crate::core::error::{ArchiverError, Result};
use crate::core::progress::ProgressSink;
use anyhow::anyhow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A classified input path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRequest {
    /// Absolute path of the item, as given (links unresolved).
    pub source_path: PathBuf,
    pub is_directory: bool,
}

impl ArchiveRequest {
    /// Stats `path` and records whether it is a directory.
    ///
    /// Symbolic links are not resolved in the stored path, so a link is named
    /// after itself rather than its target.
    pub fn classify(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|e| source_error(path, e))?;
        let source_path = if path.file_name().is_some() {
            std::path::absolute(path)
        } else {
            // `.` and `..` only get a real base name from their canonical form.
            fs::canonicalize(path)
        }
        .map_err(|e| source_error(path, e))?;
        Ok(Self {
            source_path,
            is_directory: metadata.is_dir(),
        })
    }

    /// The item's own name, used to name the archive.
    pub fn base_name(&self) -> Result<String> {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                anyhow!(ArchiverError::SourceUnreadable {
                    path: self.source_path.clone(),
                    source: io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "cannot derive an archive name from this path",
                    ),
                })
            })
    }
}

/// Archives single paths into a fixed destination directory.
pub struct Archiver<'a> {
    destination: &'a Path,
    namer: &'a Namer,
    compressor: ZipCompressor,
}

impl<'a> Archiver<'a> {
    pub fn new(destination: &'a Path, namer: &'a Namer) -> Self {
        Self {
            destination,
            namer,
            compressor: ZipCompressor,
        }
    }

    /// # Archive Path (`archive`)
    ///
    /// Produces exactly one archive for `path` and returns where it was written.
    ///
    /// ## Errors
    ///
    /// * `SourceNotFound` if `path` does not exist.
    /// * `SourceUnreadable` if `path` or part of its subtree cannot be read.
    /// * `WriteFailure` if the archive cannot be written.
    pub fn archive(&self, path: &Path, sink: &mut dyn ProgressSink) -> Result<ArchiveTarget> {
        let request = ArchiveRequest::classify(path)?;
        debug!("Classified {:?}", request);

        let base_name = request.base_name()?;
        let target = ArchiveTarget::new(
            self.destination,
            self.namer.name(&base_name, request.is_directory),
        );

        let entries = if request.is_directory {
            walk::directory_entries(&request.source_path)?
        } else {
            vec![walk::file_entry(&request.source_path)?]
        };

        let size = self.compressor.write(&target.path(), &entries, sink)?;
        info!(
            "Archived {} into {} ({} entries, {} bytes)",
            request.source_path.display(),
            target.path().display(),
            entries.len(),
            size
        );
        Ok(target)
    }
}

fn source_error(path: &Path, e: io::Error) -> anyhow::Error {
    if e.kind() == io::ErrorKind::NotFound {
        anyhow!(ArchiverError::SourceNotFound {
            path: path.to_path_buf(),
        })
    } else {
        anyhow!(ArchiverError::SourceUnreadable {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progress::ProgressEvent;
    use std::collections::BTreeMap;
    use std::fs::File;
    use std::io::Read;
    use tempfile::tempdir;
    use zip::ZipArchive;

    fn unpack(path: &Path) -> BTreeMap<String, Vec<u8>> {
        let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut out = BTreeMap::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).unwrap();
            let mut content = Vec::new();
            entry.read_to_end(&mut content).unwrap();
            out.insert(entry.name().to_string(), content);
        }
        out
    }

    #[test]
    fn test_classify() -> Result<()> {
        let temp_dir = tempdir()?;
        let file = temp_dir.path().join("f.txt");
        fs::write(&file, "f")?;

        assert!(ArchiveRequest::classify(temp_dir.path())?.is_directory);
        let request = ArchiveRequest::classify(&file)?;
        assert!(!request.is_directory);
        assert_eq!(request.base_name()?, "f.txt");

        let err = ArchiveRequest::classify(&temp_dir.path().join("nope")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ArchiverError>(),
            Some(ArchiverError::SourceNotFound { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_archive_file_has_single_bare_entry() -> Result<()> {
        let source_dir = tempdir()?;
        let dest_dir = tempdir()?;
        let file = source_dir.path().join("deep/inside/report.csv");
        fs::create_dir_all(file.parent().unwrap())?;
        fs::write(&file, "a,b,c\n1,2,3\n")?;

        let namer = Namer::new("tester");
        let mut events = Vec::new();
        let target = Archiver::new(dest_dir.path(), &namer)
            .archive(&file, &mut |e: ProgressEvent| events.push(e))?;

        assert!(target.file_name.starts_with("report_"));
        assert!(target.file_name.ends_with("_tester.zip"));
        assert_eq!(target.destination_directory, dest_dir.path());

        let contents = unpack(&target.path());
        assert_eq!(contents.len(), 1);
        assert_eq!(contents["report.csv"], b"a,b,c\n1,2,3\n");
        assert_eq!(
            events,
            vec![ProgressEvent::Archived {
                entry: "report.csv".into()
            }]
        );
        // Source untouched.
        assert_eq!(fs::read(&file)?, b"a,b,c\n1,2,3\n");
        Ok(())
    }

    #[test]
    fn test_archive_directory_round_trip_without_root_folder() -> Result<()> {
        let source_dir = tempdir()?;
        let dest_dir = tempdir()?;
        let root = source_dir.path().join("site.v2");
        fs::create_dir_all(root.join("css"))?;
        fs::create_dir_all(root.join("img/empty"))?;
        fs::write(root.join("index.html"), "<html></html>")?;
        fs::write(root.join("css/site.css"), "body {}")?;
        fs::write(root.join("img/logo.bin"), [0u8, 159, 146, 150])?;

        let namer = Namer::new("tester");
        let target =
            Archiver::new(dest_dir.path(), &namer).archive(&root, &mut |_: ProgressEvent| {})?;

        assert!(target.file_name.starts_with("site.v2_"));
        let contents = unpack(&target.path());
        let names: Vec<_> = contents.keys().cloned().collect();
        assert_eq!(
            names,
            vec![
                "css/",
                "css/site.css",
                "img/",
                "img/empty/",
                "img/logo.bin",
                "index.html"
            ]
        );
        assert!(names.iter().all(|n| !n.starts_with("site.v2")));
        assert_eq!(contents["index.html"], b"<html></html>");
        assert_eq!(contents["css/site.css"], b"body {}");
        assert_eq!(contents["img/logo.bin"], vec![0u8, 159, 146, 150]);
        Ok(())
    }

    #[test]
    fn test_classify_dot_uses_directory_name() -> Result<()> {
        let temp_dir = tempdir()?;
        let project = temp_dir.path().join("project");
        fs::create_dir_all(project.join("src"))?;

        let request = ArchiveRequest::classify(&project.join("src/.."))?;
        assert!(request.is_directory);
        assert_eq!(request.base_name()?, "project");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_is_named_after_link() -> Result<()> {
        let source_dir = tempdir()?;
        let dest_dir = tempdir()?;
        let real = source_dir.path().join("real_target.csv");
        fs::write(&real, "x,y\n")?;
        let link = source_dir.path().join("report.csv");
        std::os::unix::fs::symlink(&real, &link)?;

        let namer = Namer::new("t");
        let target =
            Archiver::new(dest_dir.path(), &namer).archive(&link, &mut |_: ProgressEvent| {})?;

        assert!(target.file_name.starts_with("report_"));
        let contents = unpack(&target.path());
        assert_eq!(contents.len(), 1);
        assert_eq!(contents["report.csv"], b"x,y\n");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_with_symlinked_subdirectory() -> Result<()> {
        let source_dir = tempdir()?;
        let dest_dir = tempdir()?;
        let shared = source_dir.path().join("shared");
        fs::create_dir_all(&shared)?;
        fs::write(shared.join("x.txt"), "x")?;
        let proj = source_dir.path().join("proj");
        fs::create_dir_all(&proj)?;
        fs::write(proj.join("a.txt"), "a")?;
        std::os::unix::fs::symlink(&shared, proj.join("linked"))?;

        let namer = Namer::new("t");
        let target =
            Archiver::new(dest_dir.path(), &namer).archive(&proj, &mut |_: ProgressEvent| {})?;

        let contents = unpack(&target.path());
        let names: Vec<_> = contents.keys().cloned().collect();
        assert_eq!(names, vec!["a.txt", "linked/", "linked/x.txt"]);
        assert_eq!(contents["linked/x.txt"], b"x");
        Ok(())
    }

    #[test]
    fn test_archive_missing_path_writes_nothing() -> Result<()> {
        let dest_dir = tempdir()?;
        let namer = Namer::new("tester");
        let err = Archiver::new(dest_dir.path(), &namer)
            .archive(&dest_dir.path().join("missing"), &mut |_: ProgressEvent| {})
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ArchiverError>(),
            Some(ArchiverError::SourceNotFound { .. })
        ));
        assert_eq!(fs::read_dir(dest_dir.path())?.count(), 0);
        Ok(())
    }
}
