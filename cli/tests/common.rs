//! # Archiver CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test files (`main_tests.rs`, `archive.rs`,
//! `purge.rs`). Each test gets an isolated `Workspace` holding a source tree, an
//! archive directory and an explicit config file, so the user's own
//! configuration and environment never leak into a run.
//!

// Allow potentially unused code in this common module, as different test files
// might use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// User name the binary sees in every test run.
pub const TEST_USER: &str = "tester";

/// # Get Archiver Command (`archiver_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `archiver` binary with a
/// fixed `USER` and without any `ARCHIVER_*` / `RUST_LOG` variables inherited
/// from the surrounding environment.
///
/// ## Panics
/// Panics if the `archiver` binary cannot be found via `Command::cargo_bin`.
pub fn archiver_cmd() -> Command {
    let mut cmd =
        Command::cargo_bin("archiver").expect("Failed to find archiver binary for testing");
    cmd.env("USER", TEST_USER)
        .env_remove("USERNAME")
        .env_remove("ARCHIVER_CONFIG")
        .env_remove("ARCHIVER_ARCHIVE_DIRECTORY")
        .env_remove("ARCHIVER_DELETE_AFTER_DAYS")
        .env_remove("RUST_LOG");
    cmd
}

/// Temporary layout used by a single test.
pub struct Workspace {
    root: TempDir,
    pub sources: PathBuf,
    pub archives: PathBuf,
    pub config: PathBuf,
}

impl Workspace {
    /// Creates `sources/` and `archives/` and a config file with `config_body`.
    /// `{archives}` in the body is replaced with the archive directory path.
    pub fn new(config_body: &str) -> Self {
        let root = tempfile::tempdir().expect("Failed to create temp dir");
        let sources = root.path().join("sources");
        let archives = root.path().join("archives");
        fs::create_dir_all(&sources).unwrap();
        fs::create_dir_all(&archives).unwrap();
        let config = root.path().join("archiver.toml");
        let archives_toml = archives.to_string_lossy().replace('\\', "/");
        fs::write(&config, config_body.replace("{archives}", &archives_toml)).unwrap();
        Self {
            root,
            sources,
            archives,
            config,
        }
    }

    /// Workspace whose config only names the archive directory.
    pub fn basic() -> Self {
        Self::new("archive_directory = \"{archives}\"\n")
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// `archiver_cmd()` pointed at this workspace's config file.
    pub fn cmd(&self) -> Command {
        let mut cmd = archiver_cmd();
        cmd.arg("--config").arg(&self.config);
        cmd
    }

    /// Writes a source file (creating parent directories) and returns its path.
    pub fn source_file(&self, relative: &str, content: &[u8]) -> PathBuf {
        let path = self.sources.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// Names of the files in the archive directory, sorted.
    pub fn archive_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&self.archives)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Creates a file in the archive directory whose modification time is
    /// `days` days in the past.
    pub fn aged_archive_file(&self, name: &str, days: u64) -> PathBuf {
        let path = self.archives.join(name);
        fs::write(&path, name).unwrap();
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(SystemTime::now() - Duration::from_secs(days * 86_400))
            .unwrap();
        path
    }
}

/// Reads every entry of a zip file into `(name, bytes)` pairs, in archive order.
pub fn read_zip(path: &Path) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).unwrap();
            let mut content = Vec::new();
            entry.read_to_end(&mut content).unwrap();
            (entry.name().to_string(), content)
        })
        .collect()
}
