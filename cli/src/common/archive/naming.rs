//! # Archive File Naming (`common::archive::naming`)
//!
//! File: cli/src/common/archive/naming.rs
//!
//! Archive names follow `<stem>_<yyyyMMdd_HHmmss_fff>_<user>.zip`, using local
//! wall-clock time with millisecond precision. For files the stem drops the
//! final extension (`report.txt` -> `report`); directories keep their full name
//! (`photos.2023` -> `photos.2023`).
//!
//! There is no collision detection. Two archives of the same stem by the same
//! user in the same millisecond get the same name and the later one overwrites
//! the earlier.
//!
use super::ARCHIVE_EXTENSION;
use chrono::{DateTime, Local};
use std::env;
use std::path::Path;

/// chrono format for the timestamp part of the name: `20240131_235959_123`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";

const FALLBACK_USER: &str = "user";

/// Builds archive file names for a fixed user identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namer {
    user: String,
}

impl Namer {
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }

    /// Namer for the invoking user: `$USER` (Unix-like), then `$USERNAME`
    /// (Windows), then `"user"`.
    pub fn from_env() -> Self {
        let user = env::var("USER")
            .or_else(|_| env::var("USERNAME"))
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_USER.to_string());
        Self::new(user)
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Name for `base_name` stamped with the current local time.
    pub fn name(&self, base_name: &str, is_from_directory: bool) -> String {
        self.name_at(base_name, is_from_directory, Local::now())
    }

    /// Name for `base_name` stamped with `now`.
    pub fn name_at(
        &self,
        base_name: &str,
        is_from_directory: bool,
        now: DateTime<Local>,
    ) -> String {
        let stem = if is_from_directory {
            base_name
        } else {
            file_stem(base_name)
        };
        format!(
            "{}_{}_{}.{}",
            stem,
            now.format(TIMESTAMP_FORMAT),
            self.user,
            ARCHIVE_EXTENSION
        )
    }
}

// `Path::file_stem` keeps leading-dot names like `.bashrc` whole and only strips
// the last extension, which is what we want for `archive.tar.gz` -> `archive.tar`.
fn file_stem(base_name: &str) -> &str {
    Path::new(base_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(base_name)
}
