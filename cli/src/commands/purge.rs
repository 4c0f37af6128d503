//! # Retention Purge
//!
//! File: cli/src/commands/purge.rs
//!
//! ## Overview
//!
//! Deletes aged files from the archive directory. A file is deleted when its
//! age timestamp (creation time by default, see `TimestampBasis`) is strictly
//! earlier than `now - days`.
//!
//! Only regular files directly inside the directory are considered. The scan
//! does not descend into sub-directories and leaves them, and any symlinks, in
//! place. Files are judged by age alone, so anything old enough is removed,
//! including files this tool did not create. A threshold of `0` removes every
//! file older than the moment the purge starts.
//!
//! A listing or deletion failure stops the purge with `PurgeFailure`. Files
//! deleted before the failure stay deleted, and archives written earlier in the
//! run are kept.
//!
use crate::common::fs::times;
use crate::core::config::RetentionPolicy;
use crate::core::error::{ArchiverError, Result};
use crate::core::progress::{ProgressEvent, ProgressSink};
use anyhow::anyhow;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, trace};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Applies a `RetentionPolicy` to a directory.
#[derive(Debug, Clone, Copy)]
pub struct RetentionPurger {
    policy: RetentionPolicy,
}

impl RetentionPurger {
    pub fn new(policy: RetentionPolicy) -> Self {
        Self { policy }
    }

    /// Cut-off instant for `now`; `None` when it falls outside the clock's
    /// representable range, in which case nothing is old enough.
    pub fn cutoff(&self, now: SystemTime) -> Option<SystemTime> {
        now.checked_sub(Duration::from_secs(
            u64::from(self.policy.days) * SECONDS_PER_DAY,
        ))
    }

    /// # Purge Directory (`purge`)
    ///
    /// Deletes every file directly under `directory` older than the cut-off
    /// and reports a `Purged` event for each one.
    ///
    /// ## Returns
    ///
    /// * `Result<Vec<String>>` - Names of the deleted files, in name order.
    ///
    /// ## Errors
    ///
    /// Returns `ArchiverError::PurgeFailure` if the directory cannot be listed,
    /// a file's metadata cannot be read, or a file cannot be deleted.
    pub fn purge(
        &self,
        directory: &Path,
        now: SystemTime,
        sink: &mut dyn ProgressSink,
    ) -> Result<Vec<String>> {
        let Some(cutoff) = self.cutoff(now) else {
            debug!("Retention cut-off is out of range; nothing to purge.");
            return Ok(Vec::new());
        };
        info!(
            "Purging files older than {} day(s) from {}",
            self.policy.days,
            directory.display()
        );

        let mut expired = self.expired_files(directory, cutoff)?;
        expired.sort();

        let mut purged = Vec::with_capacity(expired.len());
        for (file_name, path) in expired {
            fs::remove_file(&path).map_err(|e| purge_failure(&path, e))?;
            sink.report(ProgressEvent::Purged {
                file_name: file_name.clone(),
            });
            purged.push(file_name);
        }
        info!("Purged {} file(s)", purged.len());
        Ok(purged)
    }

    fn expired_files(
        &self,
        directory: &Path,
        cutoff: SystemTime,
    ) -> Result<Vec<(String, PathBuf)>> {
        let mut expired = Vec::new();
        for entry in fs::read_dir(directory).map_err(|e| purge_failure(directory, e))? {
            let entry = entry.map_err(|e| purge_failure(directory, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| purge_failure(&path, e))?;
            if !file_type.is_file() {
                trace!("Skipping non-file {}", path.display());
                continue;
            }
            let metadata = entry.metadata().map_err(|e| purge_failure(&path, e))?;
            let stamp = times::age_timestamp(&metadata, self.policy.basis)
                .map_err(|e| purge_failure(&path, e))?;
            if stamp < cutoff {
                let file_name = entry.file_name().to_string_lossy().into_owned();
                debug!("Expired: {}", file_name);
                expired.push((file_name, path));
            }
        }
        Ok(expired)
    }
}

fn purge_failure(path: &Path, source: std::io::Error) -> anyhow::Error {
    anyhow!(ArchiverError::PurgeFailure {
        path: path.to_path_buf(),
        source,
    })
}
