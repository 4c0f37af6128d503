//! # Batch Runner
//!
//! File: cli/src/commands/run.rs
//!
//! ## Overview
//!
//! Drives one invocation over the input paths:
//!
//! ```text
//! Start -> CheckInputs -> ValidateDestination -> { Abort | ArchiveEach -> MaybePurge -> Done }
//! ```
//!
//! 1. **CheckInputs**: an empty path list is `NoInputSpecified`. Nothing on disk
//!    is touched.
//! 2. **ValidateDestination**: the archive directory must be configured and exist
//!    as a directory, otherwise `ConfigurationMissing` is returned before any
//!    archive is attempted.
//! 3. **ArchiveEach**: paths are archived in command-line order. The batch halts
//!    on the first failing path: later paths are skipped and the purge does not
//!    run. Paths archived before the failure keep their archives, and the log
//!    records which paths completed and which were skipped.
//! 4. **MaybePurge**: runs the retention purge once, only when a non-negative
//!    threshold is configured.
//! 5. **Done**: returns a `RunSummary` for the caller to report.
//!
use crate::commands::archive::Archiver;
use crate::commands::purge::RetentionPurger;
use crate::common::archive::{naming::Namer, ArchiveTarget};
use crate::core::config::Config;
use crate::core::error::{ArchiverError, Result};
use crate::core::progress::ProgressSink;
use anyhow::{anyhow, Context};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, error, info};

/// What a completed run produced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Archives written, in input order.
    pub archives: Vec<ArchiveTarget>,
    /// Files deleted by the retention purge, in name order.
    pub purged: Vec<String>,
    /// Whether the retention purge ran at all.
    pub purge_ran: bool,
}

/// # Run Batch (`run`)
///
/// Archives every path in `paths` into the configured archive directory, then
/// applies the retention policy if one is configured.
///
/// ## Errors
///
/// * `NoInputSpecified` if `paths` is empty.
/// * `ConfigurationMissing` if the archive directory is unset or does not exist.
/// * The first archive error (`SourceNotFound`, `SourceUnreadable`, `WriteFailure`),
///   wrapped with which path halted the batch.
/// * `PurgeFailure` if the retention purge fails.
pub fn run(
    config: &Config,
    paths: &[PathBuf],
    namer: &Namer,
    sink: &mut dyn ProgressSink,
) -> Result<RunSummary> {
    if paths.is_empty() {
        return Err(anyhow!(ArchiverError::NoInputSpecified));
    }
    let destination = validate_destination(config)?;
    info!(
        "Archiving {} path(s) into {} as '{}'",
        paths.len(),
        destination.display(),
        namer.user()
    );

    let archiver = Archiver::new(destination, namer);
    let mut summary = RunSummary::default();
    for (index, path) in paths.iter().enumerate() {
        debug!("Archiving path {} of {}: {}", index + 1, paths.len(), path.display());
        match archiver.archive(path, sink) {
            Ok(target) => summary.archives.push(target),
            Err(e) => {
                log_halted_batch(paths, index);
                return Err(e).with_context(|| {
                    format!(
                        "Batch halted at '{}' ({} of {} path(s) archived)",
                        path.display(),
                        index,
                        paths.len()
                    )
                });
            }
        }
    }

    if let Some(policy) = config.retention_policy() {
        summary.purged = RetentionPurger::new(policy)
            .purge(destination, SystemTime::now(), sink)
            .context("Retention purge failed; archives written in this run were kept")?;
        summary.purge_ran = true;
    } else {
        debug!("No retention threshold configured; purge skipped.");
    }

    Ok(summary)
}

fn validate_destination(config: &Config) -> Result<&Path> {
    let destination = config.archive_directory().ok_or_else(|| {
        anyhow!(ArchiverError::ConfigurationMissing(
            "archive_directory is not set.".to_string()
        ))
    })?;
    if !destination.is_dir() {
        return Err(anyhow!(ArchiverError::ConfigurationMissing(format!(
            "Archive directory {} does not exist.",
            destination.display()
        ))));
    }
    Ok(destination)
}

fn log_halted_batch(paths: &[PathBuf], failed_index: usize) {
    let list = |slice: &[PathBuf]| {
        slice
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    error!(
        "Archiving halted at '{}'. Completed: [{}]. Skipped: [{}].",
        paths[failed_index].display(),
        list(&paths[..failed_index]),
        list(&paths[failed_index + 1..])
    );
}
