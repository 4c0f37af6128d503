//! # File Timestamps (`common::fs::times`)
//!
//! File: cli/src/common/fs/times.rs
//!
//! Reads the timestamp that decides a file's age for retention purging.
//!
use crate::core::config::TimestampBasis;
use std::fs::Metadata;
use std::io;
use std::time::SystemTime;
use tracing::debug;

/// Returns the creation or modification time of a file, per `basis`.
///
/// Creation time is not recorded on every platform/filesystem; when it is
/// unavailable the modification time is used instead.
pub fn age_timestamp(metadata: &Metadata, basis: TimestampBasis) -> io::Result<SystemTime> {
    match basis {
        TimestampBasis::Modified => metadata.modified(),
        TimestampBasis::Created => metadata.created().or_else(|e| {
            debug!("Creation time unavailable ({}); using modification time", e);
            metadata.modified()
        }),
    }
}
