//! # Archiver Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error taxonomy used throughout the archiver. Every
//! failure that can end a run is expressed as an `ArchiverError` variant, and
//! each variant maps onto one of the process exit codes reported by `main`.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `ArchiverError`: A custom error enum using `thiserror` for specific failure kinds
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible propagation with context
//!
//! Typed errors are raised with `anyhow!`/`bail!` (or `?` on a `Result<_, ArchiverError>`)
//! and can be wrapped in as much context as needed. The entry point walks the
//! cause chain (`exit_code_for`) to recover the typed variant and pick the exit code.
//!
//! ## Examples
//!
//! ```rust
//! if !path.exists() {
//!     anyhow::bail!(ArchiverError::SourceNotFound { path: path.to_path_buf() });
//! }
//!
//! let code = exit_code_for(&err); // 3 for SourceNotFound
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Exit code for a run that completed without errors.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code when no input paths were given.
pub const EXIT_NO_INPUT: i32 = 1;
/// Exit code when the destination directory is missing or the configuration is invalid.
pub const EXIT_CONFIGURATION: i32 = 2;
/// Exit code for archive or purge I/O failures, and any untyped error.
pub const EXIT_IO_FAILURE: i32 = 3;

/// Custom error type for the archiver.
#[derive(Error, Debug)]
pub enum ArchiverError {
    #[error("No archive source specified.")]
    NoInputSpecified,

    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Archive source '{}' does not exist.", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Archive source '{}' cannot be read: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write archive '{}': {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Failed to purge '{}': {source}", path.display())]
    PurgeFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ArchiverError {
    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ArchiverError::NoInputSpecified => EXIT_NO_INPUT,
            ArchiverError::ConfigurationMissing(_) | ArchiverError::InvalidConfiguration(_) => {
                EXIT_CONFIGURATION
            }
            ArchiverError::SourceNotFound { .. }
            | ArchiverError::SourceUnreadable { .. }
            | ArchiverError::WriteFailure { .. }
            | ArchiverError::PurgeFailure { .. } => EXIT_IO_FAILURE,
        }
    }
}

/// Finds the first `ArchiverError` in the cause chain of `err` and returns its
/// exit code. Untyped errors count as I/O failures.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ArchiverError>())
        .map_or(EXIT_IO_FAILURE, ArchiverError::exit_code)
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;
