//! # Archiver Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared building blocks used by the command layer (`commands::`). Keeping
//! them here separates the "how" (zip writing, directory walking, console
//! output) from the batch logic in `commands::run`.
//!
//! - **`archive`**: Archive value types, file naming and the zip compressor.
//! - **`fs`**: Directory walking into archive entries and file timestamp lookup.
//! - **`ui`**: The console progress reporter.
//!

/// Archive naming and the zip compressor.
pub mod archive;
/// Filesystem walking and timestamp helpers.
pub mod fs;
/// Console progress output.
pub mod ui;
