//! # Archiver Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Filesystem helpers shared by the archive and purge commands:
//!
//! - **`walk`**: Builds `ArchiveEntry` lists for a single file or a whole directory
//!   subtree (`file_entry`, `directory_entries`).
//! - **`times`**: Reads the creation or modification timestamp used to age files
//!   in the archive directory (`age_timestamp`).
//!
//! ```rust
//! use crate::common::fs::{times, walk};
//!
//! let entries = walk::directory_entries(Path::new("./photos"))?;
//! let stamp = times::age_timestamp(&metadata, TimestampBasis::Created)?;
//! ```
//!
pub mod times;
pub mod walk;
