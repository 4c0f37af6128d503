//! # Archiver Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the infrastructure shared by every part of the
//! archiver:
//! - `config`: Configuration loading, overrides and validation
//! - `error`: The `ArchiverError` taxonomy, exit codes and the `Result` alias
//! - `progress`: `ProgressEvent` and the `ProgressSink` trait used to report
//!   archived entries and purged files
//!
//! ```rust
//! use crate::core::config::{self, Config};
//! use crate::core::error::{ArchiverError, Result};
//! use crate::core::progress::{ProgressEvent, ProgressSink};
//! ```
//!
pub mod config;
pub mod error;
pub mod progress;
