//! # Archiver Commands
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! The operations behind an `archiver` invocation:
//!
//! - `archive`: Archives one path (`Archiver::archive`)
//! - `purge`: Deletes aged files from the archive directory (`RetentionPurger::purge`)
//! - `run`: The batch state machine tying both together (`run::run`)
//!
//! `main.rs` builds the configuration and the console reporter, then calls
//! `run::run` with the paths from the command line.
//!
pub mod archive;
pub mod purge;
pub mod run;
