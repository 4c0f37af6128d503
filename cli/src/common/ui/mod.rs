//! # Archiver Console Output (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//!
//! ## Overview
//!
//! Operator-facing output. Progress lines go to stdout, one per archived entry
//! (`Archived <entry-path>`) and one per purged file (`Purged <file-name>`).
//! Diagnostics stay on stderr through `tracing`.
//!
//! `ConsoleReporter` is the `ProgressSink` the binary passes to the runner. It
//! writes to any `io::Write`, which keeps it testable.
//!
use crate::core::progress::{ProgressEvent, ProgressSink};
use std::io::{self, Write};
use tracing::{debug, warn};

/// Prints each progress event as one line.
pub struct ConsoleReporter<W: Write> {
    out: W,
    archived: usize,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, archived: 0 }
    }

    /// Prints a free-form status line (version, completion summary).
    pub fn line(&mut self, message: &str) {
        if let Err(e) = writeln!(self.out, "{}", message) {
            warn!("Failed to write console output: {}", e);
        }
    }

    /// Number of archive entries written so far.
    pub fn archived(&self) -> usize {
        self.archived
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProgressSink for ConsoleReporter<W> {
    fn report(&mut self, event: ProgressEvent) {
        if let ProgressEvent::Archived { .. } = event {
            self.archived += 1;
        }
        debug!("{:?}", event);
        self.line(&event.to_string());
    }
}
