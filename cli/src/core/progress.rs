//! # Archiver Progress Events
//!
//! File: cli/src/core/progress.rs
//!
//! ## Overview
//!
//! Archiving and purging report what they do through a caller-supplied
//! `ProgressSink`. The components never print anything themselves; the binary
//! plugs in the console reporter (`common::ui::ConsoleReporter`) and tests plug
//! in a closure that records events.
//!
//! ```rust
//! let mut seen = Vec::new();
//! let mut sink = |event: ProgressEvent| seen.push(event);
//! compressor.write(&destination, &entries, &mut sink)?;
//! ```
//!
use std::fmt;

/// A single unit of reported progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// An entry was fully written into an archive. Carries the in-archive path.
    Archived { entry: String },
    /// A file was deleted from the archive directory. Carries the file name.
    Purged { file_name: String },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Archived { entry } => write!(f, "Archived {}", entry),
            ProgressEvent::Purged { file_name } => write!(f, "Purged {}", file_name),
        }
    }
}

/// Receiver for progress events. Invoked synchronously from the write and
/// purge loops.
pub trait ProgressSink {
    fn report(&mut self, event: ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: FnMut(ProgressEvent),
{
    fn report(&mut self, event: ProgressEvent) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_display_matches_console_format() {
        let archived = ProgressEvent::Archived {
            entry: "docs/readme.md".into(),
        };
        let purged = ProgressEvent::Purged {
            file_name: "old_20240101_000000_000_me.zip".into(),
        };
        assert_eq!(archived.to_string(), "Archived docs/readme.md");
        assert_eq!(purged.to_string(), "Purged old_20240101_000000_000_me.zip");
    }

    #[test]
    fn test_closure_is_a_sink() {
        let mut events = Vec::new();
        {
            let mut sink = |event: ProgressEvent| events.push(event);
            let sink_ref: &mut dyn ProgressSink = &mut sink;
            sink_ref.report(ProgressEvent::Archived { entry: "a.txt".into() });
        }
        assert_eq!(events.len(), 1);
    }
}
