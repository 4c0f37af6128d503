//! # Archiver Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file is the entry point of the `archiver` binary. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Loading the configuration once and handing it to the batch runner
//! - Mapping the outcome onto the process exit code
//!
//! ## Architecture
//!
//! - `core`: configuration, error taxonomy, progress events
//! - `common`: zip writing, file naming, directory walking, console output
//! - `commands`: the archive, purge and batch-run operations
//!
//! All errors are propagated to this level, printed once, and translated with
//! `exit_code_for`:
//!
//! | code | meaning |
//! |------|---------|
//! | 0 | success |
//! | 1 | no input paths given |
//! | 2 | archive directory missing / configuration invalid |
//! | 3 | archive or purge I/O failure |
//!
//! ## Examples
//!
//! ```bash
//! # Archive a file and a directory into the configured archive directory
//! archiver ./report.docx ./photos
//!
//! # Override the destination and retention for one run, with info logging
//! archiver -v --archive-dir /mnt/backup --delete-after-days 30 ./project
//! ```
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Archive, purge and batch-run operations
mod common; // Shared utilities (archive writing, fs walking, console output)
mod core; // Core infrastructure (config, errors, progress events)

use crate::common::archive::naming::Namer;
use crate::common::ui::ConsoleReporter;
use crate::core::config::{self, ConfigOverrides};
use crate::core::error::{exit_code_for, Result, EXIT_SUCCESS};

/// Defines the command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "archiver",
    about = "Archive files and directories into timestamped zip packages",
    long_about = "Creates one maximally compressed .zip per input path in the configured archive\n\
                  directory, named <item>_<yyyyMMdd_HHmmss_fff>_<user>.zip, then optionally\n\
                  deletes files in that directory older than the retention threshold.",
    version
)]
struct Cli {
    /// Files or directories to archive (one archive per path, in order).
    #[arg(value_name = "PATHS")]
    paths: Vec<PathBuf>,

    /// Configuration file to use instead of the user configuration.
    #[arg(short, long, env = "ARCHIVER_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Destination directory for archives; overrides `archive_directory`.
    #[arg(
        short = 'd',
        long = "archive-dir",
        env = "ARCHIVER_ARCHIVE_DIRECTORY",
        value_name = "DIR"
    )]
    archive_dir: Option<String>,

    /// Delete files in the archive directory older than this many days;
    /// overrides `delete_after_days`. Negative disables purging.
    #[arg(
        short = 'k',
        long,
        env = "ARCHIVER_DELETE_AFTER_DAYS",
        value_name = "DAYS",
        allow_negative_numbers = true
    )]
    delete_after_days: Option<i64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let code = match execute(cli) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            tracing::error!("Archive run failed: {:?}", e);
            eprintln!("Error: {:#}", e);
            exit_code_for(&e)
        }
    };
    std::process::exit(code);
}

fn execute(cli: Cli) -> Result<()> {
    let overrides = ConfigOverrides {
        config_file: cli.config,
        archive_directory: cli.archive_dir,
        delete_after_days: cli.delete_after_days,
    };
    let cfg = config::load_config(&overrides)?;
    let namer = Namer::from_env();
    let mut reporter = ConsoleReporter::stdout();

    if !cli.paths.is_empty() {
        reporter.line("Archiving...");
    }
    let summary = commands::run::run(&cfg, &cli.paths, &namer, &mut reporter)?;

    reporter.line(&format!("Archiver version {}", env!("CARGO_PKG_VERSION")));
    let purge_note = if summary.purge_ran {
        format!("{} file(s) purged", summary.purged.len())
    } else {
        "purge skipped".to_string()
    };
    let completion = format!(
        "Archive complete: {} archive(s) written ({} entries), {}.",
        summary.archives.len(),
        reporter.archived(),
        purge_note
    );
    reporter.line(&completion);
    tracing::info!(
        "Run finished at {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    Ok(())
}
