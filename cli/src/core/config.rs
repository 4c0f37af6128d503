//! # Archiver Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements configuration loading for the archiver. The result is
//! a single explicit `Config` value that is built once in `main` and passed by
//! reference to the runner. No other component looks up settings on its own.
//!
//! ## Architecture
//!
//! Configuration sources (lowest to highest precedence):
//! 1. The user configuration file `<config dir>/archiver/config.toml`, used only
//!    when no explicit file is given
//! 2. An explicit file passed with `--config` (or `ARCHIVER_CONFIG`)
//! 3. Command-line / environment overrides (`--archive-dir`, `--delete-after-days`)
//!
//! Recognised keys:
//!
//! ```toml
//! archive_directory = "~/archives"   # required at run time
//! delete_after_days = 30             # optional; negative disables purging
//! purge_basis = "created"            # or "modified"
//! ```
//!
//! The PascalCase spellings (`ArchiveDirectory`, `DeleteAfterDays`, `PurgeBasis`)
//! are accepted as aliases so existing settings can be carried over verbatim.
//!
//! Whether the archive directory actually exists is not checked here; that is
//! the runner's first step, so a missing directory is reported as
//! `ConfigurationMissing` before any archive is attempted.
//!
use crate::core::error::{ArchiverError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)] // Error if unknown fields are in TOML
pub struct Config {
    /// Destination for produced archives and the scan root for purging.
    #[serde(default, alias = "ArchiveDirectory")]
    pub archive_directory: Option<String>,
    /// Retention threshold in days. Absent or negative disables purging.
    #[serde(default, alias = "DeleteAfterDays")]
    pub delete_after_days: Option<i64>,
    /// Which file timestamp decides a file's age when purging.
    #[serde(default, alias = "PurgeBasis")]
    pub purge_basis: TimestampBasis,
}

/// File timestamp used to age files in the archive directory.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimestampBasis {
    /// File creation (birth) time; falls back to modification time where the
    /// platform does not record it.
    #[default]
    Created,
    /// Last modification time.
    Modified,
}

/// An enabled retention purge: delete files older than `days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub days: u32,
    pub basis: TimestampBasis,
}

/// Values supplied on the command line (or via their environment variables)
/// that take precedence over the configuration files.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub archive_directory: Option<String>,
    pub delete_after_days: Option<i64>,
}

impl Config {
    /// The configured archive directory, if any.
    pub fn archive_directory(&self) -> Option<&Path> {
        self.archive_directory.as_deref().map(Path::new)
    }

    /// The retention policy in force, or `None` when purging is disabled
    /// (threshold absent or negative).
    pub fn retention_policy(&self) -> Option<RetentionPolicy> {
        let days = u32::try_from(self.delete_after_days?).ok()?;
        Some(RetentionPolicy {
            days,
            basis: self.purge_basis,
        })
    }
}

const USER_CONFIG_FILENAME: &str = "config.toml";

/// Loads, merges, expands and validates the configuration.
pub fn load_config(overrides: &ConfigOverrides) -> Result<Config> {
    let base = match &overrides.config_file {
        Some(path) => {
            if !path.is_file() {
                return Err(anyhow!(ArchiverError::InvalidConfiguration(format!(
                    "Config file '{}' does not exist.",
                    path.display()
                ))));
            }
            info!("Loading configuration from: {}", path.display());
            load_config_from_path(path)?
        }
        None => load_user_config()?.unwrap_or_default(),
    };
    let mut merged = apply_overrides(base, overrides);
    expand_config_paths(&mut merged);
    validate_config(&merged).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged);
    Ok(merged)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "archiver") {
        let config_path = proj_dirs.config_dir().join(USER_CONFIG_FILENAME);
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content).map_err(|e| {
        anyhow!(ArchiverError::InvalidConfiguration(format!(
            "Failed to parse TOML from file {}: {}",
            path.display(),
            e
        )))
    })
}

fn apply_overrides(file: Config, overrides: &ConfigOverrides) -> Config {
    Config {
        archive_directory: overrides
            .archive_directory
            .clone()
            .or(file.archive_directory),
        delete_after_days: overrides.delete_after_days.or(file.delete_after_days),
        purge_basis: file.purge_basis,
    }
}

fn expand_config_paths(config: &mut Config) {
    if let Some(dir) = config.archive_directory.as_mut() {
        *dir = shellexpand::tilde(dir.as_str()).into_owned();
        debug!("Expanded archive directory: {}", dir);
    }
}

fn validate_config(config: &Config) -> Result<()> {
    if let Some(dir) = &config.archive_directory {
        if dir.trim().is_empty() {
            return Err(anyhow!(ArchiverError::InvalidConfiguration(
                "archive_directory must not be empty.".to_string()
            )));
        }
    }
    match config.delete_after_days {
        Some(days) if days > i64::from(u32::MAX) => {
            return Err(anyhow!(ArchiverError::InvalidConfiguration(format!(
                "delete_after_days value {} is out of range.",
                days
            ))));
        }
        Some(days) if days < 0 => {
            info!("delete_after_days is negative ({}); purging disabled.", days);
        }
        None => debug!("delete_after_days not set; purging disabled."),
        Some(_) => {}
    }
    Ok(())
}
