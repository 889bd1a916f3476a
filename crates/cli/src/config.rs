//! Startup configuration
//!
//! Values come from an optional TOML file, then command-line flags on top.
//! Both roots must already exist as directories before anything is watched.

use crate::args::Cli;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use watcher::{Result, WatchError};

/// Default quiet period in seconds
pub const DEFAULT_WAIT_SECS: u64 = 120;

/// Longest accepted quiet period: 30 days
pub const MAX_WAIT_SECS: u64 = 30 * 24 * 60 * 60;

/// On-disk configuration; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub src: Option<PathBuf>,
    pub dst: Option<PathBuf>,
    pub wait: Option<u64>,
    pub verbose: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            WatchError::StartupConfig(format!("cannot read {}: {}", path.display(), e))
        })?;

        toml::from_str(&contents).map_err(|e| {
            WatchError::StartupConfig(format!("invalid config {}: {}", path.display(), e))
        })
    }
}

/// Validated settings the daemon runs with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Canonical watched root
    pub source: PathBuf,
    /// Canonical destination root
    pub destination: PathBuf,
    pub wait_for: Duration,
    pub verbose: bool,
}

impl Settings {
    /// Merge the config file (if any) with flags and validate the result
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    fn merge(cli: &Cli, file: FileConfig) -> Result<Self> {
        let (Some(source), Some(destination)) = (
            cli.src.clone().or(file.src),
            cli.dst.clone().or(file.dst),
        ) else {
            return Err(WatchError::StartupConfig(
                "source and destination path has to be specified".into(),
            ));
        };

        let wait = cli.wait.or(file.wait).unwrap_or(DEFAULT_WAIT_SECS);
        if wait == 0 {
            return Err(WatchError::StartupConfig(
                "wait must be at least one second".into(),
            ));
        }
        if wait > MAX_WAIT_SECS {
            return Err(WatchError::StartupConfig(format!(
                "wait must be at most {} seconds",
                MAX_WAIT_SECS
            )));
        }

        let source = existing_dir(&source)?;
        let destination = existing_dir(&destination)?;
        if destination.starts_with(&source) {
            return Err(WatchError::StartupConfig(format!(
                "destination {} must not be inside the watched directory {}",
                destination.display(),
                source.display()
            )));
        }

        Ok(Self {
            source,
            destination,
            wait_for: Duration::from_secs(wait),
            verbose: cli.verbose || file.verbose.unwrap_or(false),
        })
    }
}

/// Canonicalize `path`, requiring it to be an existing directory
fn existing_dir(path: &Path) -> Result<PathBuf> {
    let not_a_dir = || {
        WatchError::StartupConfig(format!(
            "{} must exist and be a directory",
            path.display()
        ))
    };

    let canonical = path.canonicalize().map_err(|_| not_a_dir())?;
    if !canonical.is_dir() {
        return Err(not_a_dir());
    }
    Ok(canonical)
}
