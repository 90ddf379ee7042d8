//! Configuration discovery and loading
//!
//! Default generation options are looked up in this order:
//! 1. Current directory: ./quadlet-gen.toml or ./.quadlet-gen/config.toml
//! 2. User config: ~/.config/quadlet-gen/config.toml
//! 3. System config: /etc/quadlet-gen/config.toml
//! 4. Built-in defaults (no side-tables)

use crate::{GenerateOptions, env};
use anyhow::{Context, Result};
use std::env as std_env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration discovery system
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Load options from an explicit path, or discover them.
    pub fn load(explicit: Option<&Path>) -> Result<GenerateOptions> {
        match explicit {
            Some(path) => {
                info!("Loading configuration from: {:?}", path);
                GenerateOptions::from_toml_file(path)
            }
            None => Self::discover_config(),
        }
    }

    /// Discover and load configuration using the hierarchy
    pub fn discover_config() -> Result<GenerateOptions> {
        if let Some(config_path) = Self::locate() {
            info!("Loading configuration from: {:?}", config_path);
            return GenerateOptions::from_toml_file(config_path);
        }

        debug!("No configuration file found, using defaults");
        Ok(GenerateOptions::default())
    }

    /// First candidate that is a regular file.
    pub fn locate() -> Option<PathBuf> {
        let found = Self::get_config_candidates()
            .into_iter()
            .find(|candidate| candidate.is_file());
        debug!("Options file lookup resolved to {:?}", found);
        found
    }

    /// Get list of configuration file candidates in priority order
    pub fn get_config_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Ok(current_dir) = std_env::current_dir() {
            candidates.push(env::local_config_file_path(&current_dir));
            candidates.push(env::local_dir_config_file_path(&current_dir));
        }

        if let Some(home_dir) = Self::get_home_dir() {
            candidates.push(env::user_config_file_path(&home_dir));
        }

        #[cfg(unix)]
        candidates.push(env::system_config_file_path());

        candidates
    }

    fn get_home_dir() -> Option<PathBuf> {
        std_env::var("HOME")
            .ok()
            .or_else(|| std_env::var("USERPROFILE").ok())
            .map(PathBuf::from)
    }

    /// Write an options file, creating parent directories.
    ///
    /// An existing file is left untouched.
    pub fn write_config(path: &Path, options: &GenerateOptions) -> Result<()> {
        if path.exists() {
            warn!("Configuration file already exists: {:?}", path);
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        options.to_toml_file(path)?;
        info!("Created configuration file: {:?}", path);
        Ok(())
    }

    /// Print where options are looked up and which file would be used.
    pub fn print_lookup_report() {
        print!("{}", Self::lookup_report(&Self::get_config_candidates()));
    }

    /// One line per candidate path, then the file that `discover_config`
    /// would load from among them.
    pub fn lookup_report(candidates: &[PathBuf]) -> String {
        let mut report = String::from("quadlet-gen options lookup (first match wins):\n");
        for candidate in candidates {
            let mark = match fs::metadata(candidate) {
                Ok(meta) if meta.is_file() => "found",
                Ok(_) => "skipped, not a file",
                Err(_) => "absent",
            };
            report.push_str(&format!("  {} [{}]\n", candidate.display(), mark));
        }

        match candidates.iter().find(|candidate| candidate.is_file()) {
            Some(path) => report.push_str(&format!("Using {}\n", path.display())),
            None => report.push_str("Using built-in defaults (no side-tables)\n"),
        }
        report
    }
}
