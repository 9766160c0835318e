//! Configuration discovery and loading
//!
//! This module handles the configuration discovery hierarchy:
//! 1. Current directory: ./taskscheduler.toml or ./.taskscheduler/config.toml
//! 2. User config: ~/.taskscheduler/config.toml
//! 3. System config: /etc/taskscheduler/config.toml
//! 4. Built-in defaults

use crate::{AnalysisConfig, env};
use anyhow::{Context, Result};
use std::env as std_env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Locates and loads [`AnalysisConfig`] files
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Load the override if given, else the first discovered file, else defaults
    pub fn load(config_override: Option<&Path>) -> Result<AnalysisConfig> {
        if let Some(path) = config_override {
            info!("Loading configuration override from: {:?}", path);
            return AnalysisConfig::from_toml_file(path)
                .with_context(|| format!("Invalid configuration in {}", path.display()));
        }
        Self::discover_config()
    }

    /// Discover configuration using the hierarchy
    pub fn discover_config() -> Result<AnalysisConfig> {
        if let Some(config_path) = Self::find_config_file() {
            info!("Loading configuration from: {:?}", config_path);
            return AnalysisConfig::from_toml_file(&config_path)
                .with_context(|| format!("Invalid configuration in {}", config_path.display()));
        }

        info!("No configuration file found, using defaults");
        Ok(AnalysisConfig::default())
    }

    /// Find configuration file using discovery hierarchy
    pub fn find_config_file() -> Option<PathBuf> {
        let candidates = Self::get_config_candidates();

        for candidate in candidates {
            debug!("Checking for config file: {:?}", candidate);
            if candidate.is_file() {
                debug!("Found config file: {:?}", candidate);
                return Some(candidate);
            }
        }

        debug!("No config file found in discovery hierarchy");
        None
    }

    /// Get list of configuration file candidates in priority order
    fn get_config_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        // 1. Current directory
        if let Ok(current_dir) = std_env::current_dir() {
            candidates.push(current_dir.join(env::LOCAL_CONFIG_FILE_NAME));
            candidates.push(env::local_config_file_path(&current_dir));
        }

        // 2. User config
        if let Some(home_dir) = Self::get_home_dir() {
            candidates.push(env::user_config_file_path(&home_dir));
        }

        // 3. System config
        #[cfg(unix)]
        candidates.push(PathBuf::from(env::SYSTEM_CONFIG_FILE));

        candidates
    }

    /// Get home directory path
    fn get_home_dir() -> Option<PathBuf> {
        std_env::var("HOME")
            .ok()
            .or_else(|| std_env::var("USERPROFILE").ok())
            .map(PathBuf::from)
    }

    /// Show configuration discovery information for debugging
    pub fn show_discovery_info() {
        println!("Configuration Discovery Hierarchy:");
        println!();

        let candidates = Self::get_config_candidates();
        for (i, candidate) in candidates.iter().enumerate() {
            let status = if candidate.exists() {
                if candidate.is_file() {
                    "✓ EXISTS"
                } else {
                    "✗ NOT A FILE"
                }
            } else {
                "✗ NOT FOUND"
            };

            println!("  {}. {:?} - {}", i + 1, candidate, status);
        }

        println!();
        if let Some(found) = Self::find_config_file() {
            println!("Active configuration: {:?}", found);
        } else {
            println!("Active configuration: Built-in defaults");
        }
    }
}
