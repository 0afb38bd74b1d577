//! Configuration module for Image Grabber
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use image_grabber::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("grabber.toml")).unwrap();
//! println!("Grabbing {} pages per keyword", config.grabber.page_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, DelayConfig, GrabberConfig, HttpConfig, OutputConfig, SourceEntry};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

use crate::grabber::{DelayRange, GrabberSettings, HttpSettings};
use crate::source::{presets, SourceSpec};
use crate::ConfigError;
use std::path::PathBuf;
use std::time::Duration;

impl Config {
    /// Resolves every `[[source]]` entry into a concrete source spec
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SourceSpec>)` - One spec per entry, in configuration order
    /// * `Err(ConfigError::UnknownPreset)` - A preset name is not built in
    pub fn source_specs(&self) -> Result<Vec<SourceSpec>, ConfigError> {
        self.sources
            .iter()
            .map(|entry| match entry {
                SourceEntry::Preset { preset } => presets::by_name(preset)
                    .ok_or_else(|| ConfigError::UnknownPreset(preset.clone())),
                SourceEntry::Custom(spec) => Ok(spec.clone()),
            })
            .collect()
    }

    /// Builds the pipeline settings described by this configuration
    pub fn grabber_settings(&self) -> Result<GrabberSettings, ConfigError> {
        Ok(GrabberSettings {
            max_concurrency: self.grabber.max_concurrency as usize,
            page_depth: self.grabber.page_depth,
            keywords: self.grabber.keywords.clone(),
            proxies: self.grabber.proxies.clone(),
            target_dir: PathBuf::from(&self.grabber.target_dir),
            delay: DelayRange::from_millis(self.delay.min_ms, self.delay.max_ms)?,
        })
    }

    /// Builds the HTTP client settings described by this configuration
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            user_agent: self.http.user_agent.clone(),
            connect_timeout: Duration::from_millis(self.http.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.http.request_timeout_ms),
        }
    }
}

#[cfg(test)]
pub(crate) use validation::validate_source_spec;
