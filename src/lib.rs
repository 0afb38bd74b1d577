//! Image Grabber: a paced, concurrent image harvester
//!
//! This crate queries pluggable image sources for a set of keywords across
//! several result pages, then downloads every discovered image into a local
//! directory. Work runs on a bounded worker pool, submissions are paced with
//! a jittered delay, every task goes through a randomly chosen proxy, and a
//! run can be cancelled cooperatively at any point.

pub mod config;
pub mod grabber;
pub mod output;
pub mod source;

use std::path::PathBuf;
use thiserror::Error;

/// Error produced by a single discovery or download task
///
/// Task errors never abort a run. Each one is handed to the configured
/// [`grabber::ErrorSink`] exactly once and the task contributes nothing to
/// the result.
#[derive(Debug, Error)]
pub enum GrabError {
    #[error("HTTP request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Invalid or empty response from {url} (status {status})")]
    EmptyResponse { url: String, status: u16 },

    #[error("Invalid file url: {url}")]
    InvalidFileUrl { url: String },

    #[error("No images found by {source_name} for '{keyword}' on page {page}")]
    NoResults {
        source_name: String,
        keyword: String,
        page: u32,
    },

    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Task cancelled")]
    Cancelled,

    #[error("Task panicked: {message}")]
    Panicked { message: String },
}

/// Coarse classification of [`GrabError`] values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    Transport,
    EmptyResponse,
    NoResults,
    Filesystem,
    Cancelled,
    Panicked,
}

impl GrabError {
    /// Returns the taxonomy bucket this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            GrabError::Transport { .. } => ErrorKind::Transport,
            GrabError::EmptyResponse { .. } | GrabError::InvalidFileUrl { .. } => {
                ErrorKind::EmptyResponse
            }
            GrabError::NoResults { .. } => ErrorKind::NoResults,
            GrabError::Filesystem { .. } => ErrorKind::Filesystem,
            GrabError::Cancelled => ErrorKind::Cancelled,
            GrabError::Panicked { .. } => ErrorKind::Panicked,
        }
    }
}

impl ErrorKind {
    /// All kinds, in reporting order
    pub const ALL: [ErrorKind; 6] = [
        ErrorKind::Transport,
        ErrorKind::EmptyResponse,
        ErrorKind::NoResults,
        ErrorKind::Filesystem,
        ErrorKind::Cancelled,
        ErrorKind::Panicked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Transport => "transport",
            ErrorKind::EmptyResponse => "empty-response",
            ErrorKind::NoResults => "no-results",
            ErrorKind::Filesystem => "filesystem",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Panicked => "panicked",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),

    #[error("Unknown source preset: {0}")]
    UnknownPreset(String),
}

/// Result type alias for task-level operations
pub type Result<T> = std::result::Result<T, GrabError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use grabber::{Grabber, GrabberSettings};
pub use source::{Source, SourceSpec};
