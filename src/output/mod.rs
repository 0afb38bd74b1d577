//! Output module for run summaries
//!
//! This module handles:
//! - Building a [`RunSummary`] from a finished grab
//! - Printing it to the console
//! - Exporting it as Markdown

mod markdown;
mod summary;

pub use markdown::{format_markdown_summary, write_markdown_summary};
pub use summary::{print_summary, RunSummary};

use thiserror::Error;

/// Errors that can occur while writing output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
