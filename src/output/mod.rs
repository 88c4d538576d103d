//! Run summaries and reports
//!
//! This module provides the run summary returned by every pipeline run, a console printout
//! of it, and an optional markdown report listing dropped entries.

mod markdown;
mod summary;

pub use markdown::{format_markdown_report, write_markdown_report};
pub use summary::{print_summary, EntryFailure, RunSummary};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
