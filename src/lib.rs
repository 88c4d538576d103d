//! Stream-Harvest: catalog crawl and stream resolution pipeline
//!
//! This crate walks a paginated media catalog (JSON API or HTML listing), resolves each
//! entry to one or more playable stream URLs, and writes the result as an M3U playlist.

pub mod config;
pub mod crawler;
pub mod extractor;
pub mod model;
pub mod orchestrator;
pub mod output;
pub mod playlist;
pub mod resolver;
pub mod source;

use thiserror::Error;

/// Main error type for run-level failures
///
/// Per-entry failures never surface here; they are counted in the run summary.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Extractor setup failed: {0}")]
    Extractor(#[from] extractor::ExtractError),

    #[error("Crawl error: {0}")]
    Crawl(#[from] crawler::CrawlError),

    #[error("Playlist error: {0}")]
    Playlist(#[from] playlist::PlaylistError),

    #[error("Report error: {0}")]
    Report(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Catalog '{source_name}' yielded no entries")]
    EmptyCatalog { source_name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

    #[error("Invalid pattern in config: {0}")]
    InvalidPattern(String),
}

/// Errors raised by a single HTTP fetch
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Invalid request URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

impl FetchError {
    /// Returns true if the failure is worth another attempt (5xx or timeout)
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status { status, .. } => (500..600).contains(status),
            Self::Timeout { .. } => true,
            Self::Network { .. } | Self::InvalidUrl { .. } => false,
        }
    }

    /// The URL the failed request targeted
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. }
            | Self::Timeout { url }
            | Self::Network { url, .. }
            | Self::InvalidUrl { url, .. } => url,
        }
    }
}

/// Result type alias for run-level operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CatalogCrawler, CrawlOptions};
pub use extractor::Extractor;
pub use model::{CatalogEntry, ResolvedStream, SourceHint, StreamHeaders};
pub use orchestrator::{run_pipeline, Orchestrator, RunSummary};
pub use playlist::{PlaylistBuilder, PlaylistRecord};
pub use resolver::LinkResolver;
pub use source::{PageSource, RawPage};
