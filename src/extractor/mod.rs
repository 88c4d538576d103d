//! Catalog page extractors
//!
//! An [`Extractor`] turns one raw page into ordered [`CatalogEntry`] values. Site markup lives
//! entirely in extractor configuration, so a layout change on one site never touches the
//! crawl, resolve or build stages.

mod html;
pub(crate) mod json;

pub use html::HtmlListingExtractor;
pub use json::JsonCatalogExtractor;

use crate::config::{Config, SourceKind};
use crate::model::CatalogEntry;
use crate::source::RawPage;
use thiserror::Error;

/// Errors that can occur while extracting entries from a page
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected page shape: {0}")]
    UnexpectedShape(String),

    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// Parses catalog entries out of a raw page
pub trait Extractor: Send + Sync {
    /// Returns the name of this extractor implementation.
    fn name(&self) -> &str;

    /// Extracts entries in page order. An empty result means the catalog is exhausted.
    fn extract(&self, page: &RawPage) -> Result<Vec<CatalogEntry>, ExtractError>;
}

/// Builds the extractor matching `source.kind`
pub fn build_extractor(config: &Config) -> Result<Box<dyn Extractor>, ExtractError> {
    match config.source.kind {
        SourceKind::Json => Ok(Box::new(JsonCatalogExtractor::new(
            config.extractor.items_field.clone(),
        ))),
        SourceKind::Html => Ok(Box::new(HtmlListingExtractor::from_config(
            &config.extractor,
        )?)),
    }
}
