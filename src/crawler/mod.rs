//! Catalog crawling
//!
//! This module walks a paginated catalog page by page, including:
//! - Cursor management from a source-dependent initial page
//! - Exhaustion detection (an empty page ends the crawl)
//! - Treating late fetch failures as end-of-catalog
//! - Cancellation between pages

mod catalog;

pub use catalog::{CatalogCrawler, CrawlOptions};

use crate::extractor::ExtractError;
use crate::FetchError;
use thiserror::Error;

/// Errors surfaced by the crawler
///
/// Only the first page can fail the crawl; later failures end it quietly.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("First catalog page {page} could not be fetched: {source}")]
    FirstPage { page: u32, source: FetchError },

    #[error("First catalog page {page} could not be parsed: {source}")]
    FirstPageExtract { page: u32, source: ExtractError },
}
