//! Page sources and HTTP fetching
//!
//! This module contains the I/O leaf of the pipeline:
//! - Building the per-run HTTP client with bounded timeouts
//! - A retrying fetcher shared by page sources and resolution steps
//! - The [`PageSource`] boundary and its HTTP implementation

mod fetcher;
mod page_source;

pub use fetcher::{build_http_client, Fetcher, RawPage};
pub use page_source::{HttpPageSource, PageSource};
