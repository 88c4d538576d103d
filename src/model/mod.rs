//! Data model shared across the pipeline
//!
//! A [`CatalogEntry`] is produced by an extractor and never changed afterwards. The resolver
//! turns it into zero or more [`ResolvedStream`] values, each of which becomes one playlist block.

mod entry;
mod stream;

pub use entry::{CatalogEntry, SourceHint};
pub use stream::{ResolvedStream, StreamHeaders};
