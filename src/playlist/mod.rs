//! M3U playlist building
//!
//! This module turns resolved streams into playlist records and serializes them:
//! - Title normalization (`Title (Year) [quality]`)
//! - `#EXTINF` metadata and `#EXTVLCOPT` player option lines
//! - Reading M3U text back into records

mod builder;
mod parse;
mod record;

pub use builder::{PlaylistBuilder, PlaylistOptions};
pub use parse::parse_playlist;
pub use record::PlaylistRecord;

use thiserror::Error;

/// Header line every playlist starts with
pub const M3U_HEADER: &str = "#EXTM3U";

/// Errors that can occur during playlist operations
#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("Failed to write playlist: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not an M3U playlist: {0}")]
    Format(String),
}

/// Result type for playlist operations
pub type PlaylistResult<T> = Result<T, PlaylistError>;
