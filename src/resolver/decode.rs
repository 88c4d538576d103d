//! Final-URL payload decoding
//!
//! Some sources deliver the stream URL pre-encoded inside the player page. Decoding is the last
//! step of the hop chain; a malformed payload fails the entry, never the run.

use crate::config::PayloadEncoding;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;
use url::Url;

/// Errors raised while decoding a payload
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Decoded payload is not an http(s) URL: {0}")]
    NotAUrl(String),
}

/// Decodes a payload into a stream URL
///
/// # Example
///
/// ```
/// use stream_harvest::config::PayloadEncoding;
/// use stream_harvest::resolver::decode_payload;
///
/// let url = decode_payload("aHR0cDovL2gvYS5tM3U4", PayloadEncoding::Base64).unwrap();
/// assert_eq!(url, "http://h/a.m3u8");
/// ```
pub fn decode_payload(payload: &str, encoding: PayloadEncoding) -> Result<String, DecodeError> {
    let text = match encoding {
        PayloadEncoding::Plain => payload.trim().to_string(),
        PayloadEncoding::Base64 => String::from_utf8(STANDARD.decode(payload.trim())?)?,
    };

    match Url::parse(&text) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(text),
        _ => Err(DecodeError::NotAUrl(text)),
    }
}

/// Encodes a URL the way a source would deliver it
pub fn encode_payload(url: &str, encoding: PayloadEncoding) -> String {
    match encoding {
        PayloadEncoding::Plain => url.to_string(),
        PayloadEncoding::Base64 => STANDARD.encode(url.as_bytes()),
    }
}
