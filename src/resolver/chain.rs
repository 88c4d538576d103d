//! Multi-hop resolution chain
//!
//! `DetailUrl → VideoId → IndirectionUrl → EncodedPayload → stream URL`
//!
//! Each hop is its own method taking the previous hop's newtype, so the order is fixed at
//! compile time. Any missing marker abandons the entry; no alternate markers are tried.

use crate::config::{MultiHopConfig, PayloadEncoding};
use crate::model::{CatalogEntry, ResolvedStream};
use crate::resolver::decode::decode_payload;
use crate::resolver::{ResolveError, Step};
use crate::source::Fetcher;
use crate::ConfigError;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

/// URL of an entry's detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailUrl(pub String);

/// Video identifier read from the detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoId(pub String);

/// Embedded player URL returned by the indirection endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndirectionUrl(pub String);

/// Encoded stream URL found in the player page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload(pub String);

/// Title and poster scraped from the detail page alongside the video id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailMeta {
    pub title: Option<String>,
    pub poster: Option<String>,
}

/// Compiled hop chain for one source
#[derive(Debug, Clone)]
pub struct MultiHopChain {
    video_id_selector: Selector,
    video_id_attribute: String,
    indirection_url: String,
    iframe_pattern: Regex,
    payload_pattern: Regex,
    encoding: PayloadEncoding,
    final_referer: Option<String>,
    title_selector: Option<Selector>,
    poster_selector: Option<Selector>,
    poster_attribute: String,
}

impl MultiHopChain {
    /// Compiles selectors and patterns from `[resolver.multi-hop]`
    pub fn from_config(config: &MultiHopConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            video_id_selector: compile_selector(&config.video_id_selector)?,
            video_id_attribute: config.video_id_attribute.clone(),
            indirection_url: config.indirection_url.clone(),
            iframe_pattern: compile_regex(&config.iframe_pattern)?,
            payload_pattern: compile_regex(&config.payload_pattern)?,
            encoding: config.payload_encoding,
            final_referer: config.final_referer.clone(),
            title_selector: config
                .title_selector
                .as_deref()
                .map(compile_selector)
                .transpose()?,
            poster_selector: config
                .poster_selector
                .as_deref()
                .map(compile_selector)
                .transpose()?,
            poster_attribute: config.poster_attribute.clone(),
        })
    }

    /// Runs every hop for one entry
    pub async fn resolve(
        &self,
        fetcher: &Fetcher,
        entry: &CatalogEntry,
    ) -> Result<ResolvedStream, ResolveError> {
        let detail = entry
            .detail_link()
            .map(|url| DetailUrl(url.to_string()))
            .ok_or_else(|| ResolveError::Parse {
                step: Step::Detail,
                marker: "detail URL".to_string(),
            })?;

        let (video_id, meta) = self.fetch_video_id(fetcher, &detail).await?;
        tracing::debug!("Entry {}: video id {}", entry.id, video_id.0);

        let iframe = self.fetch_indirection(fetcher, &video_id, &detail).await?;
        tracing::debug!("Entry {}: player {}", entry.id, iframe.0);

        let payload = self.fetch_payload(fetcher, &iframe, &video_id).await?;
        let url = self.decode(&payload)?;

        let entry = entry.enriched(meta.title, meta.poster);
        Ok(ResolvedStream::new(entry, url).with_referer(iframe.0))
    }

    /// Hop 1: detail page → video identifier
    pub async fn fetch_video_id(
        &self,
        fetcher: &Fetcher,
        detail: &DetailUrl,
    ) -> Result<(VideoId, DetailMeta), ResolveError> {
        let page = fetcher
            .get(&detail.0, &[])
            .await
            .map_err(|source| ResolveError::Fetch {
                step: Step::Detail,
                source,
            })?;

        self.parse_detail(&page.body, &page.url)
    }

    /// Reads the video id (and optional metadata) from detail page HTML
    pub fn parse_detail(
        &self,
        body: &str,
        page_url: &str,
    ) -> Result<(VideoId, DetailMeta), ResolveError> {
        let document = Html::parse_document(body);

        let video_id = document
            .select(&self.video_id_selector)
            .next()
            .and_then(|element| element.value().attr(&self.video_id_attribute))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ResolveError::Parse {
                step: Step::Detail,
                marker: self.video_id_attribute.clone(),
            })?;

        let title = self.title_selector.as_ref().and_then(|selector| {
            document
                .select(selector)
                .next()
                .map(|e| e.text().collect::<String>().trim().to_string())
                .filter(|t| !t.is_empty())
        });

        let poster = self.poster_selector.as_ref().and_then(|selector| {
            let src = document
                .select(selector)
                .next()?
                .value()
                .attr(&self.poster_attribute)?;
            Url::parse(page_url)
                .ok()
                .and_then(|base| base.join(src.trim()).ok())
                .map(|url| url.to_string())
        });

        Ok((VideoId(video_id.to_string()), DetailMeta { title, poster }))
    }

    /// Hop 2: video identifier → embedded player URL
    pub async fn fetch_indirection(
        &self,
        fetcher: &Fetcher,
        video_id: &VideoId,
        detail: &DetailUrl,
    ) -> Result<IndirectionUrl, ResolveError> {
        let url = self.indirection_url(video_id);
        let headers = [("X-Requested-With", "fetch"), ("Referer", detail.0.as_str())];

        let page = fetcher
            .get(&url, &headers)
            .await
            .map_err(|source| ResolveError::Fetch {
                step: Step::Indirection,
                source,
            })?;

        self.parse_indirection(&page.body)
    }

    /// Extracts the player URL, undoing JSON slash escapes and HTML entities
    pub fn parse_indirection(&self, body: &str) -> Result<IndirectionUrl, ResolveError> {
        let raw = capture(&self.iframe_pattern, body).ok_or_else(|| ResolveError::Parse {
            step: Step::Indirection,
            marker: self.iframe_pattern.as_str().to_string(),
        })?;

        let unescaped = raw.replace('\\', "");
        Ok(IndirectionUrl(decode_entities(&unescaped)))
    }

    /// Hop 3: player page → encoded payload
    pub async fn fetch_payload(
        &self,
        fetcher: &Fetcher,
        iframe: &IndirectionUrl,
        video_id: &VideoId,
    ) -> Result<EncodedPayload, ResolveError> {
        let referer = self.player_referer(video_id);
        let mut headers = Vec::new();
        if let Some(referer) = referer.as_deref() {
            headers.push(("Referer", referer));
        }

        let page = fetcher
            .get(&iframe.0, &headers)
            .await
            .map_err(|source| ResolveError::Fetch {
                step: Step::Final,
                source,
            })?;

        self.parse_payload(&page.body)
    }

    pub fn parse_payload(&self, body: &str) -> Result<EncodedPayload, ResolveError> {
        capture(&self.payload_pattern, body)
            .map(EncodedPayload)
            .ok_or_else(|| ResolveError::Parse {
                step: Step::Final,
                marker: self.payload_pattern.as_str().to_string(),
            })
    }

    /// Hop 4: payload → stream URL
    pub fn decode(&self, payload: &EncodedPayload) -> Result<String, ResolveError> {
        decode_payload(&payload.0, self.encoding).map_err(|source| ResolveError::Decode {
            step: Step::Decode,
            source,
        })
    }

    fn indirection_url(&self, video_id: &VideoId) -> String {
        self.indirection_url.replace("{id}", &video_id.0)
    }

    /// Referer for the player page: configured value, else the indirection site's root
    fn player_referer(&self, video_id: &VideoId) -> Option<String> {
        self.final_referer.clone().or_else(|| {
            Url::parse(&self.indirection_url(video_id))
                .ok()
                .map(|url| format!("{}/", url.origin().ascii_serialization()))
        })
    }
}

/// Decodes HTML entities one at a time, leaving bare `&` and unknown entities as they are
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let entity_len = tail[1..]
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '#'))
            .filter(|&end| end > 0 && tail[1 + end..].starts_with(';'))
            .map(|end| end + 2);

        let decoded = entity_len.and_then(|len| {
            htmlescape::decode_html(&tail[..len])
                .ok()
                .map(|decoded| (decoded, len))
        });

        match decoded {
            Some((decoded, len)) => {
                out.push_str(&decoded);
                rest = &tail[len..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Returns capture group 1 of the first match
fn capture(pattern: &Regex, body: &str) -> Option<String> {
    pattern
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.is_empty())
}

fn compile_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|_| ConfigError::InvalidPattern(format!("Invalid CSS selector '{}'", selector)))
}

fn compile_regex(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern)
        .map_err(|e| ConfigError::InvalidPattern(format!("Invalid regex '{}': {}", pattern, e)))
}
