use crate::model::CatalogEntry;

/// Headers a player must send to fetch a stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamHeaders {
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl StreamHeaders {
    pub fn is_empty(&self) -> bool {
        self.user_agent.is_none() && self.referer.is_none()
    }
}

/// A catalog entry resolved to one playable URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStream {
    /// The entry this stream belongs to (possibly enriched from its detail page)
    pub entry: CatalogEntry,

    /// Final playable URL
    pub url: String,

    /// Quality label, when the source reports one
    pub quality: Option<String>,

    /// Episode label ("Season 1 - Episode 3") for series listings
    pub episode: Option<String>,

    /// Headers required by a player, overriding the playlist defaults
    pub headers: StreamHeaders,
}

impl ResolvedStream {
    pub fn new(entry: CatalogEntry, url: impl Into<String>) -> Self {
        Self {
            entry,
            url: url.into(),
            quality: None,
            episode: None,
            headers: StreamHeaders::default(),
        }
    }

    pub fn with_quality(mut self, quality: Option<String>) -> Self {
        self.quality = quality.filter(|q| !q.trim().is_empty());
        self
    }

    pub fn with_episode(mut self, episode: impl Into<String>) -> Self {
        self.episode = Some(episode.into());
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.headers.referer = Some(referer.into());
        self
    }
}
