use serde::{Deserialize, Serialize};

/// A pre-known stream candidate listed directly by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceHint {
    /// Candidate stream URL
    pub url: String,

    /// Quality tag as reported by the source (e.g. "720p")
    pub quality: Option<String>,
}

impl SourceHint {
    pub fn new(url: impl Into<String>, quality: Option<String>) -> Self {
        Self {
            url: url.into(),
            quality,
        }
    }
}

/// One media entry parsed out of a catalog page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Source-unique identifier
    pub id: String,

    /// Display title (if the source supplied one)
    pub title: Option<String>,

    /// Release year
    pub year: Option<String>,

    /// Logo or poster URL
    pub logo: Option<String>,

    /// URL of the entry's detail page, the start of the hop chain
    pub detail_url: Option<String>,

    /// Stream candidates already present in the catalog record
    pub sources: Vec<SourceHint>,
}

impl CatalogEntry {
    /// Creates an entry with only an identifier set
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            year: None,
            logo: None,
            detail_url: None,
            sources: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    pub fn with_detail_url(mut self, url: impl Into<String>) -> Self {
        self.detail_url = Some(url.into());
        self
    }

    pub fn with_source(mut self, source: SourceHint) -> Self {
        self.sources.push(source);
        self
    }

    /// Returns the URL the hop chain starts from
    ///
    /// Falls back to the identifier when it is itself an absolute URL (HTML listings
    /// identify entries by their detail link).
    pub fn detail_link(&self) -> Option<&str> {
        self.detail_url.as_deref().or_else(|| {
            (self.id.starts_with("http://") || self.id.starts_with("https://"))
                .then_some(self.id.as_str())
        })
    }

    /// Returns a copy with missing title/logo filled from a detail page
    ///
    /// Values already supplied by the catalog win.
    pub fn enriched(&self, title: Option<String>, logo: Option<String>) -> Self {
        let mut entry = self.clone();
        if entry.title.is_none() {
            entry.title = title;
        }
        if entry.logo.is_none() {
            entry.logo = logo;
        }
        entry
    }
}
