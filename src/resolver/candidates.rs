use crate::config::ResolverConfig;
use crate::model::{CatalogEntry, ResolvedStream, SourceHint};
use url::Url;

/// Accepts stream candidates by file suffix and quality tag
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    suffixes: Vec<String>,
    qualities: Vec<String>,
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self::new(vec![".m3u8".to_string()], Vec::new())
    }
}

impl CandidateFilter {
    /// Creates a filter; an empty `qualities` list accepts every quality
    pub fn new(suffixes: Vec<String>, qualities: Vec<String>) -> Self {
        Self {
            suffixes: suffixes.into_iter().map(|s| s.to_ascii_lowercase()).collect(),
            qualities: qualities
                .into_iter()
                .map(|q| q.trim().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(config.stream_suffixes.clone(), config.qualities.clone())
    }

    /// Returns true if the candidate is a recognized stream with an accepted quality
    pub fn accepts(&self, hint: &SourceHint) -> bool {
        self.has_stream_suffix(&hint.url) && self.has_accepted_quality(hint.quality.as_deref())
    }

    /// Turns an entry's accepted candidates into resolved streams, in listing order
    pub fn resolve(&self, entry: &CatalogEntry) -> Vec<ResolvedStream> {
        entry
            .sources
            .iter()
            .filter(|hint| self.accepts(hint))
            .map(|hint| {
                ResolvedStream::new(entry.clone(), hint.url.clone())
                    .with_quality(hint.quality.clone())
            })
            .collect()
    }

    /// Checks the URL path (query and fragment ignored) against the suffix list
    fn has_stream_suffix(&self, url: &str) -> bool {
        let path = match Url::parse(url) {
            Ok(parsed) => parsed.path().to_ascii_lowercase(),
            Err(_) => return false,
        };

        self.suffixes.iter().any(|suffix| path.ends_with(suffix))
    }

    fn has_accepted_quality(&self, quality: Option<&str>) -> bool {
        if self.qualities.is_empty() {
            return true;
        }

        quality
            .map(|q| q.trim().to_ascii_lowercase())
            .is_some_and(|q| self.qualities.contains(&q))
    }
}
