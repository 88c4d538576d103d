use crate::config::SeasonsConfig;
use crate::extractor::json::{first_field, source_hints};
use crate::model::{CatalogEntry, ResolvedStream};
use crate::resolver::{CandidateFilter, ResolveError, Step};
use crate::source::Fetcher;
use serde_json::Value;

/// Resolves series entries through their season/episode listing
///
/// The listing is a JSON array of seasons, each with an `episodes` array whose items carry
/// `sources` like catalog items do.
#[derive(Debug, Clone)]
pub struct SeasonListing {
    url_template: String,
}

impl SeasonListing {
    /// Creates a listing; `url_template` must contain `{id}`
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
        }
    }

    pub fn from_config(config: &SeasonsConfig) -> Self {
        Self::new(&config.url)
    }

    pub fn listing_url(&self, entry: &CatalogEntry) -> String {
        self.url_template.replace("{id}", &entry.id)
    }

    /// Fetches the listing and returns every accepted episode stream
    pub async fn resolve(
        &self,
        fetcher: &Fetcher,
        filter: &CandidateFilter,
        entry: &CatalogEntry,
    ) -> Result<Vec<ResolvedStream>, ResolveError> {
        let page = fetcher
            .get(&self.listing_url(entry), &[])
            .await
            .map_err(|source| ResolveError::Fetch {
                step: Step::Seasons,
                source,
            })?;

        parse_seasons(&page.body, filter, entry)
    }
}

/// Turns a season listing body into episode streams
pub fn parse_seasons(
    body: &str,
    filter: &CandidateFilter,
    entry: &CatalogEntry,
) -> Result<Vec<ResolvedStream>, ResolveError> {
    let listing: Value = serde_json::from_str(body).map_err(|_| ResolveError::Parse {
        step: Step::Seasons,
        marker: "season listing JSON".to_string(),
    })?;

    let seasons = listing.as_array().ok_or_else(|| ResolveError::Parse {
        step: Step::Seasons,
        marker: "season array".to_string(),
    })?;

    let mut streams = Vec::new();
    for season in seasons {
        let season_title = first_field(season, &["title"]).unwrap_or_else(|| "Season".to_string());
        let episodes = season
            .get("episodes")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for episode in episodes {
            let episode_title =
                first_field(episode, &["title"]).unwrap_or_else(|| "Episode".to_string());

            for hint in source_hints(episode).iter().filter(|h| filter.accepts(h)) {
                streams.push(
                    ResolvedStream::new(entry.clone(), hint.url.clone())
                        .with_quality(hint.quality.clone())
                        .with_episode(format!("{} - {}", season_title, episode_title)),
                );
            }
        }
    }

    Ok(streams)
}
