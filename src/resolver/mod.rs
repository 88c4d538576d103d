//! Link resolution
//!
//! Turns one catalog entry into zero or more playable streams. Three modes exist:
//! - Candidate filtering, when the catalog already lists stream URLs (no network access)
//! - The multi-hop chain (detail → video id → player → encoded URL)
//! - The season listing for series catalogs
//!
//! Any step failure abandons the entry and is reported as a [`ResolveError`] naming the step.

mod candidates;
mod chain;
mod decode;
mod seasons;

pub use candidates::CandidateFilter;
pub use chain::{DetailMeta, DetailUrl, EncodedPayload, IndirectionUrl, MultiHopChain, VideoId};
pub use decode::{decode_payload, encode_payload, DecodeError};
pub use seasons::{parse_seasons, SeasonListing};

use crate::config::ResolverConfig;
use crate::model::{CatalogEntry, ResolvedStream};
use crate::source::Fetcher;
use crate::{ConfigError, FetchError};
use std::fmt;
use thiserror::Error;

/// Name of a resolution step, reported with every failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Candidates,
    Detail,
    Indirection,
    Final,
    Decode,
    Seasons,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Candidates => "candidates",
            Self::Detail => "detail",
            Self::Indirection => "indirection",
            Self::Final => "final",
            Self::Decode => "decode",
            Self::Seasons => "seasons",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an entry produced no streams
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("step '{step}' fetch failed: {source}")]
    Fetch { step: Step, source: FetchError },

    #[error("step '{step}' marker not found: {marker}")]
    Parse { step: Step, marker: String },

    #[error("step '{step}' decode failed: {source}")]
    Decode { step: Step, source: DecodeError },

    #[error("no stream candidate matched the filters")]
    NoCandidates,
}

impl ResolveError {
    /// The step that failed
    pub fn step(&self) -> Step {
        match self {
            Self::Fetch { step, .. } | Self::Parse { step, .. } | Self::Decode { step, .. } => {
                *step
            }
            Self::NoCandidates => Step::Candidates,
        }
    }
}

/// Resolves catalog entries to streams
///
/// Holds no per-entry state; the same resolver is reused for every entry of a run.
pub struct LinkResolver {
    fetcher: Fetcher,
    filter: CandidateFilter,
    chain: Option<MultiHopChain>,
    seasons: Option<SeasonListing>,
}

impl LinkResolver {
    /// Creates a resolver that only filters pre-listed candidates
    pub fn new(fetcher: Fetcher, filter: CandidateFilter) -> Self {
        Self {
            fetcher,
            filter,
            chain: None,
            seasons: None,
        }
    }

    /// Builds the resolver described by `[resolver]`
    pub fn from_config(config: &ResolverConfig, fetcher: Fetcher) -> Result<Self, ConfigError> {
        let mut resolver = Self::new(fetcher, CandidateFilter::from_config(config));

        if let Some(hop) = &config.multi_hop {
            resolver = resolver.with_chain(MultiHopChain::from_config(hop)?);
        }
        if let Some(seasons) = &config.seasons {
            resolver = resolver.with_seasons(SeasonListing::from_config(seasons));
        }

        Ok(resolver)
    }

    pub fn with_chain(mut self, chain: MultiHopChain) -> Self {
        self.chain = Some(chain);
        self
    }

    pub fn with_seasons(mut self, seasons: SeasonListing) -> Self {
        self.seasons = Some(seasons);
        self
    }

    /// Resolves an entry, reporting the failing step on error
    ///
    /// Mode selection:
    /// 1. Entry lists no candidates and a multi-hop chain is configured → run the chain
    /// 2. Otherwise filter the listed candidates (no network access)
    /// 3. Season listing configured → append its episodes after the candidates
    ///
    /// A season listing failure only drops the entry when no candidate survived the filter.
    /// An empty result is reported as [`ResolveError::NoCandidates`].
    pub async fn try_resolve(
        &self,
        entry: &CatalogEntry,
    ) -> Result<Vec<ResolvedStream>, ResolveError> {
        if entry.sources.is_empty() {
            if let Some(chain) = &self.chain {
                return Ok(vec![chain.resolve(&self.fetcher, entry).await?]);
            }
        }

        let mut streams = self.filter.resolve(entry);

        if let Some(seasons) = &self.seasons {
            match seasons.resolve(&self.fetcher, &self.filter, entry).await {
                Ok(episodes) => streams.extend(episodes),
                Err(e) if !streams.is_empty() => {
                    tracing::warn!(
                        entry = %entry.id,
                        "Season listing failed, keeping {} listed streams: {}",
                        streams.len(),
                        e
                    );
                }
                Err(e) => return Err(e),
            }
        }

        if streams.is_empty() {
            return Err(ResolveError::NoCandidates);
        }

        Ok(streams)
    }

    /// Resolves an entry, logging and swallowing any failure
    pub async fn resolve(&self, entry: &CatalogEntry) -> Vec<ResolvedStream> {
        match self.try_resolve(entry).await {
            Ok(streams) => streams,
            Err(e) => {
                tracing::warn!(entry = %entry.id, step = %e.step(), "Entry dropped: {}", e);
                Vec::new()
            }
        }
    }
}
