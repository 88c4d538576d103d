use crate::config::Config;
use crate::crawler::{CatalogCrawler, CrawlOptions};
use crate::extractor::Extractor;
use crate::output::RunSummary;
use crate::playlist::PlaylistBuilder;
use crate::resolver::LinkResolver;
use crate::source::{Fetcher, PageSource};
use crate::{ConfigError, PipelineError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Drives one run: crawl, resolve, append
///
/// Entries are processed strictly one at a time. A failing entry is counted and skipped;
/// only a failure on the first catalog page aborts the run.
pub struct Orchestrator {
    resolver: LinkResolver,
    crawl: CrawlOptions,
    entry_delay: Duration,
    cancel: CancellationToken,
}

impl Orchestrator {
    pub fn new(resolver: LinkResolver, crawl: CrawlOptions, entry_delay: Duration) -> Self {
        Self {
            resolver,
            crawl,
            entry_delay,
            cancel: CancellationToken::new(),
        }
    }

    /// Builds the orchestrator for a validated configuration
    pub fn from_config(config: &Config, fetcher: Fetcher) -> Result<Self, ConfigError> {
        let resolver = LinkResolver::from_config(&config.resolver, fetcher)?;
        let delay = Duration::try_from_secs_f64(config.orchestrator.entry_delay_secs)
            .map_err(|e| {
                ConfigError::Validation(format!(
                    "entry-delay-secs {} is not a valid duration: {}",
                    config.orchestrator.entry_delay_secs, e
                ))
            })?;

        Ok(Self::new(resolver, CrawlOptions::from(&config.source), delay))
    }

    /// Stops the run when `token` fires; the partial playlist is kept
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Crawls the catalog and appends every resolved stream to `builder`
    ///
    /// This method:
    /// 1. Pulls entries lazily from the crawler
    /// 2. Waits the configured delay between entries
    /// 3. Resolves each entry, counting failures with their step
    /// 4. Returns the run summary
    pub async fn run(
        &self,
        source: &dyn PageSource,
        extractor: &dyn Extractor,
        builder: &mut PlaylistBuilder,
    ) -> Result<RunSummary, PipelineError> {
        tracing::info!("Starting harvest of '{}'", source.name());

        let mut summary = RunSummary::start(source.name());
        let mut crawler = CatalogCrawler::new(source, extractor, self.crawl.clone())
            .with_cancellation(self.cancel.clone());
        let start_time = std::time::Instant::now();
        let mut interrupted = false;

        loop {
            let entry = match crawler.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    summary.pages = crawler.pages_fetched();
                    summary.finish();
                    return Err(e.into());
                }
            };

            if summary.attempted > 0 && !self.pause().await {
                interrupted = true;
                break;
            }

            tracing::debug!("Resolving entry {}", entry.id);

            match self.resolver.try_resolve(&entry).await {
                Ok(streams) => {
                    builder.extend(&streams);
                    summary.record_success(streams.len());
                }
                Err(e) => {
                    tracing::warn!(entry = %entry.id, step = %e.step(), "Entry dropped: {}", e);
                    summary.record_failure(&entry, &e);
                }
            }

            if summary.attempted % 25 == 0 {
                tracing::info!(
                    "Progress: {} entries, {} resolved, {} pages, {:.2} entries/sec",
                    summary.attempted,
                    summary.resolved,
                    crawler.pages_fetched(),
                    summary.attempted as f64 / start_time.elapsed().as_secs_f64()
                );
            }
        }

        summary.pages = crawler.pages_fetched();
        summary.cancelled = interrupted || crawler.was_cancelled();
        summary.finish();

        if summary.cancelled {
            tracing::warn!(
                "Harvest cancelled after {} entries; keeping partial playlist",
                summary.attempted
            );
        } else if summary.is_empty_catalog() {
            tracing::warn!(
                "{}",
                PipelineError::EmptyCatalog {
                    source_name: summary.source_name.clone()
                }
            );
        }

        tracing::info!(
            "Harvest completed: {} of {} entries resolved, {} streams in {:?}",
            summary.resolved,
            summary.attempted,
            summary.streams,
            start_time.elapsed()
        );

        Ok(summary)
    }

    /// Waits out the entry delay; returns false if cancelled meanwhile
    async fn pause(&self) -> bool {
        if self.entry_delay.is_zero() {
            return !self.cancel.is_cancelled();
        }

        tokio::select! {
            _ = tokio::time::sleep(self.entry_delay) => true,
            _ = self.cancel.cancelled() => false,
        }
    }
}
