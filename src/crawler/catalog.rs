use crate::config::SourceConfig;
use crate::crawler::CrawlError;
use crate::extractor::Extractor;
use crate::model::CatalogEntry;
use crate::source::PageSource;
use std::collections::VecDeque;
use tokio_util::sync::CancellationToken;

/// Pagination options for one crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlOptions {
    /// First page index
    pub initial_page: u32,

    /// Upper bound on fetched pages (unbounded when `None`)
    pub max_pages: Option<u32>,

    /// A page with fewer entries than this is the last one
    pub page_size: Option<usize>,
}

impl From<&SourceConfig> for CrawlOptions {
    fn from(config: &SourceConfig) -> Self {
        Self {
            initial_page: config.initial_page,
            max_pages: config.max_pages,
            page_size: config.page_size,
        }
    }
}

/// Why the crawl stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Finish {
    Exhausted,
    FetchFailed,
    PageLimit,
    ShortPage,
    Cancelled,
}

/// Lazy, finite sequence of catalog entries
///
/// Pages are only fetched when the buffered entries run out. Entries are delivered in page
/// order; duplicates across pages are passed through unchanged.
pub struct CatalogCrawler<'a> {
    source: &'a dyn PageSource,
    extractor: &'a dyn Extractor,
    options: CrawlOptions,
    cursor: u32,
    pages_fetched: u32,
    buffer: VecDeque<CatalogEntry>,
    finished: Option<Finish>,
    cancel: CancellationToken,
}

impl<'a> CatalogCrawler<'a> {
    /// Creates a crawler positioned at `options.initial_page`
    pub fn new(
        source: &'a dyn PageSource,
        extractor: &'a dyn Extractor,
        options: CrawlOptions,
    ) -> Self {
        Self {
            source,
            extractor,
            cursor: options.initial_page,
            options,
            pages_fetched: 0,
            buffer: VecDeque::new(),
            finished: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Stops fetching further pages once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Number of pages successfully fetched so far
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// True once no further pages will be fetched
    pub fn is_finished(&self) -> bool {
        self.finished.is_some()
    }

    /// True if the crawl stopped because of cancellation
    pub fn was_cancelled(&self) -> bool {
        self.finished == Some(Finish::Cancelled)
    }

    /// Returns the next entry, fetching pages as needed
    ///
    /// # Returns
    ///
    /// * `Ok(Some(entry))` - The next entry in catalog order
    /// * `Ok(None)` - The catalog is exhausted (or the crawl was stopped)
    /// * `Err(CrawlError)` - The very first page failed
    pub async fn next_entry(&mut self) -> Result<Option<CatalogEntry>, CrawlError> {
        loop {
            if let Some(entry) = self.buffer.pop_front() {
                return Ok(Some(entry));
            }

            match self.next_page().await? {
                Some(entries) => self.buffer.extend(entries),
                None => return Ok(None),
            }
        }
    }

    /// Fetches and extracts the next page
    ///
    /// Returns `Ok(None)` once the crawl has finished; never returns an empty page.
    pub async fn next_page(&mut self) -> Result<Option<Vec<CatalogEntry>>, CrawlError> {
        if self.finished.is_some() {
            return Ok(None);
        }

        if self.cancel.is_cancelled() {
            tracing::info!("Crawl cancelled before page {}", self.cursor);
            return self.finish(Finish::Cancelled);
        }

        if matches!(self.options.max_pages, Some(max) if self.pages_fetched >= max) {
            tracing::info!("Reached page limit ({} pages)", self.pages_fetched);
            return self.finish(Finish::PageLimit);
        }

        let page = self.cursor;
        let is_first = self.pages_fetched == 0;

        let raw = match self.source.fetch_page(page).await {
            Ok(raw) => raw,
            Err(source) if is_first => return Err(CrawlError::FirstPage { page, source }),
            Err(e) => {
                tracing::info!("Page {} fetch failed, treating as end of catalog: {}", page, e);
                return self.finish(Finish::FetchFailed);
            }
        };

        let entries = match self.extractor.extract(&raw) {
            Ok(entries) => entries,
            Err(source) if is_first => return Err(CrawlError::FirstPageExtract { page, source }),
            Err(e) => {
                tracing::warn!("Page {} could not be parsed, ending crawl: {}", page, e);
                return self.finish(Finish::FetchFailed);
            }
        };

        self.pages_fetched += 1;
        self.cursor += 1;

        if entries.is_empty() {
            tracing::info!(
                "Catalog '{}' exhausted at page {} ({} pages with entries)",
                self.source.name(),
                page,
                self.pages_fetched - 1
            );
            return self.finish(Finish::Exhausted);
        }

        tracing::debug!("Page {} yielded {} entries", page, entries.len());

        if matches!(self.options.page_size, Some(size) if entries.len() < size) {
            tracing::info!("Page {} is short ({} entries), last page", page, entries.len());
            self.finished = Some(Finish::ShortPage);
        }

        Ok(Some(entries))
    }

    /// Drains the crawler into a vector
    pub async fn collect_all(mut self) -> Result<Vec<CatalogEntry>, CrawlError> {
        let mut entries = Vec::new();
        while let Some(page) = self.next_page().await? {
            entries.extend(page);
        }
        Ok(entries)
    }

    fn finish(&mut self, reason: Finish) -> Result<Option<Vec<CatalogEntry>>, CrawlError> {
        self.finished = Some(reason);
        Ok(None)
    }
}
