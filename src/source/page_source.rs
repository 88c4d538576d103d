use crate::config::Config;
use crate::source::{Fetcher, RawPage};
use crate::FetchError;
use async_trait::async_trait;

/// Supplies raw catalog pages by index
///
/// Implementations only do I/O and status checking; a non-success status is returned as
/// [`FetchError::Status`] and interpreted by the crawler.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Returns the name of this source (used in logs and reports).
    fn name(&self) -> &str;

    /// Fetches one catalog page.
    async fn fetch_page(&self, page: u32) -> Result<RawPage, FetchError>;
}

/// Page source backed by an HTTP URL template
pub struct HttpPageSource {
    name: String,
    template: String,
    fetcher: Fetcher,
    headers: Vec<(String, String)>,
}

impl HttpPageSource {
    /// Creates a source; `template` must contain `{page}`
    pub fn new(name: impl Into<String>, template: impl Into<String>, fetcher: Fetcher) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            fetcher,
            headers: Vec::new(),
        }
    }

    /// Builds the source described by `[source]` and `[http]`
    pub fn from_config(config: &Config, fetcher: Fetcher) -> Self {
        let mut source = Self::new(&config.source.name, &config.source.page_url, fetcher);
        if let Some(referer) = &config.http.referer {
            source = source.with_header("Referer", referer);
        }
        source
    }

    /// Adds a static header sent with every page request
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns the URL for a page index
    pub fn page_url(&self, page: u32) -> String {
        self.template.replace("{page}", &page.to_string())
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_page(&self, page: u32) -> Result<RawPage, FetchError> {
        let url = self.page_url(page);
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        self.fetcher.get(&url, &headers).await
    }
}
