use serde::Deserialize;

/// Main configuration structure for Stream-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    pub playlist: PlaylistConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

/// How catalog pages are shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// JSON array of catalog items
    Json,
    /// HTML listing parsed with CSS selectors
    Html,
}

/// Catalog source and pagination
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SourceConfig {
    /// Name used in logs and reports
    pub name: String,

    pub kind: SourceKind,

    /// Page URL template; `{page}` is replaced with the page index
    pub page_url: String,

    /// First page index (0 or 1 depending on the source)
    #[serde(default)]
    pub initial_page: u32,

    /// Maximum number of pages to fetch (unbounded when absent)
    #[serde(default)]
    pub max_pages: Option<u32>,

    /// A page shorter than this ends the crawl after it is delivered
    #[serde(default)]
    pub page_size: Option<usize>,
}

/// HTTP client behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HttpConfig {
    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Referer sent with catalog page requests
    #[serde(default)]
    pub referer: Option<String>,

    /// Total request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Extra attempts for 5xx responses and timeouts
    #[serde(default)]
    pub max_retries: u32,

    /// Delay between attempts (milliseconds)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            referer: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_retries: 0,
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Extractor settings; JSON sources use `items_field`, HTML sources use the selectors
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExtractorConfig {
    /// Field holding the item array when the JSON body is an object
    #[serde(default)]
    pub items_field: Option<String>,

    /// Selector matching one catalog item
    #[serde(default)]
    pub item_selector: Option<String>,

    /// Attribute on the item (or its first `a`) holding the detail link
    #[serde(default = "default_link_attribute")]
    pub link_attribute: String,

    /// Selector for the title inside an item (item text when absent)
    #[serde(default)]
    pub title_selector: Option<String>,

    /// Selector for the logo image inside an item
    #[serde(default)]
    pub logo_selector: Option<String>,

    #[serde(default = "default_logo_attribute")]
    pub logo_attribute: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            items_field: None,
            item_selector: None,
            link_attribute: default_link_attribute(),
            title_selector: None,
            logo_selector: None,
            logo_attribute: default_logo_attribute(),
        }
    }
}

/// Link resolution settings
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolverConfig {
    /// Recognized stream file suffixes
    #[serde(default = "default_stream_suffixes")]
    pub stream_suffixes: Vec<String>,

    /// Accepted quality tags (all accepted when empty)
    #[serde(default)]
    pub qualities: Vec<String>,

    #[serde(default)]
    pub multi_hop: Option<MultiHopConfig>,

    #[serde(default)]
    pub seasons: Option<SeasonsConfig>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            stream_suffixes: default_stream_suffixes(),
            qualities: Vec::new(),
            multi_hop: None,
            seasons: None,
        }
    }
}

/// Encoding applied to the final URL payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadEncoding {
    Plain,
    #[default]
    Base64,
}

/// Detail → identifier → indirection → final URL chain
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MultiHopConfig {
    /// Element on the detail page carrying the video identifier
    pub video_id_selector: String,

    #[serde(default = "default_video_id_attribute")]
    pub video_id_attribute: String,

    /// Indirection URL template; `{id}` is replaced with the video identifier
    pub indirection_url: String,

    /// Regex whose first group captures the embedded player URL
    #[serde(default = "default_iframe_pattern")]
    pub iframe_pattern: String,

    /// Regex whose first group captures the encoded stream URL
    #[serde(default = "default_payload_pattern")]
    pub payload_pattern: String,

    #[serde(default)]
    pub payload_encoding: PayloadEncoding,

    /// Referer sent to the embedded player (indirection URL origin when absent)
    #[serde(default)]
    pub final_referer: Option<String>,

    #[serde(default)]
    pub title_selector: Option<String>,

    #[serde(default)]
    pub poster_selector: Option<String>,

    #[serde(default = "default_logo_attribute")]
    pub poster_attribute: String,
}

/// Per-entry season listing for series catalogs
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SeasonsConfig {
    /// Season listing URL template; `{id}` is replaced with the entry identifier
    pub url: String,
}

/// Output playlist settings
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlaylistConfig {
    /// Path of the M3U file to write
    pub path: String,

    /// `group-title` attribute for every record
    #[serde(default)]
    pub group_title: Option<String>,

    /// Title used when the source supplies none
    #[serde(default = "default_fallback_title")]
    pub fallback_title: String,

    /// `#EXTVLCOPT:http-user-agent` value
    #[serde(default)]
    pub user_agent: Option<String>,

    /// `#EXTVLCOPT:http-referrer` value
    #[serde(default)]
    pub referrer: Option<String>,

    /// Optional markdown run report
    #[serde(default)]
    pub report_path: Option<String>,
}

/// Run pacing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OrchestratorConfig {
    /// Delay between entries (seconds)
    #[serde(default = "default_entry_delay_secs")]
    pub entry_delay_secs: f64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            entry_delay_secs: default_entry_delay_secs(),
        }
    }
}

fn default_user_agent() -> String {
    "okhttp/4.12.0".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_link_attribute() -> String {
    "href".to_string()
}

fn default_logo_attribute() -> String {
    "src".to_string()
}

fn default_video_id_attribute() -> String {
    "data-video".to_string()
}

fn default_iframe_pattern() -> String {
    r#"data-src=\\?"(https?:\\?/\\?/[^"]+)"#.to_string()
}

fn default_payload_pattern() -> String {
    r#"file_link="([^"]+)""#.to_string()
}

fn default_stream_suffixes() -> Vec<String> {
    vec![".m3u8".to_string()]
}

fn default_fallback_title() -> String {
    "Unknown".to_string()
}

fn default_entry_delay_secs() -> f64 {
    1.0
}
