use crate::config::types::{
    Config, ExtractorConfig, HttpConfig, MultiHopConfig, OrchestratorConfig, PlaylistConfig,
    ResolverConfig, SourceConfig, SourceKind,
};
use crate::ConfigError;
use regex::Regex;
use scraper::Selector;
use url::Url;

/// Longest accepted pause between entries (one hour)
pub const MAX_ENTRY_DELAY_SECS: f64 = 3600.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_http_config(&config.http)?;
    validate_extractor_config(config.source.kind, &config.extractor)?;
    validate_resolver_config(&config.resolver)?;
    validate_playlist_config(&config.playlist)?;
    validate_orchestrator_config(&config.orchestrator)?;
    Ok(())
}

/// Validates the catalog source and pagination settings
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    if config.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "source name cannot be empty".to_string(),
        ));
    }

    validate_template(&config.page_url, "{page}", "page-url")?;

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1 when set".to_string(),
        ));
    }

    if config.page_size == Some(0) {
        return Err(ConfigError::Validation(
            "page-size must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP client settings
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be between 1 and timeout-secs ({}), got {}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    if let Some(referer) = &config.referer {
        Url::parse(referer)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid referer '{}': {}", referer, e)))?;
    }

    Ok(())
}

/// Validates extractor selectors against the source kind
fn validate_extractor_config(kind: SourceKind, config: &ExtractorConfig) -> Result<(), ConfigError> {
    if kind == SourceKind::Html {
        let item_selector = config.item_selector.as_deref().ok_or_else(|| {
            ConfigError::Validation("html sources require extractor.item-selector".to_string())
        })?;
        validate_selector(item_selector)?;
    }

    for selector in [&config.title_selector, &config.logo_selector]
        .into_iter()
        .flatten()
    {
        validate_selector(selector)?;
    }

    Ok(())
}

/// Validates resolver filters and chain settings
fn validate_resolver_config(config: &ResolverConfig) -> Result<(), ConfigError> {
    if config.stream_suffixes.is_empty() {
        return Err(ConfigError::Validation(
            "stream-suffixes cannot be empty".to_string(),
        ));
    }

    for suffix in &config.stream_suffixes {
        if !suffix.starts_with('.') || suffix.len() < 2 {
            return Err(ConfigError::Validation(format!(
                "stream suffix must look like '.ext', got '{}'",
                suffix
            )));
        }
    }

    if let Some(hop) = &config.multi_hop {
        validate_multi_hop(hop)?;
    }

    if let Some(seasons) = &config.seasons {
        validate_template(&seasons.url, "{id}", "seasons.url")?;
    }

    Ok(())
}

fn validate_multi_hop(config: &MultiHopConfig) -> Result<(), ConfigError> {
    validate_selector(&config.video_id_selector)?;
    validate_template(&config.indirection_url, "{id}", "indirection-url")?;
    validate_capture_pattern(&config.iframe_pattern)?;
    validate_capture_pattern(&config.payload_pattern)?;

    for selector in [&config.title_selector, &config.poster_selector]
        .into_iter()
        .flatten()
    {
        validate_selector(selector)?;
    }

    if let Some(referer) = &config.final_referer {
        Url::parse(referer).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid final-referer '{}': {}", referer, e))
        })?;
    }

    Ok(())
}

/// Validates output settings
fn validate_playlist_config(config: &PlaylistConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "playlist path cannot be empty".to_string(),
        ));
    }

    if config.fallback_title.trim().is_empty() {
        return Err(ConfigError::Validation(
            "fallback-title cannot be empty".to_string(),
        ));
    }

    if matches!(&config.report_path, Some(p) if p.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "report-path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_orchestrator_config(config: &OrchestratorConfig) -> Result<(), ConfigError> {
    if !config.entry_delay_secs.is_finite()
        || config.entry_delay_secs < 0.0
        || config.entry_delay_secs > MAX_ENTRY_DELAY_SECS
    {
        return Err(ConfigError::Validation(format!(
            "entry-delay-secs must be between 0 and {}, got {}",
            MAX_ENTRY_DELAY_SECS, config.entry_delay_secs
        )));
    }

    Ok(())
}

/// Checks that a URL template carries its placeholder and parses once filled
fn validate_template(template: &str, placeholder: &str, field: &str) -> Result<(), ConfigError> {
    if !template.contains(placeholder) {
        return Err(ConfigError::Validation(format!(
            "{} must contain the '{}' placeholder, got '{}'",
            field, placeholder, template
        )));
    }

    let sample = template.replace(placeholder, "0");
    let url = Url::parse(&sample)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, template, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            field, template
        )));
    }

    Ok(())
}

fn validate_selector(selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector)
        .map(|_| ())
        .map_err(|_| ConfigError::InvalidPattern(format!("Invalid CSS selector '{}'", selector)))
}

fn validate_capture_pattern(pattern: &str) -> Result<(), ConfigError> {
    let regex = Regex::new(pattern)
        .map_err(|e| ConfigError::InvalidPattern(format!("Invalid regex '{}': {}", pattern, e)))?;

    if regex.captures_len() < 2 {
        return Err(ConfigError::InvalidPattern(format!(
            "Regex '{}' must have a capture group",
            pattern
        )));
    }

    Ok(())
}
