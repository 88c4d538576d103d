//! HTML listing extractor
//!
//! Parses listing pages with configurable CSS selectors:
//! - One element per catalog item (`item-selector`)
//! - The detail link from an attribute of the item or its first `<a href>`
//! - Optional title and logo selectors scoped to the item

use crate::config::ExtractorConfig;
use crate::extractor::{ExtractError, Extractor};
use crate::model::CatalogEntry;
use crate::source::RawPage;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Extracts entries from an HTML listing page
pub struct HtmlListingExtractor {
    item_selector: Selector,
    link_attribute: String,
    title_selector: Option<Selector>,
    logo_selector: Option<Selector>,
    logo_attribute: String,
    anchor_selector: Selector,
}

impl HtmlListingExtractor {
    /// Creates an extractor matching items with `item_selector`
    pub fn new(item_selector: &str) -> Result<Self, ExtractError> {
        Ok(Self {
            item_selector: parse_selector(item_selector)?,
            link_attribute: "href".to_string(),
            title_selector: None,
            logo_selector: None,
            logo_attribute: "src".to_string(),
            anchor_selector: parse_selector("a[href]")?,
        })
    }

    /// Builds an extractor from `[extractor]` settings
    pub fn from_config(config: &ExtractorConfig) -> Result<Self, ExtractError> {
        let item_selector = config.item_selector.as_deref().ok_or_else(|| {
            ExtractError::Selector("html extractor requires an item selector".to_string())
        })?;

        let mut extractor = Self::new(item_selector)?;
        extractor.link_attribute = config.link_attribute.clone();
        extractor.logo_attribute = config.logo_attribute.clone();
        extractor.title_selector = config
            .title_selector
            .as_deref()
            .map(parse_selector)
            .transpose()?;
        extractor.logo_selector = config
            .logo_selector
            .as_deref()
            .map(parse_selector)
            .transpose()?;

        Ok(extractor)
    }

    /// Finds the detail link on the item itself or its first anchor
    fn item_link(&self, item: &ElementRef<'_>, base_url: &Url) -> Option<String> {
        let href = item.value().attr(&self.link_attribute).or_else(|| {
            item.select(&self.anchor_selector)
                .next()
                .and_then(|a| a.value().attr("href"))
        })?;

        resolve_link(href, base_url)
    }

    fn item_title(&self, item: &ElementRef<'_>) -> Option<String> {
        let text = match &self.title_selector {
            Some(selector) => item.select(selector).next().map(element_text),
            None => Some(element_text(*item)),
        };

        text.filter(|t| !t.is_empty())
            .or_else(|| item.value().attr("title").map(|t| t.trim().to_string()))
            .filter(|t| !t.is_empty())
    }

    fn item_logo(&self, item: &ElementRef<'_>, base_url: &Url) -> Option<String> {
        let selector = self.logo_selector.as_ref()?;
        let image = item.select(selector).next()?;
        let src = image
            .value()
            .attr(&self.logo_attribute)
            .or_else(|| image.value().attr("data-src"))?;

        resolve_link(src, base_url)
    }
}

impl Extractor for HtmlListingExtractor {
    fn name(&self) -> &str {
        "html"
    }

    fn extract(&self, page: &RawPage) -> Result<Vec<CatalogEntry>, ExtractError> {
        let base_url = Url::parse(&page.url).map_err(|e| {
            ExtractError::UnexpectedShape(format!("page URL '{}' is invalid: {}", page.url, e))
        })?;
        let document = Html::parse_document(&page.body);

        let mut entries = Vec::new();
        for item in document.select(&self.item_selector) {
            let Some(link) = self.item_link(&item, &base_url) else {
                tracing::debug!("Skipping listing item without a usable link on {}", page.url);
                continue;
            };

            let mut entry = CatalogEntry::new(link.clone()).with_detail_url(link);
            entry.title = self.item_title(&item);
            entry.logo = self.item_logo(&item, &base_url);
            entries.push(entry);
        }

        Ok(entries)
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|_| ExtractError::Selector(selector.to_string()))
}

/// Collects an element's text with whitespace collapsed
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel:, data: schemes
/// - Fragment-only links
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url.to_string())
    } else {
        None
    }
}
