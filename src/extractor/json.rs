use crate::extractor::{ExtractError, Extractor};
use crate::model::{CatalogEntry, SourceHint};
use crate::source::RawPage;
use serde_json::Value;

/// Extracts entries from a JSON array of catalog items
///
/// Recognized item fields:
/// - `id` (string or number, required)
/// - `title` / `name`
/// - `year` (string or number)
/// - `image` / `poster`
/// - `link` / `url` (detail page)
/// - `sources`: `[{ "url": ..., "quality": ... }]`
pub struct JsonCatalogExtractor {
    items_field: Option<String>,
}

impl JsonCatalogExtractor {
    /// Creates an extractor; `items_field` names the array when the body is an object
    pub fn new(items_field: Option<String>) -> Self {
        Self { items_field }
    }

    fn items<'a>(&self, body: &'a Value) -> Result<&'a [Value], ExtractError> {
        let array = match (&self.items_field, body) {
            (_, Value::Null) => return Ok(&[]),
            (Some(field), Value::Object(map)) => match map.get(field) {
                Some(items) => items,
                None => return Ok(&[]),
            },
            (None, Value::Object(map)) if map.is_empty() => return Ok(&[]),
            (_, other) => other,
        };

        match array {
            Value::Array(items) => Ok(items.as_slice()),
            Value::Null => Ok(&[]),
            other => Err(ExtractError::UnexpectedShape(format!(
                "expected an array of items, got {}",
                json_kind(other)
            ))),
        }
    }
}

impl Extractor for JsonCatalogExtractor {
    fn name(&self) -> &str {
        "json"
    }

    fn extract(&self, page: &RawPage) -> Result<Vec<CatalogEntry>, ExtractError> {
        let body: Value = serde_json::from_str(&page.body)?;
        let items = self.items(&body)?;

        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            match entry_from_item(item) {
                Some(entry) => entries.push(entry),
                None => tracing::debug!("Skipping catalog item without id on {}", page.url),
            }
        }

        if entries.is_empty() && !items.is_empty() {
            tracing::warn!(
                "All {} items on {} lack an id; the page counts as end of catalog",
                items.len(),
                page.url
            );
        }

        Ok(entries)
    }
}

/// Builds one entry from a JSON item, or `None` when it has no identifier
pub(crate) fn entry_from_item(item: &Value) -> Option<CatalogEntry> {
    let id = item.get("id").and_then(scalar_string)?;

    let mut entry = CatalogEntry::new(id);
    entry.title = first_field(item, &["title", "name"]);
    entry.year = first_field(item, &["year"]);
    entry.logo = first_field(item, &["image", "poster"]);
    entry.detail_url = first_field(item, &["link", "url"]);
    entry.sources = source_hints(item);

    Some(entry)
}

/// Reads the `sources` array of an item (or episode)
pub(crate) fn source_hints(item: &Value) -> Vec<SourceHint> {
    item.get("sources")
        .and_then(Value::as_array)
        .map(|sources| {
            sources
                .iter()
                .filter_map(|source| {
                    let url = source.get("url").and_then(scalar_string)?;
                    let quality = source.get("quality").and_then(scalar_string);
                    Some(SourceHint::new(url, quality))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Returns the first non-empty field among `keys`
pub(crate) fn first_field(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| item.get(*key).and_then(scalar_string))
}

/// Reads a string or number as a trimmed, non-empty string
fn scalar_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
