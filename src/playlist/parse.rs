use crate::playlist::{PlaylistError, PlaylistRecord, PlaylistResult, M3U_HEADER};
use regex::Regex;
use std::sync::OnceLock;

fn attribute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"([A-Za-z0-9-]+)="([^"]*)""#).expect("attribute pattern is valid")
    })
}

/// Reads M3U text back into playlist records
///
/// `#EXTINF` starts a record, `#EXTVLCOPT` lines attach options, and the next non-comment
/// line is taken as the stream URL. A URL without a preceding `#EXTINF` gets
/// `fallback_title`. Other directives are ignored.
///
/// # Example
///
/// ```
/// use stream_harvest::playlist::parse_playlist;
///
/// let text = "#EXTM3U\n#EXTINF:-1 tvg-logo=\"\" group-title=\"Movies\",X (2020)\nhttp://h/a.m3u8\n";
/// let records = parse_playlist(text, "Unknown").unwrap();
/// assert_eq!(records[0].title, "X (2020)");
/// assert_eq!(records[0].group.as_deref(), Some("Movies"));
/// ```
pub fn parse_playlist(text: &str, fallback_title: &str) -> PlaylistResult<Vec<PlaylistRecord>> {
    let mut lines = text
        .lines()
        .map(|l| l.trim_start_matches('\u{feff}').trim())
        .filter(|l| !l.is_empty());

    match lines.next() {
        Some(first) if first.starts_with(M3U_HEADER) => {}
        Some(first) => {
            return Err(PlaylistError::Format(format!(
                "expected '{}' header, found '{}'",
                M3U_HEADER, first
            )))
        }
        None => return Err(PlaylistError::Format("empty input".to_string())),
    }

    let mut records = Vec::new();
    let mut pending: Option<PlaylistRecord> = None;

    for line in lines {
        if let Some(info) = line.strip_prefix("#EXTINF:") {
            pending = Some(parse_extinf(info, fallback_title));
        } else if let Some(option) = line.strip_prefix("#EXTVLCOPT:") {
            if let Some(record) = pending.as_mut() {
                record.options.push(option.to_string());
            }
        } else if line.starts_with('#') {
            continue;
        } else {
            let mut record = pending
                .take()
                .unwrap_or_else(|| empty_record(fallback_title));
            record.url = line.to_string();
            records.push(record);
        }
    }

    Ok(records)
}

/// Parses the part of an `#EXTINF` line after the colon
fn parse_extinf(info: &str, fallback_title: &str) -> PlaylistRecord {
    let (head, title) = split_title(info);
    let mut record = empty_record(fallback_title);

    if !title.is_empty() {
        record.title = title.to_string();
    }

    for caps in attribute_pattern().captures_iter(head) {
        let value = caps[2].to_string();
        match &caps[1] {
            "tvg-id" => record.tvg_id = Some(value),
            "tvg-logo" => record.logo = value,
            "tvg-name" => record.tvg_name = Some(value),
            "group-title" => record.group = Some(value),
            _ => {}
        }
    }

    record
}

/// Splits at the first comma outside double quotes
fn split_title(info: &str) -> (&str, &str) {
    let mut in_quotes = false;
    for (i, c) in info.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => return (&info[..i], info[i + 1..].trim()),
            _ => {}
        }
    }
    (info, "")
}

fn empty_record(fallback_title: &str) -> PlaylistRecord {
    PlaylistRecord {
        title: fallback_title.to_string(),
        logo: String::new(),
        tvg_id: None,
        tvg_name: None,
        group: None,
        url: String::new(),
        options: Vec::new(),
    }
}
