use crate::config::PlaylistConfig;
use crate::model::ResolvedStream;
use crate::playlist::{PlaylistRecord, PlaylistResult, M3U_HEADER};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Per-source playlist settings
#[derive(Debug, Clone)]
pub struct PlaylistOptions {
    /// `group-title` for every record
    pub group_title: Option<String>,

    /// Title used when an entry has none
    pub fallback_title: String,

    /// Default `http-user-agent` option
    pub user_agent: Option<String>,

    /// Default `http-referrer` option
    pub referrer: Option<String>,
}

impl Default for PlaylistOptions {
    fn default() -> Self {
        Self {
            group_title: None,
            fallback_title: "Unknown".to_string(),
            user_agent: None,
            referrer: None,
        }
    }
}

impl From<&PlaylistConfig> for PlaylistOptions {
    fn from(config: &PlaylistConfig) -> Self {
        Self {
            group_title: config.group_title.clone(),
            fallback_title: config.fallback_title.clone(),
            user_agent: config.user_agent.clone(),
            referrer: config.referrer.clone(),
        }
    }
}

/// Accumulates resolved streams in insertion order
///
/// No sorting or deduplication happens: the same URL added twice appears twice.
#[derive(Debug, Clone, Default)]
pub struct PlaylistBuilder {
    options: PlaylistOptions,
    records: Vec<PlaylistRecord>,
}

impl PlaylistBuilder {
    pub fn new(options: PlaylistOptions) -> Self {
        Self {
            options,
            records: Vec::new(),
        }
    }

    /// Builds one record from a stream and appends it
    pub fn add(&mut self, stream: &ResolvedStream) -> &PlaylistRecord {
        let record = self.record_for(stream);
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    pub fn extend<'s>(&mut self, streams: impl IntoIterator<Item = &'s ResolvedStream>) {
        for stream in streams {
            self.add(stream);
        }
    }

    pub fn records(&self) -> &[PlaylistRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Renders the playlist; pure, so repeated calls return identical text
    pub fn serialize(&self) -> String {
        let mut out = String::from(M3U_HEADER);
        out.push('\n');
        for record in &self.records {
            record.write_block(&mut out);
        }
        out
    }

    /// Writes the serialized playlist as UTF-8
    pub fn write_to(&self, path: &Path) -> PlaylistResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = File::create(path)?;
        file.write_all(self.serialize().as_bytes())?;
        file.flush()?;

        Ok(())
    }

    /// Normalized display title: `Title (Year) [quality]` or `Title - Season - Episode [quality]`
    pub fn display_title(&self, stream: &ResolvedStream) -> String {
        let base = self.base_title(stream);

        let mut title = match (&stream.episode, &stream.entry.year) {
            (Some(episode), _) => format!("{} - {}", base, episode),
            (None, Some(year)) => format!("{} ({})", base, year),
            (None, None) => base,
        };

        if let Some(quality) = &stream.quality {
            title.push_str(&format!(" [{}]", quality));
        }

        title
    }

    fn base_title(&self, stream: &ResolvedStream) -> String {
        stream
            .entry
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(self.options.fallback_title.as_str())
            .to_string()
    }

    fn record_for(&self, stream: &ResolvedStream) -> PlaylistRecord {
        let mut options = Vec::new();

        let user_agent = stream
            .headers
            .user_agent
            .as_ref()
            .or(self.options.user_agent.as_ref());
        if let Some(user_agent) = user_agent {
            options.push(format!("http-user-agent={}", user_agent));
        }

        let referrer = stream
            .headers
            .referer
            .as_ref()
            .or(self.options.referrer.as_ref());
        if let Some(referrer) = referrer {
            options.push(format!("http-referrer={}", referrer));
        }

        PlaylistRecord {
            title: self.display_title(stream),
            logo: stream.entry.logo.clone().unwrap_or_default(),
            tvg_id: Some(stream.entry.id.clone()),
            tvg_name: Some(self.base_title(stream)),
            group: self.options.group_title.clone(),
            url: stream.url.clone(),
            options,
        }
    }
}
