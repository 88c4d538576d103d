/// One serialized playlist block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRecord {
    /// Display title after the comma of the `#EXTINF` line
    pub title: String,

    /// `tvg-logo` (always emitted, possibly empty)
    pub logo: String,

    /// `tvg-id`
    pub tvg_id: Option<String>,

    /// `tvg-name`
    pub tvg_name: Option<String>,

    /// `group-title`
    pub group: Option<String>,

    /// Stream URL line
    pub url: String,

    /// `#EXTVLCOPT` values in output order (e.g. `http-user-agent=okhttp/4.12.0`)
    pub options: Vec<String>,
}

impl PlaylistRecord {
    /// Formats the `#EXTINF` metadata line
    pub fn extinf_line(&self) -> String {
        let mut line = String::from("#EXTINF:-1");

        if let Some(id) = &self.tvg_id {
            line.push_str(&format!(" tvg-id=\"{}\"", attribute(id)));
        }
        line.push_str(&format!(" tvg-logo=\"{}\"", attribute(&self.logo)));
        if let Some(name) = &self.tvg_name {
            line.push_str(&format!(" tvg-name=\"{}\"", attribute(name)));
        }
        if let Some(group) = &self.group {
            line.push_str(&format!(" group-title=\"{}\"", attribute(group)));
        }

        line.push(',');
        line.push_str(&single_line(&self.title));
        line
    }

    /// Appends the whole block, each line newline-terminated
    pub fn write_block(&self, out: &mut String) {
        out.push_str(&self.extinf_line());
        out.push('\n');

        for option in &self.options {
            out.push_str("#EXTVLCOPT:");
            out.push_str(&single_line(option));
            out.push('\n');
        }

        out.push_str(&single_line(&self.url));
        out.push('\n');
    }
}

/// Attribute values cannot carry double quotes
fn attribute(value: &str) -> String {
    single_line(value).replace('"', "'")
}

fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ").trim().to_string()
}
