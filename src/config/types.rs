use serde::Deserialize;

/// `jsname` value carried by the download button widget on the archive page
pub const DEFAULT_MARKER: &str = "hSRGPd";

/// Path fragment every genuine archive download URL contains
pub const DEFAULT_DOWNLOAD_PATH: &str = "/download";

/// aria-label phrases the page uses once an archive has been fetched
pub const DEFAULT_REDOWNLOAD_PHRASES: &[&str] = &[
    "volver a descargar",
    "re-download",
    "redownload",
    "descargar de nuevo",
    "download again",
];

/// Main configuration structure for Takeout Harvester
///
/// Every table is optional; a missing table takes its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub page: PageConfig,
}

/// Link classification rules
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Required value of the `jsname` attribute
    pub marker: String,

    /// Substring the `href` must contain
    #[serde(rename = "download-path")]
    pub download_path: String,

    /// Lower-case phrases that mark an aria-label as "download again"
    #[serde(rename = "redownload-phrases")]
    pub redownload_phrases: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            download_path: DEFAULT_DOWNLOAD_PATH.to_string(),
            redownload_phrases: DEFAULT_REDOWNLOAD_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// When a scheduled link is resolved against the page location
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveAt {
    /// Resolve when the trigger fires, seeing the location at that moment
    #[default]
    Trigger,
    /// Resolve once, while scheduling
    Schedule,
}

/// Download pacing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Delay between consecutive download triggers (milliseconds)
    #[serde(rename = "interval-ms")]
    pub interval_ms: u64,

    #[serde(rename = "resolve-at")]
    pub resolve_at: ResolveAt,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            resolve_at: ResolveAt::Trigger,
        }
    }
}

/// Inline style applied to highlighted download links
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub border: String,

    #[serde(rename = "background-color")]
    pub background_color: String,

    pub padding: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            border: "2px solid #4CAF50".to_string(),
            background_color: "#e8f5e9".to_string(),
            padding: "2px 4px".to_string(),
        }
    }
}

impl HighlightConfig {
    /// Renders the style as an inline CSS declaration list
    pub fn to_css(&self) -> String {
        format!(
            "border: {}; background-color: {}; padding: {}",
            self.border, self.background_color, self.padding
        )
    }
}

/// Page snapshot configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Location assumed for snapshots read from disk
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Substring identifying the Takeout archive management page
    #[serde(rename = "archive-path")]
    pub archive_path: String,

    /// Highlight download links as soon as a page is loaded
    #[serde(rename = "auto-highlight")]
    pub auto_highlight: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            base_url: "https://takeout.google.com/manage/archive".to_string(),
            archive_path: "takeout.google.com/manage/archive".to_string(),
            auto_highlight: true,
        }
    }
}
