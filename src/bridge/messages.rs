//! Request and response messages exchanged with the popup
//!
//! Field names are part of the wire contract: older popups only read
//! `count`, newer ones also read `downloaded` and `toDownload`.

use crate::classifier::{ClassifiedLink, LinkTally};
use crate::HarvestError;
use serde::{Deserialize, Serialize};

/// A request sent by name from the popup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    FindLinks,
    HighlightLinks,
    DownloadAll,
}

impl Request {
    /// Parses a request such as `{"action": "findLinks"}`
    pub fn from_json(json: &str) -> Result<Self, HarvestError> {
        serde_json::from_str(json)
            .map_err(|e| HarvestError::InvalidRequest(format!("{}: {}", json.trim(), e)))
    }

    pub fn action(&self) -> &'static str {
        match self {
            Self::FindLinks => "findLinks",
            Self::HighlightLinks => "highlightLinks",
            Self::DownloadAll => "downloadAll",
        }
    }
}

/// One link as reported to the popup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub text: String,
    pub url: String,
    pub downloaded: bool,
}

impl From<&ClassifiedLink> for LinkEntry {
    fn from(link: &ClassifiedLink) -> Self {
        Self {
            text: link.text.clone(),
            url: link.url.clone(),
            downloaded: link.downloaded,
        }
    }
}

/// Reply to `findLinks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindLinksResponse {
    pub count: usize,
    pub downloaded: usize,
    #[serde(rename = "toDownload")]
    pub to_download: usize,
    pub links: Vec<LinkEntry>,
}

impl FindLinksResponse {
    pub fn from_links(links: &[ClassifiedLink]) -> Self {
        let tally = LinkTally::from_links(links);
        Self {
            count: tally.count,
            downloaded: tally.downloaded,
            to_download: tally.to_download,
            links: links.iter().map(LinkEntry::from).collect(),
        }
    }
}

/// Reply to `highlightLinks` and `downloadAll`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: usize,
}

/// Any reply the bridge sends back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Links(FindLinksResponse),
    Count(CountResponse),
}

impl Response {
    pub fn count(&self) -> usize {
        match self {
            Self::Links(r) => r.count,
            Self::Count(r) => r.count,
        }
    }

    pub fn to_json(&self) -> Result<String, HarvestError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, HarvestError> {
        Ok(serde_json::from_str(json)?)
    }
}
