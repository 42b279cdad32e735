//! Link classifier for the Takeout archive page
//!
//! This module decides which anchors on a page are archive download
//! buttons, and which of those point at archives that were already fetched.
//! Classification reads only the snapshot it is given: it never fails, never
//! reorders, and never remembers earlier scans.

mod predicates;

pub use predicates::{is_already_downloaded, is_download_link};

use crate::config::ClassifierConfig;
use crate::page::{AnchorElement, AnchorId, PageSnapshot};

/// A download button found on the page
///
/// Two links are equal when their text and raw URL are equal.
#[derive(Debug, Clone)]
pub struct ClassifiedLink {
    /// Trimmed visible text of the anchor
    pub text: String,

    /// Raw `href`, not yet resolved against the page location
    pub url: String,

    pub downloaded: bool,

    /// The anchor this link was read from
    pub element: AnchorId,
}

impl PartialEq for ClassifiedLink {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.url == other.url
    }
}

impl Eq for ClassifiedLink {}

/// Counts derived from one classification pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkTally {
    pub count: usize,
    pub downloaded: usize,
    pub to_download: usize,
}

impl LinkTally {
    pub fn from_links(links: &[ClassifiedLink]) -> Self {
        let downloaded = links.iter().filter(|l| l.downloaded).count();
        Self {
            count: links.len(),
            downloaded,
            to_download: links.len() - downloaded,
        }
    }
}

/// Classifies anchors using the archive page's download-button marker
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    marker: String,
    download_path: String,
    /// Lower-cased once, matched by substring
    redownload_phrases: Vec<String>,
}

impl Default for LinkClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

impl LinkClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            marker: config.marker.clone(),
            download_path: config.download_path.clone(),
            redownload_phrases: config
                .redownload_phrases
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
        }
    }

    /// Returns true if the anchor is a download button
    pub fn is_download_link(&self, anchor: &AnchorElement) -> bool {
        is_download_link(anchor, &self.marker, &self.download_path)
    }

    /// Returns true if the anchor carries any "already downloaded" indicator
    pub fn is_already_downloaded(&self, anchor: &AnchorElement) -> bool {
        is_already_downloaded(anchor, &self.redownload_phrases)
    }

    /// Classifies anchors, keeping document order and duplicates
    ///
    /// # Example
    ///
    /// ```
    /// use takeout_harvester::classifier::LinkClassifier;
    /// use takeout_harvester::page::{AnchorElement, AnchorId};
    ///
    /// let anchors = vec![
    ///     AnchorElement::new(AnchorId(0)).with_jsname("hSRGPd").with_href("/download?j=1"),
    ///     AnchorElement::new(AnchorId(1)).with_href("/help").with_text("Download help"),
    /// ];
    /// let links = LinkClassifier::default().classify(&anchors);
    /// assert_eq!(links.len(), 1);
    /// assert_eq!(links[0].url, "/download?j=1");
    /// ```
    pub fn classify(&self, anchors: &[AnchorElement]) -> Vec<ClassifiedLink> {
        let links: Vec<ClassifiedLink> = anchors
            .iter()
            .filter(|anchor| self.is_download_link(anchor))
            .filter_map(|anchor| {
                let url = anchor.href.clone()?;
                Some(ClassifiedLink {
                    text: anchor.text.clone(),
                    url,
                    downloaded: self.is_already_downloaded(anchor),
                    element: anchor.id,
                })
            })
            .collect();

        tracing::debug!(
            "Classified {} of {} anchors as download links",
            links.len(),
            anchors.len()
        );

        links
    }

    /// Classifies every anchor of a page snapshot
    pub fn classify_page(&self, page: &PageSnapshot) -> Vec<ClassifiedLink> {
        self.classify(page.anchors())
    }
}
