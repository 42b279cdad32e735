//! Per-anchor classification rules

use crate::page::AnchorElement;

/// Class token the page adds to fetched archives
const DOWNLOADED_CLASS: &str = "downloaded";

/// Returns true if the anchor is the archive page's download button
///
/// Requires the widget marker and an `href` containing the download path.
/// An anchor without an `href` never matches.
pub fn is_download_link(anchor: &AnchorElement, marker: &str, download_path: &str) -> bool {
    let Some(href) = anchor.href.as_deref() else {
        return false;
    };

    anchor.jsname.as_deref() == Some(marker) && !href.is_empty() && href.contains(download_path)
}

/// Returns true if the anchor shows an archive that was already fetched
///
/// `phrases` must already be lower-case.
pub fn is_already_downloaded(anchor: &AnchorElement, phrases: &[String]) -> bool {
    anchor.data_downloaded.as_deref() == Some("true")
        || anchor.has_class(DOWNLOADED_CLASS)
        || has_redownload_label(anchor, phrases)
}

fn has_redownload_label(anchor: &AnchorElement, phrases: &[String]) -> bool {
    match anchor.aria_label.as_deref() {
        Some(label) => {
            let label = label.to_lowercase();
            phrases.iter().any(|phrase| label.contains(phrase.as_str()))
        }
        None => false,
    }
}
