//! Page snapshot and anchor extraction
//!
//! A `PageSnapshot` is the explicit stand-in for the live document: the
//! anchors it held at capture time, in document order, plus the page's
//! current location. Highlight styling is recorded on the snapshot.

use scraper::{ElementRef, Html, Selector};
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::watch;
use url::Url;

/// Opaque reference to an anchor in its snapshot (its document-order index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnchorId(pub usize);

/// Read-only view of one `<a>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorElement {
    pub id: AnchorId,

    /// Lower-case tag name
    pub tag: String,

    pub href: Option<String>,

    pub aria_label: Option<String>,

    /// Page-specific widget marker (`jsname` attribute)
    pub jsname: Option<String>,

    pub classes: BTreeSet<String>,

    /// Raw value of the `data-downloaded` attribute
    pub data_downloaded: Option<String>,

    /// Visible text, trimmed
    pub text: String,
}

impl AnchorElement {
    /// Creates an anchor with no attributes and no text
    pub fn new(id: AnchorId) -> Self {
        Self {
            id,
            tag: "a".to_string(),
            href: None,
            aria_label: None,
            jsname: None,
            classes: BTreeSet::new(),
            data_downloaded: None,
            text: String::new(),
        }
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_jsname(mut self, jsname: impl Into<String>) -> Self {
        self.jsname = Some(jsname.into());
        self
    }

    pub fn with_aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = Some(label.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    pub fn with_data_downloaded(mut self, value: impl Into<String>) -> Self {
        self.data_downloaded = Some(value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into().trim().to_string();
        self
    }

    /// Returns true if the class list contains exactly this token
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    fn from_element(id: AnchorId, element: ElementRef<'_>) -> Self {
        let value = element.value();
        let attr = |name: &str| value.attr(name).map(str::to_string);

        Self {
            id,
            tag: value.name().to_ascii_lowercase(),
            href: attr("href"),
            aria_label: attr("aria-label"),
            jsname: attr("jsname"),
            classes: value.classes().map(str::to_string).collect(),
            data_downloaded: attr("data-downloaded"),
            text: element.text().collect::<String>().trim().to_string(),
        }
    }
}

/// Captured state of a page: its anchors and its location
#[derive(Debug)]
pub struct PageSnapshot {
    location: watch::Sender<Url>,
    anchors: Vec<AnchorElement>,
    highlights: BTreeMap<AnchorId, String>,
}

impl PageSnapshot {
    /// Parses an HTML document and captures every `<a>` element in document order
    ///
    /// # Example
    ///
    /// ```
    /// use takeout_harvester::page::PageSnapshot;
    /// use url::Url;
    ///
    /// let html = r#"<a jsname="hSRGPd" href="/download?j=1">Archive 1</a>"#;
    /// let page = PageSnapshot::parse(html, Url::parse("https://takeout.google.com/").unwrap());
    /// assert_eq!(page.anchors().len(), 1);
    /// assert_eq!(page.anchors()[0].text, "Archive 1");
    /// ```
    pub fn parse(html: &str, location: Url) -> Self {
        let document = Html::parse_document(html);

        let anchors = match Selector::parse("a") {
            Ok(selector) => document
                .select(&selector)
                .enumerate()
                .map(|(index, element)| AnchorElement::from_element(AnchorId(index), element))
                .collect(),
            Err(_) => Vec::new(),
        };

        tracing::debug!("Captured {} anchors from {}", anchors.len(), location);

        Self::from_anchors(anchors, location)
    }

    /// Builds a snapshot from already-extracted anchors
    pub fn from_anchors(anchors: Vec<AnchorElement>, location: Url) -> Self {
        let (location, _) = watch::channel(location);
        Self {
            location,
            anchors,
            highlights: BTreeMap::new(),
        }
    }

    /// Anchors in document order
    pub fn anchors(&self) -> &[AnchorElement] {
        &self.anchors
    }

    pub fn anchor(&self, id: AnchorId) -> Option<&AnchorElement> {
        self.anchors.get(id.0).filter(|a| a.id == id)
    }

    /// The page's current location
    pub fn location(&self) -> Url {
        self.location.borrow().clone()
    }

    /// Subscribes to location changes
    pub fn watch_location(&self) -> watch::Receiver<Url> {
        self.location.subscribe()
    }

    /// Moves the page to a new location without recapturing its anchors
    pub fn navigate(&self, url: Url) {
        tracing::debug!("Page location changed to {}", url);
        self.location.send_replace(url);
    }

    /// Returns true if the location contains the archive page path
    pub fn is_archive_page(&self, archive_path: &str) -> bool {
        self.location.borrow().as_str().contains(archive_path)
    }

    /// Applies an inline style to an anchor; false if the anchor is unknown
    pub fn apply_highlight(&mut self, id: AnchorId, css: &str) -> bool {
        if self.anchor(id).is_none() {
            return false;
        }
        self.highlights.insert(id, css.to_string());
        true
    }

    /// The inline style applied to an anchor, if any
    pub fn highlight(&self, id: AnchorId) -> Option<&str> {
        self.highlights.get(&id).map(String::as_str)
    }

    pub fn highlighted_count(&self) -> usize {
        self.highlights.len()
    }
}
