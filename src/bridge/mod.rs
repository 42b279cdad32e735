//! Request bridge between the popup and the page
//!
//! The popup sends one of three named requests; the `PageAgent` runs the
//! classifier against the current page snapshot and replies with the
//! counts the popup displays. Downloads are scheduled and the reply is sent
//! without waiting for any of them.

mod messages;
mod status;

pub use messages::{CountResponse, FindLinksResponse, LinkEntry, Request, Response};
pub use status::{page_status, status_for, Status, StatusLevel};

use crate::classifier::LinkClassifier;
use crate::config::Config;
use crate::dispatcher::{BatchDispatcher, DispatchReceipt};
use crate::page::PageSnapshot;
use crate::HarvestError;
use std::sync::{Mutex, PoisonError};

/// Answers popup requests for one page
pub struct PageAgent {
    classifier: LinkClassifier,
    dispatcher: BatchDispatcher,
    highlight_css: String,
    archive_path: String,
    auto_highlight: bool,
    in_flight: Mutex<Vec<DispatchReceipt>>,
}

impl PageAgent {
    pub fn new(config: &Config, dispatcher: BatchDispatcher) -> Self {
        Self {
            classifier: LinkClassifier::new(&config.classifier),
            dispatcher,
            highlight_css: config.highlight.to_css(),
            archive_path: config.page.archive_path.clone(),
            auto_highlight: config.page.auto_highlight,
            in_flight: Mutex::new(Vec::new()),
        }
    }

    pub fn classifier(&self) -> &LinkClassifier {
        &self.classifier
    }

    pub fn dispatcher(&self) -> &BatchDispatcher {
        &self.dispatcher
    }

    /// Fails with `NotApplicablePage` unless the page is the archive page
    pub fn check_page(&self, page: &PageSnapshot) -> Result<(), HarvestError> {
        if page.is_archive_page(&self.archive_path) {
            Ok(())
        } else {
            Err(HarvestError::NotApplicablePage {
                url: page.location().to_string(),
            })
        }
    }

    /// Status line for the page the popup is looking at
    pub fn page_status(&self, page: &PageSnapshot) -> Status {
        page_status(page.is_archive_page(&self.archive_path), &self.archive_path)
    }

    /// Runs one request against the page
    pub fn handle(&self, page: &mut PageSnapshot, request: Request) -> Response {
        tracing::debug!("Handling {} request", request.action());

        match request {
            Request::FindLinks => Response::Links(self.find_links(page)),
            Request::HighlightLinks => Response::Count(self.highlight_links(page)),
            Request::DownloadAll => Response::Count(self.download_all(page)),
        }
    }

    /// Parses a JSON request, runs it, and serializes the reply
    pub fn handle_json(&self, page: &mut PageSnapshot, json: &str) -> Result<String, HarvestError> {
        let request = Request::from_json(json)?;
        self.handle(page, request).to_json()
    }

    /// `findLinks`: every download link with its downloaded flag
    pub fn find_links(&self, page: &PageSnapshot) -> FindLinksResponse {
        let links = self.classifier.classify_page(page);
        let response = FindLinksResponse::from_links(&links);

        tracing::info!(
            "Found {} download link(s): {} downloaded, {} to download",
            response.count,
            response.downloaded,
            response.to_download
        );

        response
    }

    /// `highlightLinks`: styles every download link's element
    pub fn highlight_links(&self, page: &mut PageSnapshot) -> CountResponse {
        let links = self.classifier.classify_page(page);

        for link in &links {
            page.apply_highlight(link.element, &self.highlight_css);
        }

        CountResponse { count: links.len() }
    }

    /// `downloadAll`: schedules every link not yet downloaded
    ///
    /// The count is the number scheduled, not the number completed.
    pub fn download_all(&self, page: &PageSnapshot) -> CountResponse {
        let links = self.classifier.classify_page(page);
        let receipt = self.dispatcher.dispatch(&links, page.watch_location());
        let count = receipt.count();

        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(receipt);

        CountResponse { count }
    }

    /// Highlights download links once the page has loaded
    ///
    /// Returns the number highlighted; zero when auto-highlighting is off.
    pub fn on_load(&self, page: &mut PageSnapshot) -> usize {
        if !self.auto_highlight {
            return 0;
        }

        let count = self.highlight_links(page).count;
        if count > 0 {
            tracing::info!("Found and highlighted {} download links", count);
        }
        count
    }

    /// Waits for every download scheduled so far to fire or be cancelled
    pub async fn wait_for_downloads(&self) {
        let receipts: Vec<_> = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();

        for receipt in receipts {
            receipt.wait().await;
        }
    }
}
