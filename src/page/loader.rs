//! Page loading from disk or over HTTP
//!
//! A saved copy of the archive page is read from a file and placed at the
//! configured base URL. An `http`/`https` source is fetched instead, and the
//! final URL after redirects becomes the page location.

use crate::config::PageConfig;
use crate::page::PageSnapshot;
use crate::HarvestError;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Where a page snapshot comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSource {
    File(PathBuf),
    Remote(Url),
}

impl PageSource {
    /// Interprets a command-line argument as a URL or a file path
    pub fn from_arg(arg: &str) -> Self {
        match Url::parse(arg) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Self::Remote(url),
            _ => Self::File(PathBuf::from(arg)),
        }
    }
}

/// Builds the HTTP client used for remote snapshots
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("takeout-harvester/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Loads a page snapshot from the given source
///
/// # Errors
///
/// * `HarvestError::Io` - the file could not be read
/// * `HarvestError::Http` - the request failed or returned a non-success status
/// * `HarvestError::ContentMismatch` - the response is not HTML
/// * `HarvestError::UrlParse` - the configured base URL is invalid
pub async fn load_page(
    source: &PageSource,
    client: &Client,
    config: &PageConfig,
) -> Result<PageSnapshot, HarvestError> {
    match source {
        PageSource::File(path) => {
            tracing::info!("Reading page snapshot from {}", path.display());
            let html = tokio::fs::read_to_string(path).await?;
            let location = Url::parse(&config.base_url)?;
            Ok(PageSnapshot::parse(&html, location))
        }
        PageSource::Remote(url) => fetch_page(client, url).await,
    }
}

async fn fetch_page(client: &Client, url: &Url) -> Result<PageSnapshot, HarvestError> {
    tracing::info!("Fetching page snapshot from {}", url);

    let http_error = |source| HarvestError::Http {
        url: url.to_string(),
        source,
    };

    let response = client
        .get(url.clone())
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(http_error)?;

    let final_url = response.url().clone();
    if &final_url != url {
        tracing::debug!("Redirected from {} to {}", url, final_url);
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.is_empty() && !content_type.contains("text/html") {
        return Err(HarvestError::ContentMismatch {
            url: final_url.to_string(),
            content_type,
        });
    }

    let body = response.text().await.map_err(http_error)?;

    Ok(PageSnapshot::parse(&body, final_url))
}
