//! Takeout Harvester: bulk downloader for Google Takeout archive pages
//!
//! This crate scans a snapshot of the Takeout archive management page for
//! download buttons, works out which archives were already fetched, and
//! triggers the remaining downloads with pacing.

pub mod bridge;
pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod page;

use thiserror::Error;

/// Main error type for Takeout Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Expected an HTML page at {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not a Takeout archive page: {url}")]
    NotApplicablePage { url: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors reported for a single download trigger
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("Cannot resolve {url} against the page location: {source}")]
    Resolve {
        url: String,
        source: ::url::ParseError,
    },

    #[error("Download of {url} could not be started: {message}")]
    Failed { url: String, message: String },
}

/// Result type alias for Takeout Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use bridge::{PageAgent, Request, Response};
pub use classifier::{ClassifiedLink, LinkClassifier, LinkTally};
pub use config::Config;
pub use dispatcher::{BatchDispatcher, DownloadTrigger};
pub use page::{AnchorElement, AnchorId, PageSnapshot};
