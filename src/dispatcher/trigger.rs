//! Download trigger seam
//!
//! A trigger starts one download at a fully resolved URL. It does not wait
//! for the transfer and is never retried.

use crate::TriggerError;
use std::sync::{Mutex, PoisonError};
use url::Url;

/// Starts a download at a resolved URL
pub trait DownloadTrigger: Send + Sync {
    fn trigger(&self, url: &Url) -> Result<(), TriggerError>;
}

/// Trigger that only reports each URL through tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingTrigger;

impl DownloadTrigger for LoggingTrigger {
    fn trigger(&self, url: &Url) -> Result<(), TriggerError> {
        tracing::info!("Downloading: {}", url);
        Ok(())
    }
}

/// Trigger that keeps every URL it was asked to start, in firing order
#[derive(Debug, Default)]
pub struct RecordingTrigger {
    fired: Mutex<Vec<(tokio::time::Instant, Url)>>,
}

impl RecordingTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// URLs fired so far, with the instant each one fired
    pub fn fired(&self) -> Vec<(tokio::time::Instant, Url)> {
        self.fired
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn urls(&self) -> Vec<Url> {
        self.fired().into_iter().map(|(_, url)| url).collect()
    }
}

impl DownloadTrigger for RecordingTrigger {
    fn trigger(&self, url: &Url) -> Result<(), TriggerError> {
        self.fired
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((tokio::time::Instant::now(), url.clone()));
        Ok(())
    }
}
