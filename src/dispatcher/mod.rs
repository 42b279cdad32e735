//! Paced batch dispatcher
//!
//! This module handles:
//! - Selecting the links that still need downloading
//! - Scheduling one trigger per link at `index × interval`
//! - Resolving each link against the page location
//! - Per-task cancellation and per-task outcome reporting
//!
//! `dispatch` returns as soon as everything is scheduled. Each trigger runs as
//! its own tokio task; the caller never waits on an individual download.

mod trigger;

pub use trigger::{DownloadTrigger, LoggingTrigger, RecordingTrigger};

use crate::classifier::ClassifiedLink;
use crate::config::{DispatcherConfig, ResolveAt};
use crate::page::AnchorId;
use crate::TriggerError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Offsets are capped here; tokio treats deadlines this far out as "never"
const MAX_OFFSET: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Delay of the trigger at `index`, saturating instead of overflowing
fn offset_for(interval: Duration, index: usize) -> Duration {
    let index = u32::try_from(index).unwrap_or(u32::MAX);
    interval.saturating_mul(index).min(MAX_OFFSET)
}

/// Identifier of one scheduled trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u64);

/// A trigger that has been scheduled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTask {
    pub id: TaskId,

    /// Delay from the dispatch call until the trigger fires
    pub offset: Duration,

    /// Raw link URL
    pub url: String,

    pub element: AnchorId,
}

/// Result of one fired trigger
#[derive(Debug)]
pub struct TriggerOutcome {
    pub task: TaskId,

    /// Raw link URL
    pub url: String,

    /// The resolved URL that was triggered, or why it was not
    pub result: Result<Url, TriggerError>,
}

/// What `dispatch` scheduled
#[derive(Debug)]
pub struct DispatchReceipt {
    pub tasks: Vec<ScheduledTask>,
    handles: Vec<JoinHandle<()>>,
}

impl DispatchReceipt {
    /// Number of triggers scheduled
    pub fn count(&self) -> usize {
        self.tasks.len()
    }

    /// Waits until every task has fired or been cancelled
    pub async fn wait(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::warn!("Download task ended abnormally: {}", e);
            }
        }
    }
}

/// Where a task gets its absolute URL from
enum Target {
    /// Resolve against the page location when the trigger fires
    Deferred(watch::Receiver<Url>),
    /// Already resolved while scheduling
    Resolved(Result<Url, ::url::ParseError>),
}

impl Target {
    fn resolve(self, raw: &str) -> Result<Url, TriggerError> {
        let resolved = match self {
            Self::Deferred(location) => {
                let base = location.borrow().clone();
                base.join(raw)
            }
            Self::Resolved(result) => result,
        };

        resolved.map_err(|source| TriggerError::Resolve {
            url: raw.to_string(),
            source,
        })
    }
}

/// Schedules paced download triggers for classified links
pub struct BatchDispatcher {
    interval: Duration,
    resolve_at: ResolveAt,
    trigger: Arc<dyn DownloadTrigger>,
    outcomes: Option<mpsc::UnboundedSender<TriggerOutcome>>,
    tokens: Arc<Mutex<HashMap<TaskId, CancellationToken>>>,
    next_id: AtomicU64,
}

impl BatchDispatcher {
    pub fn new(config: &DispatcherConfig, trigger: Arc<dyn DownloadTrigger>) -> Self {
        Self {
            interval: Duration::from_millis(config.interval_ms),
            resolve_at: config.resolve_at,
            trigger,
            outcomes: None,
            tokens: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Reports the outcome of every fired trigger on the given channel
    pub fn with_outcomes(mut self, outcomes: mpsc::UnboundedSender<TriggerOutcome>) -> Self {
        self.outcomes = Some(outcomes);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Schedules a trigger for every link not yet downloaded
    ///
    /// The i-th such link, in classifier order, fires at `i × interval`.
    /// Must be called from within a tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `links` - Classifier output, in document order
    /// * `location` - The page location that relative links resolve against
    pub fn dispatch(
        &self,
        links: &[ClassifiedLink],
        location: watch::Receiver<Url>,
    ) -> DispatchReceipt {
        let start = Instant::now();
        let mut tasks = Vec::new();
        let mut handles = Vec::new();

        for (index, link) in links.iter().filter(|l| !l.downloaded).enumerate() {
            let id = TaskId(self.next_id.fetch_add(1, Ordering::Relaxed));
            let offset = offset_for(self.interval, index);

            let target = match self.resolve_at {
                ResolveAt::Trigger => Target::Deferred(location.clone()),
                ResolveAt::Schedule => Target::Resolved(location.borrow().join(&link.url)),
            };

            let token = CancellationToken::new();
            self.lock_tokens().insert(id, token.clone());

            tracing::debug!("Scheduled {} at +{:?} (task {})", link.url, offset, id.0);

            handles.push(tokio::spawn(run_task(
                id,
                link.url.clone(),
                start + offset,
                target,
                token,
                Arc::clone(&self.trigger),
                self.outcomes.clone(),
                Arc::clone(&self.tokens),
            )));

            tasks.push(ScheduledTask {
                id,
                offset,
                url: link.url.clone(),
                element: link.element,
            });
        }

        tracing::info!(
            "Scheduled {} download(s), {:?} apart",
            tasks.len(),
            self.interval
        );

        DispatchReceipt { tasks, handles }
    }

    /// Withdraws a pending trigger; false if it already fired or is unknown
    pub fn cancel(&self, id: TaskId) -> bool {
        match self.lock_tokens().remove(&id) {
            Some(token) => {
                token.cancel();
                tracing::debug!("Cancelled task {}", id.0);
                true
            }
            None => false,
        }
    }

    /// Withdraws every pending trigger, returning how many were withdrawn
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<_> = self.lock_tokens().drain().collect();
        for (_, token) in &drained {
            token.cancel();
        }
        if !drained.is_empty() {
            tracing::info!("Cancelled {} pending download(s)", drained.len());
        }
        drained.len()
    }

    /// Tasks that have not fired yet, in scheduling order
    pub fn pending(&self) -> Vec<TaskId> {
        let mut ids: Vec<_> = self.lock_tokens().keys().copied().collect();
        ids.sort();
        ids
    }

    fn lock_tokens(&self) -> std::sync::MutexGuard<'_, HashMap<TaskId, CancellationToken>> {
        self.tokens.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_task(
    id: TaskId,
    url: String,
    deadline: Instant,
    target: Target,
    token: CancellationToken,
    trigger: Arc<dyn DownloadTrigger>,
    outcomes: Option<mpsc::UnboundedSender<TriggerOutcome>>,
    tokens: Arc<Mutex<HashMap<TaskId, CancellationToken>>>,
) {
    tokio::select! {
        biased;
        () = token.cancelled() => {
            tracing::debug!("Task {} cancelled before firing", id.0);
            return;
        }
        () = tokio::time::sleep_until(deadline) => {}
    }

    // Fired: no longer cancellable
    tokens
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(&id);

    let result = target
        .resolve(&url)
        .and_then(|resolved| trigger.trigger(&resolved).map(|()| resolved));

    match &result {
        Ok(resolved) => tracing::info!("Triggered download of {}", resolved),
        Err(e) => tracing::warn!("{}", e),
    }

    if let Some(outcomes) = outcomes {
        // Receiver may be gone; outcomes are best effort
        let _ = outcomes.send(TriggerOutcome {
            task: id,
            url,
            result,
        });
    }
}
