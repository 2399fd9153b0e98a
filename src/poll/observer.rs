//! Observers for poll-loop progress and log events
//!
//! Observers receive notifications while a poll loop is waiting for a
//! terminal state and can be used for logging, progress reporting,
//! metrics, etc. All methods default to no-ops.

use std::sync::Arc;
use tracing::{debug, info};

use crate::types::TaskLog;

/// Observer for one poll loop
///
/// `S` is the polled snapshot type ([`crate::types::Task`] or
/// [`crate::types::InstallTask`]). Log events are only fetched for
/// observers that opt in via [`PollObserver::wants_logs`]; delivery is
/// in ascending id order with no id delivered twice.
pub trait PollObserver<S>: Send + Sync {
    /// Called with each non-terminal snapshot observed
    fn on_progress(&self, _snapshot: &S) {}

    /// Called once per new log event, in ascending id order
    fn on_log(&self, _log: &TaskLog) {}

    /// Whether the loop should fetch and deliver log events
    fn wants_logs(&self) -> bool {
        false
    }
}

/// Observer that reports progress and logs via `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl<S: std::fmt::Debug> PollObserver<S> for LoggingObserver {
    fn on_progress(&self, snapshot: &S) {
        debug!(snapshot = ?snapshot, "still pending");
    }

    fn on_log(&self, log: &TaskLog) {
        info!(log_id = log.id, kind = %log.kind, node_id = %log.node_id, "task log");
    }

    fn wants_logs(&self) -> bool {
        true
    }
}

/// Composite observer that delegates to multiple observers
pub struct CompositeObserver<S> {
    observers: Vec<Arc<dyn PollObserver<S>>>,
}

impl<S> CompositeObserver<S> {
    pub fn new(observers: Vec<Arc<dyn PollObserver<S>>>) -> Self {
        Self { observers }
    }
}

impl<S> PollObserver<S> for CompositeObserver<S>
where
    S: Send + Sync,
{
    fn on_progress(&self, snapshot: &S) {
        for observer in &self.observers {
            observer.on_progress(snapshot);
        }
    }

    fn on_log(&self, log: &TaskLog) {
        for observer in &self.observers {
            observer.on_log(log);
        }
    }

    fn wants_logs(&self) -> bool {
        self.observers.iter().any(|observer| observer.wants_logs())
    }
}
