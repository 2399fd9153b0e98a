//! The generic poll-until-terminal engine
//!
//! Drives repeated status fetches against one remote resource until it
//! reaches a terminal state, applying the configured backoff schedule
//! and the merged cancellation gate, and optionally draining the
//! resource's log stream incrementally.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::PollOptions;
use crate::error::{ConnectError, Result};
use crate::poll::backoff::next_interval;
use crate::poll::cancel::CancellationGate;
use crate::types::TaskLog;

/// Classification of one status snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Not terminal; keep polling
    Pending,
    /// Terminal success; the snapshot is the result
    Succeeded,
    /// Terminal failure of the resource itself
    Failed,
    /// Terminal stop requested by another actor (tasks only)
    Stopped,
}

impl StatusKind {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// A pollable status endpoint
///
/// Implementations bind the engine to one resource kind: how to fetch a
/// fresh snapshot, how to classify it, which error a terminal failure
/// maps to, and (optionally) how to fetch the companion log stream.
#[async_trait]
pub trait PollSource: Send + Sync {
    /// Snapshot type returned by the status endpoint
    type Status: Send;

    /// Fetch a fresh snapshot. Transport failures propagate unmodified;
    /// the engine never retries them.
    async fn fetch_status(&self, target: &str) -> Result<Self::Status>;

    /// Map a snapshot onto the terminal/non-terminal contract
    fn classify(&self, status: &Self::Status) -> StatusKind;

    /// Build the error for a failure-terminal or stopped snapshot
    fn terminal_error(
        &self,
        target: &str,
        status: Self::Status,
        kind: StatusKind,
    ) -> ConnectError;

    /// Fetch the full log set for the target. Sources without a log
    /// stream keep the default.
    async fn fetch_logs(&self, _target: &str) -> Result<Vec<TaskLog>> {
        Ok(Vec::new())
    }
}

/// Poll `target` until it reaches a terminal state.
///
/// Returns the terminal snapshot on success. A failure-terminal or
/// stopped snapshot raises the source's [`PollSource::terminal_error`];
/// cancellation or deadline expiry raises [`ConnectError::Timeout`]
/// before the next fetch. Every other error propagates unmodified from
/// the fetch step.
///
/// Each invocation owns its attempt counter, log high-water mark and
/// cancellation gate; concurrent invocations do not interact.
pub async fn poll_until_terminal<P>(
    source: &P,
    target: &str,
    options: &PollOptions<P::Status>,
) -> Result<P::Status>
where
    P: PollSource + ?Sized,
{
    options.validate()?;

    let gate = CancellationGate::new(options.cancellation.as_ref(), options.timeout);
    let drain_logs = options
        .observer
        .as_ref()
        .map(|observer| observer.wants_logs())
        .unwrap_or(false);

    let mut attempt: u32 = 0;
    let mut last_log_id: u64 = 0;

    loop {
        if gate.is_cancelled() || gate.deadline_elapsed() {
            warn!(target_id = %target, elapsed = ?gate.elapsed(), "polling cancelled or timed out");
            return Err(ConnectError::Timeout(format!(
                "polling {} was cancelled or timed out",
                target
            )));
        }

        let status = source.fetch_status(target).await?;

        match source.classify(&status) {
            StatusKind::Succeeded => {
                debug!(target_id = %target, attempts = attempt + 1, "reached terminal state");
                return Ok(status);
            }
            kind @ (StatusKind::Failed | StatusKind::Stopped) => {
                return Err(source.terminal_error(target, status, kind));
            }
            StatusKind::Pending => {
                if let Some(observer) = &options.observer {
                    observer.on_progress(&status);

                    if drain_logs {
                        let logs = source.fetch_logs(target).await?;
                        let mut fresh: Vec<&TaskLog> =
                            logs.iter().filter(|log| log.id > last_log_id).collect();
                        fresh.sort_by_key(|log| log.id);
                        for log in &fresh {
                            observer.on_log(log);
                        }
                        if let Some(newest) = fresh.last() {
                            last_log_id = newest.id;
                        }
                    }
                }
            }
        }

        let wait = next_interval(
            options.interval,
            options.max_interval,
            options.factor,
            options.strategy,
            attempt,
        );
        debug!(target_id = %target, attempt, wait = ?wait, "still pending, waiting");
        // Cancellation during this sleep is caught by the guard at the
        // top of the next iteration, before any further fetch.
        tokio::time::sleep(wait).await;
        attempt += 1;
    }
}
