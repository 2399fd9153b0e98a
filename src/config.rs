//! Polling configuration
//!
//! Every field has a default; a fresh options value is constructed per
//! poll invocation, read-only during it, and discarded after.

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::{ConnectError, Result};
use crate::poll::{BackoffStrategy, PollObserver};

/// Default base interval between polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Default cap on the backoff-grown interval
pub const DEFAULT_MAX_POLL_INTERVAL: Duration = Duration::from_millis(10000);

/// Default exponential growth factor
pub const DEFAULT_BACKOFF_FACTOR: f64 = 1.5;

/// Options for one poll-until-terminal invocation
///
/// `S` is the polled snapshot type. Example:
///
/// ```ignore
/// let options = PollOptions::new()
///     .with_interval(Duration::from_millis(500))
///     .with_timeout(Duration::from_secs(120))
///     .with_observer(Arc::new(LoggingObserver));
/// let task = client.tasks().wait_for_completion(&task_id, options).await?;
/// ```
pub struct PollOptions<S> {
    /// Base interval between polls. Default: 2000ms
    pub interval: Duration,
    /// Absolute deadline for the whole poll. Default: none (unbounded)
    pub timeout: Option<Duration>,
    /// Cap on the backoff-grown interval. Default: 10000ms
    pub max_interval: Duration,
    /// Backoff strategy. Default: exponential
    pub strategy: BackoffStrategy,
    /// Exponential growth factor. Default: 1.5
    pub factor: f64,
    /// Progress/log observer
    pub observer: Option<Arc<dyn PollObserver<S>>>,
    /// External cancellation handle
    pub cancellation: Option<CancellationToken>,
}

impl<S> Default for PollOptions<S> {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
            max_interval: DEFAULT_MAX_POLL_INTERVAL,
            strategy: BackoffStrategy::default(),
            factor: DEFAULT_BACKOFF_FACTOR,
            observer: None,
            cancellation: None,
        }
    }
}

impl<S> Clone for PollOptions<S> {
    fn clone(&self) -> Self {
        Self {
            interval: self.interval,
            timeout: self.timeout,
            max_interval: self.max_interval,
            strategy: self.strategy,
            factor: self.factor,
            observer: self.observer.clone(),
            cancellation: self.cancellation.clone(),
        }
    }
}

impl<S> std::fmt::Debug for PollOptions<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollOptions")
            .field("interval", &self.interval)
            .field("timeout", &self.timeout)
            .field("max_interval", &self.max_interval)
            .field("strategy", &self.strategy)
            .field("factor", &self.factor)
            .field("observer", &self.observer.as_ref().map(|_| "..."))
            .field("cancellation", &self.cancellation.is_some())
            .finish()
    }
}

impl<S> PollOptions<S> {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base interval between polls
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the absolute deadline for the whole poll
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the cap on the backoff-grown interval
    pub fn with_max_interval(mut self, max_interval: Duration) -> Self {
        self.max_interval = max_interval;
        self
    }

    /// Set the backoff strategy
    pub fn with_strategy(mut self, strategy: BackoffStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the exponential growth factor
    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    /// Set the progress/log observer
    pub fn with_observer(mut self, observer: Arc<dyn PollObserver<S>>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Set the external cancellation handle
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(ConnectError::InvalidConfiguration(
                "interval must be positive".to_string(),
            ));
        }
        if self.max_interval.is_zero() {
            return Err(ConnectError::InvalidConfiguration(
                "max_interval must be positive".to_string(),
            ));
        }
        if !self.factor.is_finite() || self.factor <= 0.0 {
            return Err(ConnectError::InvalidConfiguration(
                "factor must be finite and positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Task;

    #[test]
    fn test_defaults() {
        let options: PollOptions<Task> = PollOptions::new();
        assert_eq!(options.interval, Duration::from_millis(2000));
        assert_eq!(options.max_interval, Duration::from_millis(10000));
        assert!(options.timeout.is_none());
        assert_eq!(options.strategy, BackoffStrategy::Exponential);
        assert_eq!(options.factor, 1.5);
        assert!(options.observer.is_none());
        assert!(options.cancellation.is_none());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let options: PollOptions<Task> = PollOptions::new()
            .with_interval(Duration::from_millis(10))
            .with_timeout(Duration::from_millis(500))
            .with_max_interval(Duration::from_millis(100))
            .with_strategy(BackoffStrategy::Fixed)
            .with_factor(2.0);

        assert_eq!(options.interval, Duration::from_millis(10));
        assert_eq!(options.timeout, Some(Duration::from_millis(500)));
        assert_eq!(options.max_interval, Duration::from_millis(100));
        assert_eq!(options.strategy, BackoffStrategy::Fixed);
        assert_eq!(options.factor, 2.0);
    }

    #[test]
    fn test_validation() {
        let options: PollOptions<Task> = PollOptions::new().with_interval(Duration::ZERO);
        assert!(options.validate().is_err());

        let options: PollOptions<Task> = PollOptions::new().with_max_interval(Duration::ZERO);
        assert!(options.validate().is_err());

        let options: PollOptions<Task> = PollOptions::new().with_factor(f64::NAN);
        assert!(options.validate().is_err());

        let options: PollOptions<Task> = PollOptions::new().with_factor(-1.0);
        assert!(options.validate().is_err());
    }
}
