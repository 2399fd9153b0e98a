//! Backoff scheduling between poll attempts

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rule for computing the wait between successive polls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffStrategy {
    /// Every wait equals the base interval
    Fixed,
    /// Waits grow by `factor` per attempt, bounded by the cap
    #[default]
    Exponential,
}

/// Compute the wait before the next poll attempt.
///
/// `attempt` starts at 0 for the wait following the first poll and
/// increments by one after every wait. For the exponential strategy the
/// cap bounds growth but never the floor: the wait for attempt 0 is the
/// base interval even when the cap is smaller.
pub fn next_interval(
    base: Duration,
    cap: Duration,
    factor: f64,
    strategy: BackoffStrategy,
    attempt: u32,
) -> Duration {
    match strategy {
        BackoffStrategy::Fixed => base,
        BackoffStrategy::Exponential => {
            if attempt == 0 {
                return base;
            }
            let exponent = attempt.min(i32::MAX as u32) as i32;
            let scaled = base.as_secs_f64() * factor.powi(exponent);
            if scaled.is_finite() && scaled < cap.as_secs_f64() {
                Duration::from_secs_f64(scaled)
            } else {
                cap
            }
        }
    }
}
