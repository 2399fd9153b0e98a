//! Merged cancellation for poll loops

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Merged abort condition for one poll loop
///
/// Combines an optional caller-provided [`CancellationToken`] with an
/// optional internal deadline timer into a single set-once flag. The
/// timer is armed when the gate is constructed and disarmed on drop,
/// whichever way the poll ends.
pub struct CancellationGate {
    token: CancellationToken,
    timer: Option<tokio::task::JoinHandle<()>>,
    started: Instant,
    deadline: Option<Duration>,
}

impl CancellationGate {
    /// Arm the gate. A caller token that is already cancelled makes the
    /// gate report cancelled immediately; `None` timeout means the
    /// deadline timer never arms.
    pub fn new(external: Option<&CancellationToken>, timeout: Option<Duration>) -> Self {
        let token = match external {
            Some(caller) => caller.child_token(),
            None => CancellationToken::new(),
        };

        let deadline = timeout.filter(|t| !t.is_zero());
        let timer = deadline.map(|after| {
            let token = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(after).await;
                token.cancel();
            })
        });

        Self {
            token,
            timer,
            started: Instant::now(),
            deadline,
        }
    }

    /// Whether either source has requested cancellation
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Redundant wall-clock guard, independent of the timer task
    pub fn deadline_elapsed(&self) -> bool {
        self.deadline
            .map(|limit| self.started.elapsed() > limit)
            .unwrap_or(false)
    }

    /// Time since the gate was armed
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for CancellationGate {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pre_cancelled_token() {
        let caller = CancellationToken::new();
        caller.cancel();

        let gate = CancellationGate::new(Some(&caller), None);
        assert!(gate.is_cancelled());
    }

    #[tokio::test]
    async fn test_external_cancel_flips_gate() {
        let caller = CancellationToken::new();
        let gate = CancellationGate::new(Some(&caller), None);
        assert!(!gate.is_cancelled());

        caller.cancel();
        assert!(gate.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_fires() {
        let gate = CancellationGate::new(None, Some(Duration::from_millis(100)));
        assert!(!gate.is_cancelled());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(gate.is_cancelled());
        assert!(gate.deadline_elapsed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_deadline_never_arms() {
        let gate = CancellationGate::new(None, None);
        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert!(!gate.is_cancelled());
        assert!(!gate.deadline_elapsed());
    }

    #[tokio::test]
    async fn test_zero_timeout_never_arms() {
        let gate = CancellationGate::new(None, Some(Duration::ZERO));
        assert!(!gate.deadline_elapsed());
    }
}
