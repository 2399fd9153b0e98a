//! Generic asynchronous polling engine
//!
//! Waiting for server-side work (task execution, package installation)
//! is the same loop everywhere: fetch a status snapshot, classify it,
//! notify observers, back off and repeat until a terminal state, the
//! deadline, or cancellation. This module is that loop, factored once;
//! the task and package clients bind it to their endpoints.

mod backoff;
mod cancel;
mod engine;
mod observer;

pub use backoff::{next_interval, BackoffStrategy};
pub use cancel::CancellationGate;
pub use engine::{poll_until_terminal, PollSource, StatusKind};
pub use observer::{CompositeObserver, LoggingObserver, PollObserver};
