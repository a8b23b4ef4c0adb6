//! Error types for the timer layer.

use std::time::Duration;

/// Errors that can occur while arming a timer.
#[derive(Debug, thiserror::Error)]
pub enum TimerError {
    /// A timer was armed outside of a Tokio runtime, so there is nothing
    /// to run its expiry task on.
    #[error("no Tokio runtime available to schedule the timer")]
    NoRuntime,

    /// The delay is too large to turn into a deadline.
    #[error("timer delay of {}s is too large", .0.as_secs())]
    DeadlineOverflow(Duration),
}
