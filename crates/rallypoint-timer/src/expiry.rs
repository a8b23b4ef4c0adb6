//! One-shot expiry timer with an exactly-once guarantee.
//!
//! The timer runs its callback on a spawned Tokio task after a fixed delay.
//! Cancellation and firing both race for a single atomic flag:
//!
//! ```text
//!            ┌── cancel() wins ──► Cancelled   (task aborted, callback never runs)
//! Armed ─────┤
//!            └── deadline wins ──► Fired       (callback runs once, cancel() is a no-op)
//! ```
//!
//! Whoever performs the `Armed → _` compare-exchange first decides the
//! outcome. The loser observes the other state and does nothing.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::trace;

use crate::TimerError;

const ARMED: u8 = 0;
const FIRED: u8 = 1;
const CANCELLED: u8 = 2;

/// Where a timer is in its one-shot lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStatus {
    /// Waiting for the deadline.
    Armed,
    /// The deadline passed and the callback was invoked.
    Fired,
    /// Cancelled before the deadline.
    Cancelled,
}

/// A one-shot timer that invokes a callback once after a delay.
///
/// Dropping the timer cancels it, so a timer owned by a game dies with the
/// game unless it already fired.
#[derive(Debug)]
pub struct ExpiryTimer {
    status: Arc<AtomicU8>,
    task: Option<JoinHandle<()>>,
    deadline: Instant,
}

impl ExpiryTimer {
    /// Arms a timer that calls `on_fire` once `after` has elapsed.
    ///
    /// # Errors
    /// - [`TimerError::NoRuntime`] when called outside a Tokio runtime
    /// - [`TimerError::DeadlineOverflow`] when `after` is too large to
    ///   represent as a deadline
    pub fn schedule<F>(after: Duration, on_fire: F) -> Result<Self, TimerError>
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = Handle::try_current().map_err(|_| TimerError::NoRuntime)?;
        let status = Arc::new(AtomicU8::new(ARMED));
        let deadline = Instant::now()
            .checked_add(after)
            .ok_or(TimerError::DeadlineOverflow(after))?;

        let flag = Arc::clone(&status);
        let task = handle.spawn(async move {
            time::sleep_until(deadline).await;
            if flag
                .compare_exchange(ARMED, FIRED, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                trace!("expiry timer fired");
                on_fire();
            }
        });

        trace!(after_ms = after.as_millis() as u64, "expiry timer armed");

        Ok(Self {
            status,
            task: Some(task),
            deadline,
        })
    }

    /// Cancels the timer.
    ///
    /// Returns `true` if this call cancelled it. Returns `false` if it had
    /// already fired or been cancelled, in which case nothing changes.
    pub fn cancel(&mut self) -> bool {
        let won = self
            .status
            .compare_exchange(ARMED, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if won {
            if let Some(task) = self.task.take() {
                task.abort();
            }
            trace!("expiry timer cancelled");
        }
        won
    }

    /// Current lifecycle status.
    pub fn status(&self) -> TimerStatus {
        match self.status.load(Ordering::Acquire) {
            ARMED => TimerStatus::Armed,
            FIRED => TimerStatus::Fired,
            _ => TimerStatus::Cancelled,
        }
    }

    /// Returns `true` while the timer is still waiting for its deadline.
    pub fn is_armed(&self) -> bool {
        self.status() == TimerStatus::Armed
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

impl Drop for ExpiryTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
