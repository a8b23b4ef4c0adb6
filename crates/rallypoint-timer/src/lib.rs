//! Timing primitives for Rallypoint.
//!
//! Two kinds of clocks drive the lobby:
//!
//! - [`ExpiryTimer`] — a one-shot timer owned by a single game. It either
//!   fires once or is cancelled once, never both, even when the two race in
//!   the same runtime tick.
//! - [`SweepScheduler`] — a fixed-interval cadence for the registry sweep,
//!   with a jittered first tick and a clamped maximum interval.
//!
//! # Integration
//!
//! The sweep scheduler is meant to sit in a long-running task:
//!
//! ```ignore
//! let mut scheduler = SweepScheduler::new(SweepConfig::every(Duration::from_secs(3600)));
//! loop {
//!     let info = scheduler.wait_for_sweep().await;
//!     let report = lobby.sweep().await;
//! }
//! ```

mod error;
mod expiry;
mod sweep;

pub use error::TimerError;
pub use expiry::{ExpiryTimer, TimerStatus};
pub use sweep::{SweepConfig, SweepInfo, SweepScheduler};
