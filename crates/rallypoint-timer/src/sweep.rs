//! Fixed-interval scheduler for the registry sweep.

use std::time::Duration;

use rand::Rng;
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for a [`SweepScheduler`].
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Time between sweeps. `Duration::ZERO` disables sweeping entirely.
    pub interval: Duration,
    /// Random jitter (0..this) added to the *first* sweep so several
    /// schedulers started together don't fire in lockstep.
    pub initial_jitter: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60 * 60),
            initial_jitter: Duration::from_millis(500),
        }
    }
}

impl SweepConfig {
    /// Longest allowed interval. Longer values are clamped.
    pub const MAX_INTERVAL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

    /// Create a config for a given interval with default jitter.
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    /// Create a config that never sweeps.
    pub fn disabled() -> Self {
        Self::every(Duration::ZERO)
    }

    /// Clamp values to valid ranges: the interval to [`Self::MAX_INTERVAL`],
    /// the jitter to the interval.
    pub fn validated(mut self) -> Self {
        if self.interval > Self::MAX_INTERVAL {
            warn!(
                interval_secs = self.interval.as_secs(),
                max_secs = Self::MAX_INTERVAL.as_secs(),
                "sweep interval exceeds maximum, clamping"
            );
            self.interval = Self::MAX_INTERVAL;
        }
        self.initial_jitter = self.initial_jitter.min(self.interval);
        self
    }
}

/// Returned by [`SweepScheduler::wait_for_sweep`] each time a sweep is due.
#[derive(Debug, Clone)]
pub struct SweepInfo {
    /// Monotonically increasing sweep number (starts at 1).
    pub sweep: u64,
    /// How late the scheduler woke relative to its deadline.
    pub late_by: Duration,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Drives the periodic registry sweep.
///
/// When the interval is zero, [`wait_for_sweep`](Self::wait_for_sweep)
/// pends forever, which is the right behavior inside a `tokio::select!`.
pub struct SweepScheduler {
    interval: Option<Duration>,
    next_sweep: Option<Instant>,
    sweep_count: u64,
}

impl SweepScheduler {
    /// Create a new scheduler from config.
    pub fn new(config: SweepConfig) -> Self {
        let config = config.validated();
        let interval = (!config.interval.is_zero()).then_some(config.interval);

        let next_sweep = interval.map(|d| {
            let jitter = if config.initial_jitter.is_zero() {
                Duration::ZERO
            } else {
                let max_us = config.initial_jitter.as_micros() as u64;
                Duration::from_micros(rand::rng().random_range(0..max_us.max(1)))
            };
            Instant::now() + d + jitter
        });

        match interval {
            Some(d) => debug!(interval_secs = d.as_secs_f64(), "sweep scheduler created"),
            None => debug!("sweep scheduler created with sweeping disabled"),
        }

        Self {
            interval,
            next_sweep,
            sweep_count: 0,
        }
    }

    /// Create a scheduler for a given interval with default jitter.
    pub fn every(interval: Duration) -> Self {
        Self::new(SweepConfig::every(interval))
    }

    /// Wait until the next sweep is due.
    pub async fn wait_for_sweep(&mut self) -> SweepInfo {
        let (next, interval) = match (self.next_sweep, self.interval) {
            (Some(next), Some(interval)) => (next, interval),
            _ => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        };

        time::sleep_until(next).await;

        let now = Instant::now();
        let late_by = now.saturating_duration_since(next);
        if late_by > interval {
            warn!(
                sweep = self.sweep_count + 1,
                late_ms = late_by.as_millis() as u64,
                "sweep ran more than one interval late"
            );
        }

        // Always schedule from now so a stalled runtime doesn't cause a burst.
        self.next_sweep = Some(now + interval);
        self.sweep_count += 1;

        trace!(sweep = self.sweep_count, "sweep due");

        SweepInfo {
            sweep: self.sweep_count,
            late_by,
        }
    }

    /// Whether sweeping is disabled (interval of zero).
    pub fn is_disabled(&self) -> bool {
        self.interval.is_none()
    }

    /// Number of sweeps fired so far.
    pub fn sweep_count(&self) -> u64 {
        self.sweep_count
    }

    /// The configured interval, or `None` when disabled.
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }
}
