//! Integration tests for expiry timers and the sweep scheduler.
//!
//! Uses paused Tokio time so deadlines resolve deterministically: sleeping
//! in the test lets the clock auto-advance to the next pending timer.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rallypoint_timer::{ExpiryTimer, SweepConfig, SweepScheduler, TimerStatus};

// =========================================================================
// Helpers
// =========================================================================

fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
    let hits = Arc::new(AtomicUsize::new(0));
    let inner = Arc::clone(&hits);
    (hits, move || {
        inner.fetch_add(1, Ordering::SeqCst);
    })
}

fn no_jitter(interval: Duration) -> SweepConfig {
    SweepConfig {
        interval,
        initial_jitter: Duration::ZERO,
    }
}

// =========================================================================
// ExpiryTimer
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_timer_fires_once_after_deadline() {
    let (hits, on_fire) = counter();
    let timer = ExpiryTimer::schedule(Duration::from_secs(10), on_fire).unwrap();

    tokio::time::sleep(Duration::from_secs(9)).await;
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert!(timer.is_armed());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(timer.status(), TimerStatus::Fired);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_timer_never_fires() {
    let (hits, on_fire) = counter();
    let mut timer = ExpiryTimer::schedule(Duration::from_secs(10), on_fire).unwrap();

    assert!(timer.cancel());
    tokio::time::sleep(Duration::from_secs(20)).await;

    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(timer.status(), TimerStatus::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_after_fire_is_noop() {
    let (hits, on_fire) = counter();
    let mut timer = ExpiryTimer::schedule(Duration::from_secs(1), on_fire).unwrap();

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(!timer.cancel(), "a fired timer cannot also be cancelled");
    assert_eq!(timer.status(), TimerStatus::Fired);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_remaining_counts_down() {
    let timer = ExpiryTimer::schedule(Duration::from_secs(30), || {}).unwrap();
    assert_eq!(timer.remaining(), Duration::from_secs(30));

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(timer.remaining(), Duration::from_secs(20));
}

// =========================================================================
// SweepScheduler
// =========================================================================

#[test]
fn test_default_sweep_interval_is_one_hour() {
    let cfg = SweepConfig::default();
    assert_eq!(cfg.interval, Duration::from_secs(3600));
}

#[tokio::test(start_paused = true)]
async fn test_sweeps_fire_in_order() {
    let mut s = SweepScheduler::new(no_jitter(Duration::from_secs(60)));
    assert_eq!(s.interval(), Some(Duration::from_secs(60)));

    for expected in 1..=3 {
        let info = s.wait_for_sweep().await;
        assert_eq!(info.sweep, expected);
    }
    assert_eq!(s.sweep_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_first_sweep_waits_one_interval() {
    let mut s = SweepScheduler::new(no_jitter(Duration::from_secs(60)));
    let early = tokio::time::timeout(Duration::from_secs(59), s.wait_for_sweep()).await;
    assert!(early.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_disabled_scheduler_never_fires() {
    let mut s = SweepScheduler::new(SweepConfig::disabled());
    assert!(s.is_disabled());

    let result = tokio::time::timeout(Duration::from_secs(7200), s.wait_for_sweep()).await;
    assert!(result.is_err(), "disabled scheduler should pend forever");
}

#[tokio::test(start_paused = true)]
async fn test_sub_second_interval_still_sweeps() {
    let mut s = SweepScheduler::new(no_jitter(Duration::from_millis(500)));
    assert!(!s.is_disabled());

    for expected in 1..=4 {
        assert_eq!(s.wait_for_sweep().await.sweep, expected);
    }
}

#[test]
fn test_oversized_interval_is_clamped() {
    let cfg = SweepConfig {
        interval: Duration::from_secs(u64::MAX),
        initial_jitter: Duration::from_secs(u64::MAX),
    }
    .validated();
    assert_eq!(cfg.interval, SweepConfig::MAX_INTERVAL);
    assert_eq!(cfg.initial_jitter, SweepConfig::MAX_INTERVAL);
}

#[tokio::test(start_paused = true)]
async fn test_oversized_interval_schedules_without_overflow() {
    let mut s = SweepScheduler::new(no_jitter(Duration::from_secs(u64::MAX)));
    assert_eq!(s.interval(), Some(SweepConfig::MAX_INTERVAL));

    let early = tokio::time::timeout(Duration::from_secs(3600), s.wait_for_sweep()).await;
    assert!(early.is_err());
}
