//! Tests for utility functions

use std::sync::Arc;

use opd_token_engine::util::{init_tracing, now_ms, Clock, ManualClock, SystemClock};

#[test]
fn test_system_clock_tracks_wall_time() {
    let before = now_ms();
    let reading = SystemClock.now_ms();
    assert!(reading >= before);
    assert!(reading > 0);
}

#[test]
fn test_manual_clock_advances() {
    let clock = ManualClock::new(1_000);
    assert_eq!(clock.now_ms(), 1_000);

    clock.advance_ms(500);
    assert_eq!(clock.now_ms(), 1_500);

    clock.advance_minutes(2);
    assert_eq!(clock.now_ms(), 121_500);

    clock.set_ms(0);
    assert_eq!(clock.now_ms(), 0);
}

#[test]
fn test_manual_clock_advance_does_not_wrap() {
    let clock = ManualClock::new(u64::MAX - 10);
    clock.advance_minutes(u64::MAX);
    assert_eq!(clock.now_ms(), u128::from(u64::MAX));

    let clock = ManualClock::new(1);
    clock.advance_ms(u64::MAX);
    assert_eq!(clock.now_ms(), u128::from(u64::MAX));
}

#[test]
fn test_shared_manual_clock() {
    let clock = Arc::new(ManualClock::new(0));
    let shared: Arc<ManualClock> = Arc::clone(&clock);
    clock.advance_minutes(1);
    assert_eq!(shared.now_ms(), 60_000);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    tracing::info!(component = "util_test", "tracing initialized");
}
