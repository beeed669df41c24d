use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

use clinicdesk_core::clock::{Clock, FixedClock, SystemClock};

#[test]
fn test_fixed_clock_returns_pinned_instant() {
    let instant = Utc.with_ymd_and_hms(2026, 9, 7, 10, 0, 0).unwrap();
    let clock = FixedClock(instant);

    assert_eq!(clock.now(), instant);
    assert_eq!(clock.now(), clock.now());
}

#[test]
fn test_system_clock_moves_forward() {
    let first = SystemClock.now();
    let second = SystemClock.now();

    assert!(second >= first);
}

#[test]
fn test_clock_is_object_safe() {
    let instant = Utc.with_ymd_and_hms(2026, 9, 7, 10, 0, 0).unwrap();
    let clock: &dyn Clock = &FixedClock(instant);

    assert_eq!(clock.now(), instant);
}
