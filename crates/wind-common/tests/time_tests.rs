//! Tests for forecast run-time resolution.

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use wind_common::time::{RunTime, RUN_HOURS};

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

// ============================================================================
// Nearest run selection
// ============================================================================

#[test]
fn test_exact_run_hours_resolve_to_themselves() {
    for hour in RUN_HOURS {
        let instant = utc(2026, 2, 26, hour, 0);
        assert_eq!(RunTime::nearest(instant).datetime(), instant);
    }
}

#[test]
fn test_minutes_are_ignored() {
    let run = RunTime::nearest(utc(2026, 2, 26, 8, 59));
    assert_eq!(run.datetime(), utc(2026, 2, 26, 6, 0));
}

#[test]
fn test_ties_prefer_earlier_run() {
    // 03Z, 09Z, 15Z sit exactly between two runs.
    assert_eq!(RunTime::nearest(utc(2026, 2, 26, 3, 30)).hour(), 0);
    assert_eq!(RunTime::nearest(utc(2026, 2, 26, 9, 0)).hour(), 6);
    assert_eq!(RunTime::nearest(utc(2026, 2, 26, 15, 0)).hour(), 12);
}

#[test]
fn test_late_evening_stays_on_same_day() {
    let run = RunTime::nearest(utc(2026, 2, 26, 23, 10));
    assert_eq!(run.datetime(), utc(2026, 2, 26, 18, 0));
}

#[test]
fn test_early_morning_prefers_same_day_00z() {
    // 01:30Z: distance to 00Z is 1, distance to previous 18Z is 1 + 6 = 7.
    let run = RunTime::nearest(utc(2026, 2, 26, 1, 30));
    assert_eq!(run.datetime(), utc(2026, 2, 26, 0, 0));

    // 02:00Z: 2 vs 8.
    let run = RunTime::nearest(utc(2026, 2, 26, 2, 0));
    assert_eq!(run.datetime(), utc(2026, 2, 26, 0, 0));
}

#[test]
fn test_month_boundary_keeps_calendar_date() {
    let run = RunTime::nearest(utc(2026, 3, 1, 0, 5));
    assert_eq!(run.datetime(), utc(2026, 3, 1, 0, 0));
}

#[test]
fn test_output_is_total_and_within_a_day() {
    let start = utc(2026, 12, 30, 0, 0);
    for step in 0..(72 * 4) {
        let instant = start + Duration::minutes(step * 15);
        let run = RunTime::nearest(instant).datetime();

        assert!(RUN_HOURS.contains(&run.hour()), "bad hour for {}", instant);
        assert_eq!(run.minute(), 0);
        assert_eq!(run.second(), 0);
        assert_eq!(run.nanosecond(), 0);
        assert!((instant - run).num_hours().abs() < 24, "{} -> {}", instant, run);
    }
}

// ============================================================================
// Retry run and formatting
// ============================================================================

#[test]
fn test_previous_run_is_six_hours_earlier() {
    let run = RunTime::nearest(utc(2026, 2, 26, 12, 0));
    assert_eq!(run.previous().datetime(), utc(2026, 2, 26, 6, 0));
    assert_eq!(run.previous().previous().previous().datetime(), utc(2026, 2, 25, 18, 0));
}

#[test]
fn test_labels() {
    let run = RunTime::nearest(utc(2026, 1, 5, 19, 0));
    assert_eq!(run.label(), "20260105_18Z");
    assert_eq!(run.to_iso8601(), "2026-01-05T18:00:00.000Z");
}
