//! DateRangeCalculator tests: calendar boundaries, rollover, weeks.

use chrono::{Datelike, NaiveDate, Weekday};
use gymdesk_core::{
    date_range::{format_date, parse_date, shift_days, DateRange, DateRangeCalculator},
    error::StatsError,
    types::Granularity,
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn range(anchor: &str, unit: Granularity, offset: i64) -> (String, String) {
    let r = DateRangeCalculator::compute(anchor, unit, offset).unwrap();
    (r.start_str(), r.end_str())
}

fn pair(start: &str, end: &str) -> (String, String) {
    (start.to_string(), end.to_string())
}

fn random_anchor(rng: &mut Pcg64Mcg) -> NaiveDate {
    let base = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
    shift_days(base, rng.gen_range(0..73_000)).unwrap()
}

// ── Month ────────────────────────────────────────────────────────────────────

/// Month windows end on the true last day, leap years included.
#[test]
fn month_lengths_follow_the_calendar() {
    let cases = [
        ("2024-02-10", 29),
        ("2025-02-10", 28),
        ("2025-04-10", 30),
        ("2025-01-10", 31),
        ("2000-02-01", 29),
        ("1900-02-01", 28),
    ];
    for (anchor, days) in cases {
        let r = DateRangeCalculator::compute(anchor, Granularity::Month, 0).unwrap();
        assert_eq!(r.days(), days, "month of {anchor} should have {days} days, got {r}");
        assert_eq!(r.start().day(), 1);
    }
}

/// January minus one month is December of the previous year.
#[test]
fn month_offset_rolls_the_year_backward() {
    assert_eq!(
        range("2025-01-15", Granularity::Month, -1),
        pair("2024-12-01", "2024-12-31")
    );
}

/// December plus one month is January of the next year.
#[test]
fn month_offset_rolls_the_year_forward() {
    assert_eq!(
        range("2025-12-15", Granularity::Month, 1),
        pair("2026-01-01", "2026-01-31")
    );
}

/// Large month offsets carry across several years.
#[test]
fn month_offsets_spanning_several_years() {
    assert_eq!(
        range("2025-01-31", Granularity::Month, 13),
        pair("2026-02-01", "2026-02-28")
    );
    assert_eq!(
        range("2025-01-31", Granularity::Month, -25),
        pair("2022-12-01", "2022-12-31")
    );
    assert_eq!(
        range("2023-03-31", Granularity::Month, -13),
        pair("2022-02-01", "2022-02-28")
    );
}

#[test]
fn month_from_day_31_anchor_does_not_skip_short_months() {
    // Jan 31 + 1 month is February, never March.
    assert_eq!(
        range("2024-01-31", Granularity::Month, 1),
        pair("2024-02-01", "2024-02-29")
    );
}

// ── Week ─────────────────────────────────────────────────────────────────────

/// Weeks start on Monday and end on Sunday.
#[test]
fn week_runs_monday_to_sunday() {
    assert_eq!(
        range("2025-05-15", Granularity::Week, 0),
        pair("2025-05-12", "2025-05-18")
    );
}

#[test]
fn sunday_belongs_to_the_week_that_started_monday() {
    assert_eq!(
        range("2025-05-18", Granularity::Week, 0),
        pair("2025-05-12", "2025-05-18")
    );
    assert_eq!(
        range("2025-05-12", Granularity::Week, 0),
        pair("2025-05-12", "2025-05-18")
    );
}

/// Week offsets move in whole weeks across month and year ends.
#[test]
fn week_offsets_cross_month_and_year() {
    assert_eq!(
        range("2025-05-15", Granularity::Week, -1),
        pair("2025-05-05", "2025-05-11")
    );
    assert_eq!(
        range("2025-01-01", Granularity::Week, 0),
        pair("2024-12-30", "2025-01-05")
    );
    assert_eq!(
        range("2024-12-28", Granularity::Week, 1),
        pair("2024-12-30", "2025-01-05")
    );
}

// ── Today / Year ─────────────────────────────────────────────────────────────

/// A day window is a single date, shifted by offset days.
#[test]
fn today_is_a_single_day_shifted_by_offset() {
    assert_eq!(range("2025-05-15", Granularity::Today, 0), pair("2025-05-15", "2025-05-15"));
    assert_eq!(range("2024-02-28", Granularity::Today, 1), pair("2024-02-29", "2024-02-29"));
    assert_eq!(range("2025-02-28", Granularity::Today, 1), pair("2025-03-01", "2025-03-01"));
    assert_eq!(range("2025-01-01", Granularity::Today, -1), pair("2024-12-31", "2024-12-31"));
}

/// Year windows cover 1 January to 31 December.
#[test]
fn year_covers_jan_first_to_dec_31st() {
    assert_eq!(range("2025-07-04", Granularity::Year, 0), pair("2025-01-01", "2025-12-31"));
    assert_eq!(range("2025-07-04", Granularity::Year, -1), pair("2024-01-01", "2024-12-31"));
    assert_eq!(range("2025-07-04", Granularity::Year, 2), pair("2027-01-01", "2027-12-31"));

    let leap = DateRangeCalculator::compute("2024-03-01", Granularity::Year, 0).unwrap();
    assert_eq!(leap.days(), 366);
}

// ── Errors ───────────────────────────────────────────────────────────────────

/// Anything other than a real YYYY-MM-DD date is rejected.
#[test]
fn unparseable_anchor_is_a_date_parse_error() {
    for bad in ["", "yesterday", "2025-13-01", "2025-02-30", "15/05/2025"] {
        let err = DateRangeCalculator::compute(bad, Granularity::Month, 0).unwrap_err();
        assert!(
            matches!(err, StatsError::DateParse { .. }),
            "expected DateParse for {bad:?}, got {err:?}"
        );
    }
}

/// Offsets beyond the calendar return DateOutOfRange for every unit.
#[test]
fn absurd_offsets_fail_instead_of_panicking() {
    for unit in Granularity::ALL {
        let err = DateRangeCalculator::compute("2025-05-15", unit, i64::MAX).unwrap_err();
        assert!(
            matches!(err, StatsError::DateOutOfRange { .. }),
            "expected DateOutOfRange for {unit:?}, got {err:?}"
        );
        let err = DateRangeCalculator::compute("2025-05-15", unit, i64::MIN).unwrap_err();
        assert!(matches!(err, StatsError::DateOutOfRange { .. }));
    }
}

/// start > end never constructs a DateRange.
#[test]
fn inverted_range_is_rejected() {
    let err = DateRange::parse("2025-05-02", "2025-05-01").unwrap_err();
    assert!(matches!(err, StatsError::InvalidRange { .. }));
    assert!(DateRange::parse("2025-05-01", "2025-05-01").is_ok());
}

// ── DateRange helpers ────────────────────────────────────────────────────────

/// The preceding range has the same length and ends the day before.
#[test]
fn preceding_range_has_equal_length_and_touches() {
    let r = DateRange::parse("2025-03-01", "2025-03-31").unwrap();
    let prev = r.preceding().unwrap();
    assert_eq!(prev.start_str(), "2025-01-29");
    assert_eq!(prev.end_str(), "2025-02-28");
    assert_eq!(prev.days(), r.days());
}

/// Deserialization re-checks start <= end.
#[test]
fn serializes_as_date_strings_and_revalidates() {
    let r = DateRangeCalculator::compute("2025-01-15", Granularity::Month, -1).unwrap();
    let json = serde_json::to_string(&r).unwrap();
    assert_eq!(json, r#"{"start":"2024-12-01","end":"2024-12-31"}"#);

    let back: DateRange = serde_json::from_str(&json).unwrap();
    assert_eq!(back, r);

    let inverted = serde_json::from_str::<DateRange>(r#"{"start":"2025-01-02","end":"2025-01-01"}"#);
    assert!(inverted.is_err());
}

// ── Properties ───────────────────────────────────────────────────────────────

/// start <= end for any anchor, unit and offset.
#[test]
fn start_never_after_end() {
    let mut rng = Pcg64Mcg::seed_from_u64(0x6D_5EED);
    for _ in 0..2_000 {
        let anchor = random_anchor(&mut rng);
        let offset = rng.gen_range(-500i64..=500);
        for unit in Granularity::ALL {
            let r = DateRangeCalculator::compute_from(anchor, unit, offset).unwrap();
            assert!(r.start() <= r.end(), "{unit:?} {anchor} {offset}: {r}");
        }
    }
}

/// prev.end + 1 day == current.start, and current.end + 1 day == next.start.
#[test]
fn adjacent_ranges_are_contiguous() {
    let mut rng = Pcg64Mcg::seed_from_u64(0xC0_471C);
    for _ in 0..2_000 {
        let anchor = random_anchor(&mut rng);
        for unit in Granularity::ALL {
            let prev = DateRangeCalculator::compute_from(anchor, unit, -1).unwrap();
            let current = DateRangeCalculator::compute_from(anchor, unit, 0).unwrap();
            let next = DateRangeCalculator::compute_from(anchor, unit, 1).unwrap();

            assert_eq!(shift_days(prev.end(), 1), Some(current.start()), "{unit:?} at {anchor}");
            assert_eq!(shift_days(current.end(), 1), Some(next.start()), "{unit:?} at {anchor}");
            assert!(current.contains(anchor), "{unit:?} window {current} must contain {anchor}");
        }
    }
}

/// Any week window is Monday through Sunday, seven days.
#[test]
fn week_windows_always_start_monday_and_last_seven_days() {
    let mut rng = Pcg64Mcg::seed_from_u64(7);
    for _ in 0..1_000 {
        let anchor = random_anchor(&mut rng);
        let offset = rng.gen_range(-60i64..=60);
        let r = DateRangeCalculator::compute_from(anchor, Granularity::Week, offset).unwrap();
        assert_eq!(r.start().weekday(), Weekday::Mon);
        assert_eq!(r.end().weekday(), Weekday::Sun);
        assert_eq!(r.days(), 7);
    }
}

#[test]
fn string_and_date_entry_points_agree() {
    let anchor = parse_date("2025-05-15").unwrap();
    for unit in Granularity::ALL {
        let a = DateRangeCalculator::compute(&format_date(anchor), unit, 3).unwrap();
        let b = DateRangeCalculator::compute_from(anchor, unit, 3).unwrap();
        assert_eq!(a, b);
    }
}
