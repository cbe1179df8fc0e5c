//! Period filtering of timestamped records.
//!
//! A DateRange becomes a millisecond TimeWindow
//! `[start 00:00:00.000, end 23:59:59.999]`, so a record stamped at any
//! time on the end date is still inside. Both ends are inclusive.
//! Records with a missing or unparseable date are skipped, never an error.

use crate::date_range::{DateRange, DATE_FORMAT};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

const DAY_MS: i64 = 86_400_000;

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a record's date field. Accepts a bare date, a local
/// timestamp, or RFC 3339 (wall-clock components kept as written).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Inclusive instant window at millisecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end:   NaiveDateTime,
}

impl From<&DateRange> for TimeWindow {
    fn from(range: &DateRange) -> Self {
        let start = range.start().and_time(NaiveTime::MIN);
        let end = range
            .end()
            .and_time(NaiveTime::MIN)
            .checked_add_signed(Duration::milliseconds(DAY_MS - 1))
            .unwrap_or(NaiveDateTime::MAX);
        Self { start, end }
    }
}

impl TimeWindow {
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant <= self.end
    }

    pub fn length(&self) -> Duration {
        self.end - self.start
    }

    /// The window of identical length ending one millisecond before
    /// `start`. `None` if that would fall before chrono's minimum date.
    pub fn preceding(&self) -> Option<Self> {
        let end = self.start.checked_sub_signed(Duration::milliseconds(1))?;
        let start = end.checked_sub_signed(self.length())?;
        Some(Self { start, end })
    }
}

/// Result of one filter pass.
#[derive(Debug, Clone)]
pub struct Filtered<'a, T> {
    pub kept:    Vec<&'a T>,
    /// Records dropped because their date was missing or unparseable.
    pub skipped: usize,
}

pub struct PeriodFilter;

impl PeriodFilter {
    /// Records whose `date_field` falls inside `range`.
    pub fn apply<'a, T, I, F>(records: I, range: &DateRange, date_field: F) -> Vec<&'a T>
    where
        T: 'a,
        I: IntoIterator<Item = &'a T>,
        F: Fn(&T) -> Option<&str>,
    {
        Self::apply_window(records, &TimeWindow::from(range), date_field).kept
    }

    pub fn apply_window<'a, T, I, F>(records: I, window: &TimeWindow, date_field: F) -> Filtered<'a, T>
    where
        T: 'a,
        I: IntoIterator<Item = &'a T>,
        F: Fn(&T) -> Option<&str>,
    {
        let mut kept = Vec::new();
        let mut seen = 0usize;
        let mut skipped = 0usize;

        for record in records {
            seen += 1;
            match date_field(record).and_then(parse_timestamp) {
                Some(instant) if window.contains(instant) => kept.push(record),
                Some(_) => {}
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            log::debug!("period filter: {skipped} of {seen} records skipped (missing or bad date)");
        }

        Filtered { kept, skipped }
    }
}
