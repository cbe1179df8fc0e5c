//! Calendar windows anchored at a date.
//!
//! A window is an inclusive `[start, end]` pair of calendar dates.
//! Weeks run Monday..Sunday. Month and year offsets roll the year
//! over transparently; month ends follow the real calendar (leap
//! Februaries included).

use crate::{
    error::{StatsError, StatsResult},
    types::Granularity,
};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ── DateRange ────────────────────────────────────────────────────────────────

/// Inclusive calendar window. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end:   NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end:   NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = StatsError;

    fn try_from(raw: RawDateRange) -> StatsResult<Self> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> StatsResult<Self> {
        if start > end {
            return Err(StatsError::InvalidRange {
                start: format_date(start),
                end:   format_date(end),
            });
        }
        Ok(Self { start, end })
    }

    /// Build from two `YYYY-MM-DD` strings, e.g. a date-picker selection.
    pub fn parse(start: &str, end: &str) -> StatsResult<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// A single-day window.
    pub fn single(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    pub fn start(&self) -> NaiveDate { self.start }
    pub fn end(&self)   -> NaiveDate { self.end }

    pub fn start_str(&self) -> String { format_date(self.start) }
    pub fn end_str(&self)   -> String { format_date(self.end) }

    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// The window of identical length ending the day before `start`.
    pub fn preceding(&self) -> StatsResult<Self> {
        let len = self.days();
        let end = shift_days(self.start, -1);
        let start = end.and_then(|e| shift_days(e, -(len - 1)));
        match (start, end) {
            (Some(start), Some(end)) => Ok(Self { start, end }),
            _ => Err(StatsError::DateOutOfRange {
                anchor: self.start_str(),
                unit:   "days",
                offset: -len,
            }),
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start_str(), self.end_str())
    }
}

// ── Parsing helpers ──────────────────────────────────────────────────────────

/// Parse a controlling `YYYY-MM-DD` date. Surrounding whitespace is ignored.
pub fn parse_date(s: &str) -> StatsResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| StatsError::DateParse {
        input: s.to_string(),
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Move `date` by a signed number of days. `None` past chrono's limits.
pub fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    if month == 12 {
        NaiveDate::from_ymd_opt(year, 12, 31)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?.pred_opt()
    }
}

// ── Calculator ───────────────────────────────────────────────────────────────

pub struct DateRangeCalculator;

impl DateRangeCalculator {
    /// Window of granularity `unit` containing `anchor`, moved `offset`
    /// units forward (positive) or backward (negative).
    pub fn compute(anchor: &str, unit: Granularity, offset: i64) -> StatsResult<DateRange> {
        let anchor = parse_date(anchor)?;
        Self::compute_from(anchor, unit, offset)
    }

    pub fn compute_from(anchor: NaiveDate, unit: Granularity, offset: i64) -> StatsResult<DateRange> {
        let range = match unit {
            Granularity::Today => Self::day_window(anchor, offset),
            Granularity::Week  => Self::week_window(anchor, offset),
            Granularity::Month => Self::month_window(anchor, offset),
            Granularity::Year  => Self::year_window(anchor, offset),
        }
        .ok_or_else(|| StatsError::DateOutOfRange {
            anchor: format_date(anchor),
            unit:   unit.name(),
            offset,
        })?;

        log::debug!(
            "date range: anchor={} unit={} offset={offset} -> {range}",
            format_date(anchor),
            unit.name(),
        );
        Ok(range)
    }

    fn day_window(anchor: NaiveDate, offset: i64) -> Option<DateRange> {
        shift_days(anchor, offset).map(DateRange::single)
    }

    fn week_window(anchor: NaiveDate, offset: i64) -> Option<DateRange> {
        // Sunday counts as the 7th day of the week that began on Monday.
        let back = i64::from(anchor.weekday().num_days_from_monday());
        let monday = shift_days(anchor, -back)?;
        let start = shift_days(monday, offset.checked_mul(7)?)?;
        let end = shift_days(start, 6)?;
        Some(DateRange { start, end })
    }

    fn month_window(anchor: NaiveDate, offset: i64) -> Option<DateRange> {
        let index = (i64::from(anchor.year()) * 12 + i64::from(anchor.month0())).checked_add(offset)?;
        let year = i32::try_from(index.div_euclid(12)).ok()?;
        let month = index.rem_euclid(12) as u32 + 1;

        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = last_day_of_month(year, month)?;
        Some(DateRange { start, end })
    }

    fn year_window(anchor: NaiveDate, offset: i64) -> Option<DateRange> {
        let year = i32::try_from(i64::from(anchor.year()).checked_add(offset)?).ok()?;
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
        Some(DateRange { start, end })
    }
}
