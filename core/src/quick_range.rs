//! Quick-range buttons: today / this week / this month / this year.
//!
//! Each entry exposes three windows:
//!   - current(): the window containing wall-clock today (from the Clock)
//!   - prev():    one unit before the user-selected anchor date
//!   - next():    one unit after the user-selected anchor date
//!
//! current() never looks at the selected anchor; the arrows never
//! look at the clock. Keep the two apart.

use crate::{
    clock::Clock,
    date_range::{format_date, parse_date, DateRange, DateRangeCalculator},
    error::StatsResult,
    types::Granularity,
};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickRange {
    pub granularity: Granularity,
    today:           NaiveDate,
    anchor:          NaiveDate,
}

impl QuickRange {
    pub fn label(&self) -> &'static str {
        match self.granularity {
            Granularity::Today => "Today",
            Granularity::Week  => "This Week",
            Granularity::Month => "This Month",
            Granularity::Year  => "This Year",
        }
    }

    pub fn current(&self) -> StatsResult<DateRange> {
        DateRangeCalculator::compute_from(self.today, self.granularity, 0)
    }

    pub fn prev(&self) -> StatsResult<DateRange> {
        DateRangeCalculator::compute_from(self.anchor, self.granularity, -1)
    }

    pub fn next(&self) -> StatsResult<DateRange> {
        DateRangeCalculator::compute_from(self.anchor, self.granularity, 1)
    }

    /// Resolve all three windows at once for display.
    pub fn resolve(&self) -> StatsResult<ResolvedQuickRange> {
        Ok(ResolvedQuickRange {
            granularity: self.granularity,
            label:       self.label(),
            current:     self.current()?,
            prev:        self.prev()?,
            next:        self.next()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedQuickRange {
    pub granularity: Granularity,
    pub label:       &'static str,
    pub current:     DateRange,
    pub prev:        DateRange,
    pub next:        DateRange,
}

pub struct QuickRangeNavigator {
    today:  NaiveDate,
    anchor: NaiveDate,
}

impl QuickRangeNavigator {
    /// `selected` is the user's date-picker value (`YYYY-MM-DD`).
    pub fn new(clock: &dyn Clock, selected: &str) -> StatsResult<Self> {
        Ok(Self {
            today:  clock.today(),
            anchor: parse_date(selected)?,
        })
    }

    /// Exactly four entries, in Granularity::ALL order.
    pub fn entries(&self) -> [QuickRange; 4] {
        Granularity::ALL.map(|granularity| QuickRange {
            granularity,
            today:  self.today,
            anchor: self.anchor,
        })
    }

    pub fn entry(&self, granularity: Granularity) -> QuickRange {
        QuickRange {
            granularity,
            today:  self.today,
            anchor: self.anchor,
        }
    }

    pub fn resolve_all(&self) -> StatsResult<Vec<ResolvedQuickRange>> {
        self.entries().iter().map(QuickRange::resolve).collect()
    }
}

/// New selected date after pressing an arrow: the first day of the
/// adjacent window. `step` is -1 for prev, +1 for next.
pub fn shift_anchor(selected: &str, unit: Granularity, step: i64) -> StatsResult<String> {
    let range = DateRangeCalculator::compute(selected, unit, step)?;
    Ok(format_date(range.start()))
}
