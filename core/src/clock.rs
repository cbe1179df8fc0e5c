//! Wall-clock access: the only place "today" comes from.
//!
//! RULE: Nothing in the engine may read the system time directly.
//! Every function that needs "today" takes a `&dyn Clock`, so tests
//! pin the date with a FixedClock instead of patching global time.

use chrono::{Local, NaiveDate};

pub trait Clock {
    /// The current calendar date in the caller's local time zone.
    fn today(&self) -> NaiveDate;
}

/// Reads the host's local date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock stopped at one date. Used in tests and replay tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    pub date: NaiveDate,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    /// Build from a `YYYY-MM-DD` string.
    pub fn parse(s: &str) -> crate::error::StatsResult<Self> {
        crate::date_range::parse_date(s).map(Self::new)
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date
    }
}
