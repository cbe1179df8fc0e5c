//! Period-over-period KPI aggregation.
//!
//! Every metric is computed twice: over the selected window and over
//! the window of identical length that ends one millisecond before it.
//! Growth between the two is guarded:
//!
//!   growth = previous > 0 ? (current - previous) / previous * 100 : 0
//!
//! The same guard applies to every growth figure on the dashboard
//! (revenue, members, payment count, average payment). Ratios and
//! averages over an empty set are 0. Nothing here returns NaN or
//! Infinity.
//!
//! Malformed rows are skipped, counted, and logged at debug level.

use crate::{
    clock::Clock,
    date_range::{shift_days, DateRange},
    period_filter::{parse_timestamp, PeriodFilter, TimeWindow},
    records::{MembershipRecord, StatusFilter, TransactionRecord},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── Guarded arithmetic ───────────────────────────────────────────────────────

pub fn growth_percent(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

/// `numerator / denominator`, or 0 when the denominator is 0.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator != 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

pub fn percent_of(part: f64, whole: f64) -> f64 {
    safe_ratio(part, whole) * 100.0
}

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodMetrics {
    pub current:        f64,
    pub previous:       f64,
    pub growth_percent: f64,
}

impl PeriodMetrics {
    pub fn new(current: f64, previous: f64) -> Self {
        Self {
            current,
            previous,
            growth_percent: growth_percent(current, previous),
        }
    }
}

/// What to compute over a filtered record set.
pub enum Metric<T> {
    /// Sum of valid amounts.
    Sum,
    /// Number of records in the window.
    Count,
    /// Mean of valid amounts.
    Average,
    /// Records matching the predicate over all records in the window.
    Ratio(fn(&T) -> bool),
}

// ── Aggregator ───────────────────────────────────────────────────────────────

pub struct MetricsAggregator<'a, T> {
    records:      Vec<&'a T>,
    date_field:   fn(&T) -> Option<&str>,
    amount_field: fn(&T) -> Option<f64>,
}

impl<'a, T> MetricsAggregator<'a, T> {
    pub fn new<I>(
        records: I,
        date_field: fn(&T) -> Option<&str>,
        amount_field: fn(&T) -> Option<f64>,
    ) -> Self
    where
        I: IntoIterator<Item = &'a T>,
    {
        Self {
            records: records.into_iter().collect(),
            date_field,
            amount_field,
        }
    }

    /// `metric` over `range` and over the equal-length period before it.
    pub fn compare(&self, range: &DateRange, metric: &Metric<T>) -> PeriodMetrics {
        let window = TimeWindow::from(range);
        let current = self.over_window(&window, metric);
        let previous = match window.preceding() {
            Some(prev) => self.over_window(&prev, metric),
            None => 0.0,
        };
        PeriodMetrics::new(current, previous)
    }

    pub fn over_window(&self, window: &TimeWindow, metric: &Metric<T>) -> f64 {
        let set = PeriodFilter::apply_window(self.records.iter().copied(), window, self.date_field).kept;
        self.evaluate(&set, metric)
    }

    pub fn evaluate(&self, set: &[&T], metric: &Metric<T>) -> f64 {
        match metric {
            Metric::Count => set.len() as f64,
            Metric::Sum => set.iter().filter_map(|r| (self.amount_field)(*r)).sum(),
            Metric::Average => {
                let (sum, n) = set
                    .iter()
                    .filter_map(|r| (self.amount_field)(*r))
                    .fold((0.0f64, 0usize), |(sum, n), amount| (sum + amount, n + 1));
                safe_ratio(sum, n as f64)
            }
            Metric::Ratio(predicate) => {
                let matching = set.iter().filter(|&&r| predicate(r)).count();
                safe_ratio(matching as f64, set.len() as f64)
            }
        }
    }
}

// ── Revenue ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueMetrics {
    pub total_revenue:   PeriodMetrics,
    pub payment_count:   PeriodMetrics,
    pub average_payment: PeriodMetrics,
    /// Rows passing the status filter but lacking a usable amount or date.
    pub skipped_records: usize,
}

impl RevenueMetrics {
    pub fn compute(
        transactions: &[TransactionRecord],
        range: &DateRange,
        filter: StatusFilter,
    ) -> Self {
        let (valid, bad_amount): (Vec<&TransactionRecord>, Vec<&TransactionRecord>) = transactions
            .iter()
            .filter(|t| filter.matches(t.status))
            .partition(|t| t.valid_amount().is_some());

        let bad_date = valid
            .iter()
            .filter(|t| t.date_str().and_then(parse_timestamp).is_none())
            .count();

        let agg = MetricsAggregator::new(
            valid,
            TransactionRecord::date_str,
            TransactionRecord::valid_amount,
        );

        let metrics = Self {
            total_revenue:   agg.compare(range, &Metric::Sum),
            payment_count:   agg.compare(range, &Metric::Count),
            average_payment: agg.compare(range, &Metric::Average),
            skipped_records: bad_amount.len() + bad_date,
        };

        if metrics.skipped_records > 0 {
            log::debug!(
                "revenue {range}: skipped {} malformed transactions",
                metrics.skipped_records,
            );
        }
        metrics
    }
}

// ── Membership ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipMetrics {
    /// Members whose join date falls in the window, with growth.
    pub new_members:     PeriodMetrics,
    /// Joined by the end of the window and not expired before it.
    pub active_members:  u64,
    /// Joined by the end of the window, membership ended before it.
    pub expired_members: u64,
    /// Membership ends within the configured horizon after today.
    pub expiring_soon:   u64,
    /// active / (active + expired) as a percentage.
    pub retention_rate:  f64,
    pub skipped_records: usize,
}

/// Standing of one membership relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Standing {
    NotYetJoined,
    Active,
    Expired,
}

struct ParsedMembership {
    join: NaiveDate,
    end:  Option<NaiveDate>,
}

impl ParsedMembership {
    /// `None` if the join date is unusable, or an end date is present
    /// but unparseable.
    fn parse(record: &MembershipRecord) -> Option<Self> {
        let join = record.join_date_str().and_then(parse_timestamp)?.date();
        let end = match record.membership_end.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_timestamp(raw)?.date()),
        };
        Some(Self { join, end })
    }

    fn standing_at(&self, date: NaiveDate) -> Standing {
        if self.join > date {
            return Standing::NotYetJoined;
        }
        match self.end {
            Some(end) if end < date => Standing::Expired,
            _ => Standing::Active,
        }
    }
}

fn no_amount(_: &MembershipRecord) -> Option<f64> {
    None
}

/// A membership whose join date parses and whose end date is blank or
/// parses. Anything else is skipped by every membership aggregate.
pub fn usable_membership(record: &MembershipRecord) -> bool {
    ParsedMembership::parse(record).is_some()
}

impl MembershipMetrics {
    pub fn compute(
        memberships: &[MembershipRecord],
        range: &DateRange,
        clock: &dyn Clock,
        expiring_soon_days: u32,
    ) -> Self {
        let usable = memberships.iter().filter(|m| usable_membership(m));
        let agg = MetricsAggregator::new(usable, MembershipRecord::join_date_str, no_amount);
        let new_members = agg.compare(range, &Metric::Count);

        let today = clock.today();
        let horizon = shift_days(today, i64::from(expiring_soon_days)).unwrap_or(today);

        let mut active = 0u64;
        let mut expired = 0u64;
        let mut expiring_soon = 0u64;
        let mut skipped = 0usize;

        for record in memberships {
            let Some(parsed) = ParsedMembership::parse(record) else {
                skipped += 1;
                continue;
            };

            match parsed.standing_at(range.end()) {
                Standing::Active       => active += 1,
                Standing::Expired      => expired += 1,
                Standing::NotYetJoined => {}
            }

            if let Some(end) = parsed.end {
                if parsed.join <= today && end >= today && end <= horizon {
                    expiring_soon += 1;
                }
            }
        }

        if skipped > 0 {
            log::debug!("membership {range}: skipped {skipped} records with bad dates");
        }

        Self {
            new_members,
            active_members: active,
            expired_members: expired,
            expiring_soon,
            retention_rate: percent_of(active as f64, (active + expired) as f64),
            skipped_records: skipped,
        }
    }
}
