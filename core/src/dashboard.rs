//! Dashboard snapshot: every KPI card for one selected window.
//!
//! BUILD ORDER (fixed):
//!   1. Revenue metrics        (status filter applied)
//!   2. Membership metrics
//!   3. Consultation completion rate
//!   4. Staff ranking          (status filter applied to revenue)
//!   5. Consultation status summary   (window-scoped)
//!   6. Payment status summary        (window-scoped, ignores status filter)
//!
//! A build is a pure function of its inputs. Calling it twice with the
//! same dataset, window, filter, clock and config yields identical output.

use crate::{
    clock::Clock,
    config::StatsConfig,
    date_range::{DateRange, DateRangeCalculator},
    error::StatsResult,
    metrics::{MembershipMetrics, Metric, MetricsAggregator, PeriodMetrics, RevenueMetrics},
    period_filter::PeriodFilter,
    ranking::{CompositeScore, EntityScoreRanker},
    records::{ConsultationRecord, ConsultationStatus, Dataset, StatusFilter, TransactionRecord},
    summary::{CategoricalSummary, StatisticsSummarizer},
    types::Granularity,
};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub range:                   DateRange,
    pub status_filter:           StatusFilter,
    pub generated_for:           NaiveDate,
    pub revenue:                 RevenueMetrics,
    pub membership:              MembershipMetrics,
    /// Share of window consultations that are completed, 0..=1.
    pub consultation_completion: PeriodMetrics,
    pub staff_ranking:           Vec<CompositeScore>,
    pub consultation_summary:    CategoricalSummary,
    pub payment_summary:         CategoricalSummary,
}

impl DashboardSnapshot {
    pub fn to_json(&self) -> StatsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn is_completed(consultation: &ConsultationRecord) -> bool {
    consultation.parsed_status() == Some(ConsultationStatus::Completed)
}

fn no_amount(_: &ConsultationRecord) -> Option<f64> {
    None
}

pub struct Dashboard;

impl Dashboard {
    pub fn build(
        dataset: &Dataset,
        range: &DateRange,
        filter: StatusFilter,
        clock: &dyn Clock,
        config: &StatsConfig,
    ) -> DashboardSnapshot {
        let revenue = RevenueMetrics::compute(&dataset.transactions, range, filter);

        let membership = MembershipMetrics::compute(
            &dataset.memberships,
            range,
            clock,
            config.expiring_soon_days,
        );

        let consultation_completion = MetricsAggregator::new(
            &dataset.consultations,
            ConsultationRecord::date_str,
            no_amount,
        )
        .compare(range, &Metric::Ratio(is_completed));

        let mut staff_ranking = EntityScoreRanker::rank_staff(
            &dataset.staff,
            &dataset.transactions,
            &dataset.memberships,
            &dataset.consultations,
            range,
            filter,
        );
        if let Some(limit) = config.ranking_limit {
            staff_ranking.truncate(limit);
        }

        let consultation_summary = StatisticsSummarizer::consultation_status(PeriodFilter::apply(
            &dataset.consultations,
            range,
            ConsultationRecord::date_str,
        ));

        let payment_summary = StatisticsSummarizer::payment_status(PeriodFilter::apply(
            &dataset.transactions,
            range,
            TransactionRecord::date_str,
        ));

        log::info!(
            "dashboard {range} filter={filter:?}: revenue={:.2} ({:+.1}%), new members={} ({:+.1}%), staff ranked={}",
            revenue.total_revenue.current,
            revenue.total_revenue.growth_percent,
            membership.new_members.current,
            membership.new_members.growth_percent,
            staff_ranking.len(),
        );

        DashboardSnapshot {
            range: *range,
            status_filter: filter,
            generated_for: clock.today(),
            revenue,
            membership,
            consultation_completion,
            staff_ranking,
            consultation_summary,
            payment_summary,
        }
    }

    /// Build for the `unit` window containing `anchor` (`YYYY-MM-DD`).
    pub fn for_anchor(
        dataset: &Dataset,
        anchor: &str,
        unit: Granularity,
        filter: StatusFilter,
        clock: &dyn Clock,
        config: &StatsConfig,
    ) -> StatsResult<DashboardSnapshot> {
        let range = DateRangeCalculator::compute(anchor, unit, 0)?;
        Ok(Self::build(dataset, &range, filter, clock, config))
    }
}
