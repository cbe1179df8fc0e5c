//! Staff performance ranking.
//!
//! Each staff member gets a bounded composite score from three capped
//! sub-scores:
//!
//!   revenue      = min(revenue / 10000, 40)   floored at 0
//!   registration = min(new_registrations * 10, 30)
//!   consultation = min(consultations * 2, 30)
//!   total        = round(revenue + registration + consultation)
//!
//! Caps and coefficients are fixed business constants. The ranking is
//! sorted by total, highest first; equal totals keep staff-list order.

use crate::{
    date_range::DateRange,
    metrics::usable_membership,
    period_filter::PeriodFilter,
    records::{ConsultationRecord, MembershipRecord, StaffRecord, StatusFilter, TransactionRecord},
    types::EntityId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const REVENUE_DIVISOR: f64 = 10_000.0;
pub const REVENUE_CAP: f64 = 40.0;
pub const REGISTRATION_WEIGHT: f64 = 10.0;
pub const REGISTRATION_CAP: f64 = 30.0;
pub const CONSULTATION_WEIGHT: f64 = 2.0;
pub const CONSULTATION_CAP: f64 = 30.0;

/// Raw per-entity inputs for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityPerformance {
    pub entity_id:         EntityId,
    pub name:              String,
    pub revenue:           f64,
    pub new_registrations: u64,
    pub consultations:     u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub revenue:      f64,
    pub registration: f64,
    pub consultation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub entity_id:  EntityId,
    pub name:       String,
    pub revenue:    f64,
    pub sub_scores: SubScores,
    pub total:      u32,
}

pub struct EntityScoreRanker;

impl EntityScoreRanker {
    pub fn score(perf: &EntityPerformance) -> CompositeScore {
        let revenue = if perf.revenue.is_finite() {
            (perf.revenue / REVENUE_DIVISOR).clamp(0.0, REVENUE_CAP)
        } else {
            0.0
        };
        let registration = (perf.new_registrations as f64 * REGISTRATION_WEIGHT).min(REGISTRATION_CAP);
        let consultation = (perf.consultations as f64 * CONSULTATION_WEIGHT).min(CONSULTATION_CAP);

        // Bounded to [0, 100] by the caps above.
        let total = (revenue + registration + consultation).round() as u32;

        CompositeScore {
            entity_id: perf.entity_id.clone(),
            name: perf.name.clone(),
            revenue: perf.revenue,
            sub_scores: SubScores { revenue, registration, consultation },
            total,
        }
    }

    /// Score every entity and sort by total, highest first (stable).
    pub fn rank(performances: &[EntityPerformance]) -> Vec<CompositeScore> {
        let mut scores: Vec<CompositeScore> = performances.iter().map(Self::score).collect();
        scores.sort_by(|a, b| b.total.cmp(&a.total));
        scores
    }

    /// Derive per-staff inputs for `range` and rank them.
    ///
    /// - revenue:       transactions credited to the staff id (`entity_id`)
    /// - registrations: usable memberships whose join date is in range (`staff_id`)
    /// - consultations: consultations dated in range (`staff_id`)
    pub fn rank_staff(
        staff: &[StaffRecord],
        transactions: &[TransactionRecord],
        memberships: &[MembershipRecord],
        consultations: &[ConsultationRecord],
        range: &DateRange,
        filter: StatusFilter,
    ) -> Vec<CompositeScore> {
        let mut revenue: HashMap<&str, f64> = HashMap::new();
        let in_range = PeriodFilter::apply(
            transactions.iter().filter(|t| filter.matches(t.status)),
            range,
            TransactionRecord::date_str,
        );
        for txn in in_range {
            if let (Some(id), Some(amount)) = (txn.entity_id.as_deref(), txn.valid_amount()) {
                *revenue.entry(id).or_default() += amount;
            }
        }

        let mut registrations: HashMap<&str, u64> = HashMap::new();
        let usable = memberships.iter().filter(|m| usable_membership(m));
        for member in PeriodFilter::apply(usable, range, MembershipRecord::join_date_str) {
            if let Some(id) = member.staff_id.as_deref() {
                *registrations.entry(id).or_default() += 1;
            }
        }

        let mut consults: HashMap<&str, u64> = HashMap::new();
        for consultation in PeriodFilter::apply(consultations, range, ConsultationRecord::date_str) {
            if let Some(id) = consultation.staff_id.as_deref() {
                *consults.entry(id).or_default() += 1;
            }
        }

        let unmatched = revenue
            .keys()
            .filter(|id| !staff.iter().any(|s| s.id == **id))
            .count();
        if unmatched > 0 {
            log::warn!("staff ranking {range}: {unmatched} credited ids not in staff list");
        }

        let performances: Vec<EntityPerformance> = staff
            .iter()
            .map(|s| EntityPerformance {
                entity_id:         s.id.clone(),
                name:              s.name.clone(),
                revenue:           revenue.get(s.id.as_str()).copied().unwrap_or(0.0),
                new_registrations: registrations.get(s.id.as_str()).copied().unwrap_or(0),
                consultations:     consults.get(s.id.as_str()).copied().unwrap_or(0),
            })
            .collect();

        Self::rank(&performances)
    }
}
