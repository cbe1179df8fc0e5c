//! Bucketed counts over a closed set of categories.
//!
//! `total` is the full collection length. Records whose category is
//! missing or unrecognised land in no bucket but still count toward
//! `total`, so bucket percentages can sum to less than 100.

use crate::records::{ConsultationRecord, ConsultationStatus, PaymentStatus, TransactionRecord};
use serde::{Deserialize, Serialize};

/// A closed enumeration usable as summary buckets.
pub trait Category: Copy + Eq + 'static {
    /// Every bucket, in display order.
    const ALL: &'static [Self];

    fn label(&self) -> &'static str;
}

impl Category for ConsultationStatus {
    const ALL: &'static [Self] = &[
        ConsultationStatus::Pending,
        ConsultationStatus::InProgress,
        ConsultationStatus::Completed,
        ConsultationStatus::FollowUp,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::Pending    => "pending",
            Self::InProgress => "in_progress",
            Self::Completed  => "completed",
            Self::FollowUp   => "follow_up",
        }
    }
}

impl Category for PaymentStatus {
    const ALL: &'static [Self] = &[
        PaymentStatus::Completed,
        PaymentStatus::Pending,
        PaymentStatus::Cancelled,
        PaymentStatus::Refunded,
    ];

    fn label(&self) -> &'static str {
        self.name()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBucket {
    pub category: String,
    pub count:    u64,
    pub percent:  f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalSummary {
    pub total:   u64,
    pub buckets: Vec<CategoryBucket>,
}

impl CategoricalSummary {
    pub fn get(&self, category: &str) -> Option<&CategoryBucket> {
        self.buckets.iter().find(|b| b.category == category)
    }

    pub fn count(&self, category: &str) -> u64 {
        self.get(category).map_or(0, |b| b.count)
    }

    pub fn percent(&self, category: &str) -> f64 {
        self.get(category).map_or(0.0, |b| b.percent)
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn known_payment_status(txn: &TransactionRecord) -> Option<PaymentStatus> {
    match txn.status {
        PaymentStatus::Unknown => None,
        status => Some(status),
    }
}

pub struct StatisticsSummarizer;

impl StatisticsSummarizer {
    pub fn summarize<'a, T, I, C, F>(records: I, category_of: F) -> CategoricalSummary
    where
        T: 'a,
        I: IntoIterator<Item = &'a T>,
        C: Category,
        F: Fn(&T) -> Option<C>,
    {
        let mut counts = vec![0u64; C::ALL.len()];
        let mut total = 0u64;
        for record in records {
            total += 1;
            if let Some(category) = category_of(record) {
                if let Some(idx) = C::ALL.iter().position(|c| *c == category) {
                    counts[idx] += 1;
                }
            }
        }

        let buckets = C::ALL
            .iter()
            .zip(counts)
            .map(|(category, count)| CategoryBucket {
                category: category.label().to_string(),
                count,
                percent: if total > 0 {
                    round1(count as f64 / total as f64 * 100.0)
                } else {
                    0.0
                },
            })
            .collect();

        CategoricalSummary { total, buckets }
    }

    pub fn consultation_status<'a, I>(consultations: I) -> CategoricalSummary
    where
        I: IntoIterator<Item = &'a ConsultationRecord>,
    {
        Self::summarize(consultations, ConsultationRecord::parsed_status)
    }

    pub fn payment_status<'a, I>(transactions: I) -> CategoricalSummary
    where
        I: IntoIterator<Item = &'a TransactionRecord>,
    {
        Self::summarize(transactions, known_payment_status)
    }
}
