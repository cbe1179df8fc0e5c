//! Input records supplied by the persistence layer.
//!
//! Records are read-only. Date and amount fields stay raw
//! (`Option<String>` / `Option<f64>`) so one malformed row is
//! skipped at aggregation time instead of failing the whole load.

use crate::{
    error::{StatsError, StatsResult},
    types::EntityId,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Completed,
    Pending,
    Cancelled,
    Refunded,
    #[default]
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending   => "pending",
            Self::Cancelled => "cancelled",
            Self::Refunded  => "refunded",
            Self::Unknown   => "unknown",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "completed" => Some(Self::Completed),
            "pending"   => Some(Self::Pending),
            "cancelled" => Some(Self::Cancelled),
            "refunded"  => Some(Self::Refunded),
            _           => None,
        }
    }
}

/// Status selection from the dashboard filter dropdown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Only(PaymentStatus),
}

impl StatusFilter {
    /// `"all"` or one of the payment status names.
    pub fn parse(s: &str) -> StatsResult<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        PaymentStatus::parse(s)
            .map(Self::Only)
            .ok_or_else(|| StatsError::UnknownStatus(s.to_string()))
    }

    pub fn matches(&self, status: PaymentStatus) -> bool {
        match self {
            Self::All       => true,
            Self::Only(s)   => *s == status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount:    Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date:      Option<String>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status:    PaymentStatus,
    /// Staff member credited with the sale.
    #[serde(default, deserialize_with = "lenient_id")]
    pub entity_id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub member_id: Option<EntityId>,
}

impl TransactionRecord {
    /// The amount, if present and finite.
    pub fn valid_amount(&self) -> Option<f64> {
        self.amount.filter(|a| a.is_finite())
    }

    pub fn date_str(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MembershipRecord {
    pub member_id:      EntityId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub join_date:      Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub membership_end: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub staff_id:       Option<EntityId>,
}

impl MembershipRecord {
    pub fn join_date_str(&self) -> Option<&str> {
        self.join_date.as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaffRecord {
    pub id:       EntityId,
    pub name:     String,
    pub position: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsultationRecord {
    pub id:       EntityId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date:     Option<String>,
    /// Raw status text; values outside ConsultationStatus are tolerated.
    #[serde(default, deserialize_with = "lenient_text")]
    pub status:   Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub staff_id: Option<EntityId>,
}

impl ConsultationRecord {
    pub fn date_str(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn parsed_status(&self) -> Option<ConsultationStatus> {
        self.status.as_deref().and_then(ConsultationStatus::parse)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationStatus {
    Pending,
    InProgress,
    Completed,
    FollowUp,
}

impl ConsultationStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "pending"     => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed"   => Some(Self::Completed),
            "follow_up"   => Some(Self::FollowUp),
            _             => None,
        }
    }
}

// ── Lenient field readers ────────────────────────────────────────────────────
//
// A wrongly typed row field reads as absent instead of failing the load.
// The aggregation pass then skips and counts the row.

fn lenient_amount<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.and_then(|v| v.as_f64()).filter(|a| a.is_finite()))
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Ids may arrive as strings or plain numbers.
fn lenient_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<EntityId>, D::Error> {
    match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        _ => Ok(None),
    }
}

fn lenient_status<'de, D: Deserializer<'de>>(d: D) -> Result<PaymentStatus, D::Error> {
    Ok(lenient_text(d)?
        .as_deref()
        .and_then(PaymentStatus::parse)
        .unwrap_or_default())
}

/// Everything one dashboard build reads. Owned by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub transactions:  Vec<TransactionRecord>,
    #[serde(default)]
    pub memberships:   Vec<MembershipRecord>,
    #[serde(default)]
    pub staff:         Vec<StaffRecord>,
    #[serde(default)]
    pub consultations: Vec<ConsultationRecord>,
}

impl Dataset {
    /// Read a JSON dump of the record collections.
    pub fn load(path: &str) -> StatsResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let dataset: Dataset = serde_json::from_str(&content)?;
        log::debug!(
            "loaded dataset {path}: {} transactions, {} memberships, {} staff, {} consultations",
            dataset.transactions.len(),
            dataset.memberships.len(),
            dataset.staff.len(),
            dataset.consultations.len(),
        );
        Ok(dataset)
    }
}
