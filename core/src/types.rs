//! Shared primitive types used across the statistics engine.

use serde::{Deserialize, Serialize};

/// A stable identifier for a member, staff member or consultation.
pub type EntityId = String;

/// Calendar granularity of a dashboard window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Today,
    Week,
    Month,
    Year,
}

impl Granularity {
    /// Quick-range button order. Never reordered.
    pub const ALL: [Granularity; 4] = [
        Granularity::Today,
        Granularity::Week,
        Granularity::Month,
        Granularity::Year,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week  => "week",
            Self::Month => "month",
            Self::Year  => "year",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" | "day" => Some(Self::Today),
            "week"          => Some(Self::Week),
            "month"         => Some(Self::Month),
            "year"          => Some(Self::Year),
            _               => None,
        }
    }
}
