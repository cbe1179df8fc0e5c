use crate::types::Granularity;
use serde::{Deserialize, Serialize};

/// Dashboard tuning. Scoring caps and coefficients are NOT here;
/// they live as constants in ranking.rs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsConfig {
    /// Memberships ending within this many days of today are "expiring soon".
    #[serde(default = "default_expiring_soon_days")]
    pub expiring_soon_days: u32,
    /// Keep only the top N staff in the ranking. `None` keeps everyone.
    #[serde(default)]
    pub ranking_limit: Option<usize>,
    /// Window used when the caller does not pick one.
    #[serde(default = "default_granularity")]
    pub default_granularity: Granularity,
}

fn default_expiring_soon_days() -> u32 {
    7
}

fn default_granularity() -> Granularity {
    Granularity::Month
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            expiring_soon_days:  default_expiring_soon_days(),
            ranking_limit:       None,
            default_granularity: default_granularity(),
        }
    }
}

impl StatsConfig {
    /// Load from a JSON file. Missing keys fall back to defaults.
    /// In tests, use StatsConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: StatsConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        log::debug!("loaded stats config from {path}: {config:?}");
        Ok(config)
    }

    /// Config with hardcoded values for use in tests.
    pub fn default_test() -> Self {
        Self {
            expiring_soon_days:  7,
            ranking_limit:       Some(10),
            default_granularity: Granularity::Month,
        }
    }
}
