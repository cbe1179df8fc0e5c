//! gymdesk-core: statistics and KPI engine for the gym back office.
//!
//! Pure, synchronous functions over caller-owned record collections.
//! Date windows come from `date_range` / `quick_range`, records are
//! scoped by `period_filter`, and `metrics`, `ranking` and `summary`
//! turn them into dashboard figures. `dashboard` wires it all together.

pub mod clock;
pub mod config;
pub mod dashboard;
pub mod date_range;
pub mod error;
pub mod metrics;
pub mod period_filter;
pub mod quick_range;
pub mod ranking;
pub mod records;
pub mod summary;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::StatsConfig;
pub use dashboard::{Dashboard, DashboardSnapshot};
pub use date_range::{DateRange, DateRangeCalculator};
pub use error::{StatsError, StatsResult};
pub use metrics::{MetricsAggregator, PeriodMetrics};
pub use period_filter::PeriodFilter;
pub use quick_range::QuickRangeNavigator;
pub use ranking::{CompositeScore, EntityScoreRanker};
pub use records::{Dataset, StatusFilter};
pub use summary::{CategoricalSummary, StatisticsSummarizer};
pub use types::Granularity;
