//! Metric store abstraction and implementations

mod memory;
mod snapshot;

pub use memory::{InMemoryMetricStore, MetricRecord};
pub use snapshot::{load_snapshot, AdRow, MetricSnapshot, RawMetricRow};

use crate::types::{ChartMetric, RawObservation, Result, SourceTable};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use std::fmt;

/// Store column holding the values of a chart metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricColumn {
    Clicks,
    Ctr,
    Impressions,
    Spend,
}

impl MetricColumn {
    pub fn for_metric(metric: ChartMetric) -> Self {
        match metric {
            ChartMetric::Click => Self::Clicks,
            ChartMetric::Ctr => Self::Ctr,
            ChartMetric::Impression => Self::Impressions,
            ChartMetric::Spend => Self::Spend,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Clicks => "clicks",
            Self::Ctr => "ctr",
            Self::Impressions => "impressions",
            Self::Spend => "spend",
        }
    }
}

impl fmt::Display for MetricColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Closed time range `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeWindow {
    pub fn contains(&self, ts: &DateTime<FixedOffset>) -> bool {
        *ts >= self.start && *ts <= self.end
    }
}

/// Source of raw metric observations.
///
/// Implementations are shared by every per-source task of a chart and must
/// tolerate concurrent calls.
#[async_trait]
pub trait MetricStore: Send + Sync {
    /// Timestamp of the most recent observation for the source, if any
    async fn latest_observation(
        &self,
        table: SourceTable,
        source_id: &str,
    ) -> Result<Option<DateTime<FixedOffset>>>;

    /// Observations of one column for the source within `window`
    async fn fetch_raw(
        &self,
        table: SourceTable,
        source_id: &str,
        column: MetricColumn,
        window: &TimeWindow,
    ) -> Result<Vec<RawObservation>>;
}
