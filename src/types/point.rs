//! Data point types flowing through the series pipeline

use super::{ChartMetric, SourceTable};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Device an observation was recorded on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Desktop,
    Tablet,
    Other,
}

impl DeviceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Desktop => "desktop",
            Self::Tablet => "tablet",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `(timestamp, device, value)` row returned by the metric store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub timestamp: DateTime<FixedOffset>,
    pub device: Option<DeviceType>,
    pub value: f64,
}

/// One value of one metric for one source at one instant.
///
/// Pipeline stages never mutate a point; they build a new one through the
/// `with_*` constructors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub source_table: SourceTable,
    pub source_id: String,
    pub metric: ChartMetric,
    pub value: f64,
    pub timestamp: DateTime<FixedOffset>,
    pub device: Option<DeviceType>,
}

impl DataPoint {
    /// Tag a raw store row with the source and metric it was fetched for
    pub fn from_observation(
        source_table: SourceTable,
        source_id: &str,
        metric: ChartMetric,
        observation: RawObservation,
    ) -> Self {
        Self {
            source_table,
            source_id: source_id.to_string(),
            metric,
            value: observation.value,
            timestamp: observation.timestamp,
            device: observation.device,
        }
    }

    pub fn with_timestamp(&self, timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            timestamp,
            ..self.clone()
        }
    }

    pub fn with_device(&self, device: Option<DeviceType>) -> Self {
        Self {
            device,
            ..self.clone()
        }
    }

    pub fn with_value(&self, value: f64) -> Self {
        Self {
            value,
            ..self.clone()
        }
    }
}
