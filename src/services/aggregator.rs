//! Aggregator service for collapsing data points onto their identity key

use crate::types::{ChartMetric, DataPoint, DeviceType, SourceTable};
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;

/// Identity of an aggregated point: one output value per distinct key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub source_table: SourceTable,
    pub source_id: String,
    pub timestamp: DateTime<FixedOffset>,
    pub device: Option<DeviceType>,
    pub metric: ChartMetric,
}

impl From<&DataPoint> for SeriesKey {
    fn from(dp: &DataPoint) -> Self {
        Self {
            source_table: dp.source_table,
            source_id: dp.source_id.clone(),
            timestamp: dp.timestamp,
            device: dp.device,
            metric: dp.metric,
        }
    }
}

/// Aggregator for summing bucketed points
pub struct Aggregator;

impl Aggregator {
    /// Sum values of points sharing a [`SeriesKey`].
    ///
    /// Groups come out in first-seen order; callers must not depend on it.
    pub fn aggregate(points: &[DataPoint]) -> Vec<DataPoint> {
        if points.is_empty() {
            return Vec::new();
        }

        let mut index: HashMap<SeriesKey, usize> = HashMap::new();
        let mut result: Vec<DataPoint> = Vec::new();

        for dp in points {
            let key = SeriesKey::from(dp);
            if let Some(&i) = index.get(&key) {
                let summed = result[i].value + dp.value;
                result[i] = result[i].with_value(summed);
            } else {
                index.insert(key, result.len());
                result.push(dp.clone());
            }
        }

        result
    }

    /// Total value across points
    pub fn total(points: &[DataPoint]) -> f64 {
        points.iter().map(|dp| dp.value).sum()
    }
}
