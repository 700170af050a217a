//! In-memory ad metric store
//!
//! Holds ad-level metric rows plus the ad → campaign relation. Campaign
//! queries cover every row of every ad in the campaign.

use super::{MetricColumn, MetricStore, TimeWindow};
use crate::types::{AdchartError, DeviceType, RawObservation, Result, SourceTable};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;

/// One ad metric row. Any column may be missing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricRecord {
    pub ad_id: String,
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub device: Option<DeviceType>,
    pub ctr: Option<f64>,
    pub impressions: Option<f64>,
    pub clicks: Option<f64>,
    pub spend: Option<f64>,
}

impl MetricRecord {
    pub fn value(&self, column: MetricColumn) -> Option<f64> {
        match column {
            MetricColumn::Clicks => self.clicks,
            MetricColumn::Ctr => self.ctr,
            MetricColumn::Impressions => self.impressions,
            MetricColumn::Spend => self.spend,
        }
    }
}

/// Metric store backed by rows held in memory.
///
/// Immutable once built, so it can be shared across tasks behind an `Arc`
/// without locking.
#[derive(Debug, Default)]
pub struct InMemoryMetricStore {
    /// ad id → campaign id
    ads: HashMap<String, String>,
    records: Vec<MetricRecord>,
}

impl InMemoryMetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an ad as belonging to a campaign
    pub fn with_ad(mut self, ad_id: impl Into<String>, campaign_id: impl Into<String>) -> Self {
        self.ads.insert(ad_id.into(), campaign_id.into());
        self
    }

    pub fn with_record(mut self, record: MetricRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn with_records(mut self, records: impl IntoIterator<Item = MetricRecord>) -> Self {
        self.records.extend(records);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows belonging to the source, with their timestamp
    fn scoped<'a>(
        &'a self,
        table: SourceTable,
        source_id: &'a str,
    ) -> Result<impl Iterator<Item = (&'a MetricRecord, DateTime<FixedOffset>)> + 'a> {
        if table == SourceTable::Crm {
            return Err(AdchartError::UnsupportedSourceTable(format!(
                "{} (not backed by ad metrics)",
                table
            )));
        }

        Ok(self.records.iter().filter_map(move |record| {
            let in_scope = match table {
                SourceTable::Ad => record.ad_id == source_id,
                SourceTable::Campaign => self
                    .ads
                    .get(&record.ad_id)
                    .is_some_and(|campaign| campaign == source_id),
                SourceTable::Crm => false,
            };
            if in_scope {
                record.timestamp.map(|ts| (record, ts))
            } else {
                None
            }
        }))
    }
}

#[async_trait]
impl MetricStore for InMemoryMetricStore {
    async fn latest_observation(
        &self,
        table: SourceTable,
        source_id: &str,
    ) -> Result<Option<DateTime<FixedOffset>>> {
        Ok(self.scoped(table, source_id)?.map(|(_, ts)| ts).max())
    }

    async fn fetch_raw(
        &self,
        table: SourceTable,
        source_id: &str,
        column: MetricColumn,
        window: &TimeWindow,
    ) -> Result<Vec<RawObservation>> {
        Ok(self
            .scoped(table, source_id)?
            .filter(|(_, ts)| window.contains(ts))
            .filter_map(|(record, timestamp)| {
                record.value(column).map(|value| RawObservation {
                    timestamp,
                    device: record.device,
                    value,
                })
            })
            .collect())
    }
}
