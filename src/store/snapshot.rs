//! JSON store snapshots
//!
//! A snapshot is an export of the ad and ad-metric tables:
//!
//! ```json
//! {
//!   "ads": [{"id": "A1", "campaign_id": "C1"}],
//!   "metrics": [{"ad_id": "A1", "date": "2024-05-01T10:00:00Z",
//!                "device": "mobile_app", "clicks": "3", "ctr": 0.02}]
//! }
//! ```

use super::{InMemoryMetricStore, MetricRecord};
use crate::services::normalizer::{parse_device, parse_number, parse_timestamp};
use crate::types::{AdchartError, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdRow {
    pub id: String,
    pub campaign_id: String,
}

/// Ad metric row as exported by the ingestion jobs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMetricRow {
    pub ad_id: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub ctr: Option<Value>,
    #[serde(default)]
    pub impressions: Option<Value>,
    #[serde(default)]
    pub clicks: Option<Value>,
    #[serde(default)]
    pub spend: Option<Value>,
}

impl RawMetricRow {
    /// Normalize into a store record. Rows without a usable timestamp are dropped.
    pub fn into_record(self) -> Option<MetricRecord> {
        let timestamp = self.date.as_deref().and_then(parse_timestamp)?;
        Some(MetricRecord {
            ad_id: self.ad_id,
            timestamp: Some(timestamp),
            device: Some(parse_device(self.device.as_deref().unwrap_or_default())),
            ctr: self.ctr.as_ref().and_then(parse_number),
            impressions: self.impressions.as_ref().and_then(parse_number),
            clicks: self.clicks.as_ref().and_then(parse_number),
            spend: self.spend.as_ref().and_then(parse_number),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricSnapshot {
    #[serde(default)]
    pub ads: Vec<AdRow>,
    #[serde(default)]
    pub metrics: Vec<RawMetricRow>,
}

impl MetricSnapshot {
    pub fn into_store(self) -> InMemoryMetricStore {
        let total = self.metrics.len();
        let records: Vec<MetricRecord> = self
            .metrics
            .into_iter()
            .filter_map(RawMetricRow::into_record)
            .collect();

        let dropped = total - records.len();
        if dropped > 0 {
            warn!(dropped, "skipped metric rows without a parseable date");
        }

        self.ads
            .into_iter()
            .fold(InMemoryMetricStore::new(), |store, ad| {
                store.with_ad(ad.id, ad.campaign_id)
            })
            .with_records(records)
    }
}

/// Read a snapshot file under a shared lock and build a store from it
pub fn load_snapshot(path: &Path) -> Result<InMemoryMetricStore> {
    let file = File::open(path)?;
    file.lock_shared()?;

    let mut content = String::new();
    let read = std::io::BufReader::new(&file).read_to_string(&mut content);
    let _ = file.unlock();
    read?;

    let snapshot: MetricSnapshot = serde_json::from_str(&content)
        .map_err(|e| AdchartError::Parse(format!("{}: {}", path.display(), e)))?;

    let store = snapshot.into_store();
    debug!(path = %path.display(), rows = store.len(), "loaded metric snapshot");
    Ok(store)
}
