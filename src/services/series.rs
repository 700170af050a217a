//! Per-source series computation
//!
//! For each requested metric: resolve the data-anchored window, fetch the
//! metric's column, bucket, segment and aggregate.

use crate::services::bucketer::bucket;
use crate::services::duration::resolve_duration;
use crate::services::segmenter::segment;
use crate::services::window::resolve_window;
use crate::services::Aggregator;
use crate::store::{MetricColumn, MetricStore};
use crate::types::{ChartMetric, ChartSegment, DataPoint, Period, Result, Source, SourceTable};
use tracing::debug;

/// Everything needed to compute one source's series, minus the metric
#[derive(Debug, Clone, Copy)]
pub struct SeriesQuery<'a> {
    pub table: SourceTable,
    pub source_id: &'a str,
    /// Lookback
    pub period: Period,
    /// Bucket size
    pub granularity: Period,
    pub segment: Option<ChartSegment>,
}

impl<'a> SeriesQuery<'a> {
    pub fn for_source(
        source: &'a Source,
        period: Period,
        granularity: Period,
        segment: Option<ChartSegment>,
    ) -> Self {
        Self {
            table: source.table,
            source_id: &source.id,
            period,
            granularity,
            segment,
        }
    }
}

/// Compute the aggregated series of a single metric for a source.
///
/// A source with no observations yields an empty series.
pub async fn series_for_metric(
    store: &dyn MetricStore,
    query: &SeriesQuery<'_>,
    metric: ChartMetric,
) -> Result<Vec<DataPoint>> {
    let column = MetricColumn::for_metric(metric);
    let lookback = resolve_duration(&query.period)?;
    let granularity = resolve_duration(&query.granularity)?;

    let Some(window) = resolve_window(store, query.table, query.source_id, lookback).await? else {
        debug!(
            table = %query.table,
            source_id = query.source_id,
            "no observations for source"
        );
        return Ok(Vec::new());
    };

    let raw = store
        .fetch_raw(query.table, query.source_id, column, &window)
        .await?;
    let fetched = raw.len();

    let points: Vec<DataPoint> = raw
        .into_iter()
        .map(|obs| DataPoint::from_observation(query.table, query.source_id, metric, obs))
        .collect();

    let bucketed = bucket(&points, granularity);
    let segmented = segment(&bucketed, query.segment);
    let aggregated = Aggregator::aggregate(&segmented);

    debug!(
        table = %query.table,
        source_id = query.source_id,
        %column,
        fetched,
        points = aggregated.len(),
        "computed metric series"
    );

    Ok(aggregated)
}

/// Compute every requested metric for a source, one after another
pub async fn series_for_source(
    store: &dyn MetricStore,
    query: &SeriesQuery<'_>,
    metrics: &[ChartMetric],
) -> Result<Vec<DataPoint>> {
    let mut data = Vec::new();
    for &metric in metrics {
        data.extend(series_for_metric(store, query, metric).await?);
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryMetricStore, MetricRecord};
    use crate::types::{AdchartError, DeviceType};
    use chrono::{DateTime, FixedOffset, TimeZone};

    fn at(day: u32, h: u32, m: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 7, day, h, m, 0)
            .unwrap()
    }

    fn row(ad: &str, ts: DateTime<FixedOffset>, device: DeviceType, clicks: f64) -> MetricRecord {
        MetricRecord {
            ad_id: ad.into(),
            timestamp: Some(ts),
            device: Some(device),
            clicks: Some(clicks),
            spend: Some(clicks * 2.0),
            ..Default::default()
        }
    }

    fn query(source_id: &str, segment: Option<ChartSegment>) -> SeriesQuery<'_> {
        SeriesQuery {
            table: SourceTable::Ad,
            source_id,
            period: Period::days(7),
            granularity: Period::hours(1),
            segment,
        }
    }

    #[tokio::test]
    async fn test_same_hour_rows_collapse() {
        let store = InMemoryMetricStore::new()
            .with_record(row("A1", at(10, 10, 0), DeviceType::Mobile, 3.0))
            .with_record(row("A1", at(10, 10, 59), DeviceType::Desktop, 4.0));

        let result = series_for_metric(
            &store,
            &query("A1", Some(ChartSegment::Date)),
            ChartMetric::Click,
        )
        .await
        .unwrap();

        assert_eq!(result.len(), 1);
        assert!((result[0].value - 7.0).abs() < f64::EPSILON);
        assert_eq!(result[0].timestamp, at(10, 10, 0));
        assert!(result[0].device.is_none());
        assert_eq!(result[0].metric, ChartMetric::Click);
    }

    #[tokio::test]
    async fn test_device_segment_keeps_devices() {
        let store = InMemoryMetricStore::new()
            .with_record(row("A1", at(10, 10, 5), DeviceType::Mobile, 3.0))
            .with_record(row("A1", at(10, 10, 15), DeviceType::Mobile, 1.0))
            .with_record(row("A1", at(10, 10, 59), DeviceType::Desktop, 4.0));

        let result = series_for_metric(
            &store,
            &query("A1", Some(ChartSegment::Device)),
            ChartMetric::Click,
        )
        .await
        .unwrap();

        assert_eq!(result.len(), 2);
        let mobile = result
            .iter()
            .find(|dp| dp.device == Some(DeviceType::Mobile))
            .unwrap();
        assert!((mobile.value - 4.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_lookback_excludes_old_rows() {
        let store = InMemoryMetricStore::new()
            .with_record(row("A1", at(1, 9, 0), DeviceType::Mobile, 100.0))
            .with_record(row("A1", at(10, 9, 0), DeviceType::Mobile, 1.0))
            .with_record(row("A1", at(3, 9, 0), DeviceType::Mobile, 2.0));

        let result = series_for_metric(&store, &query("A1", None), ChartMetric::Click)
            .await
            .unwrap();

        // latest is day 10 09:00; 7 days back is day 3 09:00, inclusive
        assert_eq!(result.len(), 2);
        assert!((Aggregator::total(&result) - 3.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_no_data_is_empty() {
        let store = InMemoryMetricStore::new();
        let result = series_for_metric(&store, &query("A1", None), ChartMetric::Spend)
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_granularity_fails_before_store() {
        let store = InMemoryMetricStore::new().with_record(row("A1", at(10, 9, 0), DeviceType::Mobile, 1.0));
        let mut q = query("A1", None);
        q.granularity = Period::hours(0);

        let err = series_for_metric(&store, &q, ChartMetric::Click)
            .await
            .unwrap_err();
        assert!(matches!(err, AdchartError::InvalidPeriodAmount(0)));
    }

    #[tokio::test]
    async fn test_series_for_source_concatenates_metrics() {
        let store = InMemoryMetricStore::new()
            .with_record(row("A1", at(10, 9, 0), DeviceType::Mobile, 1.0))
            .with_record(row("A1", at(10, 12, 0), DeviceType::Tablet, 2.0));

        let result = series_for_source(
            &store,
            &query("A1", None),
            &[ChartMetric::Click, ChartMetric::Spend],
        )
        .await
        .unwrap();

        assert_eq!(result.len(), 4);
        assert!(result[..2].iter().all(|dp| dp.metric == ChartMetric::Click));
        assert!(result[2..].iter().all(|dp| dp.metric == ChartMetric::Spend));
        let spend: f64 = result[2..].iter().map(|dp| dp.value).sum();
        assert!((spend - 6.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_campaign_scope_keeps_campaign_id() {
        let store = InMemoryMetricStore::new()
            .with_ad("A1", "C1")
            .with_ad("A2", "C1")
            .with_record(row("A1", at(10, 9, 10), DeviceType::Mobile, 1.0))
            .with_record(row("A2", at(10, 9, 20), DeviceType::Desktop, 2.0));

        let q = SeriesQuery {
            table: SourceTable::Campaign,
            ..query("C1", None)
        };
        let result = series_for_metric(&store, &q, ChartMetric::Click)
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].source_table, SourceTable::Campaign);
        assert_eq!(result[0].source_id, "C1");
        assert!((result[0].value - 3.0).abs() < f64::EPSILON);
    }
}
