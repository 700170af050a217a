//! Time bucketing
//!
//! Buckets are aligned to the Unix epoch: a point lands on
//! `floor(epoch_secs / step) * step`. The floored instant is expressed in
//! the point's original UTC offset, so the offset survives bucketing while
//! bucket boundaries stay identical for every source regardless of zone.

use crate::types::DataPoint;
use chrono::{DateTime, Duration, FixedOffset};

/// Floor a timestamp to the start of its `step_secs`-wide bucket
pub fn floor_timestamp(ts: &DateTime<FixedOffset>, step_secs: i64) -> DateTime<FixedOffset> {
    if step_secs <= 0 {
        return *ts;
    }

    let floored = ts.timestamp().div_euclid(step_secs) * step_secs;
    DateTime::from_timestamp(floored, 0)
        .map(|utc| utc.with_timezone(ts.offset()))
        .unwrap_or(*ts)
}

/// Move every point to the start of its granularity bucket.
///
/// Count preserving: merging points that share a bucket is left to the
/// aggregator.
pub fn bucket(points: &[DataPoint], granularity: Duration) -> Vec<DataPoint> {
    let step_secs = granularity.num_seconds();
    points
        .iter()
        .map(|dp| dp.with_timestamp(floor_timestamp(&dp.timestamp, step_secs)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChartMetric, DeviceType, SourceTable};
    use chrono::TimeZone;

    fn at(offset_hours: i32, h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(offset_hours * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 4, 15, h, m, s)
            .unwrap()
    }

    fn point(ts: DateTime<FixedOffset>) -> DataPoint {
        DataPoint {
            source_table: SourceTable::Ad,
            source_id: "A1".into(),
            metric: ChartMetric::Click,
            value: 1.0,
            timestamp: ts,
            device: Some(DeviceType::Tablet),
        }
    }

    #[test]
    fn test_floor_to_hour() {
        let floored = floor_timestamp(&at(0, 10, 59, 59), 3600);
        assert_eq!(floored, at(0, 10, 0, 0));
    }

    #[test]
    fn test_floor_keeps_offset() {
        // 10:45 at +05:30 is 05:15 UTC; the hour bucket starts 05:00 UTC = 10:30 local
        let ts = FixedOffset::east_opt(5 * 3600 + 1800)
            .unwrap()
            .with_ymd_and_hms(2024, 4, 15, 10, 45, 0)
            .unwrap();
        let floored = floor_timestamp(&ts, 3600);
        assert_eq!(floored.offset(), ts.offset());
        assert_eq!(floored.to_rfc3339(), "2024-04-15T10:30:00+05:30");
    }

    #[test]
    fn test_floor_day_is_utc_midnight() {
        let floored = floor_timestamp(&at(-3, 22, 0, 0), 86_400);
        // 22:00-03:00 is 01:00 UTC next day → bucket is 2024-04-16T00:00Z
        assert_eq!(floored.to_rfc3339(), "2024-04-15T21:00:00-03:00");
    }

    #[test]
    fn test_floor_before_epoch() {
        let ts = DateTime::from_timestamp(-1, 0).unwrap().fixed_offset();
        let floored = floor_timestamp(&ts, 3600);
        assert_eq!(floored.timestamp(), -3600);
    }

    #[test]
    fn test_floor_subsecond_dropped() {
        let ts = at(0, 10, 0, 0) + Duration::milliseconds(750);
        assert_eq!(floor_timestamp(&ts, 60), at(0, 10, 0, 0));
    }

    #[test]
    fn test_bucket_preserves_count_and_fields() {
        let points = vec![point(at(0, 10, 0, 0)), point(at(0, 10, 59, 0))];
        let bucketed = bucket(&points, Duration::hours(1));

        assert_eq!(bucketed.len(), points.len());
        for dp in &bucketed {
            assert_eq!(dp.timestamp, at(0, 10, 0, 0));
            assert_eq!(dp.device, Some(DeviceType::Tablet));
            assert_eq!(dp.source_id, "A1");
        }
        // input untouched
        assert_eq!(points[1].timestamp, at(0, 10, 59, 0));
    }

    #[test]
    fn test_bucket_is_idempotent() {
        let points: Vec<DataPoint> = (0..48)
            .map(|i| point(at(0, 0, 0, 0) + Duration::minutes(37 * i)))
            .collect();
        let granularity = Duration::hours(6);
        let once = bucket(&points, granularity);
        let twice = bucket(&once, granularity);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_bucket_empty() {
        assert!(bucket(&[], Duration::hours(1)).is_empty());
    }
}
