//! Device segmentation

use crate::types::{ChartSegment, DataPoint};

/// Keep the device dimension only when the chart is segmented by device
pub fn segment(points: &[DataPoint], mode: Option<ChartSegment>) -> Vec<DataPoint> {
    match mode {
        Some(ChartSegment::Device) => points.to_vec(),
        Some(ChartSegment::Date) | None => points.iter().map(|dp| dp.with_device(None)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChartMetric, DeviceType, SourceTable};
    use chrono::{FixedOffset, TimeZone};

    fn points() -> Vec<DataPoint> {
        let ts = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .unwrap();
        [DeviceType::Mobile, DeviceType::Desktop, DeviceType::Other]
            .into_iter()
            .map(|device| DataPoint {
                source_table: SourceTable::Campaign,
                source_id: "C1".into(),
                metric: ChartMetric::Impression,
                value: 10.0,
                timestamp: ts,
                device: Some(device),
            })
            .collect()
    }

    #[test]
    fn test_segment_by_device_is_identity() {
        let input = points();
        assert_eq!(segment(&input, Some(ChartSegment::Device)), input);
    }

    #[test]
    fn test_segment_by_date_strips_device() {
        let out = segment(&points(), Some(ChartSegment::Date));
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|dp| dp.device.is_none()));
    }

    #[test]
    fn test_no_segment_strips_device() {
        let out = segment(&points(), None);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|dp| dp.device.is_none()));
    }
}
