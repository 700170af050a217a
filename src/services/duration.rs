//! Period → duration conversion

use crate::types::{AdchartError, Period, PeriodUnit, Result};
use chrono::Duration;

/// Days in a chart "month". Fixed so historical charts stay reproducible.
pub const DAYS_PER_MONTH: i64 = 30;

/// Convert a period into a concrete duration.
///
/// A month is always `30 * amount` days, never calendar months.
pub fn resolve_duration(period: &Period) -> Result<Duration> {
    if period.amount == 0 {
        return Err(AdchartError::InvalidPeriodAmount(period.amount));
    }

    let amount = i64::from(period.amount);
    let duration = match period.unit {
        PeriodUnit::Month => Duration::try_days(DAYS_PER_MONTH * amount),
        PeriodUnit::Week => Duration::try_weeks(amount),
        PeriodUnit::Day => Duration::try_days(amount),
        PeriodUnit::Hour => Duration::try_hours(amount),
    };

    duration.ok_or(AdchartError::InvalidPeriodAmount(period.amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_is_thirty_days() {
        let d = resolve_duration(&Period::months(1)).unwrap();
        assert_eq!(d.num_seconds(), 30 * 86_400);

        let d = resolve_duration(&Period::months(3)).unwrap();
        assert_eq!(d.num_days(), 90);
    }

    #[test]
    fn test_week_day_hour() {
        assert_eq!(resolve_duration(&Period::weeks(2)).unwrap().num_days(), 14);
        assert_eq!(resolve_duration(&Period::days(7)).unwrap().num_hours(), 168);
        assert_eq!(resolve_duration(&Period::hours(1)).unwrap().num_seconds(), 3600);
    }

    #[test]
    fn test_zero_amount_rejected() {
        let err = resolve_duration(&Period::days(0)).unwrap_err();
        assert!(matches!(err, AdchartError::InvalidPeriodAmount(0)));
    }

    #[test]
    fn test_overflowing_amount_rejected() {
        let err = resolve_duration(&Period::months(u32::MAX)).unwrap_err();
        assert!(matches!(err, AdchartError::InvalidPeriodAmount(_)));
    }
}
