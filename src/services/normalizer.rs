//! Raw metric value normalization
//!
//! Ad platforms report devices as free-form strings ("mobile_app",
//! "desktop_web", ...) and numbers as either JSON numbers or strings.
//! These helpers map them onto the typed store representation.

use crate::types::DeviceType;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Map a platform device string onto a [`DeviceType`].
///
/// # Examples
/// ```
/// use adchart::services::normalizer::parse_device;
/// use adchart::types::DeviceType;
///
/// assert_eq!(parse_device("mobile_app"), DeviceType::Mobile);
/// assert_eq!(parse_device("connected_tv"), DeviceType::Other);
/// ```
pub fn parse_device(raw: &str) -> DeviceType {
    let lowered = raw.to_ascii_lowercase();
    if lowered.contains("mobile") {
        DeviceType::Mobile
    } else if lowered.contains("desktop") {
        DeviceType::Desktop
    } else if lowered.contains("tablet") {
        DeviceType::Tablet
    } else {
        DeviceType::Other
    }
}

/// Number or numeric string → f64. Anything else is treated as missing.
pub fn parse_number(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Parse an RFC 3339 timestamp, or a naive date/datetime taken as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }

    const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    Some(naive.and_utc().fixed_offset())
}
