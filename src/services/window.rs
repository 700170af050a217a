//! Fetch window resolution
//!
//! The window ends at the source's most recent observation, not at the
//! current time, so an unchanged store always yields the same window.

use crate::store::{MetricStore, TimeWindow};
use crate::types::{Result, SourceTable};
use chrono::{DateTime, Duration, Utc};

/// Resolve `[latest - lookback, latest]` for a source.
///
/// Returns `Ok(None)` when the source has no observations.
pub async fn resolve_window(
    store: &dyn MetricStore,
    table: SourceTable,
    source_id: &str,
    lookback: Duration,
) -> Result<Option<TimeWindow>> {
    let Some(latest) = store.latest_observation(table, source_id).await? else {
        return Ok(None);
    };

    // Lookbacks reaching past chrono's range open the window fully.
    let start = latest
        .checked_sub_signed(lookback)
        .unwrap_or_else(|| DateTime::<Utc>::MIN_UTC.fixed_offset());

    Ok(Some(TimeWindow { start, end: latest }))
}
