//! Chart-level series computation
//!
//! Every source of a chart runs as its own tokio task. Results are stitched
//! back together in source order. The first failing source aborts all of its
//! siblings and the whole chart fails; there is no partial result.

use crate::services::series::{series_for_source, SeriesQuery};
use crate::store::MetricStore;
use crate::types::{AdchartError, Chart, ChartDefinition, DataPoint, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Default cap on sources querying the store at the same time
pub const DEFAULT_MAX_CONCURRENT_SOURCES: usize = 8;

/// Computes chart series against a shared metric store
pub struct ChartDataService {
    store: Arc<dyn MetricStore>,
    max_concurrent_sources: usize,
}

impl ChartDataService {
    pub fn new(store: Arc<dyn MetricStore>) -> Self {
        Self {
            store,
            max_concurrent_sources: DEFAULT_MAX_CONCURRENT_SOURCES,
        }
    }

    /// Limit how many source tasks query the store at once (minimum 1)
    pub fn with_max_concurrent_sources(mut self, limit: usize) -> Self {
        self.max_concurrent_sources = limit.max(1);
        self
    }

    /// Resolve a raw definition, then compute its series.
    ///
    /// Invalid tags fail here, before the store is touched.
    pub async fn compute_definition(&self, definition: &ChartDefinition) -> Result<Vec<DataPoint>> {
        let chart = Chart::try_from(definition)?;
        self.compute_chart_series(&chart).await
    }

    /// Compute the series of every source of the chart.
    ///
    /// Output is grouped by source in `chart.sources` order; order within a
    /// source is unspecified. Dropping the returned future aborts all
    /// in-flight source tasks.
    pub async fn compute_chart_series(&self, chart: &Chart) -> Result<Vec<DataPoint>> {
        let started = Instant::now();
        let permits = Arc::new(Semaphore::new(self.max_concurrent_sources));
        let mut tasks: JoinSet<Result<(usize, Vec<DataPoint>)>> = JoinSet::new();

        for (index, source) in chart.sources.iter().cloned().enumerate() {
            let store = Arc::clone(&self.store);
            let permits = Arc::clone(&permits);
            let (period, granularity, segment) = (chart.period, chart.granularity, chart.segment);

            tasks.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| AdchartError::Task(e.to_string()))?;
                let query = SeriesQuery::for_source(&source, period, granularity, segment);
                let points = series_for_source(store.as_ref(), &query, &source.metrics).await?;
                Ok((index, points))
            });
        }

        let mut per_source: Vec<Vec<DataPoint>> = vec![Vec::new(); chart.sources.len()];

        while let Some(joined) = tasks.join_next().await {
            let outcome = joined
                .map_err(|e| AdchartError::Task(e.to_string()))
                .and_then(|result| result);

            match outcome {
                Ok((index, points)) => per_source[index] = points,
                Err(e) => {
                    tasks.abort_all();
                    warn!(error = %e, "source failed, aborting chart");
                    return Err(e);
                }
            }
        }

        let data: Vec<DataPoint> = per_source.into_iter().flatten().collect();
        info!(
            sources = chart.sources.len(),
            points = data.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "computed chart series"
        );
        Ok(data)
    }
}
