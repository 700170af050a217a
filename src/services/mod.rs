//! Services for windowing, bucketing and aggregating chart series

pub mod aggregator;
pub mod bucketer;
pub mod chart_data;
pub mod duration;
pub mod normalizer;
pub mod segmenter;
pub mod series;
pub mod window;

pub use aggregator::{Aggregator, SeriesKey};
pub use chart_data::ChartDataService;
pub use duration::resolve_duration;
pub use series::{series_for_metric, series_for_source, SeriesQuery};
pub use window::resolve_window;
