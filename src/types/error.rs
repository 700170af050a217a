use thiserror::Error;

/// adchart error types
#[derive(Error, Debug)]
pub enum AdchartError {
    /// Period unit is not one of month/week/day/hour
    #[error("unsupported period unit: {0}")]
    UnsupportedPeriodUnit(String),

    /// Period amount cannot produce a usable duration
    #[error("invalid period amount: {0}")]
    InvalidPeriodAmount(u32),

    /// Metric tag has no store column
    #[error("unsupported metric: {0}")]
    UnsupportedMetric(String),

    /// Source table is unknown or not backed by the metric store
    #[error("unsupported source table: {0}")]
    UnsupportedSourceTable(String),

    /// Segment tag is not device/date
    #[error("unsupported segment: {0}")]
    UnsupportedSegment(String),

    /// Metric store query failed
    #[error("store error: {0}")]
    Store(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a chart definition or store snapshot
    #[error("parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// A per-source task panicked or was cancelled
    #[error("task error: {0}")]
    Task(String),
}

impl AdchartError {
    /// Configuration errors are raised before any store access and are never retried
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedPeriodUnit(_)
                | Self::InvalidPeriodAmount(_)
                | Self::UnsupportedMetric(_)
                | Self::UnsupportedSourceTable(_)
                | Self::UnsupportedSegment(_)
        )
    }
}

/// Result type alias for adchart
pub type Result<T> = std::result::Result<T, AdchartError>;
