//! adchart: windowing, bucketing and aggregation of ad and CRM metric series
//!
//! The entry point is [`services::ChartDataService`], which turns a
//! [`types::Chart`] into a flat list of [`types::DataPoint`]s read from a
//! [`store::MetricStore`].

pub mod cli;
pub mod config;
pub mod services;
pub mod store;
pub mod types;
