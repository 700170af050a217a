use crate::config::Config;
use crate::services::ChartDataService;
use crate::store::load_snapshot;
use crate::types::{Chart, ChartDefinition, DataPoint};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Bucketed ad and CRM metric series for charts
#[derive(Parser)]
#[command(name = "adchart")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Logging verbosity (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the series of a chart definition
    Series {
        /// Chart definition file
        #[arg(long)]
        chart: PathBuf,

        /// Metric store snapshot (defaults to the configured store_path)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a chart definition without querying any store
    Validate {
        /// Chart definition file
        #[arg(long)]
        chart: PathBuf,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config = Config::load(self.config.as_deref())?;
        init_logging(self.log_level.as_deref().unwrap_or(&config.log_level));

        match self.command {
            Commands::Series { chart, store, json } => {
                let definition = read_definition(&chart)?;
                let store_path = store
                    .or_else(|| config.store_path.clone())
                    .context("no metric store given: pass --store or set store_path")?;

                let runtime = tokio::runtime::Runtime::new()?;
                let (chart, data) = runtime.block_on(async {
                    let chart = Chart::try_from(&definition)?;
                    let store = load_snapshot(&store_path)?;
                    let service = ChartDataService::new(Arc::new(store))
                        .with_max_concurrent_sources(config.max_concurrent_sources);
                    let data = service.compute_chart_series(&chart).await?;
                    Ok::<_, crate::types::AdchartError>((chart, data))
                })?;

                let data = sort_for_display(&chart, data);
                if json {
                    println!("{}", serde_json::to_string_pretty(&data)?);
                } else if data.is_empty() {
                    println!("No data points in the selected period");
                } else {
                    for dp in &data {
                        println!("{}", format_row(dp));
                    }
                }
                Ok(())
            }
            Commands::Validate { chart } => {
                let definition = read_definition(&chart)?;
                let chart = Chart::try_from(&definition)?;
                println!(
                    "OK: {} source(s), lookback {}, granularity {}",
                    chart.sources.len(),
                    chart.period,
                    chart.granularity
                );
                Ok(())
            }
        }
    }
}

/// Install the stderr log subscriber; `RUST_LOG` wins over `level`
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_definition(path: &Path) -> anyhow::Result<ChartDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read chart definition {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid chart definition {}", path.display()))
}

/// Order by chart source position, then metric, time and device
fn sort_for_display(chart: &Chart, mut data: Vec<DataPoint>) -> Vec<DataPoint> {
    let mut position: HashMap<(crate::types::SourceTable, &str), usize> = HashMap::new();
    for (i, source) in chart.sources.iter().enumerate() {
        position.entry((source.table, source.id.as_str())).or_insert(i);
    }

    data.sort_by_key(|dp| {
        (
            position
                .get(&(dp.source_table, dp.source_id.as_str()))
                .copied()
                .unwrap_or(usize::MAX),
            dp.metric,
            dp.timestamp,
            dp.device,
        )
    });
    data
}

fn format_row(dp: &DataPoint) -> String {
    format!(
        "{}:{}\t{}\t{}\t{}\t{}",
        dp.source_table,
        dp.source_id,
        dp.metric,
        dp.timestamp.to_rfc3339(),
        dp.device.map(|d| d.as_str()).unwrap_or("-"),
        dp.value
    )
}
