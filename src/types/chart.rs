//! Chart definition types: periods, sources and the metrics they expose

use super::{AdchartError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit of a lookback period or bucket granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    Month,
    Week,
    Day,
    Hour,
}

impl PeriodUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
            Self::Hour => "hour",
        }
    }
}

impl FromStr for PeriodUnit {
    type Err = AdchartError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(Self::Month),
            "week" => Ok(Self::Week),
            "day" => Ok(Self::Day),
            "hour" => Ok(Self::Hour),
            _ => Err(AdchartError::UnsupportedPeriodUnit(s.to_string())),
        }
    }
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (unit, amount) period, e.g. "7 days" or "1 hour"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub unit: PeriodUnit,
    pub amount: u32,
}

impl Period {
    pub const fn new(unit: PeriodUnit, amount: u32) -> Self {
        Self { unit, amount }
    }

    pub const fn months(amount: u32) -> Self {
        Self::new(PeriodUnit::Month, amount)
    }

    pub const fn weeks(amount: u32) -> Self {
        Self::new(PeriodUnit::Week, amount)
    }

    pub const fn days(amount: u32) -> Self {
        Self::new(PeriodUnit::Day, amount)
    }

    pub const fn hours(amount: u32) -> Self {
        Self::new(PeriodUnit::Hour, amount)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.unit)
    }
}

/// Kind of entity whose metrics are charted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTable {
    Campaign,
    Ad,
    Crm,
}

impl SourceTable {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Campaign => "campaign",
            Self::Ad => "ad",
            Self::Crm => "crm",
        }
    }
}

impl FromStr for SourceTable {
    type Err = AdchartError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "campaign" => Ok(Self::Campaign),
            "ad" => Ok(Self::Ad),
            "crm" => Ok(Self::Crm),
            _ => Err(AdchartError::UnsupportedSourceTable(s.to_string())),
        }
    }
}

impl fmt::Display for SourceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metric plotted for a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMetric {
    Ctr,
    Click,
    Impression,
    Spend,
}

impl ChartMetric {
    pub const ALL: [ChartMetric; 4] = [Self::Ctr, Self::Click, Self::Impression, Self::Spend];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ctr => "ctr",
            Self::Click => "click",
            Self::Impression => "impression",
            Self::Spend => "spend",
        }
    }
}

impl FromStr for ChartMetric {
    type Err = AdchartError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ctr" => Ok(Self::Ctr),
            "click" => Ok(Self::Click),
            "impression" => Ok(Self::Impression),
            "spend" => Ok(Self::Spend),
            _ => Err(AdchartError::UnsupportedMetric(s.to_string())),
        }
    }
}

impl fmt::Display for ChartMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a chart splits its series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartSegment {
    Device,
    Date,
}

impl FromStr for ChartSegment {
    type Err = AdchartError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "device" => Ok(Self::Device),
            "date" => Ok(Self::Date),
            _ => Err(AdchartError::UnsupportedSegment(s.to_string())),
        }
    }
}

/// One charted entity and the metrics requested for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub table: SourceTable,
    pub id: String,
    pub metrics: Vec<ChartMetric>,
}

impl Source {
    pub fn new(table: SourceTable, id: impl Into<String>, metrics: Vec<ChartMetric>) -> Self {
        Self {
            table,
            id: id.into(),
            metrics,
        }
    }
}

/// A resolved chart: what to fetch, how far back, and how to bucket it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub sources: Vec<Source>,
    /// Lookback window size, measured back from each source's latest observation
    pub period: Period,
    /// Bucket size
    pub granularity: Period,
    pub segment: Option<ChartSegment>,
}

/// Raw period as stored by the chart editor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodDefinition {
    #[serde(rename = "type")]
    pub unit: String,
    pub amount: u32,
}

/// Raw source as stored by the chart editor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDefinition {
    pub source_table: String,
    pub source_id: String,
    pub metrics: Vec<String>,
}

/// Chart definition with untyped tags, as handed over by the chart editor.
///
/// Converting into a [`Chart`] validates every tag, so a bad unit, table,
/// metric or segment is reported before any store query runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartDefinition {
    pub sources: Vec<SourceDefinition>,
    pub period: PeriodDefinition,
    pub granularity: PeriodDefinition,
    #[serde(default)]
    pub segment: Option<String>,
}

impl TryFrom<&PeriodDefinition> for Period {
    type Error = AdchartError;

    fn try_from(def: &PeriodDefinition) -> Result<Self> {
        Ok(Period::new(def.unit.parse()?, def.amount))
    }
}

impl TryFrom<&SourceDefinition> for Source {
    type Error = AdchartError;

    fn try_from(def: &SourceDefinition) -> Result<Self> {
        if def.metrics.is_empty() {
            return Err(AdchartError::Parse(format!(
                "source {}:{} requests no metrics",
                def.source_table, def.source_id
            )));
        }

        let mut metrics: Vec<ChartMetric> = Vec::with_capacity(def.metrics.len());
        for tag in &def.metrics {
            let metric: ChartMetric = tag.parse()?;
            if !metrics.contains(&metric) {
                metrics.push(metric);
            }
        }

        Ok(Source {
            table: def.source_table.parse()?,
            id: def.source_id.clone(),
            metrics,
        })
    }
}

impl TryFrom<&ChartDefinition> for Chart {
    type Error = AdchartError;

    fn try_from(def: &ChartDefinition) -> Result<Self> {
        let sources = def
            .sources
            .iter()
            .map(Source::try_from)
            .collect::<Result<Vec<_>>>()?;

        let segment = def
            .segment
            .as_deref()
            .map(ChartSegment::from_str)
            .transpose()?;

        Ok(Chart {
            sources,
            period: Period::try_from(&def.period)?,
            granularity: Period::try_from(&def.granularity)?,
            segment,
        })
    }
}
