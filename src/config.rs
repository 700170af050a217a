//! Runtime configuration
//!
//! Read from `--config <path>` or `~/.adchart/config.json`. A missing
//! default file means defaults; a file that exists but does not parse is an
//! error.

use crate::services::chart_data::DEFAULT_MAX_CONCURRENT_SOURCES;
use crate::types::{AdchartError, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Logging verbosity (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Cap on sources querying the store at once
    #[serde(default = "default_max_concurrent_sources")]
    pub max_concurrent_sources: usize,

    /// Store snapshot used when `--store` is not given
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_concurrent_sources() -> usize {
    DEFAULT_MAX_CONCURRENT_SOURCES
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            max_concurrent_sources: default_max_concurrent_sources(),
            store_path: None,
        }
    }
}

impl Config {
    /// `~/.adchart/config.json`
    pub fn default_path() -> Option<PathBuf> {
        BaseDirs::new().map(|d| d.home_dir().join(".adchart").join("config.json"))
    }

    /// Load from an explicit path, or from the default path when present
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| AdchartError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| AdchartError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_concurrent_sources == 0 {
            return Err(AdchartError::Config(
                "max_concurrent_sources must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
