use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::aggregate::DEFAULT_EXCLUDED_SECTORS;
use crate::data::{AggregateOptions, EmptyValues};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Runtime settings, read from an optional JSON file. Every field has a
/// default so partial files are fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Region left out of sector breakdowns (matched ignoring case).
    pub excluded_region: String,
    /// Subtotal sectors dropped during aggregation.
    pub excluded_sectors: Vec<String>,
    pub empty_values: EmptyValues,
    /// Classifications to report on; empty means all.
    pub classifications: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            excluded_region: "Austria".to_string(),
            excluded_sectors: DEFAULT_EXCLUDED_SECTORS.iter().map(|s| s.to_string()).collect(),
            empty_values: EmptyValues::Zero,
            classifications: Vec::new(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            excluded_sectors: self.excluded_sectors.clone(),
            empty_values: self.empty_values,
        }
    }
}
