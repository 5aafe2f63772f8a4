use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

pub const DEFAULT_INPUT_PATH: &str = "./popu-pref.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankingConfig {
    pub name: String,
    pub input: InputConfig,
    pub years: YearsConfig,
    pub columns: ColumnsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub path: String,
}

/// The two years compared by the ranking: ratio = target / base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct YearsConfig {
    pub base: i64,
    pub target: i64,
}

/// Zero-based field positions within a comma-separated line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnsConfig {
    pub year: usize,
    pub region: usize,
    pub population: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub manifest: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Single-line JSON array
    #[default]
    Json,
    /// Indented JSON array
    Pretty,
    /// One ranking entry per line
    Lines,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            name: "popu-pref-ranking".to_string(),
            input: InputConfig::default(),
            years: YearsConfig::default(),
            columns: ColumnsConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_INPUT_PATH.to_string(),
        }
    }
}

impl Default for YearsConfig {
    fn default() -> Self {
        Self {
            base: 2010,
            target: 2015,
        }
    }
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            year: 0,
            region: 1,
            population: 3,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            manifest: None,
        }
    }
}

impl RankingConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: RankingConfig =
            serde_yaml::from_str(content).context("Failed to parse YAML configuration")?;

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.years.base == self.years.target {
            return Err(ConfigError::SameYears(self.years.base));
        }

        let columns = [
            ("year", self.columns.year),
            ("region", self.columns.region),
            ("population", self.columns.population),
        ];
        for (i, (first, position)) in columns.iter().enumerate() {
            if let Some((second, _)) = columns[i + 1..].iter().find(|(_, p)| p == position) {
                return Err(ConfigError::DuplicateColumn {
                    position: *position,
                    first: *first,
                    second: *second,
                });
            }
        }

        Ok(())
    }
}
