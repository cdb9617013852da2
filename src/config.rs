use crate::error::{HeadwayError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub load: LoadConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Initial column capacity used when a table's row count is unknown.
    pub row_estimate: usize,
    /// Per-table row estimates, keyed by table name (e.g. "stop_times").
    #[serde(default)]
    pub table_row_estimates: HashMap<String, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            load: LoadConfig {
                row_estimate: 1024,
                table_row_estimates: HashMap::new(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_file(path: PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            HeadwayError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| HeadwayError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Row estimate for a table, falling back to the global default.
    pub fn row_estimate_for(&self, table: &str) -> usize {
        self.load
            .table_row_estimates
            .get(table)
            .copied()
            .unwrap_or(self.load.row_estimate)
    }

    fn validate(&self) -> Result<()> {
        if self.load.row_estimate == 0 {
            return Err(HeadwayError::Config(
                "Row estimate must be greater than 0".to_string(),
            ));
        }

        if let Some((table, _)) = self
            .load
            .table_row_estimates
            .iter()
            .find(|(_, estimate)| **estimate == 0)
        {
            return Err(HeadwayError::Config(format!(
                "Row estimate for table '{}' must be greater than 0",
                table
            )));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(HeadwayError::Config(format!(
                "Invalid log level '{}'. Valid options: {:?}",
                self.logging.level, valid_levels
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
