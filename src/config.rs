//! User configuration.
//!
//! Read from `<config dir>/day-planner/config.toml` (or the path in
//! `DAY_PLANNER_CONFIG`). Every key is optional.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::chain::{ChainRules, DEFAULT_BEDTIME_MINUTES};
use crate::error::ConfigError;
use crate::time::{minutes_to_time, time_to_minutes};

pub const CONFIG_ENV: &str = "DAY_PLANNER_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Planner JSON file. Defaults to `~/.dayplanner/days.json`.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    /// Tasks ending at or after this time ask for confirmation.
    #[serde(default = "default_bedtime")]
    pub bedtime: String,
}

fn default_bedtime() -> String {
    minutes_to_time(DEFAULT_BEDTIME_MINUTES as i64)
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            bedtime: default_bedtime(),
        }
    }
}

impl PlannerConfig {
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        Ok(dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("day-planner")
            .join("config.toml"))
    }

    /// Load config from disk. Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn data_file(&self) -> PathBuf {
        self.data_file.clone().unwrap_or_else(default_data_file)
    }

    pub fn chain_rules(&self) -> Result<ChainRules, ConfigError> {
        let bedtime_minutes = time_to_minutes(&self.bedtime)
            .ok_or_else(|| ConfigError::InvalidBedtime(self.bedtime.clone()))?;
        Ok(ChainRules { bedtime_minutes })
    }
}

fn default_data_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".dayplanner")
        .join("days.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::parse("").unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.bedtime, "22:00");
        assert_eq!(config.chain_rules().unwrap(), ChainRules::default());
        assert!(config.data_file().ends_with(".dayplanner/days.json"));
    }

    #[test]
    fn test_overrides() {
        let raw = "data_file = \"/tmp/plan.json\"\nbedtime = \"21:30\"\n";
        let config = PlannerConfig::parse(raw).unwrap();
        assert_eq!(config.data_file(), PathBuf::from("/tmp/plan.json"));
        assert_eq!(config.chain_rules().unwrap().bedtime_minutes, 21 * 60 + 30);
    }

    #[test]
    fn test_invalid_bedtime() {
        let config = PlannerConfig::parse("bedtime = \"late\"").unwrap();
        assert!(matches!(config.chain_rules(), Err(ConfigError::InvalidBedtime(_))));
    }
}
