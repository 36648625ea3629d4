/// Settings of the simulated machine as seen by the main memory model

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::state::memory_model::Address;

pub const CONFIG_ENV_VAR: &str = "RAMSIM_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // File the binary tees its log into
    pub log_path: String,
    // Highest address the CPU/cache may write; enforced by the simulation, not the store
    pub max_address: Address,
    // Minimum number of hex digits when displaying an address
    pub address_width: usize,
    // off, error, warn, info, debug or trace
    pub log_level: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            log_path: "ramsim_log.txt".to_string(),
            max_address: 0xFFFF,
            address_width: 3,
            log_level: "info".to_string(),
        }
    }
}

impl SimConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid simulator configuration")
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {:?}", path))?;
        Self::from_json(&json)
    }

    /// Configuration named by `RAMSIM_CONFIG`, or the defaults when unset.
    pub fn from_env() -> Result<Self> {
        match env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::from_file(path),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn log_level_filter(&self) -> Result<log::LevelFilter> {
        log::LevelFilter::from_str(&self.log_level)
            .map_err(|_| anyhow::anyhow!("Unknown log level '{}'", self.log_level))
    }

    /// Copy of the process-wide configuration.
    pub fn global() -> SimConfig {
        GLOBAL_SIM_CONFIG.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Replaces the process-wide configuration.
    pub fn set_global(config: SimConfig) {
        *GLOBAL_SIM_CONFIG.lock().unwrap_or_else(PoisonError::into_inner) = config;
    }
}

lazy_static::lazy_static! {
    pub static ref GLOBAL_SIM_CONFIG: Mutex<SimConfig> = Mutex::new(SimConfig::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SimConfig::from_json(r#"{ "max_address": 4095 }"#).unwrap();
        assert_eq!(config.max_address, 0xFFF);
        assert_eq!(config.address_width, 3);
        assert_eq!(config.log_path, "ramsim_log.txt");
        assert_eq!(config.log_level_filter().unwrap(), log::LevelFilter::Info);
    }

    #[test]
    fn test_log_level_parsing() {
        let config = SimConfig::from_json(r#"{ "log_level": "DEBUG" }"#).unwrap();
        assert_eq!(config.log_level_filter().unwrap(), log::LevelFilter::Debug);

        let config = SimConfig::from_json(r#"{ "log_level": "loud" }"#).unwrap();
        assert!(config.log_level_filter().is_err());
    }

    #[test]
    fn test_negative_limit_is_rejected() {
        assert!(SimConfig::from_json(r#"{ "max_address": -1 }"#).is_err());
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = SimConfig::from_file("/nonexistent/ramsim.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read configuration file"));
    }
}
