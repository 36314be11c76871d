//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::route::EnrichConfig;

const DEFAULT_NAVDATA_DIR: &str = "data";
const DEFAULT_SETTINGS: &str = "settings.json";
const DEFAULT_QUERY_TIMEOUT_MS: u64 = 2000;

/// Invalid configuration value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidBind { var: &'static str, value: String },

    #[error("{var} is not a number of milliseconds: {value}")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (`FPL_BIND`)
    pub bind: SocketAddr,
    /// Directory of navigation CSV files (`FPL_NAVDATA_DIR`)
    pub navdata_dir: PathBuf,
    /// Remote navigation data service; replaces the CSV files when set
    /// (`FPL_NAVDATA_URL`)
    pub navdata_url: Option<String>,
    /// Settings file (`FPL_SETTINGS`)
    pub settings_path: PathBuf,
    /// Per-query provider timeout (`FPL_QUERY_TIMEOUT_MS`)
    pub query_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 32030)),
            navdata_dir: PathBuf::from(DEFAULT_NAVDATA_DIR),
            navdata_url: None,
            settings_path: PathBuf::from(DEFAULT_SETTINGS),
            query_timeout: Duration::from_millis(DEFAULT_QUERY_TIMEOUT_MS),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value
    /// if it is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("FPL_BIND") {
            config.bind = value.parse().map_err(|_| ConfigError::InvalidBind {
                var: "FPL_BIND",
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup("FPL_NAVDATA_DIR") {
            config.navdata_dir = PathBuf::from(value);
        }
        config.navdata_url = lookup("FPL_NAVDATA_URL").filter(|v| !v.trim().is_empty());
        if let Some(value) = lookup("FPL_SETTINGS") {
            config.settings_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("FPL_QUERY_TIMEOUT_MS") {
            let ms: u64 = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout {
                    var: "FPL_QUERY_TIMEOUT_MS",
                    value: value.clone(),
                })?;
            config.query_timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }

    pub fn enrich_config(&self) -> EnrichConfig {
        EnrichConfig::new(self.query_timeout)
    }
}
