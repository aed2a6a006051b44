//! Configuration structures
//!
//! Loaded by `cvm-infra::config` from the environment or from a JSON/TOML
//! file. Every optional field has a serde default so minimal files work.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_CATALOG_PAGE_SIZE;

/// Top-level configuration for a console process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection settings for the offer REST backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL without trailing slash, e.g. `https://cvm.example.com/api`
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Total attempts per request (initial try + retries)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Opaque bearer token forwarded as-is
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_catalog_page_size")]
    pub catalog_page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            api_token: None,
            catalog_page_size: default_catalog_page_size(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` overrides it
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_attempts() -> usize {
    3
}

const fn default_catalog_page_size() -> u32 {
    DEFAULT_CATALOG_PAGE_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}
