use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::common::error::{ReaderError, Result};

/// Runtime configuration, loaded from `config.toml` when present.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    /// Where the CLI persists resolved pages between runs.
    pub store_path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    /// The site rejects default client identifiers, so this must look like a browser.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            store_path: "pages.json".to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36".to_string(),
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, falling back to
    /// defaults when the file does not exist.
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";
        if !Path::new(config_path).exists() {
            return Ok(Self::default());
        }
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            ReaderError::Config(format!("Failed to read config file '{config_path}': {e}"))
        })?;
        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}
