//! Server configuration

use anyhow::{Context, Result};
use serde::Deserialize;

/// Server configuration, read from `PRICER_*` environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Path to the exported ONNX regressor
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Expected hex SHA-256 of the model artifact
    #[serde(default)]
    pub model_sha256: Option<String>,

    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP port for the form page, JSON API and health endpoints
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Allow cross-origin requests to the API
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

fn default_model_path() -> String {
    "best_bike_price_model.onnx".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    5000
}

fn default_enable_cors() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            model_sha256: None,
            bind_address: default_bind_address(),
            api_port: default_api_port(),
            enable_cors: default_enable_cors(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("PRICER"))
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Invalid PRICER_* configuration")
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.api_port)
    }

    /// Checksum with blank values treated as unset
    pub fn model_checksum(&self) -> Option<&str> {
        self.model_sha256
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
