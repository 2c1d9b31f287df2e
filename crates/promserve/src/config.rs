//! Configuration loading and validation

use anyhow::{Context, Result};
use promserve_metrics::MetricsConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub metrics: MetricsEndpointConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

/// Static content configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// File served at `/`
    #[serde(default = "default_static_file")]
    pub static_file: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            static_file: default_static_file(),
        }
    }
}

/// Metrics endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsEndpointConfig {
    /// Path the Prometheus exposition endpoint is mounted at
    #[serde(default = "default_metrics_path")]
    pub path: String,
    /// Latency histogram buckets in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_buckets: Option<Vec<f64>>,
}

impl Default for MetricsEndpointConfig {
    fn default() -> Self {
        Self {
            path: default_metrics_path(),
            latency_buckets: None,
        }
    }
}

impl MetricsEndpointConfig {
    /// Registry settings derived from this section
    pub fn registry_config(&self) -> MetricsConfig {
        MetricsConfig {
            latency_buckets: self.latency_buckets.clone(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_file() -> String {
    "./static/index.html".to_string()
}

fn default_metrics_path() -> String {
    "/prometheus".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from a file
    ///
    /// Returns `None` when the file does not exist. Runs before logging is
    /// initialized, so reporting is left to the caller.
    pub fn load(path: &str) -> Result<Option<Self>> {
        let config_path = Path::new(path);

        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(Some(config))
    }

    /// Reject settings the router cannot be built with
    pub fn validate(&self) -> Result<()> {
        let path = &self.metrics.path;
        if !path.starts_with('/') {
            anyhow::bail!("Metrics path '{}' must start with '/'", path);
        }
        if path == "/" {
            anyhow::bail!("Metrics path '{}' conflicts with the index route", path);
        }
        // Captures and wildcards would make the router panic or swallow paths
        if let Some(segment) = path
            .split('/')
            .find(|s| s.contains(['{', '}']) || s.starts_with(':') || s.starts_with('*'))
        {
            anyhow::bail!(
                "Metrics path '{}' must only contain literal segments (found '{}')",
                path,
                segment
            );
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            other => anyhow::bail!(
                "Unknown logging format '{}' (expected 'pretty' or 'json')",
                other
            ),
        }

        if self.content.static_file.is_empty() {
            anyhow::bail!("Static file path must not be empty");
        }

        Ok(())
    }
}
