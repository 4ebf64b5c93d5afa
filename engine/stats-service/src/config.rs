//! Service configuration management

use anyhow::{anyhow, Context, Result};
use draft_stats::PipelineConfig;
use draft_store::{StoreBackend, StoreConfig};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable naming an optional TOML config file
pub const CONFIG_FILE_ENV: &str = "STATS_CONFIG_FILE";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP listener
    pub server: ServerConfig,

    /// Document store backend
    pub store: StoreConfig,

    /// ADP and scoring pipelines
    pub pipeline: PipelineConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty)
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8080 }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

/// Load configuration from the optional config file and environment variables
pub fn load_config() -> Result<ServiceConfig> {
    let mut config = match std::env::var(CONFIG_FILE_ENV) {
        Ok(path) => {
            tracing::debug!("Loading configuration from file: {}", path);
            load_from_file(Path::new(&path))?
        }
        Err(_) => ServiceConfig::default(),
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config)?;

    Ok(config)
}

/// Load configuration from a TOML file
pub fn load_from_file(path: &Path) -> Result<ServiceConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Apply overrides looked up by variable name
pub fn apply_overrides<F>(config: &mut ServiceConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        config.server.port = parse_var("PORT", &port)?;
    }

    if let Some(host) = lookup("STATS_HOST") {
        config.server.host = host;
    }

    if let Some(backend) = lookup("STATS_STORE_BACKEND") {
        config.store.backend = StoreBackend::from_str(&backend)
            .map_err(|e| anyhow!("Invalid STATS_STORE_BACKEND: {}", e))?;
    }

    if let Some(data_dir) = lookup("STATS_DATA_DIR") {
        config.store.data_dir = PathBuf::from(data_dir);
    }

    if let Some(tasks) = lookup("STATS_MAX_CONCURRENT_TASKS") {
        config.pipeline.max_concurrent_tasks = parse_var("STATS_MAX_CONCURRENT_TASKS", &tasks)?;
    }

    if let Some(capacity) = lookup("STATS_PICK_CHANNEL_CAPACITY") {
        config.pipeline.pick_channel_capacity = parse_var("STATS_PICK_CHANNEL_CAPACITY", &capacity)?;
    }

    if let Some(collection) = lookup("STATS_STATS_COLLECTION") {
        config.pipeline.collections.stats_collection = collection;
    }

    if let Some(level) = lookup("STATS_LOG_LEVEL") {
        config.logging.level = level;
    }

    if let Some(format) = lookup("STATS_LOG_FORMAT") {
        config.logging.format = format;
    }

    Ok(())
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().with_context(|| format!("Invalid value for {}: {:?}", name, value))
}

/// Validate configuration
pub fn validate_config(config: &ServiceConfig) -> Result<()> {
    match config.logging.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.logging.level)),
    }

    match config.logging.format.as_str() {
        "json" | "pretty" => {}
        _ => return Err(anyhow!("Invalid log format: {}", config.logging.format)),
    }

    if config.server.port == 0 {
        return Err(anyhow!("Invalid server port: {}", config.server.port));
    }

    config.pipeline.validate().map_err(|e| anyhow!("Invalid pipeline configuration: {}", e))?;
    config.store.validate().map_err(|e| anyhow!("Invalid store configuration: {}", e))?;

    Ok(())
}
