use serde::Deserialize;

use crate::engine::query::output::OutputSettings;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub query: Option<QueryConfig>,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub http_addr: String,
    /// Number of response chunks queued per query before producers block
    #[serde(default = "default_response_channel_capacity")]
    pub response_channel_capacity: usize,
    /// Queries allowed to run at once before new ones get 503 (0 = unlimited)
    #[serde(default)]
    pub max_concurrent_queries: usize,
}

fn default_response_channel_capacity() -> usize {
    16
}

#[derive(Debug, Deserialize)]
pub struct QueryConfig {
    /// Results below this size are sorted by `_time`; larger ones stream unsorted
    pub max_sort_buffer_bytes: Option<usize>,
    /// Capacity of the coalescing buffer in front of the HTTP body
    pub output_buffer_bytes: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// JSON-lines file loaded into the default tenant at startup
    pub seed_file: Option<String>,
    #[serde(default = "default_block_rows")]
    pub block_rows: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            seed_file: None,
            block_rows: default_block_rows(),
        }
    }
}

fn default_block_rows() -> usize {
    1024
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub stdout_level: String,
    pub file_level: String,
}

impl Settings {
    pub fn output_settings(&self) -> OutputSettings {
        let defaults = OutputSettings::default();
        let query = self.query.as_ref();
        OutputSettings {
            max_sort_buffer_bytes: query
                .and_then(|cfg| cfg.max_sort_buffer_bytes)
                .unwrap_or(defaults.max_sort_buffer_bytes),
            output_buffer_bytes: query
                .and_then(|cfg| cfg.output_buffer_bytes)
                .unwrap_or(defaults.output_buffer_bytes),
        }
    }
}

use std::env;

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var("LOG_SELECT_CONFIG").unwrap_or_else(|_| "config".to_string());
    load_settings_from(&config_path)
}

pub fn load_settings_from(config_path: &str) -> Result<Settings, config::ConfigError> {
    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(config_path))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
