use crate::error::InspectorError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Vectorize inspector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Cloudflare account id owning the index
    pub account_id: String,

    /// Cloudflare API token with Vectorize read access
    pub api_token: String,

    /// Vectorize index name
    pub index_name: String,

    /// Cloudflare REST API base URL
    pub api_base_url: String,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Inspector service URL used by the export CLI
    pub inspector_api_url: String,

    /// Directory for timestamped export files
    pub export_dir: PathBuf,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,

    /// Batches attempted before the completeness check applies
    pub export_min_batches: usize,

    /// Consecutive batches without new records before giving up
    pub export_empty_batch_limit: usize,

    /// Novelty ratio below which a batch counts as saturated
    pub export_min_novelty_ratio: f64,

    /// Batches run before the novelty ratio is checked
    pub export_novelty_grace_batches: usize,

    /// Pause between batches in milliseconds
    pub export_batch_delay_ms: u64,

    /// Batch cap for exports run inside the service
    pub service_max_batches: usize,

    /// Batch cap for the standalone export CLI
    pub cli_max_batches: usize,

    /// Attempts per batch fetch in the export CLI
    pub export_retry_attempts: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            api_token: String::new(),
            index_name: "autorag-rag-exoplanets".to_string(),
            api_base_url: "https://api.cloudflare.com/client/v4".to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 8787,
            inspector_api_url: "http://localhost:8787".to_string(),
            export_dir: PathBuf::from("exports"),
            log_dir: PathBuf::from("./log"),
            log_level: "info".to_string(),
            export_min_batches: 3,
            export_empty_batch_limit: 3,
            export_min_novelty_ratio: 0.05,
            export_novelty_grace_batches: 5,
            export_batch_delay_ms: 100,
            service_max_batches: 10,
            cli_max_batches: 100,
            export_retry_attempts: 3,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, InspectorError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let defaults = Self::default();

        let config = Self {
            account_id: std::env::var("CLOUDFLARE_ACCOUNT_ID").unwrap_or_default(),
            api_token: std::env::var("CLOUDFLARE_API_TOKEN").unwrap_or_default(),
            index_name: std::env::var("VECTORIZE_INDEX_NAME")
                .unwrap_or(defaults.index_name),
            api_base_url: std::env::var("VECTORIZE_API_BASE")
                .unwrap_or(defaults.api_base_url),
            server_host: std::env::var("SERVER_HOST")
                .unwrap_or(defaults.server_host),
            server_port: Self::get_env_parsed("SERVER_PORT")
                .unwrap_or(defaults.server_port),
            inspector_api_url: std::env::var("INSPECTOR_API_URL")
                .unwrap_or(defaults.inspector_api_url),
            export_dir: Self::get_env_path("EXPORT_DIR")
                .unwrap_or(defaults.export_dir),
            log_dir: Self::get_env_path("LOG_DIR")
                .unwrap_or(defaults.log_dir),
            log_level: std::env::var("LOG_LEVEL")
                .unwrap_or(defaults.log_level),
            export_min_batches: Self::get_env_parsed("EXPORT_MIN_BATCHES")
                .unwrap_or(defaults.export_min_batches),
            export_empty_batch_limit: Self::get_env_parsed("EXPORT_EMPTY_BATCH_LIMIT")
                .unwrap_or(defaults.export_empty_batch_limit),
            export_min_novelty_ratio: Self::get_env_parsed("EXPORT_MIN_NOVELTY_RATIO")
                .unwrap_or(defaults.export_min_novelty_ratio),
            export_novelty_grace_batches: Self::get_env_parsed("EXPORT_NOVELTY_GRACE_BATCHES")
                .unwrap_or(defaults.export_novelty_grace_batches),
            export_batch_delay_ms: Self::get_env_parsed("EXPORT_BATCH_DELAY_MS")
                .unwrap_or(defaults.export_batch_delay_ms),
            service_max_batches: Self::get_env_parsed("SERVICE_MAX_BATCHES")
                .unwrap_or(defaults.service_max_batches),
            cli_max_batches: Self::get_env_parsed("CLI_MAX_BATCHES")
                .unwrap_or(defaults.cli_max_batches),
            export_retry_attempts: Self::get_env_parsed("EXPORT_RETRY_ATTEMPTS")
                .unwrap_or(defaults.export_retry_attempts),
        };

        config.validate()?;

        Ok(config)
    }

    /// Get PathBuf from environment variable
    fn get_env_path(key: &str) -> Option<PathBuf> {
        std::env::var(key).ok().map(PathBuf::from)
    }

    /// Parse environment variable, ignoring unparsable values
    fn get_env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
        std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), InspectorError> {
        if self.index_name.trim().is_empty() {
            return Err(InspectorError::config("Index name cannot be empty"));
        }

        for (name, url) in [
            ("Vectorize API base URL", &self.api_base_url),
            ("Inspector API URL", &self.inspector_api_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(InspectorError::config(format!(
                    "{} must start with http:// or https://",
                    name
                )));
            }
        }

        if self.server_port == 0 {
            return Err(InspectorError::config("Server port cannot be 0"));
        }

        if !(0.0..=1.0).contains(&self.export_min_novelty_ratio) {
            return Err(InspectorError::config(
                "Export novelty ratio must be between 0 and 1",
            ));
        }

        if self.service_max_batches == 0 || self.cli_max_batches == 0 {
            return Err(InspectorError::config("Batch caps must be at least 1"));
        }

        if self.export_retry_attempts == 0 {
            return Err(InspectorError::config("Retry attempts must be at least 1"));
        }

        Ok(())
    }
}
