// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub storage: StorageConfig,
    pub update: UpdateConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub max_body_size: u64,
}

/// Key-value store backend selection
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// REST key-value service (production)
    Remote,
    /// Process-local map (development and tests)
    Memory,
}

/// Key-value store configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Base URL of the remote store, one path segment per key
    #[serde(default)]
    pub base_url: String,
    /// Optional bearer token for the remote store
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Request timeout in seconds
    pub timeout: u64,
}

/// How incoming records are treated before the snapshot is stored
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordPolicy {
    /// Store the array exactly as received
    Passthrough,
    /// Drop records that fail validation, store the rest
    Filter,
    /// Reject the whole batch if any record fails validation
    Strict,
}

/// Update endpoint configuration
#[derive(Debug, Deserialize, Clone)]
pub struct UpdateConfig {
    /// Shared secret expected in the X-API-Key header
    pub api_key: String,
    pub record_policy: RecordPolicy,
    /// Currency code applied to typed records missing one (filter/strict only)
    pub default_currency: String,
}
