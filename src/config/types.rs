use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "snapvault.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Base URL of the upstream photo API
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,

    /// API key sent in the Authorization header
    #[serde(default)]
    pub api_key: String,
}

fn default_provider_base_url() -> String {
    "https://api.pexels.com/v1".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_provider_base_url(),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Base URL of the upload API
    #[serde(default = "default_storage_base_url")]
    pub base_url: String,

    /// Cloud name segment of the upload endpoint path
    #[serde(default)]
    pub cloud_name: String,

    /// Unsigned upload preset sent with each upload
    #[serde(default)]
    pub upload_preset: String,
}

fn default_storage_base_url() -> String {
    "https://api.cloudinary.com/v1_1".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_url: default_storage_base_url(),
            cloud_name: String::new(),
            upload_preset: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    /// Upper bound on how many images one batch may request upstream
    #[serde(default = "default_hard_limit")]
    pub hard_limit: i64,

    /// Maximum number of concurrent transfers per batch
    #[serde(default = "default_max_concurrent_uploads")]
    pub max_concurrent_uploads: usize,
}

fn default_hard_limit() -> i64 {
    25
}
fn default_max_concurrent_uploads() -> usize {
    8
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            hard_limit: default_hard_limit(),
            max_concurrent_uploads: default_max_concurrent_uploads(),
        }
    }
}
