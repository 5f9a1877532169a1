mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./snapvault.toml",
        "~/.config/snapvault/config.toml",
        "/etc/snapvault/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.provider.api_key.is_empty() {
        anyhow::bail!("provider.api_key must be set");
    }

    if config.storage.cloud_name.is_empty() {
        anyhow::bail!("storage.cloud_name must be set");
    }

    if config.storage.upload_preset.is_empty() {
        anyhow::bail!("storage.upload_preset must be set");
    }

    if config.ingest.hard_limit <= 0 {
        anyhow::bail!("ingest.hard_limit must be positive");
    }

    if config.ingest.max_concurrent_uploads == 0 {
        anyhow::bail!("ingest.max_concurrent_uploads must be positive");
    }

    Ok(())
}
