//! Configuration loading and secret resolution
//!
//! Secrets and endpoint URLs resolve with ENV → TOML priority. Keys are
//! opaque bearer tokens supplied by process configuration; they are never
//! compiled in and never logged.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// On-disk TOML configuration (`~/.config/refrain/refrain-pr.toml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Listen port override (default 5741)
    pub listen_port: Option<u16>,
    /// Spotify client credentials (client-credentials grant)
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    /// Hosted text-generation endpoint for name suggestions
    pub naming_endpoint: Option<String>,
    pub naming_api_key: Option<String>,
    /// Hosted image-generation endpoint for cover art
    pub cover_endpoint: Option<String>,
    pub cover_api_key: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging section of the TOML config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Max level: "error", "warn", "info", "debug", "trace"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            listen_port: None,
            spotify_client_id: None,
            spotify_client_secret: None,
            naming_endpoint: None,
            naming_api_key: None,
            cover_endpoint: None,
            cover_api_key: None,
            logging: LoggingConfig::default(),
        }
    }
}

/// Default configuration file path for the platform
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("refrain").join("refrain-pr.toml"))
        .unwrap_or_else(|| PathBuf::from("refrain-pr.toml"))
}

/// Load TOML configuration, falling back to defaults when the file is absent
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Write TOML configuration atomically (tmp file + rename)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve one setting with ENV → TOML priority
///
/// Warns when both sources carry a value (potential misconfiguration) and
/// logs which source won, without logging the value itself.
pub fn resolve_setting(
    name: &str,
    env_var: &str,
    toml_value: Option<&String>,
) -> Result<String> {
    let env_value = std::env::var(env_var).ok().filter(|v| is_valid_key(v));
    let toml_value = toml_value.filter(|v| is_valid_key(v.as_str()));

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} found in both environment and TOML. Using environment (highest priority).",
            name
        );
    }

    if let Some(value) = env_value {
        info!("{} loaded from environment variable", name);
        return Ok(value);
    }

    if let Some(value) = toml_value {
        info!("{} loaded from TOML config", name);
        return Ok(value.clone());
    }

    Err(Error::Config(format!(
        "{} not configured. Set {} or add it to {}",
        name,
        env_var,
        default_config_path().display()
    )))
}

/// Fully resolved service configuration consumed at startup
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub listen_port: u16,
    pub log_level: String,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub naming_endpoint: String,
    pub naming_api_key: String,
    pub cover_endpoint: String,
    pub cover_api_key: String,
}

impl ServiceConfig {
    /// Default listen port for refrain-pr
    pub const DEFAULT_PORT: u16 = 5741;

    /// Resolve every setting from the TOML config plus environment
    pub fn resolve(toml_config: &TomlConfig) -> Result<Self> {
        Ok(Self {
            listen_port: toml_config.listen_port.unwrap_or(Self::DEFAULT_PORT),
            log_level: toml_config.logging.level.clone(),
            spotify_client_id: resolve_setting(
                "Spotify client id",
                "REFRAIN_SPOTIFY_CLIENT_ID",
                toml_config.spotify_client_id.as_ref(),
            )?,
            spotify_client_secret: resolve_setting(
                "Spotify client secret",
                "REFRAIN_SPOTIFY_CLIENT_SECRET",
                toml_config.spotify_client_secret.as_ref(),
            )?,
            naming_endpoint: resolve_setting(
                "Naming endpoint URL",
                "REFRAIN_NAMING_ENDPOINT",
                toml_config.naming_endpoint.as_ref(),
            )?,
            naming_api_key: resolve_setting(
                "Naming API key",
                "REFRAIN_NAMING_API_KEY",
                toml_config.naming_api_key.as_ref(),
            )?,
            cover_endpoint: resolve_setting(
                "Cover endpoint URL",
                "REFRAIN_COVER_ENDPOINT",
                toml_config.cover_endpoint.as_ref(),
            )?,
            cover_api_key: resolve_setting(
                "Cover API key",
                "REFRAIN_COVER_API_KEY",
                toml_config.cover_api_key.as_ref(),
            )?,
        })
    }
}
