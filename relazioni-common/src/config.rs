//! Configuration loading and settings resolution
//!
//! Bootstrap settings come from four sources, highest priority first:
//! 1. Command-line argument
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default
//!
//! A missing config file is not fatal when its location was not requested
//! explicitly: the client starts with compiled defaults and logs a warning.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit config file
pub const ENV_CONFIG_PATH: &str = "RELAZIONI_CONFIG";

/// Environment variable overriding the service base URL
pub const ENV_SERVER_URL: &str = "RELAZIONI_SERVER_URL";

/// Environment variable overriding the report download directory
pub const ENV_REPORT_DIR: &str = "RELAZIONI_REPORT_DIR";

/// Service base URL used when nothing else is configured
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Log level used when nothing else is configured
pub const DEFAULT_LOG_LEVEL: &str = "info";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Base URL of the extraction service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    /// Request timeout in seconds (absent: wait indefinitely)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Default directory for downloaded CSV reports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_dir: Option<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Where the loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// No file found at the implicit location; compiled defaults in use
    Defaults { looked_at: Option<PathBuf> },
}

/// Platform config file location: `<config_dir>/relazioni/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("relazioni").join("config.toml"))
}

/// Config file location: argument, then `RELAZIONI_CONFIG`, then platform default
pub fn config_file_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| non_empty_env(ENV_CONFIG_PATH).map(PathBuf::from))
        .or_else(default_config_path)
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Locate and load the config file
///
/// An explicit path (argument, then `RELAZIONI_CONFIG`) must exist. The
/// platform default path is optional.
pub fn load_or_default(explicit: Option<&Path>) -> Result<(TomlConfig, ConfigSource)> {
    let explicit = explicit
        .map(Path::to_path_buf)
        .or_else(|| non_empty_env(ENV_CONFIG_PATH).map(PathBuf::from));

    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let config = load_toml_config(&path)?;
        return Ok((config, ConfigSource::File(path)));
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            let config = load_toml_config(&path)?;
            Ok((config, ConfigSource::File(path)))
        }
        looked_at => Ok((TomlConfig::default(), ConfigSource::Defaults { looked_at })),
    }
}

/// Write config to disk, creating parent directories
///
/// Writes to a sibling temp file first, then renames over the target.
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub server_url: Option<String>,
    pub report_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved client settings
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub server_url: String,
    pub request_timeout: Option<Duration>,
    pub report_dir: Option<PathBuf>,
    pub log_level: String,
}

/// Resolve every setting by priority: CLI > environment > TOML > default
pub fn resolve_client_settings(cli: &CliOverrides, toml: &TomlConfig) -> Result<ClientSettings> {
    let server_url = cli
        .server_url
        .clone()
        .or_else(|| non_empty_env(ENV_SERVER_URL))
        .or_else(|| toml.server_url.clone())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

    let report_dir = cli
        .report_dir
        .clone()
        .or_else(|| non_empty_env(ENV_REPORT_DIR).map(PathBuf::from))
        .or_else(|| toml.report_dir.clone());

    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| toml.logging.level.clone())
        .to_lowercase();
    if !LOG_LEVELS.contains(&log_level.as_str()) {
        return Err(Error::InvalidInput(format!(
            "Unknown log level '{}' (expected one of: {})",
            log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    let request_timeout = match toml.request_timeout_secs {
        Some(0) => {
            return Err(Error::InvalidInput(
                "request_timeout_secs must be greater than zero".to_string(),
            ))
        }
        Some(secs) => Some(Duration::from_secs(secs)),
        None => None,
    };

    Ok(ClientSettings {
        server_url,
        request_timeout,
        report_dir,
        log_level,
    })
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
