//! # Configuration
//!
//! Settings come from four layers, later ones winning:
//! built-in defaults, `~/.qanda/config.toml`, `QANDA_*` env vars, CLI flags.
//!
//! The first run writes a fully commented config file so every knob is
//! visible without reading the source.
//!
//! The resolved values are handed to the API client and the renderer at
//! construction time; nothing reads the environment after startup.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::base_url::{DEFAULT_PROXY_ORIGIN, resolve_base_url};

// ============================================================================
// File Layout (every field optional)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct QandaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// User to act as; when unset the first user the backend lists is used.
    pub user_id: Option<String>,
    pub log_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub api_url: Option<String>,
    pub proxy_origin: Option<String>,
    pub timeout_secs: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const ENV_API_URL: &str = "QANDA_API_URL";
pub const ENV_PROXY_ORIGIN: &str = "QANDA_PROXY_ORIGIN";
pub const ENV_USER_ID: &str = "QANDA_USER_ID";

// ============================================================================
// Resolved Settings
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Normalized base URL, always ending with `/api/`.
    pub base_url: String,
    pub timeout: Duration,
    pub user_id: Option<String>,
    pub log_file: PathBuf,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub api_url: Option<String>,
    pub user_id: Option<String>,
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.qanda/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".qanda"))
}

/// Returns the path to `~/.qanda/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.qanda/config.toml`.
///
/// A missing file is replaced by the commented template and yields
/// `QandaConfig::default()`. A malformed file is a `ConfigError::Parse`.
pub fn load_config() -> Result<QandaConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(QandaConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(QandaConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<QandaConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: QandaConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Writes the commented template to `path`, creating parent directories.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Q&A Client Configuration
# All settings are optional; defaults are used for anything not specified.
# Precedence: CLI flags > QANDA_* env vars > this file > defaults.

# [general]
# user_id = "1"                       # Or set QANDA_USER_ID; default: first listed user
# log_file = "/tmp/qanda.log"         # Default: ~/.qanda/qanda.log

# [backend]
# api_url = "https://qa.example.com/api/"   # Or set QANDA_API_URL
# proxy_origin = "http://127.0.0.1:3000"    # Used when api_url is unset; must reverse-proxy /api/
# timeout_secs = 60
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Collapse file, process environment and CLI values into concrete settings.
pub fn resolve(config: &QandaConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading environment variables through `env`.
pub fn resolve_with_env(
    config: &QandaConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // API URL: CLI → env → config → relative fallback
    let api_url = cli
        .api_url
        .clone()
        .or_else(|| env(ENV_API_URL))
        .or_else(|| config.backend.api_url.clone());

    // Proxy origin: env → config → default
    let proxy_origin = env(ENV_PROXY_ORIGIN)
        .or_else(|| config.backend.proxy_origin.clone())
        .unwrap_or_else(|| DEFAULT_PROXY_ORIGIN.to_string());

    // User: CLI → env → config
    let user_id = cli
        .user_id
        .clone()
        .or_else(|| env(ENV_USER_ID))
        .or_else(|| config.general.user_id.clone())
        .filter(|id| !id.trim().is_empty());

    ResolvedConfig {
        base_url: resolve_base_url(api_url.as_deref(), &proxy_origin),
        timeout: Duration::from_secs(
            config
                .backend
                .timeout_secs
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        ),
        user_id,
        log_file: resolve_log_file(config, cli),
    }
}

/// Log file: CLI → config → `~/.qanda/qanda.log`.
///
/// Split out so the logger can be set up before the rest of resolution logs.
pub fn resolve_log_file(config: &QandaConfig, cli: &CliOverrides) -> PathBuf {
    cli.log_file
        .clone()
        .or_else(|| config.general.log_file.as_ref().map(PathBuf::from))
        .or_else(|| config_dir().map(|d| d.join("qanda.log")))
        .unwrap_or_else(|| PathBuf::from("qanda.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_empty_config_has_no_values() {
        let config = QandaConfig::default();
        assert!(config.backend.api_url.is_none());
        assert!(config.general.user_id.is_none());
    }

    #[test]
    fn test_unconfigured_client_uses_proxy_fallback() {
        let resolved = resolve_with_env(&QandaConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.base_url, "http://127.0.0.1:3000/api/");
        assert_eq!(resolved.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(resolved.user_id, None);
    }

    #[test]
    fn test_file_values_are_normalized() {
        let config = QandaConfig {
            general: GeneralConfig {
                user_id: Some("12".to_string()),
                log_file: Some("/tmp/q.log".to_string()),
            },
            backend: BackendConfig {
                api_url: Some("https://qa.example.com/apiqa".to_string()),
                proxy_origin: None,
                timeout_secs: Some(5),
            },
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.base_url, "https://qa.example.com/api/");
        assert_eq!(resolved.timeout, Duration::from_secs(5));
        assert_eq!(resolved.user_id.as_deref(), Some("12"));
        assert_eq!(resolved.log_file, PathBuf::from("/tmp/q.log"));
    }

    #[test]
    fn test_env_wins_over_config_and_cli_wins_over_env() {
        let config = QandaConfig {
            backend: BackendConfig {
                api_url: Some("https://from-config".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let env = |key: &str| (key == ENV_API_URL).then(|| "https://from-env".to_string());

        let resolved = resolve_with_env(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.base_url, "https://from-env/api/");

        let cli = CliOverrides {
            api_url: Some("https://from-cli/api".to_string()),
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &cli, env);
        assert_eq!(resolved.base_url, "https://from-cli/api/");
    }

    #[test]
    fn test_proxy_origin_from_env() {
        let env = |key: &str| (key == ENV_PROXY_ORIGIN).then(|| "http://proxy:8080/".to_string());
        let resolved = resolve_with_env(&QandaConfig::default(), &CliOverrides::default(), env);
        assert_eq!(resolved.base_url, "http://proxy:8080/api/");
    }

    #[test]
    fn test_blank_user_id_is_ignored() {
        let cli = CliOverrides {
            user_id: Some("  ".to_string()),
            ..Default::default()
        };
        let resolved = resolve_with_env(&QandaConfig::default(), &cli, no_env);
        assert_eq!(resolved.user_id, None);
    }

    #[test]
    fn test_full_file_parses() {
        let toml_str = r#"
[general]
user_id = "3"

[backend]
api_url = "https://qa.example.com"
timeout_secs = 15
"#;
        let config: QandaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.user_id.as_deref(), Some("3"));
        assert_eq!(config.backend.api_url.as_deref(), Some("https://qa.example.com"));
        assert_eq!(config.backend.timeout_secs, Some(15));
        assert!(config.backend.proxy_origin.is_none());
    }

    #[test]
    fn test_partial_file_parses() {
        let config: QandaConfig = toml::from_str("[backend]\ntimeout_secs = 1\n").unwrap();
        assert!(config.general.user_id.is_none());
        assert_eq!(config.backend.timeout_secs, Some(1));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let path = std::env::temp_dir().join(format!("qanda-bad-{}.toml", std::process::id()));
        fs::write(&path, "[backend\napi_url = ").unwrap();
        let result = load_config_from(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
