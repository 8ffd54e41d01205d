//! Configuration management for Inquiro.
//!
//! Loads configuration from ${INQUIRO_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding `api_base_url`.
pub const BASE_URL_ENV: &str = "INQUIRO_API_BASE_URL";

pub mod paths {
    //! Path resolution for Inquiro configuration and data directories.
    //!
    //! INQUIRO_HOME resolution order:
    //! 1. INQUIRO_HOME environment variable (if set)
    //! 2. ~/.config/inquiro (default)

    use std::path::PathBuf;

    /// Returns the Inquiro home directory.
    ///
    /// Checks INQUIRO_HOME env var first, falls back to ~/.config/inquiro,
    /// and finally to a relative `.inquiro` when no home directory exists.
    pub fn inquiro_home() -> PathBuf {
        if let Ok(home) = std::env::var("INQUIRO_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".inquiro"),
            |h| h.join(".config").join("inquiro"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        inquiro_home().join("config.toml")
    }

    /// Returns the path to the stored credentials.
    pub fn credentials_path() -> PathBuf {
        inquiro_home().join("credentials.json")
    }

    /// Returns the default log directory.
    pub fn logs_dir() -> PathBuf {
        inquiro_home().join("logs")
    }
}

fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Browse list settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub page_size: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { page_size: 20 }
    }
}

/// Search panel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet interval before a settled query is issued.
    pub debounce_ms: u64,
    pub page_size: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            page_size: 20,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Where interactive mode writes its log files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the assistant API
    pub api_base_url: String,

    /// Per-request timeout in seconds (0 disables)
    pub request_timeout_secs: u64,

    /// Browse list configuration
    pub history: HistoryConfig,

    /// Search configuration
    pub search: SearchConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            history: HistoryConfig::default(),
            search: SearchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Resolves the API base URL with precedence: env > config > default.
    ///
    /// Trailing slashes are stripped so endpoint paths can be appended.
    pub fn resolve_base_url(&self) -> Result<String> {
        let from_env = std::env::var(BASE_URL_ENV).ok();
        resolve_base_url(from_env.as_deref(), Some(&self.api_base_url))
    }

    /// Request timeout, or `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Directory for interactive-mode log files.
    pub fn logs_dir(&self) -> PathBuf {
        self.logging
            .directory
            .clone()
            .unwrap_or_else(paths::logs_dir)
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        write_config(path, default_config_template())
    }

    /// Generates a fresh config TOML from Rust defaults.
    ///
    /// Uses the embedded template for structure/comments and overwrites its
    /// values with the ones serialized from `Config::default()`.
    pub fn generate() -> Result<String> {
        use toml_edit::{DocumentMut, Item};

        let generated_toml = toml::to_string(&Config::default())
            .context("Failed to serialize default config to TOML")?;

        let mut doc: DocumentMut = default_config_template()
            .parse()
            .context("Failed to parse default config template")?;
        let generated: DocumentMut = generated_toml
            .parse()
            .context("Failed to parse generated config")?;

        for (key, item) in generated.iter() {
            if let Item::Table(generated_table) = item
                && let Some(Item::Table(template_table)) = doc.get_mut(key)
            {
                for (sub_key, sub_item) in generated_table.iter() {
                    template_table[sub_key] = sub_item.clone();
                }
                continue;
            }
            doc[key] = item.clone();
        }

        Ok(doc.to_string())
    }
}

/// Resolves a base URL with precedence: env > config > default.
fn resolve_base_url(env_value: Option<&str>, config_value: Option<&str>) -> Result<String> {
    let chosen = [env_value, config_value]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(Config::DEFAULT_API_BASE_URL);

    url::Url::parse(chosen).with_context(|| format!("Invalid API base URL: {chosen}"))?;
    Ok(chosen.trim_end_matches('/').to_string())
}

fn write_config(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, contents)
        .with_context(|| format!("Failed to write config to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.api_base_url, Config::DEFAULT_API_BASE_URL);
        assert_eq!(config.history.page_size, 20);
        assert_eq!(config.search.debounce(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[search]\ndebounce_ms = 250\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.search.debounce_ms, 250);
        assert_eq!(config.search.page_size, 20);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_parse_error_mentions_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_base_url = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("config.toml"));
    }

    #[test]
    fn test_base_url_precedence() {
        let resolved =
            resolve_base_url(Some("http://env.test/api/"), Some("http://config.test")).unwrap();
        assert_eq!(resolved, "http://env.test/api");

        let resolved = resolve_base_url(Some("  "), Some("http://config.test/api")).unwrap();
        assert_eq!(resolved, "http://config.test/api");

        let resolved = resolve_base_url(None, None).unwrap();
        assert_eq!(resolved, Config::DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(resolve_base_url(None, Some("not a url")).is_err());
    }

    #[test]
    fn test_zero_timeout_disables() {
        let config = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        Config::init(&path).unwrap();
        assert!(path.exists());
        assert!(Config::init(&path).is_err());

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.search.debounce_ms, 500);
    }

    #[test]
    fn test_generate_round_trips_defaults() {
        let generated = Config::generate().unwrap();
        assert!(generated.contains("# Inquiro configuration"));
        let parsed: Config = toml::from_str(&generated).unwrap();
        assert_eq!(parsed.history.page_size, 20);
        assert_eq!(parsed.logging.level, "info");
    }
}
