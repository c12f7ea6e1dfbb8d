//! Configuration file support for threadsweep
//!
//! Handles `.threadsweep.toml` configuration file loading and saving.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = ".threadsweep.toml";

/// Environment variable consulted when no API key is configured
pub const API_KEY_ENV: &str = "LANGSMITH_API_KEY";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Prefix expected on API keys; a mismatch only produces a warning
    #[serde(default = "default_api_key_prefix")]
    pub api_key_prefix: String,

    /// Server connection settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Thread discovery settings
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Paging for preview and review listings
    #[serde(default)]
    pub review: ReviewConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key_prefix: default_api_key_prefix(),
            server: ServerConfig::default(),
            discovery: DiscoveryConfig::default(),
            review: ReviewConfig::default(),
        }
    }
}

/// Server connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the server (overridden by `--url`)
    #[serde(default)]
    pub url: Option<String>,

    /// API key (overridden by `--api-key`, falls back to `LANGSMITH_API_KEY`)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Number of threads requested per page
    #[serde(default = "default_discovery_page_size")]
    pub page_size: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            page_size: default_discovery_page_size(),
        }
    }
}

/// Review configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Threads shown per page while previewing or reviewing
    #[serde(default = "default_review_page_size")]
    pub page_size: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            page_size: default_review_page_size(),
        }
    }
}

// Default value functions
fn default_api_key_prefix() -> String {
    "lsv2_".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_discovery_page_size() -> usize {
    1000
}

fn default_review_page_size() -> usize {
    5
}

impl Config {
    /// Load configuration file (returns default if not found)
    ///
    /// Searches for `.threadsweep.toml` in the current directory.
    pub fn load() -> Result<Self> {
        let config_path = PathBuf::from(CONFIG_FILE_NAME);

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from specified path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to specified path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate default configuration file
    pub fn generate_default(path: &Path) -> Result<()> {
        let config = Config::default();
        config.save_to(path)
    }

    /// Resolve the API key: explicit value, then config file, then environment.
    ///
    /// Empty strings are treated as absent at every level.
    pub fn resolve_api_key(&self, explicit: Option<String>, env_value: Option<String>) -> Option<String> {
        explicit
            .filter(|k| !k.is_empty())
            .or_else(|| self.server.api_key.clone().filter(|k| !k.is_empty()))
            .or_else(|| env_value.filter(|k| !k.is_empty()))
    }

    /// Resolve the base URL: explicit value first, then config file
    pub fn resolve_url(&self, explicit: Option<String>) -> Option<String> {
        explicit
            .filter(|u| !u.is_empty())
            .or_else(|| self.server.url.clone().filter(|u| !u.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn run_in_temp_dir<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original_dir = env::current_dir().unwrap();
        let temp_dir = tempfile::tempdir().unwrap();
        env::set_current_dir(&temp_dir).unwrap();

        let result = f();

        env::set_current_dir(&original_dir).unwrap();
        result
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.api_key_prefix, "lsv2_");
        assert!(config.server.url.is_none());
        assert!(config.server.api_key.is_none());
        assert_eq!(config.server.timeout_secs, 30);
        assert_eq!(config.discovery.page_size, 1000);
        assert_eq!(config.review.page_size, 5);
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
api_key_prefix = "custom_"

[server]
url = "http://localhost:9123"
api_key = "custom_key"
timeout_secs = 5

[discovery]
page_size = 200
"#
        )
        .unwrap();

        let config = Config::load_from(temp_file.path()).unwrap();

        assert_eq!(config.api_key_prefix, "custom_");
        assert_eq!(config.server.url.as_deref(), Some("http://localhost:9123"));
        assert_eq!(config.server.api_key.as_deref(), Some("custom_key"));
        assert_eq!(config.server.timeout_secs, 5);
        assert_eq!(config.discovery.page_size, 200);
        // Unspecified section keeps its defaults
        assert_eq!(config.review.page_size, 5);
    }

    #[test]
    fn test_save_and_load() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        let mut config = Config::default();
        config.server.url = Some("https://my-server.com".to_string());
        config.review.page_size = 10;

        config.save_to(path).unwrap();

        let loaded = Config::load_from(path).unwrap();
        assert_eq!(loaded.server.url.as_deref(), Some("https://my-server.com"));
        assert_eq!(loaded.review.page_size, 10);
    }

    #[test]
    fn test_generate_default() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        Config::generate_default(path).unwrap();

        let loaded = Config::load_from(path).unwrap();
        assert_eq!(loaded.discovery.page_size, 1000);
        assert_eq!(loaded.api_key_prefix, "lsv2_");
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[server\nurl = ").unwrap();

        let result = Config::load_from(temp_file.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to parse"));
    }

    #[test]
    #[serial]
    fn test_load_missing_file_uses_defaults() {
        run_in_temp_dir(|| {
            let config = Config::load().unwrap();
            assert!(config.server.url.is_none());
            assert_eq!(config.discovery.page_size, 1000);
        });
    }

    #[test]
    #[serial]
    fn test_load_from_current_dir() {
        run_in_temp_dir(|| {
            fs::write(CONFIG_FILE_NAME, "[server]\nurl = \"http://example.test\"\n").unwrap();

            let config = Config::load().unwrap();
            assert_eq!(config.server.url.as_deref(), Some("http://example.test"));
        });
    }

    #[test]
    fn test_resolve_api_key_precedence() {
        let mut config = Config::default();
        config.server.api_key = Some("lsv2_file".to_string());

        assert_eq!(
            config.resolve_api_key(Some("lsv2_flag".to_string()), Some("lsv2_env".to_string())),
            Some("lsv2_flag".to_string())
        );
        assert_eq!(
            config.resolve_api_key(None, Some("lsv2_env".to_string())),
            Some("lsv2_file".to_string())
        );

        config.server.api_key = None;
        assert_eq!(
            config.resolve_api_key(Some(String::new()), Some("lsv2_env".to_string())),
            Some("lsv2_env".to_string())
        );
        assert_eq!(config.resolve_api_key(None, None), None);
    }

    #[test]
    fn test_resolve_url() {
        let mut config = Config::default();
        assert_eq!(config.resolve_url(None), None);

        config.server.url = Some("http://from-file".to_string());
        assert_eq!(config.resolve_url(None).as_deref(), Some("http://from-file"));
        assert_eq!(
            config.resolve_url(Some("http://from-flag".to_string())).as_deref(),
            Some("http://from-flag")
        );
    }
}
