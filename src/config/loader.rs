//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::download::DEFAULT_CONCURRENCY;
use crate::error::{Error, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Account credentials configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Hotmart account username (email). Prompted for when absent.
    #[serde(default)]
    pub username: Option<String>,

    /// Account password. Prompted for when absent.
    #[serde(default)]
    pub password: Option<String>,

    /// Browser user agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Download options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Base directory for downloads.
    #[serde(default)]
    pub download_directory: Option<PathBuf>,

    /// Cap on concurrent in-flight segment transfers.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Keep segment files and the local playlist after remuxing.
    #[serde(default)]
    pub keep_segments: bool,

    /// Skip lesson attachments.
    #[serde(default)]
    pub skip_attachments: bool,

    /// Whether to show download progress.
    #[serde(default = "default_true")]
    pub show_downloads: bool,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            download_directory: None,
            concurrency: default_concurrency(),
            keep_segments: false,
            skip_attachments: false,
            show_downloads: true,
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/106.0.0.0 Safari/537.36".to_string()
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Configuration file not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the effective download directory.
    pub fn download_directory(&self) -> PathBuf {
        self.options
            .download_directory
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
}

/// Validate a merged configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.options.concurrency == 0 {
        return Err(Error::ConfigValidation {
            field: "options.concurrency".into(),
            message: "must be at least 1".into(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.options.concurrency, DEFAULT_CONCURRENCY);
        assert!(config.options.show_downloads);
        assert!(!config.options.keep_segments);
        assert!(config.account.username.is_none());
    }

    #[test]
    fn test_partial_file_overrides() {
        let config: Config = toml::from_str(
            "[account]\nusername = \"user@example.com\"\n\n[options]\nconcurrency = 8\n",
        )
        .unwrap();

        assert_eq!(config.account.username.as_deref(), Some("user@example.com"));
        assert_eq!(config.options.concurrency, 8);
        assert!(config.options.show_downloads);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config: Config = toml::from_str("[options]\nconcurrency = 0\n").unwrap();
        assert!(matches!(
            validate_config(&config),
            Err(Error::ConfigValidation { .. })
        ));
    }
}
