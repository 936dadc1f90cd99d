// ABOUTME: Configuration loading for loanchat.
// ABOUTME: Reads ~/.loanchat/config.toml, applies LOANCHAT_ENDPOINT, and resolves the data directory.

use std::path::PathBuf;

use serde::Deserialize;

use crate::chat::Encoding;

/// Environment variable that overrides `api.endpoint`.
pub const ENDPOINT_ENV: &str = "LOANCHAT_ENDPOINT";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub ui: UiConfig,
}

/// Remote chat endpoint settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub endpoint: String,
    /// Applied to every request, with or without an attachment.
    pub timeout_ms: u64,
    pub encoding: Encoding,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://financechatbot-z1ct.onrender.com/api/chat".to_string(),
            timeout_ms: 5000,
            encoding: Encoding::Multipart,
        }
    }
}

/// Where history and logs are kept.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Empty means the platform data directory.
    pub data_dir: String,
}

/// Text shown around the chat.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub title: String,
    pub subtitle: String,
    pub placeholder: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: "Personal/Home Loan Detailed Terms & Conditions".to_string(),
            subtitle: "Get To Know Essential eligibility criteria and Complete eligibility requirements"
                .to_string(),
            placeholder: "e.g. Want to Check eligibility criteria for Loan to reach your dreams ?"
                .to_string(),
        }
    }
}

impl Config {
    /// Load config from ~/.loanchat/config.toml, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every request fail.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api.timeout_ms == 0 {
            anyhow::bail!("api.timeout_ms must be greater than zero");
        }
        Ok(())
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".loanchat")
            .join("config.toml")
    }

    /// Apply `LOANCHAT_ENDPOINT` if set and non-empty.
    pub fn apply_env(&mut self) {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            self.apply_endpoint_override(&endpoint);
        }
    }

    fn apply_endpoint_override(&mut self, endpoint: &str) {
        let endpoint = endpoint.trim();
        if !endpoint.is_empty() {
            self.api.endpoint = endpoint.to_string();
        }
    }

    /// Directory holding the history snapshot and the log file.
    pub fn data_dir(&self) -> PathBuf {
        if !self.storage.data_dir.is_empty() {
            return PathBuf::from(&self.storage.data_dir);
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("loanchat")
    }

    /// Path to the log file.
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("loanchat.log")
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.api.timeout_ms)
    }
}
