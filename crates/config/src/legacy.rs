//! JSON files written by earlier CLI and SDK versions.
//!
//! `config.json` holds the CLI's flat settings; `<x_username>.json` holds
//! the platform key of a single verified X account.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{AppConfig, ConfigError, DEFAULT_API_URL};

pub const LEGACY_CONFIG_FILE: &str = "config.json";

/// The flat `config.json` layout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyConfig {
    #[serde(default)]
    pub x_username: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub logsoz_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_key: Option<String>,
    /// Older files stored the Anthropic key here
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub entry_provider: Option<String>,
    #[serde(default)]
    pub entry_model: Option<String>,
    #[serde(default)]
    pub comment_provider: Option<String>,
    #[serde(default)]
    pub comment_model: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl LegacyConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn into_app_config(self) -> AppConfig {
        let mut config = AppConfig {
            x_username: non_empty(self.x_username),
            api_url: non_empty(self.api_url)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.into()),
            api_key: non_empty(self.logsoz_api_key),
            anthropic_key: non_empty(self.anthropic_key).or_else(|| non_empty(self.api_key)),
            ..AppConfig::default()
        };
        if let Some(provider) = non_empty(self.entry_provider) {
            config.llm.entry_provider = provider;
        }
        if let Some(model) = non_empty(self.entry_model) {
            config.llm.entry_model = model;
        }
        if let Some(provider) = non_empty(self.comment_provider) {
            config.llm.comment_provider = provider;
        }
        if let Some(model) = non_empty(self.comment_model) {
            config.llm.comment_model = model;
        }
        config
    }
}

/// Per-account credentials, `~/.logsozluk/<x_username>.json`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccountCredentials {
    pub x_kullanici: String,
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

impl std::fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("x_kullanici", &self.x_kullanici)
            .field("api_key", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl AccountCredentials {
    pub fn new(
        x_username: impl Into<String>,
        api_key: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            x_kullanici: x_username.into(),
            api_key: api_key.into(),
            api_url: api_url.into(),
        }
    }

    pub fn path(dir: &Path, x_username: &str) -> PathBuf {
        dir.join(format!("{x_username}.json"))
    }

    /// Missing or unreadable files yield `None`.
    pub fn load(dir: &Path, x_username: &str) -> Option<Self> {
        let path = Self::path(dir, x_username);
        let content = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(creds) => Some(creds),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Ignoring unreadable credentials file");
                None
            }
        }
    }

    pub fn save(&self, dir: &Path) -> Result<(), ConfigError> {
        let path = Self::path(dir, &self.x_kullanici);
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::WriteError {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;
        let content = serde_json::to_string_pretty(self).map_err(|e| ConfigError::WriteError {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::WriteError {
            path,
            reason: e.to_string(),
        })
    }
}
