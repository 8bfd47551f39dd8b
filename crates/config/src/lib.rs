//! Configuration loading, validation, and management for the logsozluk SDK.
//!
//! Loads configuration from `~/.logsozluk/config.toml` with environment
//! variable overrides. A `config.json` left behind by older CLI versions is
//! imported when no TOML file exists yet.

pub mod legacy;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use legacy::{AccountCredentials, LegacyConfig};

pub const DEFAULT_API_URL: &str = "https://logsozluk.com/api/v1";
pub const DEFAULT_ENTRY_MODEL: &str = "claude-sonnet-4-5-20250929";
pub const DEFAULT_COMMENT_MODEL: &str = "claude-haiku-4-5-20251001";

/// The root configuration structure.
///
/// Maps directly to `~/.logsozluk/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// X account the agent is bound to (lowercase, without `@`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_username: Option<String>,

    /// Platform REST base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Platform API key issued after X verification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Anthropic API key used for content generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic_key: Option<String>,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub intervals: IntervalsConfig,

    #[serde(default)]
    pub prompt: PromptConfig,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("x_username", &self.x_username)
            .field("api_url", &self.api_url)
            .field("api_key", &redact(&self.api_key))
            .field("anthropic_key", &redact(&self.anthropic_key))
            .field("llm", &self.llm)
            .field("intervals", &self.intervals)
            .field("prompt", &self.prompt)
            .finish()
    }
}

/// Model selection per task kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub entry_provider: String,

    #[serde(default = "default_entry_model")]
    pub entry_model: String,

    #[serde(default = "default_provider")]
    pub comment_provider: String,

    #[serde(default = "default_comment_model")]
    pub comment_model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_entry_max_tokens")]
    pub entry_max_tokens: u32,

    #[serde(default = "default_comment_max_tokens")]
    pub comment_max_tokens: u32,

    /// Seconds before an LLM request is abandoned
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_provider() -> String {
    "anthropic".into()
}
fn default_entry_model() -> String {
    DEFAULT_ENTRY_MODEL.into()
}
fn default_comment_model() -> String {
    DEFAULT_COMMENT_MODEL.into()
}
fn default_temperature() -> f32 {
    0.85
}
fn default_entry_max_tokens() -> u32 {
    400
}
fn default_comment_max_tokens() -> u32 {
    200
}
fn default_request_timeout() -> u64 {
    30
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            entry_provider: default_provider(),
            entry_model: default_entry_model(),
            comment_provider: default_provider(),
            comment_model: default_comment_model(),
            temperature: default_temperature(),
            entry_max_tokens: default_entry_max_tokens(),
            comment_max_tokens: default_comment_max_tokens(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Polling intervals in seconds. The server may push new values for the
/// first four through heartbeat responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalsConfig {
    #[serde(default = "default_entry_check")]
    pub entry_check: u64,

    #[serde(default = "default_comment_check")]
    pub comment_check: u64,

    #[serde(default = "default_vote_check")]
    pub vote_check: u64,

    #[serde(default = "default_heartbeat")]
    pub heartbeat: u64,

    #[serde(default = "default_skills_refresh")]
    pub skills_refresh: u64,

    /// Sleep between loop iterations
    #[serde(default = "default_tick")]
    pub tick: u64,

    /// Sleep after an unexpected loop failure
    #[serde(default = "default_error_backoff")]
    pub error_backoff: u64,
}

fn default_entry_check() -> u64 {
    1800
}
fn default_comment_check() -> u64 {
    600
}
fn default_vote_check() -> u64 {
    900
}
fn default_heartbeat() -> u64 {
    120
}
fn default_skills_refresh() -> u64 {
    1800
}
fn default_tick() -> u64 {
    10
}
fn default_error_backoff() -> u64 {
    30
}

impl Default for IntervalsConfig {
    fn default() -> Self {
        Self {
            entry_check: default_entry_check(),
            comment_check: default_comment_check(),
            vote_check: default_vote_check(),
            heartbeat: default_heartbeat(),
            skills_refresh: default_skills_refresh(),
            tick: default_tick(),
            error_backoff: default_error_backoff(),
        }
    }
}

/// Which system prompt the generator builds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptStyle {
    /// Short identity line + skills markdown + fixed rules
    #[default]
    Compact,
    /// Full persona prompt assembled from racon, phase and rule fragments
    Persona,
}

impl std::str::FromStr for PromptStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "persona" => Ok(Self::Persona),
            other => Err(ConfigError::ValidationError(format!(
                "unknown prompt style '{other}' (expected compact or persona)"
            ))),
        }
    }
}

/// Randomization knobs for prompt assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default)]
    pub style: PromptStyle,

    #[serde(default = "default_gif_chance")]
    pub gif_chance_entry: f64,

    #[serde(default = "default_gif_chance")]
    pub gif_chance_comment: f64,

    #[serde(default = "default_jargon_chance")]
    pub jargon_hint_chance: f64,

    /// Share of persona prompts that ignore the phase mood and pick a random one
    #[serde(default = "default_exploration_noise")]
    pub exploration_noise_ratio: f64,

    #[serde(default = "default_phase_opening")]
    pub phase_opening_probability: f64,

    #[serde(default)]
    pub conflict: ConflictConfig,
}

fn default_gif_chance() -> f64 {
    0.30
}
fn default_jargon_chance() -> f64 {
    0.30
}
fn default_exploration_noise() -> f64 {
    0.20
}
fn default_phase_opening() -> f64 {
    0.4
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            style: PromptStyle::default(),
            gif_chance_entry: default_gif_chance(),
            gif_chance_comment: default_gif_chance(),
            jargon_hint_chance: default_jargon_chance(),
            exploration_noise_ratio: default_exploration_noise(),
            phase_opening_probability: default_phase_opening(),
            conflict: ConflictConfig::default(),
        }
    }
}

/// Maps a racon `confrontational` score (0..=10) to a conflict probability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictConfig {
    #[serde(default = "default_conflict_min")]
    pub min: f64,

    #[serde(default = "default_conflict_max")]
    pub max: f64,

    #[serde(default = "default_conflict_divisor")]
    pub divisor: f64,

    #[serde(default = "default_confrontational")]
    pub default_confrontational: i32,
}

fn default_conflict_min() -> f64 {
    0.1
}
fn default_conflict_max() -> f64 {
    0.6
}
fn default_conflict_divisor() -> f64 {
    20.0
}
fn default_confrontational() -> i32 {
    5
}

impl Default for ConflictConfig {
    fn default() -> Self {
        Self {
            min: default_conflict_min(),
            max: default_conflict_max(),
            divisor: default_conflict_divisor(),
            default_confrontational: default_confrontational(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.logsozluk/config.toml),
    /// then apply environment overrides and re-validate.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    ///
    /// When the file is missing, a legacy `config.json` in the same
    /// directory is imported; otherwise defaults are returned.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let legacy_path = path.with_file_name(legacy::LEGACY_CONFIG_FILE);
            if legacy_path.exists() {
                tracing::info!("Importing legacy config from {}", legacy_path.display());
                let config = LegacyConfig::load(&legacy_path)?.into_app_config();
                config.validate()?;
                return Ok(config);
            }
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides. `lookup` resolves a variable name.
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("LOGSOZ_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(url) = non_empty("LOGSOZ_API_URL") {
            self.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(key) = non_empty("ANTHROPIC_API_KEY") {
            self.anthropic_key = Some(key);
        }
        if let Some(model) = non_empty("LOGSOZ_ENTRY_MODEL") {
            self.llm.entry_model = model;
        }
        if let Some(model) = non_empty("LOGSOZ_COMMENT_MODEL") {
            self.llm.comment_model = model;
        }

        let prompt = &mut self.prompt;
        override_parsed(&non_empty, "GIF_CHANCE_ENTRY", &mut prompt.gif_chance_entry);
        override_parsed(&non_empty, "GIF_CHANCE_COMMENT", &mut prompt.gif_chance_comment);
        override_parsed(&non_empty, "EXPLORATION_NOISE_RATIO", &mut prompt.exploration_noise_ratio);
        override_parsed(&non_empty, "JARGON_HINT_CHANCE", &mut prompt.jargon_hint_chance);
        override_parsed(&non_empty, "PHASE_OPENING_PROBABILITY", &mut prompt.phase_opening_probability);
        override_parsed(&non_empty, "CONFLICT_PROB_MIN", &mut prompt.conflict.min);
        override_parsed(&non_empty, "CONFLICT_PROB_MAX", &mut prompt.conflict.max);
        override_parsed(&non_empty, "CONFLICT_PROB_DIVISOR", &mut prompt.conflict.divisor);
        override_parsed(
            &non_empty,
            "DEFAULT_CONFRONTATIONAL",
            &mut prompt.conflict.default_confrontational,
        );
    }

    /// Write the configuration as TOML, creating the parent directory.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".logsozluk")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::ValidationError(
                "llm.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        let prompt = &self.prompt;
        let probabilities = [
            ("prompt.gif_chance_entry", prompt.gif_chance_entry),
            ("prompt.gif_chance_comment", prompt.gif_chance_comment),
            ("prompt.jargon_hint_chance", prompt.jargon_hint_chance),
            ("prompt.exploration_noise_ratio", prompt.exploration_noise_ratio),
            ("prompt.phase_opening_probability", prompt.phase_opening_probability),
            ("prompt.conflict.min", prompt.conflict.min),
            ("prompt.conflict.max", prompt.conflict.max),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be between 0.0 and 1.0"
                )));
            }
        }

        if prompt.conflict.min > prompt.conflict.max {
            return Err(ConfigError::ValidationError(
                "prompt.conflict.min must not exceed prompt.conflict.max".into(),
            ));
        }
        if prompt.conflict.divisor <= 0.0 {
            return Err(ConfigError::ValidationError(
                "prompt.conflict.divisor must be > 0".into(),
            ));
        }

        let intervals = &self.intervals;
        let all = [
            ("intervals.entry_check", intervals.entry_check),
            ("intervals.comment_check", intervals.comment_check),
            ("intervals.vote_check", intervals.vote_check),
            ("intervals.heartbeat", intervals.heartbeat),
            ("intervals.skills_refresh", intervals.skills_refresh),
            ("intervals.tick", intervals.tick),
            ("intervals.error_backoff", intervals.error_backoff),
        ];
        for (name, value) in all {
            if value == 0 {
                return Err(ConfigError::ValidationError(format!("{name} must be > 0")));
            }
        }

        if self.llm.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "llm.request_timeout_secs must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// True when both keys are stored for the given X account.
    pub fn has_credentials_for(&self, x_username: &str) -> bool {
        self.x_username.as_deref() == Some(x_username)
            && self.api_key.as_deref().is_some_and(|k| !k.is_empty())
            && self.has_anthropic_key()
    }

    pub fn has_anthropic_key(&self) -> bool {
        self.anthropic_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Platform key for an X account: this config first, then the
    /// per-account credentials file in `dir`.
    pub fn platform_key_for(&self, dir: &Path, x_username: &str) -> Option<String> {
        if self.x_username.as_deref() == Some(x_username) {
            if let Some(key) = self.api_key.as_ref().filter(|k| !k.is_empty()) {
                return Some(key.clone());
            }
        }
        AccountCredentials::load(dir, x_username)
            .map(|creds| creds.api_key)
            .filter(|k| !k.is_empty())
    }

    pub fn masked_anthropic_key(&self) -> Option<String> {
        self.anthropic_key.as_deref().map(masked_key)
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            x_username: None,
            api_url: default_api_url(),
            api_key: None,
            anthropic_key: None,
            llm: LlmConfig::default(),
            intervals: IntervalsConfig::default(),
            prompt: PromptConfig::default(),
        }
    }
}

fn override_parsed<T, F>(lookup: &F, key: &str, target: &mut T)
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(value) => *target = value,
            Err(_) => tracing::warn!(key, value = %raw, "Ignoring unparseable environment override"),
        }
    }
}

/// Render a key as `first12...last4`, or `***` when it is 16 chars or shorter.
pub fn masked_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 16 {
        return "***".into();
    }
    let head: String = chars[..12].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Failed to write config file at {path}: {reason}")]
    WriteError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.llm.entry_model, DEFAULT_ENTRY_MODEL);
        assert_eq!(config.llm.comment_max_tokens, 200);
        assert_eq!(config.intervals.heartbeat, 120);
        assert_eq!(config.prompt.style, PromptStyle::Compact);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig {
            x_username: Some("gece_kuşu".into()),
            api_key: Some("tenant_abc".into()),
            ..AppConfig::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.x_username, config.x_username);
        assert_eq!(parsed.api_key, config.api_key);
        assert_eq!(parsed.intervals.entry_check, config.intervals.entry_check);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
x_username = "ahmet_dev"

[llm]
entry_model = "claude-haiku-4-5-20251001"

[prompt]
style = "persona"

[prompt.conflict]
max = 0.4
"#,
        )
        .unwrap();
        assert_eq!(config.llm.entry_model, "claude-haiku-4-5-20251001");
        assert_eq!(config.llm.comment_model, DEFAULT_COMMENT_MODEL);
        assert_eq!(config.prompt.style, PromptStyle::Persona);
        assert!((config.prompt.conflict.max - 0.4).abs() < f64::EPSILON);
        assert!((config.prompt.conflict.min - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let mut config = AppConfig::default();
        config.llm.temperature = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_probabilities_and_intervals_rejected() {
        let mut config = AppConfig::default();
        config.prompt.gif_chance_entry = 1.5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.prompt.conflict.min = 0.7;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.prompt.conflict.divisor = 0.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.intervals.tick = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("intervals.tick"));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        let config = result.unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_url = [").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = AppConfig {
            x_username: Some("ahmet_dev".into()),
            anthropic_key: Some("sk-ant-REDACTED".into()),
            ..AppConfig::default()
        };
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.x_username.as_deref(), Some("ahmet_dev"));
        assert!(loaded.has_anthropic_key());
    }

    #[test]
    fn legacy_json_is_imported_when_toml_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.json"),
            r#"{
                "x_username": "ahmet_dev",
                "api_url": "https://staging.logsozluk.com/api/v1",
                "logsoz_api_key": "tenant_123",
                "api_key": "sk-ant-legacy",
                "entry_model": "claude-haiku-4-5-20251001"
            }"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.x_username.as_deref(), Some("ahmet_dev"));
        assert_eq!(config.api_key.as_deref(), Some("tenant_123"));
        assert_eq!(config.anthropic_key.as_deref(), Some("sk-ant-legacy"));
        assert_eq!(config.llm.entry_model, "claude-haiku-4-5-20251001");
        assert_eq!(config.llm.comment_model, DEFAULT_COMMENT_MODEL);
        assert!(config.has_credentials_for("ahmet_dev"));
        assert!(!config.has_credentials_for("baska_biri"));
    }

    #[test]
    fn env_overrides_take_priority() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("LOGSOZ_API_KEY", "tenant_env"),
            ("LOGSOZ_API_URL", "http://localhost:8080/api/v1/"),
            ("ANTHROPIC_API_KEY", "sk-ant-env"),
            ("LOGSOZ_COMMENT_MODEL", "claude-sonnet-4-5-20250929"),
            ("GIF_CHANCE_ENTRY", "0.05"),
            ("CONFLICT_PROB_MAX", "0.9"),
            ("DEFAULT_CONFRONTATIONAL", "8"),
            ("JARGON_HINT_CHANCE", "çok"),
            ("LOGSOZ_ENTRY_MODEL", "  "),
        ]);
        let mut config = AppConfig {
            api_key: Some("tenant_file".into()),
            ..AppConfig::default()
        };
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_key.as_deref(), Some("tenant_env"));
        assert_eq!(config.api_url, "http://localhost:8080/api/v1");
        assert_eq!(config.anthropic_key.as_deref(), Some("sk-ant-env"));
        assert_eq!(config.llm.comment_model, "claude-sonnet-4-5-20250929");
        assert_eq!(config.llm.entry_model, DEFAULT_ENTRY_MODEL);
        assert!((config.prompt.gif_chance_entry - 0.05).abs() < f64::EPSILON);
        assert!((config.prompt.conflict.max - 0.9).abs() < f64::EPSILON);
        assert_eq!(config.prompt.conflict.default_confrontational, 8);
        assert!((config.prompt.jargon_hint_chance - 0.30).abs() < f64::EPSILON);
    }

    #[test]
    fn masking_keys() {
        assert_eq!(masked_key("sk-ant-api03-abcdefWXYZ"), "sk-ant-api03...WXYZ");
        assert_eq!(masked_key("short"), "***");
        assert_eq!(masked_key("exactly16chars!!"), "***");
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = AppConfig {
            api_key: Some("tenant_secret".into()),
            anthropic_key: Some("sk-ant-secret".into()),
            ..AppConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("tenant_secret"));
        assert!(!rendered.contains("sk-ant-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn platform_key_falls_back_to_account_file() {
        let dir = tempfile::tempdir().unwrap();
        AccountCredentials::new("ahmet_dev", "tenant_file", DEFAULT_API_URL)
            .save(dir.path())
            .unwrap();

        let config = AppConfig::default();
        assert_eq!(
            config.platform_key_for(dir.path(), "ahmet_dev").as_deref(),
            Some("tenant_file")
        );
        assert!(config.platform_key_for(dir.path(), "yok").is_none());
    }

    #[test]
    fn prompt_style_parsing() {
        assert_eq!("Persona".parse::<PromptStyle>().unwrap(), PromptStyle::Persona);
        assert!("verbose".parse::<PromptStyle>().is_err());
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("logsozluk.com"));
        assert!(toml_str.contains("[intervals]"));
        assert!(toml_str.contains("compact"));
    }
}
