//! `log config`: show, locate and validate the configuration.

use logsoz_config::{AppConfig, masked_key};
use logsoz_providers::SUPPORTED_PROVIDERS;

/// Non-fatal problems with an otherwise valid configuration.
pub fn warnings(config: &AppConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.x_username.is_none() {
        warnings.push("X hesabı yok (log run ile kurulum yap)".to_string());
    }
    if config.api_key.as_deref().is_none_or(str::is_empty) {
        warnings.push("Platform API key yok (LOGSOZ_API_KEY veya log run)".to_string());
    }
    if !config.has_anthropic_key() {
        warnings.push("Anthropic API key yok (ANTHROPIC_API_KEY)".to_string());
    }
    for (kind, provider) in [
        ("entry", &config.llm.entry_provider),
        ("comment", &config.llm.comment_provider),
    ] {
        if !SUPPORTED_PROVIDERS.contains(&provider.to_lowercase().as_str()) {
            warnings.push(format!("Desteklenmeyen {kind} provider: {provider}"));
        }
    }
    warnings
}

/// The configuration as TOML with both keys masked.
pub fn masked_toml(config: &AppConfig) -> Result<String, toml::ser::Error> {
    let mut shown = config.clone();
    shown.api_key = shown.api_key.as_deref().map(masked_key);
    shown.anthropic_key = shown.anthropic_key.as_deref().map(masked_key);
    toml::to_string_pretty(&shown)
}

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Konfigürasyon doğrulanıyor...");

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            println!("   ❌ Config hatası: {e}");
            return Err(e.into());
        }
    };
    println!("   ✅ Config okundu");

    let warnings = warnings(&config);
    if warnings.is_empty() {
        println!("   ✅ Tüm kontroller geçti");
    } else {
        println!();
        for w in &warnings {
            println!("   ⚠️  {w}");
        }
    }

    println!();
    println!("   API:       {}", config.api_url);
    println!("   Entry:     {}/{}", config.llm.entry_provider, config.llm.entry_model);
    println!("   Comment:   {}/{}", config.llm.comment_provider, config.llm.comment_model);
    println!(
        "   Aralıklar: entry={}s yorum={}s oy={}s yoklama={}s",
        config.intervals.entry_check,
        config.intervals.comment_check,
        config.intervals.vote_check,
        config.intervals.heartbeat
    );

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    println!("{}", masked_toml(&config)?);
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_is_valid() {
        let path = AppConfig::config_path();
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn fresh_config_warns_about_missing_keys() {
        let warnings = warnings(&AppConfig::default());
        assert_eq!(warnings.len(), 3);
        assert!(warnings[2].contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn unsupported_provider_is_flagged() {
        let mut config = AppConfig {
            x_username: Some("ahmet".into()),
            api_key: Some("tenant_abc".into()),
            anthropic_key: Some("sk-ant-x".into()),
            ..AppConfig::default()
        };
        assert!(warnings(&config).is_empty());
        config.llm.comment_provider = "openai".into();
        assert_eq!(warnings(&config), vec!["Desteklenmeyen comment provider: openai"]);
    }

    #[test]
    fn shown_toml_hides_keys() {
        let config = AppConfig {
            api_key: Some("tenant_0123456789abcdefXYZW".into()),
            anthropic_key: Some("sk-ant-REDACTED".into()),
            ..AppConfig::default()
        };
        let out = masked_toml(&config).unwrap();
        assert!(out.contains("tenant_01234...XYZW"));
        assert!(out.contains("sk-ant-api03...1234"));
        assert!(!out.contains("secretsecret"));
    }
}
