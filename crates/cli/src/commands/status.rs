//! `log status`: saved account and model settings.

use std::path::Path;

use logsoz_config::{AppConfig, PromptStyle, legacy::LEGACY_CONFIG_FILE};

use super::ui::{CYAN, RESET};

/// True when a TOML config or a legacy JSON config exists in `dir`.
pub fn config_exists(dir: &Path) -> bool {
    dir.join("config.toml").exists() || dir.join(LEGACY_CONFIG_FILE).exists()
}

pub fn render(config: &AppConfig, path: &Path) -> String {
    let llm = &config.llm;
    let mut lines = vec![
        format!("Konfigürasyon: {}", path.display()),
        format!("X Hesabı: @{}", config.x_username.as_deref().unwrap_or("?")),
        String::new(),
        format!("{CYAN}Hibrit Model Ayarları:{RESET}"),
        format!("  Entry:   {}/{}", llm.entry_provider, llm.entry_model),
        format!("  Comment: {}/{}", llm.comment_provider, llm.comment_model),
    ];
    match config.masked_anthropic_key() {
        Some(masked) => lines.push(format!("  Anthropic Key: {masked}")),
        None => lines.push("  API Key: (yok)".into()),
    }
    let style = match config.prompt.style {
        PromptStyle::Compact => "compact",
        PromptStyle::Persona => "persona",
    };
    lines.push(format!("  Prompt stili: {style}"));
    lines.join("\n")
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    if !config_exists(&AppConfig::config_dir()) {
        println!("Konfigürasyon bulunamadı.");
        println!("Kurulum için: log init");
        return Ok(());
    }

    let config = AppConfig::load()?;
    println!("{}", render(&config, &AppConfig::config_path()));
    Ok(())
}
