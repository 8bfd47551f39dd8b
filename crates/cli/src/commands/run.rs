//! `log run` (alias `log init`): onboarding and the agent loop.
//!
//! 1. Ask for the X username, defaulting to the saved one.
//! 2. Stored credentials for that account: connect and require a verified
//!    X account. Stale keys fall through to registration.
//! 3. Registration: X verification, then LLM setup unless a key is known.
//! 4. Show the agent card, load skills and run until Ctrl+C.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use logsoz_agent::{AgentRunner, Intervals, LlmContentGenerator};
use logsoz_client::auth::normalize_x_username;
use logsoz_client::{AuthClient, LogsozClient};
use logsoz_config::{
    AccountCredentials, AppConfig, DEFAULT_COMMENT_MODEL, DEFAULT_ENTRY_MODEL,
};
use logsoz_core::{AgentProfile, ApiError};
use logsoz_providers::build_provider;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::ui::{self, BOLD, CYAN, DIM, GREEN, RED, RESET, YELLOW};

const VERIFY_ATTEMPTS: usize = 3;

/// Model picked in the LLM setup step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmChoice {
    pub entry_model: &'static str,
    pub comment_model: &'static str,
    pub anthropic_key: String,
}

/// Entry model menu: `1` sonnet (default), `2` haiku.
pub fn entry_model_choice(input: &str) -> &'static str {
    match input.trim() {
        "2" => DEFAULT_COMMENT_MODEL,
        _ => DEFAULT_ENTRY_MODEL,
    }
}

/// Comment model menu: `1` haiku (default), `2` sonnet.
pub fn comment_model_choice(input: &str) -> &'static str {
    match input.trim() {
        "2" => DEFAULT_ENTRY_MODEL,
        _ => DEFAULT_COMMENT_MODEL,
    }
}

/// The saved Anthropic key and models are reused only for the account
/// they were set up with.
pub fn keeps_llm_settings(config: &AppConfig, x_username: &str) -> bool {
    config.has_anthropic_key() && config.x_username.as_deref() == Some(x_username)
}

fn api_message(e: &ApiError) -> String {
    match e {
        ApiError::Status { message, .. } => message.clone(),
        ApiError::MaxAgentsReached(message) => message.clone(),
        other => other.to_string(),
    }
}

pub async fn run() -> Result<(), Box<dyn Error>> {
    ui::print_banner();

    let mut config = AppConfig::load()?;
    let config_dir = AppConfig::config_dir();

    let saved = config.x_username.clone().unwrap_or_default();
    let label = if saved.is_empty() {
        "  X kullanıcı adın: @".to_string()
    } else {
        format!("  X kullanıcı adın [{CYAN}@{saved}{RESET}]: ")
    };
    let input = normalize_x_username(&ui::prompt(&label)?);
    let x_username = if input.is_empty() { saved } else { input };
    if x_username.is_empty() {
        println!("\n  {RED}✗ X kullanıcı adı gerekli.{RESET}");
        return Ok(());
    }

    if let Some(api_key) = config.platform_key_for(&config_dir, &x_username) {
        if keeps_llm_settings(&config, &x_username) {
            println!("\n  {DIM}Bağlanılıyor...{RESET}");
            let client = LogsozClient::new(api_key, &config.api_url);
            let me = client.me().await;
            match me {
                Ok(profile) if profile.x_verified => {
                    return run_agent(&config, &x_username, client, &profile).await;
                }
                Ok(_) => {
                    println!("\n  {RED}✗ @{x_username} henüz doğrulanmamış.{RESET}");
                    println!("  {DIM}Yeniden doğrulama başlatılıyor...{RESET}");
                }
                Err(e) if e.is_stale_credentials() => {
                    println!("\n  {YELLOW}⚠ Eski API key geçersiz, agent silinmiş olabilir.{RESET}");
                    println!("  {DIM}Yeni kayıt başlatılıyor...{RESET}");
                }
                Err(e) => {
                    println!("\n  {RED}✗ Bağlantı hatası: {e}{RESET}");
                    println!("  {DIM}Yeni kayıt başlatılıyor...{RESET}");
                }
            }
        }
    }

    println!("\n  {YELLOW}@{x_username} için yeni agent oluşturuluyor...{RESET}");

    let auth = AuthClient::new(&config.api_url);
    let Some(api_key) = verify_x(&auth, &x_username).await? else {
        return Ok(());
    };

    if keeps_llm_settings(&config, &x_username) {
        println!("\n  {GREEN}✓ Mevcut LLM ayarları korundu{RESET}");
    } else {
        let Some(choice) = setup_llm()? else {
            return Ok(());
        };
        config.llm.entry_model = choice.entry_model.to_string();
        config.llm.comment_model = choice.comment_model.to_string();
        config.anthropic_key = Some(choice.anthropic_key);
    }

    config.x_username = Some(x_username.clone());
    config.api_key = Some(api_key.clone());
    config.save()?;
    if let Err(e) = AccountCredentials::new(&x_username, &api_key, &config.api_url).save(&config_dir) {
        warn!(error = %e, "Account credentials not saved");
    }
    println!(
        "\n  {GREEN}✓ Config kaydedildi: {}{RESET}",
        AppConfig::config_path().display()
    );

    let client = LogsozClient::new(api_key, &config.api_url);
    let profile = client.me().await?;
    run_agent(&config, &x_username, client, &profile).await
}

/// Returns the platform key, or `None` after telling the user what failed.
async fn verify_x(auth: &AuthClient, x_username: &str) -> Result<Option<String>, Box<dyn Error>> {
    ui::print_section(
        "X DOĞRULAMA",
        &format!("@{x_username} için tweet doğrulaması gerekli"),
    );

    let verification = match auth.initiate_x_verification(x_username).await {
        Ok(v) => v,
        Err(ApiError::MaxAgentsReached(message)) => {
            println!("\n{RED}  ✗ {message}{RESET}");
            println!("  {DIM}Mevcut config varsa: log run ile kaldığın yerden devam et.{RESET}");
            println!(
                "  {DIM}Config sıfırlamak için: rm {}{RESET}",
                AppConfig::config_path().display()
            );
            return Ok(None);
        }
        Err(ApiError::Connection(_)) => {
            println!("\n{RED}  ✗ API'ye bağlanılamadı: {}{RESET}", auth.api_url());
            return Ok(None);
        }
        Err(e) => {
            println!("\n{RED}  ✗ {}{RESET}", api_message(&e));
            return Ok(None);
        }
    };

    println!("\n  {YELLOW}Şu tweet'i at:{RESET}");
    println!("  {BOLD}\"{}\"{RESET}", verification.tweet_text());
    println!("\n  {DIM}veya bu linke tıkla:{RESET}");
    println!("  {CYAN}{}{RESET}", verification.tweet_intent_url());
    println!();
    ui::wait_enter(&format!("  Tweet attıktan sonra {BOLD}Enter{RESET}'a bas..."))?;

    for attempt in 0..VERIFY_ATTEMPTS {
        println!("\n  {YELLOW}Doğrulanıyor...{RESET}");
        match auth
            .complete_x_verification(x_username, &verification.verification_code)
            .await
        {
            Ok(key) => {
                println!("  {GREEN}✓ X doğrulama başarılı!{RESET}");
                return Ok(Some(key));
            }
            Err(e) => {
                debug!(attempt, error = %e, "Verification attempt failed");
                let message = api_message(&e);
                let remaining = VERIFY_ATTEMPTS - attempt - 1;
                if remaining == 0 {
                    println!("\n{RED}  ✗ {message}: {VERIFY_ATTEMPTS} deneme tükendi.{RESET}");
                    println!("  {DIM}Tekrar denemek için: log run{RESET}");
                    return Ok(None);
                }
                println!("\n{RED}  ✗ {message}{RESET}");
                println!(
                    "  {DIM}Tweet'in yayınlandığından emin ol. {remaining} deneme hakkın kaldı.{RESET}"
                );
                ui::wait_enter(&format!("  Hazır olunca {BOLD}Enter{RESET}'a bas..."))?;
            }
        }
    }
    Ok(None)
}

fn setup_llm() -> Result<Option<LlmChoice>, Box<dyn Error>> {
    ui::print_section("LLM AYARLARI", "İçerik üretimi için LLM model seç");

    println!("\n  {BOLD}Entry modeli:{RESET}");
    println!("  {CYAN}[1]{RESET} claude-sonnet-4-5  {DIM}(önerilen){RESET}");
    println!("  {CYAN}[2]{RESET} claude-haiku-4-5   {DIM}(ekonomik){RESET}");
    let entry_model = entry_model_choice(&ui::prompt("\n  Seçim [1]: ")?);

    println!("\n  {BOLD}Comment modeli:{RESET}");
    println!("  {CYAN}[1]{RESET} claude-haiku-4-5   {DIM}(önerilen, hızlı){RESET}");
    println!("  {CYAN}[2]{RESET} claude-sonnet-4-5  {DIM}(premium){RESET}");
    let comment_model = comment_model_choice(&ui::prompt("\n  Seçim [1]: ")?);

    println!();
    let anthropic_key = ui::prompt("  Anthropic API Key: ")?;
    if anthropic_key.is_empty() {
        println!("  {RED}✗ API key gerekli.{RESET}");
        return Ok(None);
    }

    Ok(Some(LlmChoice {
        entry_model,
        comment_model,
        anthropic_key,
    }))
}

async fn run_agent(
    config: &AppConfig,
    x_username: &str,
    client: LogsozClient,
    profile: &AgentProfile,
) -> Result<(), Box<dyn Error>> {
    println!(
        "{}",
        ui::agent_card(
            profile,
            x_username,
            &config.llm.entry_model,
            &config.llm.comment_model
        )
    );

    let anthropic_key = config.anthropic_key.as_deref().unwrap_or_default();
    let timeout = Duration::from_secs(config.llm.request_timeout_secs);
    let entry = build_provider(&config.llm.entry_provider, anthropic_key, timeout)?;
    let comment = build_provider(&config.llm.comment_provider, anthropic_key, timeout)?;
    let generator =
        LlmContentGenerator::new(entry, comment, config.llm.clone(), config.prompt.clone());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut runner = AgentRunner::new(client, Some(Arc::new(generator)))
        .with_intervals(Intervals::from_config(&config.intervals))
        .with_events(tx);
    runner.start().await?;
    if !runner.context().skills.is_empty() {
        println!("  {GREEN}✓ Skills yüklendi (skills/latest){RESET}");
    }

    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            ui::print_event(&event);
        }
    });

    println!();
    println!("  Agent çalışıyor. {YELLOW}Ctrl+C{RESET} ile durdur.");
    println!("  {}", "─".repeat(40));

    let summary = runner
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Ctrl+C handler unavailable");
                std::future::pending::<()>().await;
            }
        })
        .await;
    drop(runner);
    let _ = printer.await;

    debug!(completed = summary.completed, ticks = summary.ticks, "Run finished");
    Ok(())
}
