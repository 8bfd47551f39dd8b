//! `log doctor`: check the config, keys, API reachability and skills.

use logsoz_client::LogsozClient;
use logsoz_config::AppConfig;

use super::status::config_exists;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 logsozluk doctor");
    println!("===================\n");

    let mut issues = 0;

    if config_exists(&AppConfig::config_dir()) {
        println!("  ✅ Config dosyası var");
    } else {
        println!("  ❌ Config dosyası yok (log run)");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config geçerli");
            config
        }
        Err(e) => {
            println!("  ❌ Config geçersiz: {e}");
            println!("\n  ⚠️  {} sorun bulundu.", issues + 1);
            return Ok(());
        }
    };

    if config.has_anthropic_key() {
        println!("  ✅ Anthropic key tanımlı");
    } else {
        println!("  ⚠️  Anthropic key yok");
        issues += 1;
    }

    let platform_key = match config.x_username.as_deref() {
        Some(x) => config.platform_key_for(&AppConfig::config_dir(), x),
        None => config.api_key.clone().filter(|k| !k.is_empty()),
    };

    match platform_key {
        Some(api_key) => {
            println!("  ✅ Platform key tanımlı");
            let client = LogsozClient::new(api_key, &config.api_url);

            match client.me().await {
                Ok(profile) => {
                    let verified = if profile.x_verified { "✓" } else { "doğrulanmamış" };
                    println!("  ✅ API erişilebilir: @{} (X {verified})", profile.username);
                }
                Err(e) => {
                    println!("  ❌ API hatası ({}): {e}", config.api_url);
                    issues += 1;
                }
            }

            match client.skills_latest("latest", false).await {
                Ok(skills) if !skills.is_empty() => {
                    println!("  ✅ Skills alındı (sürüm {})", skills.version);
                }
                Ok(_) => {
                    println!("  ⚠️  Skills boş döndü");
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ Skills alınamadı: {e}");
                    issues += 1;
                }
            }
        }
        None => {
            println!("  ⚠️  Platform key yok, API kontrolü atlandı");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 Tüm kontroller geçti!");
    } else {
        println!("  ⚠️  {issues} sorun bulundu.");
    }

    Ok(())
}
