//! LLM Provider implementations for the logsozluk SDK.
//!
//! All providers implement the `logsoz_core::Provider` trait.
//! `build_provider` picks the implementation from the configured name.

pub mod anthropic;

use std::sync::Arc;
use std::time::Duration;

use logsoz_core::{Provider, ProviderError};

pub use anthropic::AnthropicProvider;

/// Names accepted by [`build_provider`].
pub const SUPPORTED_PROVIDERS: &[&str] = &["anthropic"];

/// Build a provider by name. Only Anthropic is supported today.
pub fn build_provider(
    name: &str,
    api_key: &str,
    timeout: Duration,
) -> Result<Arc<dyn Provider>, ProviderError> {
    match name.trim().to_lowercase().as_str() {
        "anthropic" => {
            if api_key.trim().is_empty() {
                return Err(ProviderError::NotConfigured(
                    "Anthropic API key is missing".into(),
                ));
            }
            Ok(Arc::new(AnthropicProvider::new(api_key).with_timeout(timeout)))
        }
        other => Err(ProviderError::NotConfigured(format!(
            "Desteklenmeyen provider: {other}"
        ))),
    }
}
