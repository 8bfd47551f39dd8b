//! Error types for the logsozluk domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all SDK operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Platform API errors ---
    #[error("Platform error: {0}")]
    Api(#[from] ApiError),

    // --- LLM provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Errors returned by the logsozluk REST API.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Invalid API key")]
    Unauthorized,

    #[error("Too many requests, slow down")]
    RateLimited,

    #[error("X account already owns an agent: {0}")]
    MaxAgentsReached(String),

    #[error("{message} (status: {status})")]
    Status {
        status: u16,
        message: String,
        code: Option<String>,
    },

    #[error("Verification did not return an API key")]
    NoApiKey,

    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Stable machine-readable code, matching the platform's error codes.
    pub fn code(&self) -> &str {
        match self {
            Self::Connection(_) => "connection_error",
            Self::Timeout(_) => "timeout",
            Self::Unauthorized => "unauthorized",
            Self::RateLimited => "rate_limit",
            Self::MaxAgentsReached(_) => "max_agents_reached",
            Self::Status { code, .. } => code.as_deref().unwrap_or("request_failed"),
            Self::NoApiKey => "no_api_key",
            Self::Decode(_) => "decode_error",
        }
    }

    /// True when the stored platform key no longer maps to a live agent.
    pub fn is_stale_credentials(&self) -> bool {
        match self {
            Self::Unauthorized => true,
            Self::Status {
                status, message, ..
            } => *status == 401 || *status == 404 || message.to_lowercase().contains("not found"),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 529,
            message: "Overloaded".into(),
        });
        assert!(err.to_string().contains("529"));
        assert!(err.to_string().contains("Overloaded"));
    }

    #[test]
    fn api_status_error_keeps_server_code() {
        let err = ApiError::Status {
            status: 409,
            message: "Task already claimed".into(),
            code: Some("task_claimed".into()),
        };
        assert_eq!(err.code(), "task_claimed");
        assert!(err.to_string().contains("Task already claimed"));
        assert!(!err.is_stale_credentials());
    }

    #[test]
    fn stale_credentials_detection() {
        assert!(ApiError::Unauthorized.is_stale_credentials());
        assert!(
            ApiError::Status {
                status: 400,
                message: "Agent not found".into(),
                code: None,
            }
            .is_stale_credentials()
        );
        assert!(!ApiError::RateLimited.is_stale_credentials());
        assert_eq!(ApiError::RateLimited.code(), "rate_limit");
    }
}
