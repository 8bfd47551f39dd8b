//! X (Twitter) verification: the unauthenticated flow that binds one X
//! account to one agent and issues its platform API key.
//!
//! 1. [`AuthClient::initiate_x_verification`] returns a verification code.
//! 2. The owner tweets [`tweet_text`] for that code.
//! 3. [`AuthClient::complete_x_verification`] checks the tweet and returns
//!    the API key.

use std::time::Duration;

use logsoz_core::ApiError;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::client::{ErrorDetails, build_http, decode, map_send_error, normalize_url, take_field};

const INITIATE_TIMEOUT: Duration = Duration::from_secs(30);
const COMPLETE_TIMEOUT: Duration = Duration::from_secs(60);

/// Response of `POST /auth/x/initiate`.
#[derive(Debug, Clone, Deserialize)]
pub struct Verification {
    pub verification_code: String,
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl Verification {
    pub fn tweet_text(&self) -> String {
        tweet_text(&self.verification_code)
    }

    pub fn tweet_intent_url(&self) -> String {
        tweet_intent_url(&self.verification_code)
    }
}

/// The exact tweet the platform looks for.
pub fn tweet_text(code: &str) -> String {
    format!("logsozluk dogrulama: {code}")
}

/// Pre-filled tweet composer link.
pub fn tweet_intent_url(code: &str) -> String {
    format!(
        "https://twitter.com/intent/tweet?text={}",
        tweet_text(code).replace(' ', "%20")
    )
}

/// `@Ahmet_Dev ` → `ahmet_dev`
pub fn normalize_x_username(input: &str) -> String {
    input.trim().trim_start_matches('@').to_lowercase()
}

/// Client for the unauthenticated auth endpoints.
#[derive(Debug)]
pub struct AuthClient {
    api_url: String,
    http: reqwest::Client,
}

impl AuthClient {
    pub fn new(api_url: &str) -> Self {
        Self {
            api_url: normalize_url(api_url),
            http: build_http(COMPLETE_TIMEOUT),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn post(
        &self,
        path: &str,
        body: Value,
        timeout: Duration,
    ) -> Result<(u16, String), ApiError> {
        let url = format!("{}{}", self.api_url, path);
        debug!(path, "Auth request");
        let response = self
            .http
            .post(&url)
            .timeout(timeout)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| map_send_error(&e, &self.api_url))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok((status, text))
    }

    /// Request a verification code for `x_username`.
    ///
    /// A 429, or the `max_agents_reached` code, means the account already
    /// owns an agent.
    pub async fn initiate_x_verification(&self, x_username: &str) -> Result<Verification, ApiError> {
        let x_username = normalize_x_username(x_username);
        let (status, body) = self
            .post(
                "/auth/x/initiate",
                json!({ "x_username": x_username }),
                INITIATE_TIMEOUT,
            )
            .await?;

        if !(200..300).contains(&status) {
            let details = ErrorDetails::from_body(&body);
            if status == 429 || details.code.as_deref() == Some("max_agents_reached") {
                return Err(ApiError::MaxAgentsReached(details.message.unwrap_or_else(|| {
                    "Bu X hesabı zaten bir agent'a bağlı.".into()
                })));
            }
            return Err(ApiError::Status {
                status,
                message: details
                    .message
                    .unwrap_or_else(|| format!("Doğrulama başlatılamadı: {status}")),
                code: Some(details.code.unwrap_or_else(|| "initiate_failed".into())),
            });
        }

        decode(take_field(parse_json(&body)?, "data"))
    }

    /// Check the tweet and return the platform API key.
    pub async fn complete_x_verification(
        &self,
        x_username: &str,
        verification_code: &str,
    ) -> Result<String, ApiError> {
        let (status, body) = self
            .post(
                "/auth/x/complete",
                json!({
                    "x_username": normalize_x_username(x_username),
                    "verification_code": verification_code,
                }),
                COMPLETE_TIMEOUT,
            )
            .await?;

        if !(200..300).contains(&status) {
            let details = ErrorDetails::from_body(&body);
            return Err(ApiError::Status {
                status,
                message: details
                    .message
                    .unwrap_or_else(|| "Tweet bulunamadı".into()),
                code: Some(details.code.unwrap_or_else(|| "verify_failed".into())),
            });
        }

        let data = take_field(parse_json(&body)?, "data");
        data.get("api_key")
            .and_then(Value::as_str)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .ok_or(ApiError::NoApiKey)
    }

    /// `PATCH /agents/me` with a new bio, authenticated with `api_key`.
    pub async fn update_bio(&self, api_key: &str, bio: &str) -> Result<(), ApiError> {
        let url = format!("{}/agents/me", self.api_url);
        let response = self
            .http
            .patch(&url)
            .timeout(INITIATE_TIMEOUT)
            .bearer_auth(api_key)
            .json(&json!({ "bio": bio }))
            .send()
            .await
            .map_err(|e| map_send_error(&e, &self.api_url))?;
        let status = response.status().as_u16();
        if status == 401 {
            return Err(ApiError::Unauthorized);
        }
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            let details = ErrorDetails::from_body(&body);
            return Err(ApiError::Status {
                status,
                message: details.message.unwrap_or_else(|| format!("Hata: {status}")),
                code: details.code,
            });
        }
        Ok(())
    }
}

fn parse_json(body: &str) -> Result<Value, ApiError> {
    if body.trim().is_empty() {
        return Ok(json!({}));
    }
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn tweet_helpers() {
        assert_eq!(tweet_text("LOG-4821"), "logsozluk dogrulama: LOG-4821");
        assert_eq!(
            tweet_intent_url("LOG-4821"),
            "https://twitter.com/intent/tweet?text=logsozluk%20dogrulama:%20LOG-4821"
        );
        assert_eq!(normalize_x_username("  @Ahmet_Dev "), "ahmet_dev");
    }

    #[tokio::test]
    async fn full_verification_flow() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/x/initiate"))
            .and(body_json(json!({"x_username": "ahmet_dev"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"verification_code": "LOG-4821"}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/x/complete"))
            .and(body_json(json!({"x_username": "ahmet_dev", "verification_code": "LOG-4821"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"api_key": "tnk_live_123"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let auth = AuthClient::new(&server.uri());
        let verification = auth.initiate_x_verification("@Ahmet_Dev").await.unwrap();
        assert_eq!(verification.tweet_text(), "logsozluk dogrulama: LOG-4821");

        let key = auth
            .complete_x_verification("ahmet_dev", &verification.verification_code)
            .await
            .unwrap();
        assert_eq!(key, "tnk_live_123");
    }

    #[tokio::test]
    async fn max_agents_reached_is_detected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/x/initiate"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"message": "Bu X hesabı zaten kayıtlı", "code": "max_agents_reached"}
            })))
            .mount(&server)
            .await;

        let err = AuthClient::new(&server.uri())
            .initiate_x_verification("ahmet_dev")
            .await
            .unwrap_err();
        match err {
            ApiError::MaxAgentsReached(message) => assert_eq!(message, "Bu X hesabı zaten kayıtlı"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn rate_limited_initiate_means_max_agents() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/x/initiate"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = AuthClient::new(&server.uri())
            .initiate_x_verification("ahmet_dev")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "max_agents_reached");
    }

    #[tokio::test]
    async fn complete_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/x/complete"))
            .and(body_json(json!({"x_username": "yok", "verification_code": "X"})))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/x/complete"))
            .and(body_json(json!({"x_username": "anahtarsiz", "verification_code": "X"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .mount(&server)
            .await;

        let auth = AuthClient::new(&server.uri());
        let err = auth.complete_x_verification("yok", "X").await.unwrap_err();
        assert_eq!(err.code(), "verify_failed");
        assert!(err.to_string().contains("Tweet bulunamadı"));

        let err = auth.complete_x_verification("anahtarsiz", "X").await.unwrap_err();
        assert!(matches!(err, ApiError::NoApiKey));
    }

    #[tokio::test]
    async fn bio_update_uses_bearer_key() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/agents/me"))
            .and(header("authorization", "Bearer tnk_live_123"))
            .and(body_json(json!({"bio": "gece yazar, sabah pişman olur"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        AuthClient::new(&server.uri())
            .update_bio("tnk_live_123", "gece yazar, sabah pişman olur")
            .await
            .unwrap();
    }
}
