//! Anthropic Messages API provider.
//!
//! Authenticates with `x-api-key` plus `anthropic-version`, lifts system
//! messages into the top-level `system` field and joins the text blocks of
//! the reply.

use std::time::Duration;

use async_trait::async_trait;
use logsoz_core::error::ProviderError;
use logsoz_core::message::{Message, Role};
use logsoz_core::provider::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MAX_TOKENS: u32 = 400;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const HEALTH_CHECK_MODEL: &str = "claude-haiku-4-5-20251001";

pub struct AnthropicProvider {
    name: String,
    base_url: String,
    api_key: String,
    timeout: Duration,
    client: reqwest::Client,
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            name: "anthropic".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
            client: build_client(DEFAULT_TIMEOUT),
        }
    }

    /// Point at another host (tests, proxies). Trailing slashes are dropped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.client = build_client(timeout);
        self
    }

    /// Split system messages (joined by a blank line) from the conversation.
    fn extract_system(messages: &[Message]) -> (Option<String>, Vec<&Message>) {
        let (system, rest): (Vec<&Message>, Vec<&Message>) =
            messages.iter().partition(|m| m.role == Role::System);
        let system = (!system.is_empty()).then(|| {
            system
                .iter()
                .map(|m| m.content.as_str())
                .collect::<Vec<_>>()
                .join("\n\n")
        });
        (system, rest)
    }

    fn build_body<'a>(request: &'a ProviderRequest) -> MessagesBody<'a> {
        let (system, messages) = Self::extract_system(&request.messages);
        MessagesBody {
            model: &request.model,
            messages: messages
                .into_iter()
                .map(|m| WireMessage {
                    role: if m.role == Role::Assistant { "assistant" } else { "user" },
                    content: &m.content,
                })
                .collect(),
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: Some(request.temperature),
            system,
        }
    }

    async fn post(&self, body: &MessagesBody<'_>) -> Result<reqwest::Response, ProviderError> {
        self.client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(format!("no response within {}s", self.timeout.as_secs()))
                } else {
                    ProviderError::Network(e.to_string())
                }
            })
    }

    fn into_provider_response(resp: MessagesReply) -> ProviderResponse {
        let text = resp
            .content
            .iter()
            .filter_map(|block| match block {
                ReplyBlock::Text { text } => Some(text.as_str()),
                ReplyBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        debug!(
            id = %resp.id,
            stop_reason = resp.stop_reason.as_deref().unwrap_or("unknown"),
            "Anthropic response received"
        );

        let (input, output) = (resp.usage.input_tokens, resp.usage.output_tokens);
        ProviderResponse {
            message: Message::assistant(text),
            usage: Some(Usage {
                prompt_tokens: input,
                completion_tokens: output,
                total_tokens: input + output,
            }),
            model: resp.model,
        }
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let body = Self::build_body(&request);
        debug!(
            provider = "anthropic",
            model = %request.model,
            max_tokens = body.max_tokens,
            "Sending completion request"
        );

        let response = self.post(&body).await?;
        match response.status().as_u16() {
            200 => {}
            429 => return Err(ProviderError::RateLimited { retry_after_secs: 5 }),
            401 | 403 => {
                return Err(ProviderError::AuthenticationFailed(
                    "Invalid Anthropic API key".into(),
                ));
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                warn!(status, body = %message, "Anthropic API error");
                return Err(ProviderError::ApiError {
                    status_code: status,
                    message,
                });
            }
        }

        let reply: MessagesReply = response.json().await.map_err(|e| ProviderError::ApiError {
            status_code: 200,
            message: format!("Failed to parse Anthropic response: {e}"),
        })?;
        Ok(Self::into_provider_response(reply))
    }

    /// One-token request; only a 401 counts as unhealthy.
    async fn health_check(&self) -> Result<bool, ProviderError> {
        let body = MessagesBody {
            model: HEALTH_CHECK_MODEL,
            messages: vec![WireMessage {
                role: "user",
                content: "merhaba",
            }],
            max_tokens: 1,
            temperature: None,
            system: None,
        };
        let response = self.post(&body).await?;
        Ok(response.status().as_u16() != 401)
    }
}

#[derive(Debug, Serialize)]
struct MessagesBody<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesReply {
    #[serde(default)]
    id: String,
    #[serde(default)]
    model: String,
    content: Vec<ReplyBlock>,
    #[serde(default)]
    usage: ReplyUsage,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ReplyBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Default, Deserialize)]
struct ReplyUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn text_response(text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "msg_01",
            "model": "claude-haiku-4-5-20251001",
            "content": [{"type": "text", "text": text}],
            "usage": {"input_tokens": 120, "output_tokens": 30},
            "stop_reason": "end_turn"
        })
    }

    #[test]
    fn constructor() {
        let provider = AnthropicProvider::new("sk-ant-test");
        assert_eq!(provider.name(), "anthropic");
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(provider.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn constructor_with_base_url() {
        let provider = AnthropicProvider::new("sk-ant-test")
            .with_base_url("http://localhost:9000/")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(provider.base_url, "http://localhost:9000");
        assert_eq!(provider.timeout, Duration::from_secs(5));
    }

    #[test]
    fn system_extraction() {
        let messages = vec![
            Message::system("Sen logsozluk'te yazan bir varlıksın."),
            Message::system("Kurallar: Türkçe yaz."),
            Message::user("Başlık: pazartesi"),
        ];
        let (system, rest) = AnthropicProvider::extract_system(&messages);
        assert_eq!(
            system.as_deref(),
            Some("Sen logsozluk'te yazan bir varlıksın.\n\nKurallar: Türkçe yaz.")
        );
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].role, Role::User);
    }

    #[test]
    fn system_extraction_no_system() {
        let messages = vec![Message::user("selam")];
        let (system, rest) = AnthropicProvider::extract_system(&messages);
        assert!(system.is_none());
        assert_eq!(rest.len(), 1);
    }

    #[test]
    fn parse_text_response_joins_blocks() {
        let resp: MessagesReply = serde_json::from_value(serde_json::json!({
            "id": "msg_01",
            "model": "claude-sonnet-4-5-20250929",
            "content": [
                {"type": "text", "text": "ilk"},
                {"type": "thinking", "thinking": "hmm"},
                {"type": "text", "text": "ikinci"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 5}
        }))
        .unwrap();

        let pr = AnthropicProvider::into_provider_response(resp);
        assert_eq!(pr.message.content, "ilk\nikinci");
        assert_eq!(pr.message.role, Role::Assistant);
        assert_eq!(pr.usage.unwrap().total_tokens, 15);
        assert_eq!(pr.model, "claude-sonnet-4-5-20250929");
    }

    #[tokio::test]
    async fn complete_sends_system_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-ant-test"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .and(body_partial_json(serde_json::json!({
                "system": "sys",
                "max_tokens": 200,
                "messages": [{"role": "user", "content": "usr"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("  yorum  ")))
            .expect(1)
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new("sk-ant-test").with_base_url(server.uri());
        let request = ProviderRequest::single_turn("claude-haiku-4-5-20251001", "sys", "usr")
            .with_max_tokens(200);
        let response = provider.complete(request).await.unwrap();
        assert_eq!(response.message.content, "  yorum  ");
    }

    #[tokio::test]
    async fn status_codes_map_to_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "rate"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "bad"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "overloaded"))
            .respond_with(ResponseTemplate::new(529).set_body_string("Overloaded"))
            .mount(&server)
            .await;

        let request = || ProviderRequest::single_turn("m", "s", "u");

        let err = AnthropicProvider::new("rate")
            .with_base_url(server.uri())
            .complete(request())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::RateLimited { .. }));

        let err = AnthropicProvider::new("bad")
            .with_base_url(server.uri())
            .complete(request())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::AuthenticationFailed(_)));

        let err = AnthropicProvider::new("overloaded")
            .with_base_url(server.uri())
            .complete(request())
            .await
            .unwrap_err();
        match err {
            ProviderError::ApiError {
                status_code,
                message,
            } => {
                assert_eq!(status_code, 529);
                assert_eq!(message, "Overloaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn health_check_detects_bad_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new("bad").with_base_url(server.uri());
        assert!(!provider.health_check().await.unwrap());
    }
}
