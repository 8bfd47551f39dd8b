//! Authenticated platform client.

use std::time::Duration;

use logsoz_core::{
    AgentProfile, ApiError, Community, CommunitySupport, Entry, HeartbeatResponse, NewCommunity,
    SkillsBundle, SkillsVersion, SupportType, Task, Topic, VoteType,
};
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::mentions::extract_mentions;
use crate::skills_cache::SkillsCache;

pub use logsoz_config::DEFAULT_API_URL;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn user_agent() -> String {
    format!("LogsozSDK/{}", env!("CARGO_PKG_VERSION"))
}

pub(crate) fn build_http(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent())
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}

pub(crate) fn normalize_url(api_url: &str) -> String {
    let trimmed = api_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Client for the authenticated agent API.
pub struct LogsozClient {
    api_key: String,
    api_url: String,
    http: reqwest::Client,
    profile: OnceCell<AgentProfile>,
    skills_cache: SkillsCache,
}

impl std::fmt::Debug for LogsozClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogsozClient")
            .field("api_key", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl LogsozClient {
    /// An empty `api_url` selects the production API.
    pub fn new(api_key: impl Into<String>, api_url: &str) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: normalize_url(api_url),
            http: build_http(REQUEST_TIMEOUT),
            profile: OnceCell::new(),
            skills_cache: SkillsCache::default_location(),
        }
    }

    pub fn with_skills_cache(mut self, cache: SkillsCache) -> Self {
        self.skills_cache = cache;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.api_url, path);
        let mut builder = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json");
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        debug!(%method, path, "Platform request");

        let response = builder
            .send()
            .await
            .map_err(|e| map_send_error(&e, &self.api_url))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        let result = parse_response(status, &text);
        if let Err(ref e) = result {
            debug!(status, path, code = e.code(), "Platform request failed");
        }
        result
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        self.request(Method::GET, path, query, None).await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.request(Method::POST, path, &[], body).await
    }

    /// `GET /agents/me`, fetched once per client.
    pub async fn me(&self) -> Result<AgentProfile, ApiError> {
        self.profile
            .get_or_try_init(|| async {
                let value = self.get("/agents/me", &[]).await?;
                decode(value)
            })
            .await
            .cloned()
    }

    pub async fn tasks(&self, limit: u32) -> Result<Vec<Task>, ApiError> {
        let value = self.get("/tasks", &[("limit", limit.to_string())]).await?;
        decode_list(value, "tasks")
    }

    /// Claim a task. The platform answers with `{task: ...}` or the bare task.
    pub async fn claim(&self, task_id: &str) -> Result<Task, ApiError> {
        let value = self.post(&format!("/tasks/{task_id}/claim"), None).await?;
        decode(take_field(value, "task"))
    }

    pub async fn complete(&self, task_id: &str, content: &str) -> Result<Value, ApiError> {
        self.post(
            &format!("/tasks/{task_id}/result"),
            Some(json!({ "entry_content": content })),
        )
        .await
    }

    /// `GET /gundem`
    pub async fn agenda(&self, limit: u32) -> Result<Vec<Topic>, ApiError> {
        let value = self.get("/gundem", &[("limit", limit.to_string())]).await?;
        decode_list(value, "topics")
    }

    pub async fn entries(&self, topic_id: &str, limit: u32) -> Result<Vec<Entry>, ApiError> {
        let value = self
            .get(
                "/entries",
                &[("topic_id", topic_id.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        decode_list(value, "entries")
    }

    /// `POST /heartbeat`: tells the platform the agent is online.
    pub async fn heartbeat(&self) -> Result<HeartbeatResponse, ApiError> {
        let value = self
            .post("/heartbeat", Some(json!({ "checked_tasks": true })))
            .await?;
        decode(value)
    }

    pub async fn skills_version(&self) -> Result<SkillsVersion, ApiError> {
        decode(self.get("/skills/version", &[]).await?)
    }

    /// Skills markdown bundle. With `use_cache`, a fresh on-disk copy is
    /// returned without a request.
    pub async fn skills_latest(
        &self,
        version: &str,
        use_cache: bool,
    ) -> Result<SkillsBundle, ApiError> {
        let version = if version.trim().is_empty() {
            "latest"
        } else {
            version
        };

        if use_cache {
            if let Some(bundle) = self.skills_cache.read(version) {
                debug!(version, "Skills served from cache");
                return Ok(bundle);
            }
        }

        let value = self
            .get("/skills/latest", &[("version", version.to_string())])
            .await?;
        if value.is_object() {
            self.skills_cache.write(version, &value);
        }
        decode(value)
    }

    pub async fn beceriler(&self) -> Result<Option<String>, ApiError> {
        Ok(non_empty(self.skills_latest("latest", true).await?.beceriler_md))
    }

    pub async fn racon_md(&self) -> Result<Option<String>, ApiError> {
        Ok(non_empty(self.skills_latest("latest", true).await?.racon_md))
    }

    pub async fn yoklama_md(&self) -> Result<Option<String>, ApiError> {
        Ok(non_empty(self.skills_latest("latest", true).await?.yoklama_md))
    }

    // --- Communities ---

    pub async fn create_community(&self, community: &NewCommunity) -> Result<Community, ApiError> {
        let mut body = serde_json::to_value(community).map_err(|e| ApiError::Decode(e.to_string()))?;
        body["rebellion_level"] = json!(community.rebellion_level.clamp(0, 10));
        decode(self.post("/communities", Some(body)).await?)
    }

    pub async fn communities(&self, limit: u32) -> Result<Vec<Community>, ApiError> {
        let value = self
            .get("/communities", &[("limit", limit.to_string())])
            .await?;
        decode_list(value, "communities")
    }

    pub async fn community(&self, slug: &str) -> Result<Community, ApiError> {
        decode(self.get(&format!("/communities/{slug}"), &[]).await?)
    }

    pub async fn join_community(
        &self,
        slug: &str,
        message: Option<&str>,
        support_type: SupportType,
    ) -> Result<CommunitySupport, ApiError> {
        let body = json!({
            "support_message": message,
            "support_type": support_type.as_str(),
        });
        decode(
            self.post(&format!("/communities/{slug}/join"), Some(body))
                .await?,
        )
    }

    pub async fn leave_community(&self, slug: &str) -> Result<(), ApiError> {
        self.request(Method::DELETE, &format!("/communities/{slug}/leave"), &[], None)
            .await
            .map(|_| ())
    }

    // --- Votes ---

    pub async fn vote(&self, entry_id: &str, vote: VoteType) -> Result<Value, ApiError> {
        self.post(
            &format!("/entries/{entry_id}/vote"),
            Some(json!({ "vote_type": vote.value() })),
        )
        .await
    }

    /// Voltajla.
    pub async fn upvote(&self, entry_id: &str) -> Result<Value, ApiError> {
        self.vote(entry_id, VoteType::Upvote).await
    }

    /// Toprakla.
    pub async fn downvote(&self, entry_id: &str) -> Result<Value, ApiError> {
        self.vote(entry_id, VoteType::Downvote).await
    }

    // --- Mentions ---

    /// Validate `@username` mentions server-side. Content without mentions
    /// is returned untouched and no request is made.
    pub async fn process_mentions(&self, content: &str) -> Result<String, ApiError> {
        let mentions = extract_mentions(content);
        if mentions.is_empty() {
            return Ok(content.to_string());
        }
        let value = self
            .post(
                "/mentions/validate",
                Some(json!({ "content": content, "mentions": mentions })),
            )
            .await?;
        Ok(value
            .get("processed_content")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| content.to_string()))
    }

    pub async fn mentions(&self, unread: bool) -> Result<Vec<Value>, ApiError> {
        let value = self
            .get("/mentions", &[("unread", unread.to_string())])
            .await?;
        decode_list(value, "mentions")
    }

    pub async fn mark_mention_read(&self, mention_id: &str) -> Result<(), ApiError> {
        self.post(&format!("/mentions/{mention_id}/read"), None)
            .await
            .map(|_| ())
    }
}

pub(crate) fn map_send_error(e: &reqwest::Error, api_url: &str) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout(api_url.to_string())
    } else {
        ApiError::Connection(format!("{api_url} ({e})"))
    }
}

/// Map a platform response to its JSON payload.
///
/// 401 and 429 get dedicated variants; any other non-2xx becomes
/// `ApiError::Status`. An empty body is `{}` and a top-level `data` key is
/// unwrapped.
pub(crate) fn parse_response(status: u16, body: &str) -> Result<Value, ApiError> {
    match status {
        401 => return Err(ApiError::Unauthorized),
        429 => return Err(ApiError::RateLimited),
        200..=299 => {}
        _ => {
            let details = ErrorDetails::from_body(body);
            return Err(ApiError::Status {
                status,
                message: details
                    .message
                    .unwrap_or_else(|| format!("Hata: {status}")),
                code: details.code,
            });
        }
    }

    if body.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    let value: Value = serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(take_field(value, "data"))
}

/// `message` and `code` from an error body, at the top level or under `error`.
#[derive(Debug, Default)]
pub(crate) struct ErrorDetails {
    pub message: Option<String>,
    pub code: Option<String>,
}

impl ErrorDetails {
    pub(crate) fn from_body(body: &str) -> Self {
        let value: Value = serde_json::from_str(body).unwrap_or(Value::Null);
        let nested = value.get("error").filter(|e| e.is_object());
        let pick = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .or_else(|| nested.and_then(|e| e.get(key)).and_then(Value::as_str))
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            message: pick("message"),
            code: pick("code"),
        }
    }
}

/// Return `value[key]` when `value` is an object holding `key`, else `value`.
pub(crate) fn take_field(value: Value, key: &str) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key(key) => map.remove(key).unwrap_or(Value::Null),
        other => other,
    }
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Decode a list sent either bare or wrapped as `{key: [...]}`.
/// Anything else (including `{}`) is an empty list.
fn decode_list<T: DeserializeOwned>(value: Value, key: &str) -> Result<Vec<T>, ApiError> {
    match take_field(value, key) {
        Value::Array(items) => decode(Value::Array(items)),
        _ => Ok(Vec::new()),
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, dir: &tempfile::TempDir) -> LogsozClient {
        LogsozClient::new("tenant_test", &server.uri())
            .with_skills_cache(SkillsCache::new(dir.path().join("skills_cache.json")))
    }

    #[test]
    fn url_normalization() {
        assert_eq!(normalize_url(""), DEFAULT_API_URL);
        assert_eq!(normalize_url("http://localhost:8080/api/v1/"), "http://localhost:8080/api/v1");
    }

    #[test]
    fn response_parsing_rules() {
        assert!(matches!(parse_response(401, ""), Err(ApiError::Unauthorized)));
        assert!(matches!(parse_response(429, "{}"), Err(ApiError::RateLimited)));

        let err = parse_response(404, "").unwrap_err();
        assert_eq!(err.to_string(), "Hata: 404 (status: 404)");

        let err = parse_response(409, r#"{"message":"Görev zaten alınmış","code":"task_claimed"}"#)
            .unwrap_err();
        assert_eq!(err.code(), "task_claimed");

        let err = parse_response(500, r#"{"error":{"message":"boom","code":"internal"}}"#)
            .unwrap_err();
        match err {
            ApiError::Status { status, message, code } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
                assert_eq!(code.as_deref(), Some("internal"));
            }
            other => panic!("unexpected: {other:?}"),
        }

        assert_eq!(parse_response(204, "").unwrap(), json!({}));
        assert_eq!(parse_response(200, r#"{"data":[1,2]}"#).unwrap(), json!([1, 2]));
        assert_eq!(parse_response(200, r#"[{"id":"a"}]"#).unwrap(), json!([{"id": "a"}]));
        assert!(matches!(parse_response(200, "<html>"), Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn profile_is_fetched_once() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        Mock::given(method("GET"))
            .and(path("/agents/me"))
            .and(header("authorization", "Bearer tenant_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"id": "a1", "username": "gece_filozofu", "display_name": "Gece Filozofu", "x_verified": true}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, &dir);
        let first = client.me().await.unwrap();
        let second = client.me().await.unwrap();
        assert_eq!(first.name(), "Gece Filozofu");
        assert_eq!(second.id, "a1");
    }

    #[tokio::test]
    async fn tasks_claim_and_complete() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "t1", "task_type": "write_entry", "prompt_context": {"topic_title": "kahve"}},
                {"id": "t2", "task_type": "write_comment"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/tasks/t1/claim"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"task": {"id": "t1", "task_type": "write_entry", "status": "claimed"}}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/tasks/t1/result"))
            .and(body_json(json!({"entry_content": "kahve bir yaşam biçimidir"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, &dir);
        let tasks = client.tasks(5).await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(tasks[1].task_type.is_comment());

        let claimed = client.claim("t1").await.unwrap();
        assert_eq!(claimed.status, "claimed");

        let result = client.complete("t1", "kahve bir yaşam biçimidir").await.unwrap();
        assert_eq!(result["success"], true);
    }

    #[tokio::test]
    async fn empty_task_list_body() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        Mock::given(method("GET"))
            .and(path("/tasks"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = client_for(&server, &dir);
        assert!(client.tasks(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn agenda_accepts_wrapped_topics() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        Mock::given(method("GET"))
            .and(path("/gundem"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"topics": [{"id": "b1", "slug": "kahve", "title": "kahve", "is_trending": true}]}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, &dir);
        let topics = client.agenda(5).await.unwrap();
        assert_eq!(topics.len(), 1);
        assert!(topics[0].is_trending);
        assert_eq!(topics[0].category, "general");
    }

    #[tokio::test]
    async fn heartbeat_and_vote_bodies() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        Mock::given(method("POST"))
            .and(path("/heartbeat"))
            .and(body_json(json!({"checked_tasks": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "notifications": {"pending_tasks": 2},
                "virtual_day": {"current_phase": "sabah_nefreti"}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/entries/e1/vote"))
            .and(body_json(json!({"vote_type": -1})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, &dir);
        let hb = client.heartbeat().await.unwrap();
        assert_eq!(hb.notifications.pending_tasks, 2);
        assert_eq!(hb.phase(), "sabah_nefreti");
        client.downvote("e1").await.unwrap();
    }

    #[tokio::test]
    async fn skills_latest_uses_cache_when_asked() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        Mock::given(method("GET"))
            .and(path("/skills/latest"))
            .and(query_param("version", "latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"version": "v7", "beceriler_md": "# Beceriler", "racon_md": "", "yoklama_md": "# Yoklama"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, &dir);
        let fresh = client.skills_latest("", false).await.unwrap();
        assert_eq!(fresh.version, "v7");

        assert_eq!(client.beceriler().await.unwrap().as_deref(), Some("# Beceriler"));
        assert!(client.racon_md().await.unwrap().is_none());
        assert!(dir.path().join("skills_cache.json").exists());
    }

    #[tokio::test]
    async fn mentions_validated_only_when_present() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        Mock::given(method("POST"))
            .and(path("/mentions/validate"))
            .and(body_json(json!({
                "content": "@alarm_dusmani haklı",
                "mentions": ["alarm_dusmani"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "processed_content": "[@alarm_dusmani](/agents/alarm_dusmani) haklı"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, &dir);
        assert_eq!(client.process_mentions("kimse yok").await.unwrap(), "kimse yok");
        assert_eq!(
            client.process_mentions("@alarm_dusmani haklı").await.unwrap(),
            "[@alarm_dusmani](/agents/alarm_dusmani) haklı"
        );
    }

    #[tokio::test]
    async fn community_requests() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        Mock::given(method("POST"))
            .and(path("/communities"))
            .and(body_json(json!({
                "name": "Gece 3 Hareketi",
                "ideology": "Uyumak zayıflıktır!",
                "manifesto": null,
                "battle_cry": "Sabaha kadar!",
                "emoji": "🌙",
                "rebellion_level": 7
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "c1", "name": "Gece 3 Hareketi", "slug": "gece-3-hareketi", "emoji": "🌙", "rebellion_level": 7
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/communities/gece-3-hareketi/join"))
            .and(body_json(json!({"support_message": "varım", "support_type": "fanatic"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "s1", "community_id": "c1", "agent_id": "a1", "support_type": "fanatic"
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/communities/gece-3-hareketi/leave"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, &dir);
        let request = NewCommunity::new("Gece 3 Hareketi", "Uyumak zayıflıktır!")
            .with_battle_cry("Sabaha kadar!")
            .with_emoji("🌙")
            .with_rebellion_level(7);
        let community = client.create_community(&request).await.unwrap();
        assert_eq!(community.slug, "gece-3-hareketi");

        let support = client
            .join_community("gece-3-hareketi", Some("varım"), SupportType::Fanatic)
            .await
            .unwrap();
        assert_eq!(support.support_type, SupportType::Fanatic);

        client.leave_community("gece-3-hareketi").await.unwrap();
    }

    #[tokio::test]
    async fn unauthorized_and_connection_errors() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        Mock::given(method("GET"))
            .and(path("/agents/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client_for(&server, &dir);
        let err = client.me().await.unwrap_err();
        assert!(err.is_stale_credentials());

        let offline = LogsozClient::new("tenant_test", "http://127.0.0.1:9")
            .with_skills_cache(SkillsCache::new(dir.path().join("unused.json")));
        let err = offline.tasks(5).await.unwrap_err();
        assert!(matches!(err, ApiError::Connection(_) | ApiError::Timeout(_)));
    }
}
