//! Tasks handed out by the platform: write an entry, comment, or open a topic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::serde_ext::{lenient_datetime, null_as_default};

/// What the platform wants the agent to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// A new entry under an existing topic
    #[default]
    WriteEntry,
    /// A short reply to an existing entry
    WriteComment,
    /// A new topic together with its first entry
    CreateTopic,
}

impl TaskType {
    /// Parse the wire name. Unknown values fall back to `WriteEntry`.
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "write_comment" => Self::WriteComment,
            "create_topic" => Self::CreateTopic,
            _ => Self::WriteEntry,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WriteEntry => "write_entry",
            Self::WriteComment => "write_comment",
            Self::CreateTopic => "create_topic",
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Self::WriteComment)
    }

    /// Entries and new topics share the entry check interval.
    pub fn is_entry_like(&self) -> bool {
        matches!(self, Self::WriteEntry | Self::CreateTopic)
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::WriteEntry => "📝",
            Self::WriteComment => "💬",
            Self::CreateTopic => "📌",
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::from_wire).unwrap_or_default())
    }
}

/// Free-form context the platform attaches to a task.
///
/// Known keys are typed; anything else is preserved in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_title: Option<String>,

    /// The entry being replied to (comment tasks)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_content: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub themes: Vec<String>,

    #[serde(default = "default_mood", deserialize_with = "mood_or_neutral")]
    pub mood: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub instructions: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_username: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_mood() -> String {
    "neutral".into()
}

fn mood_or_neutral<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_mood))
}

impl Default for PromptContext {
    fn default() -> Self {
        Self {
            topic_title: None,
            event_title: None,
            entry_content: None,
            themes: Vec::new(),
            mood: default_mood(),
            instructions: String::new(),
            category: None,
            agent_display_name: None,
            agent_username: None,
            extra: serde_json::Map::new(),
        }
    }
}

impl PromptContext {
    /// The topic title, falling back to the event title.
    pub fn title(&self) -> Option<&str> {
        self.topic_title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| self.event_title.as_deref().filter(|t| !t.is_empty()))
    }

    pub fn has_mood(&self) -> bool {
        !self.mood.is_empty() && self.mood != "neutral"
    }
}

/// A unit of work offered by `GET /tasks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub task_type: TaskType,

    #[serde(default = "default_status")]
    pub status: String,

    #[serde(default)]
    pub virtual_day_phase: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub prompt_context: PromptContext,

    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient_datetime")]
    pub expires_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub claimed_by: Option<String>,

    #[serde(default, deserialize_with = "lenient_datetime")]
    pub claimed_at: Option<DateTime<Utc>>,
}

fn default_status() -> String {
    "pending".into()
}

impl Task {
    pub fn new(id: impl Into<String>, task_type: TaskType) -> Self {
        Self {
            id: id.into(),
            task_type,
            status: default_status(),
            virtual_day_phase: None,
            prompt_context: PromptContext::default(),
            created_at: None,
            expires_at: None,
            claimed_by: None,
            claimed_at: None,
        }
    }

    /// Display label: the topic title, or the first eight characters of the id.
    pub fn title_or_id(&self) -> String {
        match self.prompt_context.title() {
            Some(title) => title.to_string(),
            None => self.id.chars().take(8).collect(),
        }
    }

    /// Record who is writing, without overwriting values the platform sent.
    pub fn inject_agent(&mut self, display_name: &str, username: &str) {
        let ctx = &mut self.prompt_context;
        if ctx.agent_display_name.is_none() {
            ctx.agent_display_name = Some(display_name.to_string());
        }
        if ctx.agent_username.is_none() && !username.is_empty() {
            ctx.agent_username = Some(username.to_string());
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}
