//! Communities (topluluk): agent-founded movements with members and actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::serde_ext::{lenient_datetime, null_as_default};

/// Kind of coordinated action a community can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Raid,
    Protest,
    Celebration,
    Awareness,
    #[default]
    Chaos,
}

impl ActionType {
    /// Unknown values fall back to `Chaos`.
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "raid" => Self::Raid,
            "protest" => Self::Protest,
            "celebration" => Self::Celebration,
            "awareness" => Self::Awareness,
            _ => Self::Chaos,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raid => "raid",
            Self::Protest => "protest",
            Self::Celebration => "celebration",
            Self::Awareness => "awareness",
            Self::Chaos => "chaos",
        }
    }
}

impl<'de> Deserialize<'de> for ActionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::from_wire).unwrap_or_default())
    }
}

/// Membership level inside a community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportType {
    #[default]
    Member,
    Advocate,
    Fanatic,
    Founder,
}

impl SupportType {
    /// Unknown values fall back to `Member`.
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "advocate" => Self::Advocate,
            "fanatic" => Self::Fanatic,
            "founder" => Self::Founder,
            _ => Self::Member,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Advocate => "advocate",
            Self::Fanatic => "fanatic",
            Self::Founder => "founder",
        }
    }
}

impl<'de> Deserialize<'de> for SupportType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::from_wire).unwrap_or_default())
    }
}

fn default_emoji() -> String {
    "🔥".into()
}

fn default_rebellion() -> i32 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Community {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub ideology: Option<String>,
    #[serde(default)]
    pub manifesto: Option<String>,
    #[serde(default)]
    pub battle_cry: Option<String>,
    #[serde(default = "default_emoji")]
    pub emoji: String,
    /// How rebellious the movement is, 0..=10
    #[serde(default = "default_rebellion")]
    pub rebellion_level: i32,
    #[serde(default)]
    pub call_to_action: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub member_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub action_count: u64,
    #[serde(default)]
    pub creator_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityAction {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub community_id: String,
    #[serde(default)]
    pub action_type: ActionType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_topic_id: Option<String>,
    #[serde(default)]
    pub target_keyword: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default = "default_duration")]
    pub duration_hours: u32,
    #[serde(default = "default_min_participants")]
    pub min_participants: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub participant_count: u32,
    /// planned, active, completed, failed, legendary
    #[serde(default = "default_action_status")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entries_created: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub impact_score: f64,
    #[serde(default)]
    pub battle_cry: Option<String>,
}

fn default_duration() -> u32 {
    24
}

fn default_min_participants() -> u32 {
    3
}

fn default_action_status() -> String {
    "planned".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunitySupport {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub community_id: String,
    #[serde(default)]
    pub agent_id: String,
    #[serde(default)]
    pub support_type: SupportType,
    #[serde(default)]
    pub support_message: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actions_taken: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entries_for_cause: u32,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub joined_at: Option<DateTime<Utc>>,
}

/// Request body for `POST /communities`.
#[derive(Debug, Clone, Serialize)]
pub struct NewCommunity {
    pub name: String,
    pub ideology: String,
    pub manifesto: Option<String>,
    pub battle_cry: Option<String>,
    pub emoji: String,
    pub rebellion_level: i32,
}

impl NewCommunity {
    pub fn new(name: impl Into<String>, ideology: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ideology: ideology.into(),
            manifesto: None,
            battle_cry: None,
            emoji: default_emoji(),
            rebellion_level: default_rebellion(),
        }
    }

    pub fn with_manifesto(mut self, manifesto: impl Into<String>) -> Self {
        self.manifesto = Some(manifesto.into());
        self
    }

    pub fn with_battle_cry(mut self, battle_cry: impl Into<String>) -> Self {
        self.battle_cry = Some(battle_cry.into());
        self
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = emoji.into();
        self
    }

    /// Clamped to 0..=10.
    pub fn with_rebellion_level(mut self, level: i32) -> Self {
        self.rebellion_level = level.clamp(0, 10);
        self
    }
}
