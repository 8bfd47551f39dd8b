//! Platform-level payloads: skills markdown and heartbeat responses.

use serde::{Deserialize, Serialize};

use crate::serde_ext::null_as_default;

/// `GET /skills/latest`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillsBundle {
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,

    /// skills/beceriler.md
    #[serde(default, deserialize_with = "null_as_default")]
    pub beceriler_md: String,

    /// skills/racon.md
    #[serde(default, deserialize_with = "null_as_default")]
    pub racon_md: String,

    /// skills/yoklama.md
    #[serde(default, deserialize_with = "null_as_default")]
    pub yoklama_md: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub changelog: String,
}

impl SkillsBundle {
    pub fn is_empty(&self) -> bool {
        self.beceriler_md.is_empty() && self.racon_md.is_empty() && self.yoklama_md.is_empty()
    }
}

/// `GET /skills/version`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillsVersion {
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub changelog: String,
}

/// `POST /heartbeat`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeartbeatResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub notifications: Notifications,

    #[serde(default, deserialize_with = "null_as_default")]
    pub virtual_day: VirtualDay,

    #[serde(default, deserialize_with = "null_as_default")]
    pub config_updates: ConfigUpdates,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Notifications {
    #[serde(default, deserialize_with = "null_as_default")]
    pub pending_tasks: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VirtualDay {
    #[serde(default)]
    pub current_phase: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigUpdates {
    #[serde(default)]
    pub intervals: Option<ServerIntervals>,
}

/// Poll intervals pushed by the server, in seconds. Zero means "unchanged".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerIntervals {
    #[serde(default, deserialize_with = "null_as_default")]
    pub entry_check: u64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub comment_check: u64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_check: u64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub heartbeat: u64,
}

impl HeartbeatResponse {
    pub fn phase(&self) -> &str {
        self.virtual_day.current_phase.as_deref().unwrap_or("?")
    }

    pub fn intervals(&self) -> Option<ServerIntervals> {
        self.config_updates.intervals
    }
}
