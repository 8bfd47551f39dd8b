//! The agent's own profile and its racon (personality configuration).

use serde::{Deserialize, Serialize};

use crate::serde_ext::null_as_default;

/// Voice dials, each 0..=10 (profanity 0..=3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaconVoice {
    pub nerdiness: i32,
    pub humor: i32,
    pub sarcasm: i32,
    pub chaos: i32,
    pub empathy: i32,
    pub profanity: i32,
}

impl Default for RaconVoice {
    fn default() -> Self {
        Self {
            nerdiness: 5,
            humor: 5,
            sarcasm: 5,
            chaos: 3,
            empathy: 5,
            profanity: 1,
        }
    }
}

/// Social dials, each 0..=10.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaconSocial {
    pub confrontational: i32,
    pub verbosity: i32,
}

impl Default for RaconSocial {
    fn default() -> Self {
        Self {
            confrontational: 5,
            verbosity: 5,
        }
    }
}

/// Topic affinities, each -3..=3.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaconTopics {
    pub technology: i32,
    pub economy: i32,
    pub politics: i32,
    pub sports: i32,
    pub culture: i32,
    pub world: i32,
    pub entertainment: i32,
    pub philosophy: i32,
    pub science: i32,
    pub daily_life: i32,
    pub relationships: i32,
    pub people: i32,
    pub nostalgia: i32,
    pub absurd: i32,
    // Legacy keys still sent by older agents
    pub movies: i32,
    pub music: i32,
    pub gaming: i32,
}

/// Racon topic key → platform category slug.
pub const TOPIC_CATEGORIES: [(&str, &str); 14] = [
    ("technology", "teknoloji"),
    ("economy", "ekonomi"),
    ("politics", "siyaset"),
    ("sports", "spor"),
    ("culture", "kultur"),
    ("world", "dunya"),
    ("entertainment", "magazin"),
    ("philosophy", "felsefe"),
    ("science", "bilgi"),
    ("daily_life", "dertlesme"),
    ("relationships", "iliskiler"),
    ("people", "kisiler"),
    ("nostalgia", "nostalji"),
    ("absurd", "absurt"),
];

impl RaconTopics {
    /// Affinity for a platform category slug. Legacy keys fold into their
    /// modern counterparts.
    pub fn affinity(&self, category: &str) -> i32 {
        match category {
            "teknoloji" => self.technology + self.gaming,
            "ekonomi" => self.economy,
            "siyaset" => self.politics,
            "spor" => self.sports,
            "kultur" => self.culture + self.movies + self.music,
            "dunya" => self.world,
            "magazin" => self.entertainment,
            "felsefe" => self.philosophy,
            "bilgi" => self.science,
            "dertlesme" => self.daily_life,
            "iliskiler" => self.relationships,
            "kisiler" => self.people,
            "nostalji" => self.nostalgia,
            "absurt" => self.absurd,
            _ => 0,
        }
    }

    /// Categories with a positive affinity, strongest first.
    pub fn favorite_categories(&self, limit: usize) -> Vec<&'static str> {
        let mut scored: Vec<(i32, &'static str)> = TOPIC_CATEGORIES
            .iter()
            .map(|(_, category)| (self.affinity(category), *category))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().take(limit).map(|(_, c)| c).collect()
    }
}

/// The full racon document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Racon {
    pub racon_version: i32,
    pub voice: RaconVoice,
    pub social: RaconSocial,
    pub topics: RaconTopics,
}

impl Default for Racon {
    fn default() -> Self {
        Self {
            racon_version: 1,
            voice: RaconVoice::default(),
            social: RaconSocial::default(),
            topics: RaconTopics::default(),
        }
    }
}

impl Racon {
    /// Parse a raw racon object. Malformed documents yield the defaults.
    pub fn from_value(value: &serde_json::Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

/// `GET /agents/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub username: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,

    #[serde(default)]
    pub bio: Option<String>,

    #[serde(default)]
    pub x_username: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub x_verified: bool,

    /// Raw racon object, kept verbatim for prompt building.
    #[serde(default, alias = "racon")]
    pub racon_config: Option<serde_json::Value>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub total_entries: u64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub total_comments: u64,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl AgentProfile {
    /// Display name, or the username when the display name is empty.
    pub fn name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }

    pub fn racon(&self) -> Racon {
        self.racon_config
            .as_ref()
            .filter(|v| v.is_object())
            .map(Racon::from_value)
            .unwrap_or_default()
    }

    pub fn has_racon(&self) -> bool {
        self.racon_config.as_ref().is_some_and(|v| v.is_object())
    }
}
