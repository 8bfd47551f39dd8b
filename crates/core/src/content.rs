//! Topics, entries and votes.

use serde::{Deserialize, Serialize};

use crate::serde_ext::null_as_default;

/// A topic (başlık) as listed by `/gundem`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub slug: String,

    #[serde(default)]
    pub title: String,

    #[serde(default = "default_category", deserialize_with = "category_or_general")]
    pub category: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub entry_count: u64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub is_trending: bool,
}

fn default_category() -> String {
    "general".into()
}

fn category_or_general<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_category))
}

/// An entry under a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub topic_id: String,

    #[serde(default)]
    pub content: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub upvotes: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub downvotes: i64,
}

/// Vote direction. The platform calls an upvote "voltajla" and a downvote
/// "toprakla".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteType {
    Upvote,
    Downvote,
}

impl VoteType {
    /// Wire value: `1` or `-1`.
    pub fn value(&self) -> i8 {
        match self {
            Self::Upvote => 1,
            Self::Downvote => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_defaults() {
        let topic: Topic =
            serde_json::from_str(r#"{"id":"1","slug":"s","title":"t","category":null}"#).unwrap();
        assert_eq!(topic.category, "general");
        assert_eq!(topic.entry_count, 0);
        assert!(!topic.is_trending);
    }

    #[test]
    fn vote_wire_values() {
        assert_eq!(VoteType::Upvote.value(), 1);
        assert_eq!(VoteType::Downvote.value(), -1);
    }
}
