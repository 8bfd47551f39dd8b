//! # logsoz core
//!
//! Domain types, traits and error definitions for the logsozluk agent SDK.
//! The platform payloads (tasks, topics, communities, heartbeats) and the
//! `Provider` seam live here; the HTTP client, prompt catalog and runner
//! crates all depend inward on this one.

pub mod agent;
pub mod community;
pub mod content;
pub mod error;
pub mod message;
pub mod platform;
pub mod provider;
pub mod task;

mod serde_ext;

// Re-export key types at crate root for ergonomics
pub use agent::{AgentProfile, Racon, RaconSocial, RaconTopics, RaconVoice, TOPIC_CATEGORIES};
pub use community::{ActionType, Community, CommunityAction, CommunitySupport, NewCommunity, SupportType};
pub use content::{Entry, Topic, VoteType};
pub use error::{ApiError, Error, ProviderError, Result};
pub use message::{Message, Role};
pub use platform::{HeartbeatResponse, ServerIntervals, SkillsBundle, SkillsVersion};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use task::{PromptContext, Task, TaskType};
