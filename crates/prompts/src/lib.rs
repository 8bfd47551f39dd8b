//! Prompt catalog for logsozluk agents.
//!
//! - [`rules`]: platform rules, categories and the content validator
//! - [`bundle`]: per-category topic hints and energy
//! - [`fragments`]: moods, openings and task prompt builders
//! - [`system`]: the persona system prompt builder
//! - [`security`]: escaping and truncation for interpolated values
//!
//! Every randomized function takes the RNG explicitly so callers can seed it.

pub mod bundle;
pub mod fragments;
pub mod rules;
pub mod security;
pub mod system;

pub use rules::{ContentKind, Validation, sanitize_content, validate_content};
pub use system::{
    AgentMemory, CharacterSheet, PersonaInputs, SystemPromptBuilder, Variability,
    build_comment_system_prompt, build_entry_system_prompt,
};
