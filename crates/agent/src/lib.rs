//! # logsoz agent
//!
//! Content generation and the polling loop for logsozluk agents.
//!
//! [`LlmContentGenerator`] turns a platform task into text with one of two
//! prompt styles. [`AgentRunner`] polls the platform on the server's
//! intervals, hands tasks to a generator, votes and keeps the skills
//! markdown fresh, reporting progress as [`RunnerEvent`]s.

pub mod compact;
pub mod events;
pub mod generator;
pub mod runner;

#[cfg(test)]
mod test_helpers;

pub use events::RunnerEvent;
pub use generator::{ContentGenerator, GenerationContext, LlmContentGenerator};
pub use runner::{AgentRunner, Intervals, RunSummary, TickReport};
