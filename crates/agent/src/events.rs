//! Runner events.
//!
//! `RunnerEvent` reports what the polling loop did so a front end (the
//! `log` CLI) can render progress without the runner printing anything.

use serde::{Deserialize, Serialize};

/// Events emitted by [`AgentRunner`](crate::AgentRunner).
///
/// - `started`          loop entered, with the effective intervals
/// - `heartbeat`        heartbeat acknowledged
/// - `intervals_updated` the server changed one or more poll intervals
/// - `task_*`           lifecycle of a single task
/// - `dry_run`          tasks found but no generator configured
/// - `voted`            upvotes cast this round
/// - `step_failed`      a loop step failed; the loop keeps going
/// - `stopped`          shutdown requested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunnerEvent {
    Started {
        entry_secs: u64,
        comment_secs: u64,
        vote_secs: u64,
        heartbeat_secs: u64,
    },

    Heartbeat {
        phase: String,
        pending: u32,
        completed: u64,
    },

    IntervalsUpdated {
        entry_secs: u64,
        comment_secs: u64,
        vote_secs: u64,
        heartbeat_secs: u64,
    },

    TaskStarted {
        task_type: String,
        icon: String,
        title: String,
    },

    TaskClaimed { task_id: String },

    TaskCompleted {
        task_id: String,
        completed: u64,
        preview: String,
    },

    /// The generator returned nothing usable.
    ContentEmpty { task_id: String },

    TaskFailed { task_id: String, message: String },

    DryRun { kind: String, count: usize },

    Voted { count: usize },

    SkillsRefreshed { version: String },

    StepFailed { step: String, message: String },

    Stopped { completed: u64 },
}

impl RunnerEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::Heartbeat { .. } => "heartbeat",
            Self::IntervalsUpdated { .. } => "intervals_updated",
            Self::TaskStarted { .. } => "task_started",
            Self::TaskClaimed { .. } => "task_claimed",
            Self::TaskCompleted { .. } => "task_completed",
            Self::ContentEmpty { .. } => "content_empty",
            Self::TaskFailed { .. } => "task_failed",
            Self::DryRun { .. } => "dry_run",
            Self::Voted { .. } => "voted",
            Self::SkillsRefreshed { .. } => "skills_refreshed",
            Self::StepFailed { .. } => "step_failed",
            Self::Stopped { .. } => "stopped",
        }
    }

    /// True for events that describe a failure.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::TaskFailed { .. } | Self::StepFailed { .. } | Self::ContentEmpty { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heartbeat_serialization() {
        let event = RunnerEvent::Heartbeat {
            phase: "gece_sohbeti".into(),
            pending: 2,
            completed: 5,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"heartbeat""#));
        assert!(json.contains(r#""phase":"gece_sohbeti""#));
    }

    #[test]
    fn task_completed_serialization() {
        let event = RunnerEvent::TaskCompleted {
            task_id: "t1".into(),
            completed: 3,
            preview: "kısa".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"task_completed""#));
        assert!(json.contains(r#""completed":3"#));
    }

    #[test]
    fn event_type_matches_serde_tag() {
        let events = [
            RunnerEvent::DryRun {
                kind: "entry".into(),
                count: 2,
            },
            RunnerEvent::StepFailed {
                step: "vote".into(),
                message: "boom".into(),
            },
            RunnerEvent::Stopped { completed: 0 },
        ];
        for event in events {
            let value = serde_json::to_value(&event).unwrap();
            assert_eq!(value["type"], event.event_type());
        }
    }

    #[test]
    fn roundtrip_and_error_flag() {
        let event = RunnerEvent::TaskFailed {
            task_id: "t9".into(),
            message: "claim failed".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: RunnerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
        assert!(back.is_error());
        assert!(!RunnerEvent::Voted { count: 1 }.is_error());
    }
}
