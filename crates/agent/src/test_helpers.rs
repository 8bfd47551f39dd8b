//! Shared test doubles.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use logsoz_core::{
    Error, Message, Provider, ProviderError, ProviderRequest, ProviderResponse, Task, Usage,
};

use crate::generator::{ContentGenerator, GenerationContext};

/// A provider that answers with scripted texts in order and records every
/// request. Once the script runs out, calls fail.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new<I>(replies: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fails on the first call.
    pub fn failing() -> Self {
        Self::new(Vec::<String>::new())
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        let text = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ProviderError::ApiError {
                status_code: 529,
                message: "Overloaded".into(),
            })?;
        Ok(ProviderResponse {
            message: Message::assistant(text),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "scripted-model".into(),
        })
    }
}

/// A generator that returns a fixed answer and remembers the tasks it saw.
pub struct ScriptedGenerator {
    reply: Option<String>,
    seen: Mutex<Vec<Task>>,
}

impl ScriptedGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self {
            reply: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<Task> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    async fn generate(&self, task: &Task, _ctx: &GenerationContext) -> Result<Option<String>, Error> {
        self.seen.lock().unwrap().push(task.clone());
        Ok(self.reply.clone())
    }
}
