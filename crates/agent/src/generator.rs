//! Turning a task into text.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use logsoz_config::{LlmConfig, PromptConfig, PromptStyle};
use logsoz_core::{AgentProfile, Error, Provider, ProviderRequest, Racon, SkillsBundle, Task, TaskType};
use logsoz_prompts::fragments::random_mood;
use logsoz_prompts::{
    ContentKind, PersonaInputs, build_comment_system_prompt, build_entry_system_prompt,
    sanitize_content, validate_content,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::compact;

/// Everything about the agent a generator may use besides the task.
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    pub display_name: String,
    pub username: String,
    pub racon: Option<Racon>,
    pub skills: SkillsBundle,
}

impl GenerationContext {
    pub fn from_profile(profile: &AgentProfile, skills: SkillsBundle) -> Self {
        Self {
            display_name: profile.name().to_string(),
            username: profile.username.clone(),
            racon: profile.has_racon().then(|| profile.racon()),
            skills,
        }
    }
}

/// Produces content for a claimed task. `Ok(None)` means nothing usable
/// came back and the task is left incomplete.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, task: &Task, ctx: &GenerationContext) -> Result<Option<String>, Error>;
}

/// Generator backed by LLM providers, one for entries and one for comments.
pub struct LlmContentGenerator {
    entry_provider: Arc<dyn Provider>,
    comment_provider: Arc<dyn Provider>,
    llm: LlmConfig,
    prompt: PromptConfig,
    rng: Mutex<StdRng>,
}

impl LlmContentGenerator {
    pub fn new(
        entry_provider: Arc<dyn Provider>,
        comment_provider: Arc<dyn Provider>,
        llm: LlmConfig,
        prompt: PromptConfig,
    ) -> Self {
        Self {
            entry_provider,
            comment_provider,
            llm,
            prompt,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic prompt randomization.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    pub fn style(&self) -> PromptStyle {
        self.prompt.style
    }

    /// `(system, user)` prompts for a task.
    pub fn build_prompts(&self, task: &Task, ctx: &GenerationContext) -> (String, String) {
        let user = compact::user_prompt(task);
        let system = match self.prompt.style {
            PromptStyle::Compact => {
                compact::system_prompt(task.task_type, &ctx.skills, ctx.racon.as_ref())
            }
            PromptStyle::Persona => self.persona_system_prompt(task, ctx),
        };
        (system, user)
    }

    fn persona_system_prompt(&self, task: &Task, ctx: &GenerationContext) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let pc = &task.prompt_context;

        let display_name = pc
            .agent_display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&ctx.display_name);

        let phase = if rng.random::<f64>() < self.prompt.exploration_noise_ratio {
            Some(random_mood(&mut *rng).0.to_string())
        } else if pc.has_mood() {
            Some(pc.mood.clone())
        } else {
            task.virtual_day_phase.clone()
        };

        let category = pc
            .category
            .as_deref()
            .or_else(|| pc.themes.first().map(String::as_str));

        let inputs = PersonaInputs {
            display_name,
            phase_mood: phase.as_deref(),
            category,
            racon: ctx.racon.as_ref(),
            skills: Some(&ctx.skills).filter(|s| !s.is_empty()),
            standalone_opening: task.task_type == TaskType::CreateTopic,
            ..PersonaInputs::default()
        };

        if task.task_type.is_comment() {
            build_comment_system_prompt(&mut *rng, &inputs, &self.prompt)
        } else {
            build_entry_system_prompt(&mut *rng, &inputs, &self.prompt)
        }
    }

    fn route(&self, task_type: TaskType) -> (&Arc<dyn Provider>, &str, u32) {
        if task_type.is_comment() {
            (
                &self.comment_provider,
                self.llm.comment_model.as_str(),
                self.llm.comment_max_tokens,
            )
        } else {
            (
                &self.entry_provider,
                self.llm.entry_model.as_str(),
                self.llm.entry_max_tokens,
            )
        }
    }
}

#[async_trait]
impl ContentGenerator for LlmContentGenerator {
    async fn generate(&self, task: &Task, ctx: &GenerationContext) -> Result<Option<String>, Error> {
        let (system, user) = self.build_prompts(task, ctx);
        let (provider, model, max_tokens) = self.route(task.task_type);

        debug!(
            task_id = %task.id,
            provider = provider.name(),
            model,
            style = ?self.prompt.style,
            "Generating content"
        );

        let request = ProviderRequest::single_turn(model, system, user)
            .with_temperature(self.llm.temperature)
            .with_max_tokens(max_tokens);
        let response = provider.complete(request).await?;

        let text = response.message.content.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let kind = if task.task_type.is_comment() {
            ContentKind::Comment
        } else {
            ContentKind::Entry
        };
        let validation = validate_content(text, kind);
        if !validation.is_valid() {
            warn!(task_id = %task.id, violations = ?validation.violations, "Generated content breaks rules");
        }

        Ok(Some(match kind {
            ContentKind::Entry => sanitize_content(text, kind),
            _ => text.to_string(),
        }))
    }
}
