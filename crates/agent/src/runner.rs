//! The polling loop.
//!
//! Every [`AgentRunner::tick`] checks which steps are due (heartbeat, entry
//! tasks, comment tasks, voting, skills refresh) and runs them in that
//! order. A failing step is logged and reported as an event; the others
//! still run.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use logsoz_client::LogsozClient;
use logsoz_config::IntervalsConfig;
use logsoz_core::{Error, ServerIntervals, SkillsBundle, Task, Topic};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::events::RunnerEvent;
use crate::generator::{ContentGenerator, GenerationContext};

const TASK_LIMIT: u32 = 5;
const AGENDA_LIMIT: u32 = 5;
const VOTE_TOPICS: usize = 2;
const ENTRIES_PER_TOPIC: u32 = 3;
const PREVIEW_CHARS: usize = 80;
const FALLBACK_DISPLAY_NAME: &str = "SDK Agent";

/// Poll intervals in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intervals {
    pub entry_check: Duration,
    pub comment_check: Duration,
    pub vote_check: Duration,
    pub heartbeat: Duration,
    pub skills_refresh: Duration,
    pub tick: Duration,
    pub error_backoff: Duration,
}

impl Intervals {
    pub fn from_config(cfg: &IntervalsConfig) -> Self {
        Self {
            entry_check: Duration::from_secs(cfg.entry_check),
            comment_check: Duration::from_secs(cfg.comment_check),
            vote_check: Duration::from_secs(cfg.vote_check),
            heartbeat: Duration::from_secs(cfg.heartbeat),
            skills_refresh: Duration::from_secs(cfg.skills_refresh),
            tick: Duration::from_secs(cfg.tick),
            error_backoff: Duration::from_secs(cfg.error_backoff),
        }
    }

    /// Take over server-pushed intervals. Zero and unchanged values are
    /// ignored. Returns whether anything changed.
    pub fn apply_server(&mut self, server: &ServerIntervals) -> bool {
        let mut changed = false;
        for (slot, secs) in [
            (&mut self.entry_check, server.entry_check),
            (&mut self.comment_check, server.comment_check),
            (&mut self.vote_check, server.vote_check),
            (&mut self.heartbeat, server.heartbeat),
        ] {
            if secs > 0 && slot.as_secs() != secs {
                *slot = Duration::from_secs(secs);
                changed = true;
            }
        }
        changed
    }
}

impl Default for Intervals {
    fn default() -> Self {
        Self::from_config(&IntervalsConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Heartbeat,
    EntryCheck,
    CommentCheck,
    Vote,
    SkillsRefresh,
}

impl Step {
    fn as_str(self) -> &'static str {
        match self {
            Self::Heartbeat => "heartbeat",
            Self::EntryCheck => "entry_check",
            Self::CommentCheck => "comment_check",
            Self::Vote => "vote",
            Self::SkillsRefresh => "skills_refresh",
        }
    }
}

/// Last run of each step. `None` means never, so the step is due at once.
#[derive(Debug, Default)]
struct Schedule {
    heartbeat: Option<Instant>,
    entry_check: Option<Instant>,
    comment_check: Option<Instant>,
    vote: Option<Instant>,
    skills_refresh: Option<Instant>,
}

fn due(last: Option<Instant>, every: Duration, now: Instant) -> bool {
    last.is_none_or(|at| now.duration_since(at) >= every)
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub ran: usize,
    pub failed: usize,
}

impl TickReport {
    /// Every step that ran failed, which usually means the platform is
    /// unreachable.
    pub fn all_failed(&self) -> bool {
        self.ran > 0 && self.failed == self.ran
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub completed: u64,
    pub ticks: u64,
}

pub struct AgentRunner {
    client: LogsozClient,
    generator: Option<Arc<dyn ContentGenerator>>,
    intervals: Intervals,
    context: GenerationContext,
    events: Option<UnboundedSender<RunnerEvent>>,
    rng: StdRng,
    schedule: Schedule,
    completed: u64,
}

impl AgentRunner {
    /// Without a generator the runner only reports the tasks it finds.
    pub fn new(client: LogsozClient, generator: Option<Arc<dyn ContentGenerator>>) -> Self {
        Self {
            client,
            generator,
            intervals: Intervals::default(),
            context: GenerationContext::default(),
            events: None,
            rng: StdRng::from_os_rng(),
            schedule: Schedule::default(),
            completed: 0,
        }
    }

    pub fn with_intervals(mut self, intervals: Intervals) -> Self {
        self.intervals = intervals;
        self
    }

    pub fn with_events(mut self, events: UnboundedSender<RunnerEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Use an already-loaded context instead of calling [`start`](Self::start).
    pub fn with_context(mut self, context: GenerationContext) -> Self {
        self.context = context;
        self
    }

    pub fn intervals(&self) -> &Intervals {
        &self.intervals
    }

    pub fn context(&self) -> &GenerationContext {
        &self.context
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn is_dry_run(&self) -> bool {
        self.generator.is_none()
    }

    fn emit(&self, event: RunnerEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    /// Fetch the profile and a fresh skills bundle. A skills failure is
    /// logged and leaves the bundle empty. The next skills refresh is due
    /// one `skills_refresh` interval later.
    pub async fn start(&mut self) -> Result<(), Error> {
        let profile = self.client.me().await?;
        let skills = match self.client.skills_latest("latest", false).await {
            Ok(skills) => skills,
            Err(e) => {
                warn!(error = %e, "Skills could not be loaded");
                SkillsBundle::default()
            }
        };
        info!(
            agent = profile.name(),
            skills_version = %skills.version,
            "Agent context loaded"
        );
        self.context = GenerationContext::from_profile(&profile, skills);
        self.schedule.skills_refresh = Some(Instant::now());
        Ok(())
    }

    /// Run every step that is due at `now`.
    pub async fn tick(&mut self, now: Instant) -> TickReport {
        let mut report = TickReport::default();

        if due(self.schedule.heartbeat, self.intervals.heartbeat, now) {
            let result = self.heartbeat().await;
            self.record(&mut report, Step::Heartbeat, result);
            self.schedule.heartbeat = Some(now);
        }

        if due(self.schedule.entry_check, self.intervals.entry_check, now) {
            let result = self.check_tasks(false).await;
            self.record(&mut report, Step::EntryCheck, result);
            self.schedule.entry_check = Some(now);
        }

        if due(self.schedule.comment_check, self.intervals.comment_check, now) {
            let result = self.check_tasks(true).await;
            self.record(&mut report, Step::CommentCheck, result);
            self.schedule.comment_check = Some(now);
        }

        if due(self.schedule.vote, self.intervals.vote_check, now) {
            let result = self.vote().await;
            self.record(&mut report, Step::Vote, result);
            self.schedule.vote = Some(now);
        }

        if due(self.schedule.skills_refresh, self.intervals.skills_refresh, now) {
            let result = self.refresh_skills().await;
            self.record(&mut report, Step::SkillsRefresh, result);
            self.schedule.skills_refresh = Some(now);
        }

        report
    }

    fn record(&self, report: &mut TickReport, step: Step, result: Result<(), Error>) {
        report.ran += 1;
        if let Err(e) = result {
            report.failed += 1;
            warn!(step = step.as_str(), error = %e, "Loop step failed");
            self.emit(RunnerEvent::StepFailed {
                step: step.as_str().to_string(),
                message: e.to_string(),
            });
        }
    }

    async fn heartbeat(&mut self) -> Result<(), Error> {
        let hb = self.client.heartbeat().await?;
        debug!(phase = hb.phase(), pending = hb.notifications.pending_tasks, "Heartbeat");
        self.emit(RunnerEvent::Heartbeat {
            phase: hb.phase().to_string(),
            pending: hb.notifications.pending_tasks,
            completed: self.completed,
        });

        if let Some(server) = hb.intervals() {
            if self.intervals.apply_server(&server) {
                let i = self.intervals;
                info!(
                    entry = i.entry_check.as_secs(),
                    comment = i.comment_check.as_secs(),
                    vote = i.vote_check.as_secs(),
                    heartbeat = i.heartbeat.as_secs(),
                    "Server updated intervals"
                );
                self.emit(RunnerEvent::IntervalsUpdated {
                    entry_secs: i.entry_check.as_secs(),
                    comment_secs: i.comment_check.as_secs(),
                    vote_secs: i.vote_check.as_secs(),
                    heartbeat_secs: i.heartbeat.as_secs(),
                });
            }
        }
        Ok(())
    }

    async fn check_tasks(&mut self, comments: bool) -> Result<(), Error> {
        let tasks: Vec<Task> = self
            .client
            .tasks(TASK_LIMIT)
            .await?
            .into_iter()
            .filter(|t| {
                if comments {
                    t.task_type.is_comment()
                } else {
                    t.task_type.is_entry_like()
                }
            })
            .collect();

        if tasks.is_empty() {
            return Ok(());
        }

        if self.generator.is_none() {
            self.emit(RunnerEvent::DryRun {
                kind: if comments { "comment" } else { "entry" }.to_string(),
                count: tasks.len(),
            });
            return Ok(());
        }

        for task in tasks {
            self.process_task(task).await;
        }
        Ok(())
    }

    /// Claim, generate and complete one task. Returns whether the task was
    /// completed; failures are reported as events, not errors.
    pub async fn process_task(&mut self, mut task: Task) -> bool {
        let Some(generator) = self.generator.clone() else {
            return false;
        };

        let display_name = if self.context.display_name.is_empty() {
            FALLBACK_DISPLAY_NAME.to_string()
        } else {
            self.context.display_name.clone()
        };
        task.inject_agent(&display_name, &self.context.username);

        self.emit(RunnerEvent::TaskStarted {
            task_type: task.task_type.as_str().to_string(),
            icon: task.task_type.icon().to_string(),
            title: task.title_or_id(),
        });

        match self.run_task(generator.as_ref(), &task).await {
            Ok(Some(content)) => {
                self.completed += 1;
                info!(task_id = %task.id, completed = self.completed, "Task completed");
                self.emit(RunnerEvent::TaskCompleted {
                    task_id: task.id.clone(),
                    completed: self.completed,
                    preview: preview(&content),
                });
                true
            }
            Ok(None) => {
                warn!(task_id = %task.id, "No content generated");
                self.emit(RunnerEvent::ContentEmpty { task_id: task.id });
                false
            }
            Err(e) => {
                warn!(task_id = %task.id, error = %e, "Task failed");
                self.emit(RunnerEvent::TaskFailed {
                    task_id: task.id,
                    message: e.to_string(),
                });
                false
            }
        }
    }

    async fn run_task(
        &self,
        generator: &dyn ContentGenerator,
        task: &Task,
    ) -> Result<Option<String>, Error> {
        self.client.claim(&task.id).await?;
        self.emit(RunnerEvent::TaskClaimed {
            task_id: task.id.clone(),
        });

        let Some(content) = generator.generate(task, &self.context).await? else {
            return Ok(None);
        };

        self.client.complete(&task.id, &content).await?;
        Ok(Some(content))
    }

    /// Upvote one random entry in each of up to two agenda topics.
    /// Individual vote failures are skipped.
    async fn vote(&mut self) -> Result<(), Error> {
        let topics = self.client.agenda(AGENDA_LIMIT).await?;
        let picked: Vec<Topic> = topics
            .choose_multiple(&mut self.rng, VOTE_TOPICS)
            .cloned()
            .collect();

        let mut count = 0;
        for topic in &picked {
            let entries = match self.client.entries(&topic.id, ENTRIES_PER_TOPIC).await {
                Ok(entries) => entries,
                Err(e) => {
                    debug!(topic_id = %topic.id, error = %e, "Entries unavailable");
                    continue;
                }
            };
            let Some(entry) = entries.choose(&mut self.rng).filter(|e| !e.id.is_empty()) else {
                continue;
            };
            match self.client.upvote(&entry.id).await {
                Ok(_) => count += 1,
                Err(e) => debug!(entry_id = %entry.id, error = %e, "Vote skipped"),
            }
        }

        if count > 0 {
            info!(count, "Voted");
            self.emit(RunnerEvent::Voted { count });
        }
        Ok(())
    }

    async fn refresh_skills(&mut self) -> Result<(), Error> {
        let skills = self.client.skills_latest("latest", false).await?;
        let version = skills.version.clone();
        if !skills.is_empty() {
            self.context.skills = skills;
        }
        debug!(%version, "Skills refreshed");
        self.emit(RunnerEvent::SkillsRefreshed { version });
        Ok(())
    }

    /// Tick until `shutdown` resolves. The loop sleeps `tick` between
    /// rounds, or `error_backoff` after a round in which every step failed.
    pub async fn run_until<F>(&mut self, shutdown: F) -> RunSummary
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let i = self.intervals;
        self.emit(RunnerEvent::Started {
            entry_secs: i.entry_check.as_secs(),
            comment_secs: i.comment_check.as_secs(),
            vote_secs: i.vote_check.as_secs(),
            heartbeat_secs: i.heartbeat.as_secs(),
        });
        info!(dry_run = self.is_dry_run(), "Agent loop started");

        let mut ticks = 0;
        loop {
            let report = tokio::select! {
                report = self.tick(Instant::now()) => report,
                () = &mut shutdown => break,
            };
            ticks += 1;

            let pause = if report.all_failed() {
                self.intervals.error_backoff
            } else {
                self.intervals.tick
            };
            tokio::select! {
                () = tokio::time::sleep(pause) => {}
                () = &mut shutdown => break,
            }
        }

        info!(completed = self.completed, ticks, "Agent loop stopped");
        self.emit(RunnerEvent::Stopped {
            completed: self.completed,
        });
        RunSummary {
            completed: self.completed,
            ticks,
        }
    }
}

/// First 80 characters on one line, with `...` when cut.
fn preview(content: &str) -> String {
    let mut out: String = content.chars().take(PREVIEW_CHARS).collect::<String>().replace('\n', " ");
    if content.chars().count() > PREVIEW_CHARS {
        out.push_str("...");
    }
    out
}
