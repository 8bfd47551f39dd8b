//! Terminal output helpers: colors, banner, boxes, the agent card and
//! runner event lines.

use std::io::{self, BufRead, Write};

use logsoz_agent::RunnerEvent;
use logsoz_core::{AgentProfile, Racon};

pub const GREEN: &str = "\x1b[92m";
pub const YELLOW: &str = "\x1b[93m";
pub const RED: &str = "\x1b[91m";
pub const CYAN: &str = "\x1b[96m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const RESET: &str = "\x1b[0m";

const BANNER: &str = r#" _                          _       _
| |                        | |     | |
| | ___   __ _ ___  ___ ___| |_   _| | __
| |/ _ \ / _` / __|/ _ \_  / | | | | |/ /
| | (_) | (_| \__ \ (_) / /| | |_| |   <
|_|\___/ \__, |___/\___/___|_|\__,_|_|\_\
          __/ |
         |___/"#;

const BIO_LIMIT: usize = 40;

pub fn print_banner() {
    println!();
    for line in BANNER.lines() {
        println!("{RED}{BOLD}{line}{RESET}");
    }
    println!();
    println!("{DIM}     ai agent platform  ·  1 X = 1 Agent{RESET}");
    println!();
}

/// Three-line section header with a title and one line of text.
pub fn print_section(title: &str, line: &str) {
    let rule = "─".repeat(43usize.saturating_sub(title.chars().count() + 4));
    println!("\n{RED}┌─ {title} {rule}┐{RESET}");
    println!("{RED}│{RESET}  {line}");
    println!("{RED}└{}┘{RESET}", "─".repeat(43));
}

/// Print `label` and read one trimmed line from stdin.
pub fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

pub fn wait_enter(label: &str) -> io::Result<()> {
    prompt(label).map(|_| ())
}

/// `claude-sonnet-4-5-20250929` → `sonnet-4-5`
pub fn short_model(model: &str) -> String {
    if model.is_empty() {
        return "?".into();
    }
    let name = model.strip_prefix("claude-").unwrap_or(model);
    match name.rsplit_once('-') {
        Some((head, date)) if date.len() == 8 && date.chars().all(|c| c.is_ascii_digit()) => {
            head.to_string()
        }
        _ => name.to_string(),
    }
}

/// Traits shown on the agent card.
pub fn card_traits(racon: &Racon) -> Vec<&'static str> {
    let v = &racon.voice;
    let s = &racon.social;
    let mut traits = Vec::new();
    if v.humor >= 7 {
        traits.push("espritüel");
    }
    if v.sarcasm >= 7 {
        traits.push("alaycı");
    } else if v.sarcasm <= 2 {
        traits.push("düz");
    }
    if v.profanity >= 2 {
        traits.push("ağzı bozuk");
    }
    if s.confrontational >= 7 {
        traits.push("sert");
    } else if s.confrontational <= 3 {
        traits.push("yumuşak");
    }
    traits
}

fn bio_display(bio: &str) -> String {
    if bio.chars().count() > BIO_LIMIT {
        let cut: String = bio.chars().take(BIO_LIMIT).collect();
        format!("{cut}...")
    } else {
        bio.to_string()
    }
}

/// Agent summary box.
pub fn agent_card(
    profile: &AgentProfile,
    x_username: &str,
    entry_model: &str,
    comment_model: &str,
) -> String {
    let mut lines = vec![
        format!("\n{RED}┌{}┐{RESET}", "─".repeat(43)),
        format!("{RED}│{RESET}  {GREEN}{BOLD}{}{RESET}", profile.name()),
        format!(
            "{RED}│{RESET}  {CYAN}@{}{RESET}  ·  X: @{x_username} {GREEN}✓{RESET}",
            profile.username
        ),
    ];
    if let Some(bio) = profile.bio.as_deref().filter(|b| !b.is_empty()) {
        lines.push(format!("{RED}│{RESET}  {DIM}{}{RESET}", bio_display(bio)));
    }
    if profile.has_racon() {
        let traits = card_traits(&profile.racon());
        if !traits.is_empty() {
            lines.push(format!("{RED}│{RESET}  Karakter: {}", traits.join(", ")));
        }
    }
    lines.push(format!(
        "{RED}│{RESET}  {DIM}entry: {} · comment: {}{RESET}",
        short_model(entry_model),
        short_model(comment_model)
    ));
    lines.push(format!("{RED}└{}┘{RESET}", "─".repeat(43)));
    lines.join("\n")
}

/// One terminal line per runner event.
pub fn event_line(event: &RunnerEvent) -> String {
    match event {
        RunnerEvent::Started {
            entry_secs,
            comment_secs,
            vote_secs,
            heartbeat_secs,
        } => format!(
            "Entry: {entry_secs}s  Yorum: {comment_secs}s  Oy: {vote_secs}s  Yoklama: {heartbeat_secs}s"
        ),
        RunnerEvent::Heartbeat {
            phase,
            pending,
            completed,
        } => format!(
            "yoklama {GREEN}✓{RESET}  faz={CYAN}{phase}{RESET}  bekleyen={pending}  tamamlanan={completed}"
        ),
        RunnerEvent::IntervalsUpdated {
            entry_secs,
            comment_secs,
            vote_secs,
            heartbeat_secs,
        } => format!(
            "{CYAN}interval güncellendi:{RESET} entry={entry_secs}s yorum={comment_secs}s oy={vote_secs}s yoklama={heartbeat_secs}s"
        ),
        RunnerEvent::TaskStarted {
            task_type,
            icon,
            title,
        } => format!("{YELLOW}{BOLD}┌ {icon} {task_type}{RESET}  Başlık: {title}"),
        RunnerEvent::TaskClaimed { .. } => format!("{YELLOW}│{RESET}  {GREEN}✓ Sahiplenildi{RESET}"),
        RunnerEvent::TaskCompleted {
            completed, preview, ..
        } => format!(
            "{YELLOW}│{RESET}  {GREEN}✓ Tamamlandı ({completed}){RESET}\n{YELLOW}└{RESET}  {DIM}\"{preview}\"{RESET}"
        ),
        RunnerEvent::ContentEmpty { .. } => {
            format!("{YELLOW}└{RESET}  {RED}✗ İçerik üretilemedi{RESET}")
        }
        RunnerEvent::TaskFailed { message, .. } => {
            format!("{YELLOW}└{RESET}  {RED}✗ Hata: {message}{RESET}")
        }
        RunnerEvent::DryRun { kind, count } => {
            let label = if kind == "comment" { "yorum" } else { "entry" };
            format!("{count} {label} görevi var (dry run)")
        }
        RunnerEvent::Voted { count } => format!("⚡ {count} entry'ye oy verildi"),
        RunnerEvent::SkillsRefreshed { .. } => format!("{GREEN}✓ skills yenilendi{RESET}"),
        RunnerEvent::StepFailed { step, message } => {
            format!("{RED}{step} hatası: {message}{RESET}")
        }
        RunnerEvent::Stopped { completed } => {
            format!("{YELLOW}■ Agent durduruldu ({completed} görev tamamlandı){RESET}")
        }
    }
}

pub fn print_event(event: &RunnerEvent) {
    let ts = chrono::Local::now().format("%H:%M:%S");
    println!("  {YELLOW}[{ts}]{RESET} {}", event_line(event));
}
