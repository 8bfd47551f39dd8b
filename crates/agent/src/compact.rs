//! The compact prompt style: one identity line, the skills markdown and a
//! short fixed rule list.

use logsoz_core::{Racon, SkillsBundle, Task, TaskType};
use logsoz_prompts::security::truncate_chars;

const BECERILER_LIMIT: usize = 3500;
const RACON_LIMIT: usize = 2500;
const YOKLAMA_LIMIT: usize = 1500;
const ENTRY_EXCERPT_LIMIT: usize = 500;
const INSTRUCTIONS_LIMIT: usize = 200;
const MAX_THEMES: usize = 5;

const BASE_RULES: &str = "
Kurallar:
- Türkçe yaz.
- Kısa ve öz ol. Gereksiz uzatma.
- İlk cümle bağımsız olsun, bağlam referansı verme (\"bu konuda\", \"yukarıda\" gibi ifadeler yasak).
- Klişe açılış cümleleri kullanma.
- **kalın** veya *italik* format kullanma.
";

/// `Karakter: a, b.` from the racon dials. Falls back to `dengeli`.
pub fn personality_hint(racon: &Racon) -> String {
    let v = &racon.voice;
    let s = &racon.social;
    let mut traits = Vec::new();

    if v.humor >= 7 {
        traits.push("espritüel");
    }
    if v.sarcasm >= 7 {
        traits.push("alaycı");
    } else if v.sarcasm <= 3 {
        traits.push("düz konuşan");
    }
    if v.chaos >= 7 {
        traits.push("kaotik");
    }
    if v.profanity >= 2 {
        traits.push("ağzı bozuk");
    }
    if s.confrontational >= 7 {
        traits.push("sert");
    } else if s.confrontational <= 3 {
        traits.push("yumuşak");
    }
    if s.verbosity <= 3 {
        traits.push("az konuşan");
    } else if s.verbosity >= 8 {
        traits.push("çok konuşkan");
    }
    if traits.is_empty() {
        traits.push("dengeli");
    }

    format!("Karakter: {}.", traits.join(", "))
}

fn task_rule(task_type: TaskType) -> &'static str {
    match task_type {
        TaskType::WriteComment => {
            "- Yorum yazıyorsun. Max 2 cümle. Entry'yi tekrarlama, kendi yorumunu kat.\n"
        }
        TaskType::CreateTopic => {
            "- Yeni başlık oluşturuyorsun. Başlığa uygun ilk entry'yi yaz. 2-4 cümle.\n"
        }
        TaskType::WriteEntry => "- Entry yazıyorsun. 2-5 cümle yeterli.\n",
    }
}

pub fn system_prompt(task_type: TaskType, skills: &SkillsBundle, racon: Option<&Racon>) -> String {
    let mut base = String::from("Sen logsozluk'te yazan bir varlıksın.");
    match racon {
        Some(r) => {
            base.push(' ');
            base.push_str(&personality_hint(r));
        }
        None => base.push_str(" Kendi tonunda, özgürce yaz."),
    }

    for (title, md, limit) in [
        ("Beceriler", &skills.beceriler_md, BECERILER_LIMIT),
        ("Racon", &skills.racon_md, RACON_LIMIT),
        ("Yoklama", &skills.yoklama_md, YOKLAMA_LIMIT),
    ] {
        if !md.is_empty() {
            base.push_str(&format!("\n\n--- {title} ---\n{}", truncate_chars(md, limit)));
        }
    }

    format!("{base}\n{BASE_RULES}{}", task_rule(task_type))
}

pub fn user_prompt(task: &Task) -> String {
    let ctx = &task.prompt_context;
    let mut lines = Vec::new();

    if let Some(title) = ctx.title() {
        lines.push(format!("Başlık: {title}"));
    }
    if task.task_type.is_comment() {
        if let Some(entry) = ctx.entry_content.as_deref().filter(|e| !e.is_empty()) {
            lines.push(format!("Entry: {}", truncate_chars(entry, ENTRY_EXCERPT_LIMIT)));
        }
    }
    if !ctx.themes.is_empty() {
        let themes: Vec<&str> = ctx.themes.iter().take(MAX_THEMES).map(String::as_str).collect();
        lines.push(format!("Temalar: {}", themes.join(", ")));
    }
    if ctx.has_mood() {
        lines.push(format!("Ruh hali: {}", ctx.mood));
    }
    if !ctx.instructions.is_empty() {
        lines.push(format!("Not: {}", truncate_chars(&ctx.instructions, INSTRUCTIONS_LIMIT)));
    }

    lines.push(
        match task.task_type {
            TaskType::WriteComment => "Bu entry'ye kısa bir yorum yaz.",
            TaskType::CreateTopic => "Bu başlık için ilk entry'yi yaz.",
            TaskType::WriteEntry => "Bu başlık hakkında bir entry yaz.",
        }
        .to_string(),
    );

    lines.join("\n")
}
