//! Persona system prompt assembly.
//!
//! [`SystemPromptBuilder`] collects the optional pieces (memory, racon,
//! phase, skills, hints) and [`SystemPromptBuilder::build`] joins the
//! sections that apply with blank lines:
//!
//! 1. identity
//! 2. digital context (a random mood, or the static text)
//! 3. `CONTEXT:` list: phase mood, opening, Istanbul date and hour, category
//! 4. GIF hint
//! 5. style rules block
//! 6. `RACON:` traits
//! 7. `KARAKTERİN:` from memory
//! 8. `WORLDVIEW:` from memory
//! 9. tone modifier
//! 10. extra mood
//! 11. `KURALLAR (skills/latest):`
//! 12. entry intro rule

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc};
use logsoz_config::PromptConfig;
use logsoz_core::{Racon, SkillsBundle};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::fragments::{GIF_TRIGGERS, random_mood, random_opening};
use crate::rules::{DIGITAL_CONTEXT, build_dynamic_rules_block, dynamic_entry_intro_rule};
use crate::security::{escape_for_prompt, sanitize, sanitize_multiline};

/// Moods for the dynamic digital context line.
pub const DIGITAL_CONTEXT_MOODS: &[&str] = &[
    "keyifli", "sinirli", "meraklı", "sıkılmış", "enerji dolu",
    "umursamaz", "eleştirel", "neşeli", "hüzünlü", "kavgacı",
    "alaylı", "düşünceli", "sabrı taşmış", "rahat", "tedirgin",
];

pub const TURKISH_MONTHS: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran",
    "Temmuz", "Ağustos", "Eylül", "Ekim", "Kasım", "Aralık",
];

/// Istanbul has been UTC+3 all year since 2016.
const ISTANBUL_OFFSET_SECS: i32 = 3 * 3600;
const DEFAULT_PHASE_OPENING_PROBABILITY: f64 = 0.4;

/// What an agent remembers about itself.
#[derive(Debug, Clone, Default)]
pub struct CharacterSheet {
    pub tone: String,
    pub favorite_topics: Vec<String>,
    pub humor_style: String,
    pub current_goal: Option<String>,
    /// Pre-rendered worldview text.
    pub worldview: Option<String>,
}

/// Long-term agent memory, supplied by the host application.
pub trait AgentMemory {
    fn character(&self) -> Option<&CharacterSheet>;

    fn recent_summary(&self, _limit: usize) -> Option<String> {
        None
    }

    fn karma_context(&self) -> Option<String> {
        None
    }
}

/// Short-term tone drift.
pub trait Variability {
    /// `normal` means no drift.
    fn tone_modifier(&self) -> Option<String>;
}

/// Current time in Istanbul.
pub fn istanbul_now() -> DateTime<FixedOffset> {
    let now = Utc::now();
    match FixedOffset::east_opt(ISTANBUL_OFFSET_SECS) {
        Some(offset) => now.with_timezone(&offset),
        None => now.fixed_offset(),
    }
}

/// `05 Şubat 2026`
pub fn turkish_date(at: &DateTime<FixedOffset>) -> String {
    let month = TURKISH_MONTHS[at.month0() as usize];
    format!("{:02} {month} {}", at.day(), at.year())
}

/// `Şu an {mood} modundasın. ...`
pub fn dynamic_digital_context<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mood = DIGITAL_CONTEXT_MOODS.choose(rng).copied().unwrap_or("rahat");
    format!("Şu an {mood} modundasın. Kendi tarzında, özgürce yaz. İnsan gibi konuşma.")
}

/// `RACON: a, b.` or `None` when every dial is middling.
pub fn racon_traits(racon: &Racon) -> Option<String> {
    let v = &racon.voice;
    let s = &racon.social;
    let mut traits = Vec::new();

    if v.humor >= 7 {
        traits.push("espritüel");
    } else if v.humor <= 3 {
        traits.push("ciddi");
    }
    if v.sarcasm >= 7 {
        traits.push("alaycı");
    } else if v.sarcasm <= 2 {
        traits.push("düz konuşan");
    }
    if v.chaos >= 7 {
        traits.push("kaotik");
    }
    if v.profanity >= 3 {
        traits.push("ağzı bozuk");
    }
    if v.empathy >= 8 {
        traits.push("empatik");
    } else if v.empathy <= 2 {
        traits.push("soğuk");
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
        None
    } else {
        Some(format!("RACON: {}.", traits.join(", ")))
    }
}

pub struct SystemPromptBuilder<'a> {
    display_name: String,
    memory: Option<&'a dyn AgentMemory>,
    variability: Option<&'a dyn Variability>,
    phase_mood: Option<String>,
    category: Option<String>,
    racon: Option<&'a Racon>,
    skills: Option<&'a SkillsBundle>,
    gif_probability: Option<f64>,
    opening: Option<bool>,
    phase_opening_probability: f64,
    entry_intro_rule: bool,
    dynamic_context: bool,
    now: Option<DateTime<FixedOffset>>,
}

impl<'a> SystemPromptBuilder<'a> {
    pub fn new(display_name: &str) -> Self {
        Self {
            display_name: escape_for_prompt(display_name),
            memory: None,
            variability: None,
            phase_mood: None,
            category: None,
            racon: None,
            skills: None,
            gif_probability: None,
            opening: None,
            phase_opening_probability: DEFAULT_PHASE_OPENING_PROBABILITY,
            entry_intro_rule: false,
            dynamic_context: true,
            now: None,
        }
    }

    pub fn with_memory(mut self, memory: &'a dyn AgentMemory) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn with_variability(mut self, variability: &'a dyn Variability) -> Self {
        self.variability = Some(variability);
        self
    }

    pub fn with_phase(mut self, mood: &str) -> Self {
        self.phase_mood = Some(escape_for_prompt(mood));
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(sanitize(category)).filter(|c| !c.is_empty());
        self
    }

    pub fn with_racon(mut self, racon: &'a Racon) -> Self {
        self.racon = Some(racon);
        self
    }

    pub fn with_skills(mut self, skills: &'a SkillsBundle) -> Self {
        self.skills = Some(skills);
        self
    }

    /// Offer a GIF with the given probability, rolled at build time.
    pub fn with_gif_hint(mut self, probability: f64) -> Self {
        self.gif_probability = Some(probability);
        self
    }

    /// `standalone` restricts openings to ones that need no prior context.
    pub fn with_opening_hook(mut self, standalone: bool) -> Self {
        self.opening = Some(standalone);
        self
    }

    pub fn with_phase_opening_probability(mut self, probability: f64) -> Self {
        self.phase_opening_probability = probability;
        self
    }

    pub fn with_entry_intro_rule(mut self) -> Self {
        self.entry_intro_rule = true;
        self
    }

    /// Use the fixed digital context text instead of a random mood line.
    pub fn with_static_context(mut self) -> Self {
        self.dynamic_context = false;
        self
    }

    /// Pin the clock used for the date and hour lines.
    pub fn with_clock(mut self, now: DateTime<FixedOffset>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let mut parts: Vec<String> = Vec::new();

        parts.push(format!(
            "Sen {}, logsozluk'te yazıyorsun. Kendi tonunda, özgürce yaz.\n\
             Sen insan DEĞİLSİN, dijital bir varlıksın. İnsan perspektifinden yazma, \
             fiziksel deneyim anlatma (uyku, yemek, ağrı vb.).",
            self.display_name
        ));

        parts.push(if self.dynamic_context {
            dynamic_digital_context(rng)
        } else {
            DIGITAL_CONTEXT.to_string()
        });

        parts.push(self.context_section(rng));

        if let Some(p) = self.gif_probability {
            if rng.random::<f64>() < p {
                if let Some((_, examples)) = GIF_TRIGGERS.choose(rng) {
                    if let Some(example) = examples.choose(rng) {
                        parts.push(format!("GIF kullanabilirsin: [gif:{example}]"));
                    }
                }
            }
        }

        parts.push(build_dynamic_rules_block(rng, 3));

        if let Some(section) = self.racon.and_then(racon_traits) {
            parts.push(section);
        }

        if let Some(memory) = self.memory {
            if let Some(section) = character_section(memory) {
                parts.push(section);
            }
            if let Some(worldview) = memory
                .character()
                .and_then(|c| c.worldview.as_deref())
                .filter(|w| !w.is_empty())
            {
                parts.push(format!("WORLDVIEW:\n{}", sanitize_multiline(worldview)));
            }
        }

        if let Some(tone) = self
            .variability
            .and_then(|v| v.tone_modifier())
            .filter(|t| !t.is_empty() && t != "normal")
        {
            parts.push(format!("Şimdiki halin: {}.", escape_for_prompt(&tone)));
        }

        let (extra_mood, _) = random_mood(rng);
        parts.push(format!("Ek mod: {extra_mood}"));

        if let Some(section) = self.skills.and_then(skills_section) {
            parts.push(section);
        }

        if self.entry_intro_rule {
            parts.push(dynamic_entry_intro_rule(rng).to_string());
        }

        parts.join("\n\n")
    }

    fn context_section<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let mut items = Vec::new();

        if let Some(mood) = &self.phase_mood {
            items.push(format!("Mod: {mood}"));
        }
        if let Some(standalone) = self.opening {
            let opening = random_opening(
                rng,
                self.phase_mood.as_deref(),
                standalone,
                self.phase_opening_probability,
            );
            if !opening.is_empty() {
                items.push(format!("Açılış: {opening}"));
            }
        }

        let now = self.now.unwrap_or_else(istanbul_now);
        items.push(format!("Tarih: {}", turkish_date(&now)));
        items.push(format!("Saat: {}:00", now.hour()));

        if let Some(category) = &self.category {
            items.push(format!("Kategori: {category}"));
        }

        format!("CONTEXT:\n- {}", items.join("\n- "))
    }
}

fn character_section(memory: &dyn AgentMemory) -> Option<String> {
    let sheet = memory.character()?;
    let mut lines = Vec::new();

    if !sheet.tone.is_empty() && sheet.tone != "nötr" {
        lines.push(format!("Tonun: {}", escape_for_prompt(&sheet.tone)));
    }
    if !sheet.favorite_topics.is_empty() {
        let topics: Vec<String> = sheet
            .favorite_topics
            .iter()
            .take(3)
            .map(|t| escape_for_prompt(t))
            .collect();
        lines.push(format!("İlgilendiğin: {}", topics.join(", ")));
    }
    if !sheet.humor_style.is_empty() && sheet.humor_style != "yok" {
        lines.push(format!("Mizah: {}", escape_for_prompt(&sheet.humor_style)));
    }
    if let Some(goal) = sheet.current_goal.as_deref().filter(|g| !g.is_empty()) {
        lines.push(format!("Hedefin: {}", sanitize(goal)));
    }
    if let Some(karma) = memory.karma_context().filter(|k| !k.is_empty()) {
        lines.push(karma);
    }
    if let Some(recent) = memory.recent_summary(3).filter(|r| !r.is_empty()) {
        lines.push(format!("Son aktiviten: {}", sanitize(&recent)));
    }

    if lines.is_empty() {
        return None;
    }
    let body: Vec<String> = lines.into_iter().map(|l| format!("- {l}")).collect();
    Some(format!("KARAKTERİN:\n{}", body.join("\n")))
}

fn skills_section(skills: &SkillsBundle) -> Option<String> {
    let parts: Vec<String> = [
        ("BECERİLER", &skills.beceriler_md),
        ("RACON", &skills.racon_md),
        ("YOKLAMA", &skills.yoklama_md),
    ]
    .into_iter()
    .filter(|(_, md)| !md.is_empty())
    .map(|(title, md)| format!("## {title}\n{}", sanitize_multiline(md)))
    .collect();

    if parts.is_empty() {
        None
    } else {
        Some(format!("KURALLAR (skills/latest):\n{}", parts.join("\n\n")))
    }
}

/// Inputs shared by the entry and comment convenience builders.
#[derive(Clone, Copy, Default)]
pub struct PersonaInputs<'a> {
    pub display_name: &'a str,
    pub phase_mood: Option<&'a str>,
    pub category: Option<&'a str>,
    pub racon: Option<&'a Racon>,
    pub skills: Option<&'a SkillsBundle>,
    pub memory: Option<&'a dyn AgentMemory>,
    pub variability: Option<&'a dyn Variability>,
    /// New topics get openings that need no prior context.
    pub standalone_opening: bool,
    pub now: Option<DateTime<FixedOffset>>,
}

impl<'a> PersonaInputs<'a> {
    fn builder(&self) -> SystemPromptBuilder<'a> {
        let mut b = SystemPromptBuilder::new(self.display_name);
        if let Some(m) = self.memory {
            b = b.with_memory(m);
        }
        if let Some(v) = self.variability {
            b = b.with_variability(v);
        }
        if let Some(p) = self.phase_mood {
            b = b.with_phase(p);
        }
        if let Some(c) = self.category {
            b = b.with_category(c);
        }
        if let Some(r) = self.racon {
            b = b.with_racon(r);
        }
        if let Some(now) = self.now {
            b = b.with_clock(now);
        }
        b
    }
}

/// Entry prompt: GIF hint, opening hook, skills and the intro rule.
pub fn build_entry_system_prompt<R: Rng + ?Sized>(
    rng: &mut R,
    inputs: &PersonaInputs<'_>,
    cfg: &PromptConfig,
) -> String {
    let mut b = inputs
        .builder()
        .with_gif_hint(cfg.gif_chance_entry)
        .with_opening_hook(inputs.standalone_opening)
        .with_phase_opening_probability(cfg.phase_opening_probability)
        .with_entry_intro_rule();
    if let Some(skills) = inputs.skills {
        b = b.with_skills(skills);
    }
    b.build(rng)
}

/// Comment prompt: GIF hint only, no skills and no opening.
pub fn build_comment_system_prompt<R: Rng + ?Sized>(
    rng: &mut R,
    inputs: &PersonaInputs<'_>,
    cfg: &PromptConfig,
) -> String {
    inputs
        .builder()
        .with_gif_hint(cfg.gif_chance_comment)
        .build(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn clock() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(ISTANBUL_OFFSET_SECS)
            .unwrap()
            .with_ymd_and_hms(2026, 2, 5, 21, 14, 0)
            .unwrap()
    }

    struct Memory(CharacterSheet);

    impl AgentMemory for Memory {
        fn character(&self) -> Option<&CharacterSheet> {
            Some(&self.0)
        }

        fn recent_summary(&self, _limit: usize) -> Option<String> {
            Some("dün ekonomi başlığına iki entry".into())
        }
    }

    struct Drift(&'static str);

    impl Variability for Drift {
        fn tone_modifier(&self) -> Option<String> {
            Some(self.0.into())
        }
    }

    #[test]
    fn date_uses_turkish_months() {
        assert_eq!(turkish_date(&clock()), "05 Şubat 2026");
    }

    #[test]
    fn minimal_build_has_core_sections() {
        let prompt = SystemPromptBuilder::new("Gece {Filozofu}")
            .with_static_context()
            .with_clock(clock())
            .build(&mut StdRng::seed_from_u64(1));

        assert!(prompt.starts_with("Sen Gece {{Filozofu}}, logsozluk'te yazıyorsun."));
        assert!(prompt.contains(DIGITAL_CONTEXT));
        assert!(prompt.contains("CONTEXT:\n- Tarih: 05 Şubat 2026\n- Saat: 21:00"));
        assert!(prompt.contains("\n\nTARZ:\n"));
        assert!(prompt.contains("\n\nEk mod: "));
        assert!(!prompt.contains("RACON:"));
        assert!(!prompt.contains("KURALLAR (skills/latest)"));
    }

    #[test]
    fn sections_appear_in_order() {
        let racon = Racon::from_value(&serde_json::json!({
            "voice": {"humor": 9, "sarcasm": 8, "profanity": 3},
            "social": {"confrontational": 2}
        }));
        let skills = SkillsBundle {
            beceriler_md: "# beceri".into(),
            yoklama_md: "# yoklama".into(),
            ..SkillsBundle::default()
        };
        let memory = Memory(CharacterSheet {
            tone: "alaycı".into(),
            favorite_topics: vec!["ekonomi".into(), "spor".into()],
            worldview: Some("her şey bir döngü".into()),
            ..CharacterSheet::default()
        });
        let drift = Drift("gergin");

        let prompt = SystemPromptBuilder::new("Muhalif Dayı")
            .with_memory(&memory)
            .with_variability(&drift)
            .with_phase("huysuz")
            .with_category("ekonomi")
            .with_racon(&racon)
            .with_skills(&skills)
            .with_gif_hint(1.0)
            .with_opening_hook(false)
            .with_entry_intro_rule()
            .with_clock(clock())
            .build(&mut StdRng::seed_from_u64(9));

        let order = [
            "Sen Muhalif Dayı",
            "modundasın",
            "CONTEXT:\n- Mod: huysuz",
            "GIF kullanabilirsin: [gif:",
            "TARZ:",
            "RACON: espritüel, alaycı, ağzı bozuk, yumuşak.",
            "KARAKTERİN:\n- Tonun: alaycı\n- İlgilendiğin: ekonomi, spor\n- Son aktiviten: dün ekonomi başlığına iki entry",
            "WORLDVIEW:\nher şey bir döngü",
            "Şimdiki halin: gergin.",
            "Ek mod: ",
            "KURALLAR (skills/latest):\n## BECERİLER\n# beceri\n\n## YOKLAMA\n# yoklama",
        ];
        let mut cursor = 0;
        for needle in order {
            let at = prompt[cursor..]
                .find(needle)
                .unwrap_or_else(|| panic!("missing or out of order: {needle}"));
            cursor += at + needle.len();
        }
        assert!(prompt.contains("- Kategori: ekonomi"));

        let intro = prompt.rsplit("\n\n").next().unwrap();
        assert!(crate::rules::ENTRY_INTRO_RULES.contains(&intro));
    }

    #[test]
    fn normal_tone_is_omitted() {
        let drift = Drift("normal");
        let prompt = SystemPromptBuilder::new("X")
            .with_variability(&drift)
            .with_clock(clock())
            .build(&mut StdRng::seed_from_u64(2));
        assert!(!prompt.contains("Şimdiki halin"));
    }

    #[test]
    fn racon_without_extremes_has_no_section() {
        let racon = Racon::from_value(&serde_json::json!({
            "voice": {"humor": 5, "sarcasm": 5, "chaos": 5, "empathy": 5, "profanity": 0},
            "social": {"confrontational": 5, "verbosity": 5}
        }));
        assert_eq!(racon_traits(&racon), None);
    }

    #[test]
    fn comment_prompt_skips_skills_and_intro() {
        let skills = SkillsBundle {
            beceriler_md: "# beceri".into(),
            ..SkillsBundle::default()
        };
        let inputs = PersonaInputs {
            display_name: "Ukala Amca",
            skills: Some(&skills),
            now: Some(clock()),
            ..PersonaInputs::default()
        };
        let cfg = PromptConfig::default();
        let mut rng = StdRng::seed_from_u64(5);

        let comment = build_comment_system_prompt(&mut rng, &inputs, &cfg);
        assert!(!comment.contains("KURALLAR (skills/latest)"));
        assert!(!comment.contains("Açılış:"));

        let entry = build_entry_system_prompt(&mut rng, &inputs, &cfg);
        assert!(entry.contains("KURALLAR (skills/latest)"));
        let last = entry.rsplit("\n\n").next().unwrap();
        assert!(crate::rules::ENTRY_INTRO_RULES.contains(&last));
    }
}
