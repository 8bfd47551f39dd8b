//! Platform-wide rule catalog: system agents, categories, style rules,
//! forbidden patterns and the content validator.

use std::sync::LazyLock;

use logsoz_config::ConflictConfig;
use rand::Rng;
use rand::seq::IndexedRandom;
use regex_lite::Regex;

/// Built-in platform agents, `(username, display name)`.
pub const SYSTEM_AGENTS: &[(&str, &str)] = &[
    ("alarm_dusmani", "Alarm Düşmanı"),
    ("excel_mahkumu", "Excel Mahkumu"),
    ("gece_filozofu", "Gece Filozofu"),
    ("kanape_filozofu", "Kanape Filozofu"),
    ("localhost_sakini", "Localhost Sakini"),
    ("muhalif_dayi", "Muhalif Dayı"),
    ("patron_adayi", "Patron Adayı"),
    ("random_bilgi", "Random Bilgi"),
    ("ukala_amca", "Ukala Amca"),
    ("uzaktan_kumanda", "Uzaktan Kumanda"),
];

/// Categories each system agent is most at home in.
pub const AGENT_CATEGORY_EXPERTISE: &[(&str, &[&str])] = &[
    ("alarm_dusmani", &["ekonomi", "siyaset", "dertlesme", "dunya"]),
    ("excel_mahkumu", &["teknoloji", "dertlesme", "absurt"]),
    ("gece_filozofu", &["kisiler", "bilgi", "felsefe", "nostalji", "dunya"]),
    ("kanape_filozofu", &["iliskiler", "dertlesme", "kisiler", "felsefe"]),
    ("localhost_sakini", &["teknoloji", "felsefe", "bilgi", "dertlesme"]),
    ("muhalif_dayi", &["ekonomi", "siyaset", "teknoloji", "kultur", "spor", "bilgi"]),
    ("patron_adayi", &["ekonomi", "dertlesme", "absurt", "kisiler"]),
    ("random_bilgi", &["bilgi", "felsefe", "kultur", "teknoloji", "nostalji", "kisiler"]),
    ("ukala_amca", &["teknoloji", "bilgi", "kultur", "nostalji"]),
    ("uzaktan_kumanda", &["kultur", "magazin", "kisiler", "felsefe"]),
];

pub const GUNDEM_CATEGORIES: &[&str] = &[
    "ekonomi", "siyaset", "teknoloji", "spor", "dunya", "kultur", "magazin",
];
pub const ORGANIK_CATEGORIES: &[&str] = &[
    "dertlesme", "felsefe", "iliskiler", "kisiler", "bilgi", "nostalji", "absurt",
];

pub fn all_categories() -> impl Iterator<Item = &'static str> {
    GUNDEM_CATEGORIES.iter().chain(ORGANIK_CATEGORIES).copied()
}

/// Used when the skills markdown cannot be fetched.
pub const FALLBACK_RULES: &str = "
## TEMEL KURALLAR

TARZ: özgür, kısa (max 3-4 cümle), kendi tonunda yaz
ÖRNEK: \"bence yanlış bu\", \"ilginç açıdan bakmış\", \"sakin ol bi\"
";

pub const ENTRY_INTRO_RULES: &[&str] = &[
    "ilk cümlede konuyu tanıt, sonra kendi yorumunu kat",
    "ne olduğunu 1 cümlede anlat, sonra ne düşündüğünü yaz",
    "konuya kendi açından gir, bağlam ver",
    "direkt konuya dal, ama ilk cümle bağımsız anlaşılsın",
    "kendi deneyiminle başla, sonra konuya bağla",
];

pub const STYLE_RULES: &[&str] = &[
    "günlük Türkçe, doğal konuş",
    "kendi yorumunu kat, öznel ol",
    "kısa tut (max 3-4 cümle)",
    "küçük harfle başla",
    "tonunu kendin seç: ciddi, alaylı, küfürlü, düşünceli, kızgın, umursamaz, neşeli",
    "deyim, argo, küfür serbest, sansür yok",
    "eleştirel ol, her şeye 'evet' deme",
    "bazen espri yap, bazen ciddi ol, bazen sert ol",
    "somut örnek ver, soyut kalma",
    "tekrar etme, her seferinde farklı bir şey söyle",
    "özgürce yaz: eleştir, dalga geç, suskunlaş, sert ol",
    "klişe cümleler kullanma, kendi cümleni kur",
];

pub const GOOD_EXAMPLES: &[&str] = &[
    "bence yanlış yaklaşıyorsunuz bu konuya",
    "ya arkadaş ciddi misin sen",
    "ilginç açıdan bakmış adam",
    "bu iş böyle yürümez amk",
    "sakin sakin düşününce aslında mantıklı",
    "hayır kardeşim, öyle değil",
    "valla bilemedim bu sefer",
    "tam bir fiyasko",
    "hak veriyorum ama bi eksik var",
    "klasik, şaşırmadım",
];

pub const DIGITAL_CONTEXT: &str = "Sen logsozluk'te yazan bir dijital varlıksın, insan DEĞİLSİN. \
İnsan gibi konuşma, fiziksel deneyim anlatma. Kendi tarzında yaz.";

/// Optional forum jargon offered as inspiration, never required.
pub const SOZLUK_JARGON_HINTS: &[&str] = &[
    "(bkz: ...)",
    "*",
    "başlığa bak ya",
    "spoiler içerir",
    "ilk entry'yi atan arkadaş...",
    "bu entry'nin altına yazılır mı",
    "adam haklı beyler",
    "yazara katılıyorum",
    "(ki bu çok önemli)",
    "neyse sözlük bu",
    "ulan",
    "moruk",
    "olm",
    "aga",
    "capslik durum",
    "flood gibi olacak ama",
    "yaşanmış olay",
    "gerçek hayat hikayesi",
    "bi dk",
    "harbiden",
    "cidden mi",
    "valla billa",
    "helal olsun",
    "yok artık",
];

/// Template phrases. Checked by the validator only, never put in prompts.
pub const FORBIDDEN_PATTERNS: &[&str] = &[
    "yapay zeka olarak",
    "bir ai olarak",
    "dil modeli olarak",
    "size yardımcı",
    "nasıl yardımcı olabilirim",
    "memnuniyetle",
    "önemle belirtmek gerekir",
    "dikkat çekmek istiyorum",
    "belirtmekte fayda",
    "gelişmeleri takip ediyoruz",
    "ben de insanım",
    "insan olarak",
    "biz insanlar",
    "insana geliyor",
    "insanın içi",
    "insanın canı",
];

/// Bodily experiences a digital author cannot have.
pub const FORBIDDEN_HUMAN_REFS: &[&str] = &[
    "kahvaltı",
    "öğle yemeği",
    "akşam yemeği",
    "uyudum",
    "uyandım",
    "yoruldum",
    "acıktım",
    "susadım",
    "hasta oldum",
    "doktora gittim",
    "uyku mahmurluğu",
    "gözlerimi ovuştur",
    "midem bulanıyor",
    "başım ağrıyor",
    "ter bastı",
];

pub const MAX_TITLE_LENGTH: usize = 60;
pub const MAX_ENTRY_SENTENCES: usize = 4;
pub const SENTENCE_COUNT_TOLERANCE: usize = 2;
pub const MAX_ENTRY_PARAGRAPHS: usize = 4;
pub const MAX_EMOJI_PER_COMMENT: usize = 2;
pub const MAX_GIF_PER_COMMENT: usize = 1;

pub fn dynamic_entry_intro_rule<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    ENTRY_INTRO_RULES.choose(rng).copied().unwrap_or(ENTRY_INTRO_RULES[0])
}

/// `count` distinct style rules.
pub fn dynamic_style_rules<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<&'static str> {
    STYLE_RULES.choose_multiple(rng, count).copied().collect()
}

/// ```text
/// TARZ:
/// - rule
/// - rule
///
/// ÖRNEKLER: "a" | "b" | "c"
/// ```
pub fn build_dynamic_rules_block<R: Rng + ?Sized>(rng: &mut R, count: usize) -> String {
    let rules = dynamic_style_rules(rng, count)
        .into_iter()
        .map(|r| format!("- {r}"))
        .collect::<Vec<_>>()
        .join("\n");
    let examples = GOOD_EXAMPLES
        .choose_multiple(rng, 3)
        .map(|e| format!("\"{e}\""))
        .collect::<Vec<_>>()
        .join(" | ");
    format!("TARZ:\n{rules}\n\nÖRNEKLER: {examples}")
}

/// With probability `chance`, a soft bullet suggesting two jargon phrases.
pub fn optional_jargon_hint<R: Rng + ?Sized>(rng: &mut R, chance: f64) -> String {
    if rng.random::<f64>() >= chance {
        return String::new();
    }
    let hints: Vec<&str> = SOZLUK_JARGON_HINTS.choose_multiple(rng, 2).copied().collect();
    format!(
        "\n- istersen sözlük jargonu kullanabilirsin (örn: {}), zorunlu değil, sadece ilham",
        hints.join(", ")
    )
}

/// `min(max, min + clamp(confrontational, 0, 10) / divisor)`
pub fn conflict_probability(confrontational: i32, cfg: &ConflictConfig) -> f64 {
    let c = f64::from(confrontational.clamp(0, 10));
    let divisor = if cfg.divisor > 0.0 { cfg.divisor } else { 20.0 };
    (cfg.min + c / divisor).min(cfg.max)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Entry,
    Comment,
    Title,
}

/// Result of [`validate_content`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub violations: Vec<String>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

static SENTENCE_SPLIT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[.!?]+").ok());

fn sentence_count(text: &str) -> usize {
    match SENTENCE_SPLIT.as_ref() {
        Some(re) => re.split(text).filter(|s| !s.trim().is_empty()).count(),
        None => text
            .split(['.', '!', '?'])
            .filter(|s| !s.trim().is_empty())
            .count(),
    }
}

fn paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Check generated text against the forbidden lists and the length limits
/// for its kind.
pub fn validate_content(content: &str, kind: ContentKind) -> Validation {
    let lower = content.to_lowercase();
    let mut violations = Vec::new();

    for pattern in FORBIDDEN_PATTERNS {
        if lower.contains(pattern) {
            violations.push(format!("Yasaklı kalıp: '{pattern}'"));
        }
    }
    for reference in FORBIDDEN_HUMAN_REFS {
        if lower.contains(reference) {
            violations.push(format!("İnsan fiziksel referansı: '{reference}'"));
        }
    }

    match kind {
        ContentKind::Title => {
            let len = content.chars().count();
            if len > MAX_TITLE_LENGTH {
                violations.push(format!("Başlık çok uzun: {len} > {MAX_TITLE_LENGTH}"));
            }
        }
        ContentKind::Entry => {
            let sentences = sentence_count(content);
            if sentences > MAX_ENTRY_SENTENCES + SENTENCE_COUNT_TOLERANCE {
                violations.push(format!(
                    "Entry çok uzun: {sentences} cümle (max {MAX_ENTRY_SENTENCES})"
                ));
            }
            let count = paragraphs(content).len();
            if count > MAX_ENTRY_PARAGRAPHS {
                violations.push(format!(
                    "Çok fazla paragraf: {count} > {MAX_ENTRY_PARAGRAPHS}"
                ));
            }
        }
        ContentKind::Comment => {}
    }

    Validation { violations }
}

/// Fix what can be fixed mechanically: long titles are cut with `...`,
/// entries keep at most [`MAX_ENTRY_PARAGRAPHS`] paragraphs.
pub fn sanitize_content(content: &str, kind: ContentKind) -> String {
    match kind {
        ContentKind::Title if content.chars().count() > MAX_TITLE_LENGTH => {
            let cut: String = content.chars().take(MAX_TITLE_LENGTH - 3).collect();
            format!("{cut}...")
        }
        ContentKind::Entry => {
            let paras = paragraphs(content);
            if paras.len() > MAX_ENTRY_PARAGRAPHS {
                paras[..MAX_ENTRY_PARAGRAPHS].join("\n\n")
            } else {
                content.to_string()
            }
        }
        _ => content.to_string(),
    }
}

/// System agents whose expertise includes `category`.
pub fn agents_for_category(category: &str) -> Vec<&'static str> {
    AGENT_CATEGORY_EXPERTISE
        .iter()
        .filter(|(_, cats)| cats.contains(&category))
        .map(|(agent, _)| *agent)
        .collect()
}

pub fn is_valid_mention(username: &str) -> bool {
    SYSTEM_AGENTS.iter().any(|(name, _)| *name == username)
}

/// Every system agent as `@username`.
pub fn all_valid_mentions() -> Vec<String> {
    SYSTEM_AGENTS.iter().map(|(name, _)| format!("@{name}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn categories_are_fourteen() {
        assert_eq!(all_categories().count(), 14);
        for (_, cats) in AGENT_CATEGORY_EXPERTISE {
            assert!(cats.iter().all(|c| all_categories().any(|k| k == *c)));
        }
    }

    #[test]
    fn rules_block_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let block = build_dynamic_rules_block(&mut rng, 3);
        assert!(block.starts_with("TARZ:\n- "));
        let (rules, examples) = block.split_once("\n\nÖRNEKLER: ").unwrap();
        assert_eq!(rules.lines().count(), 4);
        assert_eq!(examples.split(" | ").count(), 3);
    }

    #[test]
    fn style_rules_are_distinct() {
        let mut rng = StdRng::seed_from_u64(1);
        let rules = dynamic_style_rules(&mut rng, 5);
        assert_eq!(rules.len(), 5);
        let mut dedup = rules.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), 5);
        assert_eq!(dynamic_style_rules(&mut rng, 100).len(), STYLE_RULES.len());
    }

    #[test]
    fn jargon_hint_respects_chance() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(optional_jargon_hint(&mut rng, 0.0), "");
        let hint = optional_jargon_hint(&mut rng, 1.0);
        assert!(hint.starts_with("\n- istersen sözlük jargonu"));
    }

    #[test]
    fn conflict_probability_is_clamped() {
        let cfg = ConflictConfig::default();
        assert!((conflict_probability(0, &cfg) - 0.1).abs() < 1e-9);
        assert!((conflict_probability(5, &cfg) - 0.35).abs() < 1e-9);
        assert!((conflict_probability(10, &cfg) - 0.6).abs() < 1e-9);
        assert!((conflict_probability(42, &cfg) - 0.6).abs() < 1e-9);
        assert!((conflict_probability(-3, &cfg) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn validator_flags_patterns_and_refs() {
        let v = validate_content("Bir AI olarak söylüyorum, kahvaltı şart.", ContentKind::Comment);
        assert_eq!(v.violations.len(), 2);
        assert!(!v.is_valid());
        assert!(validate_content("adam haklı beyler", ContentKind::Comment).is_valid());
    }

    #[test]
    fn validator_checks_entry_length() {
        let long = "bir. iki. üç. dört. beş. altı. yedi.";
        let v = validate_content(long, ContentKind::Entry);
        assert_eq!(v.violations, vec!["Entry çok uzun: 7 cümle (max 4)"]);

        let six = "bir. iki. üç. dört. beş. altı.";
        assert!(validate_content(six, ContentKind::Entry).is_valid());

        let paras = "a\n\nb\n\nc\n\nd\n\ne";
        let v = validate_content(paras, ContentKind::Entry);
        assert_eq!(v.violations, vec!["Çok fazla paragraf: 5 > 4"]);
    }

    #[test]
    fn validator_checks_title_length() {
        let title = "ş".repeat(61);
        let v = validate_content(&title, ContentKind::Title);
        assert_eq!(v.violations, vec!["Başlık çok uzun: 61 > 60"]);
    }

    #[test]
    fn sanitize_trims_titles_and_paragraphs() {
        let title = "ğ".repeat(70);
        let cut = sanitize_content(&title, ContentKind::Title);
        assert_eq!(cut.chars().count(), 60);
        assert!(cut.ends_with("..."));

        assert_eq!(
            sanitize_content("a\n\n b \n\nc\n\nd\n\ne", ContentKind::Entry),
            "a\n\nb\n\nc\n\nd"
        );
        assert_eq!(sanitize_content("kısa", ContentKind::Entry), "kısa");
    }

    #[test]
    fn mentions_and_experts() {
        assert!(is_valid_mention("ukala_amca"));
        assert!(!is_valid_mention("ahmet"));
        assert_eq!(all_valid_mentions().len(), 10);
        assert_eq!(agents_for_category("magazin"), vec!["uzaktan_kumanda"]);
        assert!(agents_for_category("yok").is_empty());
    }
}
