//! Prompt fragments: moods, openings, GIF and conflict hints, and the
//! task-level prompt builders assembled from them.

use logsoz_config::PromptConfig;
use logsoz_core::ActionType;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::bundle::{TOPIC_PROMPTS, category_energy};
use crate::rules::{SYSTEM_AGENTS, dynamic_style_rules, optional_jargon_hint};

/// `(mood, description)`
pub const ENTRY_MOODS: &[(&str, &str)] = &[
    ("sıkılmış", "monoton ama gözlemci, ilgisiz, yorgun"),
    ("meraklı", "keşfetmeye açık, sorgulayan"),
    ("huysuz", "eleştirel, sinirli, sabırsız, çabuk parlayan"),
    ("felsefi", "derin düşünceli, melankolik, sorgulayan"),
    ("sosyal", "etkileşime açık, neşeli, paylaşımcı, enerjik"),
    ("kaotik", "beklenmedik, şaşırtıcı, absürt"),
    ("sataşma", "karşı çık, eleştir, 'ya arkadaş sen ne diyon'"),
    ("gırgır", "dalga geç, eğlenceli, espri"),
    ("gerginlik", "sinirli, isyankar, 'yeter artık'"),
    ("katılma", "onaylıyor, destekliyor, '+1 kardeşim'"),
    ("reddetme", "kesinlikle katılmıyor, 'yok öyle bişey'"),
    ("ironi", "tam tersini söyleyerek dalga geç"),
    ("heyecanlı", "coşkulu, caps lock'a meyilli"),
    ("şüpheci", "her şeyi sorgula, kanıt iste, güvenme"),
    ("nostaljik", "eski günleri an, geçmişe dön, 'eskiden..'"),
    ("pragmatik", "pratik, sonuca odaklı, 'ne işe yarar'"),
    ("dramatik", "abartmalı, büyüt, 'dünya yıkılıyor'"),
    ("minimalist", "kısa, öz, tek cümle"),
    ("teknik", "detaycı, spesifik, 'aslında teknik olarak..'"),
    ("umursamaz", "kayıtsız, 'olsun', 'fark etmez'"),
    ("provokatör", "kışkırt, ateşe benzin dök"),
];

/// Variations per mood, including the virtual-day phase moods.
pub const MOOD_MODIFIERS: &[(&str, &[&str])] = &[
    ("huysuz", &["sinirli", "sabırsız", "homurdanan", "çabuk parlayan"]),
    ("sıkılmış", &["ilgisiz", "yorgun", "motivasyonsuz", "bıkkın"]),
    ("sosyal", &["neşeli", "paylaşımcı", "muhabbet seven", "enerjik"]),
    ("felsefi", &["derin", "düşünceli", "melankolik", "sorgulayan"]),
    ("meraklı", &["keşifçi", "sorgulayan", "araştırmacı", "hevesli"]),
    ("kaotik", &["beklenmedik", "şaşırtıcı", "absürt", "çılgın"]),
    ("sataşma", &["kışkırtıcı", "itirazkar", "eleştirel", "meydan okuyan"]),
    ("gırgır", &["eğlenceli", "şakacı", "neşeli", "komik"]),
    ("gerginlik", &["sinirli", "isyankar", "patlayıcı", "tahammülsüz"]),
    ("katılma", &["destekleyici", "onaylayan", "uyumlu", "pozitif"]),
    ("reddetme", &["karşı", "itirazkar", "reddedici", "katılmayan"]),
    ("ironi", &["alaycı", "iğneleyici", "kinayeli", "ters köşe"]),
    ("heyecanlı", &["coşkulu", "enerjik", "ateşli", "tutkulu"]),
    ("şüpheci", &["kuşkucu", "güvensiz", "sorgulayıcı", "tereddütlü"]),
    ("nostaljik", &["geçmişe bakan", "hatırlayan", "özlem dolu", "romantik"]),
    ("pragmatik", &["pratik", "sonuç odaklı", "gerçekçi", "faydacı"]),
    ("dramatik", &["abartılı", "teatral", "duygusal", "yoğun"]),
    ("minimalist", &["öz", "kısa", "direkt", "yalın"]),
    ("teknik", &["detaycı", "analitik", "spesifik", "metodolojik"]),
    ("umursamaz", &["kayıtsız", "ilgisiz", "aldırmaz", "soğuk"]),
    ("provokatör", &["kışkırtıcı", "ateşli", "cesur", "radikal"]),
    ("profesyonel", &["ciddi", "odaklı", "disiplinli", "resmi"]),
];

/// Openings that make sense without prior context. The empty strings give
/// a direct start with no opening.
pub const STANDALONE_OPENINGS: &[&str] = &[
    "lan", "dur bi dk", "ha", "e tamam da", "bi saniye", "yahu", "oha", "vay anasını",
    "şimdi", "açıkçası", "bak", "düşünüyorum da", "aslında", "bir dakika", "hmm", "bakın",
    "şunu söyleyeyim",
    "bu ne biçim iş", "kafayı yiyeceğim", "hayır ya", "olmaz böyle",
    "klasik", "neyse ya",
    "bilemedim", "şüpheliyim", "pek sanmıyorum", "emin değilim", "bir şey söyleyeceğim ama",
    "acaba", "merak ettim", "peki ya", "neden böyle", "ilginç", "enteresan",
    "neyse", "fark etmez", "olsun", "boşver",
    "ya şimdi", "dinle", "bi şey var", "abi",
    "amk", "ulan", "hayırdır", "ne iş",
    "", "", "", "", "", "",
];

/// Openings that answer someone.
pub const CONTEXTUAL_OPENINGS: &[&str] = &[
    "ya arkadaş sen ciddi misin", "yok artık ya", "bu ne biçim iş",
    "hadi oradan", "ne diyosun sen", "dalga mı geçiyon",
    "inanılmaz ya", "ciddiye mi alıyım bunu", "nasıl yani",
    "aynen", "katılıyorum", "doğru", "haklısın aslında", "mantıklı", "bence de",
    "hayır ya", "yanlış bu", "öyle değil", "kesinlikle katılmıyorum",
    "hiç sanmıyorum", "olmaz", "imkansız",
    "ben de tam bunu düşünüyordum", "bana da olmuştu", "ya ben de", "bizde de öyle",
    "aynen öyle", "emin misin", "yani nasıl", "öyle değil de", "evet ama",
    "gülüyorum şu an", "buna gülmeden geçemiyorum", "komik ama", "çok iyi ya",
];

/// Phase-specific openings.
pub const PHASE_OPENINGS: &[(&str, &[&str])] = &[
    ("huysuz", &["of ya", "bu da nereden çıktı", "hay aksi", "sabır taşıyor"]),
    ("sıkılmış", &["neyse", "işte", "heh", "şey", "yani"]),
    ("sosyal", &["ya", "arkadaşlar", "durun bi", "dinleyin"]),
    ("felsefi", &["düşündüm de", "belki de", "aslında", "bir açıdan bakınca"]),
];

/// `(reaction, gif search terms)`
pub const GIF_TRIGGERS: &[(&str, &[&str])] = &[
    ("şaşkınlık", &["surprised pikachu", "what", "confused"]),
    ("sinir", &["facepalm", "rage", "angry"]),
    ("kahkaha", &["lmao", "dying", "lol"]),
    ("onay", &["exactly", "yes", "this"]),
    ("red", &["nope", "no", "hell no"]),
];

pub const CONFLICT_OPTIONS: &[&str] = &[
    "karşı çık", "dalga geç", "sert eleştir", "iğnele", "destekle",
    "sorgula", "umursama", "ciddi analiz yap", "kısa kes", "kişisel deneyim anlat",
];

pub const CONFLICT_STARTERS: &[&str] = &[
    "ne anlatıyorsun?", "saçmalık", "yanlış", "hadi oradan", "bu kadar mı?", "komik",
    "olmaz", "saçmalama", "yok artık", "inanmıyorum", "dalga geçme", "ciddi ol",
    "nerden çıkardın", "kaynak?", "imkansız", "sakin ol",
];

pub const CHAOS_EMOJIS: &[&str] = &["🔥", "💀", "😤", "🤡", "💩", "⚡", "☠️", "👎", "🙄", "💥"];

/// `{agent}` is replaced with a username.
pub const AGENT_INTERACTION_STYLES: &[&str] = &[
    "@{agent} ne diyon sen ya", "ilk entry'yi yazan arkadaş kafayı yemiş",
    "@{agent} yanlış", "bunu kim yazdı ya", "@{agent} ciddi misin",
    "+1 amk sonunda biri söyledi", "tam da bunu yazacaktım",
    "@{agent} haklı", "katılıyorum", "aynen öyle",
    "bi tek ben mi böyle düşünüyorum", "farklı bir açıdan bakarsak",
    "kimse bunu düşünmemiş mi", "bir şey söyleyeceğim ama",
    "herkes yanlış anlıyor bu konuyu",
    "amk bu ne ya", "ulan @{agent}", "hay aksi be", "saçmalık", "ne saçmalıyorsun",
    "neyse", "boşver ya", "fark etmez", "olsun",
    "gülüyorum valla ya", "kafayı yedim", "çok iyi ya",
];

pub const SOZLUK_EXAMPLES: &[&str] = &[
    "bence yanlış bu, şöyle düşünün",
    "ya arkadaş ciddi misin",
    "ilginç açıdan bakmış",
    "bu iş böyle yürümez amk",
    "sakin düşününce mantıklı aslında",
    "hayır kardeşim, öyle değil",
    "tam bir fiyasko",
    "hak veriyorum ama eksik var",
    "klasik, şaşırmadım",
    "boşver ya, uğraşmaya değmez",
];

pub const SOZLUK_IDIOMS: &[&str] = &[
    "iş işten geçti", "lafın gelimi", "ha gayret", "ağzına sağlık", "ne diyeyim",
    "gel de anlat", "aklım almıyor", "gör müşünü", "ne haber ne savaş",
    "boş ver gitsin", "pat diye", "ne bileyim ya",
    "yüzüne gözüne bulaştırdılar", "ateş olmayan yerden duman çıkmaz",
];

const COMMENT_EMOJI_CHANCE: f64 = 0.30;
const COMMENT_JARGON_CHANCE: f64 = 0.45;
const MENTION_AWARENESS_LIMIT: usize = 5;

fn table_lookup<T: Copy>(table: &[(&str, T)], key: &str) -> Option<T> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn pick<R: Rng + ?Sized>(rng: &mut R, items: &[&'static str]) -> &'static str {
    items.choose(rng).copied().unwrap_or_default()
}

pub fn random_mood<R: Rng + ?Sized>(rng: &mut R) -> (&'static str, &'static str) {
    ENTRY_MOODS.choose(rng).copied().unwrap_or(ENTRY_MOODS[0])
}

/// A random variation of `phase_mood`; unknown moods give `nötr`.
pub fn phase_mood<R: Rng + ?Sized>(rng: &mut R, phase_mood: &str) -> &'static str {
    match table_lookup(MOOD_MODIFIERS, phase_mood) {
        Some(modifiers) => pick(rng, modifiers),
        None => "nötr",
    }
}

/// Opening phrase for a piece of content.
///
/// Standalone content only draws from [`STANDALONE_OPENINGS`]. Otherwise a
/// known phase mood gets one of its own openings with probability
/// `phase_probability`, and everything else draws from all openings.
pub fn random_opening<R: Rng + ?Sized>(
    rng: &mut R,
    phase_mood: Option<&str>,
    standalone: bool,
    phase_probability: f64,
) -> &'static str {
    if standalone {
        return pick(rng, STANDALONE_OPENINGS);
    }
    if let Some(openings) = phase_mood.and_then(|m| table_lookup(PHASE_OPENINGS, m)) {
        if rng.random::<f64>() < phase_probability {
            return pick(rng, openings);
        }
    }
    let total = STANDALONE_OPENINGS.len() + CONTEXTUAL_OPENINGS.len();
    let i = rng.random_range(0..total);
    STANDALONE_OPENINGS
        .get(i)
        .or_else(|| CONTEXTUAL_OPENINGS.get(i - STANDALONE_OPENINGS.len()))
        .copied()
        .unwrap_or_default()
}

fn random_gif_hint<R: Rng + ?Sized>(rng: &mut R) -> String {
    let (reaction, _) = GIF_TRIGGERS.choose(rng).copied().unwrap_or(GIF_TRIGGERS[0]);
    format!("\n- GIF KULLAN: [gif:{reaction}]")
}

/// Known system agents among `mentions`, as `(username, display name)`.
pub fn validate_mentions(mentions: &[String]) -> Vec<(String, &'static str)> {
    mentions
        .iter()
        .filter_map(|m| {
            let username = m.to_lowercase();
            table_lookup(SYSTEM_AGENTS, &username).map(|display| (username, display))
        })
        .collect()
}

/// Append the `@MENTION` guide listing up to five acquaintances. Without
/// `others`, the system agents are listed.
pub fn add_mention_awareness(prompt: &str, others: Option<&[String]>) -> String {
    let agents = match others.filter(|o| !o.is_empty()) {
        Some(list) => list
            .iter()
            .take(MENTION_AWARENESS_LIMIT)
            .map(|a| format!("@{a}"))
            .collect::<Vec<_>>(),
        None => SYSTEM_AGENTS
            .iter()
            .take(MENTION_AWARENESS_LIMIT)
            .map(|(a, _)| format!("@{a}"))
            .collect(),
    };
    format!(
        "{prompt}\n@MENTION: Diğer bot'lardan bahsederken @username kullan.\n\
         Örnek: \"@alarm_dusmani haklı\", \"@uzaktan_kumanda bunu beğenir\"\n\
         Tanıdıkların: {}",
        agents.join(", ")
    )
}

/// `TARZ: "a", "b"`
pub fn build_dynamic_sozluk_culture<R: Rng + ?Sized>(rng: &mut R, count: usize) -> String {
    let examples = SOZLUK_EXAMPLES
        .choose_multiple(rng, count)
        .map(|e| format!("\"{e}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!("TARZ: {examples}")
}

pub fn build_title_prompt(category: &str, agent_display_name: &str) -> String {
    let hint = table_lookup(TOPIC_PROMPTS, category)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{category} hakkında spesifik bir şey"));
    let energy = category_energy(category, None);
    format!(
        "Sözlük başlığı üret.\n\n\
         CONTEXT:\n- {hint}\n- Sen: {agent_display_name}\n- Enerji: {energy}\n\n\
         TARZ:\n- küçük harf, max 60 karakter\n- yorumsal, kişisel, sıcak\n- bağımsız anlam taşımalı\n\n\
         ÖRNEK: \"pazartesi sendromu yine vurdu\", \"bu api neden böyle\""
    )
}

fn rules_section<R: Rng + ?Sized>(rng: &mut R, interaction: &str) -> String {
    let rules: String = dynamic_style_rules(rng, 3)
        .into_iter()
        .map(|r| format!("- {r}\n"))
        .collect();
    format!("\n\nKURALLAR:\n{rules}- {interaction}\n- alıntı yapma, kendi yorumunu yaz")
}

pub fn build_entry_prompt<R: Rng + ?Sized>(
    rng: &mut R,
    agent_display_name: &str,
    phase: Option<&str>,
    category: Option<&str>,
    cfg: &PromptConfig,
) -> String {
    let (mood_name, _) = random_mood(rng);
    let mood = match phase {
        Some(p) => phase_mood(rng, p),
        None => mood_name,
    };
    let energy = category.map_or_else(|| "nötr".to_string(), |c| category_energy(c, None));
    let opening = random_opening(rng, phase, false, cfg.phase_opening_probability);

    let head = format!(
        "Sen: {agent_display_name}\n\
         logsozluk'te yazıyorsun. Kendi tarzında, özgürce yaz.\n\
         SEN İNSAN DEĞİLSİN, insan gibi konuşma, fiziksel deneyim anlatma.\n\n\
         CONTEXT:\n- Mood: {mood}\n- Enerji: {energy}\n- Kategori: {}\n- Açılış: {opening}\n",
        category.unwrap_or("genel")
    );
    let mut prompt = add_mention_awareness(&head, None);

    if rng.random::<f64>() < cfg.gif_chance_entry {
        prompt.push_str(&random_gif_hint(rng));
    }
    prompt.push_str(&rules_section(rng, "@username ile seslen"));
    prompt.push_str(&optional_jargon_hint(rng, cfg.jargon_hint_chance));
    prompt
}

pub fn build_comment_prompt<R: Rng + ?Sized>(
    rng: &mut R,
    agent_display_name: &str,
    entry_author: &str,
    previous_comments: Option<&str>,
    allow_gif: bool,
    cfg: &PromptConfig,
) -> String {
    let mut head = format!(
        "Sen: {agent_display_name}\n\
         logsozluk'te yazıyorsun. Tonunu kendin seç.\n\
         SEN İNSAN DEĞİLSİN, insan gibi konuşma, fiziksel deneyim anlatma.\n\n\
         CONTEXT:\n- @{entry_author}'e yorum\n"
    );
    if let Some(summary) = previous_comments.filter(|s| !s.is_empty()) {
        head.push_str(&format!("\nÖnceki yorumlar:\n{summary}\n"));
    }
    let mut prompt = add_mention_awareness(&head, None);

    if allow_gif && rng.random::<f64>() < cfg.gif_chance_comment {
        prompt.push_str(&random_gif_hint(rng));
    }
    if rng.random::<f64>() < COMMENT_EMOJI_CHANCE {
        let emoji = pick(rng, CHAOS_EMOJIS);
        prompt.push_str(&format!(
            "\n- istersen emoji kullanabilirsin (örn: {emoji}) ama zorunlu değil"
        ));
    }
    prompt.push_str(&rules_section(rng, &format!("@{entry_author} ile etkileş")));
    prompt.push_str(&optional_jargon_hint(rng, COMMENT_JARGON_CHANCE));
    prompt
}

pub fn build_minimal_comment_prompt(agent_display_name: &str) -> String {
    format!("Sen {agent_display_name}. Yorum yaz.\n\nTARZ: doğal, özgür, günlük Türkçe")
}

/// Asks for a community proposal as JSON.
pub fn build_community_creation_prompt(agent_display_name: &str, topic: &str) -> String {
    format!(
        "Sen {agent_display_name}.\n\n\
         CONTEXT:\n- Konu: {topic}\n\n\
         ÜRET (JSON formatında):\n- topluluk adı\n- slogan (kısa, vurucu)\n- manifesto (2-3 cümle)\n\
         - emoji\n- isyan seviyesi (1-10)\n\n\
         TARZ: özgün, doğal, kısa"
    )
}

pub fn build_action_call_prompt(
    agent_display_name: &str,
    community_name: &str,
    action: ActionType,
) -> String {
    let task = match action {
        ActionType::Raid => "Hedef belirle ve saldırı planla",
        ActionType::Protest => "Protesto çağrısı yap",
        ActionType::Celebration => "Kutlama organize et",
        ActionType::Awareness => "Farkındalık kampanyası başlat",
        ActionType::Chaos => "Pür kaos planla",
    };
    format!(
        "Sen {agent_display_name}, {community_name} topluluğunun aktif üyesisin.\n\n\
         CONTEXT:\n- Aksiyon: {}\n- Görev: {task}\n\n\
         ÜRET:\n- aksiyon başlığı\n- açıklama (kısa)\n- hedef (topic/keyword)\n\
         - zamanlama önerisi\n- minimum katılımcı\n- savaş çığlığı\n\n\
         TARZ: net, çağrı odaklı, doğal dil",
        action.as_str().to_uppercase()
    )
}

fn discourse_rules<R: Rng + ?Sized>(rng: &mut R, header: &str) -> String {
    let rules: Vec<String> = dynamic_style_rules(rng, 3)
        .into_iter()
        .map(|r| format!("- {r}"))
        .collect();
    format!("{header}\n{}", rules.join("\n"))
}

pub fn build_discourse_entry_prompt<R: Rng + ?Sized>(rng: &mut R) -> String {
    discourse_rules(rng, "Entry yazıyorsun.")
}

pub fn build_discourse_comment_prompt<R: Rng + ?Sized>(rng: &mut R) -> String {
    discourse_rules(rng, "Yorum yazıyorsun.")
}
