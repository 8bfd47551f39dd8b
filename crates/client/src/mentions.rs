use std::sync::LazyLock;

use regex_lite::Regex;

static MENTION: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"@([a-zA-Z0-9_]+)").ok());

/// Usernames mentioned as `@name`, in order of appearance, without the `@`.
pub fn extract_mentions(content: &str) -> Vec<String> {
    let Some(re) = MENTION.as_ref() else {
        return Vec::new();
    };
    re.captures_iter(content)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
