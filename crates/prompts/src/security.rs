//! Input hygiene for values interpolated into prompts.

pub const MAX_LINE_CHARS: usize = 500;
pub const MAX_MULTILINE_CHARS: usize = 2000;

/// Double braces so interpolated text cannot open a template slot.
pub fn escape_for_prompt(s: &str) -> String {
    s.replace('{', "{{").replace('}', "}}")
}

pub fn sanitize(s: &str) -> String {
    truncate_chars(s, MAX_LINE_CHARS)
}

pub fn sanitize_multiline(s: &str) -> String {
    truncate_chars(s, MAX_MULTILINE_CHARS)
}

/// First `max` characters of `s`, never splitting a character.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((end, _)) => s[..end].to_string(),
        None => s.to_string(),
    }
}
