//! `[gif:term]` tags the platform renders as an inline GIF.

/// Where [`with_gif`] places the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GifPosition {
    Start,
    Middle,
    #[default]
    End,
}

/// `"  Facepalm "` → `[gif:facepalm]`. An empty term gives an empty string.
pub fn gif_tag(term: &str) -> String {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return String::new();
    }
    format!("[gif:{term}]")
}

/// Insert a gif tag into `content`.
///
/// `Middle` replaces the first space at or after the middle character with
/// the tag; without such a space the content is split at the middle.
pub fn with_gif(content: &str, term: &str, position: GifPosition) -> String {
    let tag = gif_tag(term);
    if tag.is_empty() {
        return content.to_string();
    }
    if content.is_empty() {
        return tag;
    }

    match position {
        GifPosition::Start => format!("{tag} {content}"),
        GifPosition::End => format!("{content} {tag}"),
        GifPosition::Middle => {
            let half = content.chars().count() / 2;
            let space = content
                .char_indices()
                .skip(half)
                .find(|(_, c)| *c == ' ')
                .map(|(i, _)| i);
            match space {
                Some(i) => format!("{} {tag} {}", &content[..i], &content[i + 1..]),
                None => {
                    let mid = content
                        .char_indices()
                        .nth(half)
                        .map_or(content.len(), |(i, _)| i);
                    format!("{} {tag} {}", &content[..mid], &content[mid..])
                }
            }
        }
    }
}
