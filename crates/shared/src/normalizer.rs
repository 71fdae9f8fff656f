//! Text cleanup for headlines and summaries.
//!
//! Everything here is a pure function and idempotent: running a normalized
//! string through the same function again returns it unchanged.

/// Maximum headline length in characters, ellipsis included
pub const MAX_HEADLINE_CHARS: usize = 80;

pub const ELLIPSIS: &str = "...";

const DEVANAGARI_START: char = '\u{0900}';
const DEVANAGARI_END: char = '\u{097F}';

/// True for characters in the Devanagari block (U+0900..=U+097F)
pub fn is_devanagari(c: char) -> bool {
    (DEVANAGARI_START..=DEVANAGARI_END).contains(&c)
}

pub fn contains_devanagari(text: &str) -> bool {
    text.chars().any(is_devanagari)
}

fn is_allowed(c: char) -> bool {
    is_devanagari(c) || (' '..='~').contains(&c) || c.is_whitespace()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clean a raw text field.
///
/// Drops characters outside Devanagari, printable ASCII and whitespace,
/// collapses whitespace, and removes the space before commas and periods.
pub fn normalize_text(text: &str) -> String {
    let filtered: String = text.chars().filter(|&c| is_allowed(c)).collect();
    let collapsed = collapse_whitespace(&filtered);
    collapsed
        .replace(" ,", ",")
        .replace(" .", ".")
        .trim()
        .to_string()
}

/// Clean a headline and bound it to [`MAX_HEADLINE_CHARS`].
pub fn normalize_headline(text: &str) -> String {
    let cleaned = normalize_text(text);
    truncate_chars(&cleaned, MAX_HEADLINE_CHARS)
}

/// Cut `text` to at most `max_chars` characters, marking the cut with an ellipsis.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let keep = max_chars.saturating_sub(ELLIPSIS.chars().count());
    let prefix: String = text.chars().take(keep).collect();
    format!("{}{}", prefix.trim_end(), ELLIPSIS)
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
