use crate::models::LyricText;
use regex::Regex;
use std::sync::OnceLock;

/// Marks text-node boundaries in raw lyrics until cleaning
pub const SENTINEL: char = ';';

static SECTION_MARKER: OnceLock<Regex> = OnceLock::new();
static DISALLOWED_CHARS: OnceLock<Regex> = OnceLock::new();

/// `[Chorus]`, `[Verse 1: Name]` and the sentinel that follows them
fn section_marker() -> &'static Regex {
    SECTION_MARKER.get_or_init(|| Regex::new(r"\[[^\]]*\];?").unwrap())
}

/// Anything but ASCII letters, digits, whitespace, apostrophe, colon, semicolon
fn disallowed_chars() -> &'static Regex {
    DISALLOWED_CHARS.get_or_init(|| Regex::new(r"[^a-zA-Z\d\s:;']").unwrap())
}

/// Clean raw lyrics.
///
/// Markers are stripped before the character filter so their brackets and
/// contents never reach the word counts. Sentinels become line breaks last.
pub fn clean_lyrics(raw: &str) -> LyricText {
    let without_markers = section_marker().replace_all(raw, "");
    let filtered = disallowed_chars().replace_all(&without_markers, "");
    let text = filtered.replace(SENTINEL, "\n");
    LyricText::new(text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_allowed(c: char) -> bool {
        c.is_ascii_alphabetic() || c.is_numeric() || c.is_whitespace() || matches!(c, '\'' | ':' | ';')
    }

    #[test]
    fn test_markers_stripped_with_their_sentinel() {
        let cleaned = clean_lyrics("[Verse 1];Hello world;[Chorus];La la");
        assert_eq!(cleaned.as_str(), "Hello world\nLa la");
    }

    #[test]
    fn test_markers_without_sentinel_are_stripped() {
        let cleaned = clean_lyrics("[Verse 1] Hello world [Chorus] La la");
        assert!(!cleaned.as_str().contains('['));
        assert!(!cleaned.as_str().contains("Verse"));
        assert!(!cleaned.as_str().contains("Chorus"));
        assert_eq!(cleaned.words().collect::<Vec<_>>(), vec!["Hello", "world", "La", "la"]);
    }

    #[test]
    fn test_character_filter() {
        let cleaned = clean_lyrics("Don't stop!;Who's there? - it's me, 2 o'clock: yes");
        assert!(cleaned.as_str().chars().all(is_allowed));
        assert_eq!(cleaned.as_str(), "Don't stop\nWho's there  it's me 2 o'clock: yes");
    }

    #[test]
    fn test_marker_punctuation_does_not_leak_into_words() {
        let cleaned = clean_lyrics("[Intro: Kendrick Lamar & Rihanna];Loyalty");
        assert_eq!(cleaned.as_str(), "Loyalty");
        assert_eq!(cleaned.words().count(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(clean_lyrics("").is_empty());
        assert!(clean_lyrics("[Instrumental]").is_empty());
    }
}
