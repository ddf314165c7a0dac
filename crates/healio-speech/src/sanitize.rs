//! Text cleanup before handing a reply to the TTS engine.

use std::sync::LazyLock;

use regex::Regex;

/// Emoji (presentation and extended pictographic) and `*` emphasis markers.
static UNSPOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Emoji_Presentation}\p{Extended_Pictographic}*]").unwrap()
});

/// Remove characters a speech engine would read out literally.
///
/// Only the characters themselves are removed; surrounding whitespace is kept.
pub fn strip_for_speech(text: &str) -> String {
    UNSPOKEN_RE.replace_all(text, "").into_owned()
}
