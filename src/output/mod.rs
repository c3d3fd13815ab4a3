// Output formatting: terminal display of corpus samples, topics, and counts.

use std::borrow::Cow;

pub mod terminal;

/// The first `max_chars` characters of `text`, with "..." appended when
/// anything was cut. Borrows when the text already fits.
pub fn preview(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_is_borrowed() {
        assert!(matches!(preview("京都", 5), Cow::Borrowed("京都")));
        assert!(matches!(preview("京都", 2), Cow::Borrowed("京都")));
    }

    #[test]
    fn test_preview_cuts_on_character_boundary() {
        assert_eq!(preview("京都に行きました", 3), "京都に...");
        assert_eq!(preview("京都", 0), "...");
    }
}
