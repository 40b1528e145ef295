//! Sentence boundary detection.

use once_cell::sync::Lazy;
use regex::Regex;

/// Terminal punctuation followed by whitespace. The boundary sits right
/// after the punctuation mark; the whitespace belongs to neither side.
static BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// Split text into sentences.
///
/// Sentences keep their terminal punctuation. Pieces are returned as-is,
/// callers trim and drop empties.
pub fn split_into_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in BOUNDARY.find_iter(text) {
        // '.', '!' and '?' are all one byte wide.
        sentences.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    sentences.push(&text[start..]);

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_into_sentences() {
        let sentences = split_into_sentences("Hello. World.");
        assert_eq!(sentences, vec!["Hello.", "World."]);
    }

    #[test]
    fn test_split_mixed_punctuation() {
        let sentences = split_into_sentences("Really?  Yes!\nGood. Done");
        assert_eq!(sentences, vec!["Really?", "Yes!", "Good.", "Done"]);
    }

    #[test]
    fn test_no_break_without_whitespace() {
        let sentences = split_into_sentences("Version 1.5 is out.Next");
        assert_eq!(sentences, vec!["Version 1.5 is out.Next"]);
    }

    #[test]
    fn test_trailing_whitespace_leaves_empty_tail() {
        let sentences = split_into_sentences("One. ");
        assert_eq!(sentences, vec!["One.", ""]);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(split_into_sentences(""), vec![""]);
    }
}
