//! Sentence-aware text chunking for TTS processing.

use super::TextChunk;
use super::sentences::split_into_sentences;

/// Default maximum chunk size in characters.
pub const DEFAULT_MAX_CHARS: usize = 1500;

/// Split normalized text into TTS-friendly chunks.
///
/// Sentences are packed greedily into chunks of at most `max_chars`
/// characters, joined by single spaces. A sentence is only broken up when
/// it alone is longer than `max_chars`, in which case it is hard split into
/// `max_chars`-sized slices.
///
/// # Arguments
/// * `text` - Normalized page text
/// * `max_chars` - Maximum chunk length in characters (0 is treated as 1)
pub fn split(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);

    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();
    // Character length of `buffer` joined with single spaces.
    let mut buffer_len = 0;

    for sentence in split_into_sentences(text) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }

        let sentence_len = sentence.chars().count();

        if sentence_len > max_chars {
            // Flush first so chunks stay in reading order
            flush(&mut buffer, &mut buffer_len, &mut chunks);
            chunks.extend(hard_split(sentence, max_chars));
            continue;
        }

        let tentative = if buffer.is_empty() {
            sentence_len
        } else {
            buffer_len + 1 + sentence_len
        };

        if tentative <= max_chars {
            buffer.push(sentence);
            buffer_len = tentative;
        } else {
            flush(&mut buffer, &mut buffer_len, &mut chunks);
            buffer.push(sentence);
            buffer_len = sentence_len;
        }
    }

    flush(&mut buffer, &mut buffer_len, &mut chunks);

    chunks.retain(|c| !c.trim().is_empty());
    chunks
}

/// Emit the buffered sentences as one chunk and reset the buffer.
fn flush(buffer: &mut Vec<&str>, buffer_len: &mut usize, chunks: &mut Vec<String>) {
    if !buffer.is_empty() {
        chunks.push(buffer.join(" "));
        buffer.clear();
        *buffer_len = 0;
    }
}

/// Hard split text into slices of exactly `max_length` characters.
fn hard_split(text: &str, max_length: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let chars: Vec<char> = text.chars().collect();

    while start < chars.len() {
        let end = std::cmp::min(start + max_length, chars.len());
        let chunk: String = chars[start..end].iter().collect();
        chunks.push(chunk);
        start = end;
    }

    chunks
}

/// Process a page's normalized text into TTS-ready chunks.
///
/// # Arguments
/// * `page_id` - The page's zero-based index
/// * `text` - Normalized page text
/// * `max_chars` - Maximum chunk length in characters
pub fn process_page(page_id: usize, text: &str, max_chars: usize) -> Vec<TextChunk> {
    split(text, max_chars)
        .into_iter()
        .enumerate()
        .map(|(chunk_id, text)| TextChunk::new(page_id, chunk_id, text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_split_short_text() {
        let chunks = split("A. B. C.", DEFAULT_MAX_CHARS);
        assert_eq!(chunks, vec!["A. B. C."]);
    }

    #[test]
    fn test_split_empty_text() {
        assert!(split("", DEFAULT_MAX_CHARS).is_empty());
    }

    #[test]
    fn test_split_whitespace_only() {
        assert!(split("   \n\n   ", DEFAULT_MAX_CHARS).is_empty());
    }

    #[test]
    fn test_split_long_sentence() {
        let text = "X".repeat(2000);
        let chunks = split(&text, 1500);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 1500);
        assert_eq!(chunks[1].chars().count(), 500);
    }

    #[test]
    fn test_split_sentence_exactly_max() {
        let text = format!("{}.", "a".repeat(99));
        let chunks = split(&text, 100);
        assert_eq!(chunks, vec![text]);
    }

    #[test]
    fn test_split_packs_sentences_greedily() {
        let text = "First one. Second one. Third one.";
        // "First one. Second one." is exactly 22 characters
        let chunks = split(text, 22);
        assert_eq!(chunks, vec!["First one. Second one.", "Third one."]);
    }

    #[test]
    fn test_split_long_sentence_keeps_order() {
        let text = format!("Before. {}. After.", "Y".repeat(19));
        let chunks = split(&text, 10);
        assert_eq!(chunks, vec!["Before.", "YYYYYYYYYY", "YYYYYYYYY.", "After."]);
    }

    #[test]
    fn test_split_counts_characters_not_bytes() {
        let text = "é".repeat(5);
        let chunks = split(&text, 2);
        assert_eq!(chunks, vec!["éé", "éé", "é"]);
    }

    #[test]
    fn test_split_zero_max_chars() {
        let chunks = split("ab", 0);
        assert_eq!(chunks, vec!["a", "b"]);
    }

    #[test]
    fn test_hard_split() {
        let parts = hard_split("abcdefghij", 3);
        assert_eq!(parts, vec!["abc", "def", "ghi", "j"]);
    }

    #[test]
    fn test_process_page() {
        let chunks = process_page(3, "Hello world. This is a test.", DEFAULT_MAX_CHARS);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].page_id, 3);
        assert_eq!(chunks[0].chunk_id, 0);
        assert_eq!(chunks[0].text, "Hello world. This is a test.");
    }

    #[test]
    fn test_process_page_multiple_chunks() {
        let text = "First sentence. Second sentence. Third sentence. Fourth sentence.";
        let chunks = process_page(5, text, 20);
        assert_eq!(chunks.len(), 4);
        assert!(chunks.iter().all(|c| c.page_id == 5));
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_id, i);
        }
    }

    fn non_whitespace(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    proptest! {
        #[test]
        fn prop_chunks_respect_limit(
            s in "[a-z]{0,30}([.!?] [a-z ]{0,40}){0,20}",
            max in 1usize..80,
        ) {
            for chunk in split(&s, max) {
                prop_assert!(chunk.chars().count() <= max);
                prop_assert!(!chunk.trim().is_empty());
            }
        }

        #[test]
        fn prop_chunks_preserve_content(
            s in "[a-zA-Z,]{0,30}([.!?][ \n][a-zA-Z ,]{0,60}){0,20}",
            max in 1usize..120,
        ) {
            let joined = split(&s, max).join(" ");
            prop_assert_eq!(non_whitespace(&joined), non_whitespace(&s));
        }
    }
}
