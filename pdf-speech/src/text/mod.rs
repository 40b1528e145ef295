//! Text processing for TTS: normalization, sentence splitting, and chunking.

pub mod chunker;
mod normalizer;
mod sentences;

pub use chunker::{DEFAULT_MAX_CHARS, process_page, split};
pub use normalizer::normalize;

/// A chunk of page text ready for TTS processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// The page this chunk belongs to
    pub page_id: usize,
    /// The chunk index within the page
    pub chunk_id: usize,
    /// The text content
    pub text: String,
}

impl TextChunk {
    /// Create a new text chunk.
    pub fn new(page_id: usize, chunk_id: usize, text: String) -> Self {
        Self {
            page_id,
            chunk_id,
            text,
        }
    }

    /// Output file name for this chunk, e.g. `page_0001_chunk_01.wav`.
    pub fn file_name(&self) -> String {
        format!("page_{:04}_chunk_{:02}.wav", self.page_id + 1, self.chunk_id + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_chunk_creation() {
        let chunk = TextChunk::new(0, 1, "Hello world".to_string());
        assert_eq!(chunk.page_id, 0);
        assert_eq!(chunk.chunk_id, 1);
        assert_eq!(chunk.text, "Hello world");
    }

    #[test]
    fn test_text_chunk_file_name() {
        assert_eq!(
            TextChunk::new(0, 0, String::new()).file_name(),
            "page_0001_chunk_01.wav"
        );
        assert_eq!(
            TextChunk::new(41, 11, String::new()).file_name(),
            "page_0042_chunk_12.wav"
        );
    }
}
