// PDF parsing and per-page text extraction

use crate::error::{ConversionError, Result};
use std::path::Path;

/// Page break marker in extracted PDF text.
pub const PAGE_BREAK: char = '\x0C';

/// Source of raw page text for a document.
pub trait PdfReader: Send + Sync {
    /// Extract the raw text of every non-blank page, in reading order.
    fn extract(&self, path: &Path) -> Result<Vec<String>>;
}

/// Reader backed by the `pdf-extract` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractReader;

impl PdfReader for PdfExtractReader {
    fn extract(&self, path: &Path) -> Result<Vec<String>> {
        let bytes = std::fs::read(path).map_err(|e| ConversionError::Extraction {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        // pdf-extract panics on some malformed documents
        let pages =
            std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(&bytes))
                .map_err(|_| ConversionError::Extraction {
                    path: path.to_path_buf(),
                    message: "PDF parser crashed on malformed input".to_string(),
                })?
                .map_err(|e| ConversionError::Extraction {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;

        let pages = non_blank_pages(pages);
        log::debug!(
            "Extracted {} non-blank page(s), ~{} words, from {}",
            pages.len(),
            total_words(&pages),
            path.display()
        );
        Ok(pages)
    }
}

/// Split form-feed delimited text into pages, dropping blank pages.
pub fn split_pages(text: &str) -> Vec<String> {
    non_blank_pages(text.split(PAGE_BREAK).map(str::to_string))
}

fn non_blank_pages(pages: impl IntoIterator<Item = String>) -> Vec<String> {
    pages
        .into_iter()
        .filter(|page| !page.trim().is_empty())
        .collect()
}

/// Approximate word count across pages.
pub fn total_words(pages: &[String]) -> usize {
    pages.iter().map(|p| p.split_whitespace().count()).sum()
}
