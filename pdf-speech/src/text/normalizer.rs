//! Whitespace normalization for extracted page text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Runs of spaces and tabs.
static HORIZONTAL_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

/// Three or more consecutive newlines.
static NEWLINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Clean raw page text for TTS processing.
///
/// This function:
/// - Turns carriage returns into newlines
/// - Collapses runs of spaces/tabs into one space
/// - Caps blank-line runs at a single blank line
/// - Trims every line, then the whole result
pub fn normalize(text: &str) -> String {
    let text = text.replace('\r', "\n");
    let text = HORIZONTAL_WS.replace_all(&text, " ");
    let text = NEWLINE_RUN.replace_all(&text, "\n\n");

    let text = text.lines().map(str::trim).collect::<Vec<_>>().join("\n");

    // Trimming can empty a whitespace-only line and open a new run.
    let text = NEWLINE_RUN.replace_all(&text, "\n\n");

    text.trim().to_string()
}
