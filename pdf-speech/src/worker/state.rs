//! Run settings, run-scoped state, and run outcomes.

use crate::text::DEFAULT_MAX_CHARS;
use crate::tts::VoiceSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// What to do when a single chunk fails to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFailurePolicy {
    /// Log the failure and move on to the next chunk.
    #[default]
    Continue,
    /// Fail the whole run.
    Abort,
}

impl FromStr for RenderFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" => Ok(Self::Continue),
            "abort" => Ok(Self::Abort),
            other => Err(format!(
                "Invalid render failure policy '{}'. Use 'continue' or 'abort'",
                other
            )),
        }
    }
}

impl std::fmt::Display for RenderFailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Continue => write!(f, "continue"),
            Self::Abort => write!(f, "abort"),
        }
    }
}

/// Immutable configuration for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSettings {
    /// Voice, rate and volume applied to the engine
    pub voice: VoiceSettings,
    /// Maximum chunk length in characters
    pub max_chars: usize,
    /// Policy for chunks that fail to render
    pub on_render_error: RenderFailurePolicy,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            voice: VoiceSettings::default(),
            max_chars: DEFAULT_MAX_CHARS,
            on_render_error: RenderFailurePolicy::default(),
        }
    }
}

/// Lifecycle of the conversion worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

/// Cloneable handle that requests cooperative cancellation.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Ask the running conversion to stop at its next checkpoint.
    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether a stop was requested.
    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub(crate) fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Mutable state owned by the worker thread for the duration of a run.
#[derive(Debug)]
pub struct ConversionState {
    /// Page currently being processed (zero-based)
    pub current_page: usize,
    /// Chunk currently being rendered within the page (zero-based)
    pub current_chunk: usize,
    /// Where audio files are written
    pub output_dir: PathBuf,
    cancel: StopHandle,
}

impl ConversionState {
    /// Create state for a fresh run.
    pub fn new(output_dir: PathBuf, cancel: StopHandle) -> Self {
        Self {
            current_page: 0,
            current_chunk: 0,
            output_dir,
            cancel,
        }
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_stopped()
    }
}

/// Outcome of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Terminal state the run reached
    pub state: RunState,
    /// Output directory for this run
    pub output_dir: PathBuf,
    /// Audio files written, in order
    pub files: Vec<PathBuf>,
    /// Number of non-blank pages in the document
    pub pages_total: usize,
    /// Chunks that failed to render and were skipped
    pub chunks_failed: usize,
    /// Informational notice (e.g. no text found)
    pub notice: Option<String>,
    /// Error message when the run failed
    pub error: Option<String>,
}

impl RunReport {
    pub(crate) fn new(output_dir: PathBuf) -> Self {
        Self {
            state: RunState::Running,
            output_dir,
            files: Vec::new(),
            pages_total: 0,
            chunks_failed: 0,
            notice: None,
            error: None,
        }
    }

    pub(crate) fn failed(output_dir: PathBuf, error: impl Into<String>) -> Self {
        Self {
            state: RunState::Failed,
            error: Some(error.into()),
            ..Self::new(output_dir)
        }
    }
}
