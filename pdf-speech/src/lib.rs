//! Convert PDF documents into per-chunk speech audio.
//!
//! The pipeline reads page text from a PDF, normalizes whitespace, packs
//! sentences into bounded chunks, and renders each chunk to a WAV file on a
//! single background worker thread with cooperative cancellation:
//!
//! - [`pdf`]: page extraction
//! - [`text`]: normalization and chunking
//! - [`tts`]: speech engine traits and the eSpeak NG backend
//! - [`worker`]: the cancellable conversion loop and its progress events

pub mod config;
pub mod error;
pub mod output;
pub mod pdf;
pub mod text;
pub mod tts;
pub mod worker;

pub use error::{ConversionError, Result};
pub use worker::{
    ConversionSettings, ConversionWorker, ProgressEvent, ProgressSink, RenderFailurePolicy,
    RunReport, RunState, StopHandle,
};
