//! The page/chunk conversion loop executed on the worker thread.

use super::progress::ProgressSink;
use super::state::{ConversionSettings, ConversionState, RenderFailurePolicy, RunReport, RunState};
use crate::error::Result;
use crate::pdf::PdfReader;
use crate::text::{normalize, process_page};
use crate::tts::{SpeechEngine, SpeechRenderer};
use std::path::Path;

/// Shuts the renderer down when the run ends, whichever way it ends.
struct RendererGuard(Box<dyn SpeechRenderer>);

impl Drop for RendererGuard {
    fn drop(&mut self) {
        self.0.shutdown();
    }
}

/// Run one conversion to a terminal state.
///
/// Every error is caught here and turned into a `Failed` report.
pub(super) fn run_conversion(
    file: &Path,
    settings: &ConversionSettings,
    reader: &dyn PdfReader,
    engine: &dyn SpeechEngine,
    state: &mut ConversionState,
    sink: &dyn ProgressSink,
) -> RunReport {
    let mut report = RunReport::new(state.output_dir.clone());

    match convert(file, settings, reader, engine, state, sink, &mut report) {
        Ok(terminal) => report.state = terminal,
        Err(e) => {
            log::error!("Conversion of {} failed: {}", file.display(), e);
            sink.log(&format!("Error: {}", e));
            report.state = RunState::Failed;
            report.error = Some(e.to_string());
        }
    }

    log::info!(
        "Run ended {:?}: {} file(s), {} failed chunk(s)",
        report.state,
        report.files.len(),
        report.chunks_failed
    );
    report
}

fn convert(
    file: &Path,
    settings: &ConversionSettings,
    reader: &dyn PdfReader,
    engine: &dyn SpeechEngine,
    state: &mut ConversionState,
    sink: &dyn ProgressSink,
    report: &mut RunReport,
) -> Result<RunState> {
    log::info!(
        "Opening {} (voice {}, {} wpm, volume {:.1})",
        engine.name(),
        settings.voice.voice,
        settings.voice.rate_wpm,
        settings.voice.volume
    );
    let mut renderer = RendererGuard(engine.open(&settings.voice)?);

    sink.log("Extracting text from PDF...");
    let pages = reader.extract(file)?;

    if pages.iter().all(|p| p.trim().is_empty()) {
        sink.log("No text found in PDF");
        report.notice = Some("No text found in PDF".to_string());
        return Ok(RunState::Completed);
    }

    std::fs::create_dir_all(&state.output_dir)?;

    let total = pages.len();
    report.pages_total = total;

    for (i, page_text) in pages.iter().enumerate() {
        if state.is_cancelled() {
            return Ok(cancelled(sink));
        }

        state.current_page = i;
        state.current_chunk = 0;
        sink.progress(i as f32 / total as f32 * 100.0);
        sink.log(&format!("Processing page {}/{}", i + 1, total));

        let clean_text = normalize(page_text);
        if clean_text.is_empty() {
            continue;
        }

        for chunk in process_page(i, &clean_text, settings.max_chars) {
            if state.is_cancelled() {
                return Ok(cancelled(sink));
            }

            state.current_chunk = chunk.chunk_id;
            let output_file = state.output_dir.join(chunk.file_name());
            log::debug!(
                "Rendering {} ({} chars)",
                output_file.display(),
                chunk.text.chars().count()
            );

            match renderer.0.render_to_file(&chunk.text, &output_file) {
                Ok(()) => report.files.push(output_file),
                Err(e) => match settings.on_render_error {
                    RenderFailurePolicy::Continue => {
                        log::warn!("Skipping chunk: {}", e);
                        sink.log(&e.to_string());
                        report.chunks_failed += 1;
                    }
                    RenderFailurePolicy::Abort => return Err(e),
                },
            }
        }

        sink.log(&format!("Completed page {}", i + 1));
    }

    sink.progress(100.0);
    sink.log(&format!(
        "Conversion complete! Files saved to: {}",
        state.output_dir.display()
    ));

    Ok(RunState::Completed)
}

fn cancelled(sink: &dyn ProgressSink) -> RunState {
    sink.log("Conversion stopped by user");
    RunState::Cancelled
}
