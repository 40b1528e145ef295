//! Background conversion worker.
//!
//! The worker turns one PDF into a directory of WAV files, one per text
//! chunk, on a single background thread. The controlling side talks to it
//! through two channels only:
//!
//! - a [`StopHandle`] flag, polled before every page and every chunk
//! - a [`ProgressSink`] the worker pushes progress and log lines into
//!
//! At most one run is active at a time; `start` while running is rejected.
//! The worker reports `Running` during a run, then the run's terminal state
//! until [`ConversionWorker::reset`] or the next `start`.

mod progress;
mod run;
mod state;

pub use progress::{ProgressEvent, ProgressSink};
pub use state::{
    ConversionSettings, ConversionState, RenderFailurePolicy, RunReport, RunState, StopHandle,
};

use crate::error::{ConversionError, Result};
use crate::pdf::PdfReader;
use crate::tts::SpeechEngine;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

/// Publishes the run's outcome and clears the busy flag when the run ends.
///
/// An unwinding thread leaves `outcome` at `Failed`.
struct RunGuard {
    busy: Arc<AtomicBool>,
    last: Arc<Mutex<RunState>>,
    outcome: RunState,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = self.outcome;
        self.busy.store(false, Ordering::SeqCst);
    }
}

/// Drives PDF → text → chunks → audio on a background thread.
pub struct ConversionWorker {
    reader: Arc<dyn PdfReader>,
    engine: Arc<dyn SpeechEngine>,
    output_dir: PathBuf,
    busy: Arc<AtomicBool>,
    last: Arc<Mutex<RunState>>,
    stop: StopHandle,
}

impl ConversionWorker {
    /// Create an idle worker writing into `output_dir`.
    pub fn new(
        reader: Arc<dyn PdfReader>,
        engine: Arc<dyn SpeechEngine>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            reader,
            engine,
            output_dir: output_dir.into(),
            busy: Arc::new(AtomicBool::new(false)),
            last: Arc::new(Mutex::new(RunState::Idle)),
            stop: StopHandle::default(),
        }
    }

    /// Directory the worker writes audio files into.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `Running` while a run is in progress, otherwise the terminal state of
    /// the last run, or `Idle` before the first run and after [`reset`](Self::reset).
    pub fn state(&self) -> RunState {
        if self.busy.load(Ordering::SeqCst) {
            RunState::Running
        } else {
            *self.last.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// Return a finished worker to `Idle`. Does nothing while a run is active.
    pub fn reset(&self) {
        if !self.busy.load(Ordering::SeqCst) {
            *self.last.lock().unwrap_or_else(PoisonError::into_inner) = RunState::Idle;
        }
    }

    /// Handle that can stop the current run from any thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Request cooperative cancellation of the current run.
    pub fn stop(&self) {
        log::info!("Stop requested");
        self.stop.stop();
    }

    /// Start converting `file` on a background thread.
    ///
    /// Fails with [`ConversionError::Input`] when no file is given or it does
    /// not exist, and with [`ConversionError::Busy`] while another run is
    /// active. Everything after that is reported through `sink` and the
    /// returned handle; the last event is always [`ProgressEvent::Finished`].
    pub fn start<S>(
        &self,
        file: Option<&Path>,
        settings: ConversionSettings,
        sink: S,
    ) -> Result<RunHandle>
    where
        S: ProgressSink + 'static,
    {
        let file = file.ok_or_else(ConversionError::no_file)?;
        if !file.exists() {
            return Err(ConversionError::missing_file(file));
        }

        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ConversionError::Busy);
        }
        let mut guard = RunGuard {
            busy: Arc::clone(&self.busy),
            last: Arc::clone(&self.last),
            outcome: RunState::Failed,
        };

        self.stop.reset();

        let file = file.to_path_buf();
        let reader = Arc::clone(&self.reader);
        let engine = Arc::clone(&self.engine);
        let output_dir = self.output_dir.clone();
        let stop = self.stop.clone();

        log::info!("Starting conversion of {}", file.display());

        let thread = std::thread::Builder::new()
            .name("pdf-speech-worker".to_string())
            .spawn(move || {
                let mut state = ConversionState::new(output_dir, stop);
                let report = run::run_conversion(
                    &file,
                    &settings,
                    reader.as_ref(),
                    engine.as_ref(),
                    &mut state,
                    &sink,
                );
                guard.outcome = report.state;
                drop(guard);
                sink.finished(&report);
                report
            })?;

        Ok(RunHandle {
            thread,
            output_dir: self.output_dir.clone(),
        })
    }
}

/// Handle to a run in progress.
pub struct RunHandle {
    thread: JoinHandle<RunReport>,
    output_dir: PathBuf,
}

impl RunHandle {
    /// Block until the run ends and return its report.
    pub fn join(self) -> RunReport {
        self.thread.join().unwrap_or_else(|_| {
            RunReport::failed(self.output_dir, "Conversion worker panicked")
        })
    }
}
