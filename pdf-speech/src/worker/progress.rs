//! Progress notifications from the worker to the presentation layer.

use super::state::RunReport;
use tokio::sync::mpsc::UnboundedSender;

/// A notification emitted by a running conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Overall progress, 0-100.
    Progress(f32),
    /// Human-readable status line.
    Log(String),
    /// The run ended. Always the last event of a run.
    Finished(RunReport),
}

/// Receiver of worker notifications.
///
/// Implementations must not block; the worker calls these between chunks.
pub trait ProgressSink: Send {
    fn progress(&self, percent: f32);

    fn log(&self, line: &str);

    fn finished(&self, _report: &RunReport) {}
}

/// Fire-and-forget delivery over a tokio channel. A dropped receiver is
/// ignored so a closed front end never stalls the run.
impl ProgressSink for UnboundedSender<ProgressEvent> {
    fn progress(&self, percent: f32) {
        let _ = self.send(ProgressEvent::Progress(percent));
    }

    fn log(&self, line: &str) {
        let _ = self.send(ProgressEvent::Log(line.to_string()));
    }

    fn finished(&self, report: &RunReport) {
        let _ = self.send(ProgressEvent::Finished(report.clone()));
    }
}
