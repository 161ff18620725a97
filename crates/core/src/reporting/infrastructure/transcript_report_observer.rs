use std::fmt::Write;
use std::sync::{Mutex, PoisonError};

use crate::reporting::domain::report_observer::ReportObserver;
use crate::shared::capture_report::{CaptureReport, Outcome};
use crate::storage::domain::frame_writer::frame_file_name;

const SEPARATOR: &str = "----------------";

/// Accumulates the human-readable session log shown once scanning ends.
pub struct TranscriptReportObserver {
    text: Mutex<String>,
}

impl TranscriptReportObserver {
    pub fn new() -> Self {
        Self {
            text: Mutex::new(String::new()),
        }
    }

    pub fn text(&self) -> String {
        self.lock().clone()
    }

    /// Returns the transcript so far and starts a fresh one.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, String> {
        self.text.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TranscriptReportObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportObserver for TranscriptReportObserver {
    fn on_report(&self, report: &CaptureReport) {
        let name = frame_file_name(report.sequence_number);
        let mut text = self.lock();

        // Writing into a String cannot fail.
        let _ = write!(text, "Writing point cloud {} into ", report.sequence_number);
        match &report.destination {
            Some(path) => {
                let _ = writeln!(text, "{}", path.display());
            }
            None => {
                let _ = writeln!(text, "(no destination)");
            }
        }
        match &report.outcome {
            Outcome::Success => {
                let _ = writeln!(
                    text,
                    "Writing of {name} is finished and took {}ms.",
                    report.elapsed_ms()
                );
            }
            Outcome::Failure { kind, message } => {
                let _ = writeln!(text, "Writing of {name} failed ({kind}): {message}");
            }
        }
        let _ = writeln!(text, "{SEPARATOR}");
    }
}
