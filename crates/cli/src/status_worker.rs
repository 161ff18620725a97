use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Receiver;

use cloudcap_core::capture::domain::capture_gate::CaptureGate;
use cloudcap_core::shared::capture_report::{CaptureReport, Outcome};

/// Tracks consecutive failed writes against a limit. A limit of 0 never trips.
#[derive(Debug, Clone, Copy)]
pub struct FailureStreak {
    limit: u32,
    current: u32,
}

impl FailureStreak {
    pub fn new(limit: u32) -> Self {
        Self { limit, current: 0 }
    }

    /// Records one outcome; returns `true` when this failure hits the limit.
    pub fn record(&mut self, success: bool) -> bool {
        if success {
            self.current = 0;
            return false;
        }
        self.current = self.current.saturating_add(1);
        self.limit > 0 && self.current == self.limit
    }

    pub fn current(&self) -> u32 {
        self.current
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusSummary {
    pub written: u64,
    pub failed: u64,
    pub stopped_on_failures: bool,
}

/// Drains capture reports on their own thread, prints one status line per
/// frame and stops capture once too many writes fail in a row.
///
/// Ends when every report sender has been dropped.
pub fn spawn(
    reports: Receiver<CaptureReport>,
    gate: Arc<CaptureGate>,
    max_consecutive_failures: u32,
) -> JoinHandle<StatusSummary> {
    thread::spawn(move || {
        let mut streak = FailureStreak::new(max_consecutive_failures);
        let mut summary = StatusSummary::default();

        for report in reports {
            eprintln!("{}", status_line(&report));
            let success = report.is_success();
            if success {
                summary.written += 1;
                summary.stopped_on_failures = false;
            } else {
                summary.failed += 1;
            }
            if streak.record(success) && gate.stop().is_some() {
                summary.stopped_on_failures = true;
                eprintln!(
                    "Capture stopped: {} consecutive frames could not be written",
                    streak.current()
                );
            }
        }
        summary
    })
}

pub fn status_line(report: &CaptureReport) -> String {
    match &report.outcome {
        Outcome::Success => format!(
            "[{}] points{}: {} points in {}ms",
            report.session_id,
            report.sequence_number,
            report.point_count,
            report.elapsed_ms()
        ),
        Outcome::Failure { kind, message } => format!(
            "[{}] points{}: FAILED ({kind}) {message}",
            report.session_id, report.sequence_number
        ),
    }
}
