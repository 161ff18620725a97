use std::panic::{self, AssertUnwindSafe};

use super::report_observer::ReportObserver;
use crate::shared::capture_report::CaptureReport;

/// Best-effort delivery of capture reports.
///
/// Never fails: without an observer the report is dropped, and a panicking
/// observer loses only that report.
pub struct Reporter {
    observer: Option<Box<dyn ReportObserver>>,
}

impl Reporter {
    pub fn new(observer: Box<dyn ReportObserver>) -> Self {
        Self {
            observer: Some(observer),
        }
    }

    pub fn silent() -> Self {
        Self { observer: None }
    }

    pub fn deliver(&self, report: &CaptureReport) {
        let Some(observer) = &self.observer else {
            return;
        };
        let delivered = panic::catch_unwind(AssertUnwindSafe(|| observer.on_report(report)));
        if delivered.is_err() {
            log::warn!(
                "Report observer panicked; dropped report for frame {}",
                report.sequence_number
            );
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::silent()
    }
}
