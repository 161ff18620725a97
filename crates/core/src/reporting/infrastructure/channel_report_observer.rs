use crossbeam_channel::{Receiver, Sender};

use crate::reporting::domain::report_observer::ReportObserver;
use crate::shared::capture_report::CaptureReport;

/// Forwards reports to another thread (typically the UI's) over an
/// unbounded channel. Once the receiver is gone reports are dropped.
pub struct ChannelReportObserver {
    tx: Sender<CaptureReport>,
}

impl ChannelReportObserver {
    pub fn new(tx: Sender<CaptureReport>) -> Self {
        Self { tx }
    }

    /// Creates an observer together with the receiving end.
    pub fn channel() -> (Self, Receiver<CaptureReport>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self::new(tx), rx)
    }
}

impl ReportObserver for ChannelReportObserver {
    fn on_report(&self, report: &CaptureReport) {
        if self.tx.send(report.clone()).is_err() {
            log::debug!(
                "Status receiver gone; dropped report for frame {}",
                report.sequence_number
            );
        }
    }
}
