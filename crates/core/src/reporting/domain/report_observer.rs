use crate::shared::capture_report::CaptureReport;

/// Status surface that receives one report per accepted frame.
///
/// Called on the sensor's delivery thread; implementations hand the report
/// off (channel, log, buffer) and return without blocking.
pub trait ReportObserver: Send + Sync {
    fn on_report(&self, report: &CaptureReport);
}

impl<T: ReportObserver + ?Sized> ReportObserver for std::sync::Arc<T> {
    fn on_report(&self, report: &CaptureReport) {
        (**self).on_report(report);
    }
}
