use crate::reporting::domain::report_observer::ReportObserver;
use crate::shared::capture_report::CaptureReport;

/// Delivers each report to several observers, in registration order.
pub struct FanOutReportObserver {
    observers: Vec<Box<dyn ReportObserver>>,
}

impl FanOutReportObserver {
    pub fn new(observers: Vec<Box<dyn ReportObserver>>) -> Self {
        Self { observers }
    }
}

impl ReportObserver for FanOutReportObserver {
    fn on_report(&self, report: &CaptureReport) {
        for observer in &self.observers {
            observer.on_report(report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::capture_report::Outcome;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct Tagged {
        tag: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl ReportObserver for Tagged {
        fn on_report(&self, report: &CaptureReport) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.tag, report.sequence_number));
        }
    }

    #[test]
    fn test_every_observer_sees_every_report_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let fan_out = FanOutReportObserver::new(vec![
            Box::new(Tagged {
                tag: "a",
                log: log.clone(),
            }),
            Box::new(Tagged {
                tag: "b",
                log: log.clone(),
            }),
        ]);
        let report = CaptureReport {
            session_id: 1,
            sequence_number: 4,
            destination: None,
            point_count: 0,
            elapsed: Duration::ZERO,
            outcome: Outcome::Success,
        };
        fan_out.on_report(&report);
        assert_eq!(*log.lock().unwrap(), vec!["a:4", "b:4"]);
    }

    #[test]
    fn test_empty_fan_out_is_noop() {
        let report = CaptureReport {
            session_id: 1,
            sequence_number: 1,
            destination: None,
            point_count: 0,
            elapsed: Duration::ZERO,
            outcome: Outcome::Success,
        };
        FanOutReportObserver::new(Vec::new()).on_report(&report);
    }
}
