use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use crate::reporting::domain::report_observer::ReportObserver;
use crate::shared::capture_report::{CaptureReport, FailureKind, Outcome};

#[derive(Debug)]
struct Stats {
    started: Instant,
    written: usize,
    total_ms: f64,
    max_ms: f64,
    points_written: usize,
    failures: HashMap<FailureKind, usize>,
}

/// Logs every report through the `log` crate and keeps enough statistics
/// for an end-of-capture summary.
pub struct LogReportObserver {
    stats: Mutex<Stats>,
}

impl LogReportObserver {
    pub fn new() -> Self {
        Self {
            stats: Mutex::new(Stats {
                started: Instant::now(),
                written: 0,
                total_ms: 0.0,
                max_ms: 0.0,
                points_written: 0,
                failures: HashMap::new(),
            }),
        }
    }

    pub fn frames_written(&self) -> usize {
        self.with_stats(|s| s.written)
    }

    pub fn failures(&self, kind: FailureKind) -> usize {
        self.with_stats(|s| s.failures.get(&kind).copied().unwrap_or(0))
    }

    /// Returns the formatted summary, or `None` if nothing was reported.
    pub fn summary_string(&self) -> Option<String> {
        self.with_stats(|s| {
            let failed: usize = s.failures.values().sum();
            let written = s.written;
            if written == 0 && failed == 0 {
                return None;
            }

            let elapsed_s = s.started.elapsed().as_secs_f64();
            let mut lines = vec![format!(
                "Capture summary ({written} frames written, {failed} failed, {elapsed_s:.1}s total):"
            )];

            if written > 0 {
                let (total_ms, max_ms) = (s.total_ms, s.max_ms);
                let avg_ms = total_ms / written as f64;
                lines.push(format!(
                    "  write: avg {avg_ms:6.1}ms  max {max_ms:6.1}ms  total {total_ms:7.0}ms"
                ));
                lines.push(format!("  points: {}", s.points_written));
            }

            let mut kinds: Vec<_> = s.failures.iter().collect();
            kinds.sort_by_key(|(kind, _)| kind.to_string());
            for (kind, count) in kinds {
                lines.push(format!("  {kind}: {count}"));
            }

            if written > 0 && elapsed_s > 0.0 {
                lines.push(format!(
                    "  Throughput: {:.1} frames/s",
                    written as f64 / elapsed_s
                ));
            }

            Some(lines.join("\n"))
        })
    }

    pub fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }

    fn with_stats<T>(&self, f: impl FnOnce(&mut Stats) -> T) -> T {
        let mut stats = self.stats.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut stats)
    }
}

impl Default for LogReportObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportObserver for LogReportObserver {
    fn on_report(&self, report: &CaptureReport) {
        let target = report
            .destination
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());

        match &report.outcome {
            Outcome::Success => {
                log::info!(
                    "Frame {} ({} points) written to {target} in {}ms",
                    report.sequence_number,
                    report.point_count,
                    report.elapsed_ms()
                );
                self.with_stats(|s| {
                    let ms = report.elapsed.as_secs_f64() * 1000.0;
                    s.written += 1;
                    s.total_ms += ms;
                    s.max_ms = s.max_ms.max(ms);
                    s.points_written += report.point_count;
                });
            }
            Outcome::Failure { kind, message } => {
                log::warn!(
                    "Frame {} not written to {target} ({kind}): {message}",
                    report.sequence_number
                );
                self.with_stats(|s| *s.failures.entry(*kind).or_default() += 1);
            }
        }
    }
}
