use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::capture::domain::capture_gate::{Admission, CaptureGate, GateError};
use crate::capture::domain::frame_listener::FrameListener;
use crate::reporting::domain::reporter::Reporter;
use crate::shared::capture_report::{CaptureReport, Outcome};
use crate::shared::point_cloud_frame::PointCloudFrame;
use crate::shared::point_stride::PointStride;
use crate::storage::domain::frame_writer::{frame_file_name, FrameWriter};
use crate::storage::domain::output_directory::OutputDirectory;
use crate::storage::domain::write_error::WriteError;

/// Persists gated point-cloud frames, one file per accepted frame.
///
/// Runs synchronously on the sensor's delivery thread:
/// `admit → validate → resolve directory → write → report`.
/// Every per-frame failure ends as a `Failure` report; nothing escapes
/// `on_frame_arrived`. A failed sequence number is never reused.
pub struct FrameCaptureWriter {
    gate: Arc<CaptureGate>,
    directory: Box<dyn OutputDirectory>,
    writer: Box<dyn FrameWriter>,
    stride: PointStride,
    reporter: Reporter,
}

impl FrameCaptureWriter {
    pub fn new(
        gate: Arc<CaptureGate>,
        directory: Box<dyn OutputDirectory>,
        writer: Box<dyn FrameWriter>,
        stride: PointStride,
        reporter: Reporter,
    ) -> Self {
        Self {
            gate,
            directory,
            writer,
            stride,
            reporter,
        }
    }

    pub fn start(&self, frame_budget: Option<u32>) -> Result<u64, GateError> {
        self.gate.start(frame_budget)
    }

    pub fn stop(&self) -> Option<u64> {
        self.gate.stop()
    }

    pub fn is_capturing(&self) -> bool {
        self.gate.is_capturing()
    }

    pub fn gate(&self) -> &Arc<CaptureGate> {
        &self.gate
    }

    pub fn stride(&self) -> PointStride {
        self.stride
    }

    fn persist(
        &self,
        admission: &Admission,
        frame: &PointCloudFrame,
    ) -> (Option<PathBuf>, Result<(), WriteError>) {
        if !self.stride.fits(frame.len()) {
            let err = WriteError::MalformedFrame {
                len: frame.len(),
                stride: self.stride.values_per_point(),
            };
            return (None, Err(err));
        }

        let dir = match self.directory.resolve() {
            Ok(dir) => dir,
            Err(e) => return (None, Err(WriteError::DirectoryUnavailable(e))),
        };

        let path = dir.join(frame_file_name(admission.sequence_number));
        let result = self.writer.write(&path, frame.points());
        (Some(path), result)
    }

    fn report(
        &self,
        admission: &Admission,
        point_count: usize,
        destination: Option<PathBuf>,
        elapsed: Duration,
        result: Result<(), WriteError>,
    ) {
        let outcome = match result {
            Ok(()) => Outcome::Success,
            Err(e) => Outcome::Failure {
                kind: e.kind(),
                message: e.to_string(),
            },
        };
        self.reporter.deliver(&CaptureReport {
            session_id: admission.session_id,
            sequence_number: admission.sequence_number,
            destination,
            point_count,
            elapsed,
            outcome,
        });
    }
}

impl FrameListener for FrameCaptureWriter {
    fn on_frame_arrived(&self, frame: PointCloudFrame) {
        let Some(admission) = self.gate.admit() else {
            return;
        };
        log::debug!(
            "Frame {} admitted ({} values, timestamp {:?})",
            admission.sequence_number,
            frame.len(),
            frame.timestamp_ms()
        );

        let started = Instant::now();
        let (destination, result) = self.persist(&admission, &frame);
        let elapsed = started.elapsed();

        self.report(
            &admission,
            frame.point_count(self.stride),
            destination,
            elapsed,
            result,
        );

        if admission.budget_exhausted {
            log::info!(
                "Frame budget reached after frame {}",
                admission.sequence_number
            );
        }
    }
}
