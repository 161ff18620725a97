use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::capture::domain::frame_listener::FrameListener;
use crate::shared::constants::{DEFAULT_FRAME_INTERVAL_MS, DEFAULT_POINTS_PER_FRAME};
use crate::shared::point_cloud_frame::PointCloudFrame;
use crate::shared::point_stride::PointStride;

const GOLDEN_ANGLE: f32 = 2.399_963;
const MIN_DEPTH_M: f32 = 0.5;
const DEPTH_RANGE_M: f32 = 3.5;
const SPIN_PER_FRAME: f32 = 0.05;

/// Stand-in for a depth camera: emits a deterministic, slowly rotating
/// spiral of points in front of the device at a fixed cadence.
///
/// Deliveries happen one at a time on a dedicated thread, as a real sensor
/// service would do.
#[derive(Debug, Clone)]
pub struct SyntheticDepthSensor {
    points_per_frame: usize,
    stride: PointStride,
    interval: Duration,
    frame_limit: Option<u64>,
}

impl SyntheticDepthSensor {
    pub fn new(points_per_frame: usize, stride: PointStride) -> Self {
        Self {
            points_per_frame,
            stride,
            interval: Duration::from_millis(DEFAULT_FRAME_INTERVAL_MS),
            frame_limit: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Stop on its own after delivering this many frames.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Builds frame `index`. Same index, same points.
    pub fn generate(&self, index: u64) -> PointCloudFrame {
        let n = self.points_per_frame.max(1) as f32;
        let spin = index as f32 * SPIN_PER_FRAME;
        let mut points = Vec::with_capacity(self.points_per_frame * self.stride.values_per_point());

        for k in 0..self.points_per_frame {
            let t = k as f32 / n;
            let angle = k as f32 * GOLDEN_ANGLE + spin;
            let radius = t.sqrt();
            points.push(radius * angle.cos());
            points.push(radius * angle.sin());
            points.push(MIN_DEPTH_M + DEPTH_RANGE_M * t);
            if self.stride == PointStride::Xyzc {
                points.push(1.0);
            }
        }
        PointCloudFrame::new(points)
    }

    /// Starts delivering frames to `listener` on a new thread.
    pub fn spawn(self, listener: Arc<dyn FrameListener>) -> SensorHandle {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        let handle = thread::spawn(move || {
            let started = Instant::now();
            let mut delivered = 0u64;
            while !stop_flag.load(Ordering::Relaxed) {
                if self.frame_limit.is_some_and(|limit| delivered >= limit) {
                    break;
                }
                let timestamp_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                let frame = self.generate(delivered).with_timestamp(timestamp_ms);
                listener.on_frame_arrived(frame);
                delivered += 1;
                if !self.interval.is_zero() {
                    thread::sleep(self.interval);
                }
            }
            log::debug!("Synthetic sensor delivered {delivered} frames");
            delivered
        });

        SensorHandle { stop, handle }
    }
}

impl Default for SyntheticDepthSensor {
    fn default() -> Self {
        Self::new(DEFAULT_POINTS_PER_FRAME, PointStride::default())
    }
}

/// Running sensor feed. Dropping the handle does not stop the feed.
pub struct SensorHandle {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<u64>,
}

impl SensorHandle {
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stops the feed and waits for it, returning the number of frames
    /// delivered.
    pub fn join(self) -> thread::Result<u64> {
        self.stop();
        self.handle.join()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CollectingListener {
        frames: Mutex<Vec<PointCloudFrame>>,
    }

    impl FrameListener for CollectingListener {
        fn on_frame_arrived(&self, frame: PointCloudFrame) {
            self.frames.lock().unwrap().push(frame);
        }
    }

    #[test]
    fn test_generate_respects_stride() {
        let xyz = SyntheticDepthSensor::new(10, PointStride::Xyz).generate(0);
        assert_eq!(xyz.len(), 30);
        let xyzc = SyntheticDepthSensor::new(10, PointStride::Xyzc).generate(0);
        assert_eq!(xyzc.len(), 40);
        assert!(xyzc.points().chunks(4).all(|p| p[3] == 1.0));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let sensor = SyntheticDepthSensor::new(32, PointStride::Xyz);
        assert_eq!(sensor.generate(7), sensor.generate(7));
        assert_ne!(sensor.generate(7), sensor.generate(8));
    }

    #[test]
    fn test_points_lie_in_front_of_device() {
        let frame = SyntheticDepthSensor::new(100, PointStride::Xyz).generate(3);
        for p in frame.points().chunks(3) {
            assert!(p[2] >= MIN_DEPTH_M);
            assert!(p[2] <= MIN_DEPTH_M + DEPTH_RANGE_M);
            assert!(p[0].hypot(p[1]) <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn test_first_point_is_on_axis() {
        let frame = SyntheticDepthSensor::new(4, PointStride::Xyz).generate(0);
        assert_relative_eq!(frame.points()[0], 0.0);
        assert_relative_eq!(frame.points()[1], 0.0);
        assert_relative_eq!(frame.points()[2], MIN_DEPTH_M);
    }

    #[test]
    fn test_zero_points_gives_empty_frame() {
        assert!(SyntheticDepthSensor::new(0, PointStride::Xyz)
            .generate(0)
            .is_empty());
    }

    #[test]
    fn test_spawn_delivers_frame_limit_in_order() {
        let listener = Arc::new(CollectingListener::default());
        let handle = SyntheticDepthSensor::new(5, PointStride::Xyzc)
            .with_interval(Duration::ZERO)
            .with_frame_limit(4)
            .spawn(listener.clone());
        while !handle.is_finished() {
            thread::yield_now();
        }
        assert_eq!(handle.join().unwrap(), 4);

        let frames = listener.frames.lock().unwrap();
        assert_eq!(frames.len(), 4);
        let sensor = SyntheticDepthSensor::new(5, PointStride::Xyzc);
        for (i, f) in frames.iter().enumerate() {
            assert_eq!(f.points(), sensor.generate(i as u64).points());
            assert!(f.timestamp_ms().is_some());
        }
    }

    #[test]
    fn test_stop_ends_unbounded_feed() {
        let listener = Arc::new(CollectingListener::default());
        let handle = SyntheticDepthSensor::new(1, PointStride::Xyz)
            .with_interval(Duration::from_millis(1))
            .spawn(listener.clone());
        thread::sleep(Duration::from_millis(20));
        let delivered = handle.join().unwrap();
        assert_eq!(delivered as usize, listener.frames.lock().unwrap().len());
    }
}
