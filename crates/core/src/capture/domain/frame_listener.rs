use crate::shared::point_cloud_frame::PointCloudFrame;

/// Inbound port for the depth sensor: one call per hardware sample.
///
/// Implementations must return promptly and must never panic or fail
/// outward, since the caller is the sensor's own delivery thread.
pub trait FrameListener: Send + Sync {
    fn on_frame_arrived(&self, frame: PointCloudFrame);
}
