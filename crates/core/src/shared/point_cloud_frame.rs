use super::point_stride::PointStride;

/// One depth sample: a flat buffer of `f32` coordinates in sensor order.
///
/// The buffer is never reordered or mutated once constructed; ownership
/// passes to the capture writer for a single write and is dropped afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct PointCloudFrame {
    points: Vec<f32>,
    timestamp_ms: Option<u64>,
}

impl PointCloudFrame {
    pub fn new(points: Vec<f32>) -> Self {
        Self {
            points,
            timestamp_ms: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }

    pub fn points(&self) -> &[f32] {
        &self.points
    }

    /// Number of raw `f32` values in the buffer.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn timestamp_ms(&self) -> Option<u64> {
        self.timestamp_ms
    }

    /// Whole points in the buffer for the given stride (trailing partial
    /// points are not counted).
    pub fn point_count(&self, stride: PointStride) -> usize {
        self.points.len() / stride.values_per_point()
    }
}

impl From<Vec<f32>> for PointCloudFrame {
    fn from(points: Vec<f32>) -> Self {
        Self::new(points)
    }
}
