use std::fmt;
use std::str::FromStr;

/// Number of `f32` values that make up one point in a frame buffer.
///
/// Fixed for the lifetime of a writer. A buffer is malformed when it is
/// empty or its length is not a multiple of the stride.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointStride {
    /// x, y, z
    Xyz,
    /// x, y, z, confidence (the depth sensor's native layout)
    #[default]
    Xyzc,
}

impl PointStride {
    pub fn values_per_point(self) -> usize {
        match self {
            PointStride::Xyz => 3,
            PointStride::Xyzc => 4,
        }
    }

    pub fn from_values_per_point(values: usize) -> Option<Self> {
        match values {
            3 => Some(PointStride::Xyz),
            4 => Some(PointStride::Xyzc),
            _ => None,
        }
    }

    pub fn fits(self, len: usize) -> bool {
        len > 0 && len % self.values_per_point() == 0
    }
}

impl fmt::Display for PointStride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.values_per_point())
    }
}

impl FromStr for PointStride {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<usize>()
            .ok()
            .and_then(Self::from_values_per_point)
            .ok_or_else(|| format!("stride must be 3 or 4, got '{s}'"))
    }
}
