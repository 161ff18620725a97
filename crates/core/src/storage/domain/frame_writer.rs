use std::path::Path;

use super::write_error::WriteError;
use crate::shared::constants::FRAME_FILE_PREFIX;

/// Persists one frame's coordinate buffer to a file.
///
/// On success the file holds exactly the encoded buffer. On failure the
/// destination may be missing or incomplete and must not be relied upon.
pub trait FrameWriter: Send + Sync {
    fn write(&self, path: &Path, points: &[f32]) -> Result<(), WriteError>;
}

/// `points<sequence>` with no separator and no extension.
pub fn frame_file_name(sequence_number: u64) -> String {
    format!("{FRAME_FILE_PREFIX}{sequence_number}")
}
