use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::encoding::domain::point_encoding::PointEncoding;
use crate::storage::domain::frame_writer::FrameWriter;
use crate::storage::domain::write_error::WriteError;

/// Writes a frame buffer to a file in the configured [`PointEncoding`].
///
/// The destination is created (or truncated, if a previous session left a
/// file with the same name), stream-encoded through a buffer, flushed and,
/// unless disabled, synced to disk before `write` returns.
pub struct FrameFileWriter {
    encoding: PointEncoding,
    sync: bool,
}

impl FrameFileWriter {
    pub fn new(encoding: PointEncoding) -> Self {
        Self {
            encoding,
            sync: true,
        }
    }

    /// Skip `fsync` after each frame. Faster, but a crash can lose frames
    /// that were already reported as written.
    pub fn without_sync(mut self) -> Self {
        self.sync = false;
        self
    }

    pub fn encoding(&self) -> PointEncoding {
        self.encoding
    }

    fn encode_into(&self, file: File, points: &[f32]) -> std::io::Result<()> {
        let mut out = BufWriter::new(file);
        self.encoding.encode(points, &mut out)?;
        out.flush()?;
        if self.sync {
            out.get_ref().sync_all()?;
        }
        Ok(())
    }
}

impl Default for FrameFileWriter {
    fn default() -> Self {
        Self::new(PointEncoding::default())
    }
}

impl FrameWriter for FrameFileWriter {
    fn write(&self, path: &Path, points: &[f32]) -> Result<(), WriteError> {
        let file = File::create(path).map_err(|source| WriteError::StorageUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        if let Err(source) = self.encode_into(file, points) {
            // Best effort: do not leave a truncated frame behind.
            if let Err(e) = fs::remove_file(path) {
                log::warn!("Could not remove partial {}: {e}", path.display());
            }
            return Err(WriteError::EncodeIo {
                path: path.to_path_buf(),
                source,
            });
        }
        Ok(())
    }
}
