use std::fs;
use std::io;
use std::path::PathBuf;

use crate::shared::constants::{APP_DIR_NAME, POINTS_DIR_NAME};
use crate::storage::domain::output_directory::OutputDirectory;

/// The per-user application data directory, the desktop counterpart of an
/// app's external files directory.
///
/// - Linux: `$XDG_DATA_HOME/cloudcap/points/` or `~/.local/share/cloudcap/points/`
/// - macOS: `~/Library/Application Support/cloudcap/points/`
/// - Windows: `%APPDATA%/cloudcap/points/`
pub struct AppDataOutputDirectory;

impl AppDataOutputDirectory {
    pub fn new() -> Self {
        Self
    }

    pub fn path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join(APP_DIR_NAME).join(POINTS_DIR_NAME))
    }
}

impl Default for AppDataOutputDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputDirectory for AppDataOutputDirectory {
    fn resolve(&self) -> io::Result<PathBuf> {
        let path = Self::path().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "could not determine data directory")
        })?;
        fs::create_dir_all(&path)?;
        Ok(path)
    }
}
