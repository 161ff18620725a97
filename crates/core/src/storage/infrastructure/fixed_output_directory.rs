use std::fs;
use std::io;
use std::path::PathBuf;

use crate::storage::domain::output_directory::OutputDirectory;

/// A caller-chosen directory, created on demand.
pub struct FixedOutputDirectory {
    path: PathBuf,
}

impl FixedOutputDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputDirectory for FixedOutputDirectory {
    fn resolve(&self) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.path)?;
        Ok(self.path.clone())
    }
}
