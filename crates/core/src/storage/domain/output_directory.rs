use std::io;
use std::path::PathBuf;

/// Locates the directory that receives frame files.
///
/// Queried once per write so a directory that disappears mid-session is
/// noticed on the next frame rather than cached as valid.
pub trait OutputDirectory: Send + Sync {
    fn resolve(&self) -> io::Result<PathBuf>;
}
