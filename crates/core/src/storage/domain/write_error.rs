use std::path::PathBuf;

use thiserror::Error;

use crate::shared::capture_report::FailureKind;

/// Why a single accepted frame could not be persisted.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("output directory unavailable: {0}")]
    DirectoryUnavailable(#[source] std::io::Error),
    #[error("cannot create {path}: {source}")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed writing {path}: {source}")]
    EncodeIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("frame of {len} values is not a multiple of stride {stride}")]
    MalformedFrame { len: usize, stride: usize },
}

impl WriteError {
    pub fn kind(&self) -> FailureKind {
        match self {
            WriteError::DirectoryUnavailable(_) | WriteError::StorageUnavailable { .. } => {
                FailureKind::StorageUnavailable
            }
            WriteError::EncodeIo { .. } => FailureKind::EncodeIoFailure,
            WriteError::MalformedFrame { .. } => FailureKind::MalformedFrame,
        }
    }
}
