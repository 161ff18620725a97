use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Category of a failed frame write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The output directory could not be resolved or the file not created.
    StorageUnavailable,
    /// Writing, flushing or syncing the encoded bytes failed.
    EncodeIoFailure,
    /// The buffer length is not a multiple of the point stride.
    MalformedFrame,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::StorageUnavailable => write!(f, "storage unavailable"),
            FailureKind::EncodeIoFailure => write!(f, "encode I/O failure"),
            FailureKind::MalformedFrame => write!(f, "malformed frame"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure { kind: FailureKind, message: String },
}

/// Result of one accepted frame's write, handed to the status observer.
///
/// `destination` is `None` only when the frame was rejected before a
/// file path could be formed (malformed buffer, unresolvable directory).
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureReport {
    pub session_id: u64,
    pub sequence_number: u64,
    pub destination: Option<PathBuf>,
    pub point_count: usize,
    pub elapsed: Duration,
    pub outcome: Outcome,
}

impl CaptureReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success)
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self.outcome {
            Outcome::Success => None,
            Outcome::Failure { kind, .. } => Some(kind),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}
