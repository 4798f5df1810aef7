use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason why a frame was abandoned mid-pipeline. Reporting a drop reason
/// never aborts the process: the frame skips the rest of its iteration and
/// the next capture starts clean.
#[derive(Error, Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Copy)]
pub enum DropReason {
    #[error("Frame acquisition failed")]
    AcquisitionFailed,

    #[error("Empty frame")]
    EmptyFrame,

    #[error("Crop target larger than source frame")]
    DimensionMismatch,

    #[error("Frame compression failed")]
    CompressionFailed,

    #[error("No available buffers")]
    NoAvailableBuffers,

    #[error("Connection error")]
    ConnectionError,

    #[error("Stale frame")]
    StaleFrame,
}
