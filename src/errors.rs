//! Emulator errors
//!
//! The interpreter itself never fails; these errors only come from the
//! edges (loading program images and binary snapshots).

use bincode::error::{DecodeError, EncodeError};
use thiserror::Error;

/// CPU error type
#[derive(Debug, Error)]
pub enum CpuError {
    #[error("Program image is {size} bytes but program memory holds only {capacity} bytes")]
    RomTooLarge { size: usize, capacity: usize },

    #[error("Unable to encode CPU snapshot: {0}")]
    SnapshotEncode(#[from] EncodeError),

    #[error("Unable to decode CPU snapshot: {0}")]
    SnapshotDecode(#[from] DecodeError),

    #[error("CPU snapshot should be {expected} bytes long but got {got} bytes")]
    SnapshotTrailingBytes { expected: usize, got: usize },
}
