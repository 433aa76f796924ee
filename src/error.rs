//! Error types for z-sweep operations.

use thiserror::Error;

use crate::storage::SystemKind;
use crate::types::LineIndex;

/// Errors that can occur while running a z-sweep.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SweepError {
    /// Grid extents with a zero interior count.
    #[error("Invalid grid extents: nx2={nx2}, ny2={ny2}, nz2={nz2} (all must be positive)")]
    InvalidExtents { nx2: usize, ny2: usize, nz2: usize },

    /// Storage does not match the extents of the sweep.
    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: String,
        actual: String,
    },

    /// Physical or stencil constants outside their validity envelope.
    #[error("Invalid constants: {0}")]
    InvalidConstants(String),

    /// Zero or non-finite pivot encountered during elimination.
    #[error("Singular pivot in {system} system at {line} (i={i}, j={j}, k={k}): diagonal = {value}")]
    SingularPivot {
        line: LineIndex,
        i: usize,
        j: usize,
        k: usize,
        system: SystemKind,
        value: f64,
    },

    /// Staged transfer between storages of different size.
    #[error("Synchronization mismatch: source has {source_rows} rows, destination has {dest_rows}")]
    SyncMismatch { source_rows: usize, dest_rows: usize },

    /// Destination of a staged transfer does not hold what was sent.
    #[error("Synchronization check failed: boundary checksum {expected} sent, {actual} received")]
    SyncVerification { expected: f64, actual: f64 },
}

impl SweepError {
    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(
        what: &'static str,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::DimensionMismatch {
            what,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Whether this error was raised before the caller's storage was written.
    ///
    /// [`SweepError::SyncVerification`] is not one of them: it is detected
    /// after the transfer has overwritten the coefficient storage.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidExtents { .. }
                | Self::DimensionMismatch { .. }
                | Self::InvalidConstants(_)
                | Self::SyncMismatch { .. }
        )
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SweepError>;
