//! Error types for ringphase

use thiserror::Error;

/// Ringphase error type
#[derive(Debug, Error)]
pub enum RingphaseError {
    /// A ring needs at least two channels to carry a phase
    #[error("ring needs at least 2 regions, got {0}")]
    InsufficientRegions(usize),

    /// Paired arrays disagree in length
    #[error("shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A signal with zero samples reached a numeric boundary
    #[error("empty time series: {0}")]
    EmptyTimeSeries(&'static str),

    /// Timestamps must be monotonic non-decreasing before interpolation
    #[error("non-monotonic timestamps in {what} at index {index}")]
    NonMonotonicTimestamps { what: &'static str, index: usize },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Session archive error
    #[error("session archive error: {0}")]
    Archive(#[from] ndarray_npy::ReadNpzError),
}

pub type Result<T> = std::result::Result<T, RingphaseError>;
