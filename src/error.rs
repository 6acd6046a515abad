//! Error types for the isovist engine.

use thiserror::Error;

/// Errors raised by the isovist engine.
///
/// Configuration errors are precondition violations and fail fast before
/// any geometry runs. `NoIsovistFound` and `AmbiguousIsovist` are expected
/// outcomes for pathological local geometry (e.g. an observer sealed
/// inside a slit narrower than the merge epsilon) and are returned as
/// values, never panicked past the call boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IsovistError {
    /// Fixed-point precision outside the supported range. Scaling by more
    /// than nine decimal digits would silently overflow 64-bit lattice
    /// coordinates on building-sized plans.
    #[error("fixed-point precision {0} is outside the supported range 0..=9")]
    PrecisionOutOfRange(u8),

    /// The morphological-closing epsilon would fuse distinct obstacles.
    #[error("merge epsilon {epsilon} must stay below half the minimum obstacle spacing {spacing}")]
    MergeEpsilonTooLarge { epsilon: f64, spacing: f64 },

    /// Invalid parameter provided.
    #[error("invalid isovist parameter: {0}")]
    InvalidParameter(String),

    /// The view disk minus the occlusion mass left no piece containing the
    /// vantage point.
    #[error("isovist not found: no region of the view disk encloses the vantage point")]
    NoIsovistFound,

    /// More than one void encloses the vantage point, so the visible
    /// region cannot be determined from the loop set alone.
    #[error("ambiguous isovist: {candidates} voids enclose the vantage point")]
    AmbiguousIsovist { candidates: usize },
}

/// Result type for isovist computations.
pub type IsovistResult<T> = Result<T, IsovistError>;
