//! Error types for trace requests.

use thiserror::Error;

/// Errors that reject a trace request before any recursion begins.
///
/// Per-branch irregularities (missed scene, degenerate normal, total
/// internal reflection, unconfigured material) are never errors; they
/// terminate their branch and are reported as
/// [`TerminalReason`](crate::TerminalReason) values on the path.
#[derive(Error, Debug)]
pub enum TraceError {
    /// Depth bound must allow at least one bounce.
    #[error("max depth must be at least 1, got {0}")]
    InvalidMaxDepth(usize),

    /// The scene has no surfaces to trace against.
    #[error("scene contains no surfaces")]
    EmptyScene,

    /// The ray direction cannot be normalized.
    #[error("ray direction has near-zero length and cannot be normalized")]
    DegenerateDirection,

    /// The ambient medium needs a positive, finite index of refraction.
    #[error("ambient index of refraction must be positive and finite, got {0}")]
    InvalidAmbientIndex(f64),
}

/// Result type for trace operations.
pub type Result<T> = std::result::Result<T, TraceError>;
