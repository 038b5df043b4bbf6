//! Error types for talweg-morph

use thiserror::Error;

/// Errors that can occur while building or centering a neighborhood
#[derive(Debug, Error)]
pub enum MorphError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] talweg_core::Error),

    /// A structuring element offset has the wrong dimension
    #[error("structuring element dimension mismatch: expected {expected}, got {actual}")]
    SeDimension { expected: usize, actual: usize },

    /// `shift_center` called before `set_shift`
    #[error("shift vector not configured")]
    ShiftNotConfigured,

    /// `shift_center` called before the first `center`
    #[error("neighborhood has not been centered")]
    NotCentered,
}

/// Result type for morphology operations
pub type MorphResult<T> = Result<T, MorphError>;
