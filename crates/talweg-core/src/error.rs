//! Error types for talweg-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details. Downstream crates wrap this type with
//! `#[from]` in their own error enums.

use thiserror::Error;

/// Talweg core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Operand image is not allocated
    #[error("image is not allocated")]
    NotAllocated,

    /// Incompatible image sizes
    #[error("size mismatch: {expected:?} vs {actual:?}")]
    SizeMismatch {
        expected: Vec<i64>,
        actual: Vec<i64>,
    },

    /// Coordinate dimension mismatch
    #[error("dimension mismatch: {0} vs {1}")]
    DimensionMismatch(usize, usize),

    /// Coordinate or offset outside the image domain
    #[error("index out of bounds: {index} not in 0..{len}")]
    IndexOutOfBounds { index: i64, len: i64 },

    /// Numeric overflow of a counter or priority key
    #[error("numeric overflow: {0}")]
    Overflow(&'static str),

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Operation not supported for this configuration. Reserved for
    /// downstream crates; nothing in the core constructs it.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Internal invariant violation or misuse
    #[error("internal error: {0}")]
    Internal(&'static str),
}

/// Result type alias for talweg operations
pub type Result<T> = std::result::Result<T, Error>;
