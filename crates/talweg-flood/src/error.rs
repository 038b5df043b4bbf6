//! Error types for talweg-flood

use thiserror::Error;

/// Errors that can occur during flooding operations
#[derive(Debug, Error)]
pub enum FloodError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] talweg_core::Error),

    /// Neighborhood / structuring element error
    #[error("morph error: {0}")]
    Morph(#[from] talweg_morph::MorphError),
}

/// Result type for flooding operations
pub type FloodResult<T> = Result<T, FloodError>;
