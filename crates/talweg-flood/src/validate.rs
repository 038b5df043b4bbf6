//! Structural precondition checks shared by the flooding algorithms
//!
//! Every algorithm validates allocation and geometry up front and fails
//! fast before mutating any output.

use crate::error::FloodResult;
use talweg_core::{Error, Image};
use talweg_morph::{MorphError, StructuringElement};

/// Fail with [`Error::NotAllocated`] unless `image` is allocated.
pub(crate) fn check_allocated<T>(image: &Image<T>) -> FloodResult<()> {
    if !image.is_allocated() {
        return Err(Error::NotAllocated.into());
    }
    Ok(())
}

/// Fail with [`MorphError::SeDimension`] unless the structuring element
/// matches the image dimension.
pub(crate) fn check_se_dimension<T>(
    image: &Image<T>,
    se: &StructuringElement,
) -> FloodResult<()> {
    if se.dimension() != image.dimension() {
        return Err(MorphError::SeDimension {
            expected: image.dimension(),
            actual: se.dimension(),
        }
        .into());
    }
    Ok(())
}

/// Fail with [`Error::SizeMismatch`] unless both images are allocated
/// with the same geometry.
pub(crate) fn check_same_size<A, B>(a: &Image<A>, b: &Image<B>) -> FloodResult<()> {
    check_allocated(a)?;
    check_allocated(b)?;
    if a.size() != b.size() {
        return Err(Error::SizeMismatch {
            expected: a.size().components().to_vec(),
            actual: b.size().components().to_vec(),
        }
        .into());
    }
    Ok(())
}
