//! Offset-relationship classification between two images
//!
//! When an algorithm walks two images in lockstep, the cheapest loop
//! depends on how their buffer layouts relate. The relationship is an
//! explicit enum, classified once per call and handed to a single
//! generic loop, instead of being baked into the iterator types.

use crate::coord::{Coordinate, Offset};

/// How the linear offsets of two images relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetRelation {
    /// Different geometries; every access goes through coordinate
    /// conversion.
    Independent,
    /// Same geometry: a linear offset addresses the same point in both
    /// buffers.
    SameOffset,
    /// Same geometry up to a constant offset shift (windowed views).
    SameOffsetShifted(Offset),
    /// The very same buffer. Unreachable through the safe API, where an
    /// input can never alias the `&mut` output; kept for completeness of
    /// the classification.
    Identical,
}

impl OffsetRelation {
    /// Translate an offset in the first image to the second.
    ///
    /// Only meaningful for the shared-layout variants; `Independent`
    /// callers must convert through coordinates instead.
    #[inline]
    pub fn translate(self, offset: Offset) -> Option<Offset> {
        match self {
            OffsetRelation::SameOffset | OffsetRelation::Identical => Some(offset),
            OffsetRelation::SameOffsetShifted(shift) => Some(offset + shift),
            OffsetRelation::Independent => None,
        }
    }
}

/// Classify the offset relationship of two image geometries.
///
/// Distinct allocations are assumed (the safe API cannot alias them), so
/// this never returns [`OffsetRelation::Identical`]; shifted windowed
/// views carry their shift explicitly and are classified by the view
/// layer, not here.
pub fn classify_offsets(a: &Coordinate, b: &Coordinate) -> OffsetRelation {
    if a == b {
        OffsetRelation::SameOffset
    } else {
        OffsetRelation::Independent
    }
}
