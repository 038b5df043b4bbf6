//! Structuring elements
//!
//! A structuring element (SE) is an ordered, immutable list of relative
//! coordinates around an implicit center. It is built once and reused by
//! every centering call of a [`crate::Neighborhood`].
//!
//! The reshape category tags whether the SE geometry is stable while the
//! center moves, which lets the neighborhood pick the cheap constant-
//! shift centering strategy instead of recomputing from scratch.

use crate::error::{MorphError, MorphResult};
use talweg_core::Coordinate;

/// How the SE geometry behaves as the center moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReshapeCategory {
    /// Geometry is identical at every center (translation invariant).
    #[default]
    NoReshape,
    /// Geometry is stable only while the center moves along axis 0, the
    /// buffer's fastest-varying axis.
    ReshapeExceptPrimaryAxis,
}

/// An ordered list of relative neighbor coordinates with a reshape tag.
///
/// The center point (all-zero coordinate) may be part of the list; the
/// flooding algorithms drop it with [`StructuringElement::remove_center`].
#[derive(Debug, Clone)]
pub struct StructuringElement {
    dimension: usize,
    offsets: Vec<Coordinate>,
    category: ReshapeCategory,
}

impl StructuringElement {
    /// Build an SE from relative coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::SeDimension`] if any coordinate disagrees
    /// with `dimension`.
    pub fn from_offsets(
        dimension: usize,
        offsets: Vec<Coordinate>,
        category: ReshapeCategory,
    ) -> MorphResult<Self> {
        for offset in &offsets {
            if offset.dimension() != dimension {
                return Err(MorphError::SeDimension {
                    expected: dimension,
                    actual: offset.dimension(),
                });
            }
        }
        Ok(Self {
            dimension,
            offsets,
            category,
        })
    }

    /// The 1-D segment: center plus both unit neighbors.
    pub fn segment_1d() -> Self {
        Self {
            dimension: 1,
            offsets: vec![
                Coordinate::new(&[-1]),
                Coordinate::new(&[0]),
                Coordinate::new(&[1]),
            ],
            category: ReshapeCategory::NoReshape,
        }
    }

    /// The 2-D cross: center plus its 4-connected neighbors.
    pub fn cross_2d() -> Self {
        Self {
            dimension: 2,
            offsets: vec![
                Coordinate::new(&[0, -1]),
                Coordinate::new(&[-1, 0]),
                Coordinate::new(&[0, 0]),
                Coordinate::new(&[1, 0]),
                Coordinate::new(&[0, 1]),
            ],
            category: ReshapeCategory::NoReshape,
        }
    }

    /// The 2-D square: center plus its 8-connected neighbors.
    pub fn square_2d() -> Self {
        let mut offsets = Vec::with_capacity(9);
        for y in -1..=1i64 {
            for x in -1..=1i64 {
                offsets.push(Coordinate::new(&[x, y]));
            }
        }
        Self {
            dimension: 2,
            offsets,
            category: ReshapeCategory::NoReshape,
        }
    }

    /// A copy without the center point. Idempotent.
    pub fn remove_center(&self) -> Self {
        let zero = Coordinate::zero(self.dimension);
        Self {
            dimension: self.dimension,
            offsets: self
                .offsets
                .iter()
                .filter(|c| **c != zero)
                .cloned()
                .collect(),
            category: self.category,
        }
    }

    /// Dimension of every relative coordinate.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of neighbor offsets.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Whether the SE holds no offsets at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// The relative coordinates, in their fixed order.
    #[inline]
    pub fn offsets(&self) -> &[Coordinate] {
        &self.offsets
    }

    /// The reshape category tag.
    #[inline]
    pub fn category(&self) -> ReshapeCategory {
        self.category
    }

    /// Per-axis envelope `(min, max)` of the relative coordinates.
    ///
    /// The all-zero pair for an empty SE.
    pub fn bounds(&self) -> (Coordinate, Coordinate) {
        let mut min = Coordinate::zero(self.dimension);
        let mut max = Coordinate::zero(self.dimension);
        for offset in &self.offsets {
            for axis in 0..self.dimension {
                min[axis] = min[axis].min(offset[axis]);
                max[axis] = max[axis].max(offset[axis]);
            }
        }
        (min, max)
    }
}
