//! Coordinates and linear offsets
//!
//! A [`Coordinate`] is an ordered tuple of signed integers whose dimension
//! is fixed at construction. The same type describes both points and image
//! sizes (extents). An [`Offset`] is the linear index of a point in the
//! flattened pixel buffer of a given size.
//!
//! # Buffer layout
//!
//! Component 0 is the fastest-varying axis (stride 1); the stride of axis
//! `k` is the product of the extents of axes `0..k`. The projection is
//! deterministic and invertible given the size, which is what makes the
//! neighborhood's precomputed offset deltas and the shift optimization
//! valid.

use crate::error::{Error, Result};
use std::ops::{Index, IndexMut};

/// Linear index into a flattened pixel buffer.
///
/// Signed, so that the offset-space projection of a *relative* coordinate
/// (an SE delta such as `(-1, 0)`) is representable.
pub type Offset = i64;

/// An N-dimensional integer coordinate.
///
/// Value type: created per computation, cloned freely, no shared
/// ownership. All componentwise arithmetic between two coordinates
/// requires equal dimension; [`Coordinate::add_extended`] is the one
/// zero-extending exception.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    components: Vec<i64>,
}

impl Coordinate {
    /// Create a coordinate from its components.
    pub fn new(components: &[i64]) -> Self {
        Self {
            components: components.to_vec(),
        }
    }

    /// The origin of the given dimension.
    pub fn zero(dimension: usize) -> Self {
        Self {
            components: vec![0; dimension],
        }
    }

    /// Number of components.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.components.len()
    }

    /// Component along `axis`, or `None` out of range.
    #[inline]
    pub fn get(&self, axis: usize) -> Option<i64> {
        self.components.get(axis).copied()
    }

    /// Set the component along `axis`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `axis` is out of range.
    pub fn set(&mut self, axis: usize, value: i64) -> Result<()> {
        let len = self.components.len();
        match self.components.get_mut(axis) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::IndexOutOfBounds {
                index: axis as i64,
                len: len as i64,
            }),
        }
    }

    /// All components as a slice.
    #[inline]
    pub fn components(&self) -> &[i64] {
        &self.components
    }

    fn check_dimension(&self, other: &Coordinate) -> Result<()> {
        if self.dimension() != other.dimension() {
            return Err(Error::DimensionMismatch(
                self.dimension(),
                other.dimension(),
            ));
        }
        Ok(())
    }

    /// Componentwise sum.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if dimensions differ.
    pub fn add(&self, other: &Coordinate) -> Result<Coordinate> {
        self.check_dimension(other)?;
        Ok(Coordinate {
            components: self
                .components
                .iter()
                .zip(&other.components)
                .map(|(a, b)| a + b)
                .collect(),
        })
    }

    /// Componentwise difference.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if dimensions differ.
    pub fn sub(&self, other: &Coordinate) -> Result<Coordinate> {
        self.check_dimension(other)?;
        Ok(Coordinate {
            components: self
                .components
                .iter()
                .zip(&other.components)
                .map(|(a, b)| a - b)
                .collect(),
        })
    }

    /// Componentwise minimum.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if dimensions differ.
    pub fn min(&self, other: &Coordinate) -> Result<Coordinate> {
        self.check_dimension(other)?;
        Ok(Coordinate {
            components: self
                .components
                .iter()
                .zip(&other.components)
                .map(|(a, b)| *a.min(b))
                .collect(),
        })
    }

    /// Componentwise sum, zero-extending the shorter operand.
    pub fn add_extended(&self, other: &Coordinate) -> Coordinate {
        let dim = self.dimension().max(other.dimension());
        let mut components = Vec::with_capacity(dim);
        for axis in 0..dim {
            components.push(self.get(axis).unwrap_or(0) + other.get(axis).unwrap_or(0));
        }
        Coordinate { components }
    }
}

impl Index<usize> for Coordinate {
    type Output = i64;

    #[inline]
    fn index(&self, axis: usize) -> &i64 {
        &self.components[axis]
    }
}

impl IndexMut<usize> for Coordinate {
    #[inline]
    fn index_mut(&mut self, axis: usize) -> &mut i64 {
        &mut self.components[axis]
    }
}

impl From<Vec<i64>> for Coordinate {
    fn from(components: Vec<i64>) -> Self {
        Self { components }
    }
}

/// Total number of points in an image of the given size.
///
/// Zero if any extent is non-positive or the size has no axes.
pub fn total_number_of_points(size: &Coordinate) -> i64 {
    if size.dimension() == 0 {
        return 0;
    }
    let mut total = 1i64;
    for &extent in size.components() {
        if extent <= 0 {
            return 0;
        }
        total *= extent;
    }
    total
}

/// Test whether `point` lies inside the domain `[0, size)` on every axis.
///
/// Points of a different dimension are never inside.
pub fn is_point_inside(size: &Coordinate, point: &Coordinate) -> bool {
    if size.dimension() != point.dimension() {
        return false;
    }
    point
        .components()
        .iter()
        .zip(size.components())
        .all(|(&p, &s)| p >= 0 && p < s)
}

/// Project a coordinate to its raw linear offset, without bounds checks.
///
/// Intended for *relative* coordinates (SE deltas), whose projection may
/// be negative. For absolute points use [`from_coordinate_to_offset`],
/// which also validates the domain.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if dimensions differ.
pub fn project_offset(size: &Coordinate, delta: &Coordinate) -> Result<Offset> {
    if size.dimension() != delta.dimension() {
        return Err(Error::DimensionMismatch(
            size.dimension(),
            delta.dimension(),
        ));
    }
    let mut offset = 0i64;
    let mut stride = 1i64;
    for (&c, &extent) in delta.components().iter().zip(size.components()) {
        offset += c * stride;
        stride *= extent;
    }
    Ok(offset)
}

/// Convert an absolute coordinate to its linear offset.
///
/// # Errors
///
/// Returns [`Error::IndexOutOfBounds`] if the point lies outside the
/// domain, [`Error::DimensionMismatch`] on dimension disagreement.
pub fn from_coordinate_to_offset(size: &Coordinate, point: &Coordinate) -> Result<Offset> {
    if size.dimension() != point.dimension() {
        return Err(Error::DimensionMismatch(
            size.dimension(),
            point.dimension(),
        ));
    }
    if !is_point_inside(size, point) {
        return Err(Error::IndexOutOfBounds {
            index: project_offset(size, point)?,
            len: total_number_of_points(size),
        });
    }
    project_offset(size, point)
}

/// Convert a linear offset back to its coordinate.
///
/// Inverse of [`from_coordinate_to_offset`] for the same size.
///
/// # Errors
///
/// Returns [`Error::IndexOutOfBounds`] if the offset is outside the
/// buffer.
pub fn from_offset_to_coordinate(size: &Coordinate, offset: Offset) -> Result<Coordinate> {
    let total = total_number_of_points(size);
    if offset < 0 || offset >= total {
        return Err(Error::IndexOutOfBounds {
            index: offset,
            len: total,
        });
    }
    let mut components = Vec::with_capacity(size.dimension());
    let mut rest = offset;
    for &extent in size.components() {
        components.push(rest % extent);
        rest /= extent;
    }
    Ok(Coordinate { components })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = Coordinate::new(&[1, 2, 3]);
        let b = Coordinate::new(&[4, -1, 0]);
        assert_eq!(a.add(&b).unwrap(), Coordinate::new(&[5, 1, 3]));
        assert_eq!(a.sub(&b).unwrap(), Coordinate::new(&[-3, 3, 3]));
        assert_eq!(a.min(&b).unwrap(), Coordinate::new(&[1, -1, 0]));
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = Coordinate::new(&[1, 2]);
        let b = Coordinate::new(&[1, 2, 3]);
        assert!(matches!(a.add(&b), Err(Error::DimensionMismatch(2, 3))));
    }

    #[test]
    fn test_add_extended() {
        let a = Coordinate::new(&[1, 2]);
        let b = Coordinate::new(&[10, 20, 30]);
        assert_eq!(a.add_extended(&b), Coordinate::new(&[11, 22, 30]));
    }

    #[test]
    fn test_total_number_of_points() {
        assert_eq!(total_number_of_points(&Coordinate::new(&[4, 3])), 12);
        assert_eq!(total_number_of_points(&Coordinate::new(&[4, 0])), 0);
        assert_eq!(total_number_of_points(&Coordinate::new(&[])), 0);
    }

    #[test]
    fn test_is_point_inside() {
        let size = Coordinate::new(&[4, 3]);
        assert!(is_point_inside(&size, &Coordinate::new(&[0, 0])));
        assert!(is_point_inside(&size, &Coordinate::new(&[3, 2])));
        assert!(!is_point_inside(&size, &Coordinate::new(&[4, 0])));
        assert!(!is_point_inside(&size, &Coordinate::new(&[-1, 0])));
        assert!(!is_point_inside(&size, &Coordinate::new(&[0, 0, 0])));
    }

    #[test]
    fn test_offset_roundtrip() {
        let size = Coordinate::new(&[5, 4, 3]);
        for off in 0..total_number_of_points(&size) {
            let coord = from_offset_to_coordinate(&size, off).unwrap();
            assert!(is_point_inside(&size, &coord));
            assert_eq!(from_coordinate_to_offset(&size, &coord).unwrap(), off);
        }
    }

    #[test]
    fn test_axis_zero_is_fastest() {
        let size = Coordinate::new(&[5, 4]);
        let a = from_coordinate_to_offset(&size, &Coordinate::new(&[1, 0])).unwrap();
        let b = from_coordinate_to_offset(&size, &Coordinate::new(&[2, 0])).unwrap();
        assert_eq!(b - a, 1);
        let c = from_coordinate_to_offset(&size, &Coordinate::new(&[1, 1])).unwrap();
        assert_eq!(c - a, 5);
    }

    #[test]
    fn test_project_offset_negative_delta() {
        let size = Coordinate::new(&[5, 4]);
        assert_eq!(
            project_offset(&size, &Coordinate::new(&[-1, -1])).unwrap(),
            -6
        );
    }

    #[test]
    fn test_out_of_domain_offset() {
        let size = Coordinate::new(&[2, 2]);
        assert!(from_offset_to_coordinate(&size, 4).is_err());
        assert!(from_offset_to_coordinate(&size, -1).is_err());
        assert!(from_coordinate_to_offset(&size, &Coordinate::new(&[2, 0])).is_err());
    }
}
