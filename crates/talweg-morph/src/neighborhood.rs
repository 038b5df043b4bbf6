//! Runtime neighborhoods
//!
//! A [`Neighborhood`] binds a [`StructuringElement`] to one image and
//! produces, for any center point, the border-cropped list of absolute
//! neighbor offsets currently in range. Out-of-range neighbors are
//! silently excluded — never wrapped or clamped — which is what defines
//! the boundary semantics of every flooding algorithm downstream.
//!
//! Centering twice invalidates the previous neighbor list; the working
//! buffer always describes the *last* centered point only.

use crate::error::{MorphError, MorphResult};
use crate::se::{ReshapeCategory, StructuringElement};
use talweg_core::image::ReadGuard;
use talweg_core::{
    Coordinate, Image, Offset, from_offset_to_coordinate, is_point_inside, project_offset,
};

/// A transient, centered view of a structuring element over one image.
///
/// Holds a read guard on the image for its whole lifetime, so the pixel
/// buffer cannot be reset underneath it.
pub struct Neighborhood<'a, T> {
    image: &'a Image<T>,
    _guard: ReadGuard,
    se_coords: Vec<Coordinate>,
    se_deltas: Vec<Offset>,
    env_min: Coordinate,
    env_max: Coordinate,
    category: ReshapeCategory,
    shift: Option<(Coordinate, Offset)>,
    center: Option<Coordinate>,
    valid: Vec<Offset>,
}

impl<'a, T: Copy> Neighborhood<'a, T> {
    /// Bind `se` to `image`, precomputing the SE's offset-space deltas.
    ///
    /// # Errors
    ///
    /// [`talweg_core::Error::NotAllocated`] for an unallocated image,
    /// [`MorphError::SeDimension`] if SE and image dimensions disagree.
    pub fn new(image: &'a Image<T>, se: &StructuringElement) -> MorphResult<Self> {
        if !image.is_allocated() {
            return Err(talweg_core::Error::NotAllocated.into());
        }
        if se.dimension() != image.dimension() {
            return Err(MorphError::SeDimension {
                expected: image.dimension(),
                actual: se.dimension(),
            });
        }
        let size = image.size();
        let se_deltas = se
            .offsets()
            .iter()
            .map(|c| project_offset(size, c))
            .collect::<Result<Vec<_>, _>>()?;
        let (env_min, env_max) = se.bounds();
        Ok(Self {
            _guard: image.read_lock(),
            image,
            se_coords: se.offsets().to_vec(),
            se_deltas,
            env_min,
            env_max,
            category: se.category(),
            shift: None,
            center: None,
            valid: Vec::with_capacity(se.len()),
        })
    }

    /// Recompute the working buffer for a new center point.
    ///
    /// Every SE-relative point is tested against the image domain;
    /// survivors are compacted, in SE order, into a fresh prefix of the
    /// working buffer. A center where nothing survives yields an empty
    /// neighbor list, not an error.
    ///
    /// # Errors
    ///
    /// [`talweg_core::Error::DimensionMismatch`] if the point dimension
    /// disagrees with the image.
    pub fn center(&mut self, point: &Coordinate) -> MorphResult<()> {
        if point.dimension() != self.image.dimension() {
            return Err(talweg_core::Error::DimensionMismatch(
                self.image.dimension(),
                point.dimension(),
            )
            .into());
        }
        let size = self.image.size();
        let center_offset = project_offset(size, point)?;
        self.valid.clear();
        for (coord, &delta) in self.se_coords.iter().zip(&self.se_deltas) {
            let neighbor = point.add(coord)?;
            if is_point_inside(size, &neighbor) {
                self.valid.push(center_offset + delta);
            }
        }
        self.center = Some(point.clone());
        Ok(())
    }

    /// Center at a point given by its linear offset.
    ///
    /// # Errors
    ///
    /// [`talweg_core::Error::IndexOutOfBounds`] for an offset outside
    /// the buffer.
    pub fn center_at(&mut self, offset: Offset) -> MorphResult<()> {
        let point = from_offset_to_coordinate(self.image.size(), offset)?;
        self.center(&point)
    }

    /// Configure the vector applied by [`Neighborhood::shift_center`].
    ///
    /// # Errors
    ///
    /// [`talweg_core::Error::DimensionMismatch`] on dimension
    /// disagreement.
    pub fn set_shift(&mut self, vector: &Coordinate) -> MorphResult<()> {
        if vector.dimension() != self.image.dimension() {
            return Err(talweg_core::Error::DimensionMismatch(
                self.image.dimension(),
                vector.dimension(),
            )
            .into());
        }
        let delta = project_offset(self.image.size(), vector)?;
        self.shift = Some((vector.clone(), delta));
        Ok(())
    }

    /// Move the center by the configured shift vector.
    ///
    /// When the SE category permits and no border cropping can differ
    /// between the old and new centers, the working buffer is updated by
    /// adding a constant delta to every valid offset; otherwise this
    /// falls back to a full [`Neighborhood::center`] recomputation. The
    /// resulting neighbor set is identical either way.
    ///
    /// # Errors
    ///
    /// [`MorphError::ShiftNotConfigured`] before [`Neighborhood::set_shift`],
    /// [`MorphError::NotCentered`] before the first centering.
    pub fn shift_center(&mut self) -> MorphResult<()> {
        let (vector, delta) = self.shift.clone().ok_or(MorphError::ShiftNotConfigured)?;
        let old = self.center.clone().ok_or(MorphError::NotCentered)?;
        let new = old.add(&vector)?;

        if self.shift_preserves_geometry(&vector) && self.interior(&old) && self.interior(&new) {
            for offset in &mut self.valid {
                *offset += delta;
            }
            self.center = Some(new);
            return Ok(());
        }
        self.center(&new)
    }

    /// Whether the SE geometry is unchanged under this shift direction.
    fn shift_preserves_geometry(&self, vector: &Coordinate) -> bool {
        match self.category {
            ReshapeCategory::NoReshape => true,
            // Stable only along the fastest-varying axis.
            ReshapeCategory::ReshapeExceptPrimaryAxis => vector
                .components()
                .iter()
                .enumerate()
                .all(|(axis, &c)| axis == 0 || c == 0),
        }
    }

    /// Whether every SE point around `c` lies inside the image, i.e. no
    /// neighbor is cropped at this center.
    fn interior(&self, c: &Coordinate) -> bool {
        let size = self.image.size();
        (0..c.dimension()).all(|axis| {
            c[axis] + self.env_min[axis] >= 0 && c[axis] + self.env_max[axis] < size[axis]
        })
    }

    /// Absolute offsets of the in-range neighbors of the last center,
    /// in SE order.
    #[inline]
    pub fn offsets(&self) -> &[Offset] {
        &self.valid
    }

    /// Pixel values of the in-range neighbors, in SE order.
    pub fn values(&self) -> impl Iterator<Item = T> + '_ {
        self.valid
            .iter()
            .filter_map(move |&offset| self.image.pixel_at(offset).ok())
    }

    /// Number of neighbors surviving the crop.
    #[inline]
    pub fn len(&self) -> usize {
        self.valid.len()
    }

    /// True when no neighbor survived the crop.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.valid.is_empty()
    }
}
