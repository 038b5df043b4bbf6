//! The N-dimensional image container
//!
//! [`Image`] is the pixel storage the morphology engine runs on: a size
//! (extent per axis) plus an optionally-allocated flat buffer in the
//! layout of [`crate::coord`] (axis 0 fastest). Pixel access is
//! bounds-checked both by coordinate and by linear offset.
//!
//! # Access guards
//!
//! An image hands out advisory read/write guards
//! ([`Image::read_lock`] / [`Image::write_lock`]). These are not a
//! concurrency primitive — the engine is single-threaded — they are a
//! misuse guard: [`Image::reset`] and [`Image::allocate`] fail while any
//! guard is alive, so a buffer cannot be freed under a live neighborhood
//! or iterator. Guards release on drop or via explicit `unlock()`.

use crate::coord::{
    Coordinate, Offset, from_coordinate_to_offset, total_number_of_points,
};
use crate::error::{Error, Result};
use crate::layout::{OffsetRelation, classify_offsets};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct LockCounters {
    readers: Cell<usize>,
    writers: Cell<usize>,
}

/// Scoped advisory read lock on an [`Image`].
///
/// Increments the image's reader count on acquisition, decrements on
/// drop or [`ReadGuard::unlock`].
#[derive(Debug)]
pub struct ReadGuard {
    locks: Rc<LockCounters>,
}

impl ReadGuard {
    /// Release the lock explicitly.
    pub fn unlock(self) {}
}

impl Drop for ReadGuard {
    fn drop(&mut self) {
        self.locks.readers.set(self.locks.readers.get() - 1);
    }
}

/// Scoped advisory write lock on an [`Image`].
#[derive(Debug)]
pub struct WriteGuard {
    locks: Rc<LockCounters>,
}

impl WriteGuard {
    /// Release the lock explicitly.
    pub fn unlock(self) {}
}

impl Drop for WriteGuard {
    fn drop(&mut self) {
        self.locks.writers.set(self.locks.writers.get() - 1);
    }
}

/// An allocated or unallocated N-dimensional pixel container.
#[derive(Debug)]
pub struct Image<T> {
    size: Coordinate,
    data: Option<Vec<T>>,
    locks: Rc<LockCounters>,
}

impl<T> Image<T> {
    /// Create an unallocated image of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            size: Coordinate::zero(dimension),
            data: None,
            locks: Rc::default(),
        }
    }

    /// Image size (extent per axis).
    ///
    /// All-zero until the image has been allocated.
    #[inline]
    pub fn size(&self) -> &Coordinate {
        &self.size
    }

    /// Number of axes.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.size.dimension()
    }

    /// Whether a pixel buffer is currently allocated.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.data.is_some()
    }

    /// Total number of pixels; zero when unallocated.
    #[inline]
    pub fn total_points(&self) -> i64 {
        if self.is_allocated() {
            total_number_of_points(&self.size)
        } else {
            0
        }
    }

    fn locked(&self) -> bool {
        self.locks.readers.get() > 0 || self.locks.writers.get() > 0
    }

    /// Acquire an advisory read lock.
    pub fn read_lock(&self) -> ReadGuard {
        self.locks.readers.set(self.locks.readers.get() + 1);
        ReadGuard {
            locks: Rc::clone(&self.locks),
        }
    }

    /// Acquire an advisory write lock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] while any other guard is alive.
    pub fn write_lock(&self) -> Result<WriteGuard> {
        if self.locked() {
            return Err(Error::Internal("write lock on a locked image"));
        }
        self.locks.writers.set(self.locks.writers.get() + 1);
        Ok(WriteGuard {
            locks: Rc::clone(&self.locks),
        })
    }

    /// Drop the pixel buffer, returning the image to the unallocated
    /// state. The size is kept as a geometry placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] while any guard is alive.
    pub fn reset(&mut self) -> Result<()> {
        if self.locked() {
            return Err(Error::Internal("reset of a locked image"));
        }
        self.data = None;
        Ok(())
    }

    /// Borrow the raw pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAllocated`] when unallocated.
    pub fn as_slice(&self) -> Result<&[T]> {
        self.data.as_deref().ok_or(Error::NotAllocated)
    }

    /// Mutably borrow the raw pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAllocated`] when unallocated.
    pub fn as_mut_slice(&mut self) -> Result<&mut [T]> {
        self.data.as_deref_mut().ok_or(Error::NotAllocated)
    }
}

impl<T: Copy> Image<T> {
    /// Get the pixel at an absolute coordinate.
    pub fn pixel(&self, point: &Coordinate) -> Result<T> {
        let offset = from_coordinate_to_offset(&self.size, point)?;
        self.pixel_at(offset)
    }

    /// Get the pixel at a linear offset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAllocated`] or [`Error::IndexOutOfBounds`].
    pub fn pixel_at(&self, offset: Offset) -> Result<T> {
        let data = self.data.as_deref().ok_or(Error::NotAllocated)?;
        if offset < 0 || offset as usize >= data.len() {
            return Err(Error::IndexOutOfBounds {
                index: offset,
                len: data.len() as i64,
            });
        }
        Ok(data[offset as usize])
    }

    /// Set the pixel at an absolute coordinate.
    pub fn set_pixel(&mut self, point: &Coordinate, value: T) -> Result<()> {
        let offset = from_coordinate_to_offset(&self.size, point)?;
        self.set_pixel_at(offset, value)
    }

    /// Set the pixel at a linear offset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAllocated`] or [`Error::IndexOutOfBounds`].
    pub fn set_pixel_at(&mut self, offset: Offset, value: T) -> Result<()> {
        let data = self.data.as_deref_mut().ok_or(Error::NotAllocated)?;
        if offset < 0 || offset as usize >= data.len() {
            return Err(Error::IndexOutOfBounds {
                index: offset,
                len: data.len() as i64,
            });
        }
        data[offset as usize] = value;
        Ok(())
    }

    /// Overwrite every pixel with `value`.
    pub fn fill(&mut self, value: T) -> Result<()> {
        let data = self.data.as_deref_mut().ok_or(Error::NotAllocated)?;
        data.fill(value);
        Ok(())
    }

    /// Copy every pixel from `src`, choosing the iteration strategy from
    /// the offset relation of the two geometries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeMismatch`] for independent geometries,
    /// [`Error::NotAllocated`] when either buffer is missing.
    pub fn copy_from(&mut self, src: &Image<T>) -> Result<()> {
        match classify_offsets(src.size(), self.size()) {
            OffsetRelation::SameOffset | OffsetRelation::Identical => {
                self.as_mut_slice()?.copy_from_slice(src.as_slice()?);
                Ok(())
            }
            OffsetRelation::SameOffsetShifted(shift) => {
                for p in 0..src.total_points() {
                    let value = src.pixel_at(p)?;
                    self.set_pixel_at(p + shift, value)?;
                }
                Ok(())
            }
            OffsetRelation::Independent => Err(Error::SizeMismatch {
                expected: src.size().components().to_vec(),
                actual: self.size().components().to_vec(),
            }),
        }
    }
}

impl<T: Default + Clone> Image<T> {
    /// Allocate an image of the given size in one step.
    pub fn with_size(size: &Coordinate) -> Result<Self> {
        let mut image = Self::new(size.dimension());
        image.allocate(size)?;
        Ok(image)
    }

    /// Allocate (or reallocate) the pixel buffer for `size`, with every
    /// pixel default-initialized.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] for an empty geometry,
    /// [`Error::Internal`] while any guard is alive.
    pub fn allocate(&mut self, size: &Coordinate) -> Result<()> {
        if self.locked() {
            return Err(Error::Internal("allocate on a locked image"));
        }
        let total = total_number_of_points(size);
        if total <= 0 {
            return Err(Error::InvalidParameter(format!(
                "cannot allocate empty geometry {:?}",
                size.components()
            )));
        }
        self.size = size.clone();
        self.data = Some(vec![T::default(); total as usize]);
        Ok(())
    }

    /// Allocate this image with the same geometry as `reference`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAllocated`] if `reference` is unallocated.
    pub fn set_same<U>(&mut self, reference: &Image<U>) -> Result<()> {
        if !reference.is_allocated() {
            return Err(Error::NotAllocated);
        }
        self.allocate(&reference.size().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_state() {
        let mut image: Image<u8> = Image::new(2);
        assert!(!image.is_allocated());
        assert_eq!(image.total_points(), 0);
        assert!(image.pixel_at(0).is_err());

        image.allocate(&Coordinate::new(&[4, 3])).unwrap();
        assert!(image.is_allocated());
        assert_eq!(image.total_points(), 12);

        image.reset().unwrap();
        assert!(!image.is_allocated());
    }

    #[test]
    fn test_pixel_access() {
        let mut image: Image<u16> = Image::with_size(&Coordinate::new(&[3, 2])).unwrap();
        let p = Coordinate::new(&[2, 1]);
        image.set_pixel(&p, 77).unwrap();
        assert_eq!(image.pixel(&p).unwrap(), 77);
        assert_eq!(image.pixel_at(5).unwrap(), 77);
        assert!(image.pixel(&Coordinate::new(&[3, 0])).is_err());
        assert!(image.pixel_at(6).is_err());
        assert!(image.pixel_at(-1).is_err());
    }

    #[test]
    fn test_set_same() {
        let reference: Image<u8> = Image::with_size(&Coordinate::new(&[5, 4])).unwrap();
        let mut sibling: Image<u32> = Image::new(2);
        sibling.set_same(&reference).unwrap();
        assert_eq!(sibling.size(), reference.size());

        let unallocated: Image<u8> = Image::new(2);
        let mut other: Image<u32> = Image::new(2);
        assert!(matches!(
            other.set_same(&unallocated),
            Err(Error::NotAllocated)
        ));
    }

    #[test]
    fn test_empty_geometry_rejected() {
        let mut image: Image<u8> = Image::new(2);
        assert!(image.allocate(&Coordinate::new(&[0, 4])).is_err());
    }

    #[test]
    fn test_copy_from() {
        let mut src: Image<u8> = Image::with_size(&Coordinate::new(&[3, 2])).unwrap();
        src.set_pixel_at(4, 9).unwrap();
        let mut dst: Image<u8> = Image::with_size(&Coordinate::new(&[3, 2])).unwrap();
        dst.copy_from(&src).unwrap();
        assert_eq!(dst.pixel_at(4).unwrap(), 9);

        let mut other: Image<u8> = Image::with_size(&Coordinate::new(&[2, 3])).unwrap();
        assert!(matches!(
            other.copy_from(&src),
            Err(Error::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_read_guard_blocks_reset() {
        let mut image: Image<u8> = Image::with_size(&Coordinate::new(&[2, 2])).unwrap();
        let guard = image.read_lock();
        assert!(image.reset().is_err());
        assert!(image.write_lock().is_err());
        guard.unlock();
        {
            let _w = image.write_lock().unwrap();
        }
        image.reset().unwrap();
    }

    #[test]
    fn test_guard_release_on_drop() {
        let mut image: Image<u8> = Image::with_size(&Coordinate::new(&[2, 2])).unwrap();
        {
            let _guard = image.read_lock();
        }
        image.reset().unwrap();
    }
}
