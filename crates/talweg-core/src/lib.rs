//! Talweg Core - Basic data structures for the morphology engine
//!
//! This crate provides the fundamental data structures used throughout
//! the talweg mathematical-morphology library:
//!
//! - [`Coordinate`] / [`Offset`] - N-dimensional points and their linear
//!   projection into a flattened pixel buffer
//! - [`Image`] - the allocated/unallocated N-dimensional pixel container,
//!   with advisory access guards
//! - [`OffsetRelation`] - per-call classification of how two image
//!   buffers relate, used to select the cheapest lockstep iteration
//!
//! Everything here is single-threaded and deterministic; the flooding
//! algorithms in `talweg-flood` consume these types through
//! `talweg-morph`'s runtime neighborhood.

pub mod coord;
pub mod error;
pub mod image;
pub mod layout;

pub use coord::{
    Coordinate, Offset, from_coordinate_to_offset, from_offset_to_coordinate, is_point_inside,
    project_offset, total_number_of_points,
};
pub use error::{Error, Result};
pub use image::{Image, ReadGuard, WriteGuard};
pub use layout::{OffsetRelation, classify_offsets};
