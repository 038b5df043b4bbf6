//! Talweg - dimension-agnostic mathematical morphology
//!
//! Umbrella crate re-exporting the engine's public API:
//!
//! - `talweg-core`: coordinates, offsets, the N-dimensional [`Image`]
//! - `talweg-morph`: [`StructuringElement`] and the runtime
//!   [`Neighborhood`]
//! - `talweg-flood`: connected-component labeling, quasi-distance and
//!   watershed, driven by the [`PlateauQueue`]
//!
//! # Example
//!
//! ```
//! use talweg::{Coordinate, Image, StructuringElement, isotropic_seeded_watershed};
//!
//! let size = Coordinate::new(&[5]);
//! let mut topo: Image<u8> = Image::with_size(&size).unwrap();
//! let mut seeds: Image<u32> = Image::with_size(&size).unwrap();
//! for (offset, v) in [0u8, 1, 2, 1, 0].into_iter().enumerate() {
//!     topo.set_pixel_at(offset as i64, v).unwrap();
//! }
//! seeds.set_pixel_at(0, 1).unwrap();
//! seeds.set_pixel_at(4, 2).unwrap();
//!
//! let se = StructuringElement::segment_1d();
//! let mut labels = Image::new(1);
//! isotropic_seeded_watershed(&topo, &seeds, &se, &mut labels).unwrap();
//! assert_eq!(labels.as_slice().unwrap(), &[1, 1, 0, 2, 2]);
//! ```

pub use talweg_core::{
    Coordinate, Error, Image, Offset, OffsetRelation, ReadGuard, Result, WriteGuard,
    classify_offsets, from_coordinate_to_offset, from_offset_to_coordinate, is_point_inside,
    total_number_of_points,
};
pub use talweg_flood::{
    FloodError, FloodResult, FloodState, PlateauQueue, WATERSHED_LABEL, flood_components,
    isotropic_seeded_watershed, isotropic_watershed, label, quasi_distance, regional_minima,
    weighted_quasi_distance,
};
pub use talweg_morph::{
    MorphError, MorphResult, Neighborhood, ReshapeCategory, StructuringElement,
};
