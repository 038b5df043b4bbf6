//! Talweg Morph - structuring elements and runtime neighborhoods
//!
//! This crate defines the neighborhood abstraction of the talweg engine:
//!
//! - [`StructuringElement`] - an immutable list of relative coordinates
//!   with a reshape-category tag
//! - [`Neighborhood`] - the border-cropped, centered instantiation of an
//!   SE at a specific point of one image, with an optimized shift mode
//!   for successive centers along the fastest-varying axis
//!
//! The flooding algorithms in `talweg-flood` consume neighborhoods
//! exclusively through [`Neighborhood::center_at`] and
//! [`Neighborhood::offsets`].

pub mod error;
pub mod neighborhood;
pub mod se;

pub use error::{MorphError, MorphResult};
pub use neighborhood::Neighborhood;
pub use se::{ReshapeCategory, StructuringElement};
