//! Talweg Flood - priority-queue flooding algorithms
//!
//! The ordered-flooding core of the talweg morphology engine:
//!
//! - [`PlateauQueue`] - bucketed, FIFO-within-bucket priority queue with
//!   buffered insertion
//! - [`FloodState`] - the per-pixel state machine painted onto an
//!   auxiliary buffer by every algorithm
//! - [`label`] / [`flood_components`] - hierarchical-queue connected-
//!   component labeling and the generic flood engine behind it
//! - [`regional_minima`] - plateau minima detection, the seeding stage
//!   of the unseeded watershed
//! - [`quasi_distance`] / [`weighted_quasi_distance`] - erosion-residue
//!   propagation
//! - [`isotropic_seeded_watershed`] / [`isotropic_watershed`] -
//!   watershed segmentation with plateau semantics
//!
//! All algorithms are single-threaded and deterministic: plateaus are
//! processed in insertion order, and results depend only on the input
//! and the structuring element.

pub mod error;
pub mod labeling;
pub mod pqueue;
pub mod quasi;
pub mod state;
mod validate;
pub mod watershed;

pub use error::{FloodError, FloodResult};
pub use labeling::{flood_components, label, regional_minima};
pub use pqueue::PlateauQueue;
pub use quasi::{quasi_distance, weighted_quasi_distance};
pub use state::FloodState;
pub use watershed::{WATERSHED_LABEL, isotropic_seeded_watershed, isotropic_watershed};
