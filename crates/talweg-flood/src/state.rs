//! Per-pixel flood state
//!
//! Each algorithm paints its progress onto an auxiliary image of
//! [`FloodState`] values with the same geometry as the processed image,
//! created per invocation and discarded at the end. Every pixel occupies
//! exactly one state at all times; transitions are monotone within one
//! algorithm run.

/// The label-buffer state machine shared by all flooding algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum FloodState {
    /// Not yet reached.
    #[default]
    Candidate = 0,
    /// Sitting in the queue, waiting for its plateau.
    Queued = 1,
    /// Re-queued for conflicting-label re-examination; confirmed as a
    /// watershed line when popped.
    QueuedSecondary = 2,
    /// Fully resolved.
    Processed = 3,
    /// Terminal unlabeled boundary state.
    WatershedLine = 4,
}
