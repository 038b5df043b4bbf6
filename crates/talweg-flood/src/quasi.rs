//! Quasi-distance propagation
//!
//! A discretized erosion-residue transform: the image is eroded step by
//! step, and each pixel records the largest value drop it ever sees in a
//! single step (the residue) together with the step at which that drop
//! occurred (the indicator). The indicator approximates a distance to
//! the background without an exact distance function.
//!
//! Each step reads only the previous step's erosion level: updates are
//! staged and committed at step end, so processing order within a step
//! cannot change the result. The active frontier (pixels that may still
//! erode) is tracked with a [`FloodState`] buffer and shrinks until the
//! transform stabilizes.

use crate::error::FloodResult;
use crate::state::FloodState;
use crate::validate::{check_allocated, check_se_dimension};
use std::ops::{Mul, Sub};
use talweg_core::{Error, Image, Offset};
use talweg_morph::{Neighborhood, StructuringElement};

/// Compute the quasi-distance transform of `image`.
///
/// `out_indicator` receives, per pixel, the erosion step (1..) at which
/// the maximal one-step residue was first achieved (0 where nothing ever
/// eroded); `out_residue` receives that maximal residue. Both outputs
/// are (re)allocated to the input geometry.
///
/// # Errors
///
/// [`Error::NotAllocated`] / SE-dimension errors before any output
/// mutation; [`Error::Overflow`] if the step counter would exceed the
/// indicator range — in that case the values recorded before the
/// overflow remain in the outputs.
pub fn quasi_distance<T>(
    image: &Image<T>,
    se: &StructuringElement,
    out_indicator: &mut Image<u32>,
    out_residue: &mut Image<T>,
) -> FloodResult<()>
where
    T: Copy + Ord + Sub<Output = T> + Default,
{
    propagate(image, se, out_indicator, out_residue, None, |_, residue| {
        residue
    })
}

/// Weighted variant of [`quasi_distance`].
///
/// `weights[k]` scales the residue recorded at step `k + 1`; the
/// propagation stops once the weight vector is exhausted, even if the
/// frontier is not yet empty.
pub fn weighted_quasi_distance<T>(
    image: &Image<T>,
    se: &StructuringElement,
    out_indicator: &mut Image<u32>,
    out_residue: &mut Image<T>,
    weights: &[T],
) -> FloodResult<()>
where
    T: Copy + Ord + Sub<Output = T> + Mul<Output = T> + Default,
{
    propagate(
        image,
        se,
        out_indicator,
        out_residue,
        Some(weights.len()),
        |step, residue| residue * weights[(step - 1) as usize],
    )
}

fn propagate<T, F>(
    image: &Image<T>,
    se: &StructuringElement,
    out_indicator: &mut Image<u32>,
    out_residue: &mut Image<T>,
    step_limit: Option<usize>,
    mut scale: F,
) -> FloodResult<()>
where
    T: Copy + Ord + Sub<Output = T> + Default,
    F: FnMut(u32, T) -> T,
{
    check_allocated(image)?;
    check_se_dimension(image, se)?;
    out_indicator.set_same(image)?;
    out_residue.set_same(image)?;

    // Erosion level of step t-1; staged writes become level t at commit.
    let mut levels: Vec<T> = image.as_slice()?.to_vec();
    let mut staged: Vec<(Offset, T)> = Vec::new();

    let mut work: Image<FloodState> = Image::new(image.dimension());
    work.set_same(image)?;
    let mut neighborhood = Neighborhood::new(image, &se.remove_center())?;

    let mut frontier: Vec<Offset> = (0..image.total_points()).collect();
    work.fill(FloodState::Queued)?;
    let mut next: Vec<Offset> = Vec::new();
    let mut indic: u32 = 0;

    while !frontier.is_empty() {
        if let Some(limit) = step_limit
            && indic as usize >= limit
        {
            break;
        }
        indic = indic
            .checked_add(1)
            .ok_or(Error::Overflow("quasi-distance indicator"))?;

        // Re-open the popped frontier so this step's erosions can
        // re-queue any of its members.
        for &p in &frontier {
            work.set_pixel_at(p, FloodState::Candidate)?;
        }

        for &p in &frontier {
            neighborhood.center_at(p)?;
            let previous = levels[p as usize];
            let mut eroded = previous;
            for &q in neighborhood.offsets() {
                eroded = eroded.min(levels[q as usize]);
            }
            if eroded == previous {
                continue;
            }
            staged.push((p, eroded));

            let residue = scale(indic, previous - eroded);
            if residue > out_residue.pixel_at(p)? {
                out_residue.set_pixel_at(p, residue)?;
                out_indicator.set_pixel_at(p, indic)?;
            }

            // Anything still above the new level may erode next step.
            for &q in neighborhood.offsets() {
                if levels[q as usize] > eroded && work.pixel_at(q)? != FloodState::Queued {
                    work.set_pixel_at(q, FloodState::Queued)?;
                    next.push(q);
                }
            }
        }

        for &(p, value) in &staged {
            levels[p as usize] = value;
        }
        staged.clear();
        frontier.clear();
        std::mem::swap(&mut frontier, &mut next);
    }
    Ok(())
}
