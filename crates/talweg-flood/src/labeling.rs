//! Connected-component labeling
//!
//! The generic flood engine grows one component at a time through a
//! plain FIFO queue: pixels passing an accept predicate are connected to
//! neighbors related to them by a caller-supplied binary relation
//! (equality for plain labeling). Neighbors that are accepted but *not*
//! related trigger an "unconnected" hook, which is how callers harvest
//! adjacency information — and how regional-minima detection notices a
//! strictly lower neighbor — without a second pass.
//!
//! Each pixel enters the inner queue at most once (its state moves
//! monotonically `Candidate → Processed`), so a full labeling runs in
//! time linear in image size times neighborhood size.

use crate::error::FloodResult;
use crate::state::FloodState;
use crate::validate::{check_allocated, check_se_dimension};
use std::cell::Cell;
use std::collections::VecDeque;
use talweg_core::{Error, Image, Offset};
use talweg_morph::{Neighborhood, StructuringElement};

/// Flood every component of `image`, in scan order.
///
/// * `accept` — pixels for which it returns `false` never start nor
///   join a component.
/// * `related` — binary relation `(current value, neighbor value)`
///   deciding connectivity.
/// * `unconnected` — invoked with `(current offset, neighbor offset)`
///   for every accepted neighbor that is *not* related.
/// * `component` — invoked once per finished component with its id
///   (numbered from 1, in scan order) and member offsets.
///
/// Returns the number of components.
///
/// # Errors
///
/// [`Error::NotAllocated`] for an unallocated input;
/// [`talweg_morph::MorphError::SeDimension`] on an SE of the wrong
/// dimension; [`Error::Overflow`] if the component count exceeds `u32`.
pub fn flood_components<T, A, R, U, S>(
    image: &Image<T>,
    se: &StructuringElement,
    mut accept: A,
    mut related: R,
    mut unconnected: U,
    mut component: S,
) -> FloodResult<u32>
where
    T: Copy,
    A: FnMut(Offset, T) -> bool,
    R: FnMut(T, T) -> bool,
    U: FnMut(Offset, Offset),
    S: FnMut(u32, &[Offset]),
{
    check_allocated(image)?;

    let mut work: Image<FloodState> = Image::new(image.dimension());
    work.set_same(image)?;
    let mut neighborhood = Neighborhood::new(image, &se.remove_center())?;

    let mut queue: VecDeque<Offset> = VecDeque::new();
    let mut members: Vec<Offset> = Vec::new();
    let mut count: u32 = 0;

    for start in 0..image.total_points() {
        if work.pixel_at(start)? == FloodState::Processed {
            continue;
        }
        if !accept(start, image.pixel_at(start)?) {
            continue;
        }
        count = count
            .checked_add(1)
            .ok_or(Error::Overflow("component count"))?;

        members.clear();
        queue.push_back(start);
        work.set_pixel_at(start, FloodState::Processed)?;

        while let Some(p) = queue.pop_front() {
            members.push(p);
            let value = image.pixel_at(p)?;
            neighborhood.center_at(p)?;
            for &q in neighborhood.offsets() {
                let neighbor_value = image.pixel_at(q)?;
                if !accept(q, neighbor_value) {
                    continue;
                }
                if related(value, neighbor_value) {
                    if work.pixel_at(q)? != FloodState::Processed {
                        work.set_pixel_at(q, FloodState::Processed)?;
                        queue.push_back(q);
                    }
                } else {
                    unconnected(p, q);
                }
            }
        }
        component(count, &members);
    }
    Ok(count)
}

/// Label connected components of equal value.
///
/// Writes the component id (1.., in scan order) of every pixel into
/// `out_labels`, which is (re)allocated to the input geometry. Returns
/// the number of components.
///
/// # Arguments
///
/// * `image` - Input image
/// * `se` - Structuring element defining connectivity
/// * `out_labels` - Output label image
///
/// # Errors
///
/// Fails before touching `out_labels` if the input is unallocated or
/// the SE dimension disagrees.
pub fn label<T>(
    image: &Image<T>,
    se: &StructuringElement,
    out_labels: &mut Image<u32>,
) -> FloodResult<u32>
where
    T: Copy + PartialEq,
{
    check_allocated(image)?;
    check_se_dimension(image, se)?;
    out_labels.set_same(image)?;

    flood_components(
        image,
        se,
        |_, _| true,
        |a, b| a == b,
        |_, _| {},
        |id, members| {
            for &offset in members {
                // Offsets come from the flood itself, always in range.
                let _ = out_labels.set_pixel_at(offset, id);
            }
        },
    )
}

/// Label the regional minima of `image`.
///
/// A regional minimum is a connected plateau of equal value with no
/// strictly lower neighbor. Minima are numbered 1.. in scan order;
/// every other pixel is 0. Returns the number of minima.
///
/// The unseeded watershed uses this as its seeding stage.
pub fn regional_minima<T>(
    image: &Image<T>,
    se: &StructuringElement,
    out_labels: &mut Image<u32>,
) -> FloodResult<u32>
where
    T: Copy + Ord,
{
    check_allocated(image)?;
    check_se_dimension(image, se)?;
    out_labels.set_same(image)?;

    let is_minimum = Cell::new(true);
    let minima = Cell::new(0u32);
    let result = flood_components(
        image,
        se,
        |_, _| true,
        |a, b| a == b,
        |p, q| {
            // A strictly lower unrelated neighbor disqualifies the
            // plateau; higher ones are just the plateau's rim.
            let (Ok(center), Ok(neighbor)) = (image.pixel_at(p), image.pixel_at(q)) else {
                return;
            };
            if neighbor < center {
                is_minimum.set(false);
            }
        },
        |_, members| {
            if is_minimum.get() {
                let id = minima.get() + 1;
                minima.set(id);
                for &offset in members {
                    let _ = out_labels.set_pixel_at(offset, id);
                }
            }
            is_minimum.set(true);
        },
    );
    result?;
    Ok(minima.get())
}
