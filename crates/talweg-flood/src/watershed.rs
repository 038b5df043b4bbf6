//! Watershed segmentation (seeded and unseeded)
//!
//! Hierarchical-queue watershed: the topographic map is flooded from the
//! seed labels, one priority-queue plateau (one topographic level) at a
//! time, in insertion order within each plateau. Pixels where two
//! different labels meet become watershed lines; conflicts with
//! still-queued neighbors are deferred through the `QueuedSecondary`
//! state and resolved one plateau later, via the queue's buffered
//! insertion, so the current plateau's iteration is never disturbed.
//!
//! State writes follow the same discipline: neighbors flooded while a
//! plateau is walked (and while the seed scan runs) are staged and
//! committed only once the walk completes, so no step ever observes a
//! tentative label written earlier in the same pass.
//!
//! In the output label image, watershed lines and background share the
//! value 0; region pixels keep their seed's label. The unseeded variant
//! seeds itself with the regional minima of the topographic map.
//!
//! Conflict resolution depends on the processing order within a plateau;
//! that order is exactly the insertion order, single-threaded, which
//! keeps results reproducible.

use crate::error::FloodResult;
use crate::labeling::regional_minima;
use crate::pqueue::PlateauQueue;
use crate::state::FloodState;
use crate::validate::{check_allocated, check_same_size, check_se_dimension};
use talweg_core::{Image, Offset};
use talweg_morph::{Neighborhood, StructuringElement};

/// Label value shared by the background and watershed lines.
pub const WATERSHED_LABEL: u32 = 0;

/// Flood `topo` from `seed_labels`, writing region labels and watershed
/// lines into `out_labels`.
///
/// # Arguments
///
/// * `topo` - Topographic map; lower values flood first
/// * `seed_labels` - Seed image: nonzero labels mark seeds, 0 is unseeded
/// * `se` - Structuring element defining connectivity
/// * `out_labels` - Output: seed labels grown to their catchment basins,
///   [`WATERSHED_LABEL`] on lines and unreached pixels
///
/// # Errors
///
/// [`talweg_core::Error::NotAllocated`] / [`talweg_core::Error::SizeMismatch`]
/// are reported before `out_labels` is touched. Priority keys use the
/// topographic pixel type itself; the caller sizes it so that
/// `max(level, neighbor)` cannot overflow.
pub fn isotropic_seeded_watershed<T>(
    topo: &Image<T>,
    seed_labels: &Image<u32>,
    se: &StructuringElement,
    out_labels: &mut Image<u32>,
) -> FloodResult<()>
where
    T: Copy + Ord + Default,
{
    check_allocated(topo)?;
    check_same_size(topo, seed_labels)?;
    check_se_dimension(topo, se)?;
    out_labels.set_same(topo)?;

    let total = topo.total_points();
    out_labels.copy_from(seed_labels)?;

    let mut work: Image<FloodState> = Image::new(topo.dimension());
    work.set_same(topo)?;
    // Queue key of every queued pixel; consulted when a conflict with a
    // still-queued neighbor must be ranked against the current level.
    let mut priority: Image<T> = Image::new(topo.dimension());
    priority.set_same(topo)?;

    let mut neighborhood = Neighborhood::new(topo, &se.remove_center())?;
    let mut queue: PlateauQueue<T, Offset> = PlateauQueue::new();

    // Seeds are resolved by definition.
    for p in 0..total {
        if out_labels.pixel_at(p)? != WATERSHED_LABEL {
            work.set_pixel_at(p, FloodState::Processed)?;
        }
    }

    // Initialization: a seed touching a different label is already a
    // line; otherwise its unlabeled neighbors start the flood. The
    // enqueue writes are staged until the scan completes, so conflict
    // detection only ever sees real seed labels, never a tentative one
    // painted by an earlier seed of the same scan.
    let mut staged_floods: Vec<(Offset, u32, T)> = Vec::new();
    for p in 0..total {
        let label = out_labels.pixel_at(p)?;
        if label == WATERSHED_LABEL || work.pixel_at(p)? != FloodState::Processed {
            continue;
        }
        neighborhood.center_at(p)?;
        let mut conflict = false;
        for &q in neighborhood.offsets() {
            let l = out_labels.pixel_at(q)?;
            if l != WATERSHED_LABEL && l != label {
                conflict = true;
                break;
            }
        }
        if conflict {
            work.set_pixel_at(p, FloodState::WatershedLine)?;
            out_labels.set_pixel_at(p, WATERSHED_LABEL)?;
            continue;
        }
        for &q in neighborhood.offsets() {
            if out_labels.pixel_at(q)? == WATERSHED_LABEL
                && work.pixel_at(q)? == FloodState::Candidate
            {
                staged_floods.push((q, label, topo.pixel_at(q)?));
            }
        }
    }
    // First staged writer of a pixel wins its tentative label.
    for &(q, label, key) in &staged_floods {
        if work.pixel_at(q)? != FloodState::Candidate {
            continue;
        }
        out_labels.set_pixel_at(q, label)?;
        work.set_pixel_at(q, FloodState::Queued)?;
        priority.set_pixel_at(q, key)?;
        queue.insert(key, q);
    }
    staged_floods.clear();

    let mut secondary: Vec<Offset> = Vec::new();
    let mut plateau: Vec<Offset> = Vec::new();
    let mut candidates: Vec<Offset> = Vec::new();
    let mut deferred: Vec<Offset> = Vec::new();

    while let Some(&level) = queue.min_key() {
        plateau.clear();
        plateau.extend(queue.top_plateau().copied());

        for &p in &plateau {
            match work.pixel_at(p)? {
                FloodState::QueuedSecondary => {
                    work.set_pixel_at(p, FloodState::WatershedLine)?;
                    out_labels.set_pixel_at(p, WATERSHED_LABEL)?;
                    continue;
                }
                FloodState::Queued => {}
                // Re-enqueued entry resolved earlier in this run.
                _ => continue,
            }

            neighborhood.center_at(p)?;
            candidates.clear();
            deferred.clear();
            let mut label = out_labels.pixel_at(p)?;
            let mut line = false;

            for &q in neighborhood.offsets() {
                match work.pixel_at(q)? {
                    FloodState::Processed => {
                        let l = out_labels.pixel_at(q)?;
                        if l != WATERSHED_LABEL {
                            if label == WATERSHED_LABEL {
                                label = l;
                            } else if label != l {
                                line = true;
                            }
                        }
                    }
                    FloodState::Queued | FloodState::QueuedSecondary => deferred.push(q),
                    FloodState::Candidate => candidates.push(q),
                    FloodState::WatershedLine => {}
                }
            }

            if line {
                work.set_pixel_at(p, FloodState::WatershedLine)?;
                out_labels.set_pixel_at(p, WATERSHED_LABEL)?;
                continue;
            }

            // A queued neighbor carrying another label at or below this
            // level would merge two basins here: both sides become
            // lines, committed only after this plateau finishes.
            let mut conflicted = false;
            for &q in &deferred {
                let l = out_labels.pixel_at(q)?;
                if l != WATERSHED_LABEL && l != label && priority.pixel_at(q)? <= level {
                    conflicted = true;
                    secondary.push(p);
                    secondary.push(q);
                    queue.insert_buffered(level, p);
                    queue.insert_buffered(level, q);
                }
            }
            if conflicted {
                continue;
            }

            work.set_pixel_at(p, FloodState::Processed)?;
            out_labels.set_pixel_at(p, label)?;
            if label == WATERSHED_LABEL {
                continue;
            }
            // Flooded neighbors stay invisible until the plateau ends;
            // otherwise a later plateau member would see them as queued
            // foreign labels at this level and defer a phantom conflict.
            for &q in &candidates {
                let key = level.max(topo.pixel_at(q)?);
                staged_floods.push((q, label, key));
            }
        }

        // Plateau end: commit the staged floods (first writer wins) and
        // the deferred conflict marks, then flush the queue's staged
        // insertions.
        for &(q, label, key) in &staged_floods {
            if work.pixel_at(q)? != FloodState::Candidate {
                continue;
            }
            out_labels.set_pixel_at(q, label)?;
            work.set_pixel_at(q, FloodState::Queued)?;
            priority.set_pixel_at(q, key)?;
            queue.insert_buffered(key, q);
        }
        staged_floods.clear();
        for &m in &secondary {
            if work.pixel_at(m)? != FloodState::WatershedLine {
                work.set_pixel_at(m, FloodState::QueuedSecondary)?;
            }
        }
        secondary.clear();
        queue.pop_top_plateau();
    }

    // Pixels unreachable from every seed end as lines.
    for p in 0..total {
        match work.pixel_at(p)? {
            FloodState::Candidate | FloodState::Queued | FloodState::QueuedSecondary => {
                work.set_pixel_at(p, FloodState::WatershedLine)?;
                out_labels.set_pixel_at(p, WATERSHED_LABEL)?;
            }
            _ => {}
        }
    }
    Ok(())
}

/// Unseeded watershed: seeds are the regional minima of `topo`.
///
/// # Errors
///
/// Same as [`isotropic_seeded_watershed`].
pub fn isotropic_watershed<T>(
    topo: &Image<T>,
    se: &StructuringElement,
    out_labels: &mut Image<u32>,
) -> FloodResult<()>
where
    T: Copy + Ord + Default,
{
    check_allocated(topo)?;
    let mut seeds: Image<u32> = Image::new(topo.dimension());
    regional_minima(topo, se, &mut seeds)?;
    isotropic_seeded_watershed(topo, &seeds, se, out_labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use talweg_core::Coordinate;

    fn image_1d(values: &[u8]) -> Image<u8> {
        let mut image = Image::with_size(&Coordinate::new(&[values.len() as i64])).unwrap();
        for (offset, &v) in values.iter().enumerate() {
            image.set_pixel_at(offset as i64, v).unwrap();
        }
        image
    }

    fn labels_1d(values: &[u32]) -> Image<u32> {
        let mut image = Image::with_size(&Coordinate::new(&[values.len() as i64])).unwrap();
        for (offset, &v) in values.iter().enumerate() {
            image.set_pixel_at(offset as i64, v).unwrap();
        }
        image
    }

    fn pixels(image: &Image<u32>) -> Vec<u32> {
        image.as_slice().unwrap().to_vec()
    }

    #[test]
    fn test_ramp_line_at_the_peak() {
        // Two basins meet exactly at the single maximum.
        let topo = image_1d(&[0, 1, 2, 1, 0]);
        let seeds = labels_1d(&[1, 0, 0, 0, 2]);
        let se = StructuringElement::segment_1d();
        let mut out = Image::new(1);
        isotropic_seeded_watershed(&topo, &seeds, &se, &mut out).unwrap();
        assert_eq!(pixels(&out), vec![1, 1, 0, 2, 2]);
    }

    #[test]
    fn test_single_seed_floods_everything() {
        let topo = image_1d(&[3, 1, 2, 0, 5]);
        let seeds = labels_1d(&[0, 0, 0, 9, 0]);
        let se = StructuringElement::segment_1d();
        let mut out = Image::new(1);
        isotropic_seeded_watershed(&topo, &seeds, &se, &mut out).unwrap();
        assert_eq!(pixels(&out), vec![9, 9, 9, 9, 9]);
    }

    #[test]
    fn test_adjacent_seed_becomes_line() {
        // The first-scanned of two touching seeds is demoted to a line
        // immediately; the survivor then floods unopposed.
        let topo = image_1d(&[0, 0, 0]);
        let seeds = labels_1d(&[1, 2, 0]);
        let se = StructuringElement::segment_1d();
        let mut out = Image::new(1);
        isotropic_seeded_watershed(&topo, &seeds, &se, &mut out).unwrap();
        assert_eq!(pixels(&out), vec![0, 2, 2]);
    }

    #[test]
    fn test_seeds_split_by_one_gap_both_survive() {
        // The right seed must not be demoted by the tentative label the
        // left seed painted into the gap: only real seed labels count
        // during initialization, and the line lands in the gap itself.
        let topo = image_1d(&[0, 0, 0]);
        let seeds = labels_1d(&[1, 0, 2]);
        let se = StructuringElement::segment_1d();
        let mut out = Image::new(1);
        isotropic_seeded_watershed(&topo, &seeds, &se, &mut out).unwrap();
        assert_eq!(pixels(&out), vec![1, 0, 2]);
    }

    #[test]
    fn test_equal_level_plateau_meets_at_one_line() {
        // Both fronts enter the middle plateau during the same level;
        // neither side may see the other's flood of that plateau until
        // it ends, so exactly the contested pixel becomes a line.
        let topo = image_1d(&[0, 1, 1, 1, 0]);
        let seeds = labels_1d(&[1, 0, 0, 0, 2]);
        let se = StructuringElement::segment_1d();
        let mut out = Image::new(1);
        isotropic_seeded_watershed(&topo, &seeds, &se, &mut out).unwrap();
        assert_eq!(pixels(&out), vec![1, 1, 0, 2, 2]);
    }

    #[test]
    fn test_no_seeds_all_lines() {
        let topo = image_1d(&[0, 1, 0]);
        let seeds = labels_1d(&[0, 0, 0]);
        let se = StructuringElement::segment_1d();
        let mut out = Image::new(1);
        isotropic_seeded_watershed(&topo, &seeds, &se, &mut out).unwrap();
        assert_eq!(pixels(&out), vec![0, 0, 0]);
    }

    #[test]
    fn test_monotone_resolution_order() {
        // A pixel is resolved only after everything of strictly lower
        // topographic value: the deep basin fills before the shallow
        // shelf on the other side of the ridge is reached.
        let topo = image_1d(&[0, 2, 4, 3, 3, 1]);
        let seeds = labels_1d(&[1, 0, 0, 0, 0, 2]);
        let se = StructuringElement::segment_1d();
        let mut out = Image::new(1);
        isotropic_seeded_watershed(&topo, &seeds, &se, &mut out).unwrap();
        // Basin 1 climbs to level 2, basin 2 takes the 3-plateau first
        // (its key is lower than the ridge at 4), so the line sits at
        // the ridge.
        assert_eq!(pixels(&out), vec![1, 1, 0, 2, 2, 2]);
    }

    #[test]
    fn test_size_mismatch_rejected_before_output() {
        let topo = image_1d(&[0, 1, 2]);
        let seeds = labels_1d(&[1, 0]);
        let se = StructuringElement::segment_1d();
        let mut out = Image::new(1);
        assert!(isotropic_seeded_watershed(&topo, &seeds, &se, &mut out).is_err());
        assert!(!out.is_allocated());
    }

    #[test]
    fn test_unseeded_two_valleys() {
        // Regional minima at both ends seed two basins; the line lands
        // on the central peak.
        let topo = image_1d(&[1, 2, 5, 2, 0]);
        let se = StructuringElement::segment_1d();
        let mut out = Image::new(1);
        isotropic_watershed(&topo, &se, &mut out).unwrap();
        assert_eq!(pixels(&out), vec![1, 1, 0, 2, 2]);
    }

    #[test]
    fn test_2d_two_basins_vertical_ridge() {
        // 5x3: columns 0-1 drain left, columns 3-4 drain right, the
        // middle column is the ridge.
        let mut topo: Image<u8> = Image::with_size(&Coordinate::new(&[5, 3])).unwrap();
        for y in 0..3i64 {
            for (x, v) in [(0i64, 0u8), (1, 1), (2, 5), (3, 1), (4, 0)] {
                topo.set_pixel(&Coordinate::new(&[x, y]), v).unwrap();
            }
        }
        let mut seeds: Image<u32> = Image::with_size(&Coordinate::new(&[5, 3])).unwrap();
        seeds.set_pixel(&Coordinate::new(&[0, 1]), 1).unwrap();
        seeds.set_pixel(&Coordinate::new(&[4, 1]), 2).unwrap();

        let se = StructuringElement::cross_2d();
        let mut out = Image::new(2);
        isotropic_seeded_watershed(&topo, &seeds, &se, &mut out).unwrap();

        for y in 0..3i64 {
            assert_eq!(out.pixel(&Coordinate::new(&[0, y])).unwrap(), 1);
            assert_eq!(out.pixel(&Coordinate::new(&[1, y])).unwrap(), 1);
            assert_eq!(out.pixel(&Coordinate::new(&[2, y])).unwrap(), 0, "ridge y={y}");
            assert_eq!(out.pixel(&Coordinate::new(&[3, y])).unwrap(), 2);
            assert_eq!(out.pixel(&Coordinate::new(&[4, y])).unwrap(), 2);
        }
    }
}
