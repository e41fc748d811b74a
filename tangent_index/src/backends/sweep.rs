// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sweep-and-prune backends.
//!
//! Boxes are sorted by their minimum along one axis; each box is then compared only
//! with the boxes that start before it ends on that axis.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::{Backend, assert_built};
use crate::types::{Aabb, Scalar, cmp_t, inflate_all, le, lt, sort_pairs};

/// Sorted sweep state shared by the serial and parallel backends.
struct Sweep<T: Scalar> {
    fixed_axis: Option<usize>,
    axis: usize,
    boxes: Vec<Aabb<T>>,
    order: Vec<usize>,
    built: bool,
}

impl<T: Scalar> Sweep<T> {
    fn new(fixed_axis: Option<usize>) -> Self {
        if let Some(a) = fixed_axis {
            assert!(a < 3, "sweep axis must be 0, 1 or 2");
        }
        Self {
            fixed_axis,
            axis: fixed_axis.unwrap_or(0),
            boxes: Vec::new(),
            order: Vec::new(),
            built: false,
        }
    }

    /// Axis along which box centers are most spread out.
    fn widest_axis(boxes: &[Aabb<T>]) -> usize {
        let Some(first) = boxes.first() else {
            return 0;
        };
        let mut lo = [first.center(0), first.center(1), first.center(2)];
        let mut hi = lo;
        for b in boxes {
            for a in 0..3 {
                let c = b.center(a);
                if lt(c, lo[a]) {
                    lo[a] = c;
                }
                if lt(hi[a], c) {
                    hi[a] = c;
                }
            }
        }
        let spread = |a: usize| T::widen(T::max_zero(T::sub(hi[a], lo[a])));
        let mut best = 0;
        for a in 1..3 {
            if lt(spread(best), spread(a)) {
                best = a;
            }
        }
        best
    }

    fn build(&mut self, boxes: &[Aabb<T>], inflation_radius: T) {
        self.boxes = inflate_all(boxes, inflation_radius);
        self.axis = self
            .fixed_axis
            .unwrap_or_else(|| Self::widest_axis(&self.boxes));
        let axis = self.axis;
        let b = &self.boxes;
        let mut order: Vec<usize> = (0..b.len()).collect();
        order.sort_by(|&i, &j| cmp_t(&b[i].min[axis], &b[j].min[axis]).then(i.cmp(&j)));
        self.order = order;
        self.built = true;
    }

    /// Overlaps between the `k`-th box in sweep order and every box after it.
    fn pairs_from(&self, k: usize, out: &mut Vec<(usize, usize)>) {
        let i = self.order[k];
        let a = &self.boxes[i];
        for &j in &self.order[k + 1..] {
            let b = &self.boxes[j];
            if !le(b.min[self.axis], a.max[self.axis]) {
                break;
            }
            if a.intersects(b) {
                out.push(if i < j { (i, j) } else { (j, i) });
            }
        }
    }

    fn clear(&mut self) {
        self.boxes.clear();
        self.order.clear();
        self.built = false;
    }
}

/// Serial sweep-and-prune backend.
///
/// By default the sweep axis is chosen per build as the axis with the widest spread
/// of box centers.
pub struct SweepAndPrune<T: Scalar> {
    sweep: Sweep<T>,
}

impl<T: Scalar> Default for SweepAndPrune<T> {
    fn default() -> Self {
        Self {
            sweep: Sweep::new(None),
        }
    }
}

impl<T: Scalar> SweepAndPrune<T> {
    /// Sweep along a fixed axis (0 = x, 1 = y, 2 = z).
    ///
    /// # Panics
    ///
    /// Panics if `axis > 2`.
    pub fn with_axis(axis: usize) -> Self {
        Self {
            sweep: Sweep::new(Some(axis)),
        }
    }

    /// Axis used by the current build.
    pub fn axis(&self) -> usize {
        self.sweep.axis
    }
}

impl<T: Scalar> Backend<T> for SweepAndPrune<T> {
    fn build(&mut self, boxes: &[Aabb<T>], inflation_radius: T) {
        self.sweep.build(boxes, inflation_radius);
    }

    fn query_overlaps(&self) -> Vec<(usize, usize)> {
        assert_built(self.sweep.built, self.name());
        let mut out = Vec::new();
        for k in 0..self.sweep.order.len() {
            self.sweep.pairs_from(k, &mut out);
        }
        sort_pairs(&mut out);
        out
    }

    fn clear(&mut self) {
        self.sweep.clear();
    }

    fn is_built(&self) -> bool {
        self.sweep.built
    }

    fn len(&self) -> usize {
        self.sweep.boxes.len()
    }

    fn name(&self) -> &'static str {
        "sweep_and_prune"
    }
}

impl<T: Scalar> Debug for SweepAndPrune<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SweepAndPrune")
            .field("fixed_axis", &self.sweep.fixed_axis)
            .field("axis", &self.sweep.axis)
            .field("boxes", &self.sweep.boxes.len())
            .field("built", &self.sweep.built)
            .finish_non_exhaustive()
    }
}

/// Sweep-and-prune backend whose sweep runs on the rayon thread pool.
///
/// Sorting happens on the calling thread; every box's forward scan is an
/// independent task. Results are collected and sorted before returning.
#[cfg(feature = "rayon")]
pub struct ParallelSweepAndPrune<T: Scalar> {
    sweep: Sweep<T>,
}

#[cfg(feature = "rayon")]
impl<T: Scalar> Default for ParallelSweepAndPrune<T> {
    fn default() -> Self {
        Self {
            sweep: Sweep::new(None),
        }
    }
}

#[cfg(feature = "rayon")]
impl<T: Scalar + Send + Sync> Backend<T> for ParallelSweepAndPrune<T> {
    fn build(&mut self, boxes: &[Aabb<T>], inflation_radius: T) {
        self.sweep.build(boxes, inflation_radius);
    }

    fn query_overlaps(&self) -> Vec<(usize, usize)> {
        use rayon::prelude::*;

        assert_built(self.sweep.built, self.name());
        let sweep = &self.sweep;
        let mut out: Vec<(usize, usize)> = (0..sweep.order.len())
            .into_par_iter()
            .flat_map_iter(|k| {
                let mut local = Vec::new();
                sweep.pairs_from(k, &mut local);
                local
            })
            .collect();
        out.par_sort_unstable();
        out
    }

    fn clear(&mut self) {
        self.sweep.clear();
    }

    fn is_built(&self) -> bool {
        self.sweep.built
    }

    fn len(&self) -> usize {
        self.sweep.boxes.len()
    }

    fn name(&self) -> &'static str {
        "parallel_sweep_and_prune"
    }
}

#[cfg(feature = "rayon")]
impl<T: Scalar> Debug for ParallelSweepAndPrune<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParallelSweepAndPrune")
            .field("axis", &self.sweep.axis)
            .field("boxes", &self.sweep.boxes.len())
            .field("built", &self.sweep.built)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn picks_the_widest_axis() {
        let mut s: SweepAndPrune<f64> = SweepAndPrune::default();
        let boxes: Vec<_> = (0..5)
            .map(|i| {
                let y = i as f64 * 10.0;
                Aabb::new([0.0, y, 0.0], [1.0, y + 1.0, 1.0])
            })
            .collect();
        s.build(&boxes, 0.0);
        assert_eq!(s.axis(), 1);
        assert!(s.query_overlaps().is_empty());
    }

    #[test]
    fn fixed_axis_still_checks_all_axes() {
        let mut s: SweepAndPrune<f64> = SweepAndPrune::with_axis(0);
        s.build(
            &[
                Aabb::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]),
                Aabb::new([0.5, 5.0, 0.0], [1.5, 6.0, 1.0]),
                Aabb::new([0.9, 0.9, 0.9], [3.0, 3.0, 3.0]),
            ],
            0.0,
        );
        assert_eq!(s.query_overlaps(), vec![(0, 2)]);
    }

    #[test]
    fn pairs_are_normalized_when_sort_order_differs_from_index_order() {
        let mut s: SweepAndPrune<f32> = SweepAndPrune::with_axis(0);
        s.build(
            &[
                Aabb::new([2.0, 0.0, 0.0], [3.0, 1.0, 1.0]),
                Aabb::new([0.0, 0.0, 0.0], [2.5, 1.0, 1.0]),
            ],
            0.0,
        );
        assert_eq!(s.query_overlaps(), vec![(0, 1)]);
    }

    #[test]
    #[should_panic(expected = "sweep axis must be 0, 1 or 2")]
    fn rejects_bad_axis() {
        let _ = SweepAndPrune::<f64>::with_axis(3);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn parallel_matches_serial() {
        let boxes: Vec<_> = (0..200)
            .map(|i| {
                let x = (i % 20) as f64 * 0.7;
                let y = (i / 20) as f64 * 0.7;
                Aabb::new([x, y, 0.0], [x + 1.0, y + 1.0, 0.0])
            })
            .collect();
        let mut serial: SweepAndPrune<f64> = SweepAndPrune::default();
        let mut parallel: ParallelSweepAndPrune<f64> = ParallelSweepAndPrune::default();
        serial.build(&boxes, 0.01);
        parallel.build(&boxes, 0.01);
        assert_eq!(serial.query_overlaps(), parallel.query_overlaps());
    }
}
