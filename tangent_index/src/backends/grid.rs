// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid backend. Bins boxes into every cell they cover and tests pairs per cell.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::{Backend, assert_built};
use crate::types::{Aabb, Scalar, inflate_all, max_t, sort_pairs};

type CellKey = [i64; 3];

/// Upper bound on the automatically chosen number of cells along the longest axis.
const MAX_AUTO_CELLS_PER_AXIS: f64 = 64.0;

/// Uniform grid backend.
///
/// Cell size is either fixed by the caller or derived from the boxes on each build
/// (the mean of every box's longest side, clamped so the scene spans at most
/// 64 cells per axis). The grid origin is the minimum corner of the scene, so
/// negative coordinates need no special handling.
pub struct UniformGrid<T: Scalar> {
    cell_size: Option<f64>,
    resolved_cell: f64,
    origin: [f64; 3],
    boxes: Vec<Aabb<T>>,
    cells: BTreeMap<CellKey, Vec<usize>>,
    built: bool,
}

impl<T: Scalar> Default for UniformGrid<T> {
    fn default() -> Self {
        Self {
            cell_size: None,
            resolved_cell: 1.0,
            origin: [0.0; 3],
            boxes: Vec::new(),
            cells: BTreeMap::new(),
            built: false,
        }
    }
}

impl<T: Scalar> UniformGrid<T> {
    /// Create a grid that picks its cell size from the boxes on every build.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grid with a fixed cell size.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is not strictly positive.
    pub fn with_cell_size(cell_size: T) -> Self {
        let cell = T::to_f64(cell_size);
        assert!(cell > 0.0, "cell size must be positive");
        Self {
            cell_size: Some(cell),
            ..Self::default()
        }
    }

    /// Cell size used by the current build.
    pub fn cell_size(&self) -> f64 {
        self.resolved_cell
    }

    /// Number of non-empty cells in the current build.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn floor_to_i64(v: f64) -> i64 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Cell coordinates are bounded by the scene extent over the cell size."
        )]
        let i = v as i64;
        if (i as f64) > v { i - 1 } else { i }
    }

    fn key_for(&self, p: [T; 3]) -> CellKey {
        let c = self.resolved_cell;
        debug_assert!(c > 0.0, "cell size must be positive");
        [
            Self::floor_to_i64((T::to_f64(p[0]) - self.origin[0]) / c),
            Self::floor_to_i64((T::to_f64(p[1]) - self.origin[1]) / c),
            Self::floor_to_i64((T::to_f64(p[2]) - self.origin[2]) / c),
        ]
    }

    fn resolve_cell_size(&self, scene: &Aabb<T>) -> f64 {
        if let Some(c) = self.cell_size {
            return c;
        }
        let n = self.boxes.len().max(1) as f64;
        let mean_side = self
            .boxes
            .iter()
            .map(|b| (0..3).map(|a| T::to_f64(b.extent(a))).fold(0.0, f64::max))
            .sum::<f64>()
            / n;
        let scene_side = (0..3)
            .map(|a| T::to_f64(scene.extent(a)))
            .fold(0.0, f64::max);
        let c = mean_side.max(scene_side / MAX_AUTO_CELLS_PER_AXIS);
        if c > 0.0 { c } else { 1.0 }
    }
}

impl<T: Scalar> Backend<T> for UniformGrid<T> {
    fn build(&mut self, boxes: &[Aabb<T>], inflation_radius: T) {
        self.cells.clear();
        self.boxes = inflate_all(boxes, inflation_radius);
        self.built = true;
        let Some(first) = self.boxes.first().copied() else {
            return;
        };
        let scene = self.boxes.iter().fold(first, |acc, b| acc.union(b));
        self.origin = [
            T::to_f64(scene.min[0]),
            T::to_f64(scene.min[1]),
            T::to_f64(scene.min[2]),
        ];
        self.resolved_cell = self.resolve_cell_size(&scene);

        for slot in 0..self.boxes.len() {
            let b = self.boxes[slot];
            let lo = self.key_for(b.min);
            let hi = self.key_for(b.max);
            for z in lo[2]..=hi[2] {
                for y in lo[1]..=hi[1] {
                    for x in lo[0]..=hi[0] {
                        self.cells.entry([x, y, z]).or_default().push(slot);
                    }
                }
            }
        }
    }

    fn query_overlaps(&self) -> Vec<(usize, usize)> {
        assert_built(self.built, self.name());
        let mut out = Vec::new();
        for (key, slots) in &self.cells {
            for (k, &i) in slots.iter().enumerate() {
                let a = &self.boxes[i];
                for &j in &slots[k + 1..] {
                    let b = &self.boxes[j];
                    if !a.intersects(b) {
                        continue;
                    }
                    // Each pair is reported only from the cell holding the min corner
                    // of the two boxes' intersection; both boxes are binned there.
                    let corner = [
                        max_t(a.min[0], b.min[0]),
                        max_t(a.min[1], b.min[1]),
                        max_t(a.min[2], b.min[2]),
                    ];
                    if self.key_for(corner) == *key {
                        out.push((i, j));
                    }
                }
            }
        }
        sort_pairs(&mut out);
        out
    }

    fn clear(&mut self) {
        self.boxes.clear();
        self.cells.clear();
        self.built = false;
    }

    fn is_built(&self) -> bool {
        self.built
    }

    fn len(&self) -> usize {
        self.boxes.len()
    }

    fn name(&self) -> &'static str {
        "uniform_grid"
    }
}

impl<T: Scalar> Debug for UniformGrid<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UniformGrid")
            .field("cell_size", &self.cell_size)
            .field("resolved_cell", &self.resolved_cell)
            .field("origin", &self.origin)
            .field("boxes", &self.boxes.len())
            .field("cells", &self.cells.len())
            .field("built", &self.built)
            .finish_non_exhaustive()
    }
}
