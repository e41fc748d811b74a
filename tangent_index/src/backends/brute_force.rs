// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Brute-force backend testing every pair. Small and simple; the reference for the others.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::{Backend, assert_built};
use crate::types::{Aabb, Scalar, inflate_all};

/// All-pairs backend with O(n²) queries.
pub struct BruteForce<T: Scalar> {
    boxes: Vec<Aabb<T>>,
    built: bool,
}

impl<T: Scalar> Default for BruteForce<T> {
    fn default() -> Self {
        Self {
            boxes: Vec::new(),
            built: false,
        }
    }
}

impl<T: Scalar> Debug for BruteForce<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BruteForce")
            .field("boxes", &self.boxes.len())
            .field("built", &self.built)
            .finish_non_exhaustive()
    }
}

impl<T: Scalar> Backend<T> for BruteForce<T> {
    fn build(&mut self, boxes: &[Aabb<T>], inflation_radius: T) {
        self.boxes = inflate_all(boxes, inflation_radius);
        self.built = true;
    }

    fn query_overlaps(&self) -> Vec<(usize, usize)> {
        assert_built(self.built, self.name());
        let mut out = Vec::new();
        for (i, a) in self.boxes.iter().enumerate() {
            for (j, b) in self.boxes.iter().enumerate().skip(i + 1) {
                if a.intersects(b) {
                    out.push((i, j));
                }
            }
        }
        out
    }

    fn clear(&mut self) {
        self.boxes.clear();
        self.built = false;
    }

    fn is_built(&self) -> bool {
        self.built
    }

    fn len(&self) -> usize {
        self.boxes.len()
    }

    fn name(&self) -> &'static str {
        "brute_force"
    }
}
