// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for broad-phase overlap implementations.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::types::{Aabb, Scalar};

/// Broad-phase backend abstraction.
///
/// A backend indexes a flat array of boxes and reports every pair of boxes whose
/// (inflated) extents intersect. The flat index of a box is its position in the slice
/// passed to [`build`](Backend::build).
///
/// Reports must be conservative: a backend may return pairs whose boxes do not
/// actually touch, but it must never omit a pair that does.
pub trait Backend<T: Scalar> {
    /// Index `boxes` for static queries, padding each box by `inflation_radius`.
    ///
    /// Rebuilding discards all prior state.
    fn build(&mut self, boxes: &[Aabb<T>], inflation_radius: T);

    /// Index swept boxes: box `i` covers `boxes_t0[i]` and `boxes_t1[i]`.
    ///
    /// # Panics
    ///
    /// Panics if the two slices differ in length.
    fn build_swept(&mut self, boxes_t0: &[Aabb<T>], boxes_t1: &[Aabb<T>], inflation_radius: T) {
        assert_eq!(
            boxes_t0.len(),
            boxes_t1.len(),
            "swept build needs one box per primitive at each time sample"
        );
        let swept: Vec<Aabb<T>> = boxes_t0
            .iter()
            .zip(boxes_t1)
            .map(|(a, b)| a.union(b))
            .collect();
        self.build(&swept, inflation_radius);
    }

    /// All overlapping pairs `(i, j)` with `i < j`, sorted ascending.
    ///
    /// # Panics
    ///
    /// Panics if the backend has not been built since creation or the last [`clear`](Backend::clear).
    fn query_overlaps(&self) -> Vec<(usize, usize)>;

    /// Release all built state.
    fn clear(&mut self);

    /// Whether [`query_overlaps`](Backend::query_overlaps) may be called.
    fn is_built(&self) -> bool;

    /// Number of boxes in the current build.
    fn len(&self) -> usize;

    /// True if the current build holds no boxes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short, stable identifier of the strategy.
    fn name(&self) -> &'static str;
}

impl<T: Scalar, B: Backend<T> + ?Sized> Backend<T> for Box<B> {
    fn build(&mut self, boxes: &[Aabb<T>], inflation_radius: T) {
        (**self).build(boxes, inflation_radius);
    }

    fn build_swept(&mut self, boxes_t0: &[Aabb<T>], boxes_t1: &[Aabb<T>], inflation_radius: T) {
        (**self).build_swept(boxes_t0, boxes_t1, inflation_radius);
    }

    fn query_overlaps(&self) -> Vec<(usize, usize)> {
        (**self).query_overlaps()
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn is_built(&self) -> bool {
        (**self).is_built()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[track_caller]
pub(crate) fn assert_built(built: bool, name: &str) {
    assert!(built, "{name}: query_overlaps called before build");
}
