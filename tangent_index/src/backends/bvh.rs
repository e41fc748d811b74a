// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binary bounding hierarchy backend generic over scalar `T: Scalar`.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::{Backend, assert_built};
use crate::types::{Aabb, Scalar, ScalarAcc, cmp_t, half_area, inflate_all, sort_pairs};

/// A bulk-built BVH backend using SAH-like splits.
///
/// The hierarchy is rebuilt from scratch on every [`build`](Backend::build); overlaps
/// are found by descending the tree once per box and keeping only partners with a
/// larger index.
pub struct Bvh<T: Scalar> {
    max_leaf: usize,
    root: Option<NodeIdx>,
    arena: Vec<Node<T>>,
    boxes: Vec<Aabb<T>>,
    built: bool,
}

enum Kind {
    Leaf(Vec<usize>),
    Internal { left: NodeIdx, right: NodeIdx },
}

struct Node<T: Scalar> {
    bbox: Aabb<T>,
    kind: Kind,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct NodeIdx(usize);

impl NodeIdx {
    const fn new(i: usize) -> Self {
        Self(i)
    }

    const fn get(self) -> usize {
        self.0
    }
}

impl<T: Scalar> Default for Bvh<T> {
    fn default() -> Self {
        Self {
            max_leaf: 8,
            root: None,
            arena: Vec::new(),
            boxes: Vec::new(),
            built: false,
        }
    }
}

type BvhBestSplit<TS> = Option<(ScalarAcc<TS>, usize, usize)>;

impl<T: Scalar> Bvh<T> {
    /// Create a BVH whose leaves hold at most `max_leaf` boxes (at least one).
    pub fn with_max_leaf(max_leaf: usize) -> Self {
        Self {
            max_leaf: max_leaf.max(1),
            ..Self::default()
        }
    }

    /// Number of nodes in the current hierarchy.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    fn sort_along(boxes: &[Aabb<T>], items: &mut [usize], axis: usize) {
        items.sort_by(|a, b| cmp_t(&boxes[*a].center(axis), &boxes[*b].center(axis)));
    }

    fn bbox_items(boxes: &[Aabb<T>], items: &[usize]) -> Aabb<T> {
        let mut it = items.iter();
        match it.next() {
            Some(&first) => it.fold(boxes[first], |acc, &i| acc.union(&boxes[i])),
            None => Aabb::from_point([T::zero(); 3]),
        }
    }

    /// SAH-like split: sort along each axis, precompute prefix/suffix AABBs, and
    /// choose `k` that minimizes `area(LB_k) * k + area(RB_k) * (n - k)`.
    ///
    /// `k` is kept within the middle half of the range so the tree depth stays logarithmic.
    fn split_sah(boxes: &[Aabb<T>], mut items: Vec<usize>) -> (Vec<usize>, Vec<usize>) {
        let n = items.len();
        let min_children = (n / 4).max(1);
        let mut best: BvhBestSplit<T> = None;
        for axis in 0..3 {
            Self::sort_along(boxes, &mut items, axis);

            let mut prefix: Vec<Aabb<T>> = Vec::with_capacity(n);
            for &i in &items {
                let next = match prefix.last() {
                    Some(prev) => prev.union(&boxes[i]),
                    None => boxes[i],
                };
                prefix.push(next);
            }
            let mut suffix: Vec<Aabb<T>> = Vec::with_capacity(n);
            for &i in items.iter().rev() {
                let next = match suffix.last() {
                    Some(prev) => boxes[i].union(prev),
                    None => boxes[i],
                };
                suffix.push(next);
            }
            suffix.reverse();

            for k in min_children..=(n - min_children) {
                let cost = half_area(&prefix[k - 1]) * T::acc_from_usize(k)
                    + half_area(&suffix[k]) * T::acc_from_usize(n - k);
                if best.map(|(bc, _, _)| cost < bc).unwrap_or(true) {
                    best = Some((cost, axis, k));
                }
            }
        }
        let (axis, k) = best.map(|(_, a, k)| (a, k)).unwrap_or((0, n / 2));
        Self::sort_along(boxes, &mut items, axis);
        let right = items.split_off(k);
        (items, right)
    }

    fn build_node(
        arena: &mut Vec<Node<T>>,
        boxes: &[Aabb<T>],
        items: Vec<usize>,
        max_leaf: usize,
    ) -> NodeIdx {
        let bbox = Self::bbox_items(boxes, &items);
        let kind = if items.len() <= max_leaf {
            Kind::Leaf(items)
        } else {
            let (l, r) = Self::split_sah(boxes, items);
            let left = Self::build_node(arena, boxes, l, max_leaf);
            let right = Self::build_node(arena, boxes, r, max_leaf);
            Kind::Internal { left, right }
        };
        arena.push(Node { bbox, kind });
        NodeIdx::new(arena.len() - 1)
    }
}

impl<T: Scalar> Backend<T> for Bvh<T> {
    fn build(&mut self, boxes: &[Aabb<T>], inflation_radius: T) {
        self.arena.clear();
        self.boxes = inflate_all(boxes, inflation_radius);
        self.root = if self.boxes.is_empty() {
            None
        } else {
            let items: Vec<usize> = (0..self.boxes.len()).collect();
            Some(Self::build_node(
                &mut self.arena,
                &self.boxes,
                items,
                self.max_leaf,
            ))
        };
        self.built = true;
    }

    fn query_overlaps(&self) -> Vec<(usize, usize)> {
        assert_built(self.built, self.name());
        let mut out = Vec::new();
        let Some(root_idx) = self.root else {
            return out;
        };
        let mut stack = Vec::new();
        for (i, query) in self.boxes.iter().enumerate() {
            stack.clear();
            stack.push(root_idx);
            while let Some(n) = stack.pop() {
                let node = &self.arena[n.get()];
                if !node.bbox.intersects(query) {
                    continue;
                }
                match &node.kind {
                    Kind::Leaf(items) => {
                        for &j in items {
                            if j > i && self.boxes[j].intersects(query) {
                                out.push((i, j));
                            }
                        }
                    }
                    Kind::Internal { left, right } => {
                        stack.push(*left);
                        stack.push(*right);
                    }
                }
            }
        }
        sort_pairs(&mut out);
        out
    }

    fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
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
        "bvh"
    }
}

impl<T: Scalar> Debug for Bvh<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Bvh")
            .field("max_leaf", &self.max_leaf)
            .field("arena_nodes", &self.arena.len())
            .field("boxes", &self.boxes.len())
            .field("has_root", &self.root.is_some())
            .finish_non_exhaustive()
    }
}

/// BVH with f32 coordinates and f64 metrics.
pub type BvhF32 = Bvh<f32>;

/// BVH with f64 coordinates and f64 metrics.
pub type BvhF64 = Bvh<f64>;
