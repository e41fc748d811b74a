// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tangent Index: a 3D AABB overlap index with pluggable broad-phase backends.
//!
//! Tangent Index is the spatial layer underneath collision-candidate detection.
//!
//! - Build an index over a flat array of axis-aligned bounding boxes (AABBs), optionally
//!   padded by an inflation radius.
//! - Build from two time samples to get swept boxes for continuous queries.
//! - Report every overlapping pair `(i, j)` with `i < j`, where `i` and `j` are positions
//!   in the array passed to the build.
//!
//! It is generic over the scalar type `T` and does not depend on any geometry crate.
//! Higher layers (like a mesh broad phase) compute per-primitive boxes and feed them here.
//!
//! Backends are pluggable via a simple trait so you can swap the spatial strategy without API churn.
//!
//! # Example
//!
//! ```rust
//! use tangent_index::{Aabb, Backend, SweepAndPrune};
//!
//! let boxes = [
//!     Aabb::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]),
//!     Aabb::new([0.5, 0.5, 0.5], [2.0, 2.0, 2.0]),
//!     Aabb::new([5.0, 5.0, 5.0], [6.0, 6.0, 6.0]),
//! ];
//! let mut sap: SweepAndPrune<f64> = SweepAndPrune::default();
//! sap.build(&boxes, 0.0);
//! assert_eq!(sap.query_overlaps(), vec![(0, 1)]);
//! ```
//!
//! A backend can also be chosen at runtime:
//!
//! ```rust
//! use tangent_index::{Aabb, Backend, BackendKind};
//!
//! let mut backend = BackendKind::Bvh.instantiate();
//! let t0 = [Aabb::from_point([0.0, 0.0, 0.0]), Aabb::from_point([1.0, 0.0, 0.0])];
//! let t1 = [Aabb::from_point([2.0, 0.0, 0.0]), Aabb::from_point([1.0, 0.0, 0.0])];
//! backend.build_swept(&t0, &t1, 0.0);
//! assert_eq!(backend.query_overlaps(), vec![(0, 1)]);
//! ```
//!
//! ## Choosing a backend
//!
//! - `BruteForce`: simplest, O(n²). Good for very small sets and as a reference.
//! - `UniformGrid`: great locality when boxes are of similar size. The cell size follows the
//!   mean box size unless fixed explicitly.
//! - `Bvh`: binary hierarchy with SAH-like splits; robust to irregular distributions.
//! - `SweepAndPrune`: sorts along the widest axis; strong when motion is coherent.
//! - `ParallelSweepAndPrune` (feature `rayon`): the same sweep on the rayon thread pool.
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs for floating-point coordinates. Boxes are closed: boxes that
//! touch on a face are reported as overlapping. Debug builds assert that inflation radii
//! are non-negative.

#![no_std]

extern crate alloc;

pub mod backend;
pub mod backends;
pub mod types;

pub use backend::Backend;
#[cfg(feature = "rayon")]
pub use backends::ParallelSweepAndPrune;
pub use backends::{
    BackendKind, BruteForce, Bvh, BvhF32, BvhF64, SweepAndPrune, UniformGrid, UnknownBackend,
};
pub use types::{Aabb, Scalar};
