// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend implementations for different spatial strategies.
//!
//! - `brute_force`: all pairs (small, simple, the reference).
//! - `grid`: uniform grid with automatic or fixed cell size.
//! - `bvh`: bulk-built BVH (`T: Scalar`) with SAH-like split (aliases: `BvhF32`, `BvhF64`).
//! - `sweep`: sweep-and-prune along the widest axis, optionally on the rayon pool.
//!
//! SAH note
//! --------
//! The BVH uses an SAH-like split heuristic.
//! For a split point `k` along a sorted axis we minimize:
//!
//! `cost(k) = area(LB_k) * k + area(RB_k) * (n - k)`
//!
//! where `LB_k` and `RB_k` are the bounding boxes of the first `k` and remaining `n - k` items.
//! We evaluate all `k` in O(n) per axis using prefix/suffix bounding boxes, and pick the lowest cost.
//! Accumulators are widened (`f32`→`f64`) for robust comparisons.

use alloc::boxed::Box;
use core::fmt;
use core::str::FromStr;

use crate::backend::Backend;

pub mod brute_force;
pub mod bvh;
pub mod grid;
pub mod sweep;

pub use brute_force::BruteForce;
pub use bvh::{Bvh, BvhF32, BvhF64};
pub use grid::UniformGrid;
#[cfg(feature = "rayon")]
pub use sweep::ParallelSweepAndPrune;
pub use sweep::SweepAndPrune;

/// The shipped backends, for selecting a strategy at configuration time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum BackendKind {
    /// [`BruteForce`].
    BruteForce,
    /// [`UniformGrid`] with automatic cell size.
    UniformGrid,
    /// [`Bvh`] with the default leaf size.
    Bvh,
    /// [`SweepAndPrune`] along the widest axis.
    #[default]
    SweepAndPrune,
    /// [`ParallelSweepAndPrune`].
    #[cfg(feature = "rayon")]
    ParallelSweepAndPrune,
}

impl BackendKind {
    /// Every backend compiled into this build.
    pub const ALL: &'static [Self] = &[
        Self::BruteForce,
        Self::UniformGrid,
        Self::Bvh,
        Self::SweepAndPrune,
        #[cfg(feature = "rayon")]
        Self::ParallelSweepAndPrune,
    ];

    /// Create a fresh, unbuilt backend of this kind over `f64` coordinates.
    pub fn instantiate(self) -> Box<dyn Backend<f64> + Send + Sync> {
        match self {
            Self::BruteForce => Box::new(BruteForce::<f64>::default()),
            Self::UniformGrid => Box::new(UniformGrid::<f64>::new()),
            Self::Bvh => Box::new(BvhF64::default()),
            Self::SweepAndPrune => Box::new(SweepAndPrune::<f64>::default()),
            #[cfg(feature = "rayon")]
            Self::ParallelSweepAndPrune => Box::new(ParallelSweepAndPrune::<f64>::default()),
        }
    }

    /// The name reported by the instantiated backend.
    pub const fn name(self) -> &'static str {
        match self {
            Self::BruteForce => "brute_force",
            Self::UniformGrid => "uniform_grid",
            Self::Bvh => "bvh",
            Self::SweepAndPrune => "sweep_and_prune",
            #[cfg(feature = "rayon")]
            Self::ParallelSweepAndPrune => "parallel_sweep_and_prune",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Error returned when parsing an unknown backend name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownBackend;

impl fmt::Display for UnknownBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown broad-phase backend")
    }
}

impl core::error::Error for UnknownBackend {}

impl FromStr for BackendKind {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or(UnknownBackend)
    }
}
