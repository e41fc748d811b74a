// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interface to the exact continuous collision solvers.
//!
//! Candidates slice vertex positions by topology and forward them here. The solvers
//! themselves live outside this crate; any type implementing [`NarrowPhase`] can be plugged in.

use nalgebra::RowDVector;

/// One vertex position (a row of the vertex matrix), 2 or 3 coordinates.
pub type Position = RowDVector<f64>;

/// Parameters forwarded unchanged to the narrow-phase solver.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CcdParams {
    /// Latest time of impact to report, as a fraction of the step.
    pub tmax: f64,
    /// Convergence tolerance of the root finder.
    pub tolerance: f64,
    /// Iteration cap of the root finder.
    pub max_iterations: u64,
    /// Fraction of the found time of impact to report, keeping primitives apart.
    pub conservative_rescaling: f64,
}

impl Default for CcdParams {
    fn default() -> Self {
        Self {
            tmax: 1.0,
            tolerance: 1e-6,
            max_iterations: 10_000_000,
            conservative_rescaling: 0.8,
        }
    }
}

impl CcdParams {
    /// Set the latest reported time of impact.
    #[must_use]
    pub fn with_tmax(mut self, tmax: f64) -> Self {
        self.tmax = tmax;
        self
    }

    /// Set the solver tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the solver iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the conservative rescaling factor.
    #[must_use]
    pub fn with_conservative_rescaling(mut self, conservative_rescaling: f64) -> Self {
        self.conservative_rescaling = conservative_rescaling;
        self
    }
}

/// Exact time-of-impact solvers for the three primitive pairings.
///
/// Each method receives the primitive positions at the start (`_t0`) and end (`_t1`) of
/// the step and returns `Some(toi)` if the primitives touch within `[0, params.tmax]`,
/// `None` otherwise. Solver failures are the implementor's to report; the candidate
/// types forward the outcome unchanged.
pub trait NarrowPhase {
    /// Point `p` against edge `(e0, e1)`.
    fn point_edge_ccd(
        &self,
        p_t0: &Position,
        e0_t0: &Position,
        e1_t0: &Position,
        p_t1: &Position,
        e0_t1: &Position,
        e1_t1: &Position,
        params: &CcdParams,
    ) -> Option<f64>;

    /// Edge `(ea0, ea1)` against edge `(eb0, eb1)`.
    fn edge_edge_ccd(
        &self,
        ea0_t0: &Position,
        ea1_t0: &Position,
        eb0_t0: &Position,
        eb1_t0: &Position,
        ea0_t1: &Position,
        ea1_t1: &Position,
        eb0_t1: &Position,
        eb1_t1: &Position,
        params: &CcdParams,
    ) -> Option<f64>;

    /// Point `p` against triangle `(t0, t1, t2)`.
    fn point_triangle_ccd(
        &self,
        p_t0: &Position,
        t0_t0: &Position,
        t1_t0: &Position,
        t2_t0: &Position,
        p_t1: &Position,
        t0_t1: &Position,
        t1_t1: &Position,
        t2_t1: &Position,
        params: &CcdParams,
    ) -> Option<f64>;
}
