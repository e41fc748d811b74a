// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Broad-phase configuration.

use tangent_index::BackendKind;

use crate::broad_phase::{BroadPhase, CandidateKinds};
use crate::candidates::Candidates;
use crate::error::CandidateResult;
use crate::mesh::CollisionMesh;

/// Settings for a detection pass.
///
/// # Example
///
/// ```
/// use tangent_candidates::{BroadPhaseConfig, CandidateKinds};
/// use tangent_index::BackendKind;
///
/// let config = BroadPhaseConfig::default()
///     .with_backend(BackendKind::Bvh)
///     .with_inflation_radius(1e-3)
///     .with_kinds(CandidateKinds::all());
/// assert_eq!(config.backend, BackendKind::Bvh);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BroadPhaseConfig {
    /// Overlap backend to instantiate.
    pub backend: BackendKind,
    /// Padding added to every box; must be non-negative.
    pub inflation_radius: f64,
    /// Candidate kinds to produce; `None` picks them from the mesh dimension.
    pub kinds: Option<CandidateKinds>,
}

impl Default for BroadPhaseConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            inflation_radius: 0.0,
            kinds: None,
        }
    }
}

impl BroadPhaseConfig {
    /// Set the backend.
    #[must_use]
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Set the inflation radius.
    #[must_use]
    pub fn with_inflation_radius(mut self, inflation_radius: f64) -> Self {
        self.inflation_radius = inflation_radius;
        self
    }

    /// Produce exactly `kinds` instead of the dimension default.
    #[must_use]
    pub fn with_kinds(mut self, kinds: CandidateKinds) -> Self {
        self.kinds = Some(kinds);
        self
    }

    /// Run one detection pass over `mesh` with these settings.
    pub fn detect(&self, mesh: &CollisionMesh) -> CandidateResult<Candidates> {
        let mut broad_phase = BroadPhase::from_config(self);
        broad_phase.build(mesh, self.inflation_radius)?;
        let mut candidates = Candidates::new();
        broad_phase.detect_collision_candidates(&mut candidates);
        Ok(candidates)
    }
}
