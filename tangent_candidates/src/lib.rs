// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tangent Candidates: typed collision candidates for continuous collision detection.
//!
//! Given a mesh's vertex positions at the start and end of a simulation step, this crate
//! finds every pair of primitives that *might* collide during the step, so an exact
//! narrow-phase solver only has to look at those.
//!
//! - [`CollisionMesh`] validates positions and edge/face topology.
//! - [`BroadPhase`] boxes every vertex, edge and face, asks a [`tangent_index::Backend`]
//!   for overlapping boxes, and turns each overlap into a typed candidate.
//! - [`Candidates`] holds the result grouped by kind, with a flat index across kinds.
//! - [`ContinuousCandidate::ccd`] forwards a candidate's positions to a [`NarrowPhase`]
//!   solver that you provide.
//!
//! # Example
//!
//! A vertex falling through a triangle:
//!
//! ```rust
//! use nalgebra::DMatrix;
//! use tangent_candidates::{BroadPhase, Candidates, CollisionMesh, FaceVertexCandidate};
//! use tangent_index::SweepAndPrune;
//!
//! let t0 = DMatrix::from_row_slice(4, 3, &[
//!     0.0, 0.0, 0.0,
//!     1.0, 0.0, 0.0,
//!     0.0, 1.0, 0.0,
//!     0.25, 0.25, 1.0,
//! ]);
//! let mut t1 = t0.clone();
//! t1[(3, 2)] = -1.0;
//! let mesh = CollisionMesh::new_swept(t0, t1, vec![], vec![[0, 1, 2]])?;
//!
//! let mut broad_phase = BroadPhase::new(SweepAndPrune::<f64>::default());
//! broad_phase.build(&mesh, 0.0)?;
//! let mut candidates = Candidates::new();
//! broad_phase.detect_collision_candidates(&mut candidates);
//!
//! assert_eq!(candidates.fv, vec![FaceVertexCandidate::new(0, 3)]);
//! assert_eq!(candidates.len(), 1);
//! # Ok::<(), tangent_candidates::CandidateError>(())
//! ```
//!
//! ## Which pairs are kept
//!
//! Pairs of primitives that share a vertex are never reported: an edge against its own
//! endpoint, two edges meeting at a corner, a face against one of its corners, or an edge
//! touching a face at a vertex. A vertex filter installed with
//! [`BroadPhase::with_vertex_filter`] drops a pair unless at least one vertex of the first
//! primitive may collide with one vertex of the second.
//!
//! ## Logging
//!
//! Builds and detection passes emit `tracing` events at `debug` level with box and
//! candidate counts; install a subscriber to see them.

pub mod broad_phase;
pub mod candidate;
pub mod candidates;
pub mod config;
pub mod error;
pub mod export;
pub mod mapper;
pub mod mesh;
pub mod narrow_phase;

pub use broad_phase::{BroadPhase, CandidateKinds, VertexFilter, detect_collision_candidates};
pub use candidate::{
    ContinuousCandidate, EdgeEdgeCandidate, EdgeFaceCandidate, EdgeVertexCandidate,
    FaceVertexCandidate, VertexVertexCandidate,
};
pub use candidates::{CandidateMut, CandidateRef, Candidates};
pub use config::BroadPhaseConfig;
pub use error::{CandidateError, CandidateResult};
pub use mapper::{Dimension, Entity, EntityMapper};
pub use mesh::CollisionMesh;
pub use narrow_phase::{CcdParams, NarrowPhase, Position};
