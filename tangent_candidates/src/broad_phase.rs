// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mesh broad phase: boxes in, typed candidates out.
//!
//! [`BroadPhase`] owns an overlap backend and a copy of the mesh topology. Building it
//! computes one box per vertex, edge and face and hands them to the backend; detection
//! classifies each reported box pair through the [`EntityMapper`] and keeps the pairs
//! that can physically collide.

use core::fmt;

use bitflags::bitflags;
use tangent_index::{Backend, BackendKind};
use tracing::{debug, trace};

use crate::candidate::{
    EdgeEdgeCandidate, EdgeFaceCandidate, EdgeVertexCandidate, FaceVertexCandidate,
    VertexVertexCandidate,
};
use crate::candidates::Candidates;
use crate::config::BroadPhaseConfig;
use crate::error::{CandidateError, CandidateResult};
use crate::mapper::{Dimension, Entity, EntityMapper};
use crate::mesh::CollisionMesh;

bitflags! {
    /// Which candidate kinds a detection pass should produce.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CandidateKinds: u8 {
        /// Edge against vertex.
        const EDGE_VERTEX   = 0b0000_0001;
        /// Edge against edge.
        const EDGE_EDGE     = 0b0000_0010;
        /// Face against vertex.
        const FACE_VERTEX   = 0b0000_0100;
        /// Edge against face.
        const EDGE_FACE     = 0b0000_1000;
        /// Vertex against vertex.
        const VERTEX_VERTEX = 0b0001_0000;
    }
}

impl CandidateKinds {
    /// The kinds needed for continuous collision detection in `dimension`.
    ///
    /// Planar meshes need edge-vertex; 3D meshes need edge-edge and face-vertex.
    pub const fn for_dimension(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Two => Self::EDGE_VERTEX,
            Dimension::Three => Self::EDGE_EDGE.union(Self::FACE_VERTEX),
        }
    }
}

/// Predicate deciding whether two vertices may collide at all.
pub type VertexFilter = Box<dyn Fn(usize, usize) -> bool + Send + Sync>;

/// Broad phase over a mesh, generic over the overlap backend.
///
/// Use a concrete backend type, or `Box<dyn Backend<f64> + Send + Sync>` from
/// [`BackendKind::instantiate`] to pick one at run time.
pub struct BroadPhase<B> {
    backend: B,
    mapper: Option<EntityMapper>,
    edges: Vec<[usize; 2]>,
    faces: Vec<[usize; 3]>,
    kinds: Option<CandidateKinds>,
    vertex_filter: Option<VertexFilter>,
}

impl<B: Backend<f64>> fmt::Debug for BroadPhase<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BroadPhase")
            .field("backend", &self.backend.name())
            .field("mapper", &self.mapper)
            .field("edges", &self.edges.len())
            .field("faces", &self.faces.len())
            .field("kinds", &self.kinds)
            .field("vertex_filter", &self.vertex_filter.is_some())
            .finish()
    }
}

impl BroadPhase<Box<dyn Backend<f64> + Send + Sync>> {
    /// A broad phase with the backend and candidate kinds named by `config`.
    pub fn from_config(config: &BroadPhaseConfig) -> Self {
        let mut broad_phase = Self::new(config.backend.instantiate());
        broad_phase.kinds = config.kinds;
        broad_phase
    }

    /// A broad phase over a fresh backend of the given kind.
    pub fn with_backend_kind(kind: BackendKind) -> Self {
        Self::new(kind.instantiate())
    }
}

impl<B: Backend<f64>> BroadPhase<B> {
    /// Wrap `backend`. The backend is cleared on the next [`build`](Self::build).
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            mapper: None,
            edges: Vec::new(),
            faces: Vec::new(),
            kinds: None,
            vertex_filter: None,
        }
    }

    /// Only keep candidates with at least one cross vertex pair accepted by `filter`.
    ///
    /// A cross vertex pair takes one vertex from each primitive of the candidate.
    #[must_use]
    pub fn with_vertex_filter(
        mut self,
        filter: impl Fn(usize, usize) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.vertex_filter = Some(Box::new(filter));
        self
    }

    /// Override the kinds produced by [`detect_collision_candidates`](Self::detect_collision_candidates).
    #[must_use]
    pub fn with_kinds(mut self, kinds: CandidateKinds) -> Self {
        self.kinds = Some(kinds);
        self
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Flat index layout of the current build, if any.
    pub fn mapper(&self) -> Option<EntityMapper> {
        self.mapper
    }

    /// Whether detection may run.
    pub fn is_built(&self) -> bool {
        self.mapper.is_some()
    }

    /// Index `mesh`, padding every box by `inflation_radius`.
    ///
    /// Swept meshes index the box covering each primitive at both time samples.
    /// Rebuilding discards the previous mesh, even when the new build is rejected.
    pub fn build(&mut self, mesh: &CollisionMesh, inflation_radius: f64) -> CandidateResult<()> {
        self.clear();
        if !(inflation_radius >= 0.0 && inflation_radius.is_finite()) {
            return Err(CandidateError::InvalidInflation(inflation_radius));
        }

        let boxes_t0 = mesh.boxes(mesh.vertices_t0());
        if mesh.is_swept() {
            let boxes_t1 = mesh.boxes(mesh.vertices_t1());
            self.backend.build_swept(&boxes_t0, &boxes_t1, inflation_radius);
        } else {
            self.backend.build(&boxes_t0, inflation_radius);
        }

        let mapper = mesh.mapper();
        self.edges.extend_from_slice(mesh.edges());
        self.faces.extend_from_slice(mesh.faces());
        self.mapper = Some(mapper);
        debug!(
            backend = self.backend.name(),
            boxes = mapper.total(),
            vertices = mapper.num_vertices(),
            edges = mapper.num_edges(),
            faces = mapper.num_faces(),
            swept = mesh.is_swept(),
            inflation = inflation_radius,
            "built broad phase"
        );
        Ok(())
    }

    /// Release the backend state and the copied topology.
    pub fn clear(&mut self) {
        self.backend.clear();
        self.mapper = None;
        self.edges.clear();
        self.faces.clear();
    }

    /// Append edge-vertex candidates to `out`.
    ///
    /// # Panics
    ///
    /// Panics if the broad phase has not been built.
    pub fn detect_edge_vertex_candidates(&self, out: &mut Vec<EdgeVertexCandidate>) {
        let mut found = Candidates::new();
        self.collect(CandidateKinds::EDGE_VERTEX, &mut found);
        out.append(&mut found.ev);
    }

    /// Append edge-edge candidates to `out`.
    ///
    /// # Panics
    ///
    /// Panics if the broad phase has not been built.
    pub fn detect_edge_edge_candidates(&self, out: &mut Vec<EdgeEdgeCandidate>) {
        let mut found = Candidates::new();
        self.collect(CandidateKinds::EDGE_EDGE, &mut found);
        out.append(&mut found.ee);
    }

    /// Append face-vertex candidates to `out`.
    ///
    /// # Panics
    ///
    /// Panics if the broad phase has not been built.
    pub fn detect_face_vertex_candidates(&self, out: &mut Vec<FaceVertexCandidate>) {
        let mut found = Candidates::new();
        self.collect(CandidateKinds::FACE_VERTEX, &mut found);
        out.append(&mut found.fv);
    }

    /// Append edge-face candidates to `out`.
    ///
    /// # Panics
    ///
    /// Panics if the broad phase has not been built.
    pub fn detect_edge_face_candidates(&self, out: &mut Vec<EdgeFaceCandidate>) {
        let mut found = Candidates::new();
        self.collect(CandidateKinds::EDGE_FACE, &mut found);
        out.append(&mut found.ef);
    }

    /// Append vertex-vertex candidates to `out`.
    ///
    /// # Panics
    ///
    /// Panics if the broad phase has not been built.
    pub fn detect_vertex_vertex_candidates(&self, out: &mut Vec<VertexVertexCandidate>) {
        let mut found = Candidates::new();
        self.collect(CandidateKinds::VERTEX_VERTEX, &mut found);
        out.append(&mut found.vv);
    }

    /// Replace the contents of `out` with candidates of every kind in `kinds`.
    ///
    /// The backend is queried once regardless of how many kinds are requested.
    ///
    /// # Panics
    ///
    /// Panics if the broad phase has not been built.
    pub fn detect_candidates(&self, kinds: CandidateKinds, out: &mut Candidates) {
        out.clear();
        self.collect(kinds, out);
    }

    /// Replace the contents of `out` with the candidates continuous collision detection needs.
    ///
    /// Uses the kinds set with [`with_kinds`](Self::with_kinds), or
    /// [`CandidateKinds::for_dimension`] of the built mesh.
    ///
    /// # Panics
    ///
    /// Panics if the broad phase has not been built.
    pub fn detect_collision_candidates(&self, out: &mut Candidates) {
        let mapper = self.built_mapper();
        let kinds = self
            .kinds
            .unwrap_or_else(|| CandidateKinds::for_dimension(mapper.dimension()));
        self.detect_candidates(kinds, out);
    }

    #[track_caller]
    fn built_mapper(&self) -> EntityMapper {
        match self.mapper {
            Some(mapper) => mapper,
            None => panic!("broad phase queried before build"),
        }
    }

    fn collect(&self, kinds: CandidateKinds, out: &mut Candidates) {
        let mapper = self.built_mapper();
        let pairs = self.backend.query_overlaps();
        let before = out.len();
        let mut dropped = 0_usize;

        for &(i, j) in &pairs {
            let kept = match (mapper.classify(i), mapper.classify(j)) {
                (Some(Entity::Vertex(a)), Some(Entity::Vertex(b)))
                    if kinds.contains(CandidateKinds::VERTEX_VERTEX) =>
                {
                    self.vertex_vertex(a, b).map(|c| out.vv.push(c))
                }
                (Some(Entity::Edge(e)), Some(Entity::Vertex(v)))
                | (Some(Entity::Vertex(v)), Some(Entity::Edge(e)))
                    if kinds.contains(CandidateKinds::EDGE_VERTEX) =>
                {
                    self.edge_vertex(e, v).map(|c| out.ev.push(c))
                }
                (Some(Entity::Edge(a)), Some(Entity::Edge(b)))
                    if kinds.contains(CandidateKinds::EDGE_EDGE) =>
                {
                    self.edge_edge(a, b).map(|c| out.ee.push(c))
                }
                (Some(Entity::Face(f)), Some(Entity::Vertex(v)))
                | (Some(Entity::Vertex(v)), Some(Entity::Face(f)))
                    if kinds.contains(CandidateKinds::FACE_VERTEX) =>
                {
                    self.face_vertex(f, v).map(|c| out.fv.push(c))
                }
                (Some(Entity::Edge(e)), Some(Entity::Face(f)))
                | (Some(Entity::Face(f)), Some(Entity::Edge(e)))
                    if kinds.contains(CandidateKinds::EDGE_FACE) =>
                {
                    self.edge_face(e, f).map(|c| out.ef.push(c))
                }
                _ => None,
            };
            if kept.is_none() {
                dropped += 1;
            }
        }

        trace!(dropped, "discarded overlaps without a requested candidate");
        debug!(
            ?kinds,
            overlaps = pairs.len(),
            candidates = out.len() - before,
            ev = out.ev.len(),
            ee = out.ee.len(),
            fv = out.fv.len(),
            ef = out.ef.len(),
            vv = out.vv.len(),
            "detected candidates"
        );
    }

    /// True if any vertex of `lhs` may collide with any vertex of `rhs`.
    fn can_collide(&self, lhs: &[usize], rhs: &[usize]) -> bool {
        match &self.vertex_filter {
            None => true,
            Some(filter) => lhs.iter().any(|&a| rhs.iter().any(|&b| filter(a, b))),
        }
    }

    fn vertex_vertex(&self, a: usize, b: usize) -> Option<VertexVertexCandidate> {
        (a != b && self.can_collide(&[a], &[b])).then_some(VertexVertexCandidate::new(a, b))
    }

    fn edge_vertex(&self, e: usize, v: usize) -> Option<EdgeVertexCandidate> {
        let edge = self.edges[e];
        (!edge.contains(&v) && self.can_collide(&edge, &[v]))
            .then_some(EdgeVertexCandidate::new(e, v))
    }

    fn edge_edge(&self, a: usize, b: usize) -> Option<EdgeEdgeCandidate> {
        let (ea, eb) = (self.edges[a], self.edges[b]);
        let adjacent = ea.iter().any(|v| eb.contains(v));
        (!adjacent && self.can_collide(&ea, &eb)).then_some(EdgeEdgeCandidate::new(a, b))
    }

    fn face_vertex(&self, f: usize, v: usize) -> Option<FaceVertexCandidate> {
        let face = self.faces[f];
        (!face.contains(&v) && self.can_collide(&face, &[v]))
            .then_some(FaceVertexCandidate::new(f, v))
    }

    fn edge_face(&self, e: usize, f: usize) -> Option<EdgeFaceCandidate> {
        let (edge, face) = (self.edges[e], self.faces[f]);
        let adjacent = edge.iter().any(|v| face.contains(v));
        (!adjacent && self.can_collide(&edge, &face)).then_some(EdgeFaceCandidate::new(e, f))
    }
}

/// One-shot continuous collision candidate detection.
///
/// Builds `backend` over `mesh`, collects the kinds [`CandidateKinds::for_dimension`]
/// names for the mesh, and returns them.
pub fn detect_collision_candidates<B: Backend<f64>>(
    backend: B,
    mesh: &CollisionMesh,
    inflation_radius: f64,
) -> CandidateResult<Candidates> {
    let mut broad_phase = BroadPhase::new(backend);
    broad_phase.build(mesh, inflation_radius)?;
    let mut candidates = Candidates::new();
    broad_phase.detect_collision_candidates(&mut candidates);
    Ok(candidates)
}
