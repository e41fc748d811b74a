// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed collision candidates.
//!
//! Each candidate names two mesh primitives by their row in the vertex, edge, or face
//! table. Unordered pairings (vertex-vertex, edge-edge) compare equal under swap and
//! order by `(min, max)`; ordered pairings compare lexicographically in field order.

use core::cmp::Ordering;
use core::fmt::Debug;
use core::hash::{Hash, Hasher};

use nalgebra::DMatrix;

use crate::narrow_phase::{CcdParams, NarrowPhase, Position};

#[inline]
fn row(vertices: &DMatrix<f64>, i: usize) -> Position {
    vertices.row(i).into_owned()
}

/// A candidate that can be checked by a continuous narrow-phase solver.
pub trait ContinuousCandidate: Debug {
    /// Gather this candidate's positions at both time samples and run the matching solver.
    ///
    /// Returns the solver's outcome unchanged: `Some(toi)` for a collision within
    /// `[0, params.tmax]`, `None` otherwise.
    fn ccd(
        &self,
        narrow: &dyn NarrowPhase,
        vertices_t0: &DMatrix<f64>,
        vertices_t1: &DMatrix<f64>,
        edges: &[[usize; 2]],
        faces: &[[usize; 3]],
        params: &CcdParams,
    ) -> Option<f64>;
}

/// Two vertices; unordered.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexVertexCandidate {
    /// First vertex row.
    pub vertex0: usize,
    /// Second vertex row.
    pub vertex1: usize,
}

impl VertexVertexCandidate {
    /// Create a candidate; argument order does not affect identity.
    pub const fn new(vertex0: usize, vertex1: usize) -> Self {
        Self { vertex0, vertex1 }
    }

    /// Canonical `(min, max)` key used for equality, ordering and hashing.
    pub fn key(&self) -> (usize, usize) {
        (
            self.vertex0.min(self.vertex1),
            self.vertex0.max(self.vertex1),
        )
    }

    /// The vertex rows involved.
    pub const fn vertex_ids(&self) -> [usize; 2] {
        [self.vertex0, self.vertex1]
    }
}

impl PartialEq for VertexVertexCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for VertexVertexCandidate {}

impl Hash for VertexVertexCandidate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for VertexVertexCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VertexVertexCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// An edge and a vertex; ordered (edge first).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeVertexCandidate {
    /// Edge row.
    pub edge: usize,
    /// Vertex row.
    pub vertex: usize,
}

impl EdgeVertexCandidate {
    /// Create a candidate.
    pub const fn new(edge: usize, vertex: usize) -> Self {
        Self { edge, vertex }
    }

    /// Edge endpoints followed by the vertex.
    pub fn vertex_ids(&self, edges: &[[usize; 2]]) -> [usize; 3] {
        let [e0, e1] = edges[self.edge];
        [e0, e1, self.vertex]
    }
}

impl ContinuousCandidate for EdgeVertexCandidate {
    fn ccd(
        &self,
        narrow: &dyn NarrowPhase,
        vertices_t0: &DMatrix<f64>,
        vertices_t1: &DMatrix<f64>,
        edges: &[[usize; 2]],
        _faces: &[[usize; 3]],
        params: &CcdParams,
    ) -> Option<f64> {
        let [e0, e1] = edges[self.edge];
        narrow.point_edge_ccd(
            &row(vertices_t0, self.vertex),
            &row(vertices_t0, e0),
            &row(vertices_t0, e1),
            &row(vertices_t1, self.vertex),
            &row(vertices_t1, e0),
            &row(vertices_t1, e1),
            params,
        )
    }
}

/// Two edges; unordered.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeEdgeCandidate {
    /// First edge row.
    pub edge0: usize,
    /// Second edge row.
    pub edge1: usize,
}

impl EdgeEdgeCandidate {
    /// Create a candidate; argument order does not affect identity.
    pub const fn new(edge0: usize, edge1: usize) -> Self {
        Self { edge0, edge1 }
    }

    /// Canonical `(min, max)` key used for equality, ordering and hashing.
    pub fn key(&self) -> (usize, usize) {
        (self.edge0.min(self.edge1), self.edge0.max(self.edge1))
    }

    /// Endpoints of the first edge followed by those of the second.
    pub fn vertex_ids(&self, edges: &[[usize; 2]]) -> [usize; 4] {
        let [a0, a1] = edges[self.edge0];
        let [b0, b1] = edges[self.edge1];
        [a0, a1, b0, b1]
    }
}

impl PartialEq for EdgeEdgeCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for EdgeEdgeCandidate {}

impl Hash for EdgeEdgeCandidate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for EdgeEdgeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EdgeEdgeCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl ContinuousCandidate for EdgeEdgeCandidate {
    fn ccd(
        &self,
        narrow: &dyn NarrowPhase,
        vertices_t0: &DMatrix<f64>,
        vertices_t1: &DMatrix<f64>,
        edges: &[[usize; 2]],
        _faces: &[[usize; 3]],
        params: &CcdParams,
    ) -> Option<f64> {
        let [a0, a1, b0, b1] = self.vertex_ids(edges);
        narrow.edge_edge_ccd(
            &row(vertices_t0, a0),
            &row(vertices_t0, a1),
            &row(vertices_t0, b0),
            &row(vertices_t0, b1),
            &row(vertices_t1, a0),
            &row(vertices_t1, a1),
            &row(vertices_t1, b0),
            &row(vertices_t1, b1),
            params,
        )
    }
}

/// A face and a vertex; ordered (face first).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceVertexCandidate {
    /// Face row.
    pub face: usize,
    /// Vertex row.
    pub vertex: usize,
}

impl FaceVertexCandidate {
    /// Create a candidate.
    pub const fn new(face: usize, vertex: usize) -> Self {
        Self { face, vertex }
    }

    /// Face corners followed by the vertex.
    pub fn vertex_ids(&self, faces: &[[usize; 3]]) -> [usize; 4] {
        let [f0, f1, f2] = faces[self.face];
        [f0, f1, f2, self.vertex]
    }
}

impl ContinuousCandidate for FaceVertexCandidate {
    fn ccd(
        &self,
        narrow: &dyn NarrowPhase,
        vertices_t0: &DMatrix<f64>,
        vertices_t1: &DMatrix<f64>,
        _edges: &[[usize; 2]],
        faces: &[[usize; 3]],
        params: &CcdParams,
    ) -> Option<f64> {
        let [f0, f1, f2] = faces[self.face];
        narrow.point_triangle_ccd(
            &row(vertices_t0, self.vertex),
            &row(vertices_t0, f0),
            &row(vertices_t0, f1),
            &row(vertices_t0, f2),
            &row(vertices_t1, self.vertex),
            &row(vertices_t1, f0),
            &row(vertices_t1, f1),
            &row(vertices_t1, f2),
            params,
        )
    }
}

/// An edge and a face; ordered (edge first). Used for intersection tests, not CCD.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeFaceCandidate {
    /// Edge row.
    pub edge: usize,
    /// Face row.
    pub face: usize,
}

impl EdgeFaceCandidate {
    /// Create a candidate.
    pub const fn new(edge: usize, face: usize) -> Self {
        Self { edge, face }
    }

    /// Edge endpoints followed by the face corners.
    pub fn vertex_ids(&self, edges: &[[usize; 2]], faces: &[[usize; 3]]) -> [usize; 5] {
        let [e0, e1] = edges[self.edge];
        let [f0, f1, f2] = faces[self.face];
        [e0, e1, f0, f1, f2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;

    /// Records the positions it is handed and answers with a fixed outcome.
    struct Recorder {
        calls: RefCell<Vec<(&'static str, Vec<Position>)>>,
        answer: Option<f64>,
    }

    impl Recorder {
        fn new(answer: Option<f64>) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                answer,
            }
        }

        /// First coordinate of every position in the single recorded call.
        fn xs(&self) -> (&'static str, Vec<f64>) {
            let calls = self.calls.borrow();
            assert_eq!(calls.len(), 1);
            let (name, ps) = &calls[0];
            (*name, ps.iter().map(|p| p[0]).collect())
        }
    }

    impl NarrowPhase for Recorder {
        fn point_edge_ccd(
            &self,
            p_t0: &Position,
            e0_t0: &Position,
            e1_t0: &Position,
            p_t1: &Position,
            e0_t1: &Position,
            e1_t1: &Position,
            _params: &CcdParams,
        ) -> Option<f64> {
            let ps = [p_t0, e0_t0, e1_t0, p_t1, e0_t1, e1_t1];
            self.calls
                .borrow_mut()
                .push(("point_edge", ps.into_iter().cloned().collect()));
            self.answer
        }

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
            _params: &CcdParams,
        ) -> Option<f64> {
            let ps = [
                ea0_t0, ea1_t0, eb0_t0, eb1_t0, ea0_t1, ea1_t1, eb0_t1, eb1_t1,
            ];
            self.calls
                .borrow_mut()
                .push(("edge_edge", ps.into_iter().cloned().collect()));
            self.answer
        }

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
        ) -> Option<f64> {
            assert_eq!(params.tmax, 0.5, "params must be forwarded untouched");
            let ps = [p_t0, t0_t0, t1_t0, t2_t0, p_t1, t0_t1, t1_t1, t2_t1];
            self.calls
                .borrow_mut()
                .push(("point_triangle", ps.into_iter().cloned().collect()));
            self.answer
        }
    }

    /// Vertex `i` sits at x = i at t0 and x = 10 + i at t1.
    fn tables() -> (DMatrix<f64>, DMatrix<f64>) {
        let v0 = DMatrix::from_fn(6, 3, |r, c| if c == 0 { r as f64 } else { 0.0 });
        let v1 = DMatrix::from_fn(6, 3, |r, c| if c == 0 { 10.0 + r as f64 } else { 0.0 });
        (v0, v1)
    }

    const EDGES: [[usize; 2]; 3] = [[0, 1], [2, 3], [4, 5]];
    const FACES: [[usize; 3]; 2] = [[0, 1, 2], [3, 4, 5]];

    #[test]
    fn vertex_vertex_is_symmetric() {
        let a = VertexVertexCandidate::new(3, 7);
        let b = VertexVertexCandidate::new(7, 3);
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn edge_edge_is_symmetric() {
        let a = EdgeEdgeCandidate::new(1, 4);
        let b = EdgeEdgeCandidate::new(4, 1);
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
        assert!(EdgeEdgeCandidate::new(4, 1) < EdgeEdgeCandidate::new(2, 5));
        assert!(EdgeEdgeCandidate::new(3, 0) < EdgeEdgeCandidate::new(1, 2));
        // Ordered by (min, max), not by the stored fields.
        assert!(EdgeEdgeCandidate::new(4, 1) < EdgeEdgeCandidate::new(2, 3));
        assert!(VertexVertexCandidate::new(9, 0) < VertexVertexCandidate::new(1, 2));
    }

    #[test]
    fn ordered_variants_compare_lexicographically() {
        assert_ne!(EdgeVertexCandidate::new(1, 2), EdgeVertexCandidate::new(2, 1));
        assert!(EdgeVertexCandidate::new(1, 9) < EdgeVertexCandidate::new(2, 0));
        assert!(FaceVertexCandidate::new(0, 5) < FaceVertexCandidate::new(0, 6));
        assert!(EdgeFaceCandidate::new(3, 0) > EdgeFaceCandidate::new(2, 7));
    }

    #[test]
    fn edge_vertex_forwards_point_then_edge() {
        let (v0, v1) = tables();
        let r = Recorder::new(Some(0.25));
        let toi = EdgeVertexCandidate::new(1, 5).ccd(
            &r,
            &v0,
            &v1,
            &EDGES,
            &FACES,
            &CcdParams::default(),
        );
        assert_eq!(toi, Some(0.25));
        assert_eq!(
            r.xs(),
            ("point_edge", vec![5.0, 2.0, 3.0, 15.0, 12.0, 13.0])
        );
    }

    #[test]
    fn edge_edge_forwards_both_edges_per_sample() {
        let (v0, v1) = tables();
        let r = Recorder::new(None);
        let toi = EdgeEdgeCandidate::new(2, 0).ccd(
            &r,
            &v0,
            &v1,
            &EDGES,
            &FACES,
            &CcdParams::default(),
        );
        assert_eq!(toi, None);
        assert_eq!(
            r.xs(),
            (
                "edge_edge",
                vec![4.0, 5.0, 0.0, 1.0, 14.0, 15.0, 10.0, 11.0]
            )
        );
    }

    #[test]
    fn face_vertex_forwards_point_then_triangle() {
        let (v0, v1) = tables();
        let r = Recorder::new(Some(1.0));
        let params = CcdParams::default().with_tmax(0.5);
        let toi = FaceVertexCandidate::new(1, 0).ccd(&r, &v0, &v1, &EDGES, &FACES, &params);
        assert_eq!(toi, Some(1.0));
        assert_eq!(
            r.xs(),
            (
                "point_triangle",
                vec![0.0, 3.0, 4.0, 5.0, 10.0, 13.0, 14.0, 15.0]
            )
        );
    }

    #[test]
    fn vertex_ids_follow_topology() {
        assert_eq!(EdgeVertexCandidate::new(2, 1).vertex_ids(&EDGES), [4, 5, 1]);
        assert_eq!(EdgeEdgeCandidate::new(0, 1).vertex_ids(&EDGES), [0, 1, 2, 3]);
        assert_eq!(FaceVertexCandidate::new(0, 4).vertex_ids(&FACES), [0, 1, 2, 4]);
        assert_eq!(
            EdgeFaceCandidate::new(1, 1).vertex_ids(&EDGES, &FACES),
            [2, 3, 3, 4, 5]
        );
    }
}
