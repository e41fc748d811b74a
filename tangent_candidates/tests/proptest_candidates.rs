// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based tests for candidate identity, the candidate set, the mapper and the
//! broad phase.
//!
//! Run with: cargo test -p tangent_candidates -- proptest

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use nalgebra::DMatrix;
use proptest::prelude::*;
use tangent_candidates::{
    BroadPhase, CandidateKinds, CandidateRef, Candidates, CollisionMesh, Dimension,
    EdgeEdgeCandidate, EdgeFaceCandidate, EdgeVertexCandidate, EntityMapper,
    FaceVertexCandidate, VertexVertexCandidate,
};
use tangent_index::{BackendKind, BruteForce};

// =============================================================================
// Strategies
// =============================================================================

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut h = DefaultHasher::new();
    value.hash(&mut h);
    h.finish()
}

/// A valid 3D mesh with random positions at two time samples and random topology.
fn arb_mesh() -> impl Strategy<Value = CollisionMesh> {
    (2_usize..16).prop_flat_map(|n| {
        (
            prop::collection::vec(prop::array::uniform3(-2.0..2.0f64), n),
            prop::collection::vec(prop::array::uniform3(-0.5..0.5f64), n),
            prop::collection::vec(prop::array::uniform2(0..n), 0..12),
            prop::collection::vec(prop::array::uniform3(0..n), 0..8),
        )
            .prop_map(|(points, motion, edges, faces)| {
                let t0 = DMatrix::from_fn(points.len(), 3, |r, c| points[r][c]);
                let t1 = DMatrix::from_fn(points.len(), 3, |r, c| points[r][c] + motion[r][c]);
                CollisionMesh::new_swept(t0, t1, edges, faces).unwrap()
            })
    })
}

fn arb_candidates() -> impl Strategy<Value = Candidates> {
    let pair = || (0_usize..50, 0_usize..50);
    (
        prop::collection::vec(pair(), 0..5),
        prop::collection::vec(pair(), 0..5),
        prop::collection::vec(pair(), 0..5),
        prop::collection::vec(pair(), 0..5),
        prop::collection::vec(pair(), 0..5),
    )
        .prop_map(|(ev, ee, fv, ef, vv)| Candidates {
            ev: ev.into_iter().map(|(a, b)| EdgeVertexCandidate::new(a, b)).collect(),
            ee: ee.into_iter().map(|(a, b)| EdgeEdgeCandidate::new(a, b)).collect(),
            fv: fv.into_iter().map(|(a, b)| FaceVertexCandidate::new(a, b)).collect(),
            ef: ef.into_iter().map(|(a, b)| EdgeFaceCandidate::new(a, b)).collect(),
            vv: vv.into_iter().map(|(a, b)| VertexVertexCandidate::new(a, b)).collect(),
        })
}

// =============================================================================
// Candidate identity
// =============================================================================

proptest! {
    #[test]
    fn proptest_unordered_pairs_ignore_swap(a in 0_usize..1000, b in 0_usize..1000) {
        let (ee, ee_swapped) = (EdgeEdgeCandidate::new(a, b), EdgeEdgeCandidate::new(b, a));
        prop_assert_eq!(ee, ee_swapped);
        prop_assert_eq!(hash_of(&ee), hash_of(&ee_swapped));
        prop_assert_eq!(ee.cmp(&ee_swapped), Ordering::Equal);

        let (vv, vv_swapped) = (VertexVertexCandidate::new(a, b), VertexVertexCandidate::new(b, a));
        prop_assert_eq!(vv, vv_swapped);
        prop_assert_eq!(hash_of(&vv), hash_of(&vv_swapped));
    }

    #[test]
    fn proptest_order_agrees_with_equality(
        a in 0_usize..20, b in 0_usize..20, c in 0_usize..20, d in 0_usize..20,
    ) {
        let (x, y) = (EdgeEdgeCandidate::new(a, b), EdgeEdgeCandidate::new(c, d));
        prop_assert_eq!(x == y, x.cmp(&y) == Ordering::Equal);
        prop_assert_eq!(x.cmp(&y), x.key().cmp(&y.key()));
        prop_assert_eq!(x.cmp(&y), y.cmp(&x).reverse());

        let (x, y) = (EdgeVertexCandidate::new(a, b), EdgeVertexCandidate::new(c, d));
        prop_assert_eq!(x == y, x.cmp(&y) == Ordering::Equal);
        prop_assert_eq!(x.cmp(&y), (a, b).cmp(&(c, d)));
    }
}

// =============================================================================
// Candidate set
// =============================================================================

proptest! {
    #[test]
    fn proptest_flat_index_visits_every_candidate_once(c in arb_candidates()) {
        let len = c.len();
        prop_assert_eq!(len, c.ev.len() + c.ee.len() + c.fv.len() + c.ef.len() + c.vv.len());
        prop_assert_eq!(c.is_empty(), len == 0);
        prop_assert_eq!(c.iter().count(), len);

        let mut counts = [0_usize; 5];
        for i in 0..len {
            let slot = match c.at(i).unwrap() {
                CandidateRef::EdgeVertex(_) => 0,
                CandidateRef::EdgeEdge(_) => 1,
                CandidateRef::FaceVertex(_) => 2,
                CandidateRef::EdgeFace(_) => 3,
                CandidateRef::VertexVertex(_) => 4,
            };
            // Kinds appear in a fixed precedence order.
            prop_assert!(counts[slot + 1..].iter().all(|&n| n == 0));
            counts[slot] += 1;
        }
        prop_assert_eq!(counts, [c.ev.len(), c.ee.len(), c.fv.len(), c.ef.len(), c.vv.len()]);
        prop_assert!(c.at(len).is_err());
    }

    #[test]
    fn proptest_sort_and_dedup_is_idempotent(c in arb_candidates()) {
        let mut once = c.clone();
        once.sort_and_dedup();
        prop_assert!(once.len() <= c.len());
        prop_assert!(once.ee.windows(2).all(|w| w[0] < w[1]));
        let mut twice = once.clone();
        twice.sort_and_dedup();
        prop_assert_eq!(once, twice);
    }
}

// =============================================================================
// Mapper
// =============================================================================

proptest! {
    #[test]
    fn proptest_mapper_partitions_the_flat_space(
        v in 0_usize..30, e in 0_usize..30, f in 0_usize..30, three in any::<bool>(),
    ) {
        let dimension = if three { Dimension::Three } else { Dimension::Two };
        let m = EntityMapper::new(v, e, f, dimension);
        prop_assert_eq!(m.total(), v + e + if three { f } else { 0 });
        for id in 0..m.total() {
            let hits = [m.is_vertex(id), m.is_edge(id), m.is_face(id)];
            prop_assert_eq!(hits.iter().filter(|h| **h).count(), 1);
            prop_assert!(m.classify(id).is_some());
        }
        for k in 0..m.num_edges() {
            prop_assert!(m.is_edge(v + k));
            prop_assert_eq!(m.to_edge_id(v + k), k);
            prop_assert_eq!(m.edge_to_id(k), v + k);
        }
        for k in 0..m.num_faces() {
            prop_assert!(m.is_face(v + e + k));
            prop_assert_eq!(m.to_face_id(v + e + k), k);
            prop_assert_eq!(m.face_to_id(k), v + e + k);
        }
        prop_assert!(m.classify(m.total()).is_none());
        prop_assert!(!m.is_face(m.total()));
    }
}

// =============================================================================
// Backends and broad phase
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn proptest_candidates_do_not_depend_on_backend(
        mesh in arb_mesh(),
        inflation in 0.0..0.2f64,
    ) {
        let mut reference = BroadPhase::new(BruteForce::<f64>::default());
        reference.build(&mesh, inflation).unwrap();
        let mut expected = Candidates::new();
        reference.detect_candidates(CandidateKinds::all(), &mut expected);

        for &kind in BackendKind::ALL {
            let mut bp = BroadPhase::with_backend_kind(kind);
            bp.build(&mesh, inflation).unwrap();
            let mut out = Candidates::new();
            bp.detect_candidates(CandidateKinds::all(), &mut out);
            prop_assert_eq!(&out, &expected, "{}", kind);
        }
    }

    #[test]
    fn proptest_candidates_never_share_a_vertex(mesh in arb_mesh()) {
        let mut bp = BroadPhase::with_backend_kind(BackendKind::SweepAndPrune);
        bp.build(&mesh, 0.1).unwrap();
        let mut out = Candidates::new();
        bp.detect_candidates(CandidateKinds::all(), &mut out);

        let (edges, faces) = (mesh.edges(), mesh.faces());
        for c in &out.ev {
            prop_assert!(!edges[c.edge].contains(&c.vertex));
        }
        for c in &out.ee {
            let [a0, a1, b0, b1] = c.vertex_ids(edges);
            prop_assert!(a0 != b0 && a0 != b1 && a1 != b0 && a1 != b1);
        }
        for c in &out.fv {
            prop_assert!(!faces[c.face].contains(&c.vertex));
        }
        for c in &out.ef {
            prop_assert!(edges[c.edge].iter().all(|v| !faces[c.face].contains(v)));
        }
        for c in &out.vv {
            prop_assert_ne!(c.vertex0, c.vertex1);
        }
    }
}
