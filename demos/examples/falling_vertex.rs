// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A vertex falling through a triangle, from broad phase to time of impact.
//!
//! The narrow phase here is a toy: it only handles point-triangle queries and assumes
//! the triangle does not rotate during the step.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p tangent_demos --example falling_vertex`

use nalgebra::{DMatrix, Vector3};
use tangent_candidates::{
    BroadPhase, Candidates, CcdParams, CollisionMesh, ContinuousCandidate, NarrowPhase, Position,
};
use tangent_index::SweepAndPrune;
use tracing::info;
use tracing_subscriber::EnvFilter;

struct PlaneCrossing;

fn point(p: &Position) -> Vector3<f64> {
    Vector3::new(p[0], p[1], p[2])
}

impl NarrowPhase for PlaneCrossing {
    fn point_edge_ccd(
        &self,
        _p_t0: &Position,
        _e0_t0: &Position,
        _e1_t0: &Position,
        _p_t1: &Position,
        _e0_t1: &Position,
        _e1_t1: &Position,
        _params: &CcdParams,
    ) -> Option<f64> {
        None
    }

    fn edge_edge_ccd(
        &self,
        _ea0_t0: &Position,
        _ea1_t0: &Position,
        _eb0_t0: &Position,
        _eb1_t0: &Position,
        _ea0_t1: &Position,
        _ea1_t1: &Position,
        _eb0_t1: &Position,
        _eb1_t1: &Position,
        _params: &CcdParams,
    ) -> Option<f64> {
        None
    }

    fn point_triangle_ccd(
        &self,
        p_t0: &Position,
        t0_t0: &Position,
        t1_t0: &Position,
        t2_t0: &Position,
        p_t1: &Position,
        t0_t1: &Position,
        _t1_t1: &Position,
        _t2_t1: &Position,
        params: &CcdParams,
    ) -> Option<f64> {
        let (a, b, c) = (point(t0_t0), point(t1_t0), point(t2_t0));
        let normal = (b - a).cross(&(c - a)).normalize();
        let d0 = normal.dot(&(point(p_t0) - a));
        let d1 = normal.dot(&(point(p_t1) - point(t0_t1)));
        if d0.signum() == d1.signum() {
            return None;
        }
        let toi = d0 / (d0 - d1);
        (toi <= params.tmax).then_some(toi * params.conservative_rescaling)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let t0 = DMatrix::from_row_slice(
        4,
        3,
        &[
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            0.25, 0.25, 0.5,
        ],
    );
    let mut t1 = t0.clone();
    t1[(3, 2)] = -1.5;

    let mesh = match CollisionMesh::new_swept(t0, t1, vec![], vec![[0, 1, 2]]) {
        Ok(mesh) => mesh,
        Err(err) => {
            eprintln!("bad mesh: {err}");
            return;
        }
    };

    let mut broad_phase = BroadPhase::new(SweepAndPrune::<f64>::default());
    if let Err(err) = broad_phase.build(&mesh, 0.0) {
        eprintln!("build failed: {err}");
        return;
    }
    let mut candidates = Candidates::new();
    broad_phase.detect_collision_candidates(&mut candidates);
    println!("== Candidates ==");
    for c in candidates.iter() {
        println!("  {c:?}");
    }

    let params = CcdParams::default();
    println!("== Time of impact ==");
    for c in &candidates.fv {
        let toi = c.ccd(
            &PlaneCrossing,
            mesh.vertices_t0(),
            mesh.vertices_t1(),
            mesh.edges(),
            mesh.faces(),
            &params,
        );
        info!(face = c.face, vertex = c.vertex, ?toi, "checked face-vertex candidate");
        match toi {
            Some(t) => println!("  face {} / vertex {}: toi = {t:.4}", c.face, c.vertex),
            None => println!("  face {} / vertex {}: no collision", c.face, c.vertex),
        }
    }
}
