// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Run the same detection pass on every backend and dump the result as OBJ.
//!
//! Pass a backend name to run only that one (`brute_force`, `uniform_grid`, `bvh`,
//! `sweep_and_prune`).
//!
//! Run:
//! - `cargo run -p tangent_demos --example backend_compare`
//! - `cargo run -p tangent_demos --example backend_compare -- bvh`

use std::time::Instant;

use nalgebra::DMatrix;
use tangent_candidates::{BroadPhaseConfig, CandidateKinds, CollisionMesh};
use tangent_index::BackendKind;
use tracing_subscriber::EnvFilter;

/// Two stacked triangulated sheets, the upper one sinking into the lower one.
fn stacked_sheets(n: usize) -> CollisionMesh {
    let per_sheet = n * n;
    let h = 1.0 / (n - 1) as f64;
    let mut t0 = DMatrix::zeros(2 * per_sheet, 3);
    let mut t1 = DMatrix::zeros(2 * per_sheet, 3);
    let mut edges = Vec::new();
    let mut faces = Vec::new();
    for sheet in 0..2 {
        let base = sheet * per_sheet;
        let idx = |x: usize, y: usize| base + y * n + x;
        let (z0, z1) = if sheet == 0 { (0.0, 0.0) } else { (0.1, -0.05) };
        for y in 0..n {
            for x in 0..n {
                let i = idx(x, y);
                // Offset the upper sheet by half a cell so vertices land inside faces.
                let shift = if sheet == 0 { 0.0 } else { 0.5 * h };
                for (m, z) in [(&mut t0, z0), (&mut t1, z1)] {
                    m[(i, 0)] = x as f64 * h + shift;
                    m[(i, 1)] = y as f64 * h + shift;
                    m[(i, 2)] = z;
                }
            }
        }
        for y in 0..n - 1 {
            for x in 0..n - 1 {
                let (a, b, c, d) = (idx(x, y), idx(x + 1, y), idx(x + 1, y + 1), idx(x, y + 1));
                edges.extend([[a, b], [a, d], [a, c]]);
                faces.extend([[a, b, c], [a, c, d]]);
            }
        }
    }
    match CollisionMesh::new_swept(t0, t1, edges, faces) {
        Ok(mesh) => mesh,
        Err(err) => panic!("sheet topology is valid: {err}"),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let kinds: Vec<BackendKind> = match std::env::args().nth(1) {
        Some(name) => match name.parse() {
            Ok(kind) => vec![kind],
            Err(err) => {
                eprintln!("{err}: {name}");
                return;
            }
        },
        None => BackendKind::ALL.to_vec(),
    };

    let mesh = stacked_sheets(24);
    println!(
        "mesh: {} vertices, {} edges, {} faces",
        mesh.num_vertices(),
        mesh.edges().len(),
        mesh.faces().len()
    );

    for kind in kinds {
        let config = BroadPhaseConfig::default()
            .with_backend(kind)
            .with_inflation_radius(1e-3)
            .with_kinds(CandidateKinds::for_dimension(mesh.dimension()) | CandidateKinds::EDGE_FACE);
        let start = Instant::now();
        let candidates = match config.detect(&mesh) {
            Ok(candidates) => candidates,
            Err(err) => {
                eprintln!("{kind}: {err}");
                continue;
            }
        };
        println!(
            "{kind:>16}: {:>6} candidates (ee {}, fv {}, ef {}) in {:?}",
            candidates.len(),
            candidates.ee.len(),
            candidates.fv.len(),
            candidates.ef.len(),
            start.elapsed()
        );

        let path = std::env::temp_dir().join(format!("tangent_{kind}.obj"));
        match candidates.export_obj(&path, mesh.vertices_t1(), mesh.edges(), mesh.faces()) {
            Ok(()) => println!("{:>16}  wrote {}", "", path.display()),
            Err(err) => eprintln!("{kind}: export failed: {err}"),
        }
    }
}
