// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use nalgebra::DMatrix;
use tangent_candidates::{BroadPhase, Candidates, CollisionMesh};
use tangent_index::BackendKind;

/// A square cloth of `n × n` vertices, triangulated, falling onto itself with a fold.
fn folded_cloth(n: usize) -> CollisionMesh {
    let idx = |x: usize, y: usize| y * n + x;
    let h = 1.0 / (n - 1) as f64;

    let mut t0 = DMatrix::zeros(n * n, 3);
    let mut t1 = DMatrix::zeros(n * n, 3);
    for y in 0..n {
        for x in 0..n {
            let i = idx(x, y);
            let (px, py) = (x as f64 * h, y as f64 * h);
            t0[(i, 0)] = px;
            t0[(i, 1)] = py;
            // The far half folds over the near half during the step.
            let folded = py > 0.5;
            t1[(i, 0)] = px;
            t1[(i, 1)] = if folded { 1.0 - py } else { py };
            t1[(i, 2)] = if folded { 2.0 * h * (py - 0.5) } else { 0.0 };
        }
    }

    let mut edges = Vec::new();
    let mut faces = Vec::new();
    for y in 0..n - 1 {
        for x in 0..n - 1 {
            let (a, b, c, d) = (idx(x, y), idx(x + 1, y), idx(x + 1, y + 1), idx(x, y + 1));
            edges.extend([[a, b], [a, d], [a, c]]);
            faces.extend([[a, b, c], [a, c, d]]);
        }
        edges.push([idx(n - 1, y), idx(n - 1, y + 1)]);
    }
    for x in 0..n - 1 {
        edges.push([idx(x, n - 1), idx(x + 1, n - 1)]);
    }

    CollisionMesh::new_swept(t0, t1, edges, faces).expect("cloth topology is valid")
}

fn bench_detection(c: &mut Criterion) {
    for &n in &[16usize, 32, 64] {
        let mesh = folded_cloth(n);
        let mut group = c.benchmark_group(format!("cloth_n{n}"));
        group.throughput(Throughput::Elements(mesh.mapper().total() as u64));
        for &kind in BackendKind::ALL {
            if kind == BackendKind::BruteForce && n > 32 {
                continue;
            }
            group.bench_function(kind.name(), |b| {
                let mut broad_phase = BroadPhase::with_backend_kind(kind);
                let mut candidates = Candidates::new();
                b.iter(|| {
                    broad_phase.build(&mesh, 1e-3).expect("valid inflation");
                    broad_phase.detect_collision_candidates(&mut candidates);
                    black_box(candidates.len());
                });
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_detection);
criterion_main!(benches);
