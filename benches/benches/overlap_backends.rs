// Copyright 2025 the Tangent Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tangent_index::{Aabb, Backend, BackendKind};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn cube(x: f64, y: f64, z: f64, size: f64) -> Aabb<f64> {
    Aabb::new([x, y, z], [x + size, y + size, z + size])
}

/// `n × n × n` lattice of cubes that overlap their face neighbours.
fn gen_lattice(n: usize, cell: f64, scale: f64) -> Vec<Aabb<f64>> {
    let mut out = Vec::with_capacity(n * n * n);
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                out.push(cube(
                    x as f64 * cell,
                    y as f64 * cell,
                    z as f64 * cell,
                    cell * scale,
                ));
            }
        }
    }
    out
}

fn gen_random(count: usize, extent: f64, size: f64) -> Vec<Aabb<f64>> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| {
            cube(
                rng.next_f64() * extent,
                rng.next_f64() * extent,
                rng.next_f64() * extent,
                size,
            )
        })
        .collect()
}

fn gen_clustered(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<Aabb<f64>> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let centers: Vec<[f64; 3]> = (0..n_clusters)
        .map(|_| {
            [
                rng.next_f64() * 500.0,
                rng.next_f64() * 500.0,
                rng.next_f64() * 500.0,
            ]
        })
        .collect();
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    for [cx, cy, cz] in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            let dz = (rng.next_f64() - 0.5) * spread;
            out.push(cube(cx + dx, cy + dy, cz + dz, 2.0));
        }
    }
    out
}

fn bench_scene(c: &mut Criterion, name: &str, boxes: &[Aabb<f64>], inflation: f64) {
    let mut group = c.benchmark_group(name);
    group.throughput(Throughput::Elements(boxes.len() as u64));
    for &kind in BackendKind::ALL {
        if kind == BackendKind::BruteForce && boxes.len() > 4096 {
            continue;
        }
        group.bench_function(kind.name(), |b| {
            b.iter_batched(
                || kind.instantiate(),
                |mut backend| {
                    backend.build(boxes, inflation);
                    black_box(backend.query_overlaps().len());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_lattice(c: &mut Criterion) {
    for &n in &[8usize, 16, 24] {
        let boxes = gen_lattice(n, 1.0, 1.2);
        bench_scene(c, &format!("lattice_n{n}"), &boxes, 0.0);
    }
}

fn bench_random(c: &mut Criterion) {
    let boxes = gen_random(8192, 200.0, 2.0);
    bench_scene(c, "random_8192", &boxes, 0.1);
}

fn bench_clustered(c: &mut Criterion) {
    let boxes = gen_clustered(32, 256, 40.0);
    bench_scene(c, "clustered_32x256", &boxes, 0.1);
}

fn bench_swept(c: &mut Criterion) {
    let t0 = gen_random(4096, 100.0, 1.0);
    let mut rng = Rng::new(0xFACE_FEED_CAFE_BABE);
    let t1: Vec<Aabb<f64>> = t0
        .iter()
        .map(|b| {
            let d = [
                (rng.next_f64() - 0.5) * 4.0,
                (rng.next_f64() - 0.5) * 4.0,
                (rng.next_f64() - 0.5) * 4.0,
            ];
            Aabb::new(
                [b.min[0] + d[0], b.min[1] + d[1], b.min[2] + d[2]],
                [b.max[0] + d[0], b.max[1] + d[1], b.max[2] + d[2]],
            )
        })
        .collect();

    let mut group = c.benchmark_group("swept_4096");
    group.throughput(Throughput::Elements(t0.len() as u64));
    for &kind in BackendKind::ALL {
        group.bench_function(kind.name(), |b| {
            b.iter_batched(
                || kind.instantiate(),
                |mut backend| {
                    backend.build_swept(&t0, &t1, 0.0);
                    black_box(backend.query_overlaps().len());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_lattice,
    bench_random,
    bench_clustered,
    bench_swept,
);
criterion_main!(benches);
