// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use quarry_index::{
    Aabb3D, Config, DVec3, FaceIndex, MeshFaces, PointIndex, Points, Ray, RayFlags,
};

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
    fn next_point(&mut self, extent: f64) -> DVec3 {
        DVec3::new(
            self.next_f64() * extent,
            self.next_f64() * extent,
            self.next_f64() * extent,
        )
    }
}

fn gen_uniform_points(count: usize, extent: f64) -> Vec<DVec3> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count).map(|_| rng.next_point(extent)).collect()
}

fn gen_clustered_points(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<DVec3> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let centers: Vec<DVec3> = (0..n_clusters).map(|_| rng.next_point(2000.0)).collect();
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    for c in centers {
        for _ in 0..per_cluster {
            out.push(c + rng.next_point(spread) - DVec3::splat(spread * 0.5));
        }
    }
    out
}

/// A bumpy `n`×`n` height field triangulated into `2 n²` faces.
fn gen_terrain(n: usize, cell: f64) -> (Vec<DVec3>, Vec<[usize; 3]>) {
    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    for y in 0..=n {
        for x in 0..=n {
            let h = rng.next_f64() * cell;
            vertices.push(DVec3::new(x as f64 * cell, y as f64 * cell, h));
        }
    }
    let mut faces = Vec::with_capacity(2 * n * n);
    let row = n + 1;
    for y in 0..n {
        for x in 0..n {
            let a = y * row + x;
            faces.push([a, a + 1, a + row + 1]);
            faces.push([a, a + row + 1, a + row]);
        }
    }
    (vertices, faces)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &n in &[1_000_usize, 10_000, 100_000] {
        let pts = gen_uniform_points(n, 1000.0);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_function(format!("bulk_uniform_n{}", n), |b| {
            b.iter(|| {
                let idx = PointIndex::from_points(Points::new(&pts), Config::default());
                black_box(idx.len());
            })
        });

        group.bench_function(format!("incremental_uniform_n{}", n), |b| {
            b.iter_batched(
                || PointIndex::empty(Points::new(&pts), Config::default()),
                |mut idx| {
                    for i in 0..pts.len() {
                        idx.add(i);
                    }
                    black_box(idx.len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest");
    let sets = [
        ("uniform", gen_uniform_points(50_000, 1000.0)),
        ("clustered", gen_clustered_points(50, 1000, 20.0)),
    ];
    let mut rng = Rng::new(0x5EED_0000_0000_0001);
    let targets: Vec<DVec3> = (0..256).map(|_| rng.next_point(1000.0)).collect();
    for (name, pts) in &sets {
        let idx = PointIndex::from_points(Points::new(pts), Config::default());
        group.throughput(Throughput::Elements(targets.len() as u64));

        group.bench_function(format!("nearest_{}", name), |b| {
            b.iter(|| {
                for &p in &targets {
                    black_box(idx.nearest_to(p, f64::INFINITY, None));
                }
            })
        });

        group.bench_function(format!("nearest_k8_{}", name), |b| {
            b.iter(|| {
                for &p in &targets {
                    black_box(idx.nearest_k(p, 8, f64::INFINITY));
                }
            })
        });

        group.bench_function(format!("close_to_r25_{}", name), |b| {
            let mut out = Vec::new();
            b.iter(|| {
                for &p in &targets {
                    out.clear();
                    idx.close_to_into(p, 25.0, &mut out);
                    black_box(out.len());
                }
            })
        });
    }
    group.finish();
}

fn bench_items_inside(c: &mut Criterion) {
    let mut group = c.benchmark_group("items_inside");
    let pts = gen_uniform_points(50_000, 1000.0);
    let idx = PointIndex::from_points(Points::new(&pts), Config::default());
    for &side in &[10.0, 100.0, 400.0] {
        let query = Aabb3D::new(300.0, 300.0, 300.0, 300.0 + side, 300.0 + side, 300.0 + side);
        group.bench_function(format!("box_side{}", side), |b| {
            let mut out = Vec::new();
            b.iter(|| {
                out.clear();
                idx.items_inside_into(&query, &mut out);
                black_box(out.len());
            })
        });
    }
    group.finish();
}

fn bench_ray_trace(c: &mut Criterion) {
    let mut group = c.benchmark_group("ray_trace");
    for &n in &[64_usize, 256] {
        let (vertices, faces) = gen_terrain(n, 1.0);
        let idx = FaceIndex::from_mesh(MeshFaces::new(&vertices, &faces), Config::default());
        let mut rng = Rng::new(0xFACE_0000_0000_0001);
        let rays: Vec<Ray> = (0..256)
            .map(|_| {
                let origin = DVec3::new(
                    rng.next_f64() * n as f64,
                    rng.next_f64() * n as f64,
                    10.0,
                );
                let dir = DVec3::new(rng.next_f64() - 0.5, rng.next_f64() - 0.5, -1.0);
                Ray::new(origin, dir)
            })
            .collect();
        group.throughput(Throughput::Elements(rays.len() as u64));

        group.bench_function(format!("terrain_faces{}", faces.len()), |b| {
            b.iter(|| {
                for ray in &rays {
                    black_box(idx.ray_trace_faces(ray, RayFlags::empty(), f64::INFINITY));
                }
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_nearest,
    bench_items_inside,
    bench_ray_trace
);
criterion_main!(benches);
