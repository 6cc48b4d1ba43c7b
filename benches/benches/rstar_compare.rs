// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use quarry_index::{Config, DVec3, PointIndex, Points};

use rstar::{AABB, RTree};

fn gen_grid_points(n: usize, cell: f64) -> Vec<DVec3> {
    let mut out = Vec::with_capacity(n * n * n);
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                out.push(DVec3::new(x as f64, y as f64, z as f64) * cell);
            }
        }
    }
    out
}

fn to_rstar_points(v: &[DVec3]) -> Vec<[f64; 3]> {
    v.iter().map(|p| p.to_array()).collect()
}

fn bench_rstar_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("rstar_compare");
    for &n in &[16usize, 32] {
        let pts = gen_grid_points(n, 10.0);
        let targets: Vec<DVec3> = (0..64)
            .map(|i| DVec3::new(i as f64 * 2.3, i as f64 * 1.7, i as f64 * 3.1))
            .collect();
        group.throughput(Throughput::Elements((n * n * n) as u64));

        group.bench_function(format!("quarry_build_nearest_n{}", n), |b| {
            b.iter(|| {
                let idx = PointIndex::from_points(Points::new(&pts), Config::default());
                for &p in &targets {
                    black_box(idx.nearest_to(p, f64::INFINITY, None));
                }
            })
        });

        group.bench_function(format!("rstar_build_nearest_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_points(&pts),
                |points| {
                    let tree = RTree::bulk_load(points);
                    for p in &targets {
                        black_box(tree.nearest_neighbor(&p.to_array()));
                    }
                },
                BatchSize::SmallInput,
            )
        });

        let idx = PointIndex::from_points(Points::new(&pts), Config::default());
        let tree = RTree::bulk_load(to_rstar_points(&pts));
        let lo = DVec3::splat(40.0);
        let hi = DVec3::splat(120.0);

        group.bench_function(format!("quarry_box_query_n{}", n), |b| {
            let query = quarry_index::Aabb3D::from_corners(lo, hi);
            b.iter(|| black_box(idx.items_inside(&query).len()))
        });

        group.bench_function(format!("rstar_box_query_n{}", n), |b| {
            let envelope = AABB::from_corners(lo.to_array(), hi.to_array());
            b.iter(|| black_box(tree.locate_in_envelope_intersecting(&envelope).count()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rstar_compare);
criterion_main!(benches);
