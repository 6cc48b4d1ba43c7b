// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Find near-duplicate points in a cloud and map each to a welded vertex.
//!
//! Run:
//! - `cargo run -p quarry_demos --example point_welding`

use quarry_index::{Config, DVec3, PointIndex, Points};

fn main() {
    let pts = [
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(1.0, 0.0, 0.0),
        DVec3::new(1.0, 0.0, 1e-9),
        DVec3::new(0.0, 1.0, 0.0),
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(1.0 + 1e-10, 0.0, 0.0),
    ];
    let idx = PointIndex::from_points(Points::new(&pts), Config::default());

    let groups = idx.coincident_groups(1e-6);
    println!("duplicate groups: {groups:?}");

    let mut weld: Vec<usize> = (0..pts.len()).collect();
    for group in &groups {
        for &i in &group[1..] {
            weld[i] = group[0];
        }
    }
    println!("welded indices: {weld:?}");

    for (i, &p) in pts.iter().enumerate() {
        if let Some(other) = idx.coincident(p, 1e-6, Some(i)) {
            println!("point {i} coincides with {other}");
        }
    }
}
