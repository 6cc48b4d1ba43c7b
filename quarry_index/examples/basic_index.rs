// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Quarry Index: build, query, add, and remove.

use quarry_index::{Aabb3D, Config, DVec3, PointIndex, Points};

fn main() {
    let pts = [
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(10.0, 0.0, 0.0),
        DVec3::new(0.0, 10.0, 0.0),
        DVec3::new(10.0, 10.0, 0.0),
        DVec3::new(5.0, 5.0, 5.0),
    ];
    let mut idx = PointIndex::from_points(Points::new(&pts), Config::default());
    println!("indexed {} points: {:?}", idx.len(), idx.stats());

    let target = DVec3::new(4.0, 4.0, 4.0);
    println!("nearest to {target}: {:?}", idx.nearest_to(target, f64::INFINITY, None));
    println!("3 nearest: {:?}", idx.nearest_k(target, 3, f64::INFINITY));
    println!("within 8: {:?}", idx.close_to(target, 8.0));

    let slab = Aabb3D::new(-1.0, -1.0, -1.0, 11.0, 1.0, 1.0);
    println!("inside {slab:?}: {:?}", idx.items_inside(&slab));

    // Drop the centre point and ask again.
    idx.remove(&4);
    println!("after remove: {:?}", idx.nearest_to(target, f64::INFINITY, None));
}
