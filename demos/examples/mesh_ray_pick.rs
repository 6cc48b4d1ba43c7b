// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pick faces of a mesh with rays and nearest-face queries.
//!
//! Builds a square pyramid, then fires a few rays with and without back-face
//! culling.
//!
//! Run:
//! - `cargo run -p quarry_demos --example mesh_ray_pick`

use quarry_index::{Config, DVec3, FaceIndex, MeshFaces, Ray, RayFlags};

fn main() {
    // A square pyramid: four sloped sides and a two-triangle base, wound outward.
    let vertices = [
        DVec3::new(-5.0, -5.0, 0.0),
        DVec3::new(5.0, -5.0, 0.0),
        DVec3::new(5.0, 5.0, 0.0),
        DVec3::new(-5.0, 5.0, 0.0),
        DVec3::new(0.0, 0.0, 8.0),
    ];
    let faces = [
        [0, 1, 4],
        [1, 2, 4],
        [2, 3, 4],
        [3, 0, 4],
        [0, 2, 1],
        [0, 3, 2],
    ];
    let idx = FaceIndex::from_mesh(MeshFaces::new(&vertices, &faces), Config::default());
    println!("{:?}", idx.stats());

    let from_above = Ray::new(DVec3::new(1.0, 1.0, 20.0), DVec3::NEG_Z);
    println!(
        "from above: {:?}",
        idx.ray_trace_faces(&from_above, RayFlags::empty(), f64::INFINITY)
    );

    let from_inside = Ray::new(DVec3::new(0.0, 0.0, 1.0), DVec3::X);
    println!(
        "from inside: {:?}, culled: {:?}",
        idx.ray_trace_faces(&from_inside, RayFlags::empty(), f64::INFINITY),
        idx.ray_trace_faces(&from_inside, RayFlags::CULL_BACK_FACES, f64::INFINITY)
    );

    let short = Ray::new(DVec3::new(0.0, -20.0, 2.0), DVec3::new(0.0, 10.0, 0.0));
    println!(
        "segment of length 10: {:?}",
        idx.ray_trace_faces(&short, RayFlags::SEGMENT, f64::INFINITY)
    );

    let target = DVec3::new(9.0, 0.0, 1.0);
    println!("nearest face to {target}: {:?}", idx.nearest_to(target, f64::INFINITY, None));
}
