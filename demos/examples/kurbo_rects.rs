// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit-test a layer of Kurbo rectangles.
//!
//! Run:
//! - `cargo run -p quarry_demos --example kurbo_rects`

use kurbo::{Point, Rect};
use quarry_index::{Config, DVec3, RectIndex, Rects};

fn main() {
    let rects = [
        Rect::new(0.0, 0.0, 100.0, 40.0),
        Rect::new(10.0, 10.0, 30.0, 30.0),
        Rect::new(60.0, 5.0, 90.0, 35.0),
        Rect::new(200.0, 200.0, 220.0, 260.0),
    ];
    let idx = RectIndex::from_rects(Rects::new(&rects, 0.0), Config::default());

    println!("hits at (20, 20): {:?}", idx.hit_point(Point::new(20.0, 20.0)));
    println!("hits at (150, 150): {:?}", idx.hit_point(Point::new(150.0, 150.0)));
    println!(
        "overlapping marquee: {:?}",
        idx.overlapping(Rect::new(50.0, 0.0, 210.0, 210.0))
    );
    println!(
        "nearest to (150, 150): {:?}",
        idx.nearest_to(DVec3::new(150.0, 150.0, 0.0), f64::INFINITY, None)
    );
}
