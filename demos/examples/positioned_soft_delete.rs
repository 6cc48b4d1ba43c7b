// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Index borrowed objects and hide them from queries without removing them.
//!
//! Run:
//! - `cargo run -p quarry_demos --example positioned_soft_delete`

use std::cell::Cell;

use quarry_index::{ByRef, Config, DVec3, Positioned, PositionedAdapter, PositionedIndex};

#[derive(Debug)]
struct Unit {
    name: &'static str,
    at: DVec3,
    size: f64,
    alive: Cell<bool>,
}

impl Positioned for Unit {
    fn position(&self) -> DVec3 {
        self.at
    }
    fn radius(&self) -> f64 {
        self.size
    }
    fn is_live(&self) -> bool {
        self.alive.get()
    }
}

fn unit(name: &'static str, at: DVec3, size: f64) -> Unit {
    Unit {
        name,
        at,
        size,
        alive: Cell::new(true),
    }
}

fn main() {
    let units = [
        unit("scout", DVec3::new(2.0, 0.0, 0.0), 0.5),
        unit("tank", DVec3::new(6.0, 1.0, 0.0), 2.5),
        unit("tower", DVec3::new(-8.0, 3.0, 0.0), 1.0),
    ];
    let idx: PositionedIndex<'_, Unit> =
        PositionedIndex::new(PositionedAdapter, Config::default(), units.iter().map(ByRef));

    let origin = DVec3::ZERO;
    let target = |idx: &PositionedIndex<'_, Unit>| {
        idx.nearest_to(origin, 10.0, None).map(|u| u.name)
    };
    println!("target: {:?}", target(&idx));

    units[0].alive.set(false);
    println!("scout down, target: {:?}", target(&idx));

    let in_range: Vec<_> = idx.close_to(origin, 5.0).iter().map(|u| u.name).collect();
    println!("in range: {in_range:?}");
}
