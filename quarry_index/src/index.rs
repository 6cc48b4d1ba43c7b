// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `SpatialIndex` API over a caller-supplied [`Adapter`].

use alloc::collections::BinaryHeap;
use alloc::vec::Vec;
use core::fmt::Debug;

use glam::DVec3;

use crate::adapter::Adapter;
use crate::config::Config;
use crate::node::{KNearest, Nearest, Node, TreeStats, Within};
use crate::types::{Aabb3D, Ray, RayHit};

/// An adaptive spatial index over entity handles `E`.
///
/// `E` is a cheap handle (an index, an id, a reference wrapper); handle
/// equality is entity identity. Geometry comes from the adapter `A`.
pub struct SpatialIndex<E, A> {
    adapter: A,
    config: Config,
    members: Vec<E>,
    root: Node<E>,
}

impl<E, A> SpatialIndex<E, A>
where
    E: Copy + PartialEq,
    A: Adapter<E>,
{
    /// Build an index over `entities` in one pass.
    ///
    /// Every entity is loaded into the root and the root is subdivided once
    /// top-down. Repeated handles count toward [`len`](Self::len) but are
    /// stored and reported once.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, name = "quarry_index::build")
    )]
    pub fn new(adapter: A, config: Config, entities: impl IntoIterator<Item = E>) -> Self {
        let members: Vec<E> = entities.into_iter().collect();
        let root = build_root(&members, &adapter, &config);
        #[cfg(feature = "tracing")]
        tracing::debug!(entities = members.len(), "built spatial index");
        Self {
            adapter,
            config,
            members,
            root,
        }
    }

    /// Build an index with [`Config::default`].
    pub fn with_defaults(adapter: A, entities: impl IntoIterator<Item = E>) -> Self {
        Self::new(adapter, Config::default(), entities)
    }

    /// An index with no entities.
    pub fn empty(adapter: A, config: Config) -> Self {
        Self {
            adapter,
            config,
            members: Vec::new(),
            root: Node::new(),
        }
    }

    /// Add `entity` unless an identical handle is already indexed.
    ///
    /// The membership check is a linear scan over all handles.
    pub fn add(&mut self, entity: E) {
        if self.members.contains(&entity) {
            return;
        }
        self.members.push(entity);
        self.root.add(entity, &self.adapter, &self.config);
    }

    /// Remove one occurrence of `entity`. Returns `false` if it was not indexed.
    ///
    /// A handle repeated at construction stays queryable until its last
    /// occurrence is removed. Finding the handle is a linear scan. Branches
    /// emptied by removal are kept; see [`rebuild`](Self::rebuild).
    pub fn remove(&mut self, entity: &E) -> bool {
        let Some(pos) = self.members.iter().position(|e| e == entity) else {
            return false;
        };
        self.members.remove(pos);
        if self.members.contains(entity) {
            return true;
        }
        let removed = self.root.remove(entity, &self.adapter);
        debug_assert!(removed, "indexed entity missing from the tree");
        removed
    }

    /// The closest returnable entity strictly within `max_distance` of `point`,
    /// skipping `ignore`.
    ///
    /// Among equally distant entities the first one reached wins. A negative
    /// or NaN `max_distance` finds nothing.
    pub fn nearest_to(&self, point: DVec3, max_distance: f64, ignore: Option<E>) -> Option<E> {
        let mut search = Nearest {
            ignore,
            best: None,
            best_distance_squared: radius_squared(max_distance),
        };
        self.root.search(point, &mut search, &self.adapter);
        search.best
    }

    /// Up to `k` returnable entities strictly within `max_distance` of `point`,
    /// closest first, with their squared distances.
    ///
    /// Any `k` is accepted; `usize::MAX` asks for every entity in range.
    pub fn nearest_k(&self, point: DVec3, k: usize, max_distance: f64) -> Vec<(E, f64)> {
        if k == 0 {
            return Vec::new();
        }
        let mut search = KNearest {
            k,
            radius_squared: radius_squared(max_distance),
            heap: BinaryHeap::with_capacity(k.min(self.members.len()).saturating_add(1)),
        };
        self.root.search(point, &mut search, &self.adapter);
        search
            .heap
            .into_sorted_vec()
            .into_iter()
            .map(|c| (c.entity, c.distance_squared))
            .collect()
    }

    /// Append every returnable entity strictly within `max_distance` of
    /// `point` to `out`, skipping entities `out` already holds.
    pub fn close_to_into(&self, point: DVec3, max_distance: f64, out: &mut Vec<E>) {
        let held = out.len();
        let mut search = Within {
            radius_squared: radius_squared(max_distance),
            out: &mut *out,
        };
        self.root.search(point, &mut search, &self.adapter);
        drop_already_held(out, held);
    }

    /// Every returnable entity strictly within `max_distance` of `point`.
    pub fn close_to(&self, point: DVec3, max_distance: f64) -> Vec<E> {
        let mut out = Vec::new();
        self.close_to_into(point, max_distance, &mut out);
        out
    }

    /// Append every entity whose bounds intersect `query` (faces included) to
    /// `out`, skipping entities `out` already holds.
    ///
    /// Unlike the distance queries this does not consult
    /// [`Adapter::can_return`].
    pub fn items_inside_into(&self, query: &Aabb3D, out: &mut Vec<E>) {
        if query.is_empty() {
            return;
        }
        let held = out.len();
        self.root.items_inside(query, out, &self.adapter);
        drop_already_held(out, held);
    }

    /// Every entity whose bounds intersect `query`.
    pub fn items_inside(&self, query: &Aabb3D) -> Vec<E> {
        let mut out = Vec::new();
        self.items_inside_into(query, &mut out);
        out
    }

    /// March the index along `ray` and return the first hit found.
    ///
    /// `hit_test` returns the ray parameter where it hits an entity, or `None`
    /// (NaN and negative values also count as misses). Hits beyond
    /// `max_range` are ignored; pass `f64::INFINITY` for no limit.
    ///
    /// Cells are visited in order along each branch's split axis and the
    /// first cell yielding a hit ends the search, so the result is the nearest
    /// hit within that cell, not necessarily the globally nearest one.
    pub fn ray_trace<F>(&self, ray: &Ray, mut hit_test: F, max_range: f64) -> Option<RayHit<E>>
    where
        F: FnMut(&E, &Ray) -> Option<f64>,
    {
        if max_range.is_nan() || max_range < 0.0 {
            return None;
        }
        self.root
            .ray_trace(ray, &mut hit_test, 0.0, max_range, max_range)
    }

    /// Number of indexed entities, duplicates from construction included.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the index holds no entities.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether `entity` is indexed.
    pub fn contains(&self, entity: &E) -> bool {
        self.members.contains(entity)
    }

    /// Iterate indexed entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = E> + '_ {
        self.members.iter().copied()
    }

    /// Drop every entity, keeping adapter and configuration.
    pub fn clear(&mut self) {
        self.members.clear();
        self.root = Node::new();
    }

    /// Re-run the bulk build over the current members.
    ///
    /// The tree never rebalances on its own; after heavy removal or many adds
    /// far outside the original extent, a rebuild restores a tight layout.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, name = "quarry_index::rebuild")
    )]
    pub fn rebuild(&mut self) {
        self.root = build_root(&self.members, &self.adapter, &self.config);
    }

    /// The adapter this index was built with.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// The configuration this index was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shape of the current tree.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        self.root.collect_stats(0, &mut stats);
        stats
    }
}

fn build_root<E, A>(members: &[E], adapter: &A, config: &Config) -> Node<E>
where
    E: Copy + PartialEq,
    A: Adapter<E>,
{
    let mut root = Node::Leaf(members.to_vec());
    root.subdivide(adapter, config);
    root.dedup_leaves();
    root
}

/// Squared search radius; negative and NaN radii match nothing.
fn radius_squared(max_distance: f64) -> f64 {
    if max_distance >= 0.0 {
        max_distance * max_distance
    } else {
        0.0
    }
}

/// Drop entries appended after `held` that `out[..held]` already contains.
///
/// A query never reports a handle twice, so only the caller's prior contents
/// need checking.
fn drop_already_held<E: PartialEq>(out: &mut Vec<E>, held: usize) {
    if held == 0 {
        return;
    }
    let mut kept = held;
    for i in held..out.len() {
        if !out[..held].contains(&out[i]) {
            out.swap(kept, i);
            kept += 1;
        }
    }
    out.truncate(kept);
}

impl<E, A> Debug for SpatialIndex<E, A>
where
    E: Copy + PartialEq,
    A: Adapter<E>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let stats = self.stats();
        f.debug_struct("SpatialIndex")
            .field("config", &self.config)
            .field("entities", &self.members.len())
            .field("leaves", &stats.leaves)
            .field("branches", &stats.branches)
            .field("max_depth", &stats.max_depth)
            .finish_non_exhaustive()
    }
}
