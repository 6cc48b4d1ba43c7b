// Copyright 2025 the Quarry Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recursive storage and query engine behind [`SpatialIndex`](crate::SpatialIndex).
//!
//! A node is either a leaf holding entity handles or a branch that splits one
//! axis into evenly spaced buckets, each an optional child node. Branches are
//! created by [`Node::subdivide`] and never revert to leaves.
//!
//! Buckets are keyed by the adapter's [`position_in`](crate::Adapter::position_in)
//! projection, but entities are boxes, not points. Each branch keeps `reach`,
//! the furthest any of its entities extends from its projection along the
//! split axis, and widens every bucket slab by it when pruning. For point-like
//! entities `reach` is zero.
//!
//! Each handle is stored once, in exactly one leaf. Identical handles report
//! identical geometry, so a bulk build routes them to the same leaf and
//! [`Node::dedup_leaves`] collapses them there. Queries therefore never see a
//! handle twice.

use alloc::boxed::Box;
use alloc::collections::BinaryHeap;
use alloc::vec::Vec;
use core::cmp::Ordering;

use glam::DVec3;

use crate::adapter::Adapter;
use crate::config::Config;
use crate::types::{Aabb3D, Axis, Ray, RayHit, floor_to_isize, max_t, min_t};

/// Slab edges are padded by this fraction of a cell to absorb rounding in
/// bucket placement.
const SLAB_PAD: f64 = 1e-9;

pub(crate) enum Node<E> {
    Leaf(Vec<E>),
    Branch(Branch<E>),
}

pub(crate) struct Branch<E> {
    axis: Axis,
    origin: f64,
    cell_size: f64,
    reach: f64,
    children: Box<[Option<Node<E>>]>,
}

/// Shape summary of a tree, for tuning and debugging.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Number of leaf nodes.
    pub leaves: usize,
    /// Number of branch nodes.
    pub branches: usize,
    /// Depth of the deepest node; the root is depth 0.
    pub max_depth: usize,
    /// Entity handles stored across all leaves.
    pub stored: usize,
}

impl<E: Copy + PartialEq> Node<E> {
    pub(crate) const fn new() -> Self {
        Self::Leaf(Vec::new())
    }

    /// Split a leaf into buckets along its widest axis, then recurse.
    ///
    /// A leaf with at most one entity, no extent wider than the minimum cell,
    /// or whose entities would all land in one bucket stays a leaf. Branches
    /// are left untouched.
    pub(crate) fn subdivide<A: Adapter<E>>(&mut self, adapter: &A, config: &Config) {
        let Self::Leaf(items) = self else {
            return;
        };
        if items.len() <= 1 {
            return;
        }

        let boxes: Vec<Aabb3D> = items.iter().map(|e| adapter.bounds(e)).collect();
        let Some(bounds) = boxes.iter().copied().reduce(|a, b| a.union(&b)) else {
            return;
        };
        let mut axis = Axis::X;
        for candidate in [Axis::Y, Axis::Z] {
            if bounds.extent(candidate) > bounds.extent(axis) {
                axis = candidate;
            }
        }
        let extent = bounds.extent(axis);

        let by_size = usize::try_from(floor_to_isize(extent / config.min_cell_size()))
            .unwrap_or(0)
            .saturating_add(1);
        let divisions = items.len().min(config.max_divisions()).min(by_size);
        if divisions <= 1 {
            return;
        }

        let cell_size = extent / (divisions - 1) as f64;
        let mut branch = Branch {
            axis,
            origin: bounds.min(axis) - cell_size / 2.0,
            cell_size,
            reach: 0.0,
            children: Box::default(),
        };

        let mut buckets: Vec<Vec<E>> = (0..divisions).map(|_| Vec::new()).collect();
        for (e, b) in items.iter().zip(&boxes) {
            let p = adapter.position_in(axis, e);
            check_projection(b, axis, p);
            branch.widen_reach(b, p);
            buckets[branch.bucket_of_in(p, divisions)].push(*e);
        }

        if buckets.iter().filter(|b| !b.is_empty()).count() <= 1 {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                entities = items.len(),
                ?axis,
                "all entities share one bucket; keeping leaf"
            );
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            entities = items.len(),
            ?axis,
            divisions,
            cell_size,
            "subdividing leaf"
        );

        branch.children = buckets
            .into_iter()
            .map(|bucket| {
                if bucket.is_empty() {
                    None
                } else {
                    let mut child = Self::Leaf(bucket);
                    child.subdivide(adapter, config);
                    Some(child)
                }
            })
            .collect();
        *self = Self::Branch(branch);
    }

    /// Collapse repeated handles within each leaf, keeping first occurrences.
    pub(crate) fn dedup_leaves(&mut self) {
        match self {
            Self::Leaf(items) => {
                let mut kept = 0;
                for i in 0..items.len() {
                    if !items[..kept].contains(&items[i]) {
                        items.swap(kept, i);
                        kept += 1;
                    }
                }
                items.truncate(kept);
            }
            Self::Branch(branch) => {
                for child in branch.children.iter_mut().flatten() {
                    child.dedup_leaves();
                }
            }
        }
    }

    pub(crate) fn add<A: Adapter<E>>(&mut self, entity: E, adapter: &A, config: &Config) {
        match self {
            Self::Leaf(items) => {
                items.push(entity);
                if items.len() > config.max_leaf_population() {
                    self.subdivide(adapter, config);
                }
            }
            Self::Branch(branch) => {
                let b = adapter.bounds(&entity);
                let p = adapter.position_in(branch.axis, &entity);
                check_projection(&b, branch.axis, p);
                branch.widen_reach(&b, p);
                let i = branch.bucket_of(p);
                branch.children[i]
                    .get_or_insert_with(Self::new)
                    .add(entity, adapter, config);
            }
        }
    }

    /// Remove one occurrence of `entity`. Returns whether anything was removed.
    ///
    /// The bucket the projection maps to is searched first; if the entity is
    /// not found there every other child is asked too.
    pub(crate) fn remove<A: Adapter<E>>(&mut self, entity: &E, adapter: &A) -> bool {
        match self {
            Self::Leaf(items) => match items.iter().position(|e| e == entity) {
                Some(pos) => {
                    items.remove(pos);
                    true
                }
                None => false,
            },
            Self::Branch(branch) => {
                let owner = branch.bucket_of(adapter.position_in(branch.axis, entity));
                if let Some(child) = branch.children[owner].as_mut()
                    && child.remove(entity, adapter)
                {
                    return true;
                }
                branch
                    .children
                    .iter_mut()
                    .enumerate()
                    .filter(|(i, _)| *i != owner)
                    .filter_map(|(_, c)| c.as_mut())
                    .any(|c| c.remove(entity, adapter))
            }
        }
    }

    /// Branch-and-bound search around `point`.
    ///
    /// Starts in the bucket holding the point, then walks outward in both
    /// directions. Each direction stops once the closest a bucket could be
    /// reaches `search.bound()`.
    pub(crate) fn search<A, S>(&self, point: DVec3, search: &mut S, adapter: &A)
    where
        A: Adapter<E>,
        S: Search<E>,
    {
        match self {
            Self::Leaf(items) => {
                for e in items {
                    if !search.wants(e) || !adapter.can_return(e) {
                        continue;
                    }
                    let d2 = adapter.distance_squared(point, e);
                    if d2 < search.bound() {
                        search.accept(*e, d2);
                    }
                }
            }
            Self::Branch(branch) => {
                let p = branch.axis.of(point);
                let n = branch.children.len();
                let center = branch.bucket_of(p);
                branch.search_child(center, point, search, adapter);

                let mut down = center > 0;
                let mut up = center + 1 < n;
                let mut offset = 1;
                while down || up {
                    if down {
                        let i = center - offset;
                        if branch.lower_bound(i, p) >= search.bound() {
                            down = false;
                        } else {
                            branch.search_child(i, point, search, adapter);
                            down = i > 0;
                        }
                    }
                    if up {
                        let i = center + offset;
                        if branch.lower_bound(i, p) >= search.bound() {
                            up = false;
                        } else {
                            branch.search_child(i, point, search, adapter);
                            up = i + 1 < n;
                        }
                    }
                    offset += 1;
                }
            }
        }
    }

    /// Append entities whose bounds intersect `query`.
    pub(crate) fn items_inside<A: Adapter<E>>(&self, query: &Aabb3D, out: &mut Vec<E>, adapter: &A) {
        match self {
            Self::Leaf(items) => {
                for e in items {
                    if adapter.bounds(e).intersects(query) {
                        out.push(*e);
                    }
                }
            }
            Self::Branch(branch) => {
                let widen = branch.reach + branch.pad();
                let first = branch.bucket_of(query.min(branch.axis) - widen);
                let last = branch.bucket_of(query.max(branch.axis) + widen);
                for child in branch.children[first..=last.max(first)].iter().flatten() {
                    child.items_inside(query, out, adapter);
                }
            }
        }
    }

    /// March cells along `ray` over the parameter window `[t_start, t_end]`.
    ///
    /// Returns the closest hit of the first bucket that reports any hit.
    /// Buckets are visited in ray order along the split axis only, so a hit in
    /// a later bucket may still be closer when entities overlap bucket edges.
    pub(crate) fn ray_trace<F>(
        &self,
        ray: &Ray,
        hit_test: &mut F,
        t_start: f64,
        t_end: f64,
        max_range: f64,
    ) -> Option<RayHit<E>>
    where
        F: FnMut(&E, &Ray) -> Option<f64>,
    {
        match self {
            Self::Leaf(items) => {
                let mut best: Option<RayHit<E>> = None;
                for e in items {
                    let Some(t) = hit_test(e, ray) else {
                        continue;
                    };
                    if t >= 0.0 && t <= max_range && best.is_none_or(|b| t < b.t) {
                        best = Some(RayHit { entity: *e, t });
                    }
                }
                best
            }
            Self::Branch(branch) => {
                let o = branch.axis.of(ray.origin);
                let d = branch.axis.of(ray.direction);
                let widen = branch.reach + branch.pad();

                if d == 0.0 {
                    // Parallel to the split planes: there is no marching order
                    // among the covering buckets, so keep the closest of them.
                    let first = branch.bucket_of(o - widen);
                    let last = branch.bucket_of(o + widen);
                    let mut best: Option<RayHit<E>> = None;
                    for child in branch.children[first..=last.max(first)].iter().flatten() {
                        if let Some(hit) = child.ray_trace(ray, hit_test, t_start, t_end, max_range)
                            && best.is_none_or(|b| hit.t < b.t)
                        {
                            best = Some(hit);
                        }
                    }
                    return best;
                }

                let a_start = o + d * t_start;
                let a_end = o + d * t_end;
                let (first, last) = if d > 0.0 {
                    (branch.bucket_of(a_start - widen), branch.bucket_of(a_end + widen))
                } else {
                    (branch.bucket_of(a_start + widen), branch.bucket_of(a_end - widen))
                };

                let mut i = first;
                loop {
                    if let Some(child) = &branch.children[i] {
                        let (lo, hi) = branch.slab(i);
                        let (t_lo, t_hi) = if d > 0.0 {
                            ((lo - o) / d, (hi - o) / d)
                        } else {
                            ((hi - o) / d, (lo - o) / d)
                        };
                        let w0 = max_t(t_start, t_lo);
                        let w1 = min_t(t_end, t_hi);
                        if w0 <= w1
                            && let Some(hit) = child.ray_trace(ray, hit_test, w0, w1, max_range)
                        {
                            return Some(hit);
                        }
                    }
                    if i == last {
                        return None;
                    }
                    i = if d > 0.0 { i + 1 } else { i - 1 };
                }
            }
        }
    }

    pub(crate) fn collect_stats(&self, depth: usize, stats: &mut TreeStats) {
        stats.max_depth = stats.max_depth.max(depth);
        match self {
            Self::Leaf(items) => {
                stats.leaves += 1;
                stats.stored += items.len();
            }
            Self::Branch(branch) => {
                stats.branches += 1;
                for child in branch.children.iter().flatten() {
                    child.collect_stats(depth + 1, stats);
                }
            }
        }
    }
}

impl<E: Copy + PartialEq> Branch<E> {
    #[inline]
    fn bucket_of(&self, p: f64) -> usize {
        self.bucket_of_in(p, self.children.len())
    }

    /// Bucket for projection `p` among `n` buckets, clamped to the ends.
    #[inline]
    fn bucket_of_in(&self, p: f64, n: usize) -> usize {
        let i = floor_to_isize((p - self.origin) / self.cell_size);
        usize::try_from(i).map_or(0, |i| i.min(n - 1))
    }

    #[inline]
    fn pad(&self) -> f64 {
        self.cell_size * SLAB_PAD
    }

    fn widen_reach(&mut self, b: &Aabb3D, p: f64) {
        let below = p - b.min(self.axis);
        let above = b.max(self.axis) - p;
        self.reach = max_t(self.reach, max_t(below, above));
    }

    /// Range along the split axis an entity stored in bucket `i` can occupy.
    ///
    /// The outermost buckets are open-ended, since entities added after the
    /// split may project beyond the original extent and are clamped into them.
    fn slab(&self, i: usize) -> (f64, f64) {
        let widen = self.reach + self.pad();
        let lo = if i == 0 {
            f64::NEG_INFINITY
        } else {
            self.origin + i as f64 * self.cell_size - widen
        };
        let hi = if i + 1 == self.children.len() {
            f64::INFINITY
        } else {
            self.origin + (i + 1) as f64 * self.cell_size + widen
        };
        (lo, hi)
    }

    /// Smallest squared distance along the split axis from `p` to anything in
    /// bucket `i`.
    fn lower_bound(&self, i: usize, p: f64) -> f64 {
        let (lo, hi) = self.slab(i);
        let gap = if p < lo {
            lo - p
        } else if p > hi {
            p - hi
        } else {
            0.0
        };
        gap * gap
    }

    fn search_child<A, S>(&self, i: usize, point: DVec3, search: &mut S, adapter: &A)
    where
        A: Adapter<E>,
        S: Search<E>,
    {
        if let Some(child) = &self.children[i] {
            child.search(point, search, adapter);
        }
    }
}

/// Debug-build check that the adapter's projection lies within the bounds it
/// reports, with slack for rounding in derived positions such as centroids.
#[inline]
fn check_projection(b: &Aabb3D, axis: Axis, p: f64) {
    let scale = max_t(max_t(b.max(axis), -b.min(axis)), 1.0);
    let slack = scale * 1e-9;
    debug_assert!(
        p.is_nan() || (b.min(axis) - slack <= p && p <= b.max(axis) + slack),
        "adapter position_in ({p}) lies outside the entity's {axis:?} bounds [{}, {}]",
        b.min(axis),
        b.max(axis)
    );
}

/// Accumulator driven by [`Node::search`].
pub(crate) trait Search<E> {
    /// Squared distance an entity must be strictly below to be accepted.
    fn bound(&self) -> f64;

    /// Cheap pre-filter applied before the distance is computed.
    fn wants(&self, entity: &E) -> bool {
        let _ = entity;
        true
    }

    fn accept(&mut self, entity: E, distance_squared: f64);
}

/// Single nearest entity with a shrinking bound.
pub(crate) struct Nearest<E> {
    pub(crate) ignore: Option<E>,
    pub(crate) best: Option<E>,
    pub(crate) best_distance_squared: f64,
}

impl<E: Copy + PartialEq> Search<E> for Nearest<E> {
    fn bound(&self) -> f64 {
        self.best_distance_squared
    }

    fn wants(&self, entity: &E) -> bool {
        self.ignore.as_ref() != Some(entity)
    }

    fn accept(&mut self, entity: E, distance_squared: f64) {
        self.best = Some(entity);
        self.best_distance_squared = distance_squared;
    }
}

/// Every entity strictly within a fixed radius, appended to `out`.
pub(crate) struct Within<'o, E> {
    pub(crate) radius_squared: f64,
    pub(crate) out: &'o mut Vec<E>,
}

impl<E: Copy + PartialEq> Search<E> for Within<'_, E> {
    fn bound(&self) -> f64 {
        self.radius_squared
    }

    fn accept(&mut self, entity: E, _distance_squared: f64) {
        self.out.push(entity);
    }
}

pub(crate) struct Candidate<E> {
    pub(crate) entity: E,
    pub(crate) distance_squared: f64,
}

impl<E> PartialEq for Candidate<E> {
    fn eq(&self, other: &Self) -> bool {
        self.distance_squared == other.distance_squared
    }
}

impl<E> Eq for Candidate<E> {}

impl<E> PartialOrd for Candidate<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Candidate<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: the farthest kept candidate sits on top.
        self.distance_squared
            .partial_cmp(&other.distance_squared)
            .unwrap_or(Ordering::Equal)
    }
}

/// The `k` nearest entities; the bound is the radius until `k` are found, then
/// the farthest kept candidate.
pub(crate) struct KNearest<E> {
    pub(crate) k: usize,
    pub(crate) radius_squared: f64,
    pub(crate) heap: BinaryHeap<Candidate<E>>,
}

impl<E: Copy + PartialEq> Search<E> for KNearest<E> {
    fn bound(&self) -> f64 {
        match self.heap.peek() {
            Some(top) if self.heap.len() >= self.k => top.distance_squared,
            _ => self.radius_squared,
        }
    }

    fn accept(&mut self, entity: E, distance_squared: f64) {
        self.heap.push(Candidate {
            entity,
            distance_squared,
        });
        if self.heap.len() > self.k {
            self.heap.pop();
        }
    }
}
