//! Pluggable distance metrics for the Borůvka core.
//!
//! The round kernel is generic over [`Metric`] and monomorphised, so metric
//! dispatch costs nothing in the hot loop. A metric provides the pairwise
//! distance between two leaf slots and a cheap lower bound on the distance
//! from a query slot to anything inside a bounding box.

use crate::bvh::{AabbView, Bvh, point_to_bounds_distance};

/// A symmetric, non-negative distance over the leaf slots of a [`Bvh`].
pub(crate) trait Metric: Sync {
    /// Distance between the points at two leaf slots.
    fn distance(&self, left: usize, right: usize) -> f32;

    /// Lower bound on `distance(query, j)` for any `j` inside `bounds`.
    fn lower_bound(&self, bounds: AabbView<'_>, query: usize) -> f32;
}

/// The plain L2 metric.
pub(crate) struct Euclidean<'a> {
    bvh: &'a Bvh,
}

impl<'a> Euclidean<'a> {
    pub(crate) fn new(bvh: &'a Bvh) -> Self {
        Self { bvh }
    }
}

impl Metric for Euclidean<'_> {
    fn distance(&self, left: usize, right: usize) -> f32 {
        self.bvh.slot_distance(left, right)
    }

    fn lower_bound(&self, bounds: AabbView<'_>, query: usize) -> f32 {
        point_to_bounds_distance(self.bvh.point(query), bounds)
    }
}

/// Mutual reachability: `max(core[i], core[j], euclidean(i, j))`.
///
/// The box lower bound can only account for the query side's core distance;
/// the other endpoint's core distance cannot be cheaply bounded and is
/// ignored, which keeps the bound admissible.
pub(crate) struct MutualReachability<'a> {
    bvh: &'a Bvh,
    core_distances: &'a [f32],
}

impl<'a> MutualReachability<'a> {
    pub(crate) fn new(bvh: &'a Bvh, core_distances: &'a [f32]) -> Self {
        debug_assert_eq!(core_distances.len(), bvh.len());
        Self {
            bvh,
            core_distances,
        }
    }
}

impl Metric for MutualReachability<'_> {
    fn distance(&self, left: usize, right: usize) -> f32 {
        self.bvh
            .slot_distance(left, right)
            .max(self.core_distances[left])
            .max(self.core_distances[right])
    }

    fn lower_bound(&self, bounds: AabbView<'_>, query: usize) -> f32 {
        point_to_bounds_distance(self.bvh.point(query), bounds).max(self.core_distances[query])
    }
}
