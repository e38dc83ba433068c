//! Bounding-volume hierarchy over the input points.
//!
//! The tree stores N leaves and N−1 internal nodes in one index space of
//! length 2N−1: leaves occupy `[0, N)` (one per point, permuted into spatial
//! order) and internal nodes occupy `[N, 2N−1)` with the root at `N`.
//! Internal nodes are allocated in preorder, so every subtree owns a
//! contiguous id block. The build is a deterministic median split along the
//! widest axis of each node's bounds.

use std::collections::BinaryHeap;

use crate::points::PointSet;

/// Parent sentinel for the root node.
pub(crate) const ROOT_PARENT: u32 = u32::MAX;

/// A borrowed view of a node's axis-aligned bounding box.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AabbView<'a> {
    pub(crate) min: &'a [f32],
    pub(crate) max: &'a [f32],
}

/// Euclidean distance between two coordinate rows.
pub(crate) fn point_distance(left: &[f32], right: &[f32]) -> f32 {
    let mut sum = 0.0_f64;
    for (&l, &r) in left.iter().zip(right.iter()) {
        let diff = f64::from(l) - f64::from(r);
        sum += diff * diff;
    }
    sum.sqrt() as f32
}

/// Distance from a point to an axis-aligned box; zero inside the box.
pub(crate) fn point_to_bounds_distance(point: &[f32], bounds: AabbView<'_>) -> f32 {
    let mut sum = 0.0_f64;
    for (axis, &value) in point.iter().enumerate() {
        let gap = if value < bounds.min[axis] {
            f64::from(bounds.min[axis]) - f64::from(value)
        } else if value > bounds.max[axis] {
            f64::from(value) - f64::from(bounds.max[axis])
        } else {
            0.0
        };
        sum += gap * gap;
    }
    sum.sqrt() as f32
}

pub(crate) struct Bvh {
    len: usize,
    dim: usize,
    /// Point coordinates permuted into leaf-slot order.
    coords: Vec<f32>,
    /// Leaf slot → original point id.
    leaf_to_point: Vec<u32>,
    bounds_min: Vec<f32>,
    bounds_max: Vec<f32>,
    /// Children of internal node `n + i` at index `i`.
    children: Vec<[u32; 2]>,
}

impl Bvh {
    /// Builds the hierarchy; requires at least two points.
    pub(crate) fn build(points: &PointSet) -> Self {
        let len = points.len();
        let dim = points.dim();
        debug_assert!(len >= 2, "a hierarchy needs at least two points");

        let node_count = 2 * len - 1;
        let mut perm: Vec<u32> = (0..len as u32).collect();
        let mut bounds_min = vec![0.0_f32; node_count * dim];
        let mut bounds_max = vec![0.0_f32; node_count * dim];
        let mut children = vec![[0_u32; 2]; len - 1];

        {
            let mut builder = TreeBuilder {
                points,
                dim,
                leaf_count: len,
                perm: &mut perm,
                bounds_min: &mut bounds_min,
                bounds_max: &mut bounds_max,
                children: &mut children,
            };
            builder.build_range(0, len, len);
        }

        let mut coords = Vec::with_capacity(len * dim);
        for &point in &perm {
            coords.extend_from_slice(points.point(point as usize));
        }

        Self {
            len,
            dim,
            coords,
            leaf_to_point: perm,
            bounds_min,
            bounds_max,
            children,
        }
    }

    #[rustfmt::skip]
    pub(crate) fn len(&self) -> usize { self.len }

    #[rustfmt::skip]
    pub(crate) fn dim(&self) -> usize { self.dim }

    pub(crate) fn node_count(&self) -> usize {
        2 * self.len - 1
    }

    pub(crate) fn root(&self) -> u32 {
        self.len as u32
    }

    pub(crate) fn is_leaf(&self, node: u32) -> bool {
        (node as usize) < self.len
    }

    pub(crate) fn children(&self, node: u32) -> [u32; 2] {
        self.children[node as usize - self.len]
    }

    pub(crate) fn bounds(&self, node: u32) -> AabbView<'_> {
        let start = node as usize * self.dim;
        AabbView {
            min: &self.bounds_min[start..start + self.dim],
            max: &self.bounds_max[start..start + self.dim],
        }
    }

    /// Coordinates of the point stored at `slot`.
    pub(crate) fn point(&self, slot: usize) -> &[f32] {
        &self.coords[slot * self.dim..(slot + 1) * self.dim]
    }

    /// Original id of the point stored at `slot`.
    pub(crate) fn point_id(&self, slot: usize) -> u32 {
        self.leaf_to_point[slot]
    }

    /// Euclidean distance between the points at two leaf slots.
    pub(crate) fn slot_distance(&self, left: usize, right: usize) -> f32 {
        point_distance(self.point(left), self.point(right))
    }

    /// Builds the node → parent table; the root's parent is [`ROOT_PARENT`].
    pub(crate) fn compute_parents(&self) -> Vec<u32> {
        let mut parents = vec![ROOT_PARENT; self.node_count()];
        for (index, pair) in self.children.iter().enumerate() {
            let node = (self.len + index) as u32;
            parents[pair[0] as usize] = node;
            parents[pair[1] as usize] = node;
        }
        parents
    }

    /// Distance from the point at `slot` to its `k`-th nearest neighbour,
    /// the point itself counting as the first (so `k == 1` returns zero).
    ///
    /// Ties are resolved by `(distance, slot)`, making the result
    /// deterministic for coincident points.
    pub(crate) fn kth_neighbour_distance(&self, slot: usize, k: usize) -> f32 {
        debug_assert!(k >= 1 && k <= self.len);
        let query = self.point(slot);

        let mut best: BinaryHeap<SlotNeighbour> = BinaryHeap::with_capacity(k + 1);
        let mut stack: Vec<(u32, f32)> = Vec::with_capacity(64);
        stack.push((self.root(), 0.0));

        while let Some((node, lower)) = stack.pop() {
            if best.len() == k && lower > best_bound(&best) {
                continue;
            }
            if self.is_leaf(node) {
                let distance = point_distance(query, self.point(node as usize));
                best.push(SlotNeighbour {
                    distance,
                    slot: node,
                });
                if best.len() > k {
                    best.pop();
                }
                continue;
            }
            let [left, right] = self.children(node);
            let left_lower = point_to_bounds_distance(query, self.bounds(left));
            let right_lower = point_to_bounds_distance(query, self.bounds(right));
            // Push the farther child first so the nearer child pops first.
            if left_lower <= right_lower {
                stack.push((right, right_lower));
                stack.push((left, left_lower));
            } else {
                stack.push((left, left_lower));
                stack.push((right, right_lower));
            }
        }

        best_bound(&best)
    }
}

fn best_bound(best: &BinaryHeap<SlotNeighbour>) -> f32 {
    best.peek().map_or(f32::INFINITY, |top| top.distance)
}

/// Neighbour candidate ordered by `(distance, slot)` for deterministic ties.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SlotNeighbour {
    distance: f32,
    slot: u32,
}

impl Eq for SlotNeighbour {}

impl Ord for SlotNeighbour {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.slot.cmp(&other.slot))
    }
}

impl PartialOrd for SlotNeighbour {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

struct TreeBuilder<'a> {
    points: &'a PointSet,
    dim: usize,
    leaf_count: usize,
    perm: &'a mut [u32],
    bounds_min: &'a mut [f32],
    bounds_max: &'a mut [f32],
    children: &'a mut [[u32; 2]],
}

impl TreeBuilder<'_> {
    /// Builds the subtree over leaf slots `[lo, hi)`; internal nodes for the
    /// range are allocated from the contiguous block starting at
    /// `internal_base`. Returns the subtree root's node id.
    fn build_range(&mut self, lo: usize, hi: usize, internal_base: usize) -> u32 {
        if hi - lo == 1 {
            self.store_bounds(lo, hi, lo);
            return lo as u32;
        }

        let node = internal_base;
        self.store_bounds(lo, hi, node);
        let axis = self.widest_axis(node);

        let mid = lo + (hi - lo) / 2;
        let points = self.points;
        self.perm[lo..hi].select_nth_unstable_by(mid - lo, |a, b| {
            points.point(*a as usize)[axis]
                .total_cmp(&points.point(*b as usize)[axis])
                .then_with(|| a.cmp(b))
        });

        let left = self.build_range(lo, mid, internal_base + 1);
        let right = self.build_range(mid, hi, internal_base + (mid - lo));
        self.children[node - self.leaf_count] = [left, right];
        node as u32
    }

    fn store_bounds(&mut self, lo: usize, hi: usize, node: usize) {
        let start = node * self.dim;
        let first = self.points.point(self.perm[lo] as usize);
        self.bounds_min[start..start + self.dim].copy_from_slice(first);
        self.bounds_max[start..start + self.dim].copy_from_slice(first);
        for &point in &self.perm[lo + 1..hi] {
            let row = self.points.point(point as usize);
            for axis in 0..self.dim {
                let value = row[axis];
                if value < self.bounds_min[start + axis] {
                    self.bounds_min[start + axis] = value;
                }
                if value > self.bounds_max[start + axis] {
                    self.bounds_max[start + axis] = value;
                }
            }
        }
    }

    fn widest_axis(&self, node: usize) -> usize {
        let start = node * self.dim;
        let mut axis = 0;
        let mut widest = f32::NEG_INFINITY;
        for candidate in 0..self.dim {
            let extent = self.bounds_max[start + candidate] - self.bounds_min[start + candidate];
            if extent > widest {
                widest = extent;
                axis = candidate;
            }
        }
        axis
    }
}
