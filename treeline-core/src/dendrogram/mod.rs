//! Single-linkage dendrogram assembly.
//!
//! The spanning-tree edges encode the complete single-linkage hierarchy: the
//! assembler remaps them to original point ids, sorts them into level order
//! (the total edge order), and merges point clusters with a union-find that
//! tracks each cluster's newest edge. The edge that next absorbs a cluster
//! is the parent of the cluster's current top, so parents always carry a
//! larger index than their children and the final edge is the root. Leaf
//! parents come straight from the construction trace: each point's parent is
//! the round-1 edge that absorbed its singleton component.

mod union_find;


use crate::boruvka::BoruvkaOutcome;
use crate::bvh::Bvh;
use crate::edge::WeightedEdge;
use crate::error::{Result, TreelineError};
use crate::memory::try_filled_vec;

use self::union_find::{DisjointSet, NO_TOP};

/// A single-linkage dendrogram over N points.
///
/// The hierarchy is indexed in one space of length 2N−1: entries `0..N-1`
/// are merge edges in level order, entries `N-1..2N-2` are the original
/// points. `parents` gives, for every entry, the index of the edge that
/// absorbs it next, with [`Dendrogram::ROOT`] marking the final merge.
/// Parents always have larger edge indices than their children, so a single
/// forward pass visits children before parents.
#[derive(Clone, Debug, PartialEq)]
pub struct Dendrogram {
    edges: Vec<WeightedEdge>,
    parents: Vec<u32>,
    parent_heights: Vec<f32>,
    chain_offsets: Vec<u32>,
    chain_levels: Vec<u32>,
}

impl Dendrogram {
    /// Parent sentinel for the final merge.
    pub const ROOT: u32 = u32::MAX;

    /// Returns the number of points in the hierarchy.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.edges.len() + 1
    }

    /// Returns the merge edges in level order.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &[WeightedEdge] { &self.edges }

    /// Returns the parent array over edges then points (length 2N−1).
    #[must_use]
    #[rustfmt::skip]
    pub fn parents(&self) -> &[u32] { &self.parents }

    /// Returns the merge height of every edge.
    #[must_use]
    #[rustfmt::skip]
    pub fn parent_heights(&self) -> &[f32] { &self.parent_heights }

    /// Returns the prefix offsets delimiting equal-height chains.
    #[must_use]
    #[rustfmt::skip]
    pub fn chain_offsets(&self) -> &[u32] { &self.chain_offsets }

    /// Returns each chain's distance from the root chain.
    #[must_use]
    #[rustfmt::skip]
    pub fn chain_levels(&self) -> &[u32] { &self.chain_levels }

    /// Returns the parent edge of `edge`, or `None` for the root.
    #[must_use]
    pub fn edge_parent(&self, edge: usize) -> Option<usize> {
        let parent = self.parents[edge];
        (parent != Self::ROOT).then_some(parent as usize)
    }

    /// Returns the edge at which `point` first merges into the hierarchy.
    #[must_use]
    pub fn point_parent(&self, point: usize) -> usize {
        self.parents[self.edges.len() + point] as usize
    }
}

/// Builds the dendrogram from the Borůvka outcome.
pub(crate) fn assemble(bvh: &Bvh, outcome: BoruvkaOutcome) -> Result<Dendrogram> {
    let point_count = bvh.len();
    let edge_count = point_count - 1;

    let vertex_parents =
        outcome
            .vertex_parents
            .ok_or(TreelineError::InvariantViolation {
                invariant: "dendrogram assembly requires the construction trace",
            })?;

    // Remap to original point ids and canonicalise the endpoints.
    let remapped: Vec<WeightedEdge> = outcome
        .edges
        .iter()
        .map(|edge| {
            WeightedEdge::new(
                bvh.point_id(edge.source as usize),
                bvh.point_id(edge.target as usize),
                edge.weight,
            )
        })
        .collect();

    // Level order: sort into the total edge order, remembering where every
    // emission slot ended up so the trace can be translated.
    let mut order: Vec<u32> = (0..edge_count as u32).collect();
    order.sort_unstable_by(|&left, &right| remapped[left as usize].cmp(&remapped[right as usize]));
    let mut new_of_old = vec![0_u32; edge_count];
    for (new_index, &old_index) in order.iter().enumerate() {
        new_of_old[old_index as usize] = new_index as u32;
    }
    let edges: Vec<WeightedEdge> = order
        .iter()
        .map(|&old_index| remapped[old_index as usize])
        .collect();

    let mut parents = try_filled_vec(Dendrogram::ROOT, 2 * point_count - 1, "dendrogram parents")?;

    let mut clusters = DisjointSet::new(point_count);
    for (index, edge) in edges.iter().enumerate() {
        let left = clusters.find(edge.source());
        let right = clusters.find(edge.target());
        if left == right {
            return Err(TreelineError::InvariantViolation {
                invariant: "spanning edges must be acyclic",
            });
        }
        for side in [left, right] {
            let top = clusters.component_top[side];
            if top != NO_TOP {
                parents[top as usize] = index as u32;
            }
        }
        let root = clusters.union(left, right);
        clusters.component_top[root] = index as u32;
    }

    for (point, &old_slot) in vertex_parents.iter().enumerate() {
        parents[edge_count + point] = new_of_old[old_slot as usize];
    }

    let parent_heights: Vec<f32> = edges.iter().map(WeightedEdge::weight).collect();
    let (chain_offsets, chain_levels) = build_chains(&edges, &parents);

    Ok(Dendrogram {
        edges,
        parents,
        parent_heights,
        chain_offsets,
        chain_levels,
    })
}

/// Groups the level-ordered edges into equal-height chains: a chain extends
/// while each edge's parent is the next edge at the same height (one
/// dendrogram rung). Levels count chain hops from the root chain.
fn build_chains(edges: &[WeightedEdge], parents: &[u32]) -> (Vec<u32>, Vec<u32>) {
    let edge_count = edges.len();

    let mut offsets = vec![0_u32];
    for edge in 1..edge_count {
        let continues = parents[edge - 1] == edge as u32
            && edges[edge - 1].weight() == edges[edge].weight();
        if !continues {
            offsets.push(edge as u32);
        }
    }
    offsets.push(edge_count as u32);

    let chain_count = offsets.len() - 1;
    let mut chain_of = vec![0_u32; edge_count];
    for chain in 0..chain_count {
        for edge in offsets[chain]..offsets[chain + 1] {
            chain_of[edge as usize] = chain as u32;
        }
    }

    // Parents carry larger indices, so a reverse sweep resolves parent
    // chains before their children.
    let mut levels = vec![0_u32; chain_count];
    for chain in (0..chain_count).rev() {
        let last_edge = offsets[chain + 1] - 1;
        let parent = parents[last_edge as usize];
        levels[chain] = if parent == Dendrogram::ROOT {
            0
        } else {
            levels[chain_of[parent as usize] as usize] + 1
        };
    }

    (offsets, levels)
}
