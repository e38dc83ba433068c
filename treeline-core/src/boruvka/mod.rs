//! Parallel Borůvka rounds over the hierarchy.
//!
//! Each round finds every component's cheapest outgoing edge, appends the
//! resulting merges to the edge list, and contracts the component labels.
//! Borůvka guarantees at least a halving of the component count per round,
//! so at most ⌈log₂ N⌉ rounds run. The work inside a round is bulk
//! synchronous: label reduction, the search kernel, emission, and the label
//! update each complete before the next sub-step starts.

pub(crate) mod fcnn;
pub(crate) mod labels;
pub(crate) mod union;

#[cfg(test)]
mod property;

use std::sync::atomic::AtomicU32;

use rayon::prelude::*;

use crate::bvh::Bvh;
use crate::edge::DirectedEdge;
use crate::error::{Result, TreelineError};
use crate::memory::{try_filled_vec, try_vec_from_fn};
use crate::metric::Metric;

use self::fcnn::{FcnnOptions, RoundState, find_component_nearest_neighbours};
use self::labels::reduce_labels;
use self::union::{emit_edges, update_labels};

/// Sentinel for an unassigned vertex-parent slot.
pub(crate) const NO_EDGE: u32 = u32::MAX;

/// Driver configuration resolved from the public builder.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BoruvkaConfig {
    pub(crate) shared_radii: bool,
    pub(crate) lower_bounds: bool,
    /// Record the construction trace needed by the dendrogram assembler.
    pub(crate) record_trace: bool,
}

/// Everything the finalisation passes need from the rounds.
pub(crate) struct BoruvkaOutcome {
    /// Spanning-tree edges in emission order, in leaf-slot space.
    pub(crate) edges: Vec<DirectedEdge>,
    /// Prefix offsets delimiting the edges appended per round.
    pub(crate) edge_offsets: Vec<usize>,
    /// Per original point id, the emission slot of the round-1 edge that
    /// absorbed the point's singleton component.
    pub(crate) vertex_parents: Option<Vec<u32>>,
}

/// Computes per-slot core distances (`k`-th nearest neighbour, the point
/// itself counting as the first).
pub(crate) fn compute_core_distances(bvh: &Bvh, neighbourhood_size: usize) -> Vec<f32> {
    (0..bvh.len())
        .into_par_iter()
        .map(|slot| bvh.kth_neighbour_distance(slot, neighbourhood_size))
        .collect()
}

/// Runs Borůvka rounds until one component remains.
pub(crate) fn run_boruvka<M: Metric>(
    bvh: &Bvh,
    metric: &M,
    config: BoruvkaConfig,
) -> Result<BoruvkaOutcome> {
    let leaf_count = bvh.len();
    let tree_parents = bvh.compute_parents();

    let labels: Vec<AtomicU32> = try_vec_from_fn(bvh.node_count(), "labels", |node| {
        AtomicU32::new(if node < leaf_count { node as u32 } else { 0 })
    })?;
    let mut state = RoundState::try_new(leaf_count)?;

    let mut edges: Vec<DirectedEdge> = Vec::new();
    edges
        .try_reserve_exact(leaf_count - 1)
        .map_err(|_| TreelineError::OutOfMemory {
            resource: "spanning-tree edges",
            requested_bytes: ((leaf_count - 1) * std::mem::size_of::<DirectedEdge>()) as u64,
        })?;
    let mut edge_offsets = vec![0_usize];
    let mut vertex_parents = if config.record_trace {
        Some(try_filled_vec(NO_EDGE, leaf_count, "vertex parents")?)
    } else {
        None
    };

    let options = FcnnOptions {
        shared_radii: config.shared_radii,
        lower_bounds: config.lower_bounds,
    };

    let mut components = leaf_count;
    let mut round = 0_u32;
    while components > 1 {
        round += 1;

        reduce_labels(&tree_parents, &labels, leaf_count);
        state.reset_round();
        find_component_nearest_neighbours(bvh, &labels, metric, &mut state, options);

        let emitted = emit_edges(&labels, &state, leaf_count);
        if emitted.is_empty() {
            return Err(TreelineError::InvariantViolation {
                invariant: "every round must merge at least one component pair",
            });
        }

        if round == 1 {
            if let Some(vertex_parents) = vertex_parents.as_mut() {
                // Round-1 components are singleton leaf slots: record for
                // every point the slot of the edge that absorbed it, covering
                // both halves of each mutual pair.
                for (index, merge) in emitted.iter().enumerate() {
                    let slot = index as u32;
                    vertex_parents[bvh.point_id(merge.component as usize) as usize] = slot;
                    if merge.mutual {
                        vertex_parents[bvh.point_id(merge.partner as usize) as usize] = slot;
                    }
                }
            }
        }

        edges.extend(emitted.iter().map(|merge| merge.edge));
        edge_offsets.push(edges.len());

        let remaining = update_labels(&labels, &emitted, leaf_count);
        tracing::debug!(
            round,
            components = remaining,
            emitted = emitted.len(),
            "boruvka round"
        );
        if remaining >= components {
            return Err(TreelineError::InvariantViolation {
                invariant: "the component count must decrease every round",
            });
        }
        components = remaining;
    }

    if edges.len() != leaf_count - 1 {
        return Err(TreelineError::InvariantViolation {
            invariant: "a spanning tree must contain exactly n - 1 edges",
        });
    }
    if let Some(vertex_parents) = vertex_parents.as_ref() {
        if vertex_parents.iter().any(|&slot| slot == NO_EDGE) {
            return Err(TreelineError::InvariantViolation {
                invariant: "every point must be absorbed by a round-1 edge",
            });
        }
    }

    Ok(BoruvkaOutcome {
        edges,
        edge_offsets,
        vertex_parents,
    })
}
