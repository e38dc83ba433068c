//! Find-component-nearest-neighbour round kernel.
//!
//! For every component the kernel finds the cheapest edge leaving it. One
//! task per leaf descends the hierarchy nearest-first, pruning subtrees that
//! lie entirely in the leaf's own component (by node label), subtrees whose
//! metric lower bound cannot beat the pruning distance, and, when the
//! lower-bound cache is enabled, whole leaves whose carried bound already
//! exceeds the component's current best.
//!
//! The kernel runs in two bulk-synchronous phases: traversal fills each
//! leaf's private best candidate, then the candidates are combined into the
//! per-component slots under the total edge order. Pruning against shared
//! state is strict (`>`), so a candidate tied with the bound is always
//! visited and the surviving winner is independent of thread scheduling.

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicU32, Ordering};

use rayon::prelude::*;

use crate::bvh::Bvh;
use crate::edge::{AtomicDistance, CandidateSlot, DirectedEdge, candidate_cmp};
use crate::error::TreelineError;
use crate::memory::try_vec_from_fn;
use crate::metric::Metric;

/// Optimisation toggles for the round kernel.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FcnnOptions {
    /// Share each component's shrinking search radius between its leaves.
    pub(crate) shared_radii: bool,
    /// Carry per-leaf distance lower bounds across rounds.
    pub(crate) lower_bounds: bool,
}

/// Mutable state of one Borůvka round, reused across rounds.
pub(crate) struct RoundState {
    /// Best outgoing candidate per component, packed for atomic reduction.
    pub(crate) component_out_edges: Vec<CandidateSlot>,
    /// Weight of each component's best candidate (pruning cache).
    pub(crate) weights: Vec<AtomicDistance>,
    /// Upper bound on each component's distance to its nearest neighbour.
    pub(crate) radii: Vec<AtomicDistance>,
    /// Each leaf's private best candidate; persists across rounds as the
    /// lower-bound witness.
    pub(crate) leaf_best: Vec<DirectedEdge>,
    /// Per-leaf lower bound on the distance to any other component.
    pub(crate) lower_bounds: Vec<f32>,
}

impl RoundState {
    pub(crate) fn try_new(leaf_count: usize) -> Result<Self, TreelineError> {
        Ok(Self {
            component_out_edges: try_vec_from_fn(leaf_count, "component out-edges", |_| {
                CandidateSlot::empty()
            })?,
            weights: try_vec_from_fn(leaf_count, "component weights", |_| {
                AtomicDistance::infinite()
            })?,
            radii: try_vec_from_fn(leaf_count, "component radii", |_| {
                AtomicDistance::infinite()
            })?,
            leaf_best: try_vec_from_fn(leaf_count, "leaf candidates", |_| DirectedEdge::UNSET)?,
            lower_bounds: try_vec_from_fn(leaf_count, "lower bounds", |_| 0.0)?,
        })
    }

    /// Resets the per-round shared state to "no candidate". The per-leaf
    /// candidates and lower bounds deliberately survive between rounds.
    pub(crate) fn reset_round(&self) {
        self.component_out_edges
            .par_iter()
            .for_each(CandidateSlot::reset);
        self.weights.par_iter().for_each(AtomicDistance::reset);
        self.radii.par_iter().for_each(AtomicDistance::reset);
    }
}

/// Runs one FCNN round: after return, `component_out_edges[c]` holds the
/// minimum outgoing edge of every current component `c` under the total edge
/// order.
pub(crate) fn find_component_nearest_neighbours<M: Metric>(
    bvh: &Bvh,
    labels: &[AtomicU32],
    metric: &M,
    state: &mut RoundState,
    options: FcnnOptions,
) {
    traverse_leaves(bvh, labels, metric, state, options);
    combine_candidates(labels, state, bvh.len());
}

fn traverse_leaves<M: Metric>(
    bvh: &Bvh,
    labels: &[AtomicU32],
    metric: &M,
    state: &mut RoundState,
    options: FcnnOptions,
) {
    let weights = &state.weights;
    let radii = &state.radii;

    state
        .leaf_best
        .par_iter_mut()
        .zip(state.lower_bounds.par_iter_mut())
        .enumerate()
        .for_each_init(
            || Vec::with_capacity(64),
            |stack, (leaf, (best, lower))| {
                let component = labels[leaf].load(Ordering::Relaxed);

                // A carried candidate whose target has been absorbed into our
                // own component no longer witnesses anything.
                if best.is_set()
                    && labels[best.target as usize].load(Ordering::Relaxed) == component
                {
                    *best = DirectedEdge::UNSET;
                    *lower = 0.0;
                }

                let shared_weight = weights[component as usize].load();
                if options.lower_bounds && *lower > shared_weight {
                    // Nothing reachable from this leaf can improve the
                    // component's current best; the carried candidate stands.
                    return;
                }

                let mut pruning_distance = shared_weight;
                if best.is_set() && best.weight < pruning_distance {
                    pruning_distance = best.weight;
                }

                let radius = &radii[component as usize];
                search_from_root(
                    bvh,
                    labels,
                    metric,
                    leaf,
                    component,
                    options.shared_radii,
                    stack,
                    best,
                    &mut pruning_distance,
                    radius,
                );

                weights[component as usize].fetch_min(pruning_distance);
                if options.lower_bounds {
                    // Sound even when the shared radius cut the traversal
                    // short: everything skipped was at least the bound in
                    // force at the time, and both bounds only shrink.
                    *lower = pruning_distance.min(radius.load());
                }
            },
        );
}

#[allow(clippy::too_many_arguments)]
fn search_from_root<M: Metric>(
    bvh: &Bvh,
    labels: &[AtomicU32],
    metric: &M,
    leaf: usize,
    component: u32,
    shared_radii: bool,
    stack: &mut Vec<(u32, f32)>,
    best: &mut DirectedEdge,
    pruning_distance: &mut f32,
    radius: &AtomicDistance,
) {
    let bound = |local: f32| {
        if shared_radii {
            local.min(radius.load())
        } else {
            local
        }
    };

    stack.clear();
    let root = bvh.root();
    let root_lower = metric.lower_bound(bvh.bounds(root), leaf);
    if root_lower > bound(*pruning_distance) {
        return;
    }
    stack.push((root, root_lower));

    while let Some((node, node_lower)) = stack.pop() {
        if node_lower > bound(*pruning_distance) {
            continue;
        }

        let mut deferred: [Option<(u32, f32)>; 2] = [None, None];
        for child in bvh.children(node) {
            if labels[child as usize].load(Ordering::Relaxed) == component {
                // The whole subtree lies in our component; no edge leaves
                // the component through here.
                continue;
            }
            if bvh.is_leaf(child) {
                let distance = metric.distance(leaf, child as usize);
                let candidate = DirectedEdge {
                    source: leaf as u32,
                    target: child,
                    weight: distance,
                };
                if candidate_cmp(&candidate, best) == CmpOrdering::Less {
                    *best = candidate;
                    if distance < *pruning_distance {
                        *pruning_distance = distance;
                        if shared_radii {
                            radius.fetch_min(distance);
                        }
                    }
                }
            } else {
                let child_lower = metric.lower_bound(bvh.bounds(child), leaf);
                if child_lower <= bound(*pruning_distance) {
                    if deferred[0].is_none() {
                        deferred[0] = Some((child, child_lower));
                    } else {
                        deferred[1] = Some((child, child_lower));
                    }
                }
            }
        }

        // Push the farther subtree first so the nearer one pops first.
        match deferred {
            [Some(first), Some(second)] => {
                if first.1 <= second.1 {
                    stack.push(second);
                    stack.push(first);
                } else {
                    stack.push(first);
                    stack.push(second);
                }
            }
            [Some(only), None] => stack.push(only),
            _ => {}
        }
    }
}

fn combine_candidates(labels: &[AtomicU32], state: &RoundState, leaf_count: usize) {
    let leaf_best = &state.leaf_best;
    (0..leaf_count).into_par_iter().for_each(|leaf| {
        let candidate = leaf_best[leaf];
        if !candidate.is_set() {
            return;
        }
        let component = labels[leaf].load(Ordering::Relaxed);
        if labels[candidate.target as usize].load(Ordering::Relaxed) == component {
            // Stale carried candidate; its target merged into us.
            return;
        }
        state.component_out_edges[component as usize].merge(leaf as u32, candidate, leaf_best);
    });
}
