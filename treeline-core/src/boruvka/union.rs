//! Component merge step: edge emission and label updates.
//!
//! Every component with a winner contributes its cheapest outgoing edge.
//! When two components pick each other they necessarily agree on the same
//! undirected edge (both select under the same total order), and only the
//! smaller component id emits it, so each merge appends exactly one edge.
//! Afterwards the winner edges are contracted by iterated hooking (writing
//! the smaller label into both sides' label roots with an atomic minimum)
//! alternated with path-compression sweeps until the mapping is idempotent.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use rayon::prelude::*;

use crate::edge::DirectedEdge;

use super::fcnn::RoundState;

/// One emitted edge: the owning component, its merge partner, whether the
/// pair was mutual, and the edge itself (in leaf-slot space).
#[derive(Clone, Copy, Debug)]
pub(crate) struct EmittedEdge {
    pub(crate) component: u32,
    pub(crate) partner: u32,
    pub(crate) mutual: bool,
    pub(crate) edge: DirectedEdge,
}

/// Collects this round's merge edges, one per component pair, in component
/// order (deterministic slot assignment for the dendrogram trace).
pub(crate) fn emit_edges(
    labels: &[AtomicU32],
    state: &RoundState,
    leaf_count: usize,
) -> Vec<EmittedEdge> {
    (0..leaf_count as u32)
        .into_par_iter()
        .filter_map(|component| {
            if labels[component as usize].load(Ordering::Relaxed) != component {
                return None;
            }
            let edge = state.component_out_edges[component as usize].load(&state.leaf_best)?;
            let partner = labels[edge.target as usize].load(Ordering::Relaxed);
            let mutual = state.component_out_edges[partner as usize]
                .load(&state.leaf_best)
                .is_some_and(|other| {
                    other.source == edge.target && other.target == edge.source
                });
            if mutual && component > partner {
                // The other half of the pair emits this edge.
                return None;
            }
            Some(EmittedEdge {
                component,
                partner,
                mutual,
                edge,
            })
        })
        .collect()
}

/// Contracts this round's merges into the label array and returns the number
/// of components remaining.
pub(crate) fn update_labels(
    labels: &[AtomicU32],
    emitted: &[EmittedEdge],
    leaf_count: usize,
) -> usize {
    loop {
        let changed = AtomicBool::new(false);
        emitted.par_iter().for_each(|merge| {
            let left = resolve(labels, merge.component);
            let right = resolve(labels, merge.partner);
            if left == right {
                return;
            }
            let (survivor, absorbed) = if left < right { (left, right) } else { (right, left) };
            let previous =
                labels[absorbed as usize].fetch_min(survivor, Ordering::Relaxed);
            if previous > survivor {
                changed.store(true, Ordering::Relaxed);
            }
        });

        compress(labels, leaf_count);

        if !changed.load(Ordering::Relaxed) {
            break;
        }
    }

    (0..leaf_count)
        .into_par_iter()
        .filter(|&leaf| labels[leaf].load(Ordering::Relaxed) as usize == leaf)
        .count()
}

/// Follows the label chain to its current fixpoint. Chains strictly decrease
/// (labels only ever shrink toward the component minimum), so this
/// terminates.
fn resolve(labels: &[AtomicU32], start: u32) -> u32 {
    let mut current = start;
    loop {
        let next = labels[current as usize].load(Ordering::Relaxed);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// One parallel path-compression sweep over the leaf labels.
fn compress(labels: &[AtomicU32], leaf_count: usize) {
    (0..leaf_count).into_par_iter().for_each(|leaf| {
        let root = resolve(labels, leaf as u32);
        labels[leaf].store(root, Ordering::Relaxed);
    });
}
