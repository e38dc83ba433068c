//! Component label propagation over the hierarchy.
//!
//! After a merge round rewrites leaf labels, the internal nodes must be
//! relabelled bottom-up: a node whose descendant leaves all share one
//! component carries that component's id, and a node spanning several
//! components carries [`MULTIPLE_LABELS`]. One task climbs from every leaf;
//! at each internal node the first arrival deposits its subtree's label and
//! stops, while the second arrival combines the two labels and continues, so
//! every node is finalised by exactly one task.

use std::sync::atomic::{AtomicU32, Ordering};

use rayon::prelude::*;

use crate::bvh::ROOT_PARENT;

/// Label of an internal node whose subtree spans more than one component.
pub(crate) const MULTIPLE_LABELS: u32 = u32::MAX;

/// Transient label of an internal node no climb has reached yet.
const UNVISITED: u32 = u32::MAX - 1;

/// Rebuilds the internal-node labels from the current leaf labels.
///
/// `labels` has one entry per tree node; the first `leaf_count` entries are
/// leaf labels and are read-only here. On return every internal node holds
/// either the unique label of its descendant leaves or [`MULTIPLE_LABELS`].
pub(crate) fn reduce_labels(tree_parents: &[u32], labels: &[AtomicU32], leaf_count: usize) {
    labels[leaf_count..]
        .par_iter()
        .for_each(|label| label.store(UNVISITED, Ordering::Relaxed));

    (0..leaf_count).into_par_iter().for_each(|leaf| {
        let mut label = labels[leaf].load(Ordering::Relaxed);
        let mut node = tree_parents[leaf];
        while node != ROOT_PARENT {
            match labels[node as usize].compare_exchange(
                UNVISITED,
                label,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                // First arrival: park this subtree's label and hand the climb
                // over to the sibling's task.
                Ok(_) => return,
                Err(sibling_label) => {
                    if sibling_label != label {
                        label = MULTIPLE_LABELS;
                    }
                    labels[node as usize].store(label, Ordering::Release);
                }
            }
            node = tree_parents[node as usize];
        }
    });
}
