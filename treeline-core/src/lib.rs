//! Treeline core library.
//!
//! A parallel geometric clustering engine: Borůvka minimum spanning trees
//! over a bounding-volume hierarchy, with an optional single-linkage
//! dendrogram assembled from the construction itself.
//!
//! The pipeline is:
//!
//! - Build a BVH over the input points (median split, deterministic).
//! - With a neighbourhood size above one, compute per-point core distances
//!   and switch the metric to mutual reachability; otherwise use plain
//!   Euclidean distances.
//! - Run Borůvka rounds: propagate component labels onto the internal tree
//!   nodes, find every component's cheapest outgoing edge in parallel, and
//!   contract the merges; at most ⌈log₂ N⌉ rounds are needed.
//! - Finalise: remap edges to the caller's point ids and either sort them
//!   (MST mode) or assemble the dendrogram (HDBSCAN mode).
//!
//! All parallel reductions are monotone atomic minimums under a total edge
//! order, so repeated runs on the same input produce bit-identical output.

mod boruvka;
mod builder;
mod bvh;
mod dendrogram;
mod edge;
mod error;
mod memory;
mod metric;
mod points;
mod result;
mod treeline;

pub use crate::{
    builder::{BuildMode, ExecutionStrategy, TreelineBuilder},
    dendrogram::Dendrogram,
    edge::WeightedEdge,
    error::{
        PointSetError, PointSetErrorCode, Result, TreelineError, TreelineErrorCode,
    },
    memory::{estimate_peak_bytes, format_bytes},
    points::PointSet,
    result::{SpanningTree, TreelineOutput},
    treeline::{MAX_POINTS, Treeline},
};
