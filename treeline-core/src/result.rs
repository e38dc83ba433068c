//! Output types for spanning-tree construction.

use crate::dendrogram::Dendrogram;
use crate::edge::WeightedEdge;

/// The minimum spanning tree of a point set.
///
/// Edges are canonicalised (`source < target`) and sorted by the total edge
/// order `(weight, source, target)`.
///
/// # Examples
/// ```
/// use treeline_core::{PointSet, TreelineBuilder};
///
/// let points = PointSet::from_rows(&[[0.0], [1.0], [3.0]]).expect("valid rows");
/// let output = TreelineBuilder::new()
///     .build()
///     .expect("valid configuration")
///     .run(&points)
///     .expect("valid input");
/// let tree = output.spanning_tree().expect("MST mode is the default");
/// assert_eq!(tree.edges().len(), 2);
/// assert_eq!(tree.total_weight(), 3.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SpanningTree {
    edges: Vec<WeightedEdge>,
}

impl SpanningTree {
    pub(crate) fn new(edges: Vec<WeightedEdge>) -> Self {
        Self { edges }
    }

    /// Returns the tree edges.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &[WeightedEdge] { &self.edges }

    /// Returns the number of points spanned by the tree.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.edges.len() + 1
    }

    /// Sums the edge weights, accumulating in `f64` for precision.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|edge| f64::from(edge.weight())).sum()
    }
}

/// The output of a [`crate::Treeline::run`] invocation, tagged by the
/// configured [`crate::BuildMode`].
#[derive(Clone, Debug, PartialEq)]
pub enum TreelineOutput {
    /// The spanning tree alone.
    Mst(SpanningTree),
    /// The spanning tree plus its single-linkage dendrogram.
    Hdbscan(Dendrogram),
}

impl TreelineOutput {
    /// Returns the spanning-tree edges regardless of mode.
    ///
    /// In MST mode they are sorted by the total edge order; in HDBSCAN mode
    /// they are in dendrogram level order.
    #[must_use]
    pub fn edges(&self) -> &[WeightedEdge] {
        match self {
            Self::Mst(tree) => tree.edges(),
            Self::Hdbscan(dendrogram) => dendrogram.edges(),
        }
    }

    /// Sums the edge weights, accumulating in `f64` for precision.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.edges()
            .iter()
            .map(|edge| f64::from(edge.weight()))
            .sum()
    }

    /// Returns the spanning tree when built in MST mode.
    #[must_use]
    pub fn spanning_tree(&self) -> Option<&SpanningTree> {
        match self {
            Self::Mst(tree) => Some(tree),
            Self::Hdbscan(_) => None,
        }
    }

    /// Returns the dendrogram when built in HDBSCAN mode.
    #[must_use]
    pub fn dendrogram(&self) -> Option<&Dendrogram> {
        match self {
            Self::Mst(_) => None,
            Self::Hdbscan(dendrogram) => Some(dendrogram),
        }
    }
}
