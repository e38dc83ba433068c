//! Entry point orchestrating the spanning-tree pipeline.

use crate::boruvka::{BoruvkaConfig, BoruvkaOutcome, compute_core_distances, run_boruvka};
use crate::builder::{BuildMode, ExecutionStrategy};
use crate::bvh::Bvh;
use crate::dendrogram;
use crate::edge::WeightedEdge;
use crate::error::{Result, TreelineError};
use crate::metric::{Euclidean, Metric, MutualReachability};
use crate::points::PointSet;
use crate::result::{SpanningTree, TreelineOutput};

/// Largest supported point count: every node id and both label sentinels
/// must fit in a `u32`.
pub const MAX_POINTS: usize = ((u32::MAX - 2) / 2) as usize;

/// Builds Euclidean minimum spanning trees and single-linkage dendrograms.
///
/// Constructed through [`crate::TreelineBuilder`]; see the crate
/// documentation for the full pipeline description.
///
/// # Examples
/// ```
/// use treeline_core::{PointSet, TreelineBuilder};
///
/// let points = PointSet::from_rows(&[[0.0], [1.0], [2.0], [3.0], [4.0]])
///     .expect("rows are finite and consistently sized");
/// let output = TreelineBuilder::new()
///     .build()
///     .expect("valid configuration")
///     .run(&points)
///     .expect("valid input");
/// assert_eq!(output.edges().len(), 4);
/// assert_eq!(output.total_weight(), 4.0);
/// ```
#[derive(Debug, Clone)]
pub struct Treeline {
    neighbourhood_size: usize,
    mode: BuildMode,
    execution_strategy: ExecutionStrategy,
    shared_radii: bool,
    lower_bounds: bool,
}

impl Treeline {
    pub(crate) fn new(
        neighbourhood_size: usize,
        mode: BuildMode,
        execution_strategy: ExecutionStrategy,
        shared_radii: bool,
        lower_bounds: bool,
    ) -> Self {
        Self {
            neighbourhood_size,
            mode,
            execution_strategy,
            shared_radii,
            lower_bounds,
        }
    }

    /// Returns the neighbourhood size used for core distances.
    #[must_use]
    pub fn neighbourhood_size(&self) -> usize {
        self.neighbourhood_size
    }

    /// Returns the configured output mode.
    #[must_use]
    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Returns the execution strategy that will be used when running.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Builds the spanning tree (and, in HDBSCAN mode, the dendrogram) for
    /// `points`.
    ///
    /// # Errors
    /// Returns [`TreelineError::TooFewPoints`] for fewer than two points,
    /// [`TreelineError::NeighbourhoodTooLarge`] when the configured
    /// neighbourhood size is not smaller than the point count,
    /// [`TreelineError::TooManyPoints`] beyond [`MAX_POINTS`],
    /// [`TreelineError::BackendUnavailable`] when the requested backend is
    /// not compiled into the current build, and
    /// [`TreelineError::OutOfMemory`] when an internal array cannot be
    /// allocated.
    pub fn run(&self, points: &PointSet) -> Result<TreelineOutput> {
        let point_count = points.len();
        if point_count < 2 {
            return Err(TreelineError::TooFewPoints {
                points: point_count,
            });
        }
        if self.neighbourhood_size >= point_count {
            return Err(TreelineError::NeighbourhoodTooLarge {
                neighbourhood_size: self.neighbourhood_size,
                points: point_count,
            });
        }
        if point_count > MAX_POINTS {
            return Err(TreelineError::TooManyPoints {
                points: point_count,
                max: MAX_POINTS,
            });
        }

        match self.execution_strategy {
            ExecutionStrategy::Auto | ExecutionStrategy::CpuOnly => self.run_cpu(points),
            ExecutionStrategy::GpuPreferred => Err(TreelineError::BackendUnavailable {
                requested: ExecutionStrategy::GpuPreferred,
            }),
        }
    }

    fn run_cpu(&self, points: &PointSet) -> Result<TreelineOutput> {
        let bvh = Bvh::build(points);
        tracing::debug!(
            points = points.len(),
            dim = points.dim(),
            neighbourhood_size = self.neighbourhood_size,
            "hierarchy built"
        );

        if self.neighbourhood_size > 1 {
            let core_distances = compute_core_distances(&bvh, self.neighbourhood_size);
            let metric = MutualReachability::new(&bvh, &core_distances);
            let outcome = self.run_rounds(&bvh, &metric)?;
            self.finish(&bvh, outcome)
        } else {
            let metric = Euclidean::new(&bvh);
            let outcome = self.run_rounds(&bvh, &metric)?;
            self.finish(&bvh, outcome)
        }
    }

    fn run_rounds<M: Metric>(&self, bvh: &Bvh, metric: &M) -> Result<BoruvkaOutcome> {
        run_boruvka(
            bvh,
            metric,
            BoruvkaConfig {
                shared_radii: self.shared_radii,
                lower_bounds: self.lower_bounds,
                record_trace: self.mode == BuildMode::Hdbscan,
            },
        )
    }

    fn finish(&self, bvh: &Bvh, outcome: BoruvkaOutcome) -> Result<TreelineOutput> {
        match self.mode {
            BuildMode::Mst => {
                let mut edges: Vec<WeightedEdge> = outcome
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
                edges.sort_unstable();
                Ok(TreelineOutput::Mst(SpanningTree::new(edges)))
            }
            BuildMode::Hdbscan => Ok(TreelineOutput::Hdbscan(dendrogram::assemble(
                bvh, outcome,
            )?)),
        }
    }
}
