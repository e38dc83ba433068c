//! Type definitions for spanning-tree property tests.

use crate::points::PointSet;

/// Geometry of a generated point cloud.
///
/// Each shape stresses a different aspect of the construction: uniform and
/// clustered clouds exercise the pruning, while collinear runs, duplicated
/// points, and integer grids force large groups of tied edge weights through
/// the deterministic tie-breaking.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum CloudShape {
    /// Uniform samples from the unit cube.
    Uniform,
    /// A handful of tight clusters with wide gaps.
    Clustered,
    /// Points on a line, including coincident pairs.
    Collinear,
    /// Uniform samples where many points are exact duplicates.
    Duplicated,
    /// An integer lattice (every nearest-neighbour distance ties).
    Grid,
}

/// Fixture for spanning-tree property tests.
#[derive(Clone, Debug)]
pub(super) struct CloudFixture {
    /// The generated points.
    pub points: PointSet,
    /// Neighbourhood size; above one the metric is mutual reachability.
    pub neighbourhood_size: usize,
    /// Shape used during generation, kept for failure diagnosis.
    pub shape: CloudShape,
}
