//! Structural invariant verification.
//!
//! For any spanning tree produced by the engine, verifies:
//!
//! - **Edge count** — exactly N−1 edges.
//! - **Acyclicity and spanning** — the edges connect all points without
//!   cycles (union-find based detection).
//! - **Canonical form** — `source < target` for all edges.
//! - **Finite weights** — all edge weights are finite.
//! - **Metric exactness** — every edge weight equals the metric distance of
//!   its endpoints, recomputed independently.
//! - **Mutual-reachability bound** — with a neighbourhood above one, every
//!   weight dominates both endpoints' core distances.

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::builder::TreelineBuilder;
use crate::edge::WeightedEdge;
use crate::result::TreelineOutput;

use super::helpers::{brute_force_core_distances, find_root, reference_distance};
use super::types::CloudFixture;

/// Runs the structural invariant property for the given fixture.
pub(super) fn run_structural_invariants_property(fixture: &CloudFixture) -> TestCaseResult {
    let output = TreelineBuilder::new()
        .with_neighbourhood_size(fixture.neighbourhood_size)
        .build()
        .map_err(|e| TestCaseError::fail(format!("builder failed: {e}")))?
        .run(&fixture.points)
        .map_err(|e| {
            TestCaseError::fail(format!(
                "run failed: {e} (shape={:?}, points={}, k={})",
                fixture.shape,
                fixture.points.len(),
                fixture.neighbourhood_size,
            ))
        })?;

    let edges = output.edges();
    validate_edge_count(fixture.points.len(), edges)?;
    validate_canonical_form(edges)?;
    validate_finite_weights(edges)?;
    validate_spanning_acyclic(fixture.points.len(), edges)?;
    validate_metric_exactness(fixture, &output)?;
    Ok(())
}

fn validate_edge_count(point_count: usize, edges: &[WeightedEdge]) -> TestCaseResult {
    if edges.len() != point_count - 1 {
        return Err(TestCaseError::fail(format!(
            "edge count {}, expected n - 1 = {}",
            edges.len(),
            point_count - 1,
        )));
    }
    Ok(())
}

fn validate_canonical_form(edges: &[WeightedEdge]) -> TestCaseResult {
    for (index, edge) in edges.iter().enumerate() {
        if edge.source() >= edge.target() {
            return Err(TestCaseError::fail(format!(
                "edge {index}: not canonical ({} >= {})",
                edge.source(),
                edge.target(),
            )));
        }
    }
    Ok(())
}

fn validate_finite_weights(edges: &[WeightedEdge]) -> TestCaseResult {
    for (index, edge) in edges.iter().enumerate() {
        if !edge.weight().is_finite() {
            return Err(TestCaseError::fail(format!(
                "edge {index}: non-finite weight {}",
                edge.weight(),
            )));
        }
    }
    Ok(())
}

fn validate_spanning_acyclic(point_count: usize, edges: &[WeightedEdge]) -> TestCaseResult {
    let mut parent: Vec<usize> = (0..point_count).collect();
    for (index, edge) in edges.iter().enumerate() {
        let left = find_root(&mut parent, edge.source());
        let right = find_root(&mut parent, edge.target());
        if left == right {
            return Err(TestCaseError::fail(format!(
                "edge {index}: ({}, {}) creates a cycle",
                edge.source(),
                edge.target(),
            )));
        }
        parent[right] = left;
    }
    let root = find_root(&mut parent, 0);
    for point in 1..point_count {
        if find_root(&mut parent, point) != root {
            return Err(TestCaseError::fail(format!(
                "point {point} is not connected to point 0"
            )));
        }
    }
    Ok(())
}

fn validate_metric_exactness(fixture: &CloudFixture, output: &TreelineOutput) -> TestCaseResult {
    let core_distances = (fixture.neighbourhood_size > 1)
        .then(|| brute_force_core_distances(&fixture.points, fixture.neighbourhood_size));

    for (index, edge) in output.edges().iter().enumerate() {
        let expected = reference_distance(
            &fixture.points,
            core_distances.as_deref(),
            edge.source(),
            edge.target(),
        );
        if edge.weight() != expected {
            return Err(TestCaseError::fail(format!(
                "edge {index}: weight {} differs from metric distance {expected}",
                edge.weight(),
            )));
        }
        if let Some(core) = core_distances.as_deref() {
            let floor = core[edge.source()].max(core[edge.target()]);
            if edge.weight() < floor {
                return Err(TestCaseError::fail(format!(
                    "edge {index}: weight {} below the core-distance floor {floor}",
                    edge.weight(),
                )));
            }
        }
    }
    Ok(())
}
