//! Determinism properties.
//!
//! Repeated runs on the same input must produce bit-identical edge lists
//! (the atomic reductions are monotone minimums under a total order, so
//! thread scheduling cannot leak into the result), and the optimisation
//! toggles for shared radii and the lower-bound cache must not change the
//! output either.

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::builder::TreelineBuilder;
use crate::edge::WeightedEdge;

use super::types::CloudFixture;

/// Number of repeated runs per fixture.
const REPETITIONS: usize = 4;

fn run_with_toggles(
    fixture: &CloudFixture,
    shared_radii: bool,
    lower_bounds: bool,
) -> Result<Vec<WeightedEdge>, TestCaseError> {
    let output = TreelineBuilder::new()
        .with_neighbourhood_size(fixture.neighbourhood_size)
        .with_shared_radii(shared_radii)
        .with_lower_bounds(lower_bounds)
        .build()
        .map_err(|e| TestCaseError::fail(format!("builder failed: {e}")))?
        .run(&fixture.points)
        .map_err(|e| {
            TestCaseError::fail(format!(
                "run failed: {e} (shape={:?}, shared_radii={shared_radii}, \
                 lower_bounds={lower_bounds})",
                fixture.shape,
            ))
        })?;
    Ok(output.edges().to_vec())
}

/// Runs the repeated-run determinism property for the given fixture.
pub(super) fn run_determinism_property(fixture: &CloudFixture) -> TestCaseResult {
    let baseline = run_with_toggles(fixture, true, true)?;
    for run in 1..REPETITIONS {
        let repeat = run_with_toggles(fixture, true, true)?;
        if repeat != baseline {
            return Err(TestCaseError::fail(format!(
                "run {run}: edge list differs from baseline (shape={:?}, points={}, k={})",
                fixture.shape,
                fixture.points.len(),
                fixture.neighbourhood_size,
            )));
        }
    }
    Ok(())
}

/// Runs the toggle-equivalence property: every combination of shared radii
/// and lower bounds yields the identical tree.
pub(super) fn run_toggle_equivalence_property(fixture: &CloudFixture) -> TestCaseResult {
    let baseline = run_with_toggles(fixture, false, false)?;
    for (shared_radii, lower_bounds) in [(true, false), (false, true), (true, true)] {
        let candidate = run_with_toggles(fixture, shared_radii, lower_bounds)?;
        if candidate != baseline {
            return Err(TestCaseError::fail(format!(
                "toggles (shared_radii={shared_radii}, lower_bounds={lower_bounds}) \
                 changed the tree (shape={:?}, points={}, k={})",
                fixture.shape,
                fixture.points.len(),
                fixture.neighbourhood_size,
            )));
        }
    }
    Ok(())
}
