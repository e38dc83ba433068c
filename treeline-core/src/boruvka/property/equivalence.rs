//! Oracle equivalence: the engine's total weight matches sequential Prim.
//!
//! All minimum spanning trees share one multiset of edge weights, so the
//! totals must agree modulo floating-point summation order.

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::builder::TreelineBuilder;

use super::helpers::{brute_force_core_distances, total_weight_f64};
use super::oracle::prim_reference;
use super::types::CloudFixture;

/// Relative tolerance for comparing `f64` sums of identical `f32`
/// multisets accumulated in different orders.
const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Runs the oracle equivalence property for the given fixture.
pub(super) fn run_oracle_equivalence_property(fixture: &CloudFixture) -> TestCaseResult {
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

    let core_distances = (fixture.neighbourhood_size > 1)
        .then(|| brute_force_core_distances(&fixture.points, fixture.neighbourhood_size));
    let oracle = prim_reference(&fixture.points, core_distances.as_deref());

    if output.edges().len() != oracle.edge_count {
        return Err(TestCaseError::fail(format!(
            "edge count {} differs from oracle {} (shape={:?})",
            output.edges().len(),
            oracle.edge_count,
            fixture.shape,
        )));
    }

    let total = total_weight_f64(output.edges());
    let tolerance = WEIGHT_TOLERANCE * oracle.total_weight.abs().max(1.0);
    if (total - oracle.total_weight).abs() > tolerance {
        return Err(TestCaseError::fail(format!(
            "total weight {total} differs from oracle {} (shape={:?}, points={}, k={})",
            oracle.total_weight,
            fixture.shape,
            fixture.points.len(),
            fixture.neighbourhood_size,
        )));
    }
    Ok(())
}
