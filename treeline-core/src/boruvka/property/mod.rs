//! Property-based tests for the Borůvka spanning-tree construction.
//!
//! Verifies the parallel construction against a sequential Prim oracle,
//! validates structural invariants (acyclicity, spanning, canonical form,
//! metric-exact weights), and checks determinism across repeated runs and
//! optimisation-toggle combinations, over point clouds designed to stress
//! tie-breaking (duplicates, grids, collinear runs).

mod determinism;
mod equivalence;
mod oracle;
mod strategies;
mod structural;
mod types;
