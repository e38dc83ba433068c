//! Error types for the Treeline core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::builder::ExecutionStrategy;

/// Stable codes describing [`PointSetError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum PointSetErrorCode {
    /// The point set contained no rows.
    Empty,
    /// Points must have positive dimension.
    ZeroDimension,
    /// A row's dimension disagreed with the rest of the set.
    DimensionMismatch,
    /// A coordinate was NaN or infinite.
    NonFinite,
}

impl PointSetErrorCode {
    /// Return the stable machine-readable representation of this error code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "POINT_SET_EMPTY",
            Self::ZeroDimension => "POINT_SET_ZERO_DIMENSION",
            Self::DimensionMismatch => "POINT_SET_DIMENSION_MISMATCH",
            Self::NonFinite => "POINT_SET_NON_FINITE",
        }
    }
}

impl fmt::Display for PointSetErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error produced while constructing a [`crate::PointSet`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PointSetError {
    /// The point set contained no rows.
    #[error("point set contains no rows")]
    Empty,
    /// Points must have positive dimension.
    #[error("points must have positive dimension")]
    ZeroDimension,
    /// A row's dimension disagreed with the rest of the set.
    #[error("row {row} has dimension {got}, expected {expected}")]
    DimensionMismatch {
        /// Index of the offending row.
        row: usize,
        /// Dimension observed on the offending row.
        got: usize,
        /// Dimension established by the first row.
        expected: usize,
    },
    /// A coordinate was NaN or infinite.
    #[error("row {row} has a non-finite coordinate on axis {axis}: {value}")]
    NonFinite {
        /// Index of the offending row.
        row: usize,
        /// Axis of the offending coordinate.
        axis: usize,
        /// The non-finite value observed.
        value: f32,
    },
}

impl PointSetError {
    /// Retrieve the stable [`PointSetErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> PointSetErrorCode {
        match self {
            Self::Empty => PointSetErrorCode::Empty,
            Self::ZeroDimension => PointSetErrorCode::ZeroDimension,
            Self::DimensionMismatch { .. } => PointSetErrorCode::DimensionMismatch,
            Self::NonFinite { .. } => PointSetErrorCode::NonFinite,
        }
    }
}

/// Stable codes describing [`TreelineError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum TreelineErrorCode {
    /// The neighbourhood size must be at least one.
    InvalidNeighbourhoodSize,
    /// A spanning tree needs at least two points.
    TooFewPoints,
    /// The neighbourhood size must be smaller than the point count.
    NeighbourhoodTooLarge,
    /// The point count exceeded the supported maximum.
    TooManyPoints,
    /// The requested execution strategy is unavailable in the current build.
    BackendUnavailable,
    /// An internal array could not be allocated.
    OutOfMemory,
    /// An internal invariant was violated, indicating a logic error.
    InvariantViolation,
}

impl TreelineErrorCode {
    /// Return the stable machine-readable representation of this error code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidNeighbourhoodSize => "TREELINE_INVALID_NEIGHBOURHOOD_SIZE",
            Self::TooFewPoints => "TREELINE_TOO_FEW_POINTS",
            Self::NeighbourhoodTooLarge => "TREELINE_NEIGHBOURHOOD_TOO_LARGE",
            Self::TooManyPoints => "TREELINE_TOO_MANY_POINTS",
            Self::BackendUnavailable => "TREELINE_BACKEND_UNAVAILABLE",
            Self::OutOfMemory => "TREELINE_OUT_OF_MEMORY",
            Self::InvariantViolation => "TREELINE_INVARIANT_VIOLATION",
        }
    }
}

impl fmt::Display for TreelineErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type produced when configuring or running [`crate::Treeline`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TreelineError {
    /// The neighbourhood size must be at least one.
    #[error("neighbourhood_size must be at least 1 (got {got})")]
    InvalidNeighbourhoodSize {
        /// The rejected neighbourhood size.
        got: usize,
    },
    /// A spanning tree needs at least two points.
    #[error("at least 2 points are required to build a spanning tree (got {points})")]
    TooFewPoints {
        /// Number of points supplied by the caller.
        points: usize,
    },
    /// The neighbourhood size must be smaller than the point count.
    #[error("neighbourhood_size {neighbourhood_size} must be smaller than the point count {points}")]
    NeighbourhoodTooLarge {
        /// The configured neighbourhood size.
        neighbourhood_size: usize,
        /// Number of points supplied by the caller.
        points: usize,
    },
    /// The point count exceeded the supported maximum.
    #[error("point count {points} exceeds the supported maximum {max}")]
    TooManyPoints {
        /// Number of points supplied by the caller.
        points: usize,
        /// Largest supported point count.
        max: usize,
    },
    /// The requested execution strategy is unavailable in the current build.
    #[error("the requested execution strategy {requested:?} is not available in this build")]
    BackendUnavailable {
        /// The strategy that could not be satisfied.
        requested: ExecutionStrategy,
    },
    /// An internal array could not be allocated.
    #[error("failed to allocate {requested_bytes} bytes for {resource}")]
    OutOfMemory {
        /// Name of the array that could not be allocated.
        resource: &'static str,
        /// Size of the failed request in bytes.
        requested_bytes: u64,
    },
    /// An internal invariant was violated, indicating a logic error.
    #[error("internal invariant violated: {invariant}")]
    InvariantViolation {
        /// Name of the violated invariant to assist debugging.
        invariant: &'static str,
    },
}

impl TreelineError {
    /// Retrieve the stable [`TreelineErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> TreelineErrorCode {
        match self {
            Self::InvalidNeighbourhoodSize { .. } => TreelineErrorCode::InvalidNeighbourhoodSize,
            Self::TooFewPoints { .. } => TreelineErrorCode::TooFewPoints,
            Self::NeighbourhoodTooLarge { .. } => TreelineErrorCode::NeighbourhoodTooLarge,
            Self::TooManyPoints { .. } => TreelineErrorCode::TooManyPoints,
            Self::BackendUnavailable { .. } => TreelineErrorCode::BackendUnavailable,
            Self::OutOfMemory { .. } => TreelineErrorCode::OutOfMemory,
            Self::InvariantViolation { .. } => TreelineErrorCode::InvariantViolation,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, TreelineError>;
