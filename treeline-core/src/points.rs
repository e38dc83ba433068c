//! Validated point-set container consumed by the engine.
//!
//! Coordinates are validated once at construction so the parallel core can
//! assume finite values and a uniform dimension throughout.

use crate::error::PointSetError;

/// An immutable set of N points of a fixed dimension, stored row-major.
///
/// # Examples
/// ```
/// use treeline_core::PointSet;
///
/// let points = PointSet::from_rows(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]])
///     .expect("rows are finite and consistently sized");
/// assert_eq!(points.len(), 3);
/// assert_eq!(points.dim(), 2);
/// assert_eq!(points.point(1), &[1.0, 0.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PointSet {
    dim: usize,
    coords: Vec<f32>,
}

impl PointSet {
    /// Builds a point set from per-point coordinate rows.
    ///
    /// # Errors
    /// Returns [`PointSetError::Empty`] for zero rows,
    /// [`PointSetError::ZeroDimension`] when the first row is empty,
    /// [`PointSetError::DimensionMismatch`] when a later row disagrees with
    /// the first, and [`PointSetError::NonFinite`] for NaN or infinite
    /// coordinates.
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self, PointSetError> {
        let Some(first) = rows.first() else {
            return Err(PointSetError::Empty);
        };
        let dim = first.as_ref().len();
        if dim == 0 {
            return Err(PointSetError::ZeroDimension);
        }

        let mut coords = Vec::with_capacity(rows.len() * dim);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != dim {
                return Err(PointSetError::DimensionMismatch {
                    row,
                    got: values.len(),
                    expected: dim,
                });
            }
            validate_row(row, values)?;
            coords.extend_from_slice(values);
        }

        Ok(Self { dim, coords })
    }

    /// Builds a point set from a flat row-major coordinate buffer.
    ///
    /// # Errors
    /// Returns the same errors as [`Self::from_rows`];
    /// [`PointSetError::DimensionMismatch`] reports a trailing partial row.
    pub fn from_flat(dim: usize, coords: Vec<f32>) -> Result<Self, PointSetError> {
        if dim == 0 {
            return Err(PointSetError::ZeroDimension);
        }
        if coords.is_empty() {
            return Err(PointSetError::Empty);
        }
        let remainder = coords.len() % dim;
        if remainder != 0 {
            return Err(PointSetError::DimensionMismatch {
                row: coords.len() / dim,
                got: remainder,
                expected: dim,
            });
        }
        for (row, values) in coords.chunks_exact(dim).enumerate() {
            validate_row(row, values)?;
        }

        Ok(Self { dim, coords })
    }

    /// Returns the number of points.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.coords.len() / self.dim }

    /// Returns whether the set contains no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Returns the dimension shared by every point.
    #[must_use]
    #[rustfmt::skip]
    pub fn dim(&self) -> usize { self.dim }

    /// Returns the coordinates of the point at `index`.
    ///
    /// # Panics
    /// Panics when `index >= self.len()`.
    #[must_use]
    pub fn point(&self, index: usize) -> &[f32] {
        &self.coords[index * self.dim..(index + 1) * self.dim]
    }
}

fn validate_row(row: usize, values: &[f32]) -> Result<(), PointSetError> {
    for (axis, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(PointSetError::NonFinite { row, axis, value });
        }
    }
    Ok(())
}
