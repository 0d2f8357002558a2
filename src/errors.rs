//! Validation errors

use crate::float_types::Real;
use nalgebra::Point3;

/// All the possible validation issues we might encounter while building a scene.
///
/// Every variant is fatal for the operation that raised it and is reported
/// before any grid is allocated. An extraction that finds no surface is *not*
/// an error; it yields an empty [`Mesh`](crate::mesh::Mesh).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// (InvalidParameter) A dimension or control value is out of its valid range
    #[error("(InvalidParameter) {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: Real,
        reason: &'static str,
    },
    /// (InvalidResolution) A grid axis has fewer than the two samples marching cubes needs
    #[error("(InvalidResolution) axis {axis} has {samples} samples, at least 2 are required")]
    InvalidResolution { axis: char, samples: usize },
    /// (GridTooLarge) The node count of a grid does not fit the index type
    #[error("(GridTooLarge) a {nx}x{ny}x{nz} grid has more than {limit} nodes")]
    GridTooLarge {
        nx: usize,
        ny: usize,
        nz: usize,
        limit: usize,
    },
    /// (GridSizeMismatch) A value buffer does not match the declared grid dimensions
    #[error("(GridSizeMismatch) expected {expected} samples, got {actual}")]
    GridSizeMismatch { expected: usize, actual: usize },
    /// (NumericDegeneracy) A zero-length vector had to be normalized
    #[error("(NumericDegeneracy) cannot normalize the zero-length {0} vector")]
    NumericDegeneracy(&'static str),
    /// (InvalidCoordinate) The coordinate has a NaN or infinite
    #[error("(InvalidCoordinate) The coordinate ({0}) has a NaN or infinite")]
    InvalidCoordinate(Point3<Real>),
    /// (IndexOutOfRange) A face or edge references a vertex that does not exist
    #[error("(IndexOutOfRange) element {element} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        element: usize,
        index: usize,
        vertex_count: usize,
    },
}

impl ValidationError {
    /// Build an [`InvalidParameter`](ValidationError::InvalidParameter) error.
    pub const fn parameter(name: &'static str, value: Real, reason: &'static str) -> Self {
        ValidationError::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

/// Require `value` to be finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: Real) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::parameter(
            name,
            value,
            "must be finite and strictly positive",
        ))
    }
}

/// Require `value` to be finite and not negative.
pub(crate) fn ensure_non_negative(
    name: &'static str,
    value: Real,
) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::parameter(
            name,
            value,
            "must be finite and not negative",
        ))
    }
}

/// Require every coordinate of `point` to be finite.
pub(crate) fn ensure_finite_point(point: &Point3<Real>) -> Result<(), ValidationError> {
    if point.coords.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidCoordinate(*point))
    }
}
