//! Traits defining isosurface extraction for dependency inversion

use crate::float_types::Real;
use crate::grid::Grid;
use crate::mesh::Mesh;

/// Core isosurface extraction trait
pub trait IsosurfaceOps {
    /// Extract the boundary where the grid's samples cross `isovalue`.
    ///
    /// Samples strictly above `isovalue` are inside. A field that never
    /// crosses `isovalue`, including an `isovalue` outside the field's range,
    /// yields an empty mesh.
    fn extract(&self, grid: &Grid, isovalue: Real) -> Mesh;
}
