//! Surface nets isosurface extraction through the `fast-surface-nets` crate.
//!
//! Surface nets places one vertex per crossing cell and joins neighbouring cell
//! vertices into quads, split here into triangles. The result is smoother than
//! marching cubes on a binary occupancy field but carries no winding guarantee.

use crate::errors::ValidationError;
use crate::float_types::Real;
use crate::grid::{Grid, GridResolution};
use crate::mesh::Mesh;
use crate::mesh::traits::IsosurfaceOps;
use fast_surface_nets::{SurfaceNetsBuffer, surface_nets};
use nalgebra::Point3;

/// The shape describing a [`Grid`]'s lattice for `fast-surface-nets`.
///
/// Linearization matches [`Grid::linearize`]: x fastest, then y, then z.
/// The crate addresses nodes with `u32`, so only resolutions whose node count
/// fits in a `u32` convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    nx: u32,
    ny: u32,
    nz: u32,
}

impl TryFrom<GridResolution> for GridShape {
    type Error = ValidationError;

    fn try_from(resolution: GridResolution) -> Result<Self, Self::Error> {
        let too_large = || resolution.too_large(u32::MAX as usize);
        let nx = u32::try_from(resolution.nx).map_err(|_| too_large())?;
        let ny = u32::try_from(resolution.ny).map_err(|_| too_large())?;
        let nz = u32::try_from(resolution.nz).map_err(|_| too_large())?;
        nx.checked_mul(ny)
            .and_then(|nxy| nxy.checked_mul(nz))
            .ok_or_else(too_large)?;
        Ok(GridShape { nx, ny, nz })
    }
}

impl fast_surface_nets::ndshape::Shape<3> for GridShape {
    type Coord = u32;

    #[inline]
    fn as_array(&self) -> [Self::Coord; 3] {
        [self.nx, self.ny, self.nz]
    }

    // checked when the shape was built
    fn size(&self) -> Self::Coord {
        self.nx * self.ny * self.nz
    }

    fn usize(&self) -> usize {
        self.size() as usize
    }

    fn linearize(&self, coords: [Self::Coord; 3]) -> u32 {
        let [x, y, z] = coords;
        (z * self.ny + y) * self.nx + x
    }

    fn delinearize(&self, i: u32) -> [Self::Coord; 3] {
        let x = i % self.nx;
        let yz = i / self.nx;
        [x, yz % self.ny, yz / self.ny]
    }
}

/// Surface nets extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceNets;

impl SurfaceNets {
    pub const fn new() -> Self {
        Self
    }
}

impl IsosurfaceOps for SurfaceNets {
    fn extract(&self, grid: &Grid, isovalue: Real) -> Mesh {
        let (lo, hi) = grid.value_range();
        if !(isovalue >= lo && isovalue < hi) {
            log::debug!(
                "isovalue {} does not cross the field range [{}, {}], nothing to extract",
                isovalue,
                lo,
                hi
            );
            return Mesh::new();
        }

        let shape = match GridShape::try_from(grid.resolution()) {
            Ok(shape) => shape,
            Err(err) => {
                log::error!("surface nets cannot address this grid: {}", err);
                return Mesh::new();
            }
        };

        // fast-surface-nets treats negative samples as inside
        let field: Vec<f32> = grid.values().iter().map(|&v| (isovalue - v) as f32).collect();

        let mut buffer = SurfaceNetsBuffer::default();
        surface_nets(
            &field,
            &shape,
            [0, 0, 0],
            [shape.nx - 1, shape.ny - 1, shape.nz - 1],
            &mut buffer,
        );

        let vertices = buffer
            .positions
            .iter()
            .map(|p| {
                grid.lattice_to_world(&Point3::new(p[0] as Real, p[1] as Real, p[2] as Real))
            })
            .collect();
        let faces = buffer
            .indices
            .chunks_exact(3)
            .map(|tri| [tri[0] as usize, tri[1] as usize, tri[2] as usize])
            .collect();

        let mesh = Mesh {
            vertices,
            faces,
            ..Mesh::default()
        };
        log::debug!(
            "surface nets produced {} vertices and {} faces",
            mesh.vertices.len(),
            mesh.faces.len()
        );
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fast_surface_nets::ndshape::Shape;

    #[test]
    fn shape_linearization_agrees_with_grid() {
        let grid = Grid::from_fn(
            GridResolution::new(3, 4, 5),
            Point3::origin(),
            Point3::new(1.0, 1.0, 1.0),
            |_| 0.0,
        )
        .unwrap();
        let shape = GridShape::try_from(grid.resolution()).unwrap();
        assert_eq!(shape.usize(), grid.values().len());
        for idx in 0..shape.usize() {
            let [x, y, z] = shape.delinearize(idx as u32);
            assert_eq!(grid.linearize(x as usize, y as usize, z as usize), idx);
            assert_eq!(shape.linearize([x, y, z]), idx as u32);
        }
    }

    #[test]
    fn shapes_beyond_u32_are_rejected() {
        // 2048^3 = 2^33 nodes
        let resolution = GridResolution::uniform(2048);
        assert!(resolution.validate().is_ok());
        assert_eq!(
            GridShape::try_from(resolution),
            Err(resolution.too_large(u32::MAX as usize))
        );
        let wide = GridResolution::new(1 << 20, 1 << 12, 2);
        assert!(GridShape::try_from(wide).is_err());
        assert!(GridShape::try_from(GridResolution::uniform(1024)).is_ok());
    }

    #[test]
    fn uniform_field_is_empty() {
        let grid = Grid::from_fn(
            GridResolution::uniform(4),
            Point3::origin(),
            Point3::new(1.0, 1.0, 1.0),
            |_| 1.0,
        )
        .unwrap();
        assert!(SurfaceNets::new().extract(&grid, 0.5).is_empty());
    }
}
