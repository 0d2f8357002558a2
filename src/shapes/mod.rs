//! Parametric solids and the sampler that turns them into occupancy grids.
//!
//! Every solid is described in its own local frame: the footprint is centred
//! on the Z axis and the solid rests on `z = 0`. Scene placement happens later
//! through a [`Transform`](crate::transform::Transform).

pub mod frustum;
pub mod line;
pub mod open_box;

pub use frustum::{Cone, Frustum};
pub use line::{Line, LineStyle};
pub use open_box::OpenBox;

use crate::errors::{ValidationError, ensure_non_negative};
use crate::float_types::Real;
use crate::grid::{Grid, GridResolution};
use crate::mesh::Mesh;
use crate::mesh::marching_cubes::MarchingCubes;
use crate::mesh::traits::IsosurfaceOps;
use nalgebra::{Point3, Vector3};

/// Value stored in the grid for nodes inside the solid. Outside nodes hold `0`.
pub const INSIDE: Real = 1.0;

/// Isovalue halfway between outside and [`INSIDE`].
pub const DEFAULT_ISOVALUE: Real = 0.5;

/// The closed set of solids the sampler understands.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Solid {
    OpenBox(OpenBox),
    Cone(Cone),
    Frustum(Frustum),
    Line(Line),
}

impl Solid {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Solid::OpenBox(open_box) => open_box.validate(),
            Solid::Cone(cone) => cone.validate(),
            Solid::Frustum(frustum) => frustum.validate(),
            Solid::Line(line) => line.validate(),
        }
    }

    /// Short human readable name, used in log output.
    pub const fn name(&self) -> &'static str {
        match self {
            Solid::OpenBox(_) => "open box",
            Solid::Cone(_) => "cone",
            Solid::Frustum(_) => "frustum",
            Solid::Line(_) => "line",
        }
    }

    /// Exact membership test in the solid's local frame.
    ///
    /// A [`Line`] answers for its tube, whatever its style.
    pub fn contains(&self, p: &Point3<Real>) -> bool {
        match self {
            Solid::OpenBox(open_box) => open_box.contains(p),
            Solid::Cone(cone) => cone.contains(p),
            Solid::Frustum(frustum) => frustum.contains(p),
            Solid::Line(line) => line.contains(p),
        }
    }

    /// Occupancy value: [`INSIDE`] or `0`.
    pub fn occupancy(&self, p: &Point3<Real>) -> Real {
        if self.contains(p) { INSIDE } else { 0.0 }
    }

    /// Tight local bounds `(min, max)`.
    pub fn bounds(&self) -> (Point3<Real>, Point3<Real>) {
        match self {
            Solid::OpenBox(open_box) => open_box.bounds(),
            Solid::Cone(cone) => cone.bounds(),
            Solid::Frustum(frustum) => frustum.bounds(),
            Solid::Line(line) => line.bounds(),
        }
    }

    /// `false` only for a line drawn as a bare segment.
    pub fn is_volumetric(&self) -> bool {
        !matches!(
            self,
            Solid::Line(Line {
                style: LineStyle::Segment,
                ..
            })
        )
    }

    /// Sample the occupancy field, see [`sample`].
    pub fn sample(
        &self,
        resolution: GridResolution,
        padding: Real,
    ) -> Result<Grid, ValidationError> {
        sample(self, resolution, padding)
    }

    /// Run the whole sample → extract chain with `sampling`.
    ///
    /// A [`LineStyle::Segment`] line skips the grid entirely and comes back as
    /// two vertices and one edge.
    pub fn to_mesh(&self, sampling: &Sampling) -> Result<Mesh, ValidationError> {
        self.validate()?;
        sampling.validate()?;

        match self {
            Solid::Line(line) if line.style == LineStyle::Segment => {
                return Ok(line.segment_mesh());
            }
            _ => {}
        }

        let grid = sample(self, sampling.resolution, sampling.padding)?;
        let mesh = sampling.method.extract(&grid, sampling.isovalue);
        log::debug!(
            "{}: {} grid nodes -> {} vertices, {} faces",
            self.name(),
            grid.resolution().node_count(),
            mesh.vertices.len(),
            mesh.faces.len()
        );
        Ok(mesh)
    }
}

impl From<OpenBox> for Solid {
    fn from(open_box: OpenBox) -> Self {
        Solid::OpenBox(open_box)
    }
}

impl From<Cone> for Solid {
    fn from(cone: Cone) -> Self {
        Solid::Cone(cone)
    }
}

impl From<Frustum> for Solid {
    fn from(frustum: Frustum) -> Self {
        Solid::Frustum(frustum)
    }
}

impl From<Line> for Solid {
    fn from(line: Line) -> Self {
        Solid::Line(line)
    }
}

/// Sample `solid` on a lattice of `resolution` nodes covering its bounds
/// grown by `padding` world units on every side.
///
/// Any positive padding puts the outermost nodes strictly outside the solid,
/// so the extracted surface closes over its caps. With `padding == 0` the
/// solid touches the lattice boundary and the extracted mesh stays open there.
///
/// Parameters are checked before the grid is allocated.
pub fn sample(
    solid: &Solid,
    resolution: GridResolution,
    padding: Real,
) -> Result<Grid, ValidationError> {
    solid.validate()?;
    resolution.validate()?;
    ensure_non_negative("padding", padding)?;

    let (min, max) = solid.bounds();
    let margin = Vector3::repeat(padding);
    Grid::from_fn(resolution, min - margin, max + margin, |p| solid.occupancy(p))
}

/// Surface extraction algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SurfaceMethod {
    #[default]
    MarchingCubes,
    #[cfg(feature = "surface-nets")]
    SurfaceNets,
}

impl SurfaceMethod {
    pub fn extract(&self, grid: &Grid, isovalue: Real) -> Mesh {
        match self {
            SurfaceMethod::MarchingCubes => MarchingCubes::new().extract(grid, isovalue),
            #[cfg(feature = "surface-nets")]
            SurfaceMethod::SurfaceNets => {
                crate::mesh::surface_nets::SurfaceNets::new().extract(grid, isovalue)
            }
        }
    }
}

/// Grid density, padding and threshold for one solid.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sampling {
    pub resolution: GridResolution,
    /// World-unit margin around the solid's bounds.
    pub padding: Real,
    pub isovalue: Real,
    pub method: SurfaceMethod,
}

impl Sampling {
    /// `samples` nodes along every axis, default isovalue and method.
    pub fn new(samples: usize, padding: Real) -> Self {
        Sampling {
            resolution: GridResolution::uniform(samples),
            padding,
            ..Sampling::default()
        }
    }

    pub fn with_resolution(mut self, resolution: GridResolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_isovalue(mut self, isovalue: Real) -> Self {
        self.isovalue = isovalue;
        self
    }

    pub fn with_method(mut self, method: SurfaceMethod) -> Self {
        self.method = method;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.resolution.validate()?;
        ensure_non_negative("padding", self.padding)?;
        if !self.isovalue.is_finite() {
            return Err(ValidationError::parameter(
                "isovalue",
                self.isovalue,
                "must be finite",
            ));
        }
        // surface nets addresses nodes with u32
        #[cfg(feature = "surface-nets")]
        {
            if self.method == SurfaceMethod::SurfaceNets {
                crate::mesh::surface_nets::GridShape::try_from(self.resolution)?;
            }
        }
        Ok(())
    }
}

impl Default for Sampling {
    fn default() -> Self {
        Sampling {
            resolution: GridResolution::default(),
            padding: 0.1,
            isovalue: DEFAULT_ISOVALUE,
            method: SurfaceMethod::default(),
        }
    }
}
