use super::frustum::Frustum;
use crate::errors::{ValidationError, ensure_positive};
use crate::float_types::Real;
use crate::mesh::Mesh;
use nalgebra::Point3;

/// How a [`Line`] turns into geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineStyle {
    /// Two vertices joined by one edge; no sampling, no faces.
    #[default]
    Segment,
    /// A thin cylinder sampled and extracted like any other solid.
    Tube,
}

/// A straight line from the origin to `(0, 0, length)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    pub length: Real,
    /// Tube radius, only used by [`LineStyle::Tube`].
    pub radius: Real,
    pub style: LineStyle,
}

impl Line {
    pub fn new(length: Real, radius: Real, style: LineStyle) -> Result<Self, ValidationError> {
        let line = Line {
            length,
            radius,
            style,
        };
        line.validate()?;
        Ok(line)
    }

    /// The lightweight two-point representation.
    pub fn segment(length: Real) -> Result<Self, ValidationError> {
        Line::new(length, Line::default().radius, LineStyle::Segment)
    }

    /// The volumetric thin-cylinder representation.
    pub fn tube(length: Real, radius: Real) -> Result<Self, ValidationError> {
        Line::new(length, radius, LineStyle::Tube)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_positive("length", self.length)?;
        ensure_positive("radius", self.radius)
    }

    /// The cylinder occupied by the tube representation.
    pub const fn as_frustum(&self) -> Frustum {
        Frustum {
            r_lower: self.radius,
            r_upper: self.radius,
            height: self.length,
        }
    }

    pub fn contains(&self, p: &Point3<Real>) -> bool {
        self.as_frustum().contains(p)
    }

    pub fn bounds(&self) -> (Point3<Real>, Point3<Real>) {
        self.as_frustum().bounds()
    }

    /// Endpoints `[start, end]`.
    pub fn endpoints(&self) -> [Point3<Real>; 2] {
        [Point3::origin(), Point3::new(0.0, 0.0, self.length)]
    }

    /// Two vertices joined by a single edge.
    pub fn segment_mesh(&self) -> Mesh {
        let [start, end] = self.endpoints();
        Mesh::segment(start, end)
    }
}

impl Default for Line {
    fn default() -> Self {
        Line {
            length: 3.0,
            radius: 0.05,
            style: LineStyle::Segment,
        }
    }
}
