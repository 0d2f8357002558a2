use crate::errors::{ValidationError, ensure_positive};
use crate::float_types::Real;
use nalgebra::Point3;

/// A square, hollow box with a floor and no lid.
///
/// The box is centred on the Z axis, its floor rests on `z = 0` and its rim
/// is at `z = height`. Occupancy is the outer slab minus an inner slab that is
/// inset by `wall_thickness` on the four sides and starts `wall_thickness`
/// above the floor. The inner slab is unbounded upwards, which is what leaves
/// the top open.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpenBox {
    /// Outer edge length along X and Y.
    pub side: Real,
    pub height: Real,
    /// Thickness of the four walls and of the floor.
    pub wall_thickness: Real,
}

impl OpenBox {
    /// Build validated box parameters.
    pub fn new(side: Real, height: Real, wall_thickness: Real) -> Result<Self, ValidationError> {
        let open_box = OpenBox {
            side,
            height,
            wall_thickness,
        };
        open_box.validate()?;
        Ok(open_box)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_positive("side", self.side)?;
        ensure_positive("height", self.height)?;
        ensure_positive("wall_thickness", self.wall_thickness)?;
        if self.wall_thickness >= self.side / 2.0 {
            return Err(ValidationError::parameter(
                "wall_thickness",
                self.wall_thickness,
                "must be smaller than half the side length",
            ));
        }
        if self.wall_thickness >= self.height {
            return Err(ValidationError::parameter(
                "wall_thickness",
                self.wall_thickness,
                "must be smaller than the height, or the floor fills the box",
            ));
        }
        Ok(())
    }

    /// Half of the outer edge length.
    pub fn half_side(&self) -> Real {
        self.side / 2.0
    }

    /// Half of the cavity's edge length.
    pub fn inner_half_side(&self) -> Real {
        self.half_side() - self.wall_thickness
    }

    pub fn contains(&self, p: &Point3<Real>) -> bool {
        let half = self.half_side();
        let outer = p.x.abs() <= half && p.y.abs() <= half && p.z >= 0.0 && p.z <= self.height;
        if !outer {
            return false;
        }
        let inner_half = self.inner_half_side();
        let cavity =
            p.x.abs() < inner_half && p.y.abs() < inner_half && p.z > self.wall_thickness;
        !cavity
    }

    /// Tight axis-aligned bounds `(min, max)`.
    pub fn bounds(&self) -> (Point3<Real>, Point3<Real>) {
        let half = self.half_side();
        (
            Point3::new(-half, -half, 0.0),
            Point3::new(half, half, self.height),
        )
    }
}

impl Default for OpenBox {
    fn default() -> Self {
        OpenBox {
            side: 2.0,
            height: 1.0,
            wall_thickness: 0.1,
        }
    }
}
