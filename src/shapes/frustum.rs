use crate::errors::{ValidationError, ensure_non_negative, ensure_positive};
use crate::float_types::Real;
use nalgebra::Point3;

/// A truncated cone standing on `z = 0`, axis along +Z.
///
/// The radius varies linearly from `r_lower` at `z = 0` to `r_upper` at
/// `z = height`. Equal radii give a cylinder, `r_upper == 0` gives a cone.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frustum {
    pub r_lower: Real,
    pub r_upper: Real,
    pub height: Real,
}

impl Frustum {
    pub fn new(r_lower: Real, r_upper: Real, height: Real) -> Result<Self, ValidationError> {
        let frustum = Frustum {
            r_lower,
            r_upper,
            height,
        };
        frustum.validate()?;
        Ok(frustum)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_non_negative("r_lower", self.r_lower)?;
        ensure_non_negative("r_upper", self.r_upper)?;
        ensure_positive("height", self.height)?;
        if self.max_radius() <= 0.0 {
            return Err(ValidationError::parameter(
                "r_lower",
                self.r_lower,
                "at least one of the two radii must be positive",
            ));
        }
        Ok(())
    }

    pub fn max_radius(&self) -> Real {
        self.r_lower.max(self.r_upper)
    }

    /// Radius of the cross-section at height `z`, for `0 <= z <= height`.
    pub fn radius_at(&self, z: Real) -> Real {
        self.r_lower + (self.r_upper - self.r_lower) * (z / self.height)
    }

    /// Inside when `0 <= z <= height` and the distance to the axis is within the
    /// local radius. A zero-radius section (a cone's apex) holds nothing.
    pub fn contains(&self, p: &Point3<Real>) -> bool {
        if p.z < 0.0 || p.z > self.height {
            return false;
        }
        let radius = self.radius_at(p.z);
        radius > 0.0 && p.x.hypot(p.y) <= radius
    }

    pub fn bounds(&self) -> (Point3<Real>, Point3<Real>) {
        let r = self.max_radius();
        (Point3::new(-r, -r, 0.0), Point3::new(r, r, self.height))
    }
}

impl Default for Frustum {
    fn default() -> Self {
        Frustum {
            r_lower: 1.0,
            r_upper: 0.5,
            height: 2.0,
        }
    }
}

/// A right circular cone standing on its base at `z = 0`, apex at `z = height`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cone {
    pub radius: Real,
    pub height: Real,
}

impl Cone {
    pub fn new(radius: Real, height: Real) -> Result<Self, ValidationError> {
        let cone = Cone { radius, height };
        cone.validate()?;
        Ok(cone)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_positive("radius", self.radius)?;
        ensure_positive("height", self.height)
    }

    /// The frustum whose upper radius has collapsed to the apex.
    pub const fn as_frustum(&self) -> Frustum {
        Frustum {
            r_lower: self.radius,
            r_upper: 0.0,
            height: self.height,
        }
    }

    pub fn radius_at(&self, z: Real) -> Real {
        self.radius * (1.0 - z / self.height)
    }

    pub fn contains(&self, p: &Point3<Real>) -> bool {
        self.as_frustum().contains(p)
    }

    pub fn bounds(&self) -> (Point3<Real>, Point3<Real>) {
        self.as_frustum().bounds()
    }
}

impl Default for Cone {
    fn default() -> Self {
        Cone {
            radius: 1.0,
            height: 2.0,
        }
    }
}
