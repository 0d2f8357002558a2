//! Homogeneous 4×4 transforms placing meshes in the scene.

use crate::errors::{ValidationError, ensure_finite_point, ensure_positive};
use crate::float_types::Real;
use nalgebra::{Matrix3, Matrix4, Point3, Rotation3, Translation3, Vector3};

/// An affine transform stored as a homogeneous matrix acting on column vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Matrix4<Real>,
}

impl Transform {
    pub fn identity() -> Self {
        Transform {
            matrix: Matrix4::identity(),
        }
    }

    pub const fn from_matrix(matrix: Matrix4<Real>) -> Self {
        Transform { matrix }
    }

    pub const fn matrix(&self) -> &Matrix4<Real> {
        &self.matrix
    }

    /// **Mathematical Foundation: Affine Composition**
    ///
    /// Builds the placement transform
    /// ```text
    /// M = T(t) · Rz(γ) · Ry(β) · Rx(α) · S(s)
    /// ```
    /// so a vertex is scaled uniformly first, rotated about X, then Y, then Z
    /// (right-handed, angles in degrees), and translated last.
    pub fn compose(scale: Real, rotation_degrees: Vector3<Real>, translation: Vector3<Real>) -> Self {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), rotation_degrees.x.to_radians());
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), rotation_degrees.y.to_radians());
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), rotation_degrees.z.to_radians());
        let rotation = (rz * ry * rx).to_homogeneous();
        let scaling = Matrix4::new_scaling(scale);
        let translation = Translation3::from(translation).to_homogeneous();

        Transform {
            matrix: translation * rotation * scaling,
        }
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &Transform) -> Transform {
        Transform {
            matrix: next.matrix * self.matrix,
        }
    }

    /// `None` when the matrix is singular (a zero scale).
    pub fn inverse(&self) -> Option<Transform> {
        self.matrix.try_inverse().map(Transform::from_matrix)
    }

    /// Upper-left 3×3 block: rotation times scale.
    pub fn rotation_block(&self) -> Matrix3<Real> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    pub fn translation(&self) -> Vector3<Real> {
        self.matrix.fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// Map a point, including translation. The bottom row is ignored, so a
    /// projective matrix is not divided through by `w`.
    pub fn apply_point(&self, p: &Point3<Real>) -> Point3<Real> {
        Point3::from(self.rotation_block() * p.coords + self.translation())
    }

    /// Map a direction, ignoring translation.
    pub fn apply_vector(&self, v: &Vector3<Real>) -> Vector3<Real> {
        self.matrix.transform_vector(v)
    }

    pub fn apply(&self, vertices: &[Point3<Real>]) -> Vec<Point3<Real>> {
        vertices.iter().map(|p| self.apply_point(p)).collect()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::identity()
    }
}

impl From<Matrix4<Real>> for Transform {
    fn from(matrix: Matrix4<Real>) -> Self {
        Transform::from_matrix(matrix)
    }
}

/// Per-object placement parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    /// Uniform scale factor.
    pub scale: Real,
    /// Rotation about X, Y, Z in degrees.
    pub rotation_degrees: Vector3<Real>,
    pub translation: Vector3<Real>,
}

impl Placement {
    pub fn new(scale: Real, rotation_degrees: Vector3<Real>, translation: Vector3<Real>) -> Self {
        Placement {
            scale,
            rotation_degrees,
            translation,
        }
    }

    pub fn translated(translation: Vector3<Real>) -> Self {
        Placement {
            translation,
            ..Placement::default()
        }
    }

    /// Scale must be positive; angles and offsets finite.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_positive("scale", self.scale)?;
        ensure_finite_point(&Point3::from(self.rotation_degrees))?;
        ensure_finite_point(&Point3::from(self.translation))
    }

    pub fn to_transform(&self) -> Transform {
        Transform::compose(self.scale, self.rotation_degrees, self.translation)
    }
}

impl Default for Placement {
    fn default() -> Self {
        Placement {
            scale: 1.0,
            rotation_degrees: Vector3::zeros(),
            translation: Vector3::zeros(),
        }
    }
}
