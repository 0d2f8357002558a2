//! Look-at camera: an orthonormal basis built from eye, target and up.

use crate::errors::{ValidationError, ensure_finite_point};
use crate::float_types::{Real, tolerance};
use crate::transform::Transform;
use nalgebra::{Matrix3, Matrix4, Point3, Unit, Vector3};

/// Orthonormal camera basis plus the eye position.
///
/// Camera space is right-handed with `right` along +X, `true_up` along +Y and
/// the viewing direction along -Z. Points in front of the camera therefore
/// have negative camera-space z; [`CameraFrame::depth_of`] reports the
/// positive distance along the view direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub eye: Point3<Real>,
    pub target: Point3<Real>,
    pub up: Vector3<Real>,
    pub right: Unit<Vector3<Real>>,
    pub true_up: Unit<Vector3<Real>>,
    pub forward: Unit<Vector3<Real>>,
}

impl CameraFrame {
    /// **Mathematical Foundation: Gram-Schmidt Look-At Basis**
    ///
    /// ```text
    /// forward = normalize(target - eye)
    /// right   = normalize(forward × up)
    /// up'     = normalize(right × forward)
    /// ```
    /// Fails with [`ValidationError::NumericDegeneracy`] when `eye == target`
    /// (no forward direction) or when `up` is parallel to `forward` (no right
    /// direction).
    pub fn look_at(
        eye: Point3<Real>,
        target: Point3<Real>,
        up: Vector3<Real>,
    ) -> Result<Self, ValidationError> {
        ensure_finite_point(&eye)?;
        ensure_finite_point(&target)?;
        ensure_finite_point(&Point3::from(up))?;

        let eps = tolerance();
        let forward =
            Unit::try_new(target - eye, eps).ok_or(ValidationError::NumericDegeneracy("forward"))?;
        let right = Unit::try_new(forward.cross(&up), eps)
            .ok_or(ValidationError::NumericDegeneracy("right"))?;
        let true_up = Unit::try_new(right.cross(&*forward), eps)
            .ok_or(ValidationError::NumericDegeneracy("up"))?;

        Ok(CameraFrame {
            eye,
            target,
            up,
            right,
            true_up,
            forward,
        })
    }

    /// World→camera rotation, rows `[right; up'; -forward]`.
    pub fn rotation(&self) -> Matrix3<Real> {
        Matrix3::from_rows(&[
            self.right.transpose(),
            self.true_up.transpose(),
            (-self.forward.into_inner()).transpose(),
        ])
    }

    /// World→camera transform: rotation block `R` and translation `-R · eye`.
    pub fn view_transform(&self) -> Transform {
        let rotation = self.rotation();
        let mut matrix = rotation.to_homogeneous();
        matrix
            .fixed_view_mut::<3, 1>(0, 3)
            .copy_from(&(-(rotation * self.eye.coords)));
        Transform::from_matrix(matrix)
    }

    /// Signed distance of `p` in front of the eye along the view direction.
    pub fn depth_of(&self, p: &Point3<Real>) -> Real {
        self.forward.dot(&(p - self.eye))
    }

    pub fn distance_to_target(&self) -> Real {
        (self.target - self.eye).norm()
    }
}

/// World→camera transform for a camera at `eye` looking at `target`.
pub fn look_at(
    eye: Point3<Real>,
    target: Point3<Real>,
    up: Vector3<Real>,
) -> Result<Transform, ValidationError> {
    Ok(CameraFrame::look_at(eye, target, up)?.view_transform())
}

/// Apply `transform` to every vertex: to homogeneous coordinates, multiply,
/// then drop the fourth component. Works for look-at transforms and the
/// identity alike.
///
/// Affine transforms keep `w = 1`. For a projective matrix the result is
/// *not* divided by `w`; that division belongs to the projector.
pub fn transform_to_camera(vertices: &[Point3<Real>], transform: &Transform) -> Vec<Point3<Real>> {
    let matrix: &Matrix4<Real> = transform.matrix();
    vertices
        .iter()
        .map(|p| Point3::from((matrix * p.to_homogeneous()).xyz()))
        .collect()
}
