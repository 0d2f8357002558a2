//! Projection of camera-space meshes onto a 2D image plane.
//!
//! The output is handed to an external rasterizer: projected points plus the
//! face and edge index lists of the source mesh.

use crate::float_types::{Real, tolerance};
use crate::mesh::Mesh;
use crate::transform::Transform;
use nalgebra::{Point2, Point3};

/// Axis pair kept by an orthographic projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProjectionPlane {
    /// Drop Z.
    #[default]
    XY,
    /// Drop Y.
    XZ,
    /// Drop X.
    YZ,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Projection {
    /// `(x, y) · focal_length / (depth + focal_offset)` where `depth = -z` in
    /// camera space. Points whose denominator is not positive have no image.
    Perspective {
        focal_length: Real,
        focal_offset: Real,
    },
    Orthographic(ProjectionPlane),
}

impl Projection {
    pub const fn perspective(focal_offset: Real) -> Self {
        Projection::Perspective {
            focal_length: 1.0,
            focal_offset,
        }
    }

    /// Image of a camera-space point, `None` when it lies on or behind the
    /// perspective centre.
    pub fn project_point(&self, p: &Point3<Real>) -> Option<Point2<Real>> {
        match *self {
            Projection::Perspective {
                focal_length,
                focal_offset,
            } => {
                let denom = -p.z + focal_offset;
                if denom <= tolerance() {
                    return None;
                }
                Some(Point2::new(p.x, p.y) * (focal_length / denom))
            },
            Projection::Orthographic(ProjectionPlane::XY) => Some(Point2::new(p.x, p.y)),
            Projection::Orthographic(ProjectionPlane::XZ) => Some(Point2::new(p.x, p.z)),
            Projection::Orthographic(ProjectionPlane::YZ) => Some(Point2::new(p.y, p.z)),
        }
    }

    /// Move `mesh` into camera space with `view` and project every vertex.
    ///
    /// Faces and edges touching a vertex without an image, or naming a vertex
    /// the mesh does not have, are dropped and counted in
    /// [`ProjectedMesh::discarded`].
    pub fn project_mesh(&self, mesh: &Mesh, view: &Transform) -> ProjectedMesh {
        let points: Vec<Option<Point2<Real>>> = mesh
            .vertices
            .iter()
            .map(|v| self.project_point(&view.apply_point(v)))
            .collect();

        let visible = |indices: &[usize]| {
            indices
                .iter()
                .all(|&i| points.get(i).is_some_and(Option::is_some))
        };
        let faces: Vec<[usize; 3]> = mesh
            .faces
            .iter()
            .copied()
            .filter(|f| visible(f.as_slice()))
            .collect();
        let edges: Vec<[usize; 2]> = mesh
            .edges
            .iter()
            .copied()
            .filter(|e| visible(e.as_slice()))
            .collect();

        let discarded = (mesh.faces.len() - faces.len()) + (mesh.edges.len() - edges.len());
        if discarded > 0 {
            log::warn!(
                "{} of {} primitives have no image and were dropped",
                discarded,
                mesh.faces.len() + mesh.edges.len()
            );
        }

        ProjectedMesh {
            points,
            faces,
            edges,
            discarded,
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Projection::perspective(0.0)
    }
}

/// Pixel rectangle a projection is fitted into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: Real,
    pub height: Real,
}

impl Viewport {
    pub const fn new(width: Real, height: Real) -> Self {
        Viewport { width, height }
    }
}

/// 2D image of one mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedMesh {
    /// One entry per source vertex; `None` for vertices without an image.
    pub points: Vec<Option<Point2<Real>>>,
    /// Faces whose three vertices all have an image.
    pub faces: Vec<[usize; 3]>,
    pub edges: Vec<[usize; 2]>,
    /// Number of faces and edges dropped during projection.
    pub discarded: usize,
}

impl ProjectedMesh {
    /// Image of vertex `index`, if it has one.
    pub fn point(&self, index: usize) -> Option<Point2<Real>> {
        self.points.get(index).copied().flatten()
    }

    /// Closed polygons, one per face, ready to be drawn.
    pub fn polygons(&self) -> impl Iterator<Item = [Point2<Real>; 3]> + '_ {
        self.faces
            .iter()
            .filter_map(|&[a, b, c]| Some([self.point(a)?, self.point(b)?, self.point(c)?]))
    }

    pub fn segments(&self) -> impl Iterator<Item = [Point2<Real>; 2]> + '_ {
        self.edges
            .iter()
            .filter_map(|&[a, b]| Some([self.point(a)?, self.point(b)?]))
    }

    /// `(min, max)` over the points that have an image.
    pub fn extent(&self) -> Option<(Point2<Real>, Point2<Real>)> {
        self.points.iter().flatten().fold(None, |acc, p| match acc {
            None => Some((*p, *p)),
            Some((lo, hi)) => Some((lo.inf(p), hi.sup(p))),
        })
    }

    /// Shift the image so its minimum corner lands on the viewport origin,
    /// scale it uniformly to fit, and flip Y so it grows downwards.
    pub fn fit_to_viewport(&self, viewport: Viewport) -> ProjectedMesh {
        let Some((lo, hi)) = self.extent() else {
            return self.clone();
        };
        let size = hi - lo;
        let eps = tolerance();
        let scale = match (size.x > eps, size.y > eps) {
            (true, true) => (viewport.width / size.x).min(viewport.height / size.y),
            (true, false) => viewport.width / size.x,
            (false, true) => viewport.height / size.y,
            (false, false) => 1.0,
        };

        let points = self
            .points
            .iter()
            .map(|p| {
                p.map(|p| {
                    let q = (p - lo) * scale;
                    Point2::new(q.x, viewport.height - q.y)
                })
            })
            .collect();

        ProjectedMesh {
            points,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_types::DEFAULT_TOLERANCE as EPS;
    use approx::assert_relative_eq;

    #[test]
    fn perspective_divides_by_offset_depth() {
        let projection = Projection::perspective(1.0);
        let p = projection.project_point(&Point3::new(2.0, 4.0, -3.0)).unwrap();
        assert_relative_eq!(p, Point2::new(0.5, 1.0), epsilon = EPS);
        assert!(projection.project_point(&Point3::new(1.0, 1.0, 1.0)).is_none());
    }

    #[test]
    fn orthographic_keeps_axis_pairs() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let keep = |plane| Projection::Orthographic(plane).project_point(&p).unwrap();
        assert_eq!(keep(ProjectionPlane::XY), Point2::new(1.0, 2.0));
        assert_eq!(keep(ProjectionPlane::XZ), Point2::new(1.0, 3.0));
        assert_eq!(keep(ProjectionPlane::YZ), Point2::new(2.0, 3.0));
    }
}
