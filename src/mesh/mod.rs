//! `Mesh` struct: the vertex + face product passed between sampler, scene and projector

use crate::errors::ValidationError;
use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::transform::Transform;
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};
use std::sync::OnceLock;

pub mod marching_cubes;
#[cfg(feature = "surface-nets")]
pub mod surface_nets;
pub mod traits;

/// An indexed triangle mesh, optionally carrying bare line edges.
///
/// Faces wind counter-clockwise when seen from outside the solid. Meshes
/// coming out of extraction are not deduplicated beyond the vertex sharing
/// the extractor itself performs.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Point3<Real>>,
    /// Triangles as indices into `vertices`.
    pub faces: Vec<[usize; 3]>,
    /// Line primitives as indices into `vertices`.
    pub edges: Vec<[usize; 2]>,

    /// Lazily calculated AABB that spans `vertices`.
    pub bounding_box: OnceLock<Aabb>,
}

impl Mesh {
    /// Returns a new empty Mesh
    pub fn new() -> Self {
        Mesh::default()
    }

    /// Build a triangle mesh, checking that every face index is in range.
    pub fn from_parts(
        vertices: Vec<Point3<Real>>,
        faces: Vec<[usize; 3]>,
    ) -> Result<Self, ValidationError> {
        let mesh = Mesh {
            vertices,
            faces,
            ..Mesh::default()
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Two vertices joined by one edge.
    pub fn segment(start: Point3<Real>, end: Point3<Real>) -> Self {
        Mesh {
            vertices: vec![start, end],
            edges: vec![[0, 1]],
            ..Mesh::default()
        }
    }

    /// `true` when there is nothing to draw: no faces and no edges.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty() && self.edges.is_empty()
    }

    /// Check that every face and edge references an existing vertex.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let vertex_count = self.vertices.len();
        let face_indices = self
            .faces
            .iter()
            .enumerate()
            .flat_map(|(element, face)| face.iter().map(move |&index| (element, index)));
        let edge_indices = self
            .edges
            .iter()
            .enumerate()
            .flat_map(|(element, edge)| edge.iter().map(move |&index| (element, index)));

        match face_indices
            .chain(edge_indices)
            .find(|&(_, index)| index >= vertex_count)
        {
            Some((element, index)) => Err(ValidationError::IndexOutOfRange {
                element,
                index,
                vertex_count,
            }),
            None => Ok(()),
        }
    }

    /// Corner positions of face `i`.
    pub fn triangle(&self, i: usize) -> Option<[Point3<Real>; 3]> {
        let [a, b, c] = *self.faces.get(i)?;
        Some([
            *self.vertices.get(a)?,
            *self.vertices.get(b)?,
            *self.vertices.get(c)?,
        ])
    }

    /// Unit normal of face `i` following its winding, `None` for degenerate faces.
    pub fn face_normal(&self, i: usize) -> Option<Vector3<Real>> {
        let [a, b, c] = self.triangle(i)?;
        (b - a).cross(&(c - a)).try_normalize(Real::EPSILON)
    }

    /// Sum of the triangle areas.
    pub fn surface_area(&self) -> Real {
        (0..self.faces.len())
            .filter_map(|i| self.triangle(i))
            .map(|[a, b, c]| (b - a).cross(&(c - a)).norm() * 0.5)
            .sum()
    }

    /// **Mathematical Foundation: Divergence Theorem**
    ///
    /// Sum of the signed tetrahedron volumes spanned by the origin and each face:
    /// ```text
    /// V = (1/6) * Σ a · (b × c)
    /// ```
    /// Positive for a closed mesh whose faces point outward.
    pub fn signed_volume(&self) -> Real {
        (0..self.faces.len())
            .filter_map(|i| self.triangle(i))
            .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)) / 6.0)
            .sum()
    }

    /// **Mathematical Foundation: Oriented Manifold Closure Test**
    ///
    /// A mesh is closed and consistently wound when every directed edge `a → b`
    /// appears exactly once and its twin `b → a` appears exactly once too.
    /// A mesh without faces is not closed.
    pub fn is_closed(&self) -> bool {
        if self.faces.is_empty() {
            return false;
        }
        let mut directed: HashMap<(usize, usize), usize> = HashMap::new();
        for &[a, b, c] in &self.faces {
            for edge in [(a, b), (b, c), (c, a)] {
                *directed.entry(edge).or_insert(0) += 1;
            }
        }
        directed
            .iter()
            .all(|(&(a, b), &count)| count == 1 && directed.get(&(b, a)) == Some(&1))
    }

    /// Returns a [`parry3d::bounding_volume::Aabb`] indicating the 3D bounds of all `vertices`.
    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            if self.vertices.is_empty() {
                // trivial AABB at origin
                return Aabb::new(Point3::origin(), Point3::origin());
            }
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
            for v in &self.vertices {
                mins = mins.inf(v);
                maxs = maxs.sup(v);
            }
            Aabb::new(mins, maxs)
        })
    }

    /// Invalidates the cached bounding box after `vertices` changed.
    pub fn invalidate_bounding_box(&mut self) {
        self.bounding_box = OnceLock::new();
    }

    /// A copy with every vertex mapped through `transform`; topology is shared.
    pub fn transformed(&self, transform: &Transform) -> Mesh {
        Mesh {
            vertices: transform.apply(&self.vertices),
            faces: self.faces.clone(),
            edges: self.edges.clone(),
            bounding_box: OnceLock::new(),
        }
    }
}
