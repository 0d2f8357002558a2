//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use isoscene::{Mesh, float_types::Real};
use nalgebra::Point3;

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Relative error of `actual` against `expected`.
pub fn relative_error(actual: Real, expected: Real) -> Real {
    ((actual - expected) / expected).abs()
}

/// Panics unless every face and edge index of `mesh` is in range.
pub fn assert_indices_valid(mesh: &Mesh) {
    let n = mesh.vertices.len();
    for (i, face) in mesh.faces.iter().enumerate() {
        assert!(
            face.iter().all(|&v| v < n),
            "face {i} = {face:?} out of range for {n} vertices"
        );
    }
    for (i, edge) in mesh.edges.iter().enumerate() {
        assert!(
            edge.iter().all(|&v| v < n),
            "edge {i} = {edge:?} out of range for {n} vertices"
        );
    }
}

/// `true` when every vertex lies inside `[min, max]` grown by `eps`.
pub fn vertices_within(mesh: &Mesh, min: Point3<Real>, max: Point3<Real>, eps: Real) -> bool {
    mesh.vertices.iter().all(|v| {
        (0..3).all(|axis| v[axis] >= min[axis] - eps && v[axis] <= max[axis] + eps)
    })
}
