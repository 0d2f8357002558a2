//! Procedural **volumetric solids** turned into triangle meshes and placed in a scene.
//!
//! A parametric solid (open box, cone, frustum or line) is sampled into an
//! occupancy [grid](grid::Grid), its boundary is extracted with
//! [marching cubes](mesh::marching_cubes), and the resulting [`Mesh`] is
//! placed in the world with a homogeneous [`Transform`]. A [`Scene`] gathers
//! placed objects in draw order and views them through a look-at
//! [camera](camera::CameraFrame); the [projection] module hands 2D images to
//! an external rasterizer.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - **surface-nets**: alternative extractor using [fast-surface-nets](https://crates.io/crates/fast-surface-nets)
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon for grid sampling and scene assembly
//! - **serde**: serialize the configuration types (solids, sampling, placement, object specs)

#![forbid(unsafe_code)]
#![warn(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod camera;
pub mod errors;
pub mod float_types;
pub mod grid;
pub mod mesh;
pub mod projection;
pub mod scene;
pub mod shapes;
pub mod transform;

#[cfg(any(
    all(feature = "f64", feature = "f32"),
    not(any(feature = "f64", feature = "f32"))
))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use camera::{CameraFrame, look_at, transform_to_camera};
pub use errors::ValidationError;
pub use float_types::Real;
pub use grid::{Grid, GridResolution};
pub use mesh::Mesh;
pub use mesh::traits::IsosurfaceOps;
pub use projection::{ProjectedMesh, Projection, ProjectionPlane, Viewport};
pub use scene::{ObjectSpec, Scene, SceneObject};
pub use shapes::{Cone, Frustum, Line, LineStyle, OpenBox, Sampling, Solid, SurfaceMethod, sample};
pub use transform::{Placement, Transform};
