//! Scene assembly: many placed solids, one optional camera.
//!
//! Every object runs its own sample → extract → place chain. Objects share no
//! state, so with the `parallel` feature they are built on the rayon pool;
//! the scene keeps the input order either way.

use crate::camera::CameraFrame;
use crate::errors::ValidationError;
use crate::float_types::Real;
use crate::float_types::parry3d::bounding_volume::{Aabb, BoundingVolume};
use crate::mesh::Mesh;
use crate::projection::{ProjectedMesh, Projection};
use crate::shapes::{Sampling, Solid};
use crate::transform::{Placement, Transform};
use nalgebra::Vector3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Everything needed to build one scene object.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectSpec {
    pub solid: Solid,
    pub sampling: Sampling,
    pub placement: Placement,
    pub label: Option<String>,
}

impl ObjectSpec {
    /// `solid` with default sampling at the origin.
    pub fn new(solid: impl Into<Solid>) -> Self {
        ObjectSpec {
            solid: solid.into(),
            sampling: Sampling::default(),
            placement: Placement::default(),
            label: None,
        }
    }

    pub fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_resolution(mut self, samples: usize) -> Self {
        self.sampling.resolution = samples.into();
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Shorthand for a [`Placement`] from its three parts.
    pub fn placed(
        self,
        scale: Real,
        rotation_degrees: Vector3<Real>,
        translation: Vector3<Real>,
    ) -> Self {
        self.with_placement(Placement::new(scale, rotation_degrees, translation))
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Check solid, sampling and placement without computing anything.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.solid.validate()?;
        self.sampling.validate()?;
        self.placement.validate()
    }

    fn name(&self) -> &str {
        self.label.as_deref().unwrap_or(self.solid.name())
    }
}

/// One placed mesh.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub label: Option<String>,
    /// Local → world transform the mesh was placed with.
    pub transform: Transform,
    /// World-space mesh.
    pub mesh: Mesh,
}

impl SceneObject {
    /// Sample, extract and place one object.
    pub fn build(spec: &ObjectSpec) -> Result<SceneObject, ValidationError> {
        spec.placement.validate()?;
        let transform = spec.placement.to_transform();
        let local = spec.solid.to_mesh(&spec.sampling)?;
        if local.is_empty() {
            log::debug!("{}: extraction produced an empty mesh", spec.name());
        }

        Ok(SceneObject {
            label: spec.label.clone(),
            transform,
            mesh: local.transformed(&transform),
        })
    }
}

/// Placed objects in input order, plus the camera they are viewed through.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    camera: Option<CameraFrame>,
}

impl Scene {
    /// Build every object, all-or-nothing.
    ///
    /// All specs are validated before any grid is sampled; the first invalid
    /// spec aborts the assembly.
    pub fn assemble(specs: &[ObjectSpec]) -> Result<Scene, ValidationError> {
        for (index, spec) in specs.iter().enumerate() {
            spec.validate().inspect_err(|err| {
                log::debug!("object {} ({}) rejected: {}", index, spec.name(), err)
            })?;
        }
        let objects = build_all(specs).into_iter().collect::<Result<Vec<_>, _>>()?;
        log::debug!("assembled scene with {} objects", objects.len());

        Ok(Scene {
            objects,
            camera: None,
        })
    }

    /// Build every object that can be built.
    ///
    /// Failed objects are left out of the scene and reported with their input
    /// index; the remaining objects keep their relative order.
    pub fn assemble_isolated(specs: &[ObjectSpec]) -> (Scene, Vec<(usize, ValidationError)>) {
        let mut objects = Vec::with_capacity(specs.len());
        let mut failures = Vec::new();

        for (index, result) in build_all(specs).into_iter().enumerate() {
            match result {
                Ok(object) => objects.push(object),
                Err(err) => {
                    log::warn!("skipping object {} ({}): {}", index, specs[index].name(), err);
                    failures.push((index, err));
                },
            }
        }

        (
            Scene {
                objects,
                camera: None,
            },
            failures,
        )
    }

    /// Wrap already placed objects.
    pub fn from_objects(objects: Vec<SceneObject>) -> Scene {
        Scene {
            objects,
            camera: None,
        }
    }

    pub fn with_camera(mut self, camera: CameraFrame) -> Self {
        self.camera = Some(camera);
        self
    }

    pub const fn camera(&self) -> Option<&CameraFrame> {
        self.camera.as_ref()
    }

    /// World → camera transform, or the identity for a world-space view.
    pub fn view_transform(&self) -> Transform {
        self.camera
            .as_ref()
            .map_or_else(Transform::identity, CameraFrame::view_transform)
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SceneObject> {
        self.objects.iter()
    }

    /// Every object's mesh expressed in camera coordinates, in scene order.
    pub fn camera_space(&self) -> Vec<Mesh> {
        let view = self.view_transform();
        self.objects.iter().map(|o| o.mesh.transformed(&view)).collect()
    }

    /// Project every object through the scene's view, in scene order.
    pub fn project(&self, projection: &Projection) -> Vec<ProjectedMesh> {
        let view = self.view_transform();
        self.objects
            .iter()
            .map(|o| projection.project_mesh(&o.mesh, &view))
            .collect()
    }

    /// World bounds of all non-empty objects, `None` when there are none.
    pub fn bounding_box(&self) -> Option<Aabb> {
        self.objects
            .iter()
            .filter(|o| !o.mesh.vertices.is_empty())
            .map(|o| o.mesh.bounding_box())
            .reduce(|a, b| a.merged(&b))
    }
}

impl<'a> IntoIterator for &'a Scene {
    type Item = &'a SceneObject;
    type IntoIter = std::slice::Iter<'a, SceneObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

#[cfg(not(feature = "parallel"))]
fn build_all(specs: &[ObjectSpec]) -> Vec<Result<SceneObject, ValidationError>> {
    specs.iter().map(SceneObject::build).collect()
}

#[cfg(feature = "parallel")]
fn build_all(specs: &[ObjectSpec]) -> Vec<Result<SceneObject, ValidationError>> {
    specs.par_iter().map(SceneObject::build).collect()
}
