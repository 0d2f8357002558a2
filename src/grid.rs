//! Regular sample lattice holding a scalar occupancy field.
//!
//! Nodes are stored x-fastest: the sample at `(i, j, k)` lives at
//! `(k * ny + j) * nx + i`. Node `(i, j, k)` sits at
//! `origin + (i·Δx, j·Δy, k·Δz)` in world units.

use crate::errors::{ValidationError, ensure_finite_point};
use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Number of samples along each axis of a [`Grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridResolution {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl GridResolution {
    pub const fn new(nx: usize, ny: usize, nz: usize) -> Self {
        GridResolution { nx, ny, nz }
    }

    /// Same sample count along every axis.
    pub const fn uniform(samples: usize) -> Self {
        GridResolution::new(samples, samples, samples)
    }

    /// Marching cubes needs at least one full cell, i.e. two samples per axis,
    /// and the node count has to be addressable.
    pub const fn validate(&self) -> Result<(), ValidationError> {
        if self.nx < 2 {
            return Err(ValidationError::InvalidResolution {
                axis: 'x',
                samples: self.nx,
            });
        }
        if self.ny < 2 {
            return Err(ValidationError::InvalidResolution {
                axis: 'y',
                samples: self.ny,
            });
        }
        if self.nz < 2 {
            return Err(ValidationError::InvalidResolution {
                axis: 'z',
                samples: self.nz,
            });
        }
        if self.checked_node_count().is_none() {
            return Err(self.too_large(usize::MAX));
        }
        Ok(())
    }

    /// Total number of lattice nodes, or `None` if it overflows `usize`.
    pub const fn checked_node_count(&self) -> Option<usize> {
        match self.nx.checked_mul(self.ny) {
            Some(nxy) => nxy.checked_mul(self.nz),
            None => None,
        }
    }

    /// Total number of lattice nodes. Saturates at `usize::MAX`; a resolution
    /// that passed [`validate`](Self::validate) never does.
    pub const fn node_count(&self) -> usize {
        self.nx.saturating_mul(self.ny).saturating_mul(self.nz)
    }

    /// Number of cubes between the nodes.
    pub const fn cell_count(&self) -> usize {
        self.nx
            .saturating_sub(1)
            .saturating_mul(self.ny.saturating_sub(1))
            .saturating_mul(self.nz.saturating_sub(1))
    }

    /// [`ValidationError::GridTooLarge`] for this resolution.
    pub const fn too_large(&self, limit: usize) -> ValidationError {
        ValidationError::GridTooLarge {
            nx: self.nx,
            ny: self.ny,
            nz: self.nz,
            limit,
        }
    }

    pub const fn as_array(&self) -> [usize; 3] {
        [self.nx, self.ny, self.nz]
    }
}

impl Default for GridResolution {
    fn default() -> Self {
        GridResolution::uniform(20)
    }
}

impl From<usize> for GridResolution {
    fn from(samples: usize) -> Self {
        GridResolution::uniform(samples)
    }
}

/// A sampled scalar field on a regular lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    resolution: GridResolution,
    origin: Point3<Real>,
    spacing: Vector3<Real>,
    values: Vec<Real>,
}

impl Grid {
    /// Sample `field` at every node of a lattice spanning `min_pt..=max_pt`
    /// with `resolution` nodes per axis.
    pub fn from_fn<F>(
        resolution: GridResolution,
        min_pt: Point3<Real>,
        max_pt: Point3<Real>,
        field: F,
    ) -> Result<Grid, ValidationError>
    where
        F: Fn(&Point3<Real>) -> Real + Sync + Send,
    {
        resolution.validate()?;
        ensure_finite_point(&min_pt)?;
        ensure_finite_point(&max_pt)?;

        let extent = max_pt - min_pt;
        let spacing = Vector3::new(
            extent.x / (resolution.nx as Real - 1.0),
            extent.y / (resolution.ny as Real - 1.0),
            extent.z / (resolution.nz as Real - 1.0),
        );
        validate_spacing(&spacing)?;

        log::trace!(
            "sampling {}x{}x{} grid from {} to {}",
            resolution.nx,
            resolution.ny,
            resolution.nz,
            min_pt,
            max_pt
        );

        let mut grid = Grid {
            resolution,
            origin: min_pt,
            spacing,
            values: vec![0.0; resolution.node_count()],
        };
        grid.fill(field);
        Ok(grid)
    }

    /// Wrap an existing buffer of samples laid out x-fastest.
    pub fn from_values(
        resolution: GridResolution,
        origin: Point3<Real>,
        spacing: Vector3<Real>,
        values: Vec<Real>,
    ) -> Result<Grid, ValidationError> {
        resolution.validate()?;
        ensure_finite_point(&origin)?;
        validate_spacing(&spacing)?;
        if values.len() != resolution.node_count() {
            return Err(ValidationError::GridSizeMismatch {
                expected: resolution.node_count(),
                actual: values.len(),
            });
        }
        Ok(Grid {
            resolution,
            origin,
            spacing,
            values,
        })
    }

    #[cfg(not(feature = "parallel"))]
    fn fill<F>(&mut self, field: F)
    where
        F: Fn(&Point3<Real>) -> Real + Sync + Send,
    {
        let (resolution, origin, spacing) = (self.resolution, self.origin, self.spacing);
        self.values.iter_mut().enumerate().for_each(|(idx, value)| {
            let [i, j, k] = delinearize(&resolution, idx);
            *value = field(&node_position(&origin, &spacing, i, j, k));
        });
    }

    #[cfg(feature = "parallel")]
    fn fill<F>(&mut self, field: F)
    where
        F: Fn(&Point3<Real>) -> Real + Sync + Send,
    {
        let (resolution, origin, spacing) = (self.resolution, self.origin, self.spacing);
        self.values
            .par_iter_mut()
            .enumerate()
            .for_each(|(idx, value)| {
                let [i, j, k] = delinearize(&resolution, idx);
                *value = field(&node_position(&origin, &spacing, i, j, k));
            });
    }

    pub const fn resolution(&self) -> GridResolution {
        self.resolution
    }

    /// World position of node `(0, 0, 0)`.
    pub const fn origin(&self) -> Point3<Real> {
        self.origin
    }

    /// Physical distance between neighbouring nodes along each axis.
    pub const fn spacing(&self) -> Vector3<Real> {
        self.spacing
    }

    pub fn values(&self) -> &[Real] {
        &self.values
    }

    #[inline]
    pub const fn linearize(&self, i: usize, j: usize, k: usize) -> usize {
        (k * self.resolution.ny + j) * self.resolution.nx + i
    }

    #[inline]
    pub const fn delinearize(&self, idx: usize) -> [usize; 3] {
        delinearize(&self.resolution, idx)
    }

    /// Sample at node `(i, j, k)`, or `None` outside the lattice.
    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<Real> {
        let GridResolution { nx, ny, nz } = self.resolution;
        if i < nx && j < ny && k < nz {
            Some(self.values[self.linearize(i, j, k)])
        } else {
            None
        }
    }

    /// Unchecked sample lookup for the extractors' inner loops.
    #[inline]
    pub(crate) fn at(&self, i: usize, j: usize, k: usize) -> Real {
        self.values[self.linearize(i, j, k)]
    }

    /// World position of node `(i, j, k)`.
    pub fn node_position(&self, i: usize, j: usize, k: usize) -> Point3<Real> {
        node_position(&self.origin, &self.spacing, i, j, k)
    }

    /// World position of the fractional lattice coordinate `p`.
    pub fn lattice_to_world(&self, p: &Point3<Real>) -> Point3<Real> {
        self.origin + p.coords.component_mul(&self.spacing)
    }

    /// Smallest and largest sample.
    pub fn value_range(&self) -> (Real, Real) {
        self.values
            .iter()
            .fold((Real::INFINITY, Real::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Number of nodes whose sample lies strictly above `isovalue`.
    pub fn count_above(&self, isovalue: Real) -> usize {
        self.values.iter().filter(|&&v| v > isovalue).count()
    }

    /// Index of the z layer closest to the world height `z`, if it lies within the lattice.
    pub fn layer_at(&self, z: Real) -> Option<usize> {
        let t = ((z - self.origin.z) / self.spacing.z).round();
        if t < 0.0 || t > (self.resolution.nz - 1) as Real {
            None
        } else {
            Some(t as usize)
        }
    }

    /// Nodes of layer `k` whose sample lies strictly above `isovalue`, as world positions.
    pub fn layer_nodes_above(&self, k: usize, isovalue: Real) -> Vec<Point3<Real>> {
        let GridResolution { nx, ny, nz } = self.resolution;
        if k >= nz {
            return Vec::new();
        }
        (0..ny)
            .flat_map(|j| (0..nx).map(move |i| (i, j)))
            .filter(|&(i, j)| self.at(i, j, k) > isovalue)
            .map(|(i, j)| self.node_position(i, j, k))
            .collect()
    }
}

#[inline]
const fn delinearize(resolution: &GridResolution, idx: usize) -> [usize; 3] {
    let i = idx % resolution.nx;
    let jk = idx / resolution.nx;
    let j = jk % resolution.ny;
    let k = jk / resolution.ny;
    [i, j, k]
}

#[inline]
fn node_position(
    origin: &Point3<Real>,
    spacing: &Vector3<Real>,
    i: usize,
    j: usize,
    k: usize,
) -> Point3<Real> {
    Point3::new(
        origin.x + i as Real * spacing.x,
        origin.y + j as Real * spacing.y,
        origin.z + k as Real * spacing.z,
    )
}

fn validate_spacing(spacing: &Vector3<Real>) -> Result<(), ValidationError> {
    for (name, value) in [
        ("spacing.x", spacing.x),
        ("spacing.y", spacing.y),
        ("spacing.z", spacing.z),
    ] {
        crate::errors::ensure_positive(name, value)?;
    }
    Ok(())
}
