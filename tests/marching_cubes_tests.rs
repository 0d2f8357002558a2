mod support;

use isoscene::float_types::{DEFAULT_TOLERANCE as EPS, PI};
use isoscene::mesh::marching_cubes::{self, MarchingCubes};
use isoscene::{
    Cone, Frustum, Grid, GridResolution, IsosurfaceOps, OpenBox, Real, Sampling, Solid, sample,
};
use nalgebra::{Point3, Vector3};
use support::{assert_indices_valid, relative_error, vertices_within};

#[test]
fn field_without_crossing_is_empty() {
    let resolution = GridResolution::uniform(5);
    let (min, max) = (Point3::origin(), Point3::new(1.0, 1.0, 1.0));

    let outside = Grid::from_fn(resolution, min, max, |_| 0.0).unwrap();
    assert!(marching_cubes::extract(&outside, 0.5).is_empty());

    let inside = Grid::from_fn(resolution, min, max, |_| 1.0).unwrap();
    assert!(marching_cubes::extract(&inside, 0.5).is_empty());
}

#[test]
fn isovalue_outside_field_range_is_empty() {
    let grid = Grid::from_fn(
        GridResolution::uniform(8),
        Point3::new(-1.0, -1.0, -1.0),
        Point3::new(1.0, 1.0, 1.0),
        |p| 1.0 - p.coords.norm(),
    )
    .unwrap();
    let (lo, hi) = grid.value_range();

    assert!(MarchingCubes::new().extract(&grid, hi + 1.0).is_empty());
    assert!(MarchingCubes::new().extract(&grid, lo - 1.0).is_empty());
    assert!(!MarchingCubes::new().extract(&grid, 0.5).is_empty());
}

#[test]
fn cone_at_resolution_fifty_has_valid_faces() {
    let cone: Solid = Cone::new(1.0, 2.0).unwrap().into();
    let grid = sample(&cone, GridResolution::uniform(50), 0.1).unwrap();
    let mesh = marching_cubes::extract(&grid, 0.5);

    assert!(!mesh.vertices.is_empty());
    assert!(!mesh.faces.is_empty());
    assert_indices_valid(&mesh);
    assert!(mesh.validate().is_ok());
}

#[test]
fn padded_cone_is_closed_and_outward() {
    let cone = Cone::new(1.0, 2.0).unwrap();
    let mesh = Solid::from(cone)
        .to_mesh(&Sampling::new(50, 0.1))
        .unwrap();

    assert!(mesh.is_closed());
    let volume = mesh.signed_volume();
    let exact = PI * cone.radius * cone.radius * cone.height / 3.0;
    assert!(volume > 0.0);
    assert!(
        relative_error(volume, exact) < 0.05,
        "volume {volume} too far from {exact}"
    );
}

#[test]
fn frustum_volume_converges() {
    let frustum = Frustum::new(1.5, 0.5, 2.0).unwrap();
    let mesh = Solid::from(frustum)
        .to_mesh(&Sampling::new(30, 0.1))
        .unwrap();

    let (r, s, h) = (frustum.r_lower, frustum.r_upper, frustum.height);
    let exact = PI * h / 3.0 * (r * r + r * s + s * s);
    assert!(mesh.is_closed());
    assert!(relative_error(mesh.signed_volume(), exact) < 0.05);
}

#[test]
fn padded_open_box_is_closed_with_an_empty_cavity() {
    let open_box = OpenBox::default();
    let mesh = Solid::from(open_box)
        .to_mesh(&Sampling::new(30, 0.1))
        .unwrap();

    assert!(mesh.is_closed());
    assert!(mesh.signed_volume() > 0.0);
    // nothing hangs in the cavity column above the floor
    assert!(
        !mesh
            .vertices
            .iter()
            .any(|v| v.x.abs() < 0.5 && v.y.abs() < 0.5 && v.z > 0.3)
    );
}

#[test]
fn unpadded_solid_stays_open_at_the_border() {
    let cone: Solid = Cone::default().into();
    let mesh = cone.to_mesh(&Sampling::new(20, 0.0)).unwrap();

    assert!(!mesh.is_empty());
    assert!(!mesh.is_closed());
}

#[test]
fn vertices_stay_inside_the_sampled_box() {
    let solid: Solid = Frustum::default().into();
    let grid = solid.sample(GridResolution::new(12, 14, 16), 0.2).unwrap();
    let mesh = MarchingCubes::new().extract(&grid, 0.5);

    let res = grid.resolution();
    let far = grid.node_position(res.nx - 1, res.ny - 1, res.nz - 1);
    assert!(vertices_within(&mesh, grid.origin(), far, EPS));

    let (min, max) = solid.bounds();
    let spacing = grid.spacing();
    assert!(vertices_within(&mesh, min - spacing, max + spacing, EPS));
}

#[test]
fn grid_origin_places_the_surface() {
    let centre = Point3::new(5.0, 5.0, 5.0);
    let field = |p: &Point3<Real>| if (p - centre).norm() < 1.0 { 1.0 } else { 0.0 };
    let grid = Grid::from_fn(
        GridResolution::uniform(12),
        Point3::new(3.5, 3.5, 3.5),
        Point3::new(6.5, 6.5, 6.5),
        field,
    )
    .unwrap();
    let mesh = marching_cubes::extract(&grid, 0.5);

    assert!(mesh.is_closed());
    let bb = mesh.bounding_box();
    assert!((nalgebra::center(&bb.mins, &bb.maxs) - centre).norm() < 0.2);
    assert!(bb.extents().iter().all(|&e| e > 1.5 && e < 2.5));
}

#[test]
fn smooth_field_interpolates_crossings() {
    // linear ramp along z: the surface is the plane z = 0.25 exactly
    let grid = Grid::from_values(
        GridResolution::new(3, 3, 2),
        Point3::origin(),
        Vector3::new(0.5, 0.5, 1.0),
        [[1.0; 9], [0.0; 9]].concat(),
    )
    .unwrap();
    let mesh = marching_cubes::extract(&grid, 0.75);

    assert_eq!(mesh.vertices.len(), 9);
    assert_eq!(mesh.faces.len(), 8);
    for v in &mesh.vertices {
        assert!(support::approx_eq(v.z, 0.25, EPS));
    }
    for i in 0..mesh.faces.len() {
        // the inside lies below, so normals point up
        assert!(mesh.face_normal(i).unwrap().z > 0.99);
    }
}

#[cfg(feature = "surface-nets")]
#[test]
fn surface_nets_follow_the_same_contract() {
    use isoscene::SurfaceMethod;

    let cone: Solid = Cone::default().into();
    let sampling = Sampling::new(30, 0.1).with_method(SurfaceMethod::SurfaceNets);
    let mesh = cone.to_mesh(&sampling).unwrap();
    assert!(!mesh.faces.is_empty());
    assert_indices_valid(&mesh);

    let (min, max) = cone.bounds();
    assert!(vertices_within(&mesh, min, max, 0.2));
}
