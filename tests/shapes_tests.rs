mod support;

use approx::assert_relative_eq;
use isoscene::errors::ValidationError;
use isoscene::float_types::DEFAULT_TOLERANCE as EPS;
use isoscene::shapes::INSIDE;
use isoscene::{
    Cone, Frustum, GridResolution, Line, LineStyle, OpenBox, Real, Sampling, Solid, sample,
};
use nalgebra::Point3;

#[test]
fn open_box_has_a_floor() {
    let open_box = OpenBox::default();
    let grid = sample(&open_box.into(), GridResolution::uniform(21), 0.0).unwrap();

    let floor = grid.layer_at(open_box.wall_thickness).unwrap();
    let occupied = grid.layer_nodes_above(floor, 0.5);
    assert!(!occupied.is_empty());
    // the whole floor slab is solid, centre included
    assert_eq!(occupied.len(), 21 * 21);
    assert!(open_box.contains(&Point3::new(0.0, 0.0, open_box.wall_thickness)));
}

#[test]
fn open_box_top_is_open() {
    let open_box = OpenBox::default();
    let grid = sample(&open_box.into(), GridResolution::uniform(21), 0.0).unwrap();
    let inner = open_box.inner_half_side();

    let top = grid.layer_at(open_box.height).unwrap();
    for p in grid.layer_nodes_above(top, 0.5) {
        assert!(
            p.x.abs() >= inner - EPS || p.y.abs() >= inner - EPS,
            "node {p} inside the opening is occupied"
        );
    }
    assert!(!open_box.contains(&Point3::new(0.0, 0.0, open_box.height)));
    // the rim itself is wall
    assert!(open_box.contains(&Point3::new(open_box.half_side(), 0.0, open_box.height)));
}

#[test]
fn open_box_rejects_thick_walls() {
    assert_eq!(
        OpenBox::new(2.0, 1.0, 1.0),
        Err(ValidationError::InvalidParameter {
            name: "wall_thickness",
            value: 1.0,
            reason: "must be smaller than half the side length",
        })
    );
    assert!(OpenBox::new(2.0, 0.1, 0.1).is_err());
    assert!(OpenBox::new(0.0, 1.0, 0.1).is_err());
    assert!(OpenBox::new(2.0, 1.0, 0.0).is_err());
}

#[test]
fn cone_base_spans_radius_and_apex_is_empty() {
    let cone = Cone::new(1.0, 2.0).unwrap();

    assert!(cone.contains(&Point3::new(0.99, 0.0, 0.0)));
    assert!(cone.contains(&Point3::new(0.0, -0.99, 0.0)));
    assert!(!cone.contains(&Point3::new(1.01, 0.0, 0.0)));
    assert!(!cone.contains(&Point3::new(0.0, 0.0, -0.01)));

    assert!(!cone.contains(&Point3::new(0.0, 0.0, 2.0)));
    assert!(cone.contains(&Point3::new(0.0, 0.0, 1.99)));
    assert_relative_eq!(cone.radius_at(1.0), 0.5);
}

#[test]
fn cone_sampled_base_matches_radius() {
    let cone = Cone::new(1.0, 2.0).unwrap();
    let grid = sample(&cone.into(), GridResolution::uniform(41), 0.0).unwrap();

    let base = grid.layer_nodes_above(0, 0.5);
    let widest = base
        .iter()
        .map(|p| p.x.hypot(p.y))
        .fold(0.0, Real::max);
    // lattice spacing is 0.05 across the base
    assert!(widest <= 1.0 && widest > 0.95, "widest base node at {widest}");

    let apex = grid.layer_nodes_above(40, 0.5);
    assert!(apex.is_empty());
}

#[test]
fn frustum_interpolates_radius() {
    let frustum = Frustum::new(1.5, 0.5, 2.0).unwrap();
    assert_relative_eq!(frustum.radius_at(0.0), 1.5);
    assert_relative_eq!(frustum.radius_at(1.0), 1.0);
    assert_relative_eq!(frustum.radius_at(2.0), 0.5);

    assert!(frustum.contains(&Point3::new(0.99, 0.0, 1.0)));
    assert!(!frustum.contains(&Point3::new(1.01, 0.0, 1.0)));
    assert!(frustum.contains(&Point3::new(0.0, 0.49, 2.0)));
    assert!(!frustum.contains(&Point3::new(0.0, 0.0, 2.01)));
}

#[test]
fn frustum_reduces_to_cylinder_and_cone() {
    let cylinder = Frustum::new(0.5, 0.5, 2.0).unwrap();
    for z in [0.0, 0.7, 2.0] {
        assert_relative_eq!(cylinder.radius_at(z), 0.5);
    }

    let as_cone = Frustum::new(1.0, 0.0, 2.0).unwrap();
    let cone = Cone::new(1.0, 2.0).unwrap();
    assert_eq!(cone.as_frustum(), as_cone);
    for p in [
        Point3::new(0.3, 0.2, 0.5),
        Point3::new(0.6, 0.0, 0.9),
        Point3::new(0.0, 0.1, 1.85),
        Point3::new(0.0, 0.0, 2.0),
    ] {
        assert_eq!(cone.contains(&p), as_cone.contains(&p), "disagree at {p}");
    }
}

#[test]
fn invalid_dimensions_are_rejected() {
    assert!(Cone::new(-1.0, 2.0).is_err());
    assert!(Cone::new(1.0, 0.0).is_err());
    assert!(Frustum::new(0.0, 0.0, 1.0).is_err());
    assert!(Frustum::new(1.0, -0.5, 1.0).is_err());
    assert!(Line::tube(0.0, 0.1).is_err());
    assert!(Line::tube(1.0, 0.0).is_err());
    assert!(Cone::new(Real::NAN, 1.0).is_err());
}

#[test]
fn sampler_checks_resolution_and_padding_first() {
    let cone: Solid = Cone::default().into();
    assert_eq!(
        sample(&cone, GridResolution::new(10, 1, 10), 0.1).unwrap_err(),
        ValidationError::InvalidResolution {
            axis: 'y',
            samples: 1
        }
    );
    assert!(matches!(
        sample(&cone, GridResolution::uniform(10), -0.1),
        Err(ValidationError::InvalidParameter { name: "padding", .. })
    ));
    let bad = Solid::Cone(Cone {
        radius: 0.0,
        height: 1.0,
    });
    assert!(matches!(
        bad.to_mesh(&Sampling::default()),
        Err(ValidationError::InvalidParameter { name: "radius", .. })
    ));
}

#[test]
fn oversized_grids_are_rejected_before_allocation() {
    let cone: Solid = Cone::default().into();
    let huge = GridResolution::uniform(1 << 22);
    assert!(matches!(
        sample(&cone, huge, 0.1),
        Err(ValidationError::GridTooLarge { .. })
    ));
    assert!(matches!(
        cone.to_mesh(&Sampling::new(1 << 22, 0.1)),
        Err(ValidationError::GridTooLarge { .. })
    ));
}

#[cfg(feature = "surface-nets")]
#[test]
fn surface_nets_sampling_must_fit_u32_indices() {
    use isoscene::SurfaceMethod;

    // 2048^3 nodes fit a usize but not the u32 surface nets indexes with
    let sampling = Sampling::new(2048, 0.1).with_method(SurfaceMethod::SurfaceNets);
    assert_eq!(
        sampling.validate(),
        Err(ValidationError::GridTooLarge {
            nx: 2048,
            ny: 2048,
            nz: 2048,
            limit: u32::MAX as usize
        })
    );
    assert!(Sampling::new(2048, 0.1).validate().is_ok());
}

#[test]
fn padding_keeps_the_lattice_border_empty() {
    let solid: Solid = Frustum::default().into();
    let grid = solid.sample(GridResolution::uniform(16), 0.1).unwrap();
    let res = grid.resolution();

    assert_eq!(grid.value_range(), (0.0, INSIDE));
    assert!(grid.layer_nodes_above(0, 0.5).is_empty());
    assert!(grid.layer_nodes_above(res.nz - 1, 0.5).is_empty());
    assert_relative_eq!(grid.origin(), Point3::new(-1.1, -1.1, -0.1), epsilon = EPS);
}

#[test]
fn segment_line_skips_sampling() {
    let line: Solid = Line::segment(3.0).unwrap().into();
    assert!(!line.is_volumetric());

    let mesh = line.to_mesh(&Sampling::default()).unwrap();
    assert!(mesh.faces.is_empty());
    assert_eq!(mesh.edges, vec![[0, 1]]);
    assert_eq!(
        mesh.vertices,
        vec![Point3::origin(), Point3::new(0.0, 0.0, 3.0)]
    );
    support::assert_indices_valid(&mesh);
}

#[test]
fn tube_line_is_a_thin_cylinder() {
    let line = Line::tube(3.0, 0.08).unwrap();
    assert_eq!(line.style, LineStyle::Tube);
    assert!(Solid::from(line).is_volumetric());
    assert!(line.contains(&Point3::new(0.05, 0.0, 1.5)));
    assert!(!line.contains(&Point3::new(0.1, 0.0, 1.5)));

    let (min, max) = line.bounds();
    assert_relative_eq!(min, Point3::new(-0.08, -0.08, 0.0));
    assert_relative_eq!(max, Point3::new(0.08, 0.08, 3.0));
}
