//! Implicit-surface contouring checked through the STL bytes.

use nosecone_harness::helpers::mesh_signed_volume;
use nosecone_harness::oracle::*;
use nosecone_harness::parse_binary_stl;
use nosecone_kernel::{Point3d, SphereField, TorusField};
use nosecone_tessellation::{
    ContourConfig, GridBounds, QuadWinding, WriterOptions, export_contour,
};

fn unit_config() -> ContourConfig {
    ContourConfig {
        tolerance: 1e-6,
        writer: WriterOptions::default().with_scale(1.0),
        ..ContourConfig::default()
    }
}

#[test]
fn sphere_is_closed_and_close_to_the_ball() {
    let sphere = SphereField::new(Point3d::new(0.2, -0.1, 0.05), 1.0);
    let bounds = GridBounds::cube(Point3d::new(0.2, -0.1, 0.05), 1.5, 16);
    let (bytes, summary) =
        export_contour(&sphere, Some(&sphere), bounds, &unit_config(), Vec::new()).unwrap();
    let mesh = parse_binary_stl(&bytes).unwrap();

    assert_eq!(mesh.triangle_count(), 2 * summary.quads);
    assert!(check_watertight_mesh(&mesh).passed);
    assert!(check_normals_zero_or_unit(&mesh).passed);

    // Vertices sit on the sphere, so the polyhedron is inscribed.
    let ball = 4.0 / 3.0 * std::f64::consts::PI;
    let volume = mesh_signed_volume(&mesh);
    assert!(volume > 0.85 * ball && volume < 1.001 * ball, "volume {volume}");
}

#[test]
fn lattice_winding_leaves_half_the_quads_reversed() {
    let sphere = SphereField::new(Point3d::ORIGIN, 1.0);
    let bounds = GridBounds::cube(Point3d::ORIGIN, 1.5, 10);
    let config = ContourConfig {
        winding: QuadWinding::Lattice,
        ..unit_config()
    };
    let (bytes, _) = export_contour(&sphere, None, bounds, &config, Vec::new()).unwrap();
    let mesh = parse_binary_stl(&bytes).unwrap();
    // The reversed quads on the entry side roughly cancel the exit side.
    let ball = 4.0 / 3.0 * std::f64::consts::PI;
    assert!(mesh_signed_volume(&mesh).abs() < 0.1 * ball);
    assert!(!check_watertight_mesh(&mesh).passed);
}

#[test]
fn torus_is_closed() {
    let torus = TorusField::new(Point3d::ORIGIN, 1.0, 0.35);
    let bounds = GridBounds::new(
        Point3d::new(-1.6, -1.6, -0.6),
        Point3d::new(1.6, 1.6, 0.6),
        24,
    );
    let (bytes, summary) =
        export_contour(&torus, Some(&torus), bounds, &unit_config(), Vec::new()).unwrap();
    let mesh = parse_binary_stl(&bytes).unwrap();
    assert!(summary.quads > 0);
    assert!(check_watertight_mesh(&mesh).passed);
    assert!(check_positive_volume(&mesh).passed);
}

#[test]
fn surface_outside_the_bounds_gives_an_empty_file() {
    let sphere = SphereField::new(Point3d::new(10.0, 0.0, 0.0), 1.0);
    let bounds = GridBounds::cube(Point3d::ORIGIN, 1.0, 8);
    let (bytes, summary) =
        export_contour(&sphere, None, bounds, &unit_config(), Vec::new()).unwrap();
    assert_eq!(summary.quads, 0);
    assert_eq!(bytes.len(), 84);
}

#[test]
fn invalid_bounds_are_rejected() {
    let sphere = SphereField::new(Point3d::ORIGIN, 1.0);
    let flat = GridBounds::new(Point3d::ORIGIN, Point3d::new(1.0, 1.0, 0.0), 4);
    assert!(export_contour(&sphere, None, flat, &unit_config(), Vec::new()).is_err());
}
