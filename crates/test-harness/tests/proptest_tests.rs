//! Property-based tests across tessellation, STL output and parsing.

use proptest::prelude::*;

use nosecone_harness::oracle::{check_manifold_edges, check_watertight_mesh};
use nosecone_harness::{StlMesh, parse_binary_stl};
use nosecone_kernel::{AxisymmetricSolidSpec, Point3d, Shape, SphereField};
use nosecone_tessellation::contour::bisect;
use nosecone_tessellation::{
    BinaryMeshWriter, ExportConfig, Orientation, ProfileTessellator, ShellAssembler, StepPolicy,
    TriangleSoup, WriterOptions, export_nose_cone,
};

fn constant_five(_x: f64, _r: f64, _l: f64, _p: f64) -> f64 {
    5.0
}

fn arb_options() -> impl Strategy<Value = WriterOptions> {
    (
        prop::sample::select(vec![Orientation::Identity, Orientation::Print]),
        prop_oneof![Just(1.0), Just(1000.0)],
    )
        .prop_map(|(orientation, scale)| {
            WriterOptions::default()
                .with_orientation(orientation)
                .with_scale(scale)
        })
}

// ---------------------------------------------------------------------------
// 1. Triangle count follows the layer arithmetic
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn cylinder_count_matches_layers(segments in 1usize..40, length in 4u32..60) {
        let length = f64::from(length);
        let spec = AxisymmetricSolidSpec::with_shape(constant_five, 5.0, length, 1.0);
        let mut soup = TriangleSoup::new();
        let summary = ShellAssembler::new(segments, StepPolicy::Fixed(1.0))
            .assemble(&spec, &mut soup)
            .unwrap();
        let n = segments;
        let outer = (length as usize) - 2;
        let inner = (length as usize) - 3;
        prop_assert_eq!(summary.outer_layers, outer);
        prop_assert_eq!(summary.inner_layers, inner);
        prop_assert_eq!(summary.triangles, n + 2 * n * outer + n + 2 * n * inner + 2 * n);
        prop_assert_eq!(soup.triangle_count(), summary.triangles);
    }
}

proptest! {
    #[test]
    fn layer_count_matches_emitted_layers(
        segments in 1usize..16,
        step in 0.05f64..1.0,
        length in 0.0f64..10.0,
    ) {
        let t = ProfileTessellator::new(segments, step);
        let mut soup = TriangleSoup::new();
        t.tessellate(&|x: f64| x, length, &mut soup).unwrap();
        let layers = t.layer_count(step, length);
        prop_assert_eq!(soup.triangle_count(), segments + 2 * segments * layers);
    }
}

// ---------------------------------------------------------------------------
// 2. Shells are closed for any ring density
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]
    #[test]
    fn shells_are_watertight(
        shape in prop::sample::select(Shape::ALL.to_vec()),
        segments in 3usize..48,
        divisions in 5u32..60,
    ) {
        let spec = AxisymmetricSolidSpec::nose_cone(shape, 0.02, 0.1, 0.002);
        let config = ExportConfig {
            segments,
            step: StepPolicy::Divisions(divisions),
            ..ExportConfig::default()
        };
        let (bytes, _) = export_nose_cone(&spec, &config, Vec::new()).unwrap();
        let mesh = parse_binary_stl(&bytes).unwrap();
        let verdict = check_watertight_mesh(&mesh);
        prop_assert!(verdict.passed, "{:?}: {}", shape, verdict.detail);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]
    #[test]
    fn thin_walled_cylinders_are_manifold(segments in 3usize..48, length in 4u32..40) {
        let spec = AxisymmetricSolidSpec::with_shape(constant_five, 5.0, f64::from(length), 1.0);
        let mut soup = TriangleSoup::new();
        ShellAssembler::new(segments, StepPolicy::Fixed(1.0))
            .assemble(&spec, &mut soup)
            .unwrap();
        let mesh = StlMesh::from_soup(&soup, &WriterOptions::default().with_scale(1.0));
        let verdict = check_manifold_edges(&mesh);
        prop_assert!(verdict.passed, "{}", verdict.detail);
    }
}

// ---------------------------------------------------------------------------
// 3. The writer emits exactly what the parser reads back
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]
    #[test]
    fn written_triangles_parse_back(options in arb_options(), segments in 1usize..12) {
        let spec = AxisymmetricSolidSpec::nose_cone(Shape::Ogive, 0.01, 0.04, 0.001);
        let mut soup = TriangleSoup::new();
        ShellAssembler::new(segments, StepPolicy::Divisions(10))
            .assemble(&spec, &mut soup)
            .unwrap();

        let mut writer = BinaryMeshWriter::new(Vec::new(), options);
        writer.write_header().unwrap();
        writer.begin_deferred_count();
        soup.drain_into(&mut writer).unwrap();
        let bytes = writer.finalize().unwrap();

        let parsed = parse_binary_stl(&bytes).unwrap();
        prop_assert_eq!(parsed, StlMesh::from_soup(&soup, &options));
    }
}

// ---------------------------------------------------------------------------
// 4. Bisection lands within tolerance of the surface
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn bisection_converges_on_spheres(
        cx in -5.0f64..5.0,
        cy in -5.0f64..5.0,
        cz in -5.0f64..5.0,
        radius in 0.01f64..3.0,
        theta in 0.0f64..std::f64::consts::TAU,
        phi in 0.0f64..std::f64::consts::PI,
        tolerance in 1e-9f64..1e-2,
    ) {
        let center = Point3d::new(cx, cy, cz);
        let sphere = SphereField::new(center, radius);
        let dir = nosecone_kernel::Vec3::new(
            phi.sin() * theta.cos(),
            phi.sin() * theta.sin(),
            phi.cos(),
        );
        let outside = center + dir * (2.0 * radius);
        let p = bisect(&sphere, center, outside, tolerance).unwrap();
        prop_assert!((p.distance_to(&center) - radius).abs() <= tolerance,
            "{} from the surface", (p.distance_to(&center) - radius).abs());
    }
}
