//! Property-based tests for wall tessellation and output orientation.

use approx::assert_abs_diff_eq;
use proptest::prelude::*;

use nosecone_kernel::Vec3;
use nosecone_tessellation::{Orientation, ProfileTessellator, StepPolicy, TriangleSoup, Winding};

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (-10.0f64..10.0, -10.0f64..10.0, -10.0f64..10.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn oriented(o: Orientation, v: &Vec3) -> Vec3 {
    let [x, y, z] = o.apply([v.x, v.y, v.z]);
    Vec3::new(x, y, z)
}

// ---------------------------------------------------------------------------
// 1. Divisions split the length evenly
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn divisions_cover_the_length(divisions in 1u32..2000, length in 1e-3f64..10.0) {
        let step = StepPolicy::Divisions(divisions).resolve(length).unwrap();
        assert_abs_diff_eq!(step * f64::from(divisions), length, epsilon = 1e-9);
    }
}

// ---------------------------------------------------------------------------
// 2. Every ring sits on the profile
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]
    #[test]
    fn wall_vertices_lie_on_the_profile(
        segments in 3usize..24,
        slope in 0.05f64..2.0,
        offset in 0.0f64..0.05,
        inward in any::<bool>(),
    ) {
        let length = 1.0;
        let profile = move |x: f64| slope * x;
        let mut t = ProfileTessellator::new(segments, 0.05).with_offset(offset);
        if inward {
            t = t.with_winding(Winding::Inward);
        }
        let mut soup = TriangleSoup::new();
        t.tessellate(&profile, length, &mut soup).unwrap();

        for tri in &soup.triangles {
            for p in &tri.vertices {
                let station = p.x - offset;
                let expected = (profile(station) - offset).max(0.0);
                if station.abs() < 1e-12 {
                    // The apex.
                    assert_abs_diff_eq!(p.radial_distance(), 0.0, epsilon = 1e-12);
                } else {
                    assert_abs_diff_eq!(p.radial_distance(), expected, epsilon = 1e-9);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// 3. Both windings emit the same number of triangles
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn winding_does_not_change_the_count(segments in 1usize..32, length in 0.0f64..3.0) {
        let outward = ProfileTessellator::new(segments, 0.1);
        let inward = outward.with_winding(Winding::Inward);
        let (mut a, mut b) = (TriangleSoup::new(), TriangleSoup::new());
        outward.tessellate(&|x: f64| x, length, &mut a).unwrap();
        inward.tessellate(&|x: f64| x, length, &mut b).unwrap();
        prop_assert_eq!(a.triangle_count(), b.triangle_count());
    }
}

// ---------------------------------------------------------------------------
// 4. Print orientation is a proper rotation
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn print_orientation_preserves_length_and_handedness(a in arb_vec3(), b in arb_vec3()) {
        let print = Orientation::Print;
        let (ra, rb) = (oriented(print, &a), oriented(print, &b));
        assert_abs_diff_eq!(ra.length(), a.length(), epsilon = 1e-12);
        assert_abs_diff_eq!(ra.cross(&rb), oriented(print, &a.cross(&b)), epsilon = 1e-9);
    }
}
