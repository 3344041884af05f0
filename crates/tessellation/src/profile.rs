//! Surface-of-revolution tessellation: a fan at the tip followed by
//! stacked quad layers between consecutive rings.

use serde::{Deserialize, Serialize};
use tracing::debug;

use nosecone_kernel::{CircularSampler, KernelError, Point3d, Ring, Vec3};

use crate::TriangleSink;

/// Radius of a surface as a function of axial position.
pub trait RadialProfile {
    fn radius_at(&self, x: f64) -> f64;
}

impl<F> RadialProfile for F
where
    F: Fn(f64) -> f64,
{
    fn radius_at(&self, x: f64) -> f64 {
        self(x)
    }
}

/// Which side of the surface the triangles face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winding {
    /// Normals point away from the axis.
    #[default]
    Outward,
    /// Normals point toward the axis (inner walls).
    Inward,
}

/// How the axial step between rings is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPolicy {
    /// Absolute step in meters.
    Fixed(f64),
    /// Split the profile length into this many steps.
    Divisions(u32),
}

impl Default for StepPolicy {
    fn default() -> Self {
        StepPolicy::Divisions(100)
    }
}

impl StepPolicy {
    /// The step for a profile of the given length. A degenerate length
    /// yields a zero step, which tessellates to the tip fan alone.
    pub fn resolve(&self, length: f64) -> Result<f64, KernelError> {
        match *self {
            StepPolicy::Fixed(dx) => KernelError::require_positive("step", dx),
            StepPolicy::Divisions(0) => Err(KernelError::InsufficientSegments {
                required: 1,
                provided: 0,
            }),
            StepPolicy::Divisions(n) => {
                if !length.is_finite() || length <= 0.0 {
                    Ok(0.0)
                } else {
                    Ok(length / f64::from(n))
                }
            }
        }
    }
}

/// Emits one surface of revolution into a sink.
///
/// The tessellator carries the last ring of each layer into the next, so
/// adjacent layers share bit-identical vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileTessellator {
    pub segments: usize,
    /// Axial step between rings (meters).
    pub step: f64,
    pub winding: Winding,
    /// Wall thickness: shifts every ring aft and shrinks every radius by it.
    pub offset: f64,
}

impl ProfileTessellator {
    pub fn new(segments: usize, step: f64) -> Self {
        Self {
            segments,
            step,
            winding: Winding::Outward,
            offset: 0.0,
        }
    }

    pub fn with_winding(mut self, winding: Winding) -> Self {
        self.winding = winding;
        self
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Axial start positions of the body layers from `start` up to `length`.
    ///
    /// Positions are `start + k * step` rather than a running sum so long
    /// profiles do not drift.
    fn layer_starts(&self, start: f64, length: f64) -> impl Iterator<Item = f64> {
        let step = self.step;
        let limit = length - step;
        (0u64..)
            .map(move |k| start + k as f64 * step)
            .take_while(move |&x| step > 0.0 && x < limit)
    }

    /// Number of quad layers a wall from `start` to `length` produces.
    pub fn layer_count(&self, start: f64, length: f64) -> usize {
        self.layer_starts(start, length).count()
    }

    /// Ring of the surface at profile position `x`.
    fn ring_at(&self, profile: &impl RadialProfile, x: f64) -> Result<Ring, KernelError> {
        let radius = (profile.radius_at(x) - self.offset).max(0.0);
        Ok(CircularSampler::try_new(radius, self.segments)?
            .at(x + self.offset)
            .ring())
    }

    /// Tip fan plus body layers for a profile of the given length.
    /// Returns the last ring emitted.
    pub fn tessellate(
        &self,
        profile: &impl RadialProfile,
        length: f64,
        sink: &mut dyn TriangleSink,
    ) -> Result<Ring, KernelError> {
        let x0 = self.step;
        let apex = Point3d::on_axis(self.offset);
        let radius = (profile.radius_at(x0.min(length)) - self.offset).max(0.0);
        let tip = CircularSampler::try_new(radius, self.segments)?
            .at(x0 + self.offset)
            .ring();

        for pair in tip.windows(2) {
            match self.winding {
                Winding::Outward => sink.triangle(Vec3::ZERO, apex, pair[0], pair[1])?,
                Winding::Inward => sink.triangle(Vec3::ZERO, apex, pair[1], pair[0])?,
            }
        }
        debug!(x0, radius, segments = self.segments, "tip fan");

        self.tessellate_wall(profile, x0, tip, length, sink)
    }

    /// Quad layers from an existing ring at `start` up to `length`.
    /// Returns the last ring, which is `start_ring` when no layer fits.
    pub fn tessellate_wall(
        &self,
        profile: &impl RadialProfile,
        start: f64,
        start_ring: Ring,
        length: f64,
        sink: &mut dyn TriangleSink,
    ) -> Result<Ring, KernelError> {
        let mut previous = start_ring;
        let mut layers = 0usize;
        for x in self.layer_starts(start, length) {
            let next = self.ring_at(profile, x + self.step)?;
            if next.len() != previous.len() {
                return Err(KernelError::RingMismatch {
                    outer: previous.len(),
                    inner: next.len(),
                });
            }
            for i in 0..self.segments {
                let (a0, a1) = (previous[i], previous[i + 1]);
                let (b0, b1) = (next[i], next[i + 1]);
                match self.winding {
                    Winding::Outward => sink.square(Vec3::ZERO, a0, b0, b1, a1)?,
                    Winding::Inward => sink.square(Vec3::ZERO, a0, a1, b1, b0)?,
                }
            }
            previous = next;
            layers += 1;
        }
        debug!(start, length, layers, "wall");
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TriangleSoup;
    use approx::assert_abs_diff_eq;

    fn cylinder(_x: f64) -> f64 {
        5.0
    }

    #[test]
    fn divisions_split_the_length() {
        assert_abs_diff_eq!(StepPolicy::Divisions(100).resolve(0.3).unwrap(), 0.003, epsilon = 1e-15);
        assert_eq!(StepPolicy::default(), StepPolicy::Divisions(100));
        assert_eq!(StepPolicy::Divisions(10).resolve(0.0).unwrap(), 0.0);
        assert!(StepPolicy::Divisions(0).resolve(1.0).is_err());
        assert!(StepPolicy::Fixed(0.0).resolve(1.0).is_err());
        assert!(StepPolicy::Fixed(-1.0).resolve(1.0).is_err());
    }

    #[test]
    fn step_policy_serde() {
        let p: StepPolicy = serde_json::from_str(r#"{"fixed":0.001}"#).unwrap();
        assert_eq!(p, StepPolicy::Fixed(0.001));
        let p: StepPolicy = serde_json::from_str(r#"{"divisions":50}"#).unwrap();
        assert_eq!(p, StepPolicy::Divisions(50));
    }

    #[test]
    fn layer_count_stops_one_step_short() {
        let t = ProfileTessellator::new(8, 1.0);
        assert_eq!(t.layer_count(1.0, 30.0), 28);
        assert_eq!(t.layer_count(1.0, 29.0), 27);
        assert_eq!(t.layer_count(1.0, 2.0), 0);
        assert_eq!(ProfileTessellator::new(8, 0.0).layer_count(0.0, 30.0), 0);
    }

    #[test]
    fn fan_and_layers_have_expected_counts() {
        let mut soup = TriangleSoup::new();
        let last = ProfileTessellator::new(8, 1.0)
            .tessellate(&cylinder, 30.0, &mut soup)
            .unwrap();
        assert_eq!(soup.triangle_count(), 8 + 28 * 16);
        assert_eq!(last.len(), 9);
        assert_eq!(last[0].x, 29.0);
        assert_abs_diff_eq!(last[3].radial_distance(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn offset_shifts_rings_and_radii() {
        let mut soup = TriangleSoup::new();
        let last = ProfileTessellator::new(6, 1.0)
            .with_offset(1.0)
            .with_winding(Winding::Inward)
            .tessellate(&cylinder, 29.0, &mut soup)
            .unwrap();
        assert_eq!(soup.triangle_count(), 6 + 27 * 12);
        assert_eq!(soup.triangles[0].vertices[0], Point3d::on_axis(1.0));
        assert_eq!(last[0].x, 29.0);
        assert_abs_diff_eq!(last[2].radial_distance(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn outward_and_inward_fans_face_opposite_ways() {
        let cone = |x: f64| x;
        let mut outward = TriangleSoup::new();
        let mut inward = TriangleSoup::new();
        let t = ProfileTessellator::new(12, 1.0);
        t.tessellate(&cone, 10.0, &mut outward).unwrap();
        t.with_winding(Winding::Inward)
            .tessellate(&cone, 10.0, &mut inward)
            .unwrap();

        for tri in &outward.triangles {
            let centroid = tri.vertices.iter().fold(Vec3::ZERO, |acc, p| {
                acc + Vec3::new(0.0, p.y, p.z) / 3.0
            });
            assert!(tri.area_vector().dot(&centroid) > 0.0);
        }
        for tri in &inward.triangles {
            let centroid = tri.vertices.iter().fold(Vec3::ZERO, |acc, p| {
                acc + Vec3::new(0.0, p.y, p.z) / 3.0
            });
            assert!(tri.area_vector().dot(&centroid) < 0.0);
        }
    }

    #[test]
    fn layers_share_ring_vertices_exactly() {
        let mut soup = TriangleSoup::new();
        ProfileTessellator::new(4, 0.5)
            .tessellate(&|x: f64| x.sqrt(), 3.0, &mut soup)
            .unwrap();
        // Every vertex at a given axial station lies on one ring.
        let fan = &soup.triangles[..4];
        let first_layer = &soup.triangles[4..12];
        for tri in fan {
            for v in &tri.vertices[1..] {
                assert!(first_layer.iter().any(|q| q.vertices.contains(v)));
            }
        }
    }

    #[test]
    fn zero_radius_collapses_without_error() {
        let mut soup = TriangleSoup::new();
        ProfileTessellator::new(5, 1.0)
            .tessellate(&|_x: f64| 0.0, 4.0, &mut soup)
            .unwrap();
        assert_eq!(soup.triangle_count(), 5 + 2 * 10);
        assert!(soup.triangles.iter().all(|t| t.area() == 0.0));
    }

    #[test]
    fn zero_segments_is_rejected() {
        let mut soup = TriangleSoup::new();
        let err = ProfileTessellator::new(0, 1.0)
            .tessellate(&cylinder, 4.0, &mut soup)
            .unwrap_err();
        assert!(matches!(err, KernelError::InsufficientSegments { .. }));
    }
}
