//! Implicit scalar fields for surface contouring.
//!
//! A field is positive inside the solid and negative outside; the surface
//! is its zero level set.

use serde::{Deserialize, Serialize};

use crate::geometry::point::Point3d;
use crate::geometry::vector::Vec3;

/// Signed scalar field, positive inside.
pub trait ScalarField {
    fn value(&self, p: Point3d) -> f64;

    fn is_inside(&self, p: Point3d) -> bool {
        self.value(p) > 0.0
    }
}

impl<F> ScalarField for F
where
    F: Fn(Point3d) -> f64,
{
    fn value(&self, p: Point3d) -> f64 {
        self(p)
    }
}

/// Surface normal estimate for a field.
pub trait NormalField {
    fn normal(&self, p: Point3d) -> Vec3;
}

impl<F> NormalField for F
where
    F: Fn(Point3d) -> Vec3,
{
    fn normal(&self, p: Point3d) -> Vec3 {
        self(p)
    }
}

/// `radius - |p - center|`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereField {
    pub center: Point3d,
    pub radius: f64,
}

impl SphereField {
    pub fn new(center: Point3d, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl ScalarField for SphereField {
    fn value(&self, p: Point3d) -> f64 {
        self.radius - p.distance_to(&self.center)
    }
}

impl NormalField for SphereField {
    fn normal(&self, p: Point3d) -> Vec3 {
        (p - self.center).normalized().unwrap_or(Vec3::ZERO)
    }
}

/// Torus around the `z` axis through `center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TorusField {
    pub center: Point3d,
    pub major_radius: f64,
    pub minor_radius: f64,
}

impl TorusField {
    pub fn new(center: Point3d, major_radius: f64, minor_radius: f64) -> Self {
        Self {
            center,
            major_radius,
            minor_radius,
        }
    }

    /// Closest point on the tube's centre circle.
    fn spine_point(&self, p: Point3d) -> Point3d {
        let d = p - self.center;
        let planar = (d.x * d.x + d.y * d.y).sqrt();
        if planar < 1e-15 {
            return self.center + Vec3::new(self.major_radius, 0.0, 0.0);
        }
        let k = self.major_radius / planar;
        self.center + Vec3::new(d.x * k, d.y * k, 0.0)
    }
}

impl ScalarField for TorusField {
    fn value(&self, p: Point3d) -> f64 {
        self.minor_radius - p.distance_to(&self.spine_point(p))
    }
}

impl NormalField for TorusField {
    fn normal(&self, p: Point3d) -> Vec3 {
        (p - self.spine_point(p)).normalized().unwrap_or(Vec3::ZERO)
    }
}
