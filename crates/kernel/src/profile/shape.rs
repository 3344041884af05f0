use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Radius of a profile at axial position `x`.
///
/// `ref_radius` is the aft (widest) radius, `ref_length` the profile length
/// and `param` the family-specific shape parameter. Implementations are
/// evaluated for `x` in `[0, ref_length]`.
pub trait ShapeFunction {
    fn radius(&self, x: f64, ref_radius: f64, ref_length: f64, param: f64) -> f64;
}

impl<F> ShapeFunction for F
where
    F: Fn(f64, f64, f64, f64) -> f64,
{
    fn radius(&self, x: f64, ref_radius: f64, ref_length: f64, param: f64) -> f64 {
        self(x, ref_radius, ref_length, param)
    }
}

/// The nose-cone profile families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Conical,
    Ogive,
    Ellipsoid,
    Power,
    Parabolic,
    Haack,
}

impl Shape {
    pub const ALL: [Shape; 6] = [
        Shape::Conical,
        Shape::Ogive,
        Shape::Ellipsoid,
        Shape::Power,
        Shape::Parabolic,
        Shape::Haack,
    ];

    /// Valid `(min, max)` range of the shape parameter.
    pub fn parameter_range(&self) -> (f64, f64) {
        match self {
            Shape::Conical | Shape::Ellipsoid => (0.0, 0.0),
            Shape::Ogive | Shape::Power | Shape::Parabolic => (0.0, 1.0),
            Shape::Haack => (0.0, 1.0 / 3.0),
        }
    }

    pub fn default_parameter(&self) -> f64 {
        match self {
            Shape::Conical | Shape::Ellipsoid | Shape::Haack => 0.0,
            Shape::Ogive | Shape::Parabolic => 1.0,
            Shape::Power => 0.5,
        }
    }

    pub fn clamp_parameter(&self, param: f64) -> f64 {
        let (min, max) = self.parameter_range();
        if param.is_nan() {
            return self.default_parameter();
        }
        param.clamp(min, max)
    }

    fn unclamped_radius(&self, x: f64, radius: f64, length: f64, param: f64) -> f64 {
        match self {
            Shape::Conical => radius * x / length,
            Shape::Ogive => {
                if param < 0.001 {
                    return Shape::Conical.unclamped_radius(x, radius, length, param);
                }
                // Circle of radius `rho` centred `y0` below the axis.
                let rho = ((length * length + radius * radius)
                    * (((2.0 - param) * length).powi(2) + (param * radius).powi(2))
                    / (4.0 * (param * radius).powi(2)))
                .max(0.0)
                .sqrt();
                let l = length / param;
                let y0 = (rho * rho - l * l).max(0.0).sqrt();
                (rho * rho - (l - x).powi(2)).max(0.0).sqrt() - y0
            }
            Shape::Ellipsoid => {
                let x = x * radius / length;
                (2.0 * radius * x - x * x).max(0.0).sqrt()
            }
            Shape::Power => {
                if param <= 1e-5 {
                    if x <= 1e-5 { 0.0 } else { radius }
                } else {
                    radius * (x / length).powf(param)
                }
            }
            Shape::Parabolic => {
                let t = x / length;
                radius * ((2.0 * t - param * t * t) / (2.0 - param))
            }
            Shape::Haack => {
                let theta = (1.0 - 2.0 * x / length).clamp(-1.0, 1.0).acos();
                let area = theta - (2.0 * theta).sin() / 2.0 + param * theta.sin().powi(3);
                radius * (area / PI).max(0.0).sqrt()
            }
        }
    }
}

impl ShapeFunction for Shape {
    /// Non-positive reference dimensions and non-finite results clamp to zero;
    /// `x` is clamped into `[0, ref_length]`.
    fn radius(&self, x: f64, ref_radius: f64, ref_length: f64, param: f64) -> f64 {
        if !(ref_length > 0.0) || !(ref_radius > 0.0) {
            return 0.0;
        }
        let x = x.clamp(0.0, ref_length);
        let param = self.clamp_parameter(param);
        let r = self.unclamped_radius(x, ref_radius, ref_length, param);
        if r.is_finite() { r.max(0.0) } else { 0.0 }
    }
}
