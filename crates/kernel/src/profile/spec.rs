use serde::{Deserialize, Serialize};
use tracing::warn;

use super::shape::{Shape, ShapeFunction};
use crate::error::KernelError;

/// Cylindrical extension behind the aft end of the profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shoulder {
    /// Axial length (meters). Zero or negative means "no shoulder".
    pub length: f64,
    /// Outer radius (meters).
    pub radius: f64,
    /// Wall thickness (meters).
    pub thickness: f64,
}

impl Shoulder {
    pub fn inner_radius(&self) -> f64 {
        (self.radius - self.thickness).max(0.0)
    }
}

/// Geometry of one hollow solid of revolution, all dimensions in meters.
///
/// Read-only for the duration of an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisymmetricSolidSpec<S = Shape> {
    pub shape: S,
    #[serde(default)]
    pub shape_parameter: f64,
    pub aft_radius: f64,
    pub length: f64,
    pub thickness: f64,
    #[serde(default)]
    pub shoulder: Option<Shoulder>,
}

impl AxisymmetricSolidSpec<Shape> {
    /// A nose cone using the family's default shape parameter.
    pub fn nose_cone(shape: Shape, aft_radius: f64, length: f64, thickness: f64) -> Self {
        Self {
            shape,
            shape_parameter: shape.default_parameter(),
            aft_radius,
            length,
            thickness,
            shoulder: None,
        }
    }
}

impl<S: ShapeFunction> AxisymmetricSolidSpec<S> {
    pub fn with_shape(shape: S, aft_radius: f64, length: f64, thickness: f64) -> Self {
        Self {
            shape,
            shape_parameter: 0.0,
            aft_radius,
            length,
            thickness,
            shoulder: None,
        }
    }

    pub fn with_parameter(mut self, shape_parameter: f64) -> Self {
        self.shape_parameter = shape_parameter;
        self
    }

    pub fn with_shoulder(mut self, length: f64, radius: f64, thickness: f64) -> Self {
        self.shoulder = Some(Shoulder {
            length,
            radius,
            thickness,
        });
        self
    }

    /// The shoulder, if it has a positive length.
    pub fn active_shoulder(&self) -> Option<&Shoulder> {
        self.shoulder.as_ref().filter(|s| s.length > 0.0)
    }

    /// Outer surface radius at `x` along the full length.
    pub fn outer_radius(&self, x: f64) -> f64 {
        self.shape
            .radius(x, self.aft_radius, self.length, self.shape_parameter)
            .max(0.0)
    }

    /// Axial length of the inner profile: the outer length less the wall.
    pub fn inner_length(&self) -> f64 {
        self.length - self.thickness
    }

    /// Inner profile radius at `x`, before the wall offset.
    ///
    /// The inner surface is this profile moved back along the axis and in
    /// toward it by `thickness`, so its ring at station `x` sits at
    /// `x + thickness` with radius `inner_profile(x) - thickness`.
    /// Tessellators apply that shift themselves.
    pub fn inner_profile(&self, x: f64) -> f64 {
        self.shape
            .radius(x, self.aft_radius, self.inner_length(), self.shape_parameter)
    }

    /// Inner surface radius at the station of profile position `x`.
    pub fn inner_radius(&self, x: f64) -> f64 {
        (self.inner_profile(x) - self.thickness).max(0.0)
    }

    /// Overall axial extent including the shoulder.
    pub fn total_length(&self) -> f64 {
        self.length + self.active_shoulder().map_or(0.0, |s| s.length)
    }

    /// Reject non-finite dimensions. Zero and negative values are degenerate
    /// but accepted; they clamp during tessellation.
    pub fn check(&self) -> Result<(), KernelError> {
        let mut fields = vec![
            ("shape_parameter", self.shape_parameter),
            ("aft_radius", self.aft_radius),
            ("length", self.length),
            ("thickness", self.thickness),
        ];
        if let Some(s) = &self.shoulder {
            fields.extend([
                ("shoulder.length", s.length),
                ("shoulder.radius", s.radius),
                ("shoulder.thickness", s.thickness),
            ]);
        }
        for (parameter, value) in fields {
            if !value.is_finite() {
                return Err(KernelError::InvalidDimension { parameter, value });
            }
        }
        if self.thickness >= self.aft_radius {
            warn!(
                thickness = self.thickness,
                aft_radius = self.aft_radius,
                "wall is at least as thick as the aft radius; inner profile clamps to the axis"
            );
        }
        if self.length <= 0.0 {
            warn!(length = self.length, "non-positive length; profile collapses to the tip");
        }
        Ok(())
    }
}
