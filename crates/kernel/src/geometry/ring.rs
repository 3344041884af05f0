//! Circular cross-section sampling.
//!
//! A ring is the closed loop of points obtained by revolving one profile
//! sample around the `x` axis. It holds `n + 1` points and the last point is
//! bit-identical to the first, so consumers can stitch `(i, i + 1)` pairs for
//! `i in 0..n` without wrapping.

use std::f64::consts::TAU;

use crate::error::KernelError;
use crate::geometry::point::Point3d;

/// `n + 1` points around the axis, first and last identical.
pub type Ring = Vec<Point3d>;

/// Evenly spaced points on a circle of `radius` centred on the `x` axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularSampler {
    radius: f64,
    segments: usize,
    axial: f64,
}

impl CircularSampler {
    /// Negative radii are clamped to zero. `segments` must be at least 1.
    pub fn try_new(radius: f64, segments: usize) -> Result<Self, KernelError> {
        if segments < 1 {
            return Err(KernelError::InsufficientSegments {
                required: 1,
                provided: segments,
            });
        }
        Ok(Self {
            radius: radius.max(0.0),
            segments,
            axial: 0.0,
        })
    }

    /// Place the ring at axial position `x`.
    pub fn at(mut self, x: f64) -> Self {
        self.axial = x;
        self
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn axial(&self) -> f64 {
        self.axial
    }

    /// Point `i` of the ring. Index `segments` returns point 0.
    pub fn point(&self, i: usize) -> Point3d {
        let k = i % self.segments;
        let angle = TAU * k as f64 / self.segments as f64;
        Point3d::new(
            self.axial,
            self.radius * angle.cos(),
            -self.radius * angle.sin(),
        )
    }

    /// Lazy iterator over the `n + 1` ring points. Each call starts afresh.
    pub fn points(&self) -> RingIter {
        RingIter {
            sampler: *self,
            next: 0,
        }
    }

    pub fn ring(&self) -> Ring {
        self.points().collect()
    }
}

impl IntoIterator for CircularSampler {
    type Item = Point3d;
    type IntoIter = RingIter;

    fn into_iter(self) -> RingIter {
        self.points()
    }
}

/// Iterator produced by [`CircularSampler::points`].
#[derive(Debug, Clone)]
pub struct RingIter {
    sampler: CircularSampler,
    next: usize,
}

impl Iterator for RingIter {
    type Item = Point3d;

    fn next(&mut self) -> Option<Point3d> {
        if self.next > self.sampler.segments {
            return None;
        }
        let p = self.sampler.point(self.next);
        self.next += 1;
        Some(p)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.sampler.segments + 1).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RingIter {}
