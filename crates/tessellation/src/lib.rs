//! Triangle emission for axisymmetric shells and implicit surfaces.
//!
//! Tessellators write into a [`TriangleSink`]: the binary STL writer in
//! production, a [`TriangleSoup`] in tests.

pub mod config;
pub mod contour;
pub mod export;
pub mod profile;
pub mod shell;
pub mod stl;

pub use config::{ContourConfig, ExportConfig};
pub use contour::{
    BISECTION_ORDER, ContourSummary, GridBounds, GridField, ImplicitSurfaceContourer, QuadWinding,
    VertexPlacement, bisect,
};
pub use export::{export_contour, export_nose_cone, export_nose_cone_to_path};
pub use profile::{ProfileTessellator, RadialProfile, StepPolicy, Winding};
pub use shell::{ShellAssembler, ShellSummary};
pub use stl::{BinaryMeshWriter, NormalMode, Orientation, WriterOptions};

use nosecone_kernel::{KernelError, Point3d, Vec3};
use serde::{Deserialize, Serialize};

/// One facet: normal plus three vertices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub normal: Vec3,
    pub vertices: [Point3d; 3],
}

impl Triangle {
    pub fn new(normal: Vec3, p0: Point3d, p1: Point3d, p2: Point3d) -> Self {
        Self {
            normal,
            vertices: [p0, p1, p2],
        }
    }

    /// Cross product of the two edges leaving vertex 0 (twice the area).
    pub fn area_vector(&self) -> Vec3 {
        let [a, b, c] = self.vertices;
        (b - a).cross(&(c - a))
    }

    pub fn area(&self) -> f64 {
        self.area_vector().length() * 0.5
    }

    /// Unit normal implied by the winding, or zero when degenerate.
    pub fn face_normal(&self) -> Vec3 {
        self.area_vector().normalized().unwrap_or(Vec3::ZERO)
    }
}

/// Destination for emitted triangles.
pub trait TriangleSink {
    fn triangle(
        &mut self,
        normal: Vec3,
        p0: Point3d,
        p1: Point3d,
        p2: Point3d,
    ) -> Result<(), KernelError>;

    /// Quad split along the `p1`-`p3` diagonal: `(p0, p1, p3)` then `(p3, p1, p2)`.
    fn square(
        &mut self,
        normal: Vec3,
        p0: Point3d,
        p1: Point3d,
        p2: Point3d,
        p3: Point3d,
    ) -> Result<(), KernelError> {
        self.triangle(normal, p0, p1, p3)?;
        self.triangle(normal, p3, p1, p2)
    }
}

/// In-memory triangle list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleSoup {
    pub triangles: Vec<Triangle>,
}

impl TriangleSoup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Replay every triangle into another sink.
    pub fn drain_into(&self, sink: &mut dyn TriangleSink) -> Result<(), KernelError> {
        for t in &self.triangles {
            let [p0, p1, p2] = t.vertices;
            sink.triangle(t.normal, p0, p1, p2)?;
        }
        Ok(())
    }

    /// Volume enclosed by the soup; positive when faces wind outward.
    pub fn signed_volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|t| {
                let [a, b, c] = t.vertices;
                a.to_vec3().dot(&b.to_vec3().cross(&c.to_vec3())) / 6.0
            })
            .sum()
    }
}

impl TriangleSink for TriangleSoup {
    fn triangle(
        &mut self,
        normal: Vec3,
        p0: Point3d,
        p1: Point3d,
        p2: Point3d,
    ) -> Result<(), KernelError> {
        self.triangles.push(Triangle::new(normal, p0, p1, p2));
        Ok(())
    }
}

/// Pass-through sink that counts what flows through it.
pub struct CountingSink<'a> {
    inner: &'a mut dyn TriangleSink,
    count: usize,
}

impl<'a> CountingSink<'a> {
    pub fn new(inner: &'a mut dyn TriangleSink) -> Self {
        Self { inner, count: 0 }
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl TriangleSink for CountingSink<'_> {
    fn triangle(
        &mut self,
        normal: Vec3,
        p0: Point3d,
        p1: Point3d,
        p2: Point3d,
    ) -> Result<(), KernelError> {
        self.inner.triangle(normal, p0, p1, p2)?;
        self.count += 1;
        Ok(())
    }
}
