//! Binary STL output.
//!
//! Binary STL format:
//! - 80-byte header (spaces)
//! - u32 triangle count (little-endian)
//! - For each triangle: 3×f32 normal + 3×(3×f32 vertex) + u16 attribute = 50 bytes
//!
//! When the triangle count is not known up front the writer can defer it:
//! records are buffered and the count is written in front of them on
//! [`BinaryMeshWriter::finalize`].

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use nosecone_kernel::{KernelError, METERS_TO_MILLIMETERS, Point3d, Vec3};

use crate::TriangleSink;

pub const HEADER_LEN: usize = 80;
pub const COUNT_LEN: usize = 4;
pub const TRIANGLE_RECORD_LEN: usize = 50;

/// Size of a binary STL holding `triangles` facets.
pub fn file_size(triangles: usize) -> usize {
    HEADER_LEN + COUNT_LEN + triangles * TRIANGLE_RECORD_LEN
}

/// Axis remapping applied to every vector before it is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Identity,
    /// Stand the part on its aft end: `(x, y, z)` becomes `(z, y, -x)`.
    Print,
}

impl Orientation {
    pub fn apply(&self, v: [f64; 3]) -> [f64; 3] {
        match self {
            Orientation::Identity => v,
            Orientation::Print => [v[2], v[1], -v[0]],
        }
    }
}

/// Where facet normals come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalMode {
    /// Write whatever the tessellator supplied, usually zero.
    #[default]
    AsGiven,
    /// Replace every normal with the unit normal of the vertex winding.
    Computed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    pub orientation: Orientation,
    /// Applied to vertices only (normals are directions).
    pub scale: f64,
    pub normals: NormalMode,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Identity,
            scale: METERS_TO_MILLIMETERS,
            normals: NormalMode::AsGiven,
        }
    }
}

impl WriterOptions {
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_normals(mut self, normals: NormalMode) -> Self {
        self.normals = normals;
        self
    }
}

/// Streams triangles to a byte sink in binary STL layout.
pub struct BinaryMeshWriter<W: Write> {
    out: W,
    options: WriterOptions,
    /// Buffered records while the count is deferred.
    deferred: Option<Vec<u8>>,
    triangles: usize,
}

impl BinaryMeshWriter<BufWriter<File>> {
    /// Create (or truncate) `path` and write to it through a buffer.
    pub fn create(path: impl AsRef<Path>, options: WriterOptions) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        info!(path = %path.display(), "opened STL output");
        Ok(Self::new(BufWriter::new(file), options))
    }
}

impl<W: Write> BinaryMeshWriter<W> {
    pub fn new(out: W, options: WriterOptions) -> Self {
        Self {
            out,
            options,
            deferred: None,
            triangles: 0,
        }
    }

    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Triangles written (or buffered) so far.
    pub fn triangle_count(&self) -> usize {
        self.triangles
    }

    pub fn is_deferred(&self) -> bool {
        self.deferred.is_some()
    }

    /// 80 ASCII spaces. Always goes straight to the output.
    pub fn write_header(&mut self) -> io::Result<()> {
        self.out.write_all(&[b' '; HEADER_LEN])
    }

    /// Explicit count, for callers that know it in advance.
    pub fn write_triangle_count(&mut self, count: u32) -> io::Result<()> {
        self.out.write_all(&count.to_le_bytes())
    }

    /// Buffer all following records until [`finalize`](Self::finalize)
    /// writes the count in front of them. Idempotent.
    pub fn begin_deferred_count(&mut self) {
        if self.deferred.is_none() {
            debug!("deferring triangle count");
            self.deferred = Some(Vec::new());
        }
    }

    pub fn write_triangle(
        &mut self,
        normal: Vec3,
        p0: Point3d,
        p1: Point3d,
        p2: Point3d,
    ) -> io::Result<()> {
        let record = self.encode(normal, [p0, p1, p2]);
        match self.deferred.as_mut() {
            Some(buffer) => buffer.extend_from_slice(&record),
            None => self.out.write_all(&record)?,
        }
        self.triangles += 1;
        Ok(())
    }

    /// Two triangles, `(p0, p1, p3)` then `(p3, p1, p2)`, sharing `normal`.
    pub fn write_square(
        &mut self,
        normal: Vec3,
        p0: Point3d,
        p1: Point3d,
        p2: Point3d,
        p3: Point3d,
    ) -> io::Result<()> {
        self.write_triangle(normal, p0, p1, p3)?;
        self.write_triangle(normal, p3, p1, p2)
    }

    /// Emit the deferred count and buffered records, flush, and hand the
    /// underlying writer back.
    pub fn finalize(mut self) -> io::Result<W> {
        if let Some(buffer) = self.deferred.take() {
            let count = u32::try_from(self.triangles).map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{} triangles exceed the STL count field", self.triangles),
                )
            })?;
            self.out.write_all(&count.to_le_bytes())?;
            self.out.write_all(&buffer)?;
        }
        self.out.flush()?;
        info!(triangles = self.triangles, "STL finalized");
        Ok(self.out)
    }

    fn encode(&self, normal: Vec3, vertices: [Point3d; 3]) -> [u8; TRIANGLE_RECORD_LEN] {
        let normal = match self.options.normals {
            NormalMode::AsGiven => normal,
            NormalMode::Computed => (vertices[1] - vertices[0])
                .cross(&(vertices[2] - vertices[0]))
                .normalized()
                .unwrap_or(Vec3::ZERO),
        };

        let mut record = [0u8; TRIANGLE_RECORD_LEN];
        let mut at = 0;
        let mut put = |v: [f64; 3]| {
            for c in self.options.orientation.apply(v) {
                record[at..at + 4].copy_from_slice(&(c as f32).to_le_bytes());
                at += 4;
            }
        };
        put(normal.to_array());
        for p in vertices {
            put(p.scaled(self.options.scale).to_array());
        }
        // Attribute byte count stays zero.
        record
    }
}

impl<W: Write> TriangleSink for BinaryMeshWriter<W> {
    fn triangle(
        &mut self,
        normal: Vec3,
        p0: Point3d,
        p1: Point3d,
        p2: Point3d,
    ) -> Result<(), KernelError> {
        Ok(self.write_triangle(normal, p0, p1, p2)?)
    }

    fn square(
        &mut self,
        normal: Vec3,
        p0: Point3d,
        p1: Point3d,
        p2: Point3d,
        p3: Point3d,
    ) -> Result<(), KernelError> {
        Ok(self.write_square(normal, p0, p1, p2, p3)?)
    }
}
