//! Helper functions: error type, mesh math.

use std::collections::HashMap;

use nosecone_kernel::KernelError;

use crate::stl::StlMesh;

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },

    #[error("STL error: {reason}")]
    StlError { reason: String },

    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ── Mesh Math ───────────────────────────────────────────────────────────────

/// Vertex position quantized for edge matching (1e-4 of the file unit).
pub type VertexKey = (i64, i64, i64);

pub fn vertex_key(v: [f32; 3]) -> VertexKey {
    fn quantize(c: f32) -> i64 {
        (c as f64 * 10000.0).round() as i64
    }
    (quantize(v[0]), quantize(v[1]), quantize(v[2]))
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f64; 3] {
    [
        a[0] as f64 - b[0] as f64,
        a[1] as f64 - b[1] as f64,
        a[2] as f64 - b[2] as f64,
    ]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Twice the area vector of a triangle.
pub fn triangle_cross(v: &[[f32; 3]; 3]) -> [f64; 3] {
    cross(sub(v[1], v[0]), sub(v[2], v[0]))
}

pub fn triangle_area(v: &[[f32; 3]; 3]) -> f64 {
    let c = triangle_cross(v);
    (c[0] * c[0] + c[1] * c[1] + c[2] * c[2]).sqrt() / 2.0
}

/// Axis-aligned bounds over all vertices, `None` for an empty mesh.
pub fn mesh_bounding_box(mesh: &StlMesh) -> Option<([f32; 3], [f32; 3])> {
    let mut vertices = mesh.triangles.iter().flat_map(|t| t.vertices);
    let first = vertices.next()?;
    let (mut min, mut max) = (first, first);
    for v in vertices {
        for i in 0..3 {
            min[i] = min[i].min(v[i]);
            max[i] = max[i].max(v[i]);
        }
    }
    Some((min, max))
}

/// Signed volume by the divergence theorem; positive when the closed
/// surface winds outward.
pub fn mesh_signed_volume(mesh: &StlMesh) -> f64 {
    let volume: f64 = mesh
        .triangles
        .iter()
        .map(|t| {
            let [a, b, c] = t.vertices.map(|v| [v[0] as f64, v[1] as f64, v[2] as f64]);
            let bc = cross(b, c);
            a[0] * bc[0] + a[1] * bc[1] + a[2] * bc[2]
        })
        .sum();
    volume / 6.0
}

pub fn mesh_surface_area(mesh: &StlMesh) -> f64 {
    mesh.triangles.iter().map(|t| triangle_area(&t.vertices)).sum()
}

/// Directed edge multiplicities keyed by quantized position.
pub fn directed_edges(mesh: &StlMesh) -> HashMap<(VertexKey, VertexKey), usize> {
    let mut edges = HashMap::new();
    for t in &mesh.triangles {
        let k = t.vertices.map(vertex_key);
        for (a, b) in [(k[0], k[1]), (k[1], k[2]), (k[2], k[0])] {
            *edges.entry((a, b)).or_insert(0) += 1;
        }
    }
    edges
}

/// Undirected edge multiplicities. Zero-length edges are ignored.
pub fn undirected_edges(mesh: &StlMesh) -> HashMap<(VertexKey, VertexKey), usize> {
    let mut counts = HashMap::new();
    for ((a, b), n) in directed_edges(mesh) {
        if a != b {
            *counts.entry((a.min(b), a.max(b))).or_insert(0) += n;
        }
    }
    counts
}

/// Count mesh edges: returns (total_edges, boundary_edges).
///
/// A boundary edge is used by exactly one triangle.
pub fn count_mesh_edges(mesh: &StlMesh) -> (usize, usize) {
    let counts = undirected_edges(mesh);
    let boundary = counts.values().filter(|&&n| n == 1).count();
    (counts.len(), boundary)
}
