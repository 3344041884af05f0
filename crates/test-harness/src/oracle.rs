//! Verification oracles — pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail, not panics.
//! This lets callers collect all failures in one pass.

use nosecone_tessellation::stl::file_size;

use crate::helpers::{
    count_mesh_edges, directed_edges, mesh_bounding_box, mesh_signed_volume, triangle_area,
    undirected_edges,
};
use crate::stl::StlMesh;

/// The result of a single oracle check.
#[derive(Debug, Clone)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: Some(value),
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: Some(value),
        }
    }
}

// ── File Oracles ────────────────────────────────────────────────────────────

/// Check that the byte length is `84 + 50 * count`.
pub fn check_file_size(bytes: &[u8], mesh: &StlMesh) -> OracleVerdict {
    let expected = file_size(mesh.triangle_count());
    if bytes.len() == expected {
        OracleVerdict::pass_val(
            "file_size",
            format!("{} bytes for {} triangles", bytes.len(), mesh.triangle_count()),
            bytes.len() as f64,
        )
    } else {
        OracleVerdict::fail_val(
            "file_size",
            format!("expected {} bytes, got {}", expected, bytes.len()),
            bytes.len() as f64,
        )
    }
}

pub fn check_triangle_count(mesh: &StlMesh, expected: usize) -> OracleVerdict {
    let n = mesh.triangle_count();
    if n == expected {
        OracleVerdict::pass_val("triangle_count", format!("{} triangles", n), n as f64)
    } else {
        OracleVerdict::fail_val(
            "triangle_count",
            format!("expected {} triangles, got {}", expected, n),
            n as f64,
        )
    }
}

// ── Mesh Oracles ────────────────────────────────────────────────────────────

/// Check that every directed edge is matched by its reverse, i.e. the
/// surface is closed and consistently oriented.
///
/// Uses position-based edge matching (quantized to 1e-4).
pub fn check_watertight_mesh(mesh: &StlMesh) -> OracleVerdict {
    let edges = directed_edges(mesh);
    let unmatched: Vec<_> = edges
        .iter()
        .filter(|&(&(a, b), &n)| edges.get(&(b, a)).copied().unwrap_or(0) != n)
        .map(|(&(a, b), &n)| (a, b, n))
        .collect();

    if unmatched.is_empty() {
        OracleVerdict::pass(
            "watertight",
            format!("all {} directed edges pair with their reverse", edges.len()),
        )
    } else {
        OracleVerdict::fail(
            "watertight",
            format!(
                "{} unmatched directed edges: {:?}",
                unmatched.len(),
                &unmatched[..unmatched.len().min(5)]
            ),
        )
    }
}

/// Check that every non-degenerate edge is shared by exactly 2 triangles.
pub fn check_manifold_edges(mesh: &StlMesh) -> OracleVerdict {
    let (total, boundary) = count_mesh_edges(mesh);
    let over = undirected_edges(mesh).values().filter(|&&n| n > 2).count();

    if boundary == 0 && over == 0 {
        OracleVerdict::pass(
            "manifold_edges",
            format!("all {} edges have exactly 2 faces", total),
        )
    } else {
        OracleVerdict::fail(
            "manifold_edges",
            format!(
                "{} boundary edges, {} edges with more than 2 faces (of {})",
                boundary, over, total
            ),
        )
    }
}

/// Check that no triangle has (near) zero area.
pub fn check_no_degenerate_triangles(mesh: &StlMesh, min_area: f64) -> OracleVerdict {
    let degenerate = mesh
        .triangles
        .iter()
        .filter(|t| triangle_area(&t.vertices) <= min_area)
        .count();

    if degenerate == 0 {
        OracleVerdict::pass(
            "no_degenerate_triangles",
            format!("all {} triangles have area > {}", mesh.triangle_count(), min_area),
        )
    } else {
        OracleVerdict::fail_val(
            "no_degenerate_triangles",
            format!("{} of {} triangles are degenerate", degenerate, mesh.triangle_count()),
            degenerate as f64,
        )
    }
}

/// Check that every triangle has exactly zero area (collapsed geometry).
pub fn check_all_degenerate(mesh: &StlMesh) -> OracleVerdict {
    let nonzero = mesh
        .triangles
        .iter()
        .filter(|t| triangle_area(&t.vertices) != 0.0)
        .count();
    if nonzero == 0 {
        OracleVerdict::pass(
            "all_degenerate",
            format!("all {} triangles have zero area", mesh.triangle_count()),
        )
    } else {
        OracleVerdict::fail(
            "all_degenerate",
            format!("{} triangles have non-zero area", nonzero),
        )
    }
}

/// Check that stored normals are zero or unit length.
pub fn check_normals_zero_or_unit(mesh: &StlMesh) -> OracleVerdict {
    let bad = mesh
        .triangles
        .iter()
        .filter(|t| {
            let [x, y, z] = t.normal.map(|c| c as f64);
            let len = (x * x + y * y + z * z).sqrt();
            len != 0.0 && (len - 1.0).abs() > 1e-4
        })
        .count();
    if bad == 0 {
        OracleVerdict::pass("normals", "all normals zero or unit".to_string())
    } else {
        OracleVerdict::fail("normals", format!("{} normals are neither zero nor unit", bad))
    }
}

/// Check that the enclosed volume is positive (outward winding).
pub fn check_positive_volume(mesh: &StlMesh) -> OracleVerdict {
    let v = mesh_signed_volume(mesh);
    if v > 0.0 {
        OracleVerdict::pass_val("positive_volume", format!("signed volume {:.6}", v), v)
    } else {
        OracleVerdict::fail_val(
            "positive_volume",
            format!("signed volume {:.6} (faces wind inward?)", v),
            v,
        )
    }
}

/// Check that the mesh bounding box falls within expected bounds.
pub fn check_bounding_box(
    mesh: &StlMesh,
    expected_min: [f32; 3],
    expected_max: [f32; 3],
    tolerance: f32,
) -> OracleVerdict {
    let Some((actual_min, actual_max)) = mesh_bounding_box(mesh) else {
        return OracleVerdict::fail("bounding_box", "mesh has no vertices".to_string());
    };

    for i in 0..3 {
        if (actual_min[i] - expected_min[i]).abs() > tolerance {
            return OracleVerdict::fail(
                "bounding_box",
                format!(
                    "min[{}]: expected {:.3}, got {:.3} (tol={})",
                    i, expected_min[i], actual_min[i], tolerance
                ),
            );
        }
        if (actual_max[i] - expected_max[i]).abs() > tolerance {
            return OracleVerdict::fail(
                "bounding_box",
                format!(
                    "max[{}]: expected {:.3}, got {:.3} (tol={})",
                    i, expected_max[i], actual_max[i], tolerance
                ),
            );
        }
    }

    OracleVerdict::pass(
        "bounding_box",
        format!(
            "({:.1},{:.1},{:.1}) -> ({:.1},{:.1},{:.1})",
            actual_min[0],
            actual_min[1],
            actual_min[2],
            actual_max[0],
            actual_max[1],
            actual_max[2],
        ),
    )
}

// ── Composite ───────────────────────────────────────────────────────────────

/// Checks every closed, outward-facing shell should pass.
pub fn run_all_mesh_checks(mesh: &StlMesh) -> Vec<OracleVerdict> {
    vec![
        check_watertight_mesh(mesh),
        check_manifold_edges(mesh),
        check_positive_volume(mesh),
        check_normals_zero_or_unit(mesh),
    ]
}
