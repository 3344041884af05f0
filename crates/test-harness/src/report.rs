//! Structured text mesh reports.
//!
//! Reports are plain text so they can be read in a terminal or diffed in a
//! test log.

use std::fmt;

use serde::Serialize;

use crate::helpers::{
    HarnessError, count_mesh_edges, mesh_bounding_box, mesh_signed_volume, mesh_surface_area,
};
use crate::oracle::{OracleVerdict, check_file_size, run_all_mesh_checks};
use crate::stl::{StlMesh, parse_binary_stl};

/// Everything worth knowing about one STL file.
#[derive(Debug, Clone, Serialize)]
pub struct MeshReport {
    pub name: String,
    pub file_size: usize,
    pub triangle_count: usize,
    pub edge_count: usize,
    pub boundary_edges: usize,
    pub bounding_box: Option<([f32; 3], [f32; 3])>,
    pub surface_area: f64,
    pub signed_volume: f64,
    #[serde(skip)]
    pub oracle_results: Vec<OracleVerdict>,
}

impl MeshReport {
    /// Parse `bytes` and run every mesh oracle over the result.
    pub fn from_stl_bytes(name: &str, bytes: &[u8]) -> Result<Self, HarnessError> {
        let mesh = parse_binary_stl(bytes)?;
        let mut report = Self::from_mesh(name, &mesh);
        report.file_size = bytes.len();
        report.oracle_results.insert(0, check_file_size(bytes, &mesh));
        Ok(report)
    }

    pub fn from_mesh(name: &str, mesh: &StlMesh) -> Self {
        let (edge_count, boundary_edges) = count_mesh_edges(mesh);
        Self {
            name: name.to_string(),
            file_size: nosecone_tessellation::stl::file_size(mesh.triangle_count()),
            triangle_count: mesh.triangle_count(),
            edge_count,
            boundary_edges,
            bounding_box: mesh_bounding_box(mesh),
            surface_area: mesh_surface_area(mesh),
            signed_volume: mesh_signed_volume(mesh),
            oracle_results: run_all_mesh_checks(mesh),
        }
    }

    pub fn all_passed(&self) -> bool {
        self.oracle_results.iter().all(|v| v.passed)
    }

    /// Format the report as text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== Mesh Report: {} ===\n\n", self.name));
        out.push_str(&format!(
            "Triangles: {} ({} bytes)\n",
            self.triangle_count, self.file_size
        ));
        out.push_str(&format!(
            "Edges: {} ({} boundary)\n",
            self.edge_count, self.boundary_edges
        ));

        if let Some((min, max)) = self.bounding_box {
            out.push_str(&format!(
                "Bounding Box: ({:.3}, {:.3}, {:.3}) -> ({:.3}, {:.3}, {:.3})\n",
                min[0], min[1], min[2], max[0], max[1], max[2],
            ));
        } else {
            out.push_str("Bounding Box: empty\n");
        }
        out.push_str(&format!(
            "Surface Area: {:.3}\nVolume: {:.3}\n",
            self.surface_area, self.signed_volume
        ));

        if !self.oracle_results.is_empty() {
            out.push_str(&format!(
                "\nOracle Results ({} checks):\n",
                self.oracle_results.len()
            ));
            for v in &self.oracle_results {
                let status = if v.passed { "PASS" } else { "FAIL" };
                out.push_str(&format!("  [{}] {}: {}\n", status, v.oracle_name, v.detail));
            }
        }
        out
    }
}

impl fmt::Display for MeshReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}
