//! Assertion helpers with diagnostic output.
//!
//! Every failure names the check and carries the oracle's detail.

use crate::helpers::HarnessError;
use crate::oracle::{self, OracleVerdict};
use crate::stl::StlMesh;

/// Turn a failing verdict into an error tagged with `ctx`.
pub fn require(verdict: OracleVerdict, ctx: &str) -> Result<(), HarnessError> {
    if verdict.passed {
        Ok(())
    } else {
        Err(HarnessError::OracleFailure {
            oracle: verdict.oracle_name,
            detail: format!("[{}] {}", ctx, verdict.detail),
        })
    }
}

pub fn assert_triangle_count(
    mesh: &StlMesh,
    expected: usize,
    ctx: &str,
) -> Result<(), HarnessError> {
    require(oracle::check_triangle_count(mesh, expected), ctx)
}

/// Closed, consistently oriented, outward-facing.
pub fn assert_closed_shell(mesh: &StlMesh, ctx: &str) -> Result<(), HarnessError> {
    for verdict in oracle::run_all_mesh_checks(mesh) {
        require(verdict, ctx)?;
    }
    Ok(())
}

pub fn assert_bounding_box(
    mesh: &StlMesh,
    expected_min: [f32; 3],
    expected_max: [f32; 3],
    tol: f32,
    ctx: &str,
) -> Result<(), HarnessError> {
    require(
        oracle::check_bounding_box(mesh, expected_min, expected_max, tol),
        ctx,
    )
}
