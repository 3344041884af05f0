//! Verification tooling for generated meshes.
//!
//! # Key Components
//!
//! - [`stl`] — Binary STL parsing back into triangles
//! - [`oracle`] — Verification functions returning pass/fail verdicts
//! - [`report`] — Structured text mesh descriptions
//! - [`helpers`] — Error type, mesh math
//! - [`assertions`] — Assertion helpers with diagnostics

pub mod assertions;
pub mod helpers;
pub mod oracle;
pub mod report;
pub mod stl;

pub use helpers::HarnessError;
pub use oracle::OracleVerdict;
pub use report::MeshReport;
pub use stl::{StlMesh, StlTriangle, parse_binary_stl};
