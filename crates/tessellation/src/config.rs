//! Export configuration.

use serde::{Deserialize, Serialize};

use crate::contour::{QuadWinding, VertexPlacement};
use crate::profile::StepPolicy;
use crate::stl::{Orientation, WriterOptions};

/// Settings for a nose-cone export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Segments around each ring.
    pub segments: usize,
    /// Axial step between rings, resolved from the outer length.
    pub step: StepPolicy,
    pub writer: WriterOptions,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            segments: 20,
            step: StepPolicy::Divisions(100),
            writer: WriterOptions::default().with_orientation(Orientation::Print),
        }
    }
}

impl ExportConfig {
    /// Coarse mesh for quick previews.
    pub fn draft() -> Self {
        Self {
            segments: 12,
            step: StepPolicy::Divisions(25),
            ..Self::default()
        }
    }

    /// Dense mesh for printing.
    pub fn fine() -> Self {
        Self {
            segments: 96,
            step: StepPolicy::Divisions(400),
            ..Self::default()
        }
    }
}

/// Settings for implicit-surface contouring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourConfig {
    /// Bisection stops once the bracket is shorter than this.
    pub tolerance: f64,
    pub placement: VertexPlacement,
    pub winding: QuadWinding,
    pub writer: WriterOptions,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-4,
            placement: VertexPlacement::Corner,
            winding: QuadWinding::InsideOut,
            writer: WriterOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_differ_only_in_density() {
        let (draft, normal, fine) = (ExportConfig::draft(), ExportConfig::default(), ExportConfig::fine());
        assert!(draft.segments < normal.segments && normal.segments < fine.segments);
        assert_eq!(draft.writer, normal.writer);
        assert_eq!(fine.writer.orientation, Orientation::Print);
        assert_eq!(normal.writer.scale, 1000.0);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c: ExportConfig = serde_json::from_str(r#"{"segments": 32}"#).unwrap();
        assert_eq!(c.segments, 32);
        assert_eq!(c.step, StepPolicy::Divisions(100));

        let c: ContourConfig =
            serde_json::from_str(r#"{"winding": "lattice", "placement": "cell_center"}"#).unwrap();
        assert_eq!(c.winding, QuadWinding::Lattice);
        assert_eq!(c.placement, VertexPlacement::CellCenter);
        assert_eq!(c.tolerance, 1e-4);
    }
}
