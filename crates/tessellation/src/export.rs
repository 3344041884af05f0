//! End-to-end exports: header, deferred count, tessellation, finalize.

use std::io::Write;
use std::path::Path;

use tracing::{info, instrument};

use nosecone_kernel::{AxisymmetricSolidSpec, KernelError, NormalField, ScalarField, ShapeFunction};

use crate::config::{ContourConfig, ExportConfig};
use crate::contour::{ContourSummary, GridBounds, ImplicitSurfaceContourer};
use crate::shell::{ShellAssembler, ShellSummary};
use crate::stl::BinaryMeshWriter;

/// Write `spec` as a binary STL into `out` and return the writer with the
/// assembly summary.
#[instrument(skip_all, fields(segments = config.segments))]
pub fn export_nose_cone<S: ShapeFunction, W: Write>(
    spec: &AxisymmetricSolidSpec<S>,
    config: &ExportConfig,
    out: W,
) -> Result<(W, ShellSummary), KernelError> {
    let mut writer = BinaryMeshWriter::new(out, config.writer);
    writer.write_header()?;
    writer.begin_deferred_count();
    let summary = ShellAssembler::new(config.segments, config.step).assemble(spec, &mut writer)?;
    let out = writer.finalize()?;
    Ok((out, summary))
}

/// As [`export_nose_cone`], into a new file at `path`. The file is closed
/// before this returns.
pub fn export_nose_cone_to_path<S: ShapeFunction>(
    spec: &AxisymmetricSolidSpec<S>,
    config: &ExportConfig,
    path: impl AsRef<Path>,
) -> Result<ShellSummary, KernelError> {
    let path = path.as_ref();
    let assembler = ShellAssembler::new(config.segments, config.step);
    // Bad input must not leave a header-only file behind.
    assembler.validate(spec)?;
    let mut writer = BinaryMeshWriter::create(path, config.writer)?;
    writer.write_header()?;
    writer.begin_deferred_count();
    let summary = assembler.assemble(spec, &mut writer)?;
    writer.finalize()?;
    info!(path = %path.display(), triangles = summary.triangles, "nose cone written");
    Ok(summary)
}

/// Contour `field` into `out` as a binary STL.
#[instrument(skip_all, fields(span = bounds.span))]
pub fn export_contour<W: Write>(
    field: &dyn ScalarField,
    normals: Option<&dyn NormalField>,
    bounds: GridBounds,
    config: &ContourConfig,
    out: W,
) -> Result<(W, ContourSummary), KernelError> {
    let mut writer = BinaryMeshWriter::new(out, config.writer);
    writer.write_header()?;
    writer.begin_deferred_count();
    let summary =
        ImplicitSurfaceContourer::new(*config).contour(field, normals, bounds, &mut writer)?;
    let out = writer.finalize()?;
    Ok((out, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::StepPolicy;
    use crate::stl::file_size;
    use nosecone_kernel::{Point3d, Shape, SphereField};

    #[test]
    fn nose_cone_bytes_match_the_summary() {
        let spec = AxisymmetricSolidSpec::nose_cone(Shape::Haack, 0.02, 0.12, 0.002);
        let (bytes, summary) =
            export_nose_cone(&spec, &ExportConfig::draft(), Vec::new()).unwrap();
        assert_eq!(bytes.len(), file_size(summary.triangles));
        let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]);
        assert_eq!(count as usize, summary.triangles);
    }

    #[test]
    fn export_to_path_closes_the_file() {
        let dir = std::env::temp_dir().join(format!("nosecone-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cone.stl");
        let spec = AxisymmetricSolidSpec::nose_cone(Shape::Conical, 0.01, 0.05, 0.001);
        let config = ExportConfig {
            segments: 8,
            step: StepPolicy::Fixed(0.005),
            ..ExportConfig::default()
        };
        let summary = export_nose_cone_to_path(&spec, &config, &path).unwrap();
        let len = std::fs::metadata(&path).unwrap().len() as usize;
        assert_eq!(len, file_size(summary.triangles));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let spec = AxisymmetricSolidSpec::nose_cone(Shape::Conical, 0.01, 0.05, 0.001);
        let err = export_nose_cone_to_path(
            &spec,
            &ExportConfig::draft(),
            "/nonexistent-dir/definitely/cone.stl",
        )
        .unwrap_err();
        assert!(matches!(err, KernelError::Io(_)));
    }

    #[test]
    fn rejected_input_leaves_no_file() {
        let dir = std::env::temp_dir().join(format!("nosecone-reject-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cone.stl");
        let spec = AxisymmetricSolidSpec::nose_cone(Shape::Conical, 0.01, 0.05, 0.001);

        let no_segments = ExportConfig {
            segments: 0,
            ..ExportConfig::draft()
        };
        let err = export_nose_cone_to_path(&spec, &no_segments, &path).unwrap_err();
        assert!(matches!(
            err,
            KernelError::InsufficientSegments { required: 1, provided: 0 }
        ));
        assert!(!path.exists());

        let mut bad = spec.clone();
        bad.aft_radius = f64::INFINITY;
        let err = export_nose_cone_to_path(&bad, &ExportConfig::draft(), &path).unwrap_err();
        assert!(matches!(err, KernelError::InvalidDimension { .. }));
        assert!(!path.exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn contour_export_writes_a_sphere() {
        let sphere = SphereField::new(Point3d::ORIGIN, 0.01);
        let bounds = GridBounds::cube(Point3d::ORIGIN, 0.015, 8);
        let (bytes, summary) = export_contour(
            &sphere,
            Some(&sphere),
            bounds,
            &ContourConfig::default(),
            Vec::new(),
        )
        .unwrap();
        assert!(summary.quads > 0);
        assert_eq!(bytes.len(), file_size(summary.triangles));
    }
}
