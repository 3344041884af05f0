//! Closed hollow shell from an [`AxisymmetricSolidSpec`]: outer surface,
//! inner surface, optional shoulder, and the aft annulus that seals them.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use nosecone_kernel::{AxisymmetricSolidSpec, CircularSampler, KernelError, Ring, ShapeFunction, Vec3};

use crate::profile::{ProfileTessellator, StepPolicy, Winding};
use crate::{CountingSink, TriangleSink};

/// What one assembly produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellSummary {
    pub outer_layers: usize,
    pub inner_layers: usize,
    /// Layers of each shoulder wall (outer and inner have the same count).
    pub shoulder_layers: usize,
    pub triangles: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellAssembler {
    pub segments: usize,
    pub step: StepPolicy,
}

fn check_rings(outer: &Ring, inner: &Ring) -> Result<(), KernelError> {
    if outer.len() != inner.len() {
        return Err(KernelError::RingMismatch {
            outer: outer.len(),
            inner: inner.len(),
        });
    }
    Ok(())
}

/// Annulus between two rings at the same station, `(o_i, n_i, n_{i+1}, o_{i+1})`.
fn stitch(
    outer: &Ring,
    inner: &Ring,
    sink: &mut dyn TriangleSink,
) -> Result<(), KernelError> {
    check_rings(outer, inner)?;
    for i in 0..outer.len().saturating_sub(1) {
        sink.square(Vec3::ZERO, outer[i], inner[i], inner[i + 1], outer[i + 1])?;
    }
    Ok(())
}

impl ShellAssembler {
    pub fn new(segments: usize, step: StepPolicy) -> Self {
        Self { segments, step }
    }

    /// Check `spec` and the ring settings without emitting anything, and
    /// return the resolved axial step.
    pub fn validate<S: ShapeFunction>(
        &self,
        spec: &AxisymmetricSolidSpec<S>,
    ) -> Result<f64, KernelError> {
        spec.check()?;
        CircularSampler::try_new(0.0, self.segments)?;
        self.step.resolve(spec.length)
    }

    /// Tessellate `spec` into `sink`.
    ///
    /// The step is resolved once from the outer length and shared by every
    /// wall, so the inner and shoulder walls line up with the outer one.
    #[instrument(skip_all, fields(segments = self.segments))]
    pub fn assemble<S: ShapeFunction>(
        &self,
        spec: &AxisymmetricSolidSpec<S>,
        sink: &mut dyn TriangleSink,
    ) -> Result<ShellSummary, KernelError> {
        let step = self.validate(spec)?;
        let mut sink = CountingSink::new(sink);

        let outer_length = spec.length;
        let inner_length = spec.inner_length();
        let outer_profile = |x: f64| spec.outer_radius(x);
        // The inner tessellator applies the wall offset.
        let inner_profile = |x: f64| spec.inner_profile(x);

        let outer = ProfileTessellator::new(self.segments, step);
        let inner = outer
            .with_offset(spec.thickness)
            .with_winding(Winding::Inward);

        let mut summary = ShellSummary {
            outer_layers: outer.layer_count(step, outer_length),
            inner_layers: inner.layer_count(step, inner_length),
            ..ShellSummary::default()
        };

        let mut outer_end = outer.tessellate(&outer_profile, outer_length, &mut sink)?;
        let mut inner_end = inner.tessellate(&inner_profile, inner_length, &mut sink)?;
        check_rings(&outer_end, &inner_end)?;

        if let Some(shoulder) = spec.active_shoulder() {
            // The shoulder begins where the inner wall ended.
            let x = inner_end[0].x;
            let end = spec.length + shoulder.length;
            let (outer_radius, inner_radius) = (shoulder.radius, shoulder.inner_radius());
            let shoulder_outer = CircularSampler::try_new(outer_radius, self.segments)?
                .at(x)
                .ring();
            let shoulder_inner = CircularSampler::try_new(inner_radius, self.segments)?
                .at(x)
                .ring();
            check_rings(&shoulder_outer, &shoulder_inner)?;

            for i in 0..self.segments {
                sink.square(
                    Vec3::ZERO,
                    outer_end[i],
                    shoulder_outer[i],
                    shoulder_outer[i + 1],
                    outer_end[i + 1],
                )?;
                sink.square(
                    Vec3::ZERO,
                    shoulder_inner[i],
                    inner_end[i],
                    inner_end[i + 1],
                    shoulder_inner[i + 1],
                )?;
            }

            let wall = ProfileTessellator::new(self.segments, step);
            summary.shoulder_layers = wall.layer_count(x, end);
            outer_end = wall.tessellate_wall(
                &|_x: f64| outer_radius,
                x,
                shoulder_outer,
                end,
                &mut sink,
            )?;
            inner_end = wall.with_winding(Winding::Inward).tessellate_wall(
                &|_x: f64| inner_radius,
                x,
                shoulder_inner,
                end,
                &mut sink,
            )?;
        }

        stitch(&outer_end, &inner_end, &mut sink)?;

        summary.triangles = sink.count();
        info!(
            outer_layers = summary.outer_layers,
            inner_layers = summary.inner_layers,
            shoulder_layers = summary.shoulder_layers,
            triangles = summary.triangles,
            "shell assembled"
        );
        Ok(summary)
    }
}
