use crate::geometry::point::Point3d;

/// Errors raised while sampling, tessellating, contouring or writing a mesh.
///
/// Degenerate geometry (zero radius, zero length, a wall thicker than the
/// profile) is never an error; it is clamped and produces zero-area facets.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    /// Outer and inner rings stitched together have different point counts.
    #[error("ring point counts differ: outer={outer}, inner={inner}")]
    RingMismatch { outer: usize, inner: usize },

    /// Bisection was handed two points on the same side of the surface.
    #[error("bisection bracket does not straddle the surface: {a:?} and {b:?} are both {side}")]
    SameSignBracket {
        a: Point3d,
        b: Point3d,
        side: &'static str,
    },

    /// Too few angular segments (or lattice divisions).
    #[error("need at least {required} segments, got {provided}")]
    InsufficientSegments { required: usize, provided: usize },

    /// A step, tolerance or extent is zero, negative or not finite.
    #[error("{parameter} must be positive and finite, got {value}")]
    InvalidDimension { parameter: &'static str, value: f64 },

    /// The output sink failed; partial output is not resumable.
    #[error("mesh output failed: {0}")]
    Io(#[from] std::io::Error),
}

impl KernelError {
    /// Reject non-finite or non-positive values for `parameter`.
    pub fn require_positive(parameter: &'static str, value: f64) -> Result<f64, KernelError> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(KernelError::InvalidDimension { parameter, value })
        }
    }
}
