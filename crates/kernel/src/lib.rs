//! Geometry kernel for axisymmetric shell export.
//!
//! Holds the value types (`Point3d`, `Vec3`), circular ring sampling, the
//! nose-cone shape families and solid description, implicit scalar fields,
//! and the shared error type. Triangle emission lives in
//! `nosecone-tessellation`.

pub mod error;
pub mod field;
pub mod geometry;
pub mod profile;

pub use error::KernelError;
pub use field::{NormalField, ScalarField, SphereField, TorusField};
pub use geometry::point::Point3d;
pub use geometry::ring::{CircularSampler, Ring, RingIter};
pub use geometry::vector::Vec3;
pub use profile::shape::{Shape, ShapeFunction};
pub use profile::spec::{AxisymmetricSolidSpec, Shoulder};

/// Meters to millimeters, applied once when geometry leaves the domain model.
pub const METERS_TO_MILLIMETERS: f64 = 1000.0;
