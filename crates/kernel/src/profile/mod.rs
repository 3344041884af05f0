//! Axial profiles of rotationally symmetric solids.
//!
//! [`shape`] holds the radius-vs-position families; [`spec`] the immutable
//! description of one solid (outer profile, wall, optional shoulder).

pub mod shape;
pub mod spec;
