//! Spherical map projections over a push-based point stream.
//!
//! Geometry in (lon, lat) degrees flows through rotation, clipping,
//! projection, adaptive resampling and a planar transform into a caller's
//! [`Stream`] sink. [`Projection`] owns the configuration and builds the
//! chain for each render pass.

pub mod affine;
pub mod angle;
pub mod cartesian;
pub mod circle;
pub mod clip;
pub mod error;
pub mod geometry;
pub mod math;
pub mod path;
pub mod proj;
pub mod projection;
pub mod rotation;
pub mod stream;

#[cfg(feature = "python")]
mod py;

pub use angle::{Angle, GeoPoint, PlanarPoint};
pub use circle::CircleGenerator;
pub use error::GeoError;
pub use geometry::{stream_geometry, Geometry};
pub use path::{BoundsSink, Path, PathCommand, PathSink};
pub use proj::{ProjectionKind, Projector};
pub use projection::{Projection, ProjectionConfig};
pub use rotation::Rotation;
pub use stream::Stream;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// A Python module implemented in Rust.
#[cfg(feature = "python")]
#[pymodule]
fn _geoproj(m: &Bound<'_, PyModule>) -> PyResult<()> {
    py::register(m)?;
    Ok(())
}
