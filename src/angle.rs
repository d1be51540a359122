//! Angles that remember their unit, and the geographic/planar point types
//! built on them.
//!
//! The pipeline mixes degrees (public boundary) and radians (all the math).
//! An [`Angle`] keeps the value exactly as given and converts only when asked,
//! so a configured `30°` reads back as `30°` rather than a rounded radian trip.

use serde::{Deserialize, Serialize};

use crate::math::{DEGREES, RADIANS};

/// An angular value tagged with its unit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Angle {
    Degrees(f64),
    Radians(f64),
}

impl Angle {
    pub const ZERO: Angle = Angle::Degrees(0.0);

    pub fn deg(self) -> f64 {
        match self {
            Angle::Degrees(d) => d,
            Angle::Radians(r) => r * DEGREES,
        }
    }

    pub fn rad(self) -> f64 {
        match self {
            Angle::Degrees(d) => d * RADIANS,
            Angle::Radians(r) => r,
        }
    }

    /// Reduce modulo one full turn, keeping the unit and the sign
    /// (so `360°` becomes `0°` and `-30°` stays `-30°`).
    pub fn wrap_turn(self) -> Angle {
        match self {
            Angle::Degrees(d) => Angle::Degrees(d % 360.0),
            Angle::Radians(r) => Angle::Radians(r % std::f64::consts::TAU),
        }
    }

    pub fn is_finite(self) -> bool {
        match self {
            Angle::Degrees(v) | Angle::Radians(v) => v.is_finite(),
        }
    }
}

impl Default for Angle {
    fn default() -> Self {
        Angle::ZERO
    }
}

/// A (longitude, latitude) location on the sphere.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: Angle,
    pub lat: Angle,
}

impl GeoPoint {
    pub const fn new(lon: Angle, lat: Angle) -> Self {
        Self { lon, lat }
    }

    pub const fn from_degrees(lon: f64, lat: f64) -> Self {
        Self::new(Angle::Degrees(lon), Angle::Degrees(lat))
    }

    pub const fn from_radians(lambda: f64, phi: f64) -> Self {
        Self::new(Angle::Radians(lambda), Angle::Radians(phi))
    }

    /// (λ, φ) in radians.
    pub fn radians(self) -> (f64, f64) {
        (self.lon.rad(), self.lat.rad())
    }

    /// (lon, lat) in degrees.
    pub fn degrees(self) -> (f64, f64) {
        (self.lon.deg(), self.lat.deg())
    }
}

/// A projected location in plane units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for PlanarPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}
