//! Equirectangular (Plate Carrée) projection.
//!
//! forward: x = λ, y = φ
//! inverse: λ = x, φ = y

use crate::proj::Projector;

#[derive(Clone, Copy, Debug, Default)]
pub struct Equirectangular;

impl Equirectangular {
    pub const DEFAULT_SCALE: f64 = 152.63;
}

impl Projector for Equirectangular {
    fn project(&self, lambda: f64, phi: f64) -> (f64, f64) {
        (lambda, phi)
    }

    fn invert(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        Some((x, y))
    }
}
