//! Orthographic projection: the globe as seen from infinitely far away.
//!
//! forward: x = cos φ·sin λ, y = sin φ
//! inverse: azimuthal with c = asin(z), defined only inside the unit disk.

use crate::math::{asin, EPSILON};
use crate::proj::azimuthal::azimuthal_invert;
use crate::proj::Projector;

#[derive(Clone, Copy, Debug, Default)]
pub struct Orthographic;

impl Orthographic {
    pub const DEFAULT_SCALE: f64 = 249.5;
    /// Hide the far hemisphere; the nudge keeps the limb itself visible.
    pub const DEFAULT_CLIP_ANGLE_DEG: f64 = 90.0 + EPSILON;
}

impl Projector for Orthographic {
    fn project(&self, lambda: f64, phi: f64) -> (f64, f64) {
        (phi.cos() * lambda.sin(), phi.sin())
    }

    fn invert(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if (x * x + y * y).sqrt() > 1.0 + EPSILON {
            return None;
        }
        Some(azimuthal_invert(x, y, asin))
    }
}
