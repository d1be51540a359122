//! Shared inverse for azimuthal projections.
//!
//! An azimuthal projection maps angular distance `c` from the origin to a
//! radial distance `z` in the plane. Given the family's `z -> c` function the
//! inverse is the same for all of them.

use crate::math::asin;

/// Invert (x, y) for an azimuthal projection whose radial inverse is `angle`.
pub fn azimuthal_invert(x: f64, y: f64, angle: impl Fn(f64) -> f64) -> (f64, f64) {
    let z = (x * x + y * y).sqrt();
    let c = angle(z);
    let (sc, cc) = c.sin_cos();
    let phi = if z == 0.0 { 0.0 } else { asin(y * sc / z) };
    ((x * sc).atan2(z * cc), phi)
}
