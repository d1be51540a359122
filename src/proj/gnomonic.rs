//! Gnomonic projection: great circles become straight lines.
//!
//! forward: k = cos λ·cos φ, x = cos φ·sin λ / k, y = sin φ / k
//! inverse: azimuthal with c = atan(z).

use crate::proj::azimuthal::azimuthal_invert;
use crate::proj::Projector;

#[derive(Clone, Copy, Debug, Default)]
pub struct Gnomonic;

impl Gnomonic {
    pub const DEFAULT_SCALE: f64 = 144.049;
    pub const DEFAULT_CLIP_ANGLE_DEG: f64 = 60.0;
}

impl Projector for Gnomonic {
    fn project(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let cos_phi = phi.cos();
        let k = lambda.cos() * cos_phi;
        (cos_phi * lambda.sin() / k, phi.sin() / k)
    }

    fn invert(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        Some(azimuthal_invert(x, y, f64::atan))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_equator_is_tangent() {
        let (x, y) = Gnomonic.project(10.0_f64.to_radians(), 0.0);
        assert_relative_eq!(x, 0.176_326_980_708_464_98, epsilon = 1e-15);
        assert_relative_eq!(y, 0.0);
    }

    #[test]
    fn test_roundtrip() {
        let cases: &[(f64, f64)] = &[(0.0, 0.0), (10.0, 10.0), (-30.0, 40.0), (45.0, -20.0)];
        for &(lon_deg, lat_deg) in cases {
            let lon = lon_deg.to_radians();
            let lat = lat_deg.to_radians();
            let (x, y) = Gnomonic.project(lon, lat);
            let (lon2, lat2) = Gnomonic.invert(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-9);
            assert_relative_eq!(lat2, lat, epsilon = 1e-9);
        }
    }
}
