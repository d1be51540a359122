//! Sphere rotations by (Δλ, Δφ, Δγ).
//!
//! The rotation is a yaw about the polar axis (Δλ) followed by a combined
//! pitch/roll (Δφ, Δγ) evaluated with spherical trigonometry. A pure yaw
//! stays a longitude shift so the common "rotate the globe" case never pays
//! for the trig.

use crate::math::{asin, PI, TAU};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Rotation {
    Identity,
    Lambda(f64),
    PhiGamma(PhiGamma),
    Composite { delta_lambda: f64, phi_gamma: PhiGamma },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhiGamma {
    cos_delta_phi: f64,
    sin_delta_phi: f64,
    cos_delta_gamma: f64,
    sin_delta_gamma: f64,
}

impl Rotation {
    /// Build from radians. Δλ is reduced modulo τ first.
    pub fn new(delta_lambda: f64, delta_phi: f64, delta_gamma: f64) -> Self {
        let delta_lambda = delta_lambda % TAU;
        let tilted = delta_phi != 0.0 || delta_gamma != 0.0;
        match (delta_lambda != 0.0, tilted) {
            (false, false) => Rotation::Identity,
            (true, false) => Rotation::Lambda(delta_lambda),
            (false, true) => Rotation::PhiGamma(PhiGamma::new(delta_phi, delta_gamma)),
            (true, true) => Rotation::Composite {
                delta_lambda,
                phi_gamma: PhiGamma::new(delta_phi, delta_gamma),
            },
        }
    }

    /// Build from degrees, as the public configuration carries them.
    pub fn from_degrees(delta_lambda: f64, delta_phi: f64, delta_gamma: f64) -> Self {
        Self::new(
            delta_lambda.to_radians(),
            delta_phi.to_radians(),
            delta_gamma.to_radians(),
        )
    }

    pub fn rotate(&self, lambda: f64, phi: f64) -> (f64, f64) {
        match *self {
            Rotation::Identity => (wrap_longitude(lambda), phi),
            Rotation::Lambda(d) => (wrap_longitude(lambda + d), phi),
            Rotation::PhiGamma(pg) => pg.rotate(lambda, phi),
            Rotation::Composite {
                delta_lambda,
                phi_gamma,
            } => {
                let lambda = wrap_longitude(lambda + delta_lambda);
                phi_gamma.rotate(lambda, phi)
            }
        }
    }

    pub fn invert(&self, lambda: f64, phi: f64) -> (f64, f64) {
        match *self {
            Rotation::Identity => (wrap_longitude(lambda), phi),
            Rotation::Lambda(d) => (wrap_longitude(lambda - d), phi),
            Rotation::PhiGamma(pg) => pg.invert(lambda, phi),
            Rotation::Composite {
                delta_lambda,
                phi_gamma,
            } => {
                let (lambda, phi) = phi_gamma.invert(lambda, phi);
                (wrap_longitude(lambda - delta_lambda), phi)
            }
        }
    }
}

impl PhiGamma {
    fn new(delta_phi: f64, delta_gamma: f64) -> Self {
        Self {
            cos_delta_phi: delta_phi.cos(),
            sin_delta_phi: delta_phi.sin(),
            cos_delta_gamma: delta_gamma.cos(),
            sin_delta_gamma: delta_gamma.sin(),
        }
    }

    fn rotate(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * self.cos_delta_phi + x * self.sin_delta_phi;
        (
            (y * self.cos_delta_gamma - k * self.sin_delta_gamma)
                .atan2(x * self.cos_delta_phi - z * self.sin_delta_phi),
            asin(k * self.cos_delta_gamma + y * self.sin_delta_gamma),
        )
    }

    fn invert(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * self.cos_delta_gamma - y * self.sin_delta_gamma;
        (
            (y * self.cos_delta_gamma + z * self.sin_delta_gamma)
                .atan2(x * self.cos_delta_phi + k * self.sin_delta_phi),
            asin(k * self.cos_delta_phi - x * self.sin_delta_phi),
        )
    }
}

/// Bring a longitude back into [-π, π].
fn wrap_longitude(lambda: f64) -> f64 {
    if lambda.abs() > PI {
        lambda - (lambda / TAU).round() * TAU
    } else {
        lambda
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn deg(lambda: f64, phi: f64) -> (f64, f64) {
        (lambda.to_radians(), phi.to_radians())
    }

    #[test]
    fn test_zero_is_identity() {
        assert_eq!(Rotation::new(0.0, 0.0, 0.0), Rotation::Identity);
        assert_eq!(Rotation::new(TAU, 0.0, 0.0), Rotation::Identity);
    }

    #[test]
    fn test_pure_yaw_keeps_latitude() {
        let r = Rotation::from_degrees(90.0, 0.0, 0.0);
        assert!(matches!(r, Rotation::Lambda(_)));
        let (lambda, phi) = deg(100.0, 33.0);
        let (l2, p2) = r.rotate(lambda, phi);
        assert_eq!(p2, phi);
        // 190° wraps to -170°
        assert_relative_eq!(l2, (-170.0_f64).to_radians(), epsilon = 1e-12);
    }

    #[test]
    fn test_pitch_moves_pole() {
        // Tilting by 90° brings the north pole onto the equator at λ = 180°.
        let r = Rotation::from_degrees(0.0, 90.0, 0.0);
        let (lambda, phi) = r.rotate(0.0, std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(phi, 0.0, epsilon = 1e-12);
        assert_relative_eq!(lambda.abs(), PI, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_inverse_law() {
        let rotations = [
            (0.0, 0.0, 0.0),
            (45.0, 0.0, 0.0),
            (0.0, 30.0, 0.0),
            (0.0, 0.0, -20.0),
            (-120.0, 45.0, 10.0),
            (200.0, -60.0, 170.0),
            (12.5, 89.0, -45.0),
        ];
        let points = [
            (0.0, 0.0),
            (10.0, 20.0),
            (-179.0, -45.0),
            (135.0, 60.0),
            (-45.0, -80.0),
            (90.0, 0.0),
        ];
        for &(dl, dp, dg) in &rotations {
            let r = Rotation::from_degrees(dl, dp, dg);
            for &(lon, lat) in &points {
                let (lambda, phi) = deg(lon, lat);
                let (rl, rp) = r.rotate(lambda, phi);
                let (il, ip) = r.invert(rl, rp);
                assert_relative_eq!(il, lambda, epsilon = 1e-9);
                assert_relative_eq!(ip, phi, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_composite_matches_sequential() {
        let yaw = Rotation::from_degrees(30.0, 0.0, 0.0);
        let tilt = Rotation::from_degrees(0.0, 20.0, 5.0);
        let both = Rotation::from_degrees(30.0, 20.0, 5.0);
        let (lambda, phi) = deg(-40.0, 12.0);
        let (a, b) = yaw.rotate(lambda, phi);
        let expected = tilt.rotate(a, b);
        let actual = both.rotate(lambda, phi);
        assert_relative_eq!(actual.0, expected.0, epsilon = 1e-12);
        assert_relative_eq!(actual.1, expected.1, epsilon = 1e-12);
    }
}
