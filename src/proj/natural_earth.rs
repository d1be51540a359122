//! Natural Earth projection (Šavrič, Patterson, Jenny).
//!
//! A pseudocylindrical world map defined by two polynomials in φ²:
//!   x = λ·(0.8707 − 0.131979φ² − 0.013791φ⁴ + 0.003971φ¹⁰ − 0.001529φ¹²)
//!   y = φ·(1.007226 + 0.015085φ² − 0.044475φ⁶ + 0.028874φ⁸ − 0.005916φ¹⁰)
//!
//! The y polynomial has no closed-form inverse, so `invert` solves it with
//! Newton's method.

use crate::math::{EPSILON, HALF_PI, PI};
use crate::proj::Projector;

/// Hard cap on Newton steps; past it the best estimate so far is returned.
pub const MAX_ITERATIONS: usize = 25;

#[derive(Clone, Copy, Debug, Default)]
pub struct NaturalEarth;

impl NaturalEarth {
    pub const DEFAULT_SCALE: f64 = 175.295;
}

fn x_factor(phi2: f64) -> f64 {
    let phi4 = phi2 * phi2;
    0.8707 - 0.131979 * phi2 + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4))
}

fn y_value(phi: f64) -> f64 {
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;
    phi * (1.007226 + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)))
}

fn y_derivative(phi: f64) -> f64 {
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;
    1.007226
        + phi2 * (0.015085 * 3.0 + phi4 * (-0.044475 * 7.0 + 0.028874 * 9.0 * phi2 - 0.005916 * 11.0 * phi4))
}

/// Solve `y_value(φ) = y` for φ. Returns the estimate and whether it converged.
fn solve_latitude(y: f64) -> (f64, bool) {
    let mut phi = y;
    for _ in 0..MAX_ITERATIONS {
        let delta = (y_value(phi) - y) / y_derivative(phi);
        phi -= delta;
        if delta.abs() <= EPSILON {
            return (phi, true);
        }
    }
    (phi, false)
}

impl Projector for NaturalEarth {
    fn project(&self, lambda: f64, phi: f64) -> (f64, f64) {
        (lambda * x_factor(phi * phi), y_value(phi))
    }

    fn invert(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        // Above the top of the outline the polynomial has no real root.
        if y.abs() > y_value(HALF_PI) + EPSILON {
            return None;
        }
        let (phi, converged) = solve_latitude(y);
        if !converged {
            tracing::trace!(y, phi, "natural earth latitude solve hit the iteration cap");
        }
        if !phi.is_finite() || phi.abs() > HALF_PI + EPSILON {
            return None;
        }
        // Past the side edges of the outline the longitude leaves [-π, π].
        let lambda = x / x_factor(phi * phi);
        if !lambda.is_finite() || lambda.abs() > PI + EPSILON {
            return None;
        }
        Some((lambda, phi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_origin() {
        let (x, y) = NaturalEarth.project(0.0, 0.0);
        assert_relative_eq!(x, 0.0);
        assert_relative_eq!(y, 0.0);
    }

    #[test]
    fn test_roundtrip() {
        let cases: &[(f64, f64)] = &[
            (0.0, 0.0),
            (10.0, 45.0),
            (-179.0, -89.0),
            (120.0, 75.0),
            (-60.0, -30.0),
            (179.9, 89.9),
        ];
        for &(lon_deg, lat_deg) in cases {
            let lon = lon_deg.to_radians();
            let lat = lat_deg.to_radians();
            let (x, y) = NaturalEarth.project(lon, lat);
            let (lon2, lat2) = NaturalEarth.invert(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-6);
            assert_relative_eq!(lat2, lat, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_equator_width() {
        let (x, _) = NaturalEarth.project(std::f64::consts::PI, 0.0);
        assert_relative_eq!(x, 0.8707 * std::f64::consts::PI);
    }

    #[test]
    fn test_invert_beyond_pole_is_none() {
        let (_, y_pole) = NaturalEarth.project(0.0, HALF_PI);
        assert!(NaturalEarth.invert(0.0, y_pole * 1.5).is_none());
    }

    #[test]
    fn test_invert_beyond_side_edge_is_none() {
        let edge = 0.8707 * PI;
        assert!(NaturalEarth.invert(1.5 * edge, 0.0).is_none());
        assert!(NaturalEarth.invert(-1.5 * edge, 0.0).is_none());
        // Near the pole the outline is narrower than at the equator.
        let (x_top, y_top) = NaturalEarth.project(PI, 1.4);
        assert!(NaturalEarth.invert(x_top * 1.1, y_top).is_none());
        let (lambda, _) = NaturalEarth.invert(edge, 0.0).unwrap();
        assert_relative_eq!(lambda, PI, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_is_bounded_for_garbage() {
        // Garbage must come back after the capped number of steps.
        let (_, converged) = solve_latitude(1e12);
        assert!(!converged);
        assert!(NaturalEarth.invert(0.0, 1e12).is_none());
        assert!(NaturalEarth.invert(0.0, f64::NAN).is_none());
    }
}
