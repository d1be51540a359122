//! Cutting geometry along the ±180° meridian.
//!
//! Every point is visible; a segment whose longitudes jump across the
//! antimeridian is split into two runs that meet the cut at a shared
//! latitude, and a segment passing exactly through a pole is routed over it.

use crate::math::{EPSILON, HALF_PI, PI};
use crate::stream::Stream;

/// Per-line state of the antimeridian cut.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AntimeridianLine {
    lambda0: f64,
    phi0: f64,
    sign0: f64,
    clean: u8,
    started: bool,
}

impl Default for AntimeridianLine {
    fn default() -> Self {
        Self {
            lambda0: f64::NAN,
            phi0: f64::NAN,
            sign0: f64::NAN,
            clean: 1,
            started: false,
        }
    }
}

impl AntimeridianLine {
    pub fn line_start<S: Stream + ?Sized>(&mut self, _out: &mut S) {
        // The downstream run opens with the first point.
        self.clean = 1;
        self.started = false;
    }

    pub fn point<S: Stream + ?Sized>(&mut self, out: &mut S, lambda: f64, phi: f64) {
        if !self.started {
            out.line_start();
            self.started = true;
        }

        let mut lambda1 = lambda;
        let sign1 = if lambda1 > 0.0 { PI } else { -PI };
        let delta = (lambda1 - self.lambda0).abs();

        if (delta - PI).abs() < EPSILON {
            // Over a pole.
            self.phi0 = if (self.phi0 + phi) / 2.0 > 0.0 {
                HALF_PI
            } else {
                -HALF_PI
            };
            out.point(self.lambda0, self.phi0, 0.0);
            out.point(self.sign0, self.phi0, 0.0);
            out.line_end();
            out.line_start();
            out.point(sign1, self.phi0, 0.0);
            out.point(lambda1, self.phi0, 0.0);
            self.clean = 0;
        } else if self.sign0 != sign1 && delta >= PI {
            if (self.lambda0 - self.sign0).abs() < EPSILON {
                self.lambda0 -= self.sign0 * EPSILON;
            }
            if (lambda1 - sign1).abs() < EPSILON {
                lambda1 -= sign1 * EPSILON;
            }
            self.phi0 = intersect(self.lambda0, self.phi0, lambda1, phi);
            out.point(self.sign0, self.phi0, 0.0);
            out.line_end();
            out.line_start();
            out.point(sign1, self.phi0, 0.0);
            self.clean = 0;
        }

        out.point(lambda1, phi, 0.0);
        self.lambda0 = lambda1;
        self.phi0 = phi;
        self.sign0 = sign1;
    }

    pub fn line_end<S: Stream + ?Sized>(&mut self, out: &mut S) {
        if self.started {
            out.line_end();
        }
        self.started = false;
        self.lambda0 = f64::NAN;
        self.phi0 = f64::NAN;
    }

    /// 1 when the line never crossed the cut, 2 when its first and last runs
    /// should be joined.
    pub fn clean(&self) -> u8 {
        2 - self.clean
    }
}

/// Latitude at which the great circle through the two points meets the
/// antimeridian.
fn intersect(lambda0: f64, phi0: f64, lambda1: f64, phi1: f64) -> f64 {
    let sin_lambda0_lambda1 = (lambda0 - lambda1).sin();
    if sin_lambda0_lambda1.abs() > EPSILON {
        let (cos_phi0, cos_phi1) = (phi0.cos(), phi1.cos());
        ((phi0.sin() * cos_phi1 * lambda1.sin() - phi1.sin() * cos_phi0 * lambda0.sin())
            / (cos_phi0 * cos_phi1 * sin_lambda0_lambda1))
            .atan()
    } else {
        (phi0 + phi1) / 2.0
    }
}

/// Walk the cut from `from` to `to`, or the whole sphere outline when no
/// endpoints are given.
pub(crate) fn interpolate<S: Stream + ?Sized>(
    ends: Option<((f64, f64), (f64, f64))>,
    direction: f64,
    out: &mut S,
) {
    match ends {
        None => {
            let phi = direction * HALF_PI;
            for (lambda, phi) in [
                (-PI, phi),
                (0.0, phi),
                (PI, phi),
                (PI, 0.0),
                (PI, -phi),
                (0.0, -phi),
                (-PI, -phi),
                (-PI, 0.0),
                (-PI, phi),
            ] {
                out.point(lambda, phi, 0.0);
            }
        }
        Some((from, to)) if (from.0 - to.0).abs() > EPSILON => {
            let lambda = if from.0 < to.0 { PI } else { -PI };
            let phi = direction * lambda / 2.0;
            out.point(-lambda, phi, 0.0);
            out.point(0.0, phi, 0.0);
            out.point(lambda, phi, 0.0);
        }
        Some((_, to)) => out.point(to.0, to.1, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::Recorder;
    use approx::assert_relative_eq;

    fn run(points: &[(f64, f64)]) -> (Recorder, u8) {
        let mut rec = Recorder::new();
        let mut line = AntimeridianLine::default();
        line.line_start(&mut rec);
        for &(lon, lat) in points {
            line.point(&mut rec, lon.to_radians(), lat.to_radians());
        }
        line.line_end(&mut rec);
        (rec, line.clean())
    }

    #[test]
    fn test_crossing_splits_line() {
        let (rec, clean) = run(&[(179.0, 0.0), (-179.0, 0.0)]);
        let lines = rec.lines();
        assert_eq!(lines.len(), 2);
        assert_relative_eq!(lines[0][1].0, PI, epsilon = 1e-12);
        assert_relative_eq!(lines[1][0].0, -PI, epsilon = 1e-12);
        assert_relative_eq!(lines[0][1].1, 0.0, epsilon = 1e-12);
        assert_eq!(clean, 2);
        assert!(rec.is_balanced());
    }

    #[test]
    fn test_no_crossing_is_clean() {
        let (rec, clean) = run(&[(10.0, 0.0), (20.0, 5.0), (30.0, 10.0)]);
        assert_eq!(rec.lines().len(), 1);
        assert_eq!(clean, 1);
    }

    #[test]
    fn test_pole_crossing() {
        let (rec, _) = run(&[(0.0, 80.0), (180.0, 80.0)]);
        let lines = rec.lines();
        assert_eq!(lines.len(), 2);
        assert_relative_eq!(lines[0].last().unwrap().1, HALF_PI, epsilon = 1e-12);
        assert_relative_eq!(lines[1][0].1, HALF_PI, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_line_emits_nothing() {
        let (rec, _) = run(&[]);
        assert!(rec.events.is_empty());
    }

    #[test]
    fn test_intersect_latitude() {
        // Symmetric crossing at the equator stays on the equator.
        let phi = intersect(
            179f64.to_radians(),
            10f64.to_radians(),
            -179f64.to_radians(),
            -10f64.to_radians(),
        );
        assert_relative_eq!(phi, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_interpolate_full_outline() {
        let mut rec = Recorder::new();
        interpolate(None, 1.0, &mut rec);
        let points: Vec<_> = rec.points().collect();
        assert_eq!(points.len(), 9);
        assert_eq!(points.first(), points.last());
    }
}
