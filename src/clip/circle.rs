//! Clipping to a small circle around the native pole (λ = 0, φ = 0).
//!
//! A point is visible when its angular distance from the pole is below the
//! clip radius. Segments crossing the circle are cut at the crossing and the
//! circle itself closes polygons along the boundary.

use crate::cartesian::CartesianVector;
use crate::circle::circle_stream;
use crate::math::{EPSILON, PI, RADIANS};
use crate::stream::Stream;

use super::buffer::point_equal;

/// Boundary step used when walking the clip circle, in radians.
const INTERPOLATE_STEP: f64 = 2.0 * RADIANS;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipCircle {
    radius: f64,
    cr: f64,
    small_radius: bool,
    not_hemisphere: bool,
}

/// Line through two points intersected with the clip plane `x = cos r`,
/// parameterized so that `origin + direction * s` reaches the sphere for
/// `s = (-w ± t) / uu`.
struct Chord {
    origin: CartesianVector,
    direction: CartesianVector,
    w: f64,
    t: f64,
    uu: f64,
}

impl Chord {
    fn point(&self, sign: f64) -> (f64, f64) {
        (self.origin + self.direction * ((-self.w + sign * self.t) / self.uu)).to_spherical()
    }
}

enum Crossing {
    /// The two points are polar; the great circle through them is undefined.
    Degenerate,
    Miss,
    Hit(Chord),
}

impl ClipCircle {
    /// Clip circle of angular `radius` radians.
    pub fn new(radius: f64) -> Self {
        let cr = radius.cos();
        Self {
            radius,
            cr,
            small_radius: cr > 0.0,
            not_hemisphere: cr.abs() > EPSILON,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn visible(&self, lambda: f64, phi: f64) -> bool {
        lambda.cos() * phi.cos() > self.cr
    }

    /// First point where segment a→b meets the circle, if it does.
    pub(crate) fn intersect(&self, a: (f64, f64), b: (f64, f64)) -> Option<(f64, f64)> {
        match self.crossing(a, b) {
            Crossing::Degenerate => Some(a),
            Crossing::Miss => None,
            Crossing::Hit(chord) => Some(chord.point(-1.0)),
        }
    }

    /// Both crossings of segment a→b with the circle, when the segment passes
    /// through the circle twice between its endpoints.
    pub(crate) fn intersect_two(
        &self,
        a: (f64, f64),
        b: (f64, f64),
    ) -> Option<((f64, f64), (f64, f64))> {
        let Crossing::Hit(chord) = self.crossing(a, b) else {
            return None;
        };
        let q = chord.point(-1.0);

        let (mut lambda0, mut lambda1) = (a.0, b.0);
        let (mut phi0, mut phi1) = (a.1, b.1);
        if lambda1 < lambda0 {
            std::mem::swap(&mut lambda0, &mut lambda1);
        }
        let delta = lambda1 - lambda0;
        let polar = (delta - PI).abs() < EPSILON;
        let meridian = polar || delta < EPSILON;
        if !polar && phi1 < phi0 {
            std::mem::swap(&mut phi0, &mut phi1);
        }

        let between = if meridian {
            if polar {
                let reference = if (q.0 - lambda0).abs() < EPSILON {
                    phi0
                } else {
                    phi1
                };
                (phi0 + phi1 > 0.0) ^ (q.1 < reference)
            } else {
                phi0 <= q.1 && q.1 <= phi1
            }
        } else {
            (delta > PI) ^ (lambda0 <= q.0 && q.0 <= lambda1)
        };

        between.then(|| (q, chord.point(1.0)))
    }

    fn crossing(&self, a: (f64, f64), b: (f64, f64)) -> Crossing {
        let pa = CartesianVector::from_spherical(a.0, a.1);
        let pb = CartesianVector::from_spherical(b.0, b.1);
        let n1 = CartesianVector::new(1.0, 0.0, 0.0);
        let n2 = pa.cross(pb);
        let n2n2 = n2.dot(n2);
        let n1n2 = n2.x;
        let determinant = n2n2 - n1n2 * n1n2;

        if determinant == 0.0 {
            return Crossing::Degenerate;
        }

        let c1 = self.cr * n2n2 / determinant;
        let c2 = -self.cr * n1n2 / determinant;
        let origin = n1 * c1 + n2 * c2;
        let direction = n1.cross(n2);

        // |origin + direction * s|² = 1
        let w = origin.dot(direction);
        let uu = direction.dot(direction);
        let t2 = w * w - uu * (origin.dot(origin) - 1.0);
        if t2 < 0.0 {
            return Crossing::Miss;
        }

        Crossing::Hit(Chord {
            origin,
            direction,
            w,
            t: t2.sqrt(),
            uu,
        })
    }

    /// Outcode of a point against the square circumscribing the circle (or
    /// the complementary circle when the radius exceeds 90°).
    fn code(&self, lambda: f64, phi: f64) -> u8 {
        let r = if self.small_radius {
            self.radius
        } else {
            PI - self.radius
        };
        let mut code = 0;
        if lambda < -r {
            code |= 1;
        } else if lambda > r {
            code |= 2;
        }
        if phi < -r {
            code |= 4;
        } else if phi > r {
            code |= 8;
        }
        code
    }

    pub(crate) fn interpolate<S: Stream + ?Sized>(
        &self,
        ends: Option<((f64, f64), (f64, f64))>,
        direction: f64,
        out: &mut S,
    ) {
        let (from, to) = match ends {
            Some((from, to)) => (Some(from), Some(to)),
            None => (None, None),
        };
        circle_stream(out, self.radius, INTERPOLATE_STEP, direction, from, to);
    }

    /// Reference point for deciding whether a polygon that never crosses the
    /// boundary swallows the whole visible region.
    pub(crate) fn start(&self) -> (f64, f64) {
        if self.small_radius {
            (0.0, -self.radius)
        } else {
            (-PI, self.radius - PI)
        }
    }
}

/// Per-line state of the circle clip.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CircleLine {
    circle: ClipCircle,
    point0: Option<(f64, f64)>,
    c0: u8,
    v0: bool,
    v00: bool,
    clean: u8,
}

impl CircleLine {
    pub fn new(circle: ClipCircle) -> Self {
        Self {
            circle,
            point0: None,
            c0: 0,
            v0: false,
            v00: false,
            clean: 1,
        }
    }

    pub fn line_start<S: Stream + ?Sized>(&mut self, _out: &mut S) {
        self.v00 = false;
        self.v0 = false;
        self.clean = 1;
    }

    pub fn point<S: Stream + ?Sized>(&mut self, out: &mut S, lambda: f64, phi: f64) {
        let circle = self.circle;
        let point1 = (lambda, phi);
        let v = circle.visible(lambda, phi);
        let c = match (circle.small_radius, v) {
            (true, true) | (false, false) => 0,
            (true, false) => circle.code(lambda, phi),
            (false, true) => circle.code(lambda + if lambda < 0.0 { PI } else { -PI }, phi),
        };

        let mut point0 = self.point0;
        if point0.is_none() {
            self.v0 = v;
            self.v00 = v;
            if v {
                out.line_start();
            }
        }

        if let Some(p0) = point0 {
            if v != self.v0 {
                self.clean = 0;
                let point2 = if v {
                    // Entering. A tangent touch with no solution snaps to
                    // the visible endpoint. When the crossing lands on that
                    // endpoint, the edge point stands in for it and the
                    // duplicate check below drops the second copy.
                    out.line_start();
                    let point2 = circle.intersect(point1, p0).unwrap_or(point1);
                    out.point(point2.0, point2.1, 0.0);
                    point2
                } else {
                    // Leaving.
                    let point2 = circle.intersect(p0, point1).unwrap_or(p0);
                    out.point(point2.0, point2.1, 2.0);
                    out.line_end();
                    point2
                };
                point0 = Some(point2);
            } else if circle.not_hemisphere && (circle.small_radius ^ v) && c & self.c0 == 0 {
                // Both ends on the same side, but the segment may still dip
                // through the circle.
                if let Some((t0, t1)) = circle.intersect_two(point1, p0) {
                    self.clean = 0;
                    if circle.small_radius {
                        out.line_start();
                        out.point(t0.0, t0.1, 0.0);
                        out.point(t1.0, t1.1, 0.0);
                        out.line_end();
                    } else {
                        out.point(t1.0, t1.1, 0.0);
                        out.line_end();
                        out.line_start();
                        out.point(t0.0, t0.1, 3.0);
                    }
                }
            }
        }

        if v && point0.map_or(true, |p0| !point_equal(p0, point1)) {
            out.point(point1.0, point1.1, 0.0);
        }

        self.point0 = Some(point1);
        self.v0 = v;
        self.c0 = c;
    }

    pub fn line_end<S: Stream + ?Sized>(&mut self, out: &mut S) {
        if self.v0 {
            out.line_end();
        }
        self.point0 = None;
    }

    /// Bit 1: no crossings. Bit 2: first and last runs touch, so they join.
    pub fn clean(&self) -> u8 {
        self.clean | (u8::from(self.v00 && self.v0) << 1)
    }
}
