//! Small-circle polygons.
//!
//! [`circle_stream`] sweeps a circle of angular radius `radius` around the
//! point (0°, 0°) and pushes the samples into a stream; the clip-circle
//! boundary uses it directly. [`CircleGenerator`] wraps it with a rotation so
//! the circle can be centered anywhere, and collects the ring as a polygon.

use crate::angle::{Angle, GeoPoint};
use crate::cartesian::CartesianVector;
use crate::geometry::{Geometry, Position};
use crate::math::{acos, DEGREES, EPSILON, TAU};
use crate::rotation::Rotation;
use crate::stream::Stream;

/// Sweep a circle of `radius` radians centered at (0, 0), stepping `delta`
/// radians, and emit each sample as a `point`.
///
/// `direction` is `1.0` (clockwise when seen from outside the sphere) or
/// `-1.0`. Without endpoints a full turn is swept; with `from`/`to` only the
/// arc between those two points (already lying on the circle) is emitted.
/// Only the magnitude of `delta` is used; a zero or non-finite `delta`
/// emits nothing.
pub fn circle_stream<S: Stream + ?Sized>(
    stream: &mut S,
    radius: f64,
    delta: f64,
    direction: f64,
    from: Option<(f64, f64)>,
    to: Option<(f64, f64)>,
) {
    let delta = delta.abs();
    if delta == 0.0 || !delta.is_finite() {
        tracing::trace!(radius, delta, "circle sweep with degenerate precision");
        return;
    }

    let (sin_radius, cos_radius) = radius.sin_cos();
    let step = direction * delta;

    let (t0, t1) = match (from, to) {
        (Some(from), Some(to)) => {
            let mut t0 = circle_position(cos_radius, from);
            let t1 = circle_position(cos_radius, to);
            if (direction > 0.0 && t0 < t1) || (direction < 0.0 && t0 > t1) {
                t0 += direction * TAU;
            }
            (t0, t1)
        }
        _ => (radius + direction * TAU, radius - step / 2.0),
    };

    let mut t = t0;
    while if direction > 0.0 { t > t1 } else { t < t1 } {
        let (lambda, phi) =
            CartesianVector::new(cos_radius, -sin_radius * t.cos(), -sin_radius * t.sin())
                .to_spherical();
        stream.point(lambda, phi, 0.0);
        t -= step;
    }
}

/// Signed angular position of `point` (radians) around the circle whose
/// plane sits at distance `cos_radius` along the x axis, in [0, τ).
fn circle_position(cos_radius: f64, (lambda, phi): (f64, f64)) -> f64 {
    let mut p = CartesianVector::from_spherical(lambda, phi);
    p.x -= cos_radius;
    let p = p.normalize();
    let radius = acos(-p.y);
    let signed = if -p.z < 0.0 { -radius } else { radius };
    (signed + TAU - EPSILON) % TAU
}

/// Builds polygons approximating circles on the sphere.
///
/// Center, radius and precision are functions of a caller-supplied datum so
/// one generator can produce a circle per feature.
pub struct CircleGenerator<D = ()> {
    center: Box<dyn Fn(&D) -> GeoPoint + Send + Sync>,
    radius: Box<dyn Fn(&D) -> Angle + Send + Sync>,
    precision: Box<dyn Fn(&D) -> Angle + Send + Sync>,
}

impl<D> std::fmt::Debug for CircleGenerator<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircleGenerator").finish_non_exhaustive()
    }
}

impl<D> Default for CircleGenerator<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> CircleGenerator<D> {
    pub const DEFAULT_RADIUS_DEG: f64 = 90.0;
    pub const DEFAULT_PRECISION_DEG: f64 = 6.0;

    /// Center (0°, 0°), radius 90°, precision 6°.
    pub fn new() -> Self {
        Self {
            center: Box::new(|_| GeoPoint::from_degrees(0.0, 0.0)),
            radius: Box::new(|_| Angle::Degrees(Self::DEFAULT_RADIUS_DEG)),
            precision: Box::new(|_| Angle::Degrees(Self::DEFAULT_PRECISION_DEG)),
        }
    }

    pub fn center(mut self, f: impl Fn(&D) -> GeoPoint + Send + Sync + 'static) -> Self {
        self.center = Box::new(f);
        self
    }

    pub fn radius(mut self, f: impl Fn(&D) -> Angle + Send + Sync + 'static) -> Self {
        self.radius = Box::new(f);
        self
    }

    pub fn precision(mut self, f: impl Fn(&D) -> Angle + Send + Sync + 'static) -> Self {
        self.precision = Box::new(f);
        self
    }

    /// Build the polygon for `datum`: a single ring of `[lon, lat]` degrees.
    ///
    /// The sweep revisits its starting angle, so the ring ends where it
    /// began. A negative precision steps by its magnitude; zero precision gives
    /// an empty ring.
    pub fn circle(&self, datum: &D) -> Geometry {
        let (lambda, phi) = (self.center)(datum).radians();
        let radius = (self.radius)(datum).rad();
        let precision = (self.precision)(datum).rad();

        let mut sink = RingCollector {
            rotation: Rotation::new(-lambda, -phi, 0.0),
            ring: Vec::new(),
        };
        circle_stream(&mut sink, radius, precision, 1.0, None, None);
        Geometry::Polygon {
            coordinates: vec![sink.ring],
        }
    }
}

impl CircleGenerator<()> {
    /// Fixed-parameter circle.
    pub fn fixed(center: GeoPoint, radius: Angle, precision: Angle) -> Geometry {
        Self::new()
            .center(move |_| center)
            .radius(move |_| radius)
            .precision(move |_| precision)
            .circle(&())
    }
}

/// Rotates circle samples back to the requested center and records degrees.
struct RingCollector {
    rotation: Rotation,
    ring: Vec<Position>,
}

impl Stream for RingCollector {
    fn point(&mut self, lambda: f64, phi: f64, _z: f64) {
        let (lambda, phi) = self.rotation.invert(lambda, phi);
        self.ring.push([lambda * DEGREES, phi * DEGREES]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ring_of(g: &Geometry) -> &Vec<Position> {
        match g {
            Geometry::Polygon { coordinates } => &coordinates[0],
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    fn angular_distance(a: Position, b: Position) -> f64 {
        let va = CartesianVector::from_spherical(a[0].to_radians(), a[1].to_radians());
        let vb = CartesianVector::from_spherical(b[0].to_radians(), b[1].to_radians());
        acos(va.dot(vb)).to_degrees()
    }

    #[test]
    fn test_zero_precision_is_empty() {
        for (center, radius) in [((0.0, 0.0), 90.0), ((40.0, -20.0), 10.0), ((0.0, 90.0), 0.0)] {
            let g = CircleGenerator::fixed(
                GeoPoint::from_degrees(center.0, center.1),
                Angle::Degrees(radius),
                Angle::Degrees(0.0),
            );
            assert!(ring_of(&g).is_empty());
        }
    }

    #[test]
    fn test_negative_precision_steps_by_magnitude() {
        let center = GeoPoint::from_degrees(0.0, 0.0);
        let forward = CircleGenerator::fixed(center, Angle::Degrees(90.0), Angle::Degrees(6.0));
        let backward = CircleGenerator::fixed(center, Angle::Degrees(90.0), Angle::Degrees(-6.0));
        assert_eq!(ring_of(&backward).len(), 61);
        assert_eq!(ring_of(&forward), ring_of(&backward));
    }

    #[test]
    fn test_sweep_ends_for_any_precision() {
        for delta in [-0.1, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut out = Collect::default();
            circle_stream(&mut out, 0.5, delta, 1.0, None, None);
            circle_stream(&mut out, 0.5, delta, -1.0, None, None);
            assert!(out.0.len() <= 2 * 64, "delta {delta} gave {} samples", out.0.len());
        }
    }

    #[test]
    fn test_hemisphere_at_origin() {
        let g = CircleGenerator::<()>::new().circle(&());
        let ring = ring_of(&g);
        // 360° / 6° samples plus the closing revisit.
        assert_eq!(ring.len(), 61);
        for p in ring {
            assert_relative_eq!(angular_distance(*p, [0.0, 0.0]), 90.0, epsilon = 1e-9);
        }
        // The sweep starts at the south pole, where longitude is arbitrary.
        let first = ring[0];
        let last = ring[ring.len() - 1];
        assert!(angular_distance(first, last) < 1e-6);
    }

    #[test]
    fn test_off_origin_center() {
        let center = [30.0, 45.0];
        let g = CircleGenerator::fixed(
            GeoPoint::from_degrees(center[0], center[1]),
            Angle::Degrees(10.0),
            Angle::Degrees(3.0),
        );
        let ring = ring_of(&g);
        assert!(ring.len() > 100);
        for p in ring {
            assert_relative_eq!(angular_distance(*p, center), 10.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_datum_driven() {
        let generator = CircleGenerator::<f64>::new()
            .radius(|r: &f64| Angle::Degrees(*r))
            .precision(|_| Angle::Degrees(10.0));
        for r in [5.0, 45.0] {
            let g = generator.circle(&r);
            for p in ring_of(&g) {
                assert_relative_eq!(angular_distance(*p, [0.0, 0.0]), r, epsilon = 1e-9);
            }
        }
    }

    #[derive(Default)]
    struct Collect(Vec<(f64, f64)>);

    impl Stream for Collect {
        fn point(&mut self, x: f64, y: f64, _z: f64) {
            self.0.push((x, y));
        }
    }

    #[test]
    fn test_bounded_arc_stays_between_endpoints() {
        // Quarter arc of the 90° circle from the north pole to the east point.
        let radius = std::f64::consts::FRAC_PI_2;
        let from = (0.0, std::f64::consts::FRAC_PI_2);
        let to = (std::f64::consts::FRAC_PI_2, 0.0);
        let mut out = Collect::default();
        circle_stream(&mut out, radius, 2.0_f64.to_radians(), 1.0, Some(from), Some(to));
        assert!(!out.0.is_empty());
        for &(lambda, phi) in &out.0 {
            let v = CartesianVector::from_spherical(lambda, phi);
            assert_relative_eq!(v.x, 0.0, epsilon = 1e-9);
        }
        // Every sample is strictly between the two endpoints on one side.
        let full = {
            let mut all = Collect::default();
            circle_stream(&mut all, radius, 2.0_f64.to_radians(), 1.0, None, None);
            all.0.len()
        };
        assert!(out.0.len() < full);
    }
}
