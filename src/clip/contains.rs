//! Spherical point-in-polygon.
//!
//! Counts signed crossings of the meridian running south from the point, and
//! uses the polygon's winding around the south pole to decide which side the
//! pole is on. Rings are lists of (λ, φ) radians without a closing repeat.

use crate::cartesian::CartesianVector;
use crate::math::{asin, Adder, EPSILON, EPSILON2, HALF_PI, PI, QUARTER_PI, TAU};

fn longitude(lambda: f64) -> f64 {
    if lambda.abs() <= PI {
        lambda
    } else {
        lambda.signum() * ((lambda.abs() + PI) % TAU - PI)
    }
}

/// Unit vector along `v`. Unlike [`CartesianVector::normalize`] there is no
/// length cutoff: edges far shorter than ε still have a well-defined plane.
fn unit(v: CartesianVector) -> CartesianVector {
    let length = v.magnitude();
    if length == 0.0 {
        v
    } else {
        v * (1.0 / length)
    }
}

pub(crate) fn polygon_contains(polygon: &[Vec<(f64, f64)>], point: (f64, f64)) -> bool {
    let lambda = longitude(point.0);
    let mut phi = point.1;
    let sin_phi = phi.sin();
    let normal = CartesianVector::new(lambda.sin(), -lambda.cos(), 0.0);
    let mut angle = 0.0;
    let mut winding: i32 = 0;
    let mut sum = Adder::new();

    if sin_phi == 1.0 {
        phi = HALF_PI + EPSILON;
    } else if sin_phi == -1.0 {
        phi = -HALF_PI - EPSILON;
    }

    for ring in polygon {
        let Some(&last) = ring.last() else {
            continue;
        };
        let mut point0 = last;
        let mut lambda0 = longitude(point0.0);
        let (mut sin_phi0, mut cos_phi0) = (point0.1 / 2.0 + QUARTER_PI).sin_cos();

        for &point1 in ring {
            let lambda1 = longitude(point1.0);
            let (sin_phi1, cos_phi1) = (point1.1 / 2.0 + QUARTER_PI).sin_cos();
            let delta = lambda1 - lambda0;
            let sign = if delta >= 0.0 { 1.0 } else { -1.0 };
            let abs_delta = sign * delta;
            let antimeridian = abs_delta > PI;
            let k = sin_phi0 * sin_phi1;

            sum.add((k * sign * abs_delta.sin()).atan2(cos_phi0 * cos_phi1 + k * abs_delta.cos()));
            angle += if antimeridian { delta + sign * TAU } else { delta };

            // Does the edge straddle the point's meridian, below the point?
            if antimeridian ^ (lambda0 >= lambda) ^ (lambda1 >= lambda) {
                let a = CartesianVector::from_spherical(point0.0, point0.1);
                let b = CartesianVector::from_spherical(point1.0, point1.1);
                let arc = unit(a.cross(b));
                let intersection = unit(normal.cross(arc));
                let flip = antimeridian ^ (delta >= 0.0);
                let phi_arc = if flip { -1.0 } else { 1.0 } * asin(intersection.z);
                if phi > phi_arc || (phi == phi_arc && (arc.x != 0.0 || arc.y != 0.0)) {
                    winding += if flip { 1 } else { -1 };
                }
            }

            lambda0 = lambda1;
            sin_phi0 = sin_phi1;
            cos_phi0 = cos_phi1;
            point0 = point1;
        }
    }

    // The south pole is inside when the polygon winds clockwise around it,
    // or does not wind around it but has negative area. An odd crossing
    // count puts the point on the other side from the pole.
    let pole_inside = angle < -EPSILON || (angle < EPSILON && sum.value() < -EPSILON2);
    pole_inside ^ (winding & 1 != 0)
}
