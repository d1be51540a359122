//! Adaptive resampling of projected lines.
//!
//! Projects every point and, between consecutive points of a line, inserts
//! the projection of the great-circle midpoint whenever the straight planar
//! segment would stray from the true projected curve. Subdivision recurses on
//! both halves until the segment is short, straight enough, or the depth
//! budget runs out.

use crate::cartesian::CartesianVector;
use crate::math::{asin, EPSILON, RADIANS};
use crate::stream::Stream;

use super::stages::ProjectTransform;

const MAX_DEPTH: u32 = 16;

/// Segments spanning more than 30° of arc are always split.
fn cos_min_distance() -> f64 {
    (30.0 * RADIANS).cos()
}

/// A projected point together with its position on the unit sphere.
#[derive(Clone, Copy, Debug)]
struct Sample {
    x: f64,
    y: f64,
    lambda: f64,
    v: CartesianVector,
}

#[derive(Debug)]
pub struct Resample<'a, S> {
    project: ProjectTransform<'a>,
    /// Squared tolerance in output units; zero disables subdivision.
    delta2: f64,
    sink: S,
    in_line: bool,
    in_polygon: bool,
    ring_first: Option<Sample>,
    awaiting_ring_first: bool,
    previous: Option<Sample>,
}

impl<'a, S: Stream> Resample<'a, S> {
    pub fn new(project: ProjectTransform<'a>, delta2: f64, sink: S) -> Self {
        Self {
            project,
            delta2,
            sink,
            in_line: false,
            in_polygon: false,
            ring_first: None,
            awaiting_ring_first: false,
            previous: None,
        }
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    fn line_point(&mut self, lambda: f64, phi: f64) {
        let (x, y) = self.project.apply(lambda, phi);
        let sample = Sample {
            x,
            y,
            lambda,
            v: CartesianVector::from_spherical(lambda, phi),
        };
        if self.delta2 > 0.0 {
            if let Some(previous) = self.previous {
                subdivide(&self.project, self.delta2, previous, sample, MAX_DEPTH, &mut self.sink);
            }
        }
        self.sink.point(x, y, 0.0);
        self.previous = Some(sample);
        if self.awaiting_ring_first {
            self.ring_first = Some(sample);
            self.awaiting_ring_first = false;
        }
    }
}

fn subdivide<S: Stream + ?Sized>(
    project: &ProjectTransform<'_>,
    delta2: f64,
    s0: Sample,
    s1: Sample,
    depth: u32,
    out: &mut S,
) {
    let dx = s1.x - s0.x;
    let dy = s1.y - s0.y;
    let d2 = dx * dx + dy * dy;
    // NaN-safe: a non-finite segment is never split.
    if !(d2 > 4.0 * delta2) || depth == 0 {
        return;
    }
    let depth = depth - 1;

    let sum = s0.v + s1.v;
    let m = sum.magnitude();
    let c = sum.z / m;
    let phi2 = asin(c);
    let lambda2 = if (c.abs() - 1.0).abs() < EPSILON || (s0.lambda - s1.lambda).abs() < EPSILON {
        (s0.lambda + s1.lambda) / 2.0
    } else {
        sum.y.atan2(sum.x)
    };
    let (x2, y2) = project.apply(lambda2, phi2);
    let dx2 = x2 - s0.x;
    let dy2 = y2 - s0.y;
    let dz = dy * dx2 - dx * dy2;

    let off_line = dz * dz / d2 > delta2;
    let near_end = ((dx * dx2 + dy * dy2) / d2 - 0.5).abs() > 0.3;
    let long_arc = s0.v.dot(s1.v) < cos_min_distance();

    if off_line || near_end || long_arc {
        let mid = Sample {
            x: x2,
            y: y2,
            lambda: lambda2,
            v: CartesianVector::new(sum.x / m, sum.y / m, c),
        };
        subdivide(project, delta2, s0, mid, depth, out);
        out.point(x2, y2, 0.0);
        subdivide(project, delta2, mid, s1, depth, out);
    }
}

impl<S: Stream> Stream for Resample<'_, S> {
    fn point(&mut self, lambda: f64, phi: f64, _z: f64) {
        if self.in_line {
            self.line_point(lambda, phi);
        } else {
            let (x, y) = self.project.apply(lambda, phi);
            self.sink.point(x, y, 0.0);
        }
    }

    fn line_start(&mut self) {
        self.in_line = true;
        self.previous = None;
        if self.in_polygon {
            self.ring_first = None;
            self.awaiting_ring_first = true;
        }
        self.sink.line_start();
    }

    fn line_end(&mut self) {
        if self.in_polygon && self.delta2 > 0.0 {
            // The closing edge of a ring is implicit but still curves.
            if let (Some(last), Some(first)) = (self.previous, self.ring_first) {
                subdivide(&self.project, self.delta2, last, first, MAX_DEPTH, &mut self.sink);
            }
        }
        self.in_line = false;
        self.previous = None;
        self.ring_first = None;
        self.awaiting_ring_first = false;
        self.sink.line_end();
    }

    fn polygon_start(&mut self) {
        self.in_polygon = true;
        self.sink.polygon_start();
    }

    fn polygon_end(&mut self) {
        self.in_polygon = false;
        self.sink.polygon_end();
    }

    fn sphere(&mut self) {
        self.sink.sphere();
    }
}
