//! Collects the line runs a clip line emits for one polygon ring so the clip
//! core can decide afterwards how to stitch them.

use crate::math::EPSILON;
use crate::stream::Stream;

/// A point on a clipped run. `marked` flags points created on the clip edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ClipPoint {
    pub lambda: f64,
    pub phi: f64,
    pub marked: bool,
}

impl ClipPoint {
    pub fn coords(self) -> (f64, f64) {
        (self.lambda, self.phi)
    }
}

pub(crate) fn point_equal(a: (f64, f64), b: (f64, f64)) -> bool {
    (a.0 - b.0).abs() < EPSILON && (a.1 - b.1).abs() < EPSILON
}

#[derive(Debug, Default)]
pub(crate) struct ClipBuffer {
    lines: Vec<Vec<ClipPoint>>,
}

impl ClipBuffer {
    /// Hand over everything buffered so far and start empty.
    pub fn take(&mut self) -> Vec<Vec<ClipPoint>> {
        std::mem::take(&mut self.lines)
    }
}

impl Stream for ClipBuffer {
    fn point(&mut self, lambda: f64, phi: f64, z: f64) {
        debug_assert!(!self.lines.is_empty(), "point outside of a line");
        if let Some(line) = self.lines.last_mut() {
            line.push(ClipPoint {
                lambda,
                phi,
                marked: z != 0.0,
            });
        }
    }

    fn line_start(&mut self) {
        self.lines.push(Vec::new());
    }
}
