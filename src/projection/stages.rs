//! The fixed stream stages a [`Projection`](super::Projection) chains around
//! its clip and resample stages.

use crate::affine::Affine;
use crate::math::RADIANS;
use crate::proj::Projector;
use crate::rotation::Rotation;
use crate::stream::Stream;

/// Entry stage: degrees in, rotated radians out.
#[derive(Debug)]
pub struct RotateRadians<S> {
    rotation: Rotation,
    sink: S,
}

impl<S> RotateRadians<S> {
    pub fn new(rotation: Rotation, sink: S) -> Self {
        Self { rotation, sink }
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<S: Stream> Stream for RotateRadians<S> {
    fn point(&mut self, lon: f64, lat: f64, z: f64) {
        let (lambda, phi) = self.rotation.rotate(lon * RADIANS, lat * RADIANS);
        self.sink.point(lambda, phi, z);
    }

    fn line_start(&mut self) {
        self.sink.line_start();
    }

    fn line_end(&mut self) {
        self.sink.line_end();
    }

    fn polygon_start(&mut self) {
        self.sink.polygon_start();
    }

    fn polygon_end(&mut self) {
        self.sink.polygon_end();
    }

    fn sphere(&mut self) {
        self.sink.sphere();
    }
}

/// Raw projector followed by the planar affine.
#[derive(Clone, Copy, Debug)]
pub struct ProjectTransform<'a> {
    pub projector: &'a dyn Projector,
    pub transform: Affine,
}

impl ProjectTransform<'_> {
    pub fn apply(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let (x, y) = self.projector.project(lambda, phi);
        self.transform.forward(x, y)
    }
}

/// In-plane rotation about a fixed pivot, counter-clockwise as drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneRotation {
    cos: f64,
    sin: f64,
    pivot: (f64, f64),
}

impl PlaneRotation {
    /// `None` for a zero angle, which leaves the plane untouched.
    pub fn new(alpha: f64, pivot: (f64, f64)) -> Option<Self> {
        if alpha == 0.0 {
            return None;
        }
        let (sin, cos) = alpha.sin_cos();
        Some(Self { cos, sin, pivot })
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let (dx, dy) = (x - self.pivot.0, y - self.pivot.1);
        (
            self.pivot.0 + self.cos * dx + self.sin * dy,
            self.pivot.1 - self.sin * dx + self.cos * dy,
        )
    }

    pub fn invert(&self, x: f64, y: f64) -> (f64, f64) {
        let (u, v) = (x - self.pivot.0, y - self.pivot.1);
        (
            self.pivot.0 + self.cos * u - self.sin * v,
            self.pivot.1 + self.sin * u + self.cos * v,
        )
    }
}

/// Last stage before the caller's sink: the post-clip plane rotation.
#[derive(Debug)]
pub struct PostRotate<S> {
    rotation: Option<PlaneRotation>,
    sink: S,
}

impl<S> PostRotate<S> {
    pub fn new(rotation: Option<PlaneRotation>, sink: S) -> Self {
        Self { rotation, sink }
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<S: Stream> Stream for PostRotate<S> {
    fn point(&mut self, x: f64, y: f64, z: f64) {
        match &self.rotation {
            Some(rotation) => {
                let (x, y) = rotation.apply(x, y);
                self.sink.point(x, y, z);
            }
            None => self.sink.point(x, y, z),
        }
    }

    fn line_start(&mut self) {
        self.sink.line_start();
    }

    fn line_end(&mut self) {
        self.sink.line_end();
    }

    fn polygon_start(&mut self) {
        self.sink.polygon_start();
    }

    fn polygon_end(&mut self) {
        self.sink.polygon_end();
    }

    fn sphere(&mut self) {
        self.sink.sphere();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::Recorder;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_plane_rotation_is_none() {
        assert!(PlaneRotation::new(0.0, (1.0, 2.0)).is_none());
    }

    #[test]
    fn test_plane_rotation_quarter_turn() {
        // Counter-clockwise on screen: +x goes to -y (up).
        let r = PlaneRotation::new(std::f64::consts::FRAC_PI_2, (10.0, 10.0)).unwrap();
        let (x, y) = r.apply(11.0, 10.0);
        assert_relative_eq!(x, 10.0, epsilon = 1e-12);
        assert_relative_eq!(y, 9.0, epsilon = 1e-12);
        let (u, v) = r.invert(x, y);
        assert_relative_eq!(u, 11.0, epsilon = 1e-12);
        assert_relative_eq!(v, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotate_radians_converts_degrees() {
        let mut stage = RotateRadians::new(Rotation::Identity, Recorder::new());
        stage.line_start();
        stage.point(180.0, 90.0, 0.0);
        stage.line_end();
        let rec = stage.into_inner();
        let (lambda, phi) = rec.lines()[0][0];
        assert_relative_eq!(lambda, std::f64::consts::PI, epsilon = 1e-12);
        assert_relative_eq!(phi, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
    }
}
