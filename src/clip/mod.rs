//! Spherical clipping stages.
//!
//! [`Clip`] is a stream decorator sitting between the rotation and the
//! projection. Lines are cut directly. Polygon rings are buffered, cut into
//! segments that start and end on the clip edge, and stitched back together
//! along that edge once the polygon ends.
//!
//! Output never contains empty shells: a polygon or line run with no surviving
//! point produces no events at all.

pub mod antimeridian;
mod buffer;
pub mod circle;
mod contains;
mod rejoin;

use crate::math::{HALF_PI, PI};
use crate::stream::Stream;

use antimeridian::AntimeridianLine;
use buffer::{ClipBuffer, ClipPoint};
use circle::CircleLine;
pub use circle::ClipCircle;
use contains::polygon_contains;

/// Which edge geometry is cut against, in rotated coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PreClip {
    /// Cut along ±180°; nothing is hidden.
    Antimeridian,
    /// Hide everything farther than the radius from (0°, 0°).
    Circle(ClipCircle),
}

impl PreClip {
    pub fn circle(radius: f64) -> Self {
        PreClip::Circle(ClipCircle::new(radius))
    }

    pub fn point_visible(&self, lambda: f64, phi: f64) -> bool {
        match self {
            PreClip::Antimeridian => true,
            PreClip::Circle(circle) => circle.visible(lambda, phi),
        }
    }

    fn start(&self) -> (f64, f64) {
        match self {
            PreClip::Antimeridian => (-PI, -HALF_PI),
            PreClip::Circle(circle) => circle.start(),
        }
    }

    fn line(&self) -> ClipLine {
        match self {
            PreClip::Antimeridian => ClipLine::Antimeridian(AntimeridianLine::default()),
            PreClip::Circle(circle) => ClipLine::Circle(CircleLine::new(*circle)),
        }
    }

    /// Walk the clip edge between two points on it, or all the way around.
    pub(crate) fn interpolate<S: Stream + ?Sized>(
        &self,
        ends: Option<((f64, f64), (f64, f64))>,
        direction: f64,
        out: &mut S,
    ) {
        match self {
            PreClip::Antimeridian => antimeridian::interpolate(ends, direction, out),
            PreClip::Circle(circle) => circle.interpolate(ends, direction, out),
        }
    }

    /// Wrap `sink` in a clipping stage.
    pub fn clip<S: Stream>(self, sink: S) -> Clip<S> {
        Clip::new(self, sink)
    }
}

#[derive(Clone, Copy, Debug)]
enum ClipLine {
    Antimeridian(AntimeridianLine),
    Circle(CircleLine),
}

impl ClipLine {
    fn line_start<S: Stream + ?Sized>(&mut self, out: &mut S) {
        match self {
            ClipLine::Antimeridian(line) => line.line_start(out),
            ClipLine::Circle(line) => line.line_start(out),
        }
    }

    fn point<S: Stream + ?Sized>(&mut self, out: &mut S, lambda: f64, phi: f64) {
        match self {
            ClipLine::Antimeridian(line) => line.point(out, lambda, phi),
            ClipLine::Circle(line) => line.point(out, lambda, phi),
        }
    }

    fn line_end<S: Stream + ?Sized>(&mut self, out: &mut S) {
        match self {
            ClipLine::Antimeridian(line) => line.line_end(out),
            ClipLine::Circle(line) => line.line_end(out),
        }
    }

    fn clean(&self) -> u8 {
        match self {
            ClipLine::Antimeridian(line) => line.clean(),
            ClipLine::Circle(line) => line.clean(),
        }
    }
}

/// Clipping stream decorator.
#[derive(Debug)]
pub struct Clip<S> {
    preclip: PreClip,
    sink: S,
    line: ClipLine,
    ring_line: ClipLine,
    ring_buffer: ClipBuffer,
    in_line: bool,
    in_polygon: bool,
    polygon_started: bool,
    polygon: Vec<Vec<(f64, f64)>>,
    segments: Vec<Vec<ClipPoint>>,
    ring: Vec<(f64, f64)>,
}

impl<S: Stream> Clip<S> {
    pub fn new(preclip: PreClip, sink: S) -> Self {
        Self {
            preclip,
            sink,
            line: preclip.line(),
            ring_line: preclip.line(),
            ring_buffer: ClipBuffer::default(),
            in_line: false,
            in_polygon: false,
            polygon_started: false,
            polygon: Vec::new(),
            segments: Vec::new(),
            ring: Vec::new(),
        }
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    fn begin_polygon(&mut self) {
        if !self.polygon_started {
            self.sink.polygon_start();
            self.polygon_started = true;
        }
    }

    fn ring_end(&mut self) {
        if let Some(&(lambda, phi)) = self.ring.first() {
            // Close the ring through the clip line so the closing edge is cut too.
            self.ring_line.point(&mut self.ring_buffer, lambda, phi);
        }
        self.ring_line.line_end(&mut self.ring_buffer);

        let clean = self.ring_line.clean();
        let mut ring_segments = self.ring_buffer.take();
        let ring = std::mem::take(&mut self.ring);
        if ring.is_empty() {
            return;
        }
        self.polygon.push(ring);

        if ring_segments.is_empty() {
            return;
        }

        if clean & 1 != 0 {
            // Untouched by the clip edge: emit without the closing point.
            let segment = &ring_segments[0];
            let m = segment.len().saturating_sub(1);
            if m > 0 {
                self.begin_polygon();
                self.sink.line_start();
                for p in &segment[..m] {
                    self.sink.point(p.lambda, p.phi, 0.0);
                }
                self.sink.line_end();
            }
            return;
        }

        if ring_segments.len() > 1 && clean & 2 != 0 {
            // The ring started and ended inside: its first and last runs are one.
            let first = ring_segments.remove(0);
            if let Some(last) = ring_segments.last_mut() {
                last.extend(first);
            }
        }

        self.segments
            .extend(ring_segments.into_iter().filter(|segment| segment.len() > 1));
    }
}

impl<S: Stream> Stream for Clip<S> {
    fn point(&mut self, lambda: f64, phi: f64, _z: f64) {
        debug_assert!(self.in_line, "point outside a line");
        match (self.in_polygon, self.in_line) {
            (true, true) => {
                self.ring.push((lambda, phi));
                self.ring_line.point(&mut self.ring_buffer, lambda, phi);
            }
            (false, true) => self.line.point(&mut self.sink, lambda, phi),
            (true, false) => {}
            // Release builds only: pass visible stray points through.
            (false, false) => {
                if self.preclip.point_visible(lambda, phi) {
                    self.sink.point(lambda, phi, 0.0);
                }
            }
        }
    }

    fn line_start(&mut self) {
        debug_assert!(!self.in_line, "nested line_start");
        self.in_line = true;
        if self.in_polygon {
            self.ring_line.line_start(&mut self.ring_buffer);
            self.ring.clear();
        } else {
            self.line.line_start(&mut self.sink);
        }
    }

    fn line_end(&mut self) {
        debug_assert!(self.in_line, "line_end without line_start");
        self.in_line = false;
        if self.in_polygon {
            self.ring_end();
        } else {
            self.line.line_end(&mut self.sink);
        }
    }

    fn polygon_start(&mut self) {
        debug_assert!(!self.in_polygon && !self.in_line, "nested polygon_start");
        self.in_polygon = true;
        self.polygon.clear();
        self.segments.clear();
    }

    fn polygon_end(&mut self) {
        debug_assert!(self.in_polygon, "polygon_end without polygon_start");
        self.in_polygon = false;

        let segments = std::mem::take(&mut self.segments);
        let start_inside = polygon_contains(&self.polygon, self.preclip.start());

        if !segments.is_empty() {
            self.begin_polygon();
            rejoin::rejoin(segments, &self.preclip, start_inside, &mut self.sink);
        } else if start_inside {
            // The polygon wraps the whole visible region.
            self.begin_polygon();
            self.sink.line_start();
            self.preclip.interpolate(None, 1.0, &mut self.sink);
            self.sink.line_end();
        }

        if self.polygon_started {
            self.sink.polygon_end();
            self.polygon_started = false;
        }
        self.polygon.clear();
    }

    fn sphere(&mut self) {
        self.sink.polygon_start();
        self.sink.line_start();
        self.preclip.interpolate(None, 1.0, &mut self.sink);
        self.sink.line_end();
        self.sink.polygon_end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{stream_geometry, Geometry};
    use crate::math::EPSILON;
    use crate::stream::{Event, Recorder};

    /// Stream degrees in, like the rotation stage does after conversion.
    struct Radians<S>(S);

    impl<S: Stream> Stream for Radians<S> {
        fn point(&mut self, x: f64, y: f64, z: f64) {
            self.0.point(x.to_radians(), y.to_radians(), z);
        }
        fn line_start(&mut self) {
            self.0.line_start();
        }
        fn line_end(&mut self) {
            self.0.line_end();
        }
        fn polygon_start(&mut self) {
            self.0.polygon_start();
        }
        fn polygon_end(&mut self) {
            self.0.polygon_end();
        }
        fn sphere(&mut self) {
            self.0.sphere();
        }
    }

    fn clip(preclip: PreClip, geometry: &Geometry) -> Recorder {
        let mut stage = Radians(preclip.clip(Recorder::new()));
        stream_geometry(geometry, &mut stage);
        stage.0.into_inner()
    }

    fn hemisphere() -> PreClip {
        PreClip::circle(HALF_PI + EPSILON)
    }

    #[test]
    fn test_antimeridian_splits_line() {
        let line = Geometry::line_string(vec![[179.0, 0.0], [-179.0, 0.0]]);
        let rec = clip(PreClip::Antimeridian, &line);
        assert_eq!(rec.lines().len(), 2);
        assert!(rec.is_balanced());
    }

    #[test]
    fn test_polygon_crossing_antimeridian_is_rejoined() {
        let square = Geometry::polygon(vec![vec![
            [170.0, -10.0],
            [170.0, 10.0],
            [-170.0, 10.0],
            [-170.0, -10.0],
            [170.0, -10.0],
        ]]);
        let rec = clip(PreClip::Antimeridian, &square);
        assert!(rec.is_balanced());
        assert_eq!(rec.events.first(), Some(&Event::PolygonStart));
        // One piece on each side of the cut.
        let rings = rec.lines();
        assert_eq!(rings.len(), 2);
        for ring in &rings {
            let east = ring.iter().all(|p| p.0 >= 0.0);
            let west = ring.iter().all(|p| p.0 <= 0.0);
            assert!(east || west);
        }
    }

    #[test]
    fn test_clip_angle_suppresses_far_side() {
        let far = Geometry::line_string(vec![[170.0, 0.0], [175.0, 5.0]]);
        let near = Geometry::line_string(vec![[0.0, 0.0], [5.0, 5.0]]);
        assert!(clip(hemisphere(), &far).events.is_empty());
        assert_eq!(clip(hemisphere(), &near).lines().len(), 1);
    }

    #[test]
    fn test_fully_clipped_polygon_emits_nothing() {
        let far = Geometry::polygon(vec![vec![
            [170.0, -5.0],
            [170.0, 5.0],
            [-170.0, 5.0],
            [-170.0, -5.0],
            [170.0, -5.0],
        ]]);
        let rec = clip(hemisphere(), &far);
        assert!(rec.events.is_empty());
    }

    #[test]
    fn test_polygon_straddling_circle_is_closed_on_edge() {
        let square = Geometry::polygon(vec![vec![
            [80.0, -10.0],
            [80.0, 10.0],
            [100.0, 10.0],
            [100.0, -10.0],
            [80.0, -10.0],
        ]]);
        let rec = clip(hemisphere(), &square);
        assert!(rec.is_balanced());
        let rings = rec.lines();
        assert_eq!(rings.len(), 1);
        for &(lambda, phi) in &rings[0] {
            assert!(lambda.cos() * phi.cos() >= -1e-5);
        }
    }

    #[test]
    fn test_densified_ring_outside_small_circle() {
        let square = |bottom: &[[f64; 2]]| {
            let mut ring = vec![[-10.0, -50.0], [-10.0, -40.0], [10.0, -40.0], [10.0, -50.0]];
            ring.extend_from_slice(bottom);
            ring.push([-10.0, -50.0]);
            Geometry::polygon(vec![ring])
        };
        let circle = PreClip::circle(30f64.to_radians());
        let plain = clip(circle, &square(&[]));
        let dense = clip(circle, &square(&[[1e-5, -50.0], [-1e-5, -50.0]]));
        assert!(plain.events.is_empty());
        assert!(dense.events.is_empty());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "point outside a line")]
    fn test_point_outside_line_is_rejected() {
        let mut stage = hemisphere().clip(Recorder::new());
        stage.point(0.0, 0.0, 0.0);
    }

    #[test]
    fn test_sphere_is_clip_outline() {
        let rec = clip(hemisphere(), &Geometry::Sphere);
        assert!(rec.is_balanced());
        assert_eq!(rec.lines().len(), 1);
        assert!(rec.lines()[0].len() > 100);
    }

    #[test]
    fn test_polygon_containing_visible_region() {
        // Counter-clockwise, so this is the sphere minus a small far-side
        // square: the whole visible disk is filled.
        let complement = Geometry::polygon(vec![vec![
            [180.0, 0.0],
            [180.0, 10.0],
            [170.0, 10.0],
            [170.0, 0.0],
            [180.0, 0.0],
        ]]);
        let rec = clip(hemisphere(), &complement);
        assert!(rec.is_balanced());
        assert_eq!(rec.lines().len(), 1);
    }
}
