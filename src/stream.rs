//! Push-based geometry stream.
//!
//! Every stage of the pipeline (rotation, clipping, resampling, the planar
//! transform) is a [`Stream`] that receives events and forwards possibly
//! filtered or subdivided events to the stream it owns. Terminal sinks
//! (path builders, bounds trackers, ring collectors) end the chain.
//!
//! Nesting contract: `line_start`/`line_end` bracket a run of `point` calls;
//! `polygon_start`/`polygon_end` bracket one or more rings. Producers that
//! break this contract are buggy; stages check it with `debug_assert!` in debug
//! builds and do a best effort in release builds. A point outside any line is
//! such a break: release builds let the clip stage pass it on when visible,
//! and path sinks drop it.

/// Receiver of geometry events.
///
/// The third coordinate of `point` is an auxiliary value: spherical stages
/// use it to mark clip-edge intersections, planar sinks ignore it.
pub trait Stream {
    fn point(&mut self, x: f64, y: f64, z: f64);

    fn line_start(&mut self) {}

    fn line_end(&mut self) {}

    fn polygon_start(&mut self) {}

    fn polygon_end(&mut self) {}

    /// The whole sphere, as produced by a `Sphere` geometry.
    fn sphere(&mut self) {}
}

impl<S: Stream + ?Sized> Stream for &mut S {
    fn point(&mut self, x: f64, y: f64, z: f64) {
        (**self).point(x, y, z);
    }

    fn line_start(&mut self) {
        (**self).line_start();
    }

    fn line_end(&mut self) {
        (**self).line_end();
    }

    fn polygon_start(&mut self) {
        (**self).polygon_start();
    }

    fn polygon_end(&mut self) {
        (**self).polygon_end();
    }

    fn sphere(&mut self) {
        (**self).sphere();
    }
}

impl<S: Stream + ?Sized> Stream for Box<S> {
    fn point(&mut self, x: f64, y: f64, z: f64) {
        (**self).point(x, y, z);
    }

    fn line_start(&mut self) {
        (**self).line_start();
    }

    fn line_end(&mut self) {
        (**self).line_end();
    }

    fn polygon_start(&mut self) {
        (**self).polygon_start();
    }

    fn polygon_end(&mut self) {
        (**self).polygon_end();
    }

    fn sphere(&mut self) {
        (**self).sphere();
    }
}

/// One recorded stream event, used by [`Recorder`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    Point(f64, f64),
    LineStart,
    LineEnd,
    PolygonStart,
    PolygonEnd,
    Sphere,
}

/// Terminal sink that records every event it receives, in order.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point runs between `line_start`/`line_end`, one `Vec` per run.
    pub fn lines(&self) -> Vec<Vec<(f64, f64)>> {
        let mut lines = Vec::new();
        let mut current: Option<Vec<(f64, f64)>> = None;
        for event in &self.events {
            match *event {
                Event::LineStart => current = Some(Vec::new()),
                Event::LineEnd => lines.extend(current.take()),
                Event::Point(x, y) => {
                    if let Some(line) = current.as_mut() {
                        line.push((x, y));
                    }
                }
                _ => {}
            }
        }
        lines
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.events.iter().filter_map(|e| match *e {
            Event::Point(x, y) => Some((x, y)),
            _ => None,
        })
    }

    /// Whether every `line_*` and `polygon_*` event is properly paired.
    pub fn is_balanced(&self) -> bool {
        let mut in_line = false;
        let mut in_polygon = false;
        for event in &self.events {
            match event {
                Event::LineStart if in_line => return false,
                Event::LineStart => in_line = true,
                Event::LineEnd if !in_line => return false,
                Event::LineEnd => in_line = false,
                Event::PolygonStart if in_polygon || in_line => return false,
                Event::PolygonStart => in_polygon = true,
                Event::PolygonEnd if !in_polygon || in_line => return false,
                Event::PolygonEnd => in_polygon = false,
                Event::Point(..) if !in_line => return false,
                _ => {}
            }
        }
        !in_line && !in_polygon
    }
}

impl Stream for Recorder {
    fn point(&mut self, x: f64, y: f64, _z: f64) {
        self.events.push(Event::Point(x, y));
    }

    fn line_start(&mut self) {
        self.events.push(Event::LineStart);
    }

    fn line_end(&mut self) {
        self.events.push(Event::LineEnd);
    }

    fn polygon_start(&mut self) {
        self.events.push(Event::PolygonStart);
    }

    fn polygon_end(&mut self) {
        self.events.push(Event::PolygonEnd);
    }

    fn sphere(&mut self) {
        self.events.push(Event::Sphere);
    }
}
