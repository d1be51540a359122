//! Terminal sinks for projected geometry.

use std::fmt::Write as _;

use crate::stream::Stream;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    ClosePath,
}

/// A renderable planar path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    pub commands: Vec<PathCommand>,
}

impl Path {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of `MoveTo` commands, i.e. separately drawn runs.
    pub fn subpaths(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo(..)))
            .count()
    }

    /// SVG path data (`M x,y L x,y ... Z`).
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        for command in &self.commands {
            // Writing into a String cannot fail.
            let _ = match *command {
                PathCommand::MoveTo(x, y) => write!(out, "M{x},{y}"),
                PathCommand::LineTo(x, y) => write!(out, "L{x},{y}"),
                PathCommand::ClosePath => write!(out, "Z"),
            };
        }
        out
    }
}

/// Accumulates stream events into a [`Path`]. Rings inside a polygon are
/// closed; plain lines are left open.
#[derive(Debug, Default)]
pub struct PathSink {
    path: Path,
    in_polygon: bool,
    line_points: Option<usize>,
}

impl PathSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Path {
        self.path
    }
}

impl Stream for PathSink {
    fn point(&mut self, x: f64, y: f64, _z: f64) {
        let Some(count) = self.line_points.as_mut() else {
            tracing::trace!(x, y, "path sink ignores a point outside a line");
            return;
        };
        let command = if *count == 0 {
            PathCommand::MoveTo(x, y)
        } else {
            PathCommand::LineTo(x, y)
        };
        *count += 1;
        self.path.commands.push(command);
    }

    fn line_start(&mut self) {
        self.line_points = Some(0);
    }

    fn line_end(&mut self) {
        if self.in_polygon && self.line_points.is_some_and(|n| n > 0) {
            self.path.commands.push(PathCommand::ClosePath);
        }
        self.line_points = None;
    }

    fn polygon_start(&mut self) {
        self.in_polygon = true;
    }

    fn polygon_end(&mut self) {
        self.in_polygon = false;
    }
}

/// Tracks the planar bounding box of everything streamed into it.
#[derive(Clone, Copy, Debug)]
pub struct BoundsSink {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl Default for BoundsSink {
    fn default() -> Self {
        Self {
            x0: f64::INFINITY,
            y0: f64::INFINITY,
            x1: f64::NEG_INFINITY,
            y1: f64::NEG_INFINITY,
        }
    }
}

impl BoundsSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// `[[x_min, y_min], [x_max, y_max]]`, or `None` if nothing was seen.
    pub fn bounds(&self) -> Option<[[f64; 2]; 2]> {
        (self.x0 <= self.x1 && self.y0 <= self.y1)
            .then_some([[self.x0, self.y0], [self.x1, self.y1]])
    }
}

impl Stream for BoundsSink {
    fn point(&mut self, x: f64, y: f64, _z: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.x0 = self.x0.min(x);
        self.y0 = self.y0.min(y);
        self.x1 = self.x1.max(x);
        self.y1 = self.y1.max(y);
    }
}
