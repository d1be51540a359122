//! GeoJSON-shaped geometry and its conversion into stream events.
//!
//! Coordinates are `[longitude, latitude]` in degrees. Polygon rings follow
//! GeoJSON and repeat their first coordinate at the end; the repeat is not
//! streamed, since ring closure is implied by `line_end` inside a polygon.

use serde::{Deserialize, Serialize};

use crate::stream::Stream;

pub type Position = [f64; 2];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    Sphere,
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
    pub fn line_string(coordinates: Vec<Position>) -> Self {
        Geometry::LineString { coordinates }
    }

    pub fn polygon(rings: Vec<Vec<Position>>) -> Self {
        Geometry::Polygon { coordinates: rings }
    }
}

/// Push `geometry` into `stream` as well-nested events.
pub fn stream_geometry<S: Stream + ?Sized>(geometry: &Geometry, stream: &mut S) {
    match geometry {
        Geometry::LineString { coordinates } => stream_line(coordinates, stream, false),
        Geometry::MultiLineString { coordinates } => {
            for line in coordinates {
                stream_line(line, stream, false);
            }
        }
        Geometry::Polygon { coordinates } => stream_polygon(coordinates, stream),
        Geometry::MultiPolygon { coordinates } => {
            for polygon in coordinates {
                stream_polygon(polygon, stream);
            }
        }
        Geometry::Sphere => stream.sphere(),
        Geometry::GeometryCollection { geometries } => {
            for g in geometries {
                stream_geometry(g, stream);
            }
        }
    }
}

fn stream_line<S: Stream + ?Sized>(coordinates: &[Position], stream: &mut S, closed: bool) {
    let n = if closed {
        coordinates.len().saturating_sub(1)
    } else {
        coordinates.len()
    };
    stream.line_start();
    for c in &coordinates[..n] {
        stream.point(c[0], c[1], 0.0);
    }
    stream.line_end();
}

fn stream_polygon<S: Stream + ?Sized>(rings: &[Vec<Position>], stream: &mut S) {
    stream.polygon_start();
    for ring in rings {
        stream_line(ring, stream, true);
    }
    stream.polygon_end();
}
