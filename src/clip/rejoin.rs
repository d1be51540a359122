//! Stitching clipped polygon segments back into closed rings.
//!
//! Each clipped segment starts and ends on the clip edge. The endpoints go
//! into two circular lists: the "subject" list in segment order and the
//! "clip" list ordered along the clip edge. Walking alternately along
//! segments and along the edge between consecutive endpoints closes every
//! ring. Nodes live in one arena and refer to each other by index.

use crate::math::{EPSILON, HALF_PI};
use crate::stream::Stream;

use super::buffer::{point_equal, ClipPoint};
use super::PreClip;

#[derive(Debug)]
struct Intersection {
    point: ClipPoint,
    /// Segment this node starts or ends; `None` for clip-list nodes.
    segment: Option<usize>,
    other: usize,
    entry: bool,
    visited: bool,
    next: usize,
    prev: usize,
}

impl Intersection {
    fn new(point: ClipPoint, segment: Option<usize>, entry: bool) -> Self {
        Self {
            point,
            segment,
            other: 0,
            entry,
            visited: false,
            next: 0,
            prev: 0,
        }
    }
}

/// Position along the clip edge used to order the clip list.
fn edge_position(p: ClipPoint) -> f64 {
    if p.lambda < 0.0 {
        p.phi - HALF_PI - EPSILON
    } else {
        HALF_PI - p.phi
    }
}

fn link(nodes: &mut [Intersection], order: &[usize]) {
    let n = order.len();
    for (i, &id) in order.iter().enumerate() {
        nodes[id].next = order[(i + 1) % n];
        nodes[id].prev = order[(i + n - 1) % n];
    }
}

pub(crate) fn rejoin<S: Stream + ?Sized>(
    mut segments: Vec<Vec<ClipPoint>>,
    preclip: &PreClip,
    mut start_inside: bool,
    out: &mut S,
) {
    let mut nodes: Vec<Intersection> = Vec::new();
    let mut subject = Vec::new();
    let mut clip = Vec::new();

    for (index, segment) in segments.iter_mut().enumerate() {
        let n = segment.len().saturating_sub(1);
        if n == 0 {
            continue;
        }
        let p0 = segment[0];
        let mut p1 = segment[n];

        if point_equal(p0.coords(), p1.coords()) {
            if !p0.marked && !p1.marked {
                out.line_start();
                for p in &segment[..n] {
                    out.point(p.lambda, p.phi, 0.0);
                }
                out.line_end();
                continue;
            }
            // Degenerate closed run: nudge the end off the start.
            p1.lambda += 2.0 * EPSILON;
            segment[n] = p1;
        }

        for (point, entry) in [(p0, true), (p1, false)] {
            let s = nodes.len();
            let c = s + 1;
            nodes.push(Intersection::new(point, Some(index), entry));
            nodes.push(Intersection::new(point, None, !entry));
            nodes[s].other = c;
            nodes[c].other = s;
            subject.push(s);
            clip.push(c);
        }
    }

    if subject.is_empty() {
        return;
    }

    clip.sort_by(|&a, &b| {
        edge_position(nodes[a].point)
            .partial_cmp(&edge_position(nodes[b].point))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    link(&mut nodes, &subject);
    link(&mut nodes, &clip);

    for &id in &clip {
        start_inside = !start_inside;
        nodes[id].entry = start_inside;
    }

    let start = subject[0];
    loop {
        let mut current = start;
        while nodes[current].visited {
            current = nodes[current].next;
            if current == start {
                return;
            }
        }

        let mut is_subject = true;
        out.line_start();
        loop {
            let other = nodes[current].other;
            nodes[current].visited = true;
            nodes[other].visited = true;

            if nodes[current].entry {
                let next = nodes[current].next;
                if is_subject {
                    if let Some(s) = nodes[current].segment {
                        for p in &segments[s] {
                            out.point(p.lambda, p.phi, 0.0);
                        }
                    }
                } else {
                    let ends = (nodes[current].point.coords(), nodes[next].point.coords());
                    preclip.interpolate(Some(ends), 1.0, &mut *out);
                }
                current = next;
            } else {
                let prev = nodes[current].prev;
                if is_subject {
                    if let Some(s) = nodes[prev].segment {
                        for p in segments[s].iter().rev() {
                            out.point(p.lambda, p.phi, 0.0);
                        }
                    }
                } else {
                    let ends = (nodes[current].point.coords(), nodes[prev].point.coords());
                    preclip.interpolate(Some(ends), -1.0, &mut *out);
                }
                current = prev;
            }

            current = nodes[current].other;
            is_subject = !is_subject;
            if nodes[current].visited {
                break;
            }
        }
        out.line_end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::Recorder;

    fn clip_points(points: &[(f64, f64, bool)]) -> Vec<ClipPoint> {
        points
            .iter()
            .map(|&(lambda, phi, marked)| ClipPoint { lambda, phi, marked })
            .collect()
    }

    #[test]
    fn test_closed_unmarked_segment_passes_through() {
        let segment = clip_points(&[
            (0.0, 0.0, false),
            (0.1, 0.0, false),
            (0.1, 0.1, false),
            (0.0, 0.0, false),
        ]);
        let mut rec = Recorder::new();
        rejoin(vec![segment], &PreClip::Antimeridian, false, &mut rec);
        let lines = rec.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), 3);
    }

    #[test]
    fn test_open_segment_is_closed_along_edge() {
        // A run that starts and ends on the western side of the cut.
        let segment = clip_points(&[
            (-std::f64::consts::PI, 0.2, false),
            (-3.0, 0.2, false),
            (-3.0, -0.2, false),
            (-std::f64::consts::PI, -0.2, false),
        ]);
        let mut rec = Recorder::new();
        rejoin(vec![segment], &PreClip::Antimeridian, false, &mut rec);
        assert!(rec.is_balanced());
        let lines = rec.lines();
        assert_eq!(lines.len(), 1);
        // The segment plus the edge walk back to its start.
        assert!(lines[0].len() > 4);
    }

    #[test]
    fn test_empty_input_emits_nothing() {
        let mut rec = Recorder::new();
        rejoin(Vec::new(), &PreClip::Antimeridian, true, &mut rec);
        rejoin(vec![clip_points(&[(0.0, 0.0, false)])], &PreClip::Antimeridian, true, &mut rec);
        assert!(rec.events.is_empty());
    }
}
