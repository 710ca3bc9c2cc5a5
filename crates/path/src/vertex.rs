//! Iteration over the vertices of a path.

use crate::geom::PathSegment;
use crate::math::Point;

/// A point of a path along with the segments meeting there.
///
/// The first vertex of an open path has no previous segment and its last vertex has no
/// next segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PathVertex<'l> {
    pub prev: Option<&'l PathSegment>,
    pub next: Option<&'l PathSegment>,
}

impl<'l> PathVertex<'l> {
    /// The shared point, `None` only if both segments are missing.
    pub fn point(&self) -> Option<Point> {
        self.prev
            .map(|segment| segment.to())
            .or_else(|| self.next.map(|segment| segment.from()))
    }
}

/// An iterator over the vertices of a path.
///
/// A closed path yields one vertex per segment, the first one joining the last segment
/// to the first. An open path yields one more vertex at its end.
#[derive(Clone)]
pub struct PathVertices<'l> {
    segments: &'l [PathSegment],
    prev: Option<&'l PathSegment>,
    index: usize,
    closed: bool,
    done: bool,
}

impl<'l> PathVertices<'l> {
    pub fn new(segments: &'l [PathSegment]) -> Self {
        let closed = match (segments.first(), segments.last()) {
            (Some(first), Some(last)) => first.from() == last.to(),
            _ => false,
        };
        PathVertices {
            segments,
            prev: if closed { segments.last() } else { None },
            index: 0,
            closed,
            done: segments.is_empty(),
        }
    }
}

impl<'l> Iterator for PathVertices<'l> {
    type Item = PathVertex<'l>;

    fn next(&mut self) -> Option<PathVertex<'l>> {
        if self.done {
            return None;
        }

        if let Some(next) = self.segments.get(self.index) {
            self.index += 1;
            let vertex = PathVertex {
                prev: self.prev,
                next: Some(next),
            };
            self.prev = Some(next);
            return Some(vertex);
        }

        self.done = true;
        if self.closed {
            return None;
        }

        Some(PathVertex {
            prev: self.prev,
            next: None,
        })
    }
}

#[cfg(test)]
use crate::geom::{point, LineSegment};

#[test]
fn closed_path_vertices() {
    let segments: Vec<PathSegment> = vec![
        LineSegment::new(point(0.0, 0.0), point(1.0, 0.0)).into(),
        LineSegment::new(point(1.0, 0.0), point(0.0, 1.0)).into(),
        LineSegment::new(point(0.0, 1.0), point(0.0, 0.0)).into(),
    ];
    let vertices: Vec<PathVertex> = PathVertices::new(&segments).collect();
    assert_eq!(vertices.len(), 3);
    assert_eq!(vertices[0].prev, Some(&segments[2]));
    assert_eq!(vertices[0].next, Some(&segments[0]));
    assert_eq!(vertices[0].point(), Some(point(0.0, 0.0)));
    assert_eq!(vertices[2].point(), Some(point(0.0, 1.0)));
}

#[test]
fn open_path_vertices() {
    let segments: Vec<PathSegment> = vec![
        LineSegment::new(point(0.0, 0.0), point(1.0, 0.0)).into(),
        LineSegment::new(point(1.0, 0.0), point(2.0, 1.0)).into(),
    ];
    let points: Vec<Point> = PathVertices::new(&segments)
        .filter_map(|v| v.point())
        .collect();
    assert_eq!(points, vec![point(0.0, 0.0), point(1.0, 0.0), point(2.0, 1.0)]);

    let last = PathVertices::new(&segments).last().unwrap();
    assert_eq!(last.next, None);
    assert!(PathVertices::new(&[]).next().is_none());
}
