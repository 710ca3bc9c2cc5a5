//! The default path data structure.

use crate::builder::PathBuilder;
use crate::geom::utils::tangent;
use crate::geom::{empty_box, union_box, GeometryEngine, Line, LineSegment, PathSegment};
use crate::math::{Box2D, Point};
use crate::vertex::PathVertices;
use crate::Winding;

use std::sync::OnceLock;

use tracing::trace;

/// Fraction of the engine's epsilon under which a point is on the boundary of a path.
const COINCIDENCE_FACTOR: f64 = 1e-8;

/// How a point relates to a path or a region.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct WindingInfo {
    /// The point lies on the boundary.
    pub coincident: bool,
    /// Winding number, only meaningful when `coincident` is false.
    pub winding: i32,
}

/// An ordered sequence of contiguous segments.
///
/// Each segment starts where the previous one ends. Paths are immutable: they are either
/// produced by a [`PathBuilder`] or put together from segments that are already
/// contiguous with [`Path::from_segments`].
///
/// The bounding box and the inner point are computed lazily, the first time they are
/// requested.
#[derive(Clone, Debug, Default)]
pub struct Path {
    segments: Box<[PathSegment]>,
    bounding_box: OnceLock<Box2D>,
    // The inner point and the winding sign at that point.
    inner: OnceLock<Option<(Point, i32)>>,
}

impl Path {
    /// Creates an empty path.
    pub fn new() -> Self {
        Path::default()
    }

    /// Creates a path from segments that are already contiguous.
    ///
    /// The segments are stored as is, without snapping nor normalization.
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        debug_assert!(
            segments.windows(2).all(|pair| pair[0].to() == pair[1].from()),
            "path segments are not contiguous"
        );
        Path {
            segments: segments.into_boxed_slice(),
            bounding_box: OnceLock::new(),
            inner: OnceLock::new(),
        }
    }

    /// Creates a [`PathBuilder`] using the given engine.
    pub fn builder(engine: &dyn GeometryEngine) -> PathBuilder<'_> {
        PathBuilder::new(engine)
    }

    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn first(&self) -> Option<&PathSegment> {
        self.segments.first()
    }

    #[inline]
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// A path is closed when it is not empty and ends where it starts.
    pub fn is_closed(&self) -> bool {
        match (self.segments.first(), self.segments.last()) {
            (Some(first), Some(last)) => first.from() == last.to(),
            _ => false,
        }
    }

    /// Union of the bounding boxes of the segments.
    ///
    /// An empty path returns [`empty_box`](crate::geom::empty_box).
    pub fn bounding_box(&self) -> Box2D {
        *self.bounding_box.get_or_init(|| {
            self.segments
                .iter()
                .fold(empty_box(), |acc, segment| union_box(&acc, &segment.bounding_box()))
        })
    }

    /// Sign of the winding number of the path around `p`.
    ///
    /// Points on the boundary may report any value.
    pub fn winding_at(&self, p: Point) -> i32 {
        self.segments
            .iter()
            .map(|segment| segment.winding_number(p))
            .sum::<i32>()
            .signum()
    }

    /// A point strictly inside a closed path, as far as possible from the boundary among
    /// the probed candidates.
    ///
    /// Returns `None` for open paths and for paths that enclose no area.
    /// The result is computed once, with the engine of the first call.
    pub fn inner_point(&self, engine: &dyn GeometryEngine) -> Option<Point> {
        self.inner_point_and_winding(engine).map(|(p, _)| p)
    }

    /// Winding sign of the path measured at its inner point, zero when there is none.
    pub fn winding(&self, engine: &dyn GeometryEngine) -> i32 {
        self.inner_point_and_winding(engine)
            .map_or(0, |(_, winding)| winding)
    }

    /// The orientation of a closed path, if it encloses any area.
    pub fn orientation(&self, engine: &dyn GeometryEngine) -> Option<Winding> {
        Winding::from_sign(self.winding(engine))
    }

    fn inner_point_and_winding(&self, engine: &dyn GeometryEngine) -> Option<(Point, i32)> {
        *self.inner.get_or_init(|| self.find_inner_point(engine))
    }

    fn find_inner_point(&self, engine: &dyn GeometryEngine) -> Option<(Point, i32)> {
        if !self.is_closed() {
            return None;
        }

        let n = self.segments.len();
        let mut best: Option<(Point, i32)> = None;
        let mut best_distance = f64::MIN;

        for (i, segment) in self.segments.iter().enumerate() {
            let mid = segment.mid_point();
            let normal = Line {
                point: mid,
                vector: tangent(segment.tangent(mid)),
            };

            // Every other segment in order, this one last.
            for j in 0..n {
                let k = (i + 1 + j) % n;
                let hits = engine.line_intersections(&normal, &self.segments[k]);
                let by_distance = |a: &&Point, b: &&Point| {
                    (**a - mid)
                        .square_length()
                        .total_cmp(&(**b - mid).square_length())
                };
                let hit = if k == i {
                    hits.iter().max_by(by_distance)
                } else {
                    hits.iter().min_by(by_distance)
                };
                let Some(hit) = hit else {
                    continue;
                };

                let candidate = mid.lerp(*hit, 0.5);
                let winding = self.winding_at(candidate);
                if winding == 0 {
                    continue;
                }

                let distance = self.distance_to(candidate, engine);
                if distance > best_distance {
                    best_distance = distance;
                    best = Some((candidate, winding));
                }
            }
        }

        trace!(segments = n, found = best.is_some(), "inner point search");

        best
    }

    /// How `p` relates to this path.
    ///
    /// Points within a tiny fraction of the engine's epsilon of a segment are on the
    /// boundary. Open paths never contain any point.
    pub fn winding_info(&self, p: Point, engine: &dyn GeometryEngine) -> WindingInfo {
        let coincident = self
            .shortest_line_to(p, engine)
            .map_or(false, |line| line.length() < engine.epsilon() * COINCIDENCE_FACTOR);
        let winding = if !coincident && self.is_closed() {
            self.winding_at(p)
        } else {
            0
        };

        WindingInfo {
            coincident,
            winding,
        }
    }

    /// Whether `p` is inside the path, boundary points counting as inside when
    /// `include_coincident` is true.
    pub fn is_inner_point(
        &self,
        p: Point,
        include_coincident: bool,
        engine: &dyn GeometryEngine,
    ) -> bool {
        let info = self.winding_info(p, engine);
        if info.coincident {
            include_coincident
        } else {
            info.winding != 0
        }
    }

    /// The shortest line from `p` to any segment of the path, `None` for an empty path.
    pub fn shortest_line_to(&self, p: Point, engine: &dyn GeometryEngine) -> Option<LineSegment> {
        self.segments
            .iter()
            .map(|segment| engine.shortest_line(p, segment))
            .min_by(|a, b| a.square_length().total_cmp(&b.square_length()))
    }

    /// Distance from `p` to the boundary, infinite for an empty path.
    pub fn distance_to(&self, p: Point, engine: &dyn GeometryEngine) -> f64 {
        self.shortest_line_to(p, engine)
            .map_or(f64::INFINITY, |line| line.length())
    }

    /// Returns the same path travelled in the opposite direction.
    pub fn reversed(&self) -> Path {
        Path::from_segments(self.segments.iter().rev().map(|s| s.flip()).collect())
    }

    /// Iterates over the vertices of the path.
    pub fn vertices(&self) -> PathVertices<'_> {
        PathVertices::new(&self.segments)
    }

    /// Runs the normalization of the path builder over this path.
    pub fn reduced(&self, engine: &dyn GeometryEngine) -> Path {
        let closed = self.is_closed();
        let mut builder = PathBuilder::new(engine);
        builder.begin_path(false, true);
        builder.add_segments(self.segments.iter().copied());
        builder.end_path(closed)
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl<'l> IntoIterator for &'l Path {
    type Item = &'l PathSegment;
    type IntoIter = std::slice::Iter<'l, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[cfg(test)]
use crate::geom::{point, ArcSegment, Engine};

#[cfg(test)]
fn polygon(points: &[Point]) -> Path {
    let mut segments = Vec::new();
    for i in 0..points.len() {
        let next = points[(i + 1) % points.len()];
        segments.push(PathSegment::Line(LineSegment::new(points[i], next)));
    }
    Path::from_segments(segments)
}

#[cfg(test)]
fn square(min: f64, max: f64) -> Path {
    polygon(&[
        point(min, min),
        point(max, min),
        point(max, max),
        point(min, max),
    ])
}

#[test]
fn square_winding() {
    let path = square(0.0, 10.0);
    assert!(path.is_closed());
    assert_eq!(path.winding_at(point(5.0, 5.0)), 1);
    assert_eq!(path.winding_at(point(20.0, 20.0)), 0);
    assert_eq!(path.winding_at(point(-1.0, 5.0)), 0);

    let reversed = path.reversed();
    assert_eq!(reversed.winding_at(point(5.0, 5.0)), -1);
    assert_eq!(reversed.reversed(), path);
}

#[test]
fn square_inner_point() {
    let engine = Engine::default();
    let path = square(0.0, 10.0);
    let inner = path.inner_point(&engine).unwrap();
    assert_eq!(inner, point(5.0, 5.0));
    assert_eq!(path.winding(&engine), 1);
    assert_eq!(path.orientation(&engine), Some(Winding::Positive));
    assert_eq!(path.reversed().winding(&engine), -1);
}

#[test]
fn concave_inner_point() {
    let engine = Engine::default();
    // An L shape whose centroid lies outside.
    let path = polygon(&[
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(10.0, 2.0),
        point(2.0, 2.0),
        point(2.0, 10.0),
        point(0.0, 10.0),
    ]);
    let inner = path.inner_point(&engine).unwrap();
    assert_eq!(path.winding_at(inner), 1);
    assert!(path.distance_to(inner, &engine) > 0.5);
}

#[test]
fn circle_inner_point() {
    let engine = Engine::default();
    let circle = Path::from_segments(vec![ArcSegment::circle(
        point(5.0, 0.0),
        point(0.0, 0.0),
        false,
    )
    .into()]);
    assert!(circle.is_closed());
    let inner = circle.inner_point(&engine).unwrap();
    assert!((inner - point(0.0, 0.0)).length() < 1e-9);
    assert_eq!(circle.winding(&engine), 1);
}

#[test]
fn open_path_has_no_inside() {
    let engine = Engine::default();
    let path = Path::from_segments(vec![
        LineSegment::new(point(0.0, 0.0), point(10.0, 0.0)).into(),
        LineSegment::new(point(10.0, 0.0), point(10.0, 10.0)).into(),
    ]);
    assert!(!path.is_closed());
    assert_eq!(path.inner_point(&engine), None);
    assert_eq!(path.winding(&engine), 0);
    assert_eq!(
        path.winding_info(point(9.0, 1.0), &engine),
        WindingInfo {
            coincident: false,
            winding: 0
        }
    );
}

#[test]
fn boundary_points_are_coincident() {
    let engine = Engine::default();
    let path = square(0.0, 10.0);
    let on_edge = path.winding_info(point(5.0, 0.0), &engine);
    assert!(on_edge.coincident);
    assert!(path.is_inner_point(point(5.0, 0.0), true, &engine));
    assert!(!path.is_inner_point(point(5.0, 0.0), false, &engine));
    assert!(path.is_inner_point(point(5.0, 5.0), false, &engine));
    assert!(!path.is_inner_point(point(15.0, 5.0), true, &engine));
}

#[test]
fn bounding_box_of_mixed_path() {
    let path = Path::from_segments(vec![
        LineSegment::new(point(-10.0, 0.0), point(10.0, 0.0)).into(),
        ArcSegment::new(point(10.0, 0.0), point(-10.0, 0.0), point(0.0, 0.0), 10.0, false).into(),
    ]);
    let bb = path.bounding_box();
    assert_eq!(bb.min, point(-10.0, 0.0));
    assert_eq!(bb.max, point(10.0, 10.0));
    assert!(Path::new().bounding_box().is_empty());
}

#[test]
fn builder_and_vertices_borrow_their_source() {
    let engine = Engine::default();
    let mut builder = Path::builder(&engine);
    builder.begin_path(false, true);
    builder.add_points([point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0), point(0.0, 1.0)]);
    let path = builder.end_path(true);

    let points: Vec<Option<Point>> = path.vertices().map(|vertex| vertex.point()).collect();
    assert_eq!(
        points,
        vec![
            Some(point(0.0, 0.0)),
            Some(point(1.0, 0.0)),
            Some(point(1.0, 1.0)),
            Some(point(0.0, 1.0)),
        ]
    );
}
