use crate::engine::GeometryEngine;
use crate::{ArcSegment, Box2D, LineSegment, Point, Vector};

/// Which ends of a segment a join may happen at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum JoinMode {
    /// The other segment starts where this one ends.
    Start,
    /// The other segment ends where this one starts.
    End,
    /// Either of the above.
    Any,
}

impl JoinMode {
    #[inline]
    pub fn accepts_start(self) -> bool {
        matches!(self, JoinMode::Start | JoinMode::Any)
    }

    #[inline]
    pub fn accepts_end(self) -> bool {
        matches!(self, JoinMode::End | JoinMode::Any)
    }
}

/// One of the two kinds of segments a path is made of.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum PathSegment {
    Line(LineSegment),
    Arc(ArcSegment),
}

impl PathSegment {
    /// Start of the segment.
    #[inline]
    pub fn from(&self) -> Point {
        match self {
            PathSegment::Line(line) => line.from,
            PathSegment::Arc(arc) => arc.from,
        }
    }

    /// End of the segment.
    #[inline]
    pub fn to(&self) -> Point {
        match self {
            PathSegment::Line(line) => line.to,
            PathSegment::Arc(arc) => arc.to,
        }
    }

    #[inline]
    pub fn is_line(&self) -> bool {
        matches!(self, PathSegment::Line(..))
    }

    #[inline]
    pub fn is_arc(&self) -> bool {
        matches!(self, PathSegment::Arc(..))
    }

    pub fn length(&self) -> f64 {
        match self {
            PathSegment::Line(line) => line.length(),
            PathSegment::Arc(arc) => arc.length(),
        }
    }

    pub fn mid_point(&self) -> Point {
        match self {
            PathSegment::Line(line) => line.mid_point(),
            PathSegment::Arc(arc) => arc.mid_point(),
        }
    }

    /// Unit tangent at a point of the segment.
    pub fn tangent(&self, at: Point) -> Vector {
        match self {
            PathSegment::Line(line) => line.tangent(),
            PathSegment::Arc(arc) => arc.tangent(at),
        }
    }

    /// Signed curvature at a point of the segment, zero for lines.
    pub fn curvature(&self, _at: Point) -> f64 {
        match self {
            PathSegment::Line(..) => 0.0,
            PathSegment::Arc(arc) => arc.curvature(),
        }
    }

    pub fn is_single_point(&self) -> bool {
        match self {
            PathSegment::Line(line) => line.is_single_point(),
            PathSegment::Arc(arc) => arc.is_single_point(),
        }
    }

    /// Swap the direction of the segment.
    pub fn flip(&self) -> Self {
        match self {
            PathSegment::Line(line) => PathSegment::Line(line.flip()),
            PathSegment::Arc(arc) => PathSegment::Arc(arc.flip()),
        }
    }

    /// Split the segment into the part before and the part after `at`.
    pub fn split(&self, at: Point) -> (Self, Self) {
        match self {
            PathSegment::Line(line) => {
                let (a, b) = line.split_at_point(at);
                (PathSegment::Line(a), PathSegment::Line(b))
            }
            PathSegment::Arc(arc) => {
                let (a, b) = arc.split_at_point(at);
                (PathSegment::Arc(a), PathSegment::Arc(b))
            }
        }
    }

    /// See [`LineSegment::winding_number`] and [`ArcSegment::winding_number`].
    pub fn winding_number(&self, p: Point) -> i32 {
        match self {
            PathSegment::Line(line) => line.winding_number(p),
            PathSegment::Arc(arc) => arc.winding_number(p),
        }
    }

    /// Returns the segment with its points moved onto the engine's grid.
    ///
    /// The radius of an arc is kept as is. An arc whose end points land on the same grid
    /// point without being a full circle collapses to a single point line.
    pub fn snap_to_grid(&self, engine: &dyn GeometryEngine) -> Self {
        match self {
            PathSegment::Line(line) => PathSegment::Line(LineSegment {
                from: engine.snap_to_grid(line.from),
                to: engine.snap_to_grid(line.to),
            }),
            PathSegment::Arc(arc) => {
                let from = engine.snap_to_grid(arc.from);
                let to = engine.snap_to_grid(arc.to);
                if from == to && !arc.is_full_circle() {
                    return PathSegment::Line(LineSegment { from, to });
                }
                PathSegment::Arc(ArcSegment {
                    from,
                    to,
                    center: engine.snap_to_grid(arc.center),
                    ..*arc
                })
            }
        }
    }

    /// Attempt to merge `other` into this segment, returning the merged segment.
    ///
    /// A single point segment is absorbed by the other one whatever their kinds.
    pub fn try_join(
        &self,
        engine: &dyn GeometryEngine,
        other: &PathSegment,
        mode: JoinMode,
    ) -> Option<PathSegment> {
        let epsilon = engine.epsilon();
        match (self, other) {
            (PathSegment::Line(a), PathSegment::Line(b)) => {
                a.try_join(b, mode, epsilon).map(PathSegment::Line)
            }
            (PathSegment::Arc(a), PathSegment::Arc(b)) => {
                a.try_join(b, mode, epsilon).map(PathSegment::Arc)
            }
            _ => {
                let contiguous = (mode.accepts_start() && other.from() == self.to())
                    || (mode.accepts_end() && other.to() == self.from());
                if !contiguous {
                    return None;
                }
                if other.is_single_point() {
                    Some(*self)
                } else if self.is_single_point() {
                    Some(*other)
                } else {
                    None
                }
            }
        }
    }

    pub fn bounding_box(&self) -> Box2D {
        match self {
            PathSegment::Line(line) => line.bounding_box(),
            PathSegment::Arc(arc) => arc.bounding_box(),
        }
    }
}

impl From<LineSegment> for PathSegment {
    fn from(line: LineSegment) -> Self {
        PathSegment::Line(line)
    }
}

impl From<ArcSegment> for PathSegment {
    fn from(arc: ArcSegment) -> Self {
        PathSegment::Arc(arc)
    }
}

#[test]
fn mixed_kinds_only_join_degenerate() {
    use crate::{point, Engine};

    let engine = Engine::default();
    let line: PathSegment = LineSegment::new(point(0.0, 0.0), point(10.0, 0.0)).into();
    let arc: PathSegment = ArcSegment::new(
        point(10.0, 0.0),
        point(0.0, 10.0),
        point(0.0, 0.0),
        10.0,
        false,
    )
    .into();
    assert_eq!(line.try_join(&engine, &arc, JoinMode::Any), None);

    let degenerate_arc: PathSegment =
        ArcSegment::new(point(10.0, 0.0), point(10.0, 0.0), point(10.0, 0.0), 0.0, false).into();
    assert_eq!(
        line.try_join(&engine, &degenerate_arc, JoinMode::Start),
        Some(line)
    );
    assert_eq!(
        degenerate_arc.try_join(&engine, &line, JoinMode::End),
        Some(line)
    );
}

#[test]
fn snapping_keeps_radius() {
    use crate::{point, Engine, EngineOptions};

    let engine = Engine::new(EngineOptions::DEFAULT.with_precision(2));
    let arc: PathSegment = ArcSegment::new(
        point(10.004, 0.0),
        point(0.0, 9.996),
        point(0.001, -0.001),
        10.0004,
        false,
    )
    .into();
    match arc.snap_to_grid(&engine) {
        PathSegment::Arc(snapped) => {
            assert_eq!(snapped.from, point(10.0, 0.0));
            assert_eq!(snapped.to, point(0.0, 10.0));
            assert_eq!(snapped.center, point(0.0, 0.0));
            assert_eq!(snapped.radius, 10.0004);
        }
        PathSegment::Line(..) => panic!("snapping changed the segment kind"),
    }
}

#[test]
fn short_arc_collapses_when_snapped() {
    use crate::{point, Engine};

    let engine = Engine::default();
    let angle = 1e-7_f64;
    let short: PathSegment = ArcSegment::new(
        point(1.0, 0.0),
        point(angle.cos(), angle.sin()),
        point(0.0, 0.0),
        1.0,
        false,
    )
    .into();
    assert!(!short.is_single_point());

    let snapped = short.snap_to_grid(&engine);
    assert!(snapped.is_line());
    assert!(snapped.is_single_point());
    assert_eq!(snapped.from(), point(1.0, 0.0));
    assert_eq!(snapped.length(), 0.0);

    let circle: PathSegment = ArcSegment::circle(point(0.0, 0.0), point(1.0, 0.0), false).into();
    let snapped = circle.snap_to_grid(&engine);
    assert!(!snapped.is_line());
    assert_eq!(snapped, circle);
}
