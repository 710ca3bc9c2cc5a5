//! Tolerance-aware geometric predicates.
//!
//! The path and region code never compares points with a tolerance by itself. Instead
//! points are snapped to a grid when they enter a path builder and every fuzzy test is
//! delegated to a [`GeometryEngine`].

use crate::arc::ArcSegment;
use crate::utils::tangent;
use crate::{Line, LineSegment, PathSegment, Point};

use arrayvec::ArrayVec;

/// The intersection points between two segments.
///
/// Two circles cross at most twice, overlapping segments report at most four end points.
pub type Intersections = ArrayVec<Point, 4>;

/// Parameters for the default geometry engine.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct EngineOptions {
    /// Number of decimal digits kept when snapping points to the grid.
    ///
    /// Default value: `EngineOptions::DEFAULT_PRECISION`.
    pub precision: i32,

    /// Whether points are snapped at all.
    ///
    /// Default value: `true`.
    pub snap_to_grid: bool,

    /// Distance under which two points are considered the same.
    ///
    /// Default value: `EngineOptions::DEFAULT_EPSILON`.
    pub epsilon: f64,
}

impl EngineOptions {
    /// Default grid precision: a micrometer grid for millimeter coordinates.
    pub const DEFAULT_PRECISION: i32 = 6;
    /// Default coincidence tolerance.
    pub const DEFAULT_EPSILON: f64 = 1e-7;

    pub const DEFAULT: Self = EngineOptions {
        precision: Self::DEFAULT_PRECISION,
        snap_to_grid: true,
        epsilon: Self::DEFAULT_EPSILON,
    };

    #[inline]
    pub fn precision(precision: i32) -> Self {
        Self::DEFAULT.with_precision(precision)
    }

    #[inline]
    pub const fn with_precision(mut self, precision: i32) -> Self {
        self.precision = precision;
        self
    }

    #[inline]
    pub const fn with_snapping(mut self, snap_to_grid: bool) -> Self {
        self.snap_to_grid = snap_to_grid;
        self
    }

    #[inline]
    pub const fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The geometric services paths and regions rely on.
pub trait GeometryEngine {
    /// Distance under which two points are considered the same.
    fn epsilon(&self) -> f64;

    /// Moves a point onto the grid.
    fn snap_to_grid(&self, p: Point) -> Point;

    /// Whether two segments cover the same points, in either direction.
    fn are_coincident(&self, a: &PathSegment, b: &PathSegment) -> bool;

    /// The shortest line going from `p` to the segment.
    fn shortest_line(&self, p: Point, segment: &PathSegment) -> LineSegment;

    /// Intersections between an infinite line and a segment.
    fn line_intersections(&self, line: &Line, segment: &PathSegment) -> Intersections;

    /// Intersections between two segments, end points included.
    fn segment_intersections(&self, a: &PathSegment, b: &PathSegment) -> Intersections;
}

/// The default geometry engine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Engine {
    options: EngineOptions,
    scale: f64,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        Engine {
            options,
            scale: 10f64.powi(options.precision),
        }
    }

    #[inline]
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    #[inline]
    fn points_coincide(&self, a: Point, b: Point) -> bool {
        (a - b).length() < self.options.epsilon
    }

    // Replaces a computed intersection by a segment end point when they are close.
    fn snap_to_ends(&self, p: Point, a: &PathSegment, b: &PathSegment) -> Point {
        for end in [a.from(), a.to(), b.from(), b.to()] {
            if self.points_coincide(p, end) {
                return end;
            }
        }
        p
    }

    fn closest_point_on_arc(&self, p: Point, arc: &ArcSegment) -> Point {
        let radial = p - arc.center;
        let len = radial.length();
        if len == 0.0 || arc.is_single_point() {
            return arc.from;
        }
        if arc.contains_angle_of(p) {
            return arc.center + radial * (arc.radius / len);
        }
        if (arc.from - p).square_length() <= (arc.to - p).square_length() {
            arc.from
        } else {
            arc.to
        }
    }

    fn arcs_coincide(&self, a: &ArcSegment, b: &ArcSegment) -> bool {
        if !self.points_coincide(a.center, b.center)
            || (a.radius - b.radius).abs() >= self.options.epsilon
        {
            return false;
        }
        if a.is_full_circle() && b.is_full_circle() {
            return true;
        }
        let same = a.clockwise == b.clockwise
            && self.points_coincide(a.from, b.from)
            && self.points_coincide(a.to, b.to);
        let opposite = a.clockwise != b.clockwise
            && self.points_coincide(a.from, b.to)
            && self.points_coincide(a.to, b.from);

        same || opposite
    }

    fn line_arc_intersections(&self, line: &LineSegment, arc: &ArcSegment) -> Intersections {
        let mut result = Intersections::new();
        let len = line.length();
        if len == 0.0 || arc.is_single_point() {
            return result;
        }
        let tolerance = self.options.epsilon / len;
        for (t, p) in line_circle_intersections(&line.to_line(), arc.center, arc.radius) {
            if t < -tolerance || t > 1.0 + tolerance || !arc.contains_angle_of(p) {
                continue;
            }
            let a = PathSegment::Line(*line);
            let b = PathSegment::Arc(*arc);
            let p = self.snap_to_ends(p, &a, &b);
            if !result.contains(&p) {
                result.push(p);
            }
        }

        result
    }

    fn arc_arc_intersections(&self, a: &ArcSegment, b: &ArcSegment) -> Intersections {
        let mut result = Intersections::new();
        if a.is_single_point() || b.is_single_point() {
            return result;
        }

        let eps = self.options.epsilon;
        let d = (b.center - a.center).length();
        if d < eps {
            if (a.radius - b.radius).abs() >= eps {
                return result;
            }
            // Same circle: the overlapping range is bounded by end points.
            for p in [a.from, a.to, b.from, b.to] {
                if a.contains_angle_of(p) && b.contains_angle_of(p) && !result.contains(&p) {
                    result.push(p);
                }
            }
            return result;
        }

        if d > a.radius + b.radius + eps || d < (a.radius - b.radius).abs() - eps {
            return result;
        }

        let dir = (b.center - a.center) / d;
        let along = (a.radius * a.radius - b.radius * b.radius + d * d) / (2.0 * d);
        let h = (a.radius * a.radius - along * along).max(0.0).sqrt();
        let base = a.center + dir * along;
        let normal = tangent(dir);

        let mut candidates: ArrayVec<Point, 2> = ArrayVec::new();
        candidates.push(base + normal * h);
        if h > eps {
            candidates.push(base - normal * h);
        }

        let sa = PathSegment::Arc(*a);
        let sb = PathSegment::Arc(*b);
        for p in candidates {
            let p = self.snap_to_ends(p, &sa, &sb);
            if a.contains_angle_of(p) && b.contains_angle_of(p) && !result.contains(&p) {
                result.push(p);
            }
        }

        result
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(EngineOptions::DEFAULT)
    }
}

impl GeometryEngine for Engine {
    #[inline]
    fn epsilon(&self) -> f64 {
        self.options.epsilon
    }

    #[inline]
    fn snap_to_grid(&self, p: Point) -> Point {
        if !self.options.snap_to_grid {
            return p;
        }
        Point::new(
            (p.x * self.scale).round() / self.scale,
            (p.y * self.scale).round() / self.scale,
        )
    }

    fn are_coincident(&self, a: &PathSegment, b: &PathSegment) -> bool {
        if a.is_single_point() && b.is_single_point() {
            return self.points_coincide(a.from(), b.from());
        }
        match (a, b) {
            (PathSegment::Line(a), PathSegment::Line(b)) => {
                (self.points_coincide(a.from, b.from) && self.points_coincide(a.to, b.to))
                    || (self.points_coincide(a.from, b.to) && self.points_coincide(a.to, b.from))
            }
            (PathSegment::Arc(a), PathSegment::Arc(b)) => self.arcs_coincide(a, b),
            _ => false,
        }
    }

    fn shortest_line(&self, p: Point, segment: &PathSegment) -> LineSegment {
        let to = match segment {
            PathSegment::Line(line) => line.closest_point(p),
            PathSegment::Arc(arc) => self.closest_point_on_arc(p, arc),
        };

        LineSegment { from: p, to }
    }

    fn line_intersections(&self, line: &Line, segment: &PathSegment) -> Intersections {
        let mut result = Intersections::new();
        match segment {
            PathSegment::Line(segment) => {
                if let Some(p) = segment.line_intersection(line) {
                    result.push(p);
                }
            }
            PathSegment::Arc(arc) => {
                if arc.is_single_point() {
                    return result;
                }
                for (_, p) in line_circle_intersections(line, arc.center, arc.radius) {
                    if arc.contains_angle_of(p) && !result.contains(&p) {
                        result.push(p);
                    }
                }
            }
        }

        result
    }

    fn segment_intersections(&self, a: &PathSegment, b: &PathSegment) -> Intersections {
        match (a, b) {
            (PathSegment::Line(a), PathSegment::Line(b)) => a.intersections(b, self.options.epsilon),
            (PathSegment::Line(line), PathSegment::Arc(arc))
            | (PathSegment::Arc(arc), PathSegment::Line(line)) => {
                self.line_arc_intersections(line, arc)
            }
            (PathSegment::Arc(a), PathSegment::Arc(b)) => self.arc_arc_intersections(a, b),
        }
    }
}

/// Intersections of an infinite line with a circle, with the line parameter of each hit.
pub fn line_circle_intersections(line: &Line, center: Point, radius: f64) -> ArrayVec<(f64, Point), 2> {
    let mut result = ArrayVec::new();
    let a = line.vector.square_length();
    if a == 0.0 {
        return result;
    }
    let offset = line.point - center;
    let b = 2.0 * line.vector.dot(offset);
    let c = offset.square_length() - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return result;
    }

    let root = discriminant.sqrt();
    let t0 = (-b - root) / (2.0 * a);
    result.push((t0, line.point + line.vector * t0));
    if root > 0.0 {
        let t1 = (-b + root) / (2.0 * a);
        result.push((t1, line.point + line.vector * t1));
    }

    result
}

#[cfg(test)]
use crate::{point, vector};

#[test]
fn grid_snapping() {
    let engine = Engine::default();
    assert_eq!(engine.snap_to_grid(point(0.1 + 0.2, 1.0000004)), point(0.3, 1.0));
    assert_eq!(engine.snap_to_grid(point(-2.5e-7, 3.0)), point(0.0, 3.0));

    let coarse = Engine::new(EngineOptions::precision(1));
    assert_eq!(coarse.snap_to_grid(point(1.26, -1.24)), point(1.3, -1.2));

    let raw = Engine::new(EngineOptions::DEFAULT.with_snapping(false));
    assert_eq!(raw.snap_to_grid(point(0.1 + 0.2, 0.0)), point(0.1 + 0.2, 0.0));
}

#[test]
fn coincidence() {
    let engine = Engine::default();
    let a: PathSegment = LineSegment::new(point(0.0, 0.0), point(5.0, 0.0)).into();
    let b: PathSegment = LineSegment::new(point(5.0, 0.0), point(0.0, 0.0)).into();
    let c: PathSegment = LineSegment::new(point(0.0, 0.0), point(5.0, 1.0)).into();
    assert!(engine.are_coincident(&a, &b));
    assert!(!engine.are_coincident(&a, &c));

    let arc = ArcSegment::new(point(10.0, 0.0), point(0.0, 10.0), point(0.0, 0.0), 10.0, false);
    let arc_seg: PathSegment = arc.into();
    let flipped: PathSegment = arc.flip().into();
    let other_way: PathSegment = ArcSegment { clockwise: true, ..arc }.into();
    assert!(engine.are_coincident(&arc_seg, &flipped));
    assert!(!engine.are_coincident(&arc_seg, &other_way));

    let chord: PathSegment = LineSegment::new(point(10.0, 0.0), point(0.0, 10.0)).into();
    assert!(!engine.are_coincident(&arc_seg, &chord));

    let c1: PathSegment = ArcSegment::circle(point(5.0, 0.0), point(0.0, 0.0), false).into();
    let c2: PathSegment = ArcSegment::circle(point(0.0, 5.0), point(0.0, 0.0), true).into();
    assert!(engine.are_coincident(&c1, &c2));
}

#[test]
fn arc_intersections() {
    let engine = Engine::default();
    let arc: PathSegment =
        ArcSegment::new(point(10.0, 0.0), point(-10.0, 0.0), point(0.0, 0.0), 10.0, false).into();

    let vertical = Line::new(point(0.0, -20.0), vector(0.0, 1.0));
    let hits = engine.line_intersections(&vertical, &arc);
    assert_eq!(hits.len(), 1);
    assert!((hits[0] - point(0.0, 10.0)).length() < 1e-12);

    let chord: PathSegment = LineSegment::new(point(-20.0, 5.0), point(20.0, 5.0)).into();
    let hits = engine.segment_intersections(&chord, &arc);
    assert_eq!(hits.len(), 2);

    let short: PathSegment = LineSegment::new(point(-1.0, 5.0), point(1.0, 5.0)).into();
    assert!(engine.segment_intersections(&short, &arc).is_empty());

    // Touching at a shared end point.
    let base: PathSegment = LineSegment::new(point(-10.0, 0.0), point(10.0, 0.0)).into();
    let hits = engine.segment_intersections(&base, &arc);
    assert_eq!(hits.len(), 2);
    assert!(hits.contains(&point(10.0, 0.0)));
    assert!(hits.contains(&point(-10.0, 0.0)));

    let other: PathSegment =
        ArcSegment::circle(point(20.0, 0.0), point(10.0, 0.0), false).into();
    let hits = engine.segment_intersections(&arc, &other);
    assert_eq!(hits.len(), 1);
    let expected = point(5.0, 75f64.sqrt());
    assert!((hits[0] - expected).length() < 1e-9);
}

#[test]
fn shortest_line_to_arc() {
    let engine = Engine::default();
    let arc: PathSegment =
        ArcSegment::new(point(10.0, 0.0), point(0.0, 10.0), point(0.0, 0.0), 10.0, false).into();
    let l = engine.shortest_line(point(20.0, 20.0), &arc);
    assert_eq!(l.from, point(20.0, 20.0));
    assert!((l.length() - (800f64.sqrt() - 10.0)).abs() < 1e-12);

    let l = engine.shortest_line(point(10.0, -5.0), &arc);
    assert_eq!(l.to, point(10.0, 0.0));
}
