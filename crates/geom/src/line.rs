use crate::segment::JoinMode;
use crate::utils::{min_max, sign};
use crate::{point, Box2D, Point, Vector};

use arrayvec::ArrayVec;

/// A linear segment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct LineSegment {
    pub from: Point,
    pub to: Point,
}

impl LineSegment {
    #[inline]
    pub fn new(from: Point, to: Point) -> Self {
        LineSegment { from, to }
    }

    /// Sample the segment at t (expecting t between 0 and 1).
    #[inline]
    pub fn sample(&self, t: f64) -> Point {
        self.from.lerp(self.to, t)
    }

    #[inline]
    pub fn from(&self) -> Point {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Point {
        self.to
    }

    /// Returns an inverted version of this segment where the beginning and the end
    /// points are swapped.
    #[inline]
    pub fn flip(&self) -> Self {
        LineSegment {
            from: self.to,
            to: self.from,
        }
    }

    /// Whether both end points are the same.
    #[inline]
    pub fn is_single_point(&self) -> bool {
        self.from == self.to
    }

    /// Split this segment into two sub-segments meeting at `at`.
    ///
    /// `at` is used verbatim as the shared point, it is not projected on the segment.
    #[inline]
    pub fn split_at_point(&self, at: Point) -> (Self, Self) {
        (
            LineSegment {
                from: self.from,
                to: at,
            },
            LineSegment {
                from: at,
                to: self.to,
            },
        )
    }

    /// Return the smallest rectangle containing this segment.
    #[inline]
    pub fn bounding_box(&self) -> Box2D {
        let (min_x, max_x) = min_max(self.from.x, self.to.x);
        let (min_y, max_y) = min_max(self.from.y, self.to.y);

        Box2D {
            min: point(min_x, min_y),
            max: point(max_x, max_y),
        }
    }

    /// Returns the vector between this segment's `from` and `to` points.
    #[inline]
    pub fn to_vector(&self) -> Vector {
        self.to - self.from
    }

    /// Returns the line containing this segment.
    #[inline]
    pub fn to_line(&self) -> Line {
        Line {
            point: self.from,
            vector: self.to - self.from,
        }
    }

    /// Computes the length of this segment.
    #[inline]
    pub fn length(&self) -> f64 {
        self.to_vector().length()
    }

    /// Computes the squared length of this segment.
    #[inline]
    pub fn square_length(&self) -> f64 {
        self.to_vector().square_length()
    }

    #[inline]
    pub fn mid_point(&self) -> Point {
        point(
            (self.from.x + self.to.x) / 2.0,
            (self.from.y + self.to.y) / 2.0,
        )
    }

    /// Unit direction of the segment, or zero for a single point.
    #[inline]
    pub fn tangent(&self) -> Vector {
        let v = self.to_vector();
        let len = v.length();
        if len == 0.0 {
            return v;
        }
        v / len
    }

    /// Computes the closest point on this segment to `p`.
    #[inline]
    pub fn closest_point(&self, p: Point) -> Point {
        let v1 = self.to - self.from;
        let v2 = p - self.from;
        let sq = v1.dot(v1);
        if sq == 0.0 {
            return self.from;
        }
        let t = (v2.dot(v1) / sq).max(0.0).min(1.0);

        self.from + v1 * t
    }

    /// Computes the distance between this segment and a point.
    #[inline]
    pub fn distance_to_point(&self, p: Point) -> f64 {
        (self.closest_point(p) - p).length()
    }

    /// Intersection with an infinite line, end points included.
    pub fn line_intersection(&self, line: &Line) -> Option<Point> {
        let v1 = self.to_vector();
        let v2 = line.vector;

        let v1_cross_v2 = v1.cross(v2);

        if v1_cross_v2 == 0.0 {
            // The segment and the line are parallel.
            return None;
        }

        let sign_v1_cross_v2 = v1_cross_v2.signum();
        let abs_v1_cross_v2 = v1_cross_v2.abs();

        let v3 = line.point - self.from;
        let t = v3.cross(v2) * sign_v1_cross_v2;

        if t < 0.0 || t > abs_v1_cross_v2 {
            return None;
        }

        Some(self.sample_exact(t / abs_v1_cross_v2))
    }

    /// Intersections with another segment, end points included.
    ///
    /// Collinear overlapping segments report the end points of the overlap instead of
    /// an infinite set.
    pub fn intersections(&self, other: &Self, epsilon: f64) -> ArrayVec<Point, 4> {
        let mut result = ArrayVec::new();

        let v1 = self.to_vector();
        let v2 = other.to_vector();
        let v3 = other.from - self.from;
        let v1_cross_v2 = v1.cross(v2);

        if v1_cross_v2 == 0.0 {
            if self.to_line().distance_to_point(&other.from) > epsilon
                && other.to_line().distance_to_point(&self.from) > epsilon
            {
                return result;
            }
            for p in [other.from, other.to] {
                if self.distance_to_point(p) <= epsilon && !result.contains(&p) {
                    result.push(p);
                }
            }
            for p in [self.from, self.to] {
                if other.distance_to_point(p) <= epsilon && !result.contains(&p) {
                    result.push(p);
                }
            }
            return result;
        }

        let sign_v1_cross_v2 = v1_cross_v2.signum();
        let abs_v1_cross_v2 = v1_cross_v2.abs();

        // t and u should be divided by v1_cross_v2, but we postpone that to not lose precision.
        let t = v3.cross(v2) * sign_v1_cross_v2;
        let u = v3.cross(v1) * sign_v1_cross_v2;

        if t < 0.0 || t > abs_v1_cross_v2 || u < 0.0 || u > abs_v1_cross_v2 {
            return result;
        }

        let p = if u == 0.0 {
            other.from
        } else if u == abs_v1_cross_v2 {
            other.to
        } else {
            self.sample_exact(t / abs_v1_cross_v2)
        };
        result.push(p);

        result
    }

    /// Contribution to the winding number of a closed path containing this segment.
    ///
    /// The segment counts when `p` is inside its half-open vertical range
    /// `[min_y, max_y)`: +1 when `p` is on its left side, -1 on its right side.
    /// Summed over a closed path this gives twice the winding number around `p`.
    pub fn winding_number(&self, p: Point) -> i32 {
        let (min_y, max_y) = min_max(self.from.y, self.to.y);
        if p.y < min_y || p.y >= max_y || min_y == max_y {
            return 0;
        }

        sign(self.to_vector().cross(p - self.from))
    }

    /// Attempt to merge `other` into this segment.
    ///
    /// Both segments must be contiguous, point in the same direction and be collinear
    /// within `epsilon`.
    pub fn try_join(&self, other: &LineSegment, mode: JoinMode, epsilon: f64) -> Option<LineSegment> {
        if mode.accepts_start() && other.from == self.to {
            if other.is_single_point() {
                return Some(*self);
            }
            if self.is_single_point() {
                return Some(*other);
            }
            if let Some(joined) = Self::join_collinear(self, other, epsilon) {
                return Some(joined);
            }
        }

        if mode.accepts_end() && other.to == self.from {
            if other.is_single_point() {
                return Some(*self);
            }
            if self.is_single_point() {
                return Some(*other);
            }
            if let Some(joined) = Self::join_collinear(other, self, epsilon) {
                return Some(joined);
            }
        }

        None
    }

    // `first` ends where `second` starts.
    fn join_collinear(first: &LineSegment, second: &LineSegment, epsilon: f64) -> Option<LineSegment> {
        let first_dir = first.tangent();
        let second_dir = second.tangent();
        if first_dir.dot(second_dir) < 0.0 {
            return None;
        }

        let second_new_from = second.from - second_dir * first.length();
        let first_new_to = first.to + first_dir * second.length();
        if (first.from - second_new_from).length() < epsilon
            && (second.to - first_new_to).length() < epsilon
        {
            return Some(LineSegment {
                from: first.from,
                to: second.to,
            });
        }

        None
    }

    // Like `sample` but returns the end points verbatim at t = 0 and t = 1.
    #[inline]
    fn sample_exact(&self, t: f64) -> Point {
        if t <= 0.0 {
            self.from
        } else if t >= 1.0 {
            self.to
        } else {
            self.sample(t)
        }
    }
}

/// An infinite line defined by a point and a vector.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Line {
    pub point: Point,
    pub vector: Vector,
}

impl Line {
    #[inline]
    pub fn new(point: Point, vector: Vector) -> Self {
        Line { point, vector }
    }

    pub fn distance_to_point(&self, p: &Point) -> f64 {
        self.signed_distance_to_point(p).abs()
    }

    pub fn signed_distance_to_point(&self, p: &Point) -> f64 {
        let len = self.vector.length();
        if len == 0.0 {
            return (*p - self.point).length();
        }
        let v = *p - self.point;
        self.vector.cross(v) / len
    }

    /// The orthogonal projection of `p` on the line.
    pub fn project_point(&self, p: &Point) -> Point {
        let sq = self.vector.square_length();
        if sq == 0.0 {
            return self.point;
        }
        let t = (*p - self.point).dot(self.vector) / sq;
        self.point + self.vector * t
    }
}

#[test]
fn bounding_box() {
    let l1 = LineSegment {
        from: point(1.0, 5.0),
        to: point(5.0, 7.0),
    };
    let r1 = Box2D {
        min: point(1.0, 5.0),
        max: point(5.0, 7.0),
    };

    let l2 = LineSegment {
        from: point(5.0, 5.0),
        to: point(1.0, 1.0),
    };
    let r2 = Box2D {
        min: point(1.0, 1.0),
        max: point(5.0, 5.0),
    };

    assert_eq!(l1.bounding_box(), r1);
    assert_eq!(l2.bounding_box(), r2);
}

#[test]
fn winding_number_sides() {
    let up = LineSegment::new(point(10.0, 0.0), point(10.0, 10.0));
    assert_eq!(up.winding_number(point(5.0, 5.0)), 1);
    assert_eq!(up.winding_number(point(15.0, 5.0)), -1);
    // Half-open vertical range.
    assert_eq!(up.winding_number(point(5.0, 0.0)), 1);
    assert_eq!(up.winding_number(point(5.0, 10.0)), 0);

    let horizontal = LineSegment::new(point(0.0, 0.0), point(10.0, 0.0));
    assert_eq!(horizontal.winding_number(point(5.0, 0.0)), 0);
}

#[test]
fn collinear_join() {
    let a = LineSegment::new(point(0.0, 0.0), point(5.0, 0.0));
    let b = LineSegment::new(point(5.0, 0.0), point(10.0, 0.0));
    assert_eq!(
        a.try_join(&b, JoinMode::Start, 1e-7),
        Some(LineSegment::new(point(0.0, 0.0), point(10.0, 0.0)))
    );
    // b does not end where a starts.
    assert_eq!(a.try_join(&b, JoinMode::End, 1e-7), None);
    assert_eq!(
        b.try_join(&a, JoinMode::End, 1e-7),
        Some(LineSegment::new(point(0.0, 0.0), point(10.0, 0.0)))
    );

    let back = LineSegment::new(point(5.0, 0.0), point(2.0, 0.0));
    assert_eq!(a.try_join(&back, JoinMode::Start, 1e-7), None);

    let bent = LineSegment::new(point(5.0, 0.0), point(10.0, 1.0));
    assert_eq!(a.try_join(&bent, JoinMode::Start, 1e-7), None);
}

#[test]
fn segment_intersections() {
    let a = LineSegment::new(point(0.0, 0.0), point(10.0, 10.0));
    let b = LineSegment::new(point(0.0, 10.0), point(10.0, 0.0));
    assert_eq!(a.intersections(&b, 1e-9).as_slice(), &[point(5.0, 5.0)]);

    // Touching at an end point reports the exact end point.
    let c = LineSegment::new(point(10.0, 10.0), point(20.0, 0.0));
    assert_eq!(a.intersections(&c, 1e-9).as_slice(), &[point(10.0, 10.0)]);

    // Overlap reports the bounds of the shared range.
    let d = LineSegment::new(point(0.0, 0.0), point(10.0, 0.0));
    let e = LineSegment::new(point(5.0, 0.0), point(15.0, 0.0));
    let hits = d.intersections(&e, 1e-9);
    assert_eq!(hits.len(), 2);
    assert!(hits.contains(&point(5.0, 0.0)));
    assert!(hits.contains(&point(10.0, 0.0)));

    let parallel = LineSegment::new(point(0.0, 1.0), point(10.0, 1.0));
    assert!(d.intersections(&parallel, 1e-9).is_empty());
}

#[test]
fn line_intersection_at_midpoint() {
    let bottom = LineSegment::new(point(0.0, 0.0), point(10.0, 0.0));
    let normal = Line::new(point(5.0, 0.0), crate::vector(0.0, 1.0));
    assert_eq!(bottom.line_intersection(&normal), Some(point(5.0, 0.0)));

    let top = LineSegment::new(point(10.0, 10.0), point(0.0, 10.0));
    assert_eq!(top.line_intersection(&normal), Some(point(5.0, 10.0)));

    let right = LineSegment::new(point(10.0, 0.0), point(10.0, 10.0));
    assert_eq!(right.line_intersection(&normal), None);
}

#[test]
fn distance_to_point() {
    let l = LineSegment::new(point(0.0, 0.0), point(10.0, 0.0));
    assert_eq!(l.distance_to_point(point(5.0, 3.0)), 3.0);
    assert_eq!(l.distance_to_point(point(-4.0, 3.0)), 5.0);
    assert_eq!(l.closest_point(point(12.0, -1.0)), point(10.0, 0.0));
}
