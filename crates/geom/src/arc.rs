//! Circular arc related maths and tools.
//!
//! An [`ArcSegment`] is described by its end points, its center, its radius and a
//! direction. The center and the radius are stored as given and never recomputed from
//! the end points. An arc whose end points are equal is a full circle.

use crate::segment::JoinMode;
use crate::utils::{min_max, normalized_angle, sign, tangent, vector_angle};
use crate::{point, vector, Box2D, Point, Vector};

use arrayvec::ArrayVec;
use core::f64::consts::{FRAC_PI_2, TAU};

/// Tolerance used when comparing angles.
pub const ANGLE_EPSILON: f64 = 1e-9;

/// A circular arc going from `from` to `to` around `center`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct ArcSegment {
    pub from: Point,
    pub to: Point,
    pub center: Point,
    pub radius: f64,
    pub clockwise: bool,
}

impl ArcSegment {
    #[inline]
    pub fn new(from: Point, to: Point, center: Point, radius: f64, clockwise: bool) -> Self {
        ArcSegment {
            from,
            to,
            center,
            radius,
            clockwise,
        }
    }

    /// A full circle starting and ending at `at`.
    pub fn circle(at: Point, center: Point, clockwise: bool) -> Self {
        ArcSegment {
            from: at,
            to: at,
            center,
            radius: (at - center).length(),
            clockwise,
        }
    }

    #[inline]
    pub fn from(&self) -> Point {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Point {
        self.to
    }

    #[inline]
    pub fn is_full_circle(&self) -> bool {
        self.from == self.to
    }

    #[inline]
    pub fn is_single_point(&self) -> bool {
        self.radius == 0.0
    }

    /// Angle of `from` around the center.
    #[inline]
    pub fn start_angle(&self) -> f64 {
        vector_angle(self.from - self.center)
    }

    /// Angle of `to` around the center.
    #[inline]
    pub fn end_angle(&self) -> f64 {
        vector_angle(self.to - self.center)
    }

    /// Signed sweep angle: positive counter-clockwise, negative clockwise.
    ///
    /// A full circle sweeps a whole turn.
    pub fn sweep_angle(&self) -> f64 {
        let turn = if self.clockwise { -TAU } else { TAU };
        if self.is_full_circle() {
            return turn;
        }

        if self.clockwise {
            -normalized_angle(self.start_angle() - self.end_angle())
        } else {
            normalized_angle(self.end_angle() - self.start_angle())
        }
    }

    /// Point on the circle at the given absolute angle.
    #[inline]
    pub fn point_at_angle(&self, angle: f64) -> Point {
        self.center + vector(angle.cos(), angle.sin()) * self.radius
    }

    /// Sample the arc at t (expecting t between 0 and 1).
    pub fn sample(&self, t: f64) -> Point {
        if t <= 0.0 {
            return self.from;
        }
        if t >= 1.0 {
            return self.to;
        }
        self.point_at_angle(self.start_angle() + self.sweep_angle() * t)
    }

    #[inline]
    pub fn mid_point(&self) -> Point {
        self.point_at_angle(self.start_angle() + self.sweep_angle() / 2.0)
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.radius * self.sweep_angle().abs()
    }

    /// Unit tangent at `at`, following the direction of the arc.
    pub fn tangent(&self, at: Point) -> Vector {
        let radial = at - self.center;
        let len = radial.length();
        if len == 0.0 {
            return vector(0.0, 0.0);
        }
        let t = tangent(radial) / len;
        if self.clockwise {
            -t
        } else {
            t
        }
    }

    /// Signed curvature: positive when turning left.
    #[inline]
    pub fn curvature(&self) -> f64 {
        if self.radius == 0.0 {
            return 0.0;
        }
        if self.clockwise {
            -1.0 / self.radius
        } else {
            1.0 / self.radius
        }
    }

    /// Returns the same arc travelled in the opposite direction.
    #[inline]
    pub fn flip(&self) -> Self {
        ArcSegment {
            from: self.to,
            to: self.from,
            center: self.center,
            radius: self.radius,
            clockwise: !self.clockwise,
        }
    }

    /// Split this arc into two sub-arcs meeting at `at`.
    ///
    /// `at` is used verbatim as the shared point. Splitting a full circle yields two arcs
    /// going from the start point to `at` and back.
    pub fn split_at_point(&self, at: Point) -> (Self, Self) {
        (
            ArcSegment { to: at, ..*self },
            ArcSegment { from: at, ..*self },
        )
    }

    /// Distance travelled along the arc from `from` to the angle of `at`, as an angle in
    /// `[0, 2π)`.
    pub fn angular_offset(&self, at: Point) -> f64 {
        let angle = vector_angle(at - self.center);
        if self.clockwise {
            normalized_angle(self.start_angle() - angle)
        } else {
            normalized_angle(angle - self.start_angle())
        }
    }

    /// Whether the direction of `at` from the center lies within the arc's sweep,
    /// end points included.
    pub fn contains_angle_of(&self, at: Point) -> bool {
        if self.is_full_circle() {
            return true;
        }
        let offset = self.angular_offset(at);
        offset <= self.sweep_angle().abs() + ANGLE_EPSILON || offset >= TAU - ANGLE_EPSILON
    }

    /// Offsets of the cardinal angles `k·π/2` strictly inside the sweep, sorted, with the
    /// corresponding points on the circle.
    fn cardinal_points(&self, only_vertical: bool) -> ArrayVec<(f64, Point), 4> {
        let sweep = self.sweep_angle().abs();
        let a0 = self.start_angle();
        let mut result: ArrayVec<(f64, Point), 4> = ArrayVec::new();
        for k in 0..4 {
            if only_vertical && k % 2 == 0 {
                continue;
            }
            let angle = k as f64 * FRAC_PI_2;
            let offset = if self.clockwise {
                normalized_angle(a0 - angle)
            } else {
                normalized_angle(angle - a0)
            };
            if offset <= ANGLE_EPSILON || offset >= sweep - ANGLE_EPSILON {
                continue;
            }
            let (c, r) = (self.center, self.radius);
            let p = match k {
                0 => point(c.x + r, c.y),
                1 => point(c.x, c.y + r),
                2 => point(c.x - r, c.y),
                _ => point(c.x, c.y - r),
            };
            result.push((offset, p));
        }
        result.sort_by(|a, b| a.0.total_cmp(&b.0));

        result
    }

    /// Return the smallest rectangle containing this arc.
    pub fn bounding_box(&self) -> Box2D {
        let (min_x, max_x) = min_max(self.from.x, self.to.x);
        let (min_y, max_y) = min_max(self.from.y, self.to.y);
        let mut min = point(min_x, min_y);
        let mut max = point(max_x, max_y);
        for (_, p) in self.cardinal_points(false) {
            min = min.min(p);
            max = max.max(p);
        }

        Box2D { min, max }
    }

    /// Contribution to the winding number of a closed path containing this arc.
    ///
    /// The arc is cut at its vertical extremes into y-monotone pieces. Each piece whose
    /// half-open vertical range `[min_y, max_y)` contains `p.y` counts +1 when `p` is on
    /// its left side and -1 on its right side.
    pub fn winding_number(&self, p: Point) -> i32 {
        if self.is_single_point() {
            return 0;
        }

        let sweep = self.sweep_angle().abs();
        let mut pieces: ArrayVec<(f64, Point), 4> = ArrayVec::new();
        pieces.push((0.0, self.from));
        for cardinal in self.cardinal_points(true) {
            pieces.push(cardinal);
        }

        let mut winding = 0;
        for i in 0..pieces.len() {
            let (o0, p0) = pieces[i];
            let (o1, p1) = if i + 1 < pieces.len() {
                pieces[i + 1]
            } else {
                (sweep, self.to)
            };

            let (min_y, max_y) = min_max(p0.y, p1.y);
            if p.y < min_y || p.y >= max_y || min_y == max_y {
                continue;
            }

            let mid_angle = self.start_angle()
                + if self.clockwise {
                    -(o0 + o1) / 2.0
                } else {
                    (o0 + o1) / 2.0
                };
            let dy = p.y - self.center.y;
            let half_width = (self.radius * self.radius - dy * dy).max(0.0).sqrt();
            let x_cross = self.center.x + sign(mid_angle.cos()) as f64 * half_width;

            winding += sign(p1.y - p0.y) * sign(x_cross - p.x);
        }

        winding
    }

    /// Attempt to merge `other` into this arc.
    ///
    /// Both arcs must be contiguous, turn the same way, share their center and radius
    /// within `epsilon` and their combined sweep must not exceed a whole turn.
    pub fn try_join(&self, other: &ArcSegment, mode: JoinMode, epsilon: f64) -> Option<ArcSegment> {
        if mode.accepts_start() && other.from == self.to {
            if other.is_single_point() {
                return Some(*self);
            }
            if self.is_single_point() {
                return Some(*other);
            }
            if let Some(joined) = Self::join_concentric(self, other, epsilon) {
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
            if let Some(joined) = Self::join_concentric(other, self, epsilon) {
                return Some(joined);
            }
        }

        None
    }

    // `first` ends where `second` starts.
    fn join_concentric(first: &ArcSegment, second: &ArcSegment, epsilon: f64) -> Option<ArcSegment> {
        if first.clockwise != second.clockwise
            || (first.center - second.center).length() >= epsilon
            || (first.radius - second.radius).abs() >= epsilon
        {
            return None;
        }

        let combined = first.sweep_angle().abs() + second.sweep_angle().abs();
        if combined > TAU + ANGLE_EPSILON {
            return None;
        }

        let joined = ArcSegment {
            from: first.from,
            to: second.to,
            ..*first
        };
        // Rejects pairs whose end points do not land where the sweeps say they should.
        if (joined.sweep_angle().abs() - combined).abs() > ANGLE_EPSILON.max(epsilon / first.radius) {
            return None;
        }

        Some(joined)
    }
}

#[cfg(test)]
fn quarter(clockwise: bool) -> ArcSegment {
    if clockwise {
        ArcSegment::new(point(0.0, 10.0), point(10.0, 0.0), point(0.0, 0.0), 10.0, true)
    } else {
        ArcSegment::new(point(10.0, 0.0), point(0.0, 10.0), point(0.0, 0.0), 10.0, false)
    }
}

#[test]
fn sweep_angles() {
    assert!((quarter(false).sweep_angle() - FRAC_PI_2).abs() < 1e-12);
    assert!((quarter(true).sweep_angle() + FRAC_PI_2).abs() < 1e-12);

    // Going the long way around.
    let long = ArcSegment::new(point(10.0, 0.0), point(0.0, 10.0), point(0.0, 0.0), 10.0, true);
    assert!((long.sweep_angle() + 3.0 * FRAC_PI_2).abs() < 1e-12);

    let circle = ArcSegment::circle(point(5.0, 0.0), point(0.0, 0.0), false);
    assert_eq!(circle.sweep_angle(), TAU);
    assert!(!circle.is_single_point());
    assert!((circle.length() - TAU * 5.0).abs() < 1e-12);
}

#[test]
fn arc_bounding_box() {
    let half = ArcSegment::new(point(10.0, 0.0), point(-10.0, 0.0), point(0.0, 0.0), 10.0, false);
    let bb = half.bounding_box();
    assert_eq!(bb.min, point(-10.0, 0.0));
    assert_eq!(bb.max, point(10.0, 10.0));

    let circle = ArcSegment::circle(point(5.0, 0.0), point(0.0, 0.0), true);
    let bb = circle.bounding_box();
    assert_eq!(bb.min, point(-5.0, -5.0));
    assert_eq!(bb.max, point(5.0, 5.0));
}

#[test]
fn circle_winding() {
    let ccw = ArcSegment::circle(point(5.0, 0.0), point(0.0, 0.0), false);
    assert_eq!(ccw.winding_number(point(0.0, 0.0)), 2);
    assert_eq!(ccw.winding_number(point(1.0, -3.0)), 2);
    assert_eq!(ccw.winding_number(point(10.0, 0.0)), 0);
    assert_eq!(ccw.winding_number(point(0.0, 7.0)), 0);

    let cw = ccw.flip();
    assert_eq!(cw.winding_number(point(0.0, 0.0)), -2);
    assert_eq!(cw.winding_number(point(-6.0, 0.0)), 0);
}

#[test]
fn half_circle_winding_matches_line() {
    use crate::LineSegment;

    // Upper half disc, closed by its diameter.
    let arc = ArcSegment::new(point(10.0, 0.0), point(-10.0, 0.0), point(0.0, 0.0), 10.0, false);
    let base = LineSegment::new(point(-10.0, 0.0), point(10.0, 0.0));
    let w = |p: Point| arc.winding_number(p) + base.winding_number(p);
    assert_eq!(w(point(0.0, 5.0)), 2);
    assert_eq!(w(point(0.0, -5.0)), 0);
    assert_eq!(w(point(12.0, 5.0)), 0);
}

#[test]
fn mid_point_and_tangent() {
    let q = quarter(false);
    let m = q.mid_point();
    let s = core::f64::consts::FRAC_1_SQRT_2 * 10.0;
    assert!((m - point(s, s)).length() < 1e-12);

    let t = q.tangent(point(10.0, 0.0));
    assert!((t - vector(0.0, 1.0)).length() < 1e-12);
    let t = quarter(true).tangent(point(10.0, 0.0));
    assert!((t - vector(0.0, -1.0)).length() < 1e-12);
    assert_eq!(quarter(false).curvature(), 0.1);
    assert_eq!(quarter(true).curvature(), -0.1);
}

#[test]
fn join_arcs() {
    use core::f64::consts::PI;

    let c = point(0.0, 0.0);
    let a = ArcSegment::new(point(10.0, 0.0), point(0.0, 10.0), c, 10.0, false);
    let b = ArcSegment::new(point(0.0, 10.0), point(-10.0, 0.0), c, 10.0, false);
    let joined = a.try_join(&b, JoinMode::Start, 1e-7).unwrap();
    assert_eq!(joined.from, point(10.0, 0.0));
    assert_eq!(joined.to, point(-10.0, 0.0));
    assert!((joined.sweep_angle() - PI).abs() < 1e-12);

    // Opposite directions never join.
    assert_eq!(a.try_join(&b.flip(), JoinMode::Any, 1e-7), None);

    // Different centers.
    let other = ArcSegment::new(point(0.0, 10.0), point(-10.0, 20.0), point(0.0, 20.0), 10.0, false);
    assert_eq!(a.try_join(&other, JoinMode::Start, 1e-7), None);

    // Two halves make a full circle.
    let lower = ArcSegment::new(point(-10.0, 0.0), point(10.0, 0.0), c, 10.0, false);
    let circle = joined.try_join(&lower, JoinMode::Start, 1e-7).unwrap();
    assert!(circle.is_full_circle());

    // Nothing can be added to a full circle.
    assert_eq!(circle.try_join(&a, JoinMode::Start, 1e-7), None);
}

#[test]
fn angle_containment() {
    let q = quarter(false);
    assert!(q.contains_angle_of(point(1.0, 1.0)));
    assert!(q.contains_angle_of(point(10.0, 0.0)));
    assert!(q.contains_angle_of(point(0.0, 10.0)));
    assert!(!q.contains_angle_of(point(-1.0, 1.0)));
    assert!(!q.contains_angle_of(point(1.0, -1.0)));

    let cw = quarter(true);
    assert!(cw.contains_angle_of(point(1.0, 1.0)));
    assert!(!cw.contains_angle_of(point(-1.0, -1.0)));
}
