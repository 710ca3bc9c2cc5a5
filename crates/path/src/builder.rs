//! Incremental path construction.
//!
//! A [`PathBuilder`] receives points and segments in a session delimited by
//! [`begin_path`](PathBuilder::begin_path) and [`end_path`](PathBuilder::end_path).
//!
//! While segments are added the builder keeps the working list contiguous, inserting
//! connecting lines where needed, and drops steps that exactly retrace the previous
//! one. When the session ends with reduction enabled, adjacent segments that continue
//! each other are merged and the result is snapped to the engine's grid.
//!
//! # Examples
//!
//! ```
//! # extern crate tracery_path;
//! use tracery_path::geom::{Engine, LineSegment};
//! use tracery_path::math::point;
//! use tracery_path::PathBuilder;
//!
//! let engine = Engine::default();
//! let mut builder = PathBuilder::new(&engine);
//! builder.begin_path(false, true);
//! builder.add_segment(LineSegment::new(point(0.0, 0.0), point(5.0, 0.0)).into());
//! builder.add_segment(LineSegment::new(point(5.0, 0.0), point(10.0, 0.0)).into());
//! let path = builder.end_path(false);
//!
//! assert_eq!(path.len(), 1);
//! assert_eq!(path.segments()[0].to(), point(10.0, 0.0));
//! ```

use crate::geom::{GeometryEngine, JoinMode, LineSegment, PathSegment};
use crate::math::Point;
use crate::path::Path;

use std::collections::VecDeque;

use tracing::{debug, trace};

/// Where a [`PathBuilder`] is in its session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BuilderState {
    /// No session was started yet.
    Idle,
    /// Between `begin_path` and `end_path`.
    Building,
    /// The last session ended, a new one can be started.
    Ended,
}

/// Builds normalized paths.
///
/// One builder runs one session at a time. Use separate builders to build paths
/// concurrently.
pub struct PathBuilder<'l> {
    engine: &'l dyn GeometryEngine,
    segments: VecDeque<PathSegment>,
    reverse: bool,
    allow_reduce: bool,
    state: BuilderState,
}

impl<'l> PathBuilder<'l> {
    pub fn new(engine: &'l dyn GeometryEngine) -> Self {
        PathBuilder {
            engine,
            segments: VecDeque::new(),
            reverse: false,
            allow_reduce: true,
            state: BuilderState::Idle,
        }
    }

    #[inline]
    pub fn state(&self) -> BuilderState {
        self.state
    }

    /// Starts a new session, discarding anything left from a previous one.
    ///
    /// With `reverse`, every added segment is flipped and inserted at the front so that
    /// the path is built backwards. With `allow_reduce`, [`end_path`](Self::end_path)
    /// normalizes the result, otherwise segments are snapped as they come and returned
    /// as is.
    pub fn begin_path(&mut self, reverse: bool, allow_reduce: bool) {
        self.segments.clear();
        self.reverse = reverse;
        self.allow_reduce = allow_reduce;
        self.state = BuilderState::Building;
        trace!(reverse, allow_reduce, "begin path");
    }

    /// Adds a line from the current end point to `p`.
    ///
    /// The first point of a session becomes a zero-length placeholder that the next
    /// segment replaces.
    pub fn add_point(&mut self, p: Point) {
        let from = match self.current_end() {
            Some(end) => end,
            None => p,
        };
        self.add_segment(PathSegment::Line(LineSegment { from, to: p }));
    }

    pub fn add_points<I: IntoIterator<Item = Point>>(&mut self, points: I) {
        for p in points {
            self.add_point(p);
        }
    }

    pub fn add_segment(&mut self, segment: PathSegment) {
        debug_assert_eq!(
            self.state,
            BuilderState::Building,
            "segment added outside of a begin_path/end_path session"
        );
        let snap = !self.allow_reduce;
        if self.reverse {
            add_reverse(self.engine, &mut self.segments, segment, snap);
        } else {
            add_forward(self.engine, &mut self.segments, segment, snap);
        }
    }

    pub fn add_segments<I: IntoIterator<Item = PathSegment>>(&mut self, segments: I) {
        for segment in segments {
            self.add_segment(segment);
        }
    }

    /// Whether the working list is non-empty and ends where it starts.
    pub fn is_closed(&self) -> bool {
        match (self.segments.front(), self.segments.back()) {
            (Some(first), Some(last)) => first.from() == last.to(),
            _ => false,
        }
    }

    /// Adds a line from the current end point back to the start point, if they differ.
    pub fn close_path(&mut self) {
        let (Some(first), Some(last)) = (self.segments.front(), self.segments.back()) else {
            return;
        };
        let start = first.from();
        let end = last.to();
        if start != end {
            let snap = !self.allow_reduce;
            add_forward(
                self.engine,
                &mut self.segments,
                PathSegment::Line(LineSegment {
                    from: end,
                    to: start,
                }),
                snap,
            );
        }
    }

    /// Ends the session and returns the path, optionally closing it first.
    ///
    /// Ending without a session returns an empty path.
    pub fn end_path(&mut self, close: bool) -> Path {
        if self.state != BuilderState::Building {
            debug!(state = ?self.state, "end_path called without a session");
            return Path::new();
        }
        self.state = BuilderState::Ended;

        if close && !self.is_closed() {
            self.close_path();
        }

        let mut segments: Vec<PathSegment> = self.segments.drain(..).collect();
        if !self.allow_reduce {
            return Path::from_segments(segments);
        }

        let input = segments.len();
        let mut passes = 0;
        let mut result = loop {
            passes += 1;
            let before = segments.clone();
            reduce(self.engine, &mut segments);

            let mut result = VecDeque::with_capacity(segments.len());
            for segment in segments.drain(..) {
                add_forward(self.engine, &mut result, segment, true);
            }

            // Removing a back step can make its neighbours joinable.
            if result.len() == before.len() && result.iter().eq(before.iter()) {
                break result;
            }
            segments = result.into();
        };
        trace!(passes, "normalization passes");

        let collapses = match result.len() {
            1 => result[0].is_single_point(),
            2 => self.engine.are_coincident(&result[0], &result[1]),
            _ => false,
        };
        if collapses {
            result.clear();
        }

        debug!(input, output = result.len(), "end path");

        Path::from_segments(result.into())
    }

    fn current_end(&self) -> Option<Point> {
        if self.reverse {
            self.segments.front().map(|s| s.from())
        } else {
            self.segments.back().map(|s| s.to())
        }
    }
}

fn degenerate_as_line(segment: PathSegment) -> PathSegment {
    match segment {
        PathSegment::Arc(arc) if arc.is_single_point() => PathSegment::Line(LineSegment {
            from: arc.from,
            to: arc.to,
        }),
        other => other,
    }
}

fn add_forward(
    engine: &dyn GeometryEngine,
    segments: &mut VecDeque<PathSegment>,
    segment: PathSegment,
    snap: bool,
) {
    let segment = if snap {
        segment.snap_to_grid(engine)
    } else {
        segment
    };

    if let Some(last) = segments.back().copied() {
        if last.is_single_point() {
            segments.pop_back();
        }
        if last.to() != segment.from() {
            add_forward(
                engine,
                segments,
                PathSegment::Line(LineSegment {
                    from: last.to(),
                    to: segment.from(),
                }),
                false,
            );
        }
    }

    let single_point = segment.is_single_point();
    let segment = degenerate_as_line(segment);

    let retraces = segments
        .back()
        .map_or(false, |last| {
            last.from() == segment.to() && engine.are_coincident(last, &segment)
        });
    if retraces {
        segments.pop_back();
    } else if !single_point || segments.is_empty() {
        segments.push_back(segment);
    }
}

fn add_reverse(
    engine: &dyn GeometryEngine,
    segments: &mut VecDeque<PathSegment>,
    segment: PathSegment,
    snap: bool,
) {
    let segment = if snap {
        segment.snap_to_grid(engine)
    } else {
        segment
    }
    .flip();

    if let Some(first) = segments.front().copied() {
        if first.is_single_point() {
            segments.pop_front();
        }
        if first.from() != segment.to() {
            // This line is flipped back when inserted.
            add_reverse(
                engine,
                segments,
                PathSegment::Line(LineSegment {
                    from: first.from(),
                    to: segment.to(),
                }),
                false,
            );
        }
    }

    let single_point = segment.is_single_point();
    let segment = degenerate_as_line(segment);

    let retraces = segments
        .front()
        .map_or(false, |first| {
            first.to() == segment.from() && engine.are_coincident(first, &segment)
        });
    if retraces {
        segments.pop_front();
    } else if !single_point || segments.is_empty() {
        segments.push_front(segment);
    }
}

/// Merges adjacent segments until no pair can be joined, then tries to join the last
/// segment with the first one.
fn reduce(engine: &dyn GeometryEngine, segments: &mut Vec<PathSegment>) {
    let mut joins = 0;
    let mut i = 0;
    while i + 1 < segments.len() {
        if let Some(joined) = segments[i].try_join(engine, &segments[i + 1], JoinMode::Start) {
            segments[i] = joined;
            segments.remove(i + 1);
            joins += 1;
        } else {
            i += 1;
        }
    }

    if segments.len() > 1 {
        let last = segments.len() - 1;
        if let Some(joined) = segments[last].try_join(engine, &segments[0], JoinMode::Start) {
            segments.remove(0);
            segments.pop();
            segments.push(joined);
            joins += 1;
        }
    }

    trace!(joins, remaining = segments.len(), "reduce");
}
