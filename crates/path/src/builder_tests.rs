use crate::builder::{BuilderState, PathBuilder};
use crate::geom::{ArcSegment, Engine, EngineOptions, LineSegment, PathSegment};
use crate::math::{point, Point};
use crate::path::Path;

use proptest::prelude::*;

fn line(from: Point, to: Point) -> PathSegment {
    PathSegment::Line(LineSegment::new(from, to))
}

fn build_points(engine: &Engine, points: &[Point], close: bool) -> Path {
    let mut builder = PathBuilder::new(engine);
    builder.begin_path(false, true);
    builder.add_points(points.iter().copied());
    builder.end_path(close)
}

fn rebuild(engine: &Engine, path: &Path, close: bool) -> Path {
    let mut builder = PathBuilder::new(engine);
    builder.begin_path(false, true);
    builder.add_segments(path.segments().iter().copied());
    builder.end_path(close)
}

#[test]
fn repeated_point_vanishes() {
    let engine = Engine::default();
    let path = build_points(&engine, &[point(0.0, 0.0), point(0.0, 0.0)], true);
    assert!(path.is_empty());
}

#[test]
fn collinear_lines_merge() {
    let engine = Engine::default();
    let mut builder = PathBuilder::new(&engine);
    builder.begin_path(false, true);
    builder.add_segment(line(point(0.0, 0.0), point(5.0, 0.0)));
    builder.add_segment(line(point(5.0, 0.0), point(10.0, 0.0)));
    let path = builder.end_path(false);

    assert_eq!(path.segments(), &[line(point(0.0, 0.0), point(10.0, 0.0))]);
}

#[test]
fn back_step_cancels() {
    let engine = Engine::default();
    let mut builder = PathBuilder::new(&engine);
    builder.begin_path(false, true);
    builder.add_segment(line(point(0.0, 0.0), point(5.0, 0.0)));
    builder.add_segment(line(point(5.0, 0.0), point(0.0, 0.0)));
    assert!(builder.end_path(false).is_empty());

    // Retracing only the tail keeps the head.
    builder.begin_path(false, true);
    builder.add_points([point(0.0, 0.0), point(0.0, 5.0), point(5.0, 5.0), point(0.0, 5.0)]);
    let path = builder.end_path(false);
    assert_eq!(path.segments(), &[line(point(0.0, 0.0), point(0.0, 5.0))]);
}

#[test]
fn closing_a_square() {
    let engine = Engine::default();
    let path = build_points(
        &engine,
        &[point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0), point(0.0, 10.0)],
        true,
    );
    assert_eq!(path.len(), 4);
    assert!(path.is_closed());
    assert_eq!(path.last().unwrap(), &line(point(0.0, 10.0), point(0.0, 0.0)));
}

#[test]
fn closing_line_joins_first_segment() {
    let engine = Engine::default();
    let path = build_points(
        &engine,
        &[
            point(5.0, 0.0),
            point(10.0, 0.0),
            point(10.0, 10.0),
            point(0.0, 10.0),
            point(0.0, 0.0),
        ],
        true,
    );
    assert_eq!(path.len(), 4);
    assert!(path.is_closed());
    assert!(path.segments().contains(&line(point(0.0, 0.0), point(10.0, 0.0))));
}

#[test]
fn two_lines_out_and_back_collapse() {
    let engine = Engine::default();
    let path = build_points(&engine, &[point(0.0, 0.0), point(3.0, 4.0)], true);
    assert!(path.is_empty());
}

#[test]
fn gaps_are_bridged() {
    let engine = Engine::default();
    let mut builder = PathBuilder::new(&engine);
    builder.begin_path(false, true);
    builder.add_segment(line(point(0.0, 0.0), point(1.0, 0.0)));
    builder.add_segment(line(point(2.0, 0.0), point(2.0, 5.0)));
    let path = builder.end_path(false);
    assert_eq!(
        path.segments(),
        &[
            line(point(0.0, 0.0), point(2.0, 0.0)),
            line(point(2.0, 0.0), point(2.0, 5.0)),
        ]
    );
}

#[test]
fn reverse_builds_backwards() {
    let engine = Engine::default();
    let mut builder = PathBuilder::new(&engine);
    builder.begin_path(true, true);
    builder.add_points([point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)]);
    let path = builder.end_path(false);
    assert_eq!(
        path.segments(),
        &[
            line(point(10.0, 10.0), point(10.0, 0.0)),
            line(point(10.0, 0.0), point(0.0, 0.0)),
        ]
    );
}

#[test]
fn raw_mode_snaps_without_merging() {
    let engine = Engine::default();
    let mut builder = PathBuilder::new(&engine);
    builder.begin_path(false, false);
    builder.add_segment(line(point(0.0000001, 0.0), point(5.0000004, 0.0)));
    builder.add_segment(line(point(5.0, 0.0), point(10.0, 0.0)));
    let path = builder.end_path(false);
    assert_eq!(
        path.segments(),
        &[
            line(point(0.0, 0.0), point(5.0, 0.0)),
            line(point(5.0, 0.0), point(10.0, 0.0)),
        ]
    );
}

#[test]
fn reduce_mode_snaps_at_the_end() {
    let engine = Engine::new(EngineOptions::precision(3));
    let path = build_points(
        &engine,
        &[point(0.0001, 0.0), point(1.0, 0.0), point(1.0004, 1.0)],
        false,
    );
    assert_eq!(
        path.segments(),
        &[
            line(point(0.0, 0.0), point(1.0, 0.0)),
            line(point(1.0, 0.0), point(1.0, 1.0)),
        ]
    );
}

#[test]
fn quarter_arcs_merge() {
    let engine = Engine::default();
    let c = point(0.0, 0.0);
    let mut builder = PathBuilder::new(&engine);
    builder.begin_path(false, true);
    builder.add_segment(ArcSegment::new(point(10.0, 0.0), point(0.0, 10.0), c, 10.0, false).into());
    builder.add_segment(ArcSegment::new(point(0.0, 10.0), point(-10.0, 0.0), c, 10.0, false).into());
    builder.add_segment(ArcSegment::new(point(-10.0, 0.0), point(10.0, 0.0), c, 10.0, false).into());
    let path = builder.end_path(true);

    assert_eq!(path.len(), 1);
    assert!(path.is_closed());
    match path.segments()[0] {
        PathSegment::Arc(arc) => assert!(arc.is_full_circle()),
        PathSegment::Line(..) => panic!("expected an arc"),
    }
    assert_eq!(path.winding_at(point(1.0, 1.0)), 1);
}

#[test]
fn degenerate_arc_becomes_a_point() {
    let engine = Engine::default();
    let mut builder = PathBuilder::new(&engine);
    builder.begin_path(false, true);
    builder.add_segment(ArcSegment::new(point(1.0, 1.0), point(1.0, 1.0), point(1.0, 1.0), 0.0, true).into());
    builder.add_point(point(4.0, 1.0));
    let path = builder.end_path(false);
    assert_eq!(path.segments(), &[line(point(1.0, 1.0), point(4.0, 1.0))]);
}

#[test]
fn arc_shorter_than_the_grid_becomes_a_point() {
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

    let mut builder = PathBuilder::new(&engine);
    builder.begin_path(false, false);
    builder.add_segment(short);
    let path = builder.end_path(false);
    assert_eq!(path.segments(), &[line(point(1.0, 0.0), point(1.0, 0.0))]);
    assert_eq!(path.segments()[0].length(), 0.0);

    for allow_reduce in [false, true] {
        builder.begin_path(false, allow_reduce);
        builder.add_segment(short);
        builder.add_point(point(3.0, 0.0));
        let path = builder.end_path(false);
        assert_eq!(path.segments(), &[line(point(1.0, 0.0), point(3.0, 0.0))]);
    }
}

#[test]
fn removed_back_step_lets_neighbours_merge() {
    let engine = Engine::default();
    let path = build_points(
        &engine,
        &[
            point(-1.0, 0.0),
            point(0.0, 0.0),
            point(0.0, 1.0),
            point(0.0, 2.0),
            point(0.0, 0.0),
            point(1.0, 0.0),
        ],
        false,
    );
    assert_eq!(path.segments(), &[line(point(-1.0, 0.0), point(1.0, 0.0))]);
    assert_eq!(rebuild(&engine, &path, false), path);
}

#[test]
fn session_states() {
    let engine = Engine::default();
    let mut builder = PathBuilder::new(&engine);
    assert_eq!(builder.state(), BuilderState::Idle);
    assert!(builder.end_path(true).is_empty());

    builder.begin_path(false, true);
    assert_eq!(builder.state(), BuilderState::Building);
    builder.add_points([point(0.0, 0.0), point(1.0, 0.0), point(1.0, 1.0)]);
    assert!(!builder.is_closed());
    builder.close_path();
    assert!(builder.is_closed());
    assert_eq!(builder.end_path(false).len(), 3);
    assert_eq!(builder.state(), BuilderState::Ended);
    assert!(builder.end_path(false).is_empty());

    // A new session starts from scratch.
    builder.begin_path(false, true);
    builder.add_points([point(5.0, 5.0), point(6.0, 5.0)]);
    builder.begin_path(false, true);
    builder.add_points([point(0.0, 0.0), point(0.0, 3.0)]);
    assert_eq!(builder.end_path(false).segments(), &[line(point(0.0, 0.0), point(0.0, 3.0))]);
}

fn grid_points() -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec((0i32..6, 0i32..6), 1..12).prop_map(|coords| {
        coords
            .into_iter()
            .map(|(x, y)| point(x as f64, y as f64))
            .collect()
    })
}

proptest! {
    #[test]
    fn normalization_is_a_fixed_point(points in grid_points(), close in any::<bool>()) {
        let engine = Engine::default();
        let path = build_points(&engine, &points, close);
        let again = rebuild(&engine, &path, close);
        prop_assert_eq!(again.segments(), path.segments());
    }

    #[test]
    fn closed_output_is_empty_or_closed(points in grid_points()) {
        let engine = Engine::default();
        let path = build_points(&engine, &points, true);
        prop_assert!(path.is_empty() || path.is_closed());
        for pair in path.segments().windows(2) {
            prop_assert_eq!(pair[0].to(), pair[1].from());
        }
        for segment in path.segments() {
            prop_assert!(!segment.is_single_point());
        }
    }
}
