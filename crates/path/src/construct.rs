//! Shorthands to build paths and regions in one call.

use crate::builder::PathBuilder;
use crate::geom::{GeometryEngine, PathSegment};
use crate::math::Point;
use crate::path::Path;
use crate::region::{Region, RegionBuilder};

/// Builds a normalized path through `points`.
pub fn create_path<I>(engine: &dyn GeometryEngine, close: bool, points: I) -> Path
where
    I: IntoIterator<Item = Point>,
{
    let mut builder = PathBuilder::new(engine);
    builder.begin_path(false, true);
    builder.add_points(points);
    builder.end_path(close)
}

/// Builds a normalized path from `segments`.
pub fn create_path_from_segments<I>(engine: &dyn GeometryEngine, close: bool, segments: I) -> Path
where
    I: IntoIterator<Item = PathSegment>,
{
    let mut builder = PathBuilder::new(engine);
    builder.begin_path(false, true);
    builder.add_segments(segments);
    builder.end_path(close)
}

/// A region made of the single path going through `points`.
pub fn create_region<I>(engine: &dyn GeometryEngine, close: bool, points: I) -> Region
where
    I: IntoIterator<Item = Point>,
{
    create_region_from_paths([create_path(engine, close, points)])
}

/// A region made of the single path built from `segments`.
pub fn create_region_from_segments<I>(engine: &dyn GeometryEngine, close: bool, segments: I) -> Region
where
    I: IntoIterator<Item = PathSegment>,
{
    create_region_from_paths([create_path_from_segments(engine, close, segments)])
}

pub fn create_region_from_paths<I>(paths: I) -> Region
where
    I: IntoIterator<Item = Path>,
{
    let mut builder = RegionBuilder::new();
    builder.begin_region();
    builder.add_paths(paths);
    builder.end_region()
}

/// A region of zero area that follows the outline of the given paths.
///
/// Each path is added along with its reverse so the windings cancel out everywhere.
/// Closed paths are first cut at the middle of their longest segment into two open
/// halves.
pub fn create_slice_region<'a, I>(engine: &dyn GeometryEngine, paths: I) -> Region
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut region = RegionBuilder::new();
    let mut builder = PathBuilder::new(engine);
    region.begin_region();

    for path in paths {
        if !path.is_closed() {
            region.add_path(path.clone());
            region.add_path(path.reversed());
            continue;
        }

        let segments = path.segments();
        let mut longest = 0;
        for (i, segment) in segments.iter().enumerate() {
            if segment.length() > segments[longest].length() {
                longest = i;
            }
        }
        let cut = segments[longest];
        let (before, after) = cut.split(cut.mid_point());

        builder.begin_path(false, false);
        builder.add_segments(segments[..longest].iter().copied());
        builder.add_segment(before);
        let first_half = builder.end_path(false);

        builder.begin_path(false, false);
        builder.add_segment(after);
        builder.add_segments(segments[longest + 1..].iter().copied());
        let second_half = builder.end_path(false);

        let first_reversed = first_half.reversed();
        let second_reversed = second_half.reversed();
        region.add_paths([first_half, second_half, first_reversed, second_reversed]);
    }

    region.end_region()
}

#[cfg(test)]
use crate::geom::{point, Engine};

#[test]
fn region_from_points() {
    let engine = Engine::default();
    let region = create_region(
        &engine,
        true,
        [point(0.0, 0.0), point(4.0, 0.0), point(4.0, 4.0), point(0.0, 4.0)],
    );
    assert_eq!(region.len(), 1);
    assert!(region.paths()[0].is_closed());
    assert!(region.is_inner_point(point(2.0, 2.0), false, &engine));
}

#[test]
fn slice_of_closed_path() {
    let engine = Engine::default();
    let rect = create_path(
        &engine,
        true,
        [point(0.0, 0.0), point(10.0, 0.0), point(10.0, 2.0), point(0.0, 2.0)],
    );
    let slice = create_slice_region(&engine, [&rect]);
    assert_eq!(slice.len(), 4);

    // Cut in the middle of the bottom edge.
    let first = &slice.paths()[0];
    let second = &slice.paths()[1];
    assert!(!first.is_closed());
    assert_eq!(first.segments()[0].from(), point(0.0, 0.0));
    assert_eq!(first.last().unwrap().to(), point(5.0, 0.0));
    assert_eq!(second.first().unwrap().from(), point(5.0, 0.0));
    assert_eq!(second.last().unwrap().to(), point(0.0, 0.0));

    // Zero area: nothing is inside.
    assert!(!slice.is_inner_point(point(5.0, 1.0), false, &engine));
    assert!(slice.is_inner_point(point(10.0, 1.0), true, &engine));
}

#[test]
fn slice_of_open_path() {
    let engine = Engine::default();
    let line = create_path(&engine, false, [point(0.0, 0.0), point(3.0, 3.0)]);
    let slice = create_slice_region(&engine, [&line]);
    assert_eq!(slice.len(), 2);
    assert_eq!(slice.paths()[1], line.reversed());
}
