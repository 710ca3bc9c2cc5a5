//! Edge classification behind the region composer.
//!
//! Every segment of every input region is cut at its intersections with all the other
//! segments. Each piece is then a candidate boundary edge: the regions are sampled on
//! both sides of its middle, and the piece is kept when the composition is filled on
//! exactly one side. Kept pieces are oriented with the filled side on their left and
//! chained into closed loops.

use crate::compose::{ComposeOptions, CompositionMode};
use crate::geom::utils::tangent;
use crate::geom::{GeometryEngine, PathSegment};
use crate::math::Point;
use crate::path::{PathBuilder, Region};

use std::collections::HashMap;

use tracing::{debug, trace, warn};

pub(crate) fn compose(
    engine: &dyn GeometryEngine,
    options: &ComposeOptions,
    regions: &[Region],
    mode: CompositionMode,
) -> Region {
    let segments: Vec<PathSegment> = regions
        .iter()
        .flat_map(|region| region.paths())
        .flat_map(|path| path.segments().iter().copied())
        .filter(|segment| !segment.is_single_point())
        .collect();

    let pieces = split_at_intersections(engine, &segments);
    let edges = classify(engine, options, regions, mode, &pieces);
    let loops = chain(&edges);
    debug!(
        segments = segments.len(),
        pieces = pieces.len(),
        edges = edges.len(),
        loops = loops.len(),
        "boolean composition"
    );

    let mut builder = PathBuilder::new(engine);
    let mut paths = Vec::with_capacity(loops.len());
    for edges in loops {
        builder.begin_path(false, true);
        builder.add_segments(edges);
        let path = builder.end_path(true);
        if !path.is_empty() {
            paths.push(path);
        }
    }

    Region::from_paths(paths)
}

/// Points shared by several segments, so that both sides of an intersection are cut at
/// the exact same coordinates.
struct PointPool {
    points: Vec<Point>,
    epsilon: f64,
}

impl PointPool {
    fn canonical(&mut self, p: Point) -> Point {
        for &known in &self.points {
            if (known - p).length() < self.epsilon {
                return known;
            }
        }
        self.points.push(p);
        p
    }
}

/// Position of a point along a segment, increasing from `from` to `to`.
fn position_along(segment: &PathSegment, p: Point) -> f64 {
    match segment {
        PathSegment::Line(line) => (p - line.from).dot(line.to_vector()),
        PathSegment::Arc(arc) => arc.angular_offset(p),
    }
}

fn split_at_intersections(engine: &dyn GeometryEngine, segments: &[PathSegment]) -> Vec<PathSegment> {
    let mut pool = PointPool {
        points: Vec::new(),
        epsilon: engine.epsilon(),
    };
    for segment in segments {
        pool.canonical(segment.from());
        pool.canonical(segment.to());
    }

    let mut cuts: Vec<Vec<Point>> = vec![Vec::new(); segments.len()];
    for i in 0..segments.len() {
        for j in (i + 1)..segments.len() {
            for hit in engine.segment_intersections(&segments[i], &segments[j]) {
                let hit = pool.canonical(hit);
                cuts[i].push(hit);
                cuts[j].push(hit);
            }
        }
    }

    let mut pieces = Vec::with_capacity(segments.len());
    for (segment, mut points) in segments.iter().zip(cuts) {
        let (from, to) = (segment.from(), segment.to());
        points.retain(|p| *p != from && *p != to);
        points.sort_by(|a, b| {
            position_along(segment, *a).total_cmp(&position_along(segment, *b))
        });
        points.dedup();

        let mut rest = *segment;
        for p in points {
            let (before, after) = rest.split(p);
            pieces.push(before);
            rest = after;
        }
        pieces.push(rest);
    }

    trace!(segments = segments.len(), pieces = pieces.len(), "split at intersections");

    pieces
}

fn is_filled(
    engine: &dyn GeometryEngine,
    regions: &[Region],
    mode: CompositionMode,
    p: Point,
) -> bool {
    let inside: Vec<bool> = regions
        .iter()
        .map(|region| region.winding_info(p, engine).winding != 0)
        .collect();
    mode.is_in(&inside)
}

fn classify(
    engine: &dyn GeometryEngine,
    options: &ComposeOptions,
    regions: &[Region],
    mode: CompositionMode,
    pieces: &[PathSegment],
) -> Vec<PathSegment> {
    let mut edges: Vec<PathSegment> = Vec::new();
    for piece in pieces {
        if piece.is_single_point() || piece.length() < engine.epsilon() {
            continue;
        }

        let mid = piece.mid_point();
        let normal = tangent(piece.tangent(mid)) * options.probe_distance;
        let left = is_filled(engine, regions, mode, mid + normal);
        let right = is_filled(engine, regions, mode, mid - normal);
        if left == right {
            continue;
        }

        let edge = if left { *piece } else { piece.flip() };
        if edges.iter().any(|kept| engine.are_coincident(kept, &edge)) {
            continue;
        }
        edges.push(edge);
    }

    edges
}

fn point_key(p: Point) -> (u64, u64) {
    (p.x.to_bits(), p.y.to_bits())
}

/// Links edges end to start into closed loops.
fn chain(edges: &[PathSegment]) -> Vec<Vec<PathSegment>> {
    let mut starts: HashMap<(u64, u64), Vec<usize>> = HashMap::new();
    for (i, edge) in edges.iter().enumerate() {
        starts.entry(point_key(edge.from())).or_default().push(i);
    }

    let mut used = vec![false; edges.len()];
    let mut loops = Vec::new();
    for first in 0..edges.len() {
        if used[first] {
            continue;
        }
        used[first] = true;

        let start = edges[first].from();
        let mut current = edges[first].to();
        let mut links = vec![edges[first]];
        let mut closed = current == start;
        while !closed {
            let next = starts
                .get(&point_key(current))
                .and_then(|candidates| candidates.iter().copied().find(|&i| !used[i]));
            let Some(next) = next else {
                break;
            };
            used[next] = true;
            links.push(edges[next]);
            current = edges[next].to();
            closed = current == start;
        }

        if closed {
            loops.push(links);
        } else {
            warn!(
                edges = links.len(),
                x = start.x,
                y = start.y,
                "dropping a boundary chain that does not close"
            );
        }
    }

    loops
}

#[cfg(test)]
use crate::geom::LineSegment;
#[cfg(test)]
use crate::math::point;

#[test]
fn crossing_lines_are_cut_once() {
    let engine = crate::geom::Engine::default();
    let segments: Vec<PathSegment> = vec![
        LineSegment::new(point(0.0, 0.0), point(10.0, 10.0)).into(),
        LineSegment::new(point(0.0, 10.0), point(10.0, 0.0)).into(),
        LineSegment::new(point(0.0, 5.0), point(10.0, 5.0)).into(),
    ];
    let pieces = split_at_intersections(&engine, &segments);
    assert_eq!(pieces.len(), 6);
    let centers = pieces
        .iter()
        .filter(|piece| piece.to() == point(5.0, 5.0))
        .count();
    assert_eq!(centers, 3);
}

#[test]
fn chains_close_loops() {
    let edges: Vec<PathSegment> = vec![
        LineSegment::new(point(0.0, 0.0), point(1.0, 0.0)).into(),
        LineSegment::new(point(5.0, 5.0), point(6.0, 5.0)).into(),
        LineSegment::new(point(1.0, 0.0), point(0.0, 1.0)).into(),
        LineSegment::new(point(0.0, 1.0), point(0.0, 0.0)).into(),
    ];
    let loops = chain(&edges);
    assert_eq!(loops.len(), 1);
    assert_eq!(loops[0].len(), 3);
}
