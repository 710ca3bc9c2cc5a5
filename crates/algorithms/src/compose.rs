//! Boolean composition of regions.
//!
//! # Examples
//!
//! ```
//! # extern crate tracery_algorithms;
//! use tracery_algorithms::geom::Engine;
//! use tracery_algorithms::math::point;
//! use tracery_algorithms::path::construct::create_region;
//! use tracery_algorithms::{CompositionMode, RegionComposer};
//!
//! let engine = Engine::default();
//! let a = create_region(&engine, true, [point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0), point(0.0, 10.0)]);
//! let b = create_region(&engine, true, [point(5.0, 5.0), point(15.0, 5.0), point(15.0, 15.0), point(5.0, 15.0)]);
//!
//! let mut composer = RegionComposer::new(&engine);
//! composer.add(a);
//! composer.add(b);
//! let both = composer.compose(CompositionMode::Intersection);
//!
//! assert!(both.is_inner_point(point(7.0, 7.0), false, &engine));
//! assert!(!both.is_inner_point(point(2.0, 2.0), false, &engine));
//! ```

use crate::boolean;
use crate::geom::GeometryEngine;
use crate::path::Region;

use tracing::debug;

/// How the accumulated regions are combined.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum CompositionMode {
    /// Points inside any region.
    Union,
    /// Points inside every region.
    Intersection,
    /// Points inside the first region and outside all the others.
    Difference,
    /// Points inside an odd number of regions.
    Xor,
}

impl CompositionMode {
    /// Whether a point is in the result, given whether it is inside each region in
    /// insertion order.
    pub fn is_in(&self, inside: &[bool]) -> bool {
        match *self {
            CompositionMode::Union => inside.iter().any(|&i| i),
            CompositionMode::Intersection => !inside.is_empty() && inside.iter().all(|&i| i),
            CompositionMode::Difference => match inside.split_first() {
                Some((&first, rest)) => first && !rest.iter().any(|&i| i),
                None => false,
            },
            CompositionMode::Xor => inside.iter().filter(|&&i| i).count() % 2 == 1,
        }
    }
}

/// Parameters for the region composer.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct ComposeOptions {
    /// Distance from an edge at which the regions are sampled on each side of it.
    ///
    /// It must be larger than the engine's grid step and smaller than the thinnest
    /// feature of the input.
    ///
    /// Default value: `ComposeOptions::DEFAULT_PROBE_DISTANCE`.
    pub probe_distance: f64,
}

impl ComposeOptions {
    pub const DEFAULT_PROBE_DISTANCE: f64 = 1e-4;

    pub const DEFAULT: Self = ComposeOptions {
        probe_distance: Self::DEFAULT_PROBE_DISTANCE,
    };

    #[inline]
    pub fn probe_distance(probe_distance: f64) -> Self {
        Self::DEFAULT.with_probe_distance(probe_distance)
    }

    #[inline]
    pub const fn with_probe_distance(mut self, probe_distance: f64) -> Self {
        self.probe_distance = probe_distance;
        self
    }
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Accumulates regions and combines them.
///
/// Composing does not consume the accumulated regions: several modes can be computed
/// from the same set.
pub struct RegionComposer<'l> {
    engine: &'l dyn GeometryEngine,
    options: ComposeOptions,
    regions: Vec<Region>,
}

impl<'l> RegionComposer<'l> {
    pub fn new(engine: &'l dyn GeometryEngine) -> Self {
        RegionComposer::with_options(engine, ComposeOptions::DEFAULT)
    }

    pub fn with_options(engine: &'l dyn GeometryEngine, options: ComposeOptions) -> Self {
        RegionComposer {
            engine,
            options,
            regions: Vec::new(),
        }
    }

    pub fn add(&mut self, region: Region) {
        self.regions.push(region);
    }

    pub fn add_regions<I: IntoIterator<Item = Region>>(&mut self, regions: I) {
        self.regions.extend(regions);
    }

    /// Forgets the accumulated regions.
    pub fn reset(&mut self) {
        self.regions.clear();
    }

    #[inline]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn compose(&self, mode: CompositionMode) -> Region {
        debug!(?mode, regions = self.regions.len(), "compose");
        match self.regions.as_slice() {
            [] => Region::new(),
            [single] => single.clone(),
            regions => boolean::compose(self.engine, &self.options, regions, mode),
        }
    }
}

#[cfg(test)]
use crate::geom::Engine;
#[cfg(test)]
use crate::math::{point, Point};
#[cfg(test)]
use crate::path::construct::{create_region, create_region_from_segments};

#[cfg(test)]
fn square(engine: &Engine, min: f64, max: f64) -> Region {
    create_region(
        engine,
        true,
        [
            point(min, min),
            point(max, min),
            point(max, max),
            point(min, max),
        ],
    )
}

#[cfg(test)]
fn compose_pair(engine: &Engine, a: Region, b: Region, mode: CompositionMode) -> Region {
    let mut composer = RegionComposer::new(engine);
    composer.add(a);
    composer.add(b);
    composer.compose(mode)
}

#[cfg(test)]
fn inside(engine: &Engine, region: &Region, points: &[Point]) -> Vec<bool> {
    points
        .iter()
        .map(|p| region.is_inner_point(*p, false, engine))
        .collect()
}

#[cfg(test)]
const SAMPLES: [Point; 5] = [
    Point::new(2.0, 2.0),
    Point::new(7.0, 7.0),
    Point::new(12.0, 12.0),
    Point::new(12.0, 2.0),
    Point::new(2.0, 12.0),
];

#[test]
fn nothing_and_one() {
    let engine = Engine::default();
    let mut composer = RegionComposer::new(&engine);
    assert!(composer.compose(CompositionMode::Union).is_empty());

    let a = square(&engine, 0.0, 10.0);
    composer.add(a.clone());
    assert_eq!(composer.compose(CompositionMode::Union), a);
    assert_eq!(composer.compose(CompositionMode::Intersection), a);

    composer.reset();
    assert!(composer.regions().is_empty());
    assert!(composer.compose(CompositionMode::Xor).is_empty());
}

#[test]
fn overlapping_squares() {
    let engine = Engine::default();
    let a = || square(&engine, 0.0, 10.0);
    let b = || square(&engine, 5.0, 15.0);

    let union = compose_pair(&engine, a(), b(), CompositionMode::Union);
    assert_eq!(union.len(), 1);
    assert_eq!(union.paths()[0].len(), 8);
    assert_eq!(
        inside(&engine, &union, &SAMPLES),
        vec![true, true, true, false, false]
    );

    let intersection = compose_pair(&engine, a(), b(), CompositionMode::Intersection);
    assert_eq!(intersection.len(), 1);
    assert_eq!(intersection.paths()[0].len(), 4);
    let bb = intersection.bounding_box();
    assert_eq!(bb.min, point(5.0, 5.0));
    assert_eq!(bb.max, point(10.0, 10.0));

    let difference = compose_pair(&engine, a(), b(), CompositionMode::Difference);
    assert_eq!(
        inside(&engine, &difference, &SAMPLES),
        vec![true, false, false, false, false]
    );
    let reverse_difference = compose_pair(&engine, b(), a(), CompositionMode::Difference);
    assert_eq!(
        inside(&engine, &reverse_difference, &SAMPLES),
        vec![false, false, true, false, false]
    );

    let xor = compose_pair(&engine, a(), b(), CompositionMode::Xor);
    assert_eq!(
        inside(&engine, &xor, &SAMPLES),
        vec![true, false, true, false, false]
    );
}

#[test]
fn union_is_commutative() {
    let engine = Engine::default();
    let ab = compose_pair(
        &engine,
        square(&engine, 0.0, 10.0),
        square(&engine, 5.0, 15.0),
        CompositionMode::Union,
    );
    let ba = compose_pair(
        &engine,
        square(&engine, 5.0, 15.0),
        square(&engine, 0.0, 10.0),
        CompositionMode::Union,
    );
    for x in 0..16 {
        for y in 0..16 {
            let p = point(x as f64 + 0.5, y as f64 + 0.5);
            assert_eq!(
                ab.is_inner_point(p, false, &engine),
                ba.is_inner_point(p, false, &engine)
            );
        }
    }
}

#[test]
fn three_way_union_and_intersection_ignore_grouping() {
    let engine = Engine::default();
    let a = square(&engine, 0.0, 10.0);
    let b = square(&engine, 5.0, 15.0);
    let c = create_region(
        &engine,
        true,
        [point(2.0, 7.0), point(12.0, 7.0), point(12.0, 17.0), point(2.0, 17.0)],
    );

    for mode in [CompositionMode::Union, CompositionMode::Intersection] {
        let orders = [
            [a.clone(), b.clone(), c.clone()],
            [c.clone(), a.clone(), b.clone()],
            [b.clone(), c.clone(), a.clone()],
        ];
        let mut results: Vec<Region> = orders
            .into_iter()
            .map(|regions| {
                let mut composer = RegionComposer::new(&engine);
                for region in regions {
                    composer.add(region);
                }
                composer.compose(mode)
            })
            .collect();
        let ab = compose_pair(&engine, a.clone(), b.clone(), mode);
        results.push(compose_pair(&engine, ab, c.clone(), mode));
        let bc = compose_pair(&engine, b.clone(), c.clone(), mode);
        results.push(compose_pair(&engine, a.clone(), bc, mode));

        for x in -1..19 {
            for y in -1..19 {
                let p = point(x as f64 + 0.5, y as f64 + 0.5);
                let expected = mode.is_in(&[
                    a.is_inner_point(p, false, &engine),
                    b.is_inner_point(p, false, &engine),
                    c.is_inner_point(p, false, &engine),
                ]);
                for result in &results {
                    assert_eq!(
                        result.is_inner_point(p, false, &engine),
                        expected,
                        "{:?} at {:?}",
                        mode,
                        p
                    );
                }
            }
        }
    }
}

#[test]
fn disjoint_union_keeps_both() {
    let engine = Engine::default();
    let union = compose_pair(
        &engine,
        square(&engine, 0.0, 1.0),
        square(&engine, 5.0, 6.0),
        CompositionMode::Union,
    );
    assert_eq!(union.len(), 2);
    assert!(compose_pair(
        &engine,
        square(&engine, 0.0, 1.0),
        square(&engine, 5.0, 6.0),
        CompositionMode::Intersection,
    )
    .is_empty());
}

#[test]
fn nested_difference_makes_a_hole() {
    let engine = Engine::default();
    let ring = compose_pair(
        &engine,
        square(&engine, 0.0, 10.0),
        square(&engine, 3.0, 7.0),
        CompositionMode::Difference,
    );
    assert_eq!(ring.len(), 2);
    assert!(ring.is_inner_point(point(1.0, 1.0), false, &engine));
    assert!(!ring.is_inner_point(point(5.0, 5.0), false, &engine));
    let windings: Vec<i32> = ring.paths().iter().map(|p| p.winding(&engine)).collect();
    assert!(windings.contains(&1));
    assert!(windings.contains(&-1));
}

#[test]
fn shared_edge_union() {
    let engine = Engine::default();
    let left = create_region(
        &engine,
        true,
        [point(0.0, 0.0), point(5.0, 0.0), point(5.0, 5.0), point(0.0, 5.0)],
    );
    let right = create_region(
        &engine,
        true,
        [point(5.0, 0.0), point(10.0, 0.0), point(10.0, 5.0), point(5.0, 5.0)],
    );
    let union = compose_pair(&engine, left, right, CompositionMode::Union);
    assert_eq!(union.len(), 1);
    // The shared edge disappears and the collinear edges merge.
    assert_eq!(union.paths()[0].len(), 4);
    assert!(union.is_inner_point(point(5.0, 2.5), false, &engine));
}

#[test]
fn square_minus_disc() {
    use crate::geom::ArcSegment;

    let engine = Engine::default();
    let disc = create_region_from_segments(
        &engine,
        true,
        [ArcSegment::circle(point(13.0, 10.0), point(10.0, 10.0), false).into()],
    );
    let result = compose_pair(&engine, square(&engine, 0.0, 10.0), disc, CompositionMode::Difference);
    assert_eq!(result.len(), 1);
    assert!(result.is_inner_point(point(2.0, 2.0), false, &engine));
    assert!(!result.is_inner_point(point(9.0, 9.0), false, &engine));
    assert!(result.is_inner_point(point(9.9, 6.0), false, &engine));
    assert!(result.paths()[0].segments().iter().any(|s| s.is_arc()));
}
