//! Regions: sets of closed paths under the non-zero winding rule.

use crate::geom::{empty_box, union_box, GeometryEngine};
use crate::math::{Box2D, Point};
use crate::path::{Path, WindingInfo};

use tracing::trace;

/// A set of closed paths.
///
/// A point is inside the region when the sum of the windings of all paths around it is
/// not zero. Holes are paths wound the other way, nothing else distinguishes them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Region {
    paths: Vec<Path>,
}

impl Region {
    pub fn new() -> Self {
        Region::default()
    }

    /// Creates a region from paths that are expected to be closed.
    pub fn from_paths(paths: Vec<Path>) -> Self {
        Region { paths }
    }

    #[inline]
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn into_paths(self) -> Vec<Path> {
        self.paths
    }

    pub fn winding_info(&self, p: Point, engine: &dyn GeometryEngine) -> WindingInfo {
        let mut result = WindingInfo::default();
        for path in &self.paths {
            let info = path.winding_info(p, engine);
            result.coincident |= info.coincident;
            result.winding += info.winding;
        }

        result
    }

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

    /// Returns the region with every path reversed.
    pub fn invert(&self) -> Region {
        Region {
            paths: self.paths.iter().map(Path::reversed).collect(),
        }
    }

    pub fn bounding_box(&self) -> Box2D {
        self.paths
            .iter()
            .fold(empty_box(), |acc, path| union_box(&acc, &path.bounding_box()))
    }

    /// Normalizes every path, dropping the ones that vanish.
    pub fn reduced(&self, engine: &dyn GeometryEngine) -> Region {
        let paths: Vec<Path> = self
            .paths
            .iter()
            .map(|path| path.reduced(engine))
            .filter(|path| !path.is_empty())
            .collect();
        trace!(before = self.paths.len(), after = paths.len(), "reduce region");

        Region { paths }
    }
}

impl<'l> IntoIterator for &'l Region {
    type Item = &'l Path;
    type IntoIter = std::slice::Iter<'l, Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Collects paths into a [`Region`].
///
/// Paths are stored as given, open paths included.
#[derive(Debug, Default)]
pub struct RegionBuilder {
    paths: Vec<Path>,
}

impl RegionBuilder {
    pub fn new() -> Self {
        RegionBuilder::default()
    }

    /// Starts a new region, discarding the paths of an unfinished one.
    pub fn begin_region(&mut self) {
        self.paths.clear();
    }

    pub fn add_path(&mut self, path: Path) {
        self.paths.push(path);
    }

    pub fn add_paths<I: IntoIterator<Item = Path>>(&mut self, paths: I) {
        for path in paths {
            self.add_path(path);
        }
    }

    /// Returns the region and clears the builder.
    pub fn end_region(&mut self) -> Region {
        Region {
            paths: std::mem::take(&mut self.paths),
        }
    }
}

#[cfg(test)]
use crate::geom::{point, Engine};

#[cfg(test)]
fn square(engine: &Engine, min: f64, max: f64) -> Path {
    let mut builder = crate::PathBuilder::new(engine);
    builder.begin_path(false, true);
    builder.add_points([
        point(min, min),
        point(max, min),
        point(max, max),
        point(min, max),
    ]);
    builder.end_path(true)
}

#[test]
fn region_with_hole() {
    let engine = Engine::default();
    let mut builder = RegionBuilder::new();
    builder.begin_region();
    builder.add_path(square(&engine, 0.0, 10.0));
    builder.add_path(square(&engine, 3.0, 7.0).reversed());
    let region = builder.end_region();

    assert_eq!(region.len(), 2);
    assert!(region.is_inner_point(point(1.0, 1.0), false, &engine));
    assert!(!region.is_inner_point(point(5.0, 5.0), false, &engine));
    assert!(!region.is_inner_point(point(50.0, 5.0), false, &engine));
    assert!(region.winding_info(point(3.0, 5.0), &engine).coincident);

    let bb = region.bounding_box();
    assert_eq!(bb.min, point(0.0, 0.0));
    assert_eq!(bb.max, point(10.0, 10.0));
}

#[test]
fn invert_twice() {
    let engine = Engine::default();
    let region = Region::from_paths(vec![
        square(&engine, 0.0, 10.0),
        square(&engine, 20.0, 30.0),
    ]);
    let inverted = region.invert();
    let back = inverted.invert();
    for p in [point(5.0, 5.0), point(25.0, 21.0), point(15.0, 15.0), point(-1.0, 3.0)] {
        let w = region.winding_info(p, &engine).winding;
        assert_eq!(inverted.winding_info(p, &engine).winding, -w);
        assert_eq!(back.winding_info(p, &engine).winding.signum(), w.signum());
    }
    assert_eq!(back, region);
}

#[test]
fn builder_is_reusable() {
    let engine = Engine::default();
    let mut builder = RegionBuilder::new();
    builder.begin_region();
    builder.add_paths(vec![square(&engine, 0.0, 1.0), square(&engine, 2.0, 3.0)]);
    assert_eq!(builder.end_region().len(), 2);

    builder.begin_region();
    assert!(builder.end_region().is_empty());
}
