#![deny(bare_trait_objects)]

//! 2D geometry for CAD and PCB tools, made of line and circular arc segments.
//!
//! # Crates
//!
//! This meta-crate (`tracery`) reexports the following sub-crates for convenience:
//!
//! * **tracery_geom** - Line and arc segments, and the snapping geometry engine.
//! * **tracery_path** - Normalized paths, regions and their builders.
//! * **tracery_algorithms** - Boolean composition of regions.
//! * **tracery_codec** - Flat binary encoding of regions and paths.
//!
//! Each `tracery_<name>` crate is reexported as a `<name>` module in `tracery`.
//!
//! # Feature flags
//!
//! serialization using serde can be enabled on each crate using the
//! `serialization` feature flag (disabled by default).
//!
//! The binary codec is behind the `codec` feature flag.
//!
//! # Examples
//!
//! ```
//! use tracery::algorithms::{CompositionMode, RegionComposer};
//! use tracery::geom::{ArcSegment, Engine};
//! use tracery::math::point;
//! use tracery::path::construct::{create_region, create_region_from_segments};
//!
//! let engine = Engine::default();
//! let plate = create_region(
//!     &engine,
//!     true,
//!     [point(0.0, 0.0), point(20.0, 0.0), point(20.0, 10.0), point(0.0, 10.0)],
//! );
//! let drill = create_region_from_segments(
//!     &engine,
//!     true,
//!     [ArcSegment::circle(point(12.0, 5.0), point(10.0, 5.0), false).into()],
//! );
//!
//! let mut composer = RegionComposer::new(&engine);
//! composer.add(plate);
//! composer.add(drill);
//! let drilled = composer.compose(CompositionMode::Difference);
//!
//! assert!(drilled.is_inner_point(point(2.0, 2.0), false, &engine));
//! assert!(!drilled.is_inner_point(point(10.0, 5.0), false, &engine));
//! ```

pub extern crate tracery_algorithms;
#[cfg(feature = "codec")]
pub extern crate tracery_codec;

pub use tracery_algorithms as algorithms;
#[cfg(feature = "codec")]
pub use tracery_codec as codec;
pub use algorithms::geom;
pub use algorithms::path;

pub use path::math;
