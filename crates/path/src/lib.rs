#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]

//! Paths and regions made of line and circular arc segments.
//!
//! Paths are produced by a [`PathBuilder`] which snaps points to the engine's grid,
//! drops degenerate segments and merges segments that continue each other. Regions are
//! sets of closed paths filled according to the non-zero winding rule.
//!
//! This crate is reexported in [tracery](https://docs.rs/tracery/).
//!
//! # Examples
//!
//! ```
//! # extern crate tracery_path;
//! # fn main() {
//! use tracery_path::geom::Engine;
//! use tracery_path::math::point;
//! use tracery_path::PathBuilder;
//!
//! let engine = Engine::default();
//! let mut builder = PathBuilder::new(&engine);
//!
//! builder.begin_path(false, true);
//! builder.add_point(point(0.0, 0.0));
//! builder.add_point(point(5.0, 0.0));
//! builder.add_point(point(10.0, 0.0));
//! builder.add_point(point(10.0, 10.0));
//! builder.add_point(point(0.0, 10.0));
//! let path = builder.end_path(true);
//!
//! // The two collinear edges are merged.
//! assert_eq!(path.len(), 4);
//! assert!(path.is_closed());
//! assert_eq!(path.winding_at(point(5.0, 5.0)), 1);
//! # }
//! ```

pub use tracery_geom as geom;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod builder;
pub mod construct;
pub mod path;
pub mod region;
pub mod vertex;

#[cfg(test)]
mod builder_tests;

#[doc(inline)]
pub use crate::builder::{BuilderState, PathBuilder};
#[doc(inline)]
pub use crate::path::{Path, WindingInfo};
#[doc(inline)]
pub use crate::region::{Region, RegionBuilder};
#[doc(inline)]
pub use crate::vertex::{PathVertex, PathVertices};

pub mod math {
    //! The `tracery_geom` math types, reexported for convenience.

    pub use crate::geom::{point, vector, Box2D, Point, Vector};
}

/// The two possible orientations of a closed path.
///
/// Positive winding corresponds to the positive orientation in trigonometry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Winding {
    Positive,
    Negative,
}

impl Winding {
    /// The orientation matching the sign of a winding number, if any.
    pub fn from_sign(winding: i32) -> Option<Self> {
        match winding.signum() {
            1 => Some(Winding::Positive),
            -1 => Some(Winding::Negative),
            _ => None,
        }
    }
}
