#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]
#![allow(clippy::many_single_char_names)]

//! Simple 2D geometric primitives on top of euclid.
//!
//! This crate is reexported in [tracery](https://docs.rs/tracery/).
//!
//! # Overview.
//!
//! This crate implements the maths to work with:
//!
//! - lines and line segments,
//! - circular arcs,
//! - path segments, the closed set of the two segment kinds a path is made of.
//!
//! Everything is expressed in `f64`. Point equality is exact: tolerances are dealt
//! with upstream by snapping points to a grid (see [`GeometryEngine`]).
//!
//! # The geometry engine
//!
//! Operations that need a tolerance or a grid (coincidence tests, snapping, the
//! segment join test) go through the [`GeometryEngine`] trait. [`Engine`] is the
//! default implementation, configured with [`EngineOptions`].

// Reexport dependencies.
pub use arrayvec;
pub use euclid;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod arc;
pub mod engine;
mod line;
mod segment;
pub mod utils;

#[doc(inline)]
pub use crate::arc::ArcSegment;
#[doc(inline)]
pub use crate::engine::{Engine, EngineOptions, GeometryEngine, Intersections};
#[doc(inline)]
pub use crate::line::{Line, LineSegment};
#[doc(inline)]
pub use crate::segment::{JoinMode, PathSegment};

/// Alias for `euclid::default::Point2D<f64>`.
pub type Point = euclid::default::Point2D<f64>;

/// Alias for `euclid::default::Vector2D<f64>`.
pub type Vector = euclid::default::Vector2D<f64>;

/// Alias for `euclid::default::Box2D<f64>`.
pub type Box2D = euclid::default::Box2D<f64>;

/// Shorthand for `Vector::new(x, y)`.
#[inline]
pub fn vector(x: f64, y: f64) -> Vector {
    Vector::new(x, y)
}

/// Shorthand for `Point::new(x, y)`.
#[inline]
pub fn point(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// An empty bounding box that any union will replace.
///
/// `min` is at positive infinity and `max` at negative infinity, so
/// `Box2D::is_empty` reports `true` for it.
#[inline]
pub fn empty_box() -> Box2D {
    Box2D {
        min: point(f64::INFINITY, f64::INFINITY),
        max: point(f64::NEG_INFINITY, f64::NEG_INFINITY),
    }
}

/// Union of two boxes that treats `empty_box()` as the identity.
#[inline]
pub fn union_box(a: &Box2D, b: &Box2D) -> Box2D {
    Box2D {
        min: a.min.min(b.min),
        max: a.max.max(b.max),
    }
}
