#![deny(bare_trait_objects)]
#![allow(clippy::float_cmp)]

//! Region manipulation algorithms.
//!
//! The [`RegionComposer`](compose::RegionComposer) combines regions with boolean
//! operations.
//!
//! This crate is reexported in [tracery](https://docs.rs/tracery/).

pub extern crate tracery_path as path;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

mod boolean;
pub mod compose;

pub use crate::path::geom;
pub use crate::path::math;

#[doc(inline)]
pub use crate::compose::{ComposeOptions, CompositionMode, RegionComposer};
