#![deny(bare_trait_objects)]
#![allow(clippy::float_cmp)]

//! A flat binary encoding for regions and paths.
//!
//! The data is a sequence of records (see [`header`]). Regions contain paths and paths
//! contain line and arc segments. Nesting is expressed by the size of the container
//! records only: a record is a child of every record whose byte range contains it.
//!
//! This crate is reexported in [tracery](https://docs.rs/tracery/).
//!
//! # Examples
//!
//! ```
//! # extern crate tracery_codec;
//! use tracery_codec::path::construct::create_region;
//! use tracery_codec::geom::Engine;
//! use tracery_codec::math::point;
//! use tracery_codec::{decode, encode_region, Geometry};
//!
//! let engine = Engine::default();
//! let region = create_region(&engine, true, [point(0.0, 0.0), point(3.0, 0.0), point(0.0, 3.0)]);
//!
//! let bytes = encode_region(&region).unwrap();
//! assert_eq!(bytes.len(), 16 + 32 + 3 * 32);
//! assert_eq!(decode(&bytes).unwrap(), vec![Geometry::Region(region)]);
//! ```

pub extern crate tracery_path as path;

mod error;
pub mod header;
mod reader;
mod writer;

pub use crate::path::geom;
pub use crate::path::math;

#[doc(inline)]
pub use crate::error::{DecodeError, EncodeError};
#[doc(inline)]
pub use crate::header::{GeometryDataHeader, GeometryDataType};
#[doc(inline)]
pub use crate::reader::{decode, Geometry, GeometryDataReader};
#[doc(inline)]
pub use crate::writer::{encode_region, GeometryDataWriter};
