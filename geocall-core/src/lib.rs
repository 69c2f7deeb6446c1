#![doc = include_str!("../../README.md")]
//! Crate-specific API surface for `geocall-core`.

pub mod args;
pub mod convert;
pub mod coordinates;
pub(crate) mod emptiness;
pub mod error;
pub mod function_catalog;
pub mod functions;
pub mod geojson;
pub mod geometry;
pub mod resolver;
pub mod value;

pub use args::CallArgs;
pub use coordinates::Coordinates;
pub use error::{GeoCallError, Result};
pub use geometry::{Geometry, GeometryKind, LiteralGeometry};
pub use value::{DeferredCall, Value};
