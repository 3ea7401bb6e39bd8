//! Placeable shape table, footprints, and decoration kinds.
#![forbid(unsafe_code)]

pub mod config;
pub mod decoration;
pub mod footprint;
pub mod registry;
pub mod types;

pub use decoration::{DecorationHandle, DecorationKind, DecorationPlacement};
pub use footprint::footprint;
pub use registry::ShapeRegistry;
pub use types::{FootprintFill, ShapeCategory, ShapeError, ShapeId, ShapeSpec};
