//! Geometry primitives, GeoJSON I/O, and the reprojection/repair operations
//! that sit between a raw vector source and a tile task's output window.
//!
//! It includes modules for:
//! - `geo`: core geometry primitives and traits (`Point`, `Polygon`, etc.) plus
//!   feature/property/collection containers.
//! - `geojson`: parsing and serialization for GeoJSON and NDGeoJSON.
//! - `ops`: geometry repair, reprojection, and antimeridian handling used by
//!   the vector I/O pipeline between a source read and a tile task's output.
//! - `tile_outline`: helper for generating polygonal outlines from tile bounding boxes.

pub mod geo;
pub mod geojson;
pub mod ops;
pub mod tile_outline;
