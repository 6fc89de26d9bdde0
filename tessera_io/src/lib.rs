//! Vector and raster window I/O for the tiled processing engine.
//!
//! `vector` implements full read/write/convert semantics over GeoJSON
//! sources; `raster` defines the `RasterSource` interface plus
//! resample/mosaic free functions (no concrete driver, since no
//! raster-imaging crate exists anywhere in this workspace's dependency
//! stack); `tile_directory` provides the `<base>/<zoom>/<row>/<col><ext>`
//! path layout both halves write through.

pub mod raster;
pub mod tile_directory;
pub mod vector;

pub use raster::{Affine, RasterArray, RasterSource, Resampling, create_mosaic, resample_from_array};
pub use tile_directory::{TileDirectoryMeta, ensure_metatiling_matches, ensure_tile_dir, remove_tile, tile_exists, tile_path};
pub use vector::{
	ConvertOptions, GeoJsonSource, ReadVectorWindowOptions, SchemaGeometryType, VectorLocation, VectorSource, convert_vector, read_vector_window,
	write_vector_window,
};
