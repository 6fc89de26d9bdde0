//! Tile-directory path layout: `<base>/<zoom>/<row>/<col><ext>`, plus the
//! metadata record every tile directory is required to carry at its root.
//!
//! Adapted from the teacher's `versatiles_container::container::directory`
//! reader/writer, which lays out tiles the same way (`z/y/x.<format>`) —
//! the format-specific byte codec those modules also carry is out of
//! scope here, so only the path convention and the "metadata at the root"
//! idea are kept.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};
use tessera_core::{EngineError, Tile};
use tessera_derive::context;

const META_FILENAME: &str = "tessera.json";

/// The metadata record a tile directory is required to carry at its root,
/// describing the layout every tile underneath it shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileDirectoryMeta {
	pub format: String,
	#[serde(rename = "type")]
	pub data_type: String,
	pub metatiling: usize,
	pub pixelbuffer: usize,
	/// Band dtype for raster directories, or a schema name for vector ones.
	pub dtype_or_schema: String,
}

impl TileDirectoryMeta {
	/// Reads and parses `base/tessera.json`.
	///
	/// # Errors
	/// Returns [`EngineError::Driver`] if the metadata file is absent or
	/// unparseable — a tile directory without it isn't a valid driver
	/// target.
	#[context("reading tile directory metadata under {base:?}")]
	pub fn read(base: &Path) -> Result<Self> {
		let path = base.join(META_FILENAME);
		if !path.exists() {
			log::warn!("tile directory {base:?} has no tessera.json metadata file");
			bail!(EngineError::Driver(format!("{path:?} is missing a tessera.json metadata file")));
		}
		let bytes = fs::read(&path)?;
		serde_json::from_slice(&bytes).map_err(|e| anyhow::Error::new(EngineError::Driver(e.to_string())))
	}

	/// Writes `self` as `base/tessera.json`, creating `base` if needed.
	///
	/// # Errors
	/// Propagates the underlying I/O error.
	pub fn write(&self, base: &Path) -> Result<()> {
		fs::create_dir_all(base)?;
		let bytes = serde_json::to_vec_pretty(self)?;
		fs::write(base.join(META_FILENAME), bytes)?;
		Ok(())
	}
}

/// The file path a tile's data lives at under `base`, given a driver's
/// file extension (e.g. `.geojson`, `.tif`).
#[must_use]
pub fn tile_path(base: &Path, tile: &Tile, extension: &str) -> PathBuf {
	let extension = extension.strip_prefix('.').unwrap_or(extension);
	base.join(tile.path_segment()).with_extension(extension)
}

/// Ensures `tile_path(base, tile, extension)`'s parent directory exists.
///
/// # Errors
/// Propagates the underlying I/O error.
pub fn ensure_tile_dir(base: &Path, tile: &Tile, extension: &str) -> Result<PathBuf> {
	let path = tile_path(base, tile, extension);
	let parent = path.parent().context("tile path has no parent directory")?;
	fs::create_dir_all(parent)?;
	Ok(path)
}

/// Removes a tile's file under `base`, if present. A no-op (not an
/// error) when the file doesn't exist — matching the "overwrite" write
/// mode's delete-before-write step.
///
/// # Errors
/// Propagates the underlying I/O error for failures other than
/// not-found.
pub fn remove_tile(base: &Path, tile: &Tile, extension: &str) -> Result<()> {
	let path = tile_path(base, tile, extension);
	match fs::remove_file(&path) {
		Ok(()) => Ok(()),
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
		Err(e) => Err(e.into()),
	}
}

#[must_use]
pub fn tile_exists(base: &Path, tile: &Tile, extension: &str) -> bool {
	tile_path(base, tile, extension).exists()
}

/// Validates a `TileDirectoryMeta`'s `metatiling` against the pyramid's
/// own, per the driver-config-mismatch case §6 calls out.
///
/// # Errors
/// Returns [`EngineError::Config`] on mismatch.
pub fn ensure_metatiling_matches(meta: &TileDirectoryMeta, pyramid_metatiling: usize) -> Result<()> {
	ensure!(
		meta.metatiling == pyramid_metatiling,
		EngineError::Config(format!("tile directory metatiling {} does not match pyramid metatiling {pyramid_metatiling}", meta.metatiling))
	);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use tessera_core::{GridType, TilePyramid};

	fn sample_tile() -> Tile {
		TilePyramid::new(GridType::Geodetic, 256, 1).unwrap().tile(3, 2, 1).unwrap()
	}

	#[test]
	fn tile_path_follows_zoom_row_col_layout() {
		let base = Path::new("/tiles");
		let path = tile_path(base, &sample_tile(), "geojson");
		assert_eq!(path, Path::new("/tiles/3/2/1.geojson"));
	}

	#[test]
	fn tile_path_strips_leading_dot_from_extension() {
		let base = Path::new("/tiles");
		assert_eq!(tile_path(base, &sample_tile(), ".tif"), Path::new("/tiles/3/2/1.tif"));
	}

	#[test]
	fn meta_round_trips_through_disk() {
		let dir = tempfile::tempdir().unwrap();
		let meta = TileDirectoryMeta {
			format: "geojson".into(),
			data_type: "vector".into(),
			metatiling: 1,
			pixelbuffer: 0,
			dtype_or_schema: "generic".into(),
		};
		meta.write(dir.path()).unwrap();
		let loaded = TileDirectoryMeta::read(dir.path()).unwrap();
		assert_eq!(loaded, meta);
	}

	#[test]
	fn read_missing_meta_is_a_driver_error() {
		let dir = tempfile::tempdir().unwrap();
		let err = TileDirectoryMeta::read(dir.path()).unwrap_err();
		assert!(err.to_string().contains("driver error"));
	}

	#[test]
	fn remove_tile_is_a_noop_when_absent() {
		let dir = tempfile::tempdir().unwrap();
		remove_tile(dir.path(), &sample_tile(), "geojson").unwrap();
	}

	#[test]
	fn ensure_metatiling_matches_rejects_mismatch() {
		let meta = TileDirectoryMeta {
			format: "geojson".into(),
			data_type: "vector".into(),
			metatiling: 2,
			pixelbuffer: 0,
			dtype_or_schema: "generic".into(),
		};
		let err = ensure_metatiling_matches(&meta, 1).unwrap_err();
		assert!(err.to_string().contains("configuration error"));
	}
}
