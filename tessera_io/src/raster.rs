//! Raster window I/O: the `RasterSource` interface plus the two free
//! functions every concrete source is built around — `resample_from_array`
//! to reproject/rescale an in-memory array onto a tile's own grid, and
//! `create_mosaic` to merge several tiles' arrays into one contiguous
//! array. No concrete driver ships here (no raster-imaging crate exists
//! anywhere in this workspace's dependency stack); these are the
//! interfaces a driver crate would implement against.

use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};
use tessera_core::Tile;

/// Affine transform `(a, b, c, d, e, f)` mapping pixel `(col, row)` to
/// `(x, y)`, in the `Grid`/`Tile` north-up convention (`b = d = 0`).
pub type Affine = (f64, f64, f64, f64, f64, f64);

/// Resampling algorithm used when an array is reprojected onto a
/// different grid. Names mirror the ones GDAL-backed resamplers in this
/// ecosystem use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resampling {
	NearestNeighbour,
	#[default]
	Bilinear,
	Cubic,
	CubicSpline,
	Lanczos,
	Average,
}

/// A single-precision raster array over `bands` bands, row-major within
/// each band, with a `nodata` sentinel standing in for a per-pixel mask
/// (no masked-array type exists in this workspace's dependency stack, so
/// a value equal to `nodata` — or NaN — is treated as masked everywhere
/// this module reads one).
#[derive(Debug, Clone)]
pub struct RasterArray {
	pub width: usize,
	pub height: usize,
	pub bands: usize,
	pub nodata: f32,
	pub data: Vec<f32>,
}

impl RasterArray {
	/// A `width` x `height` x `bands` array filled with `nodata`.
	///
	/// # Errors
	/// Returns an error if `width`, `height`, or `bands` is zero.
	pub fn filled(width: usize, height: usize, bands: usize, nodata: f32) -> Result<Self> {
		ensure!(width > 0 && height > 0 && bands > 0, "raster array dimensions must be positive");
		Ok(RasterArray { width, height, bands, nodata, data: vec![nodata; width * height * bands] })
	}

	#[must_use]
	pub fn is_masked(&self, value: f32) -> bool {
		value.is_nan() || value == self.nodata
	}

	fn index(&self, band: usize, row: usize, col: usize) -> usize {
		(band * self.height + row) * self.width + col
	}

	/// # Panics
	/// Panics if `band`/`row`/`col` is out of bounds.
	#[must_use]
	pub fn get(&self, band: usize, row: usize, col: usize) -> f32 {
		self.data[self.index(band, row, col)]
	}

	/// # Panics
	/// Panics if `band`/`row`/`col` is out of bounds.
	pub fn set(&mut self, band: usize, row: usize, col: usize, value: f32) {
		let idx = self.index(band, row, col);
		self.data[idx] = value;
	}

	/// True if every pixel in every band is masked. A `TileTask` reports
	/// its output as "empty" when this holds for its result.
	#[must_use]
	pub fn all_masked(&self) -> bool {
		self.data.iter().all(|&v| self.is_masked(v))
	}
}

/// A readable raster source: reads the window aligned to a tile's pixel
/// grid, reprojecting and resampling as needed, with source coverage
/// gaps filled by `nodata` and masked.
pub trait RasterSource: Send + Sync {
	fn crs(&self) -> &tessera_core::Crs;
	fn bounds(&self) -> Option<tessera_core::Bounds>;
	fn read_window(&self, tile: &Tile, resampling: Resampling) -> Result<RasterArray>;
}

fn invert_affine(affine: Affine, x: f64, y: f64) -> (f64, f64) {
	let (a, _b, c, _d, e, f) = affine;
	((x - c) / a, (y - f) / e)
}

fn sample_nearest(src: &RasterArray, band: usize, col: f64, row: f64) -> f32 {
	let col = col.floor().clamp(0.0, src.width as f64 - 1.0) as usize;
	let row = row.floor().clamp(0.0, src.height as f64 - 1.0) as usize;
	src.get(band, row, col)
}

fn sample_bilinear(src: &RasterArray, band: usize, col: f64, row: f64) -> f32 {
	let col = col.clamp(0.0, src.width as f64 - 1.0);
	let row = row.clamp(0.0, src.height as f64 - 1.0);
	let c0 = col.floor() as usize;
	let r0 = row.floor() as usize;
	let c1 = (c0 + 1).min(src.width - 1);
	let r1 = (r0 + 1).min(src.height - 1);
	let fx = col - c0 as f64;
	let fy = row - r0 as f64;

	let corners = [src.get(band, r0, c0), src.get(band, r0, c1), src.get(band, r1, c0), src.get(band, r1, c1)];
	if corners.iter().any(|&v| src.is_masked(v)) {
		return sample_nearest(src, band, col, row);
	}
	let top = corners[0] as f64 * (1.0 - fx) + corners[1] as f64 * fx;
	let bottom = corners[2] as f64 * (1.0 - fx) + corners[3] as f64 * fx;
	(top * (1.0 - fy) + bottom * fy) as f32
}

/// Resamples `in_array` (georeferenced by `in_affine`) onto `out_tile`'s
/// own pixel grid (including its pixelbuffer), filling pixels outside
/// `in_array`'s coverage with `nodata`.
///
/// `Cubic`/`CubicSpline`/`Lanczos`/`Average` all fall back to bilinear —
/// no windowed-kernel or area-weighted resampler exists anywhere in this
/// workspace's dependency stack, and bilinear is an adequate
/// approximation for the tile-sized windows this crate resamples.
///
/// # Errors
/// Returns an error if `out_tile`'s pixel grid has a zero dimension.
pub fn resample_from_array(in_array: &RasterArray, in_affine: Affine, out_tile: &Tile, resampling: Resampling, nodata: f32) -> Result<RasterArray> {
	let width = out_tile.width();
	let height = out_tile.height();
	let mut out = RasterArray::filled(width, height, in_array.bands, nodata)?;
	let out_affine = out_tile.affine();

	for row in 0..height {
		for col in 0..width {
			let x = out_affine.0 * col as f64 + out_affine.2;
			let y = out_affine.4 * row as f64 + out_affine.5;
			let (src_col, src_row) = invert_affine(in_affine, x, y);
			if src_col < 0.0 || src_row < 0.0 || src_col >= in_array.width as f64 || src_row >= in_array.height as f64 {
				continue;
			}
			for band in 0..in_array.bands {
				let value = match resampling {
					Resampling::NearestNeighbour => sample_nearest(in_array, band, src_col, src_row),
					_ => sample_bilinear(in_array, band, src_col, src_row),
				};
				if !in_array.is_masked(value) {
					out.set(band, row, col, value);
				}
			}
		}
	}
	Ok(out)
}

/// Merges several tiles' arrays into one contiguous array covering their
/// union, placing each tile's pixels at their own affine-derived offset
/// within the mosaic. Tiles are assumed to share resolution (true for
/// tiles from the same pyramid zoom, which is the only case this crate's
/// scheduler ever mosaics).
///
/// # Errors
/// Returns an error if `tiles` is empty.
pub fn create_mosaic(tiles: &[(Tile, RasterArray)], nodata: f32) -> Result<(RasterArray, Affine)> {
	ensure!(!tiles.is_empty(), "cannot mosaic an empty tile set");

	let union_bounds = tiles
		.iter()
		.map(|(tile, _)| *tile.bounds())
		.reduce(|a, b| a + b)
		.expect("tiles is non-empty");

	let (first_tile, first_array) = &tiles[0];
	let (px_x, px_y) = first_tile.pixel_size();
	let width = ((union_bounds.width() / px_x).round() as usize).max(1);
	let height = ((union_bounds.height() / px_y).round() as usize).max(1);
	let bands = first_array.bands;

	let mosaic_affine: Affine = (px_x, 0.0, union_bounds.left(), 0.0, -px_y, union_bounds.top());
	let mut mosaic = RasterArray::filled(width, height, bands, nodata)?;

	for (tile, array) in tiles {
		let tile_affine = tile.affine();
		for row in 0..array.height.min(tile.height()) {
			for col in 0..array.width.min(tile.width()) {
				let x = tile_affine.0 * col as f64 + tile_affine.2;
				let y = tile_affine.4 * row as f64 + tile_affine.5;
				let (dst_col, dst_row) = invert_affine(mosaic_affine, x, y);
				if dst_col < 0.0 || dst_row < 0.0 || dst_col >= width as f64 || dst_row >= height as f64 {
					continue;
				}
				let dst_col = dst_col.floor() as usize;
				let dst_row = dst_row.floor() as usize;
				for band in 0..bands.min(array.bands) {
					let value = array.get(band, row, col);
					if !array.is_masked(value) {
						mosaic.set(band, dst_row, dst_col, value);
					}
				}
			}
		}
	}

	Ok((mosaic, mosaic_affine))
}

#[cfg(test)]
mod tests {
	use super::*;
	use tessera_core::{GridType, TilePyramid};

	#[test]
	fn all_masked_is_true_for_fresh_array() {
		let array = RasterArray::filled(2, 2, 1, -9999.0).unwrap();
		assert!(array.all_masked());
	}

	#[test]
	fn all_masked_is_false_once_a_pixel_is_set() {
		let mut array = RasterArray::filled(2, 2, 1, -9999.0).unwrap();
		array.set(0, 0, 0, 5.0);
		assert!(!array.all_masked());
	}

	#[test]
	fn resample_from_array_reads_overlapping_pixels() {
		let pyramid = TilePyramid::new(GridType::Geodetic, 4, 1).unwrap();
		let tile = pyramid.tile(0, 0, 0).unwrap();
		let bounds = tile.bounds();

		let mut source = RasterArray::filled(4, 4, 1, -9999.0).unwrap();
		for i in 0..16 {
			source.data[i] = 1.0;
		}
		let in_affine: Affine = (bounds.width() / 4.0, 0.0, bounds.left(), 0.0, -(bounds.height() / 4.0), bounds.top());

		let resampled = resample_from_array(&source, in_affine, &tile, Resampling::NearestNeighbour, -9999.0).unwrap();
		assert_eq!(resampled.width, tile.width());
		assert!(!resampled.all_masked());
		assert_eq!(resampled.get(0, 0, 0), 1.0);
	}

	#[test]
	fn resample_from_array_masks_pixels_outside_source_coverage() {
		let pyramid = TilePyramid::new(GridType::Geodetic, 4, 1).unwrap();
		let tile = pyramid.tile(1, 0, 0).unwrap();
		let far_source = RasterArray::filled(2, 2, 1, -9999.0).unwrap();
		// source affine anchored far outside the tile's own bounds
		let in_affine: Affine = (0.01, 0.0, 1000.0, 0.0, -0.01, 1000.0);

		let resampled = resample_from_array(&far_source, in_affine, &tile, Resampling::Bilinear, -9999.0).unwrap();
		assert!(resampled.all_masked());
	}

	#[test]
	fn create_mosaic_rejects_empty_input() {
		assert!(create_mosaic(&[], -9999.0).is_err());
	}

	#[test]
	fn create_mosaic_merges_adjacent_tiles() {
		let pyramid = TilePyramid::new(GridType::Geodetic, 4, 1).unwrap();
		let a = pyramid.tile(1, 0, 0).unwrap();
		let b = pyramid.tile(1, 0, 1).unwrap();

		let mut array_a = RasterArray::filled(4, 4, 1, -9999.0).unwrap();
		array_a.data.fill(1.0);
		let mut array_b = RasterArray::filled(4, 4, 1, -9999.0).unwrap();
		array_b.data.fill(2.0);

		let (mosaic, _affine) = create_mosaic(&[(a, array_a), (b, array_b)], -9999.0).unwrap();
		assert!(!mosaic.all_masked());
		assert!(mosaic.width >= 8);
	}
}
