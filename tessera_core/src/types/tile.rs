//! A materialized tile: the value produced by [`crate::TilePyramid::tile`].
//!
//! Per the redesign direction in `SPEC_FULL.md` §9, a `Tile` is a plain
//! value keyed by `(pyramid_id, zoom, row, col)` — it carries its own
//! derived bounds/crs/pixel size rather than holding a back-reference to
//! its pyramid, so tiles can be sent across task boundaries, hashed, and
//! compared without pulling the pyramid along.

use crate::{Bounds, Crs};

/// A single tile's identity and derived geometry.
#[derive(Debug, Clone)]
pub struct Tile {
	pyramid_id: String,
	zoom: u8,
	row: usize,
	col: usize,
	bounds: Bounds,
	crs: Crs,
	tile_size: usize,
	/// Pixel buffer (in pixels) added around the tile's nominal extent
	/// when reading/writing, for seamless edge resampling. Zero unless set
	/// via [`Tile::with_pixelbuffer`].
	pixelbuffer: usize,
}

impl Tile {
	pub(crate) fn new(pyramid_id: String, zoom: u8, row: usize, col: usize, bounds: Bounds, crs: Crs, tile_size: usize) -> Self {
		Tile { pyramid_id, zoom, row, col, bounds, crs, tile_size, pixelbuffer: 0 }
	}

	#[must_use]
	pub fn with_pixelbuffer(mut self, pixelbuffer: usize) -> Self {
		self.pixelbuffer = pixelbuffer;
		self
	}

	#[must_use]
	pub fn pyramid_id(&self) -> &str {
		&self.pyramid_id
	}

	#[must_use]
	pub fn zoom(&self) -> u8 {
		self.zoom
	}

	#[must_use]
	pub fn row(&self) -> usize {
		self.row
	}

	#[must_use]
	pub fn col(&self) -> usize {
		self.col
	}

	#[must_use]
	pub fn bounds(&self) -> &Bounds {
		&self.bounds
	}

	#[must_use]
	pub fn crs(&self) -> &Crs {
		&self.crs
	}

	#[must_use]
	pub fn tile_size(&self) -> usize {
		self.tile_size
	}

	#[must_use]
	pub fn pixelbuffer(&self) -> usize {
		self.pixelbuffer
	}

	/// Tile width/height in pixels, including the pixelbuffer on both
	/// sides.
	#[must_use]
	pub fn width(&self) -> usize {
		self.tile_size + 2 * self.pixelbuffer
	}

	#[must_use]
	pub fn height(&self) -> usize {
		self.tile_size + 2 * self.pixelbuffer
	}

	/// Size, in CRS units, of one pixel within this tile.
	#[must_use]
	pub fn pixel_size(&self) -> (f64, f64) {
		(self.bounds.width() / self.tile_size as f64, self.bounds.height() / self.tile_size as f64)
	}

	/// Bounds including the pixelbuffer margin, used when reading source
	/// data for seamless resampling across tile edges.
	#[must_use]
	pub fn buffered_bounds(&self) -> Bounds {
		if self.pixelbuffer == 0 {
			return self.bounds;
		}
		let (px_x, px_y) = self.pixel_size();
		let margin_x = self.pixelbuffer as f64 * px_x;
		let margin_y = self.pixelbuffer as f64 * px_y;
		Bounds::new(
			self.bounds.left() - margin_x,
			self.bounds.bottom() - margin_y,
			self.bounds.right() + margin_x,
			self.bounds.top() + margin_y,
		)
		.expect("expanding valid bounds stays valid")
	}

	/// Affine transform `(a, b, c, d, e, f)` for this tile's (unbuffered)
	/// pixel grid, row 0 at the top.
	#[must_use]
	pub fn affine(&self) -> (f64, f64, f64, f64, f64, f64) {
		let (px_x, px_y) = self.pixel_size();
		(px_x, 0.0, self.bounds.left(), 0.0, -px_y, self.bounds.top())
	}

	/// The tile path segment `<zoom>/<row>/<col>`, the layout every
	/// `tessera_io` tile directory source/sink uses.
	#[must_use]
	pub fn path_segment(&self) -> String {
		format!("{}/{}/{}", self.zoom, self.row, self.col)
	}
}

/// Identity is `(pyramid_id, zoom, row, col)` only — two tiles with the
/// same coordinate from the same pyramid are equal even if one carries a
/// pixelbuffer and the other doesn't, since pixelbuffer is a read/write
/// concern, not part of the tile's address.
impl PartialEq for Tile {
	fn eq(&self, other: &Self) -> bool {
		self.pyramid_id == other.pyramid_id && self.zoom == other.zoom && self.row == other.row && self.col == other.col
	}
}

impl Eq for Tile {}

impl std::hash::Hash for Tile {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.pyramid_id.hash(state);
		self.zoom.hash(state);
		self.row.hash(state);
		self.col.hash(state);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{GridType, TilePyramid};

	#[test]
	fn equality_ignores_pixelbuffer() {
		let pyramid = TilePyramid::new(GridType::Geodetic, 256, 1).unwrap();
		let a = pyramid.tile(2, 1, 1).unwrap();
		let b = pyramid.tile(2, 1, 1).unwrap().with_pixelbuffer(8);
		assert_eq!(a, b);
	}

	#[test]
	fn different_coordinates_are_not_equal() {
		let pyramid = TilePyramid::new(GridType::Geodetic, 256, 1).unwrap();
		let a = pyramid.tile(2, 1, 1).unwrap();
		let b = pyramid.tile(2, 1, 2).unwrap();
		assert_ne!(a, b);
	}

	#[test]
	fn buffered_bounds_expands_symmetrically() {
		let pyramid = TilePyramid::new(GridType::Geodetic, 256, 1).unwrap();
		let tile = pyramid.tile(2, 1, 1).unwrap().with_pixelbuffer(8);
		let buffered = tile.buffered_bounds();
		assert!(buffered.width() > tile.bounds().width());
		assert!(buffered.left() < tile.bounds().left());
		assert!(buffered.right() > tile.bounds().right());
	}

	#[test]
	fn width_and_height_include_pixelbuffer_on_both_sides() {
		let pyramid = TilePyramid::new(GridType::Mercator, 256, 1).unwrap();
		let tile = pyramid.tile(0, 0, 0).unwrap().with_pixelbuffer(4);
		assert_eq!(tile.width(), 256 + 8);
		assert_eq!(tile.height(), 256 + 8);
	}

	#[test]
	fn path_segment_is_zoom_row_col() {
		let pyramid = TilePyramid::new(GridType::Mercator, 256, 1).unwrap();
		let tile = pyramid.tile(4, 3, 2).unwrap();
		assert_eq!(tile.path_segment(), "4/3/2");
	}
}
