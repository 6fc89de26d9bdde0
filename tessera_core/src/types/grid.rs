//! A raster grid: a [`Bounds`] divided into a fixed number of rows and
//! columns, in a given [`Crs`]. `TilePyramid` builds a `Grid` per zoom
//! level; `Grid::extract` is what lets a tile task read only the pixel
//! window it actually overlaps from a (possibly much larger) source grid.

use anyhow::{Result, ensure};
use tessera_derive::context;

use crate::{Bounds, Crs};

/// A regularly-spaced raster grid over `bounds`, `width` columns by
/// `height` rows, in `crs`.
#[derive(Debug, Clone)]
pub struct Grid {
	bounds: Bounds,
	width: usize,
	height: usize,
	crs: Crs,
}

impl Grid {
	/// # Errors
	/// Returns an error if `width` or `height` is zero.
	#[context("failed to build grid over {bounds:?} with shape ({width}, {height})")]
	pub fn new(bounds: Bounds, width: usize, height: usize, crs: Crs) -> Result<Self> {
		ensure!(width > 0, "grid width must be positive");
		ensure!(height > 0, "grid height must be positive");
		Ok(Grid { bounds, width, height, crs })
	}

	/// Builds a grid in [`Crs::wgs84`] from a raw `(left, bottom, right,
	/// top)` tuple and `(width, height)` shape — the shape most config
	/// deserializes into.
	pub fn from_bounds(bounds: (f64, f64, f64, f64), shape: (usize, usize)) -> Result<Self> {
		Grid::from_bounds_in(bounds, shape, Crs::wgs84())
	}

	pub fn from_bounds_in(bounds: (f64, f64, f64, f64), shape: (usize, usize), crs: Crs) -> Result<Self> {
		Grid::new(Bounds::from_inp(bounds)?, shape.0, shape.1, crs)
	}

	#[must_use]
	pub fn bounds(&self) -> &Bounds {
		&self.bounds
	}

	#[must_use]
	pub fn width(&self) -> usize {
		self.width
	}

	#[must_use]
	pub fn height(&self) -> usize {
		self.height
	}

	#[must_use]
	pub fn crs(&self) -> &Crs {
		&self.crs
	}

	/// Size, in CRS units, of one pixel: `(x_size, y_size)`.
	#[must_use]
	pub fn pixel_size(&self) -> (f64, f64) {
		(self.bounds.width() / self.width as f64, self.bounds.height() / self.height as f64)
	}

	/// Affine transform `(a, b, c, d, e, f)` mapping pixel `(col, row)` to
	/// CRS `(x, y)`, row 0 at the top (north-up), matching the convention
	/// `rasterio`/GDAL use.
	#[must_use]
	pub fn affine(&self) -> (f64, f64, f64, f64, f64, f64) {
		let (px_x, px_y) = self.pixel_size();
		(px_x, 0.0, self.bounds.left(), 0.0, -px_y, self.bounds.top())
	}

	/// Extracts the smallest sub-grid of `self` that covers `window`,
	/// snapped to pixel boundaries.
	///
	/// `window` is first clipped to `self`'s bounds; if the clipped region
	/// falls entirely on a pixel boundary (zero-width or zero-height), the
	/// single nearest pixel is returned instead, so a caller asking for an
	/// empty sliver always gets at least one pixel back rather than an
	/// error.
	///
	/// # Errors
	/// Returns an error if `window` does not overlap `self` at all.
	pub fn extract(&self, window: (f64, f64, f64, f64)) -> Result<Grid> {
		let window = Bounds::from_inp(window)?;
		let clipped = self
			.bounds
			.intersection(&window)
			.ok_or_else(|| anyhow::anyhow!("window {:?} does not overlap grid bounds {:?}", window.as_tuple(), self.bounds.as_tuple()))?;

		let (px_x, px_y) = self.pixel_size();

		let col_start = (((clipped.left() - self.bounds.left()) / px_x).floor() as isize).clamp(0, self.width as isize - 1);
		let mut col_end = (((clipped.right() - self.bounds.left()) / px_x).ceil() as isize).clamp(1, self.width as isize);
		if col_end <= col_start {
			col_end = col_start + 1;
		}

		let row_start = (((clipped.bottom() - self.bounds.bottom()) / px_y).floor() as isize).clamp(0, self.height as isize - 1);
		let mut row_end = (((clipped.top() - self.bounds.bottom()) / px_y).ceil() as isize).clamp(1, self.height as isize);
		if row_end <= row_start {
			row_end = row_start + 1;
		}

		let left = self.bounds.left() + col_start as f64 * px_x;
		let right = self.bounds.left() + col_end as f64 * px_x;
		let bottom = self.bounds.bottom() + row_start as f64 * px_y;
		let top = self.bounds.bottom() + row_end as f64 * px_y;

		Grid::new(
			Bounds::new(left, bottom, right, top)?,
			(col_end - col_start) as usize,
			(row_end - row_start) as usize,
			self.crs.clone(),
		)
	}
}
