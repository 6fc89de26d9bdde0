//! What a process function hands back, and what a finished task carries
//! forward to whatever depends on it.

use tessera_features::Feature;
use tessera_io::RasterArray;

/// The payload a process function produces for one tile.
///
/// Mirrors the two shapes a `mapchete` user process can return (a raster
/// array or a list of vector features) plus the explicit "no data" sentinel
/// the original represents as the string literal `"empty"`.
#[derive(Debug, Clone)]
pub enum TaskOutput {
	Raster(RasterArray),
	Vector(Vec<Feature>),
	Empty,
}

impl TaskOutput {
	#[must_use]
	pub fn is_empty(&self) -> bool {
		matches!(self, TaskOutput::Empty)
	}

	#[must_use]
	pub fn as_raster(&self) -> Option<&RasterArray> {
		match self {
			TaskOutput::Raster(array) => Some(array),
			_ => None,
		}
	}

	#[must_use]
	pub fn as_vector(&self) -> Option<&[Feature]> {
		match self {
			TaskOutput::Vector(features) => Some(features),
			_ => None,
		}
	}
}
