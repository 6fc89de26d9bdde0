//! `ProcessConfig`: the serializable half of a run's configuration
//! (spec.md §6's recognized-keys table). Everything here can round-trip
//! through `serde` the way the teacher's `TilesReaderParameters`/
//! `ConvertOptions` do — no dynamic keyword-argument bag (see REDESIGN
//! FLAGS). The non-serializable half (the process function itself, input
//! bindings, the output writer) is supplied directly to
//! [`crate::Scheduler::new`] rather than deserialized.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tessera_core::GridType;
use tessera_io::Resampling;
use tessera_task::ProcessMode;

/// `process_pyramid`/`output_pyramid` from spec.md §6's table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PyramidSpec {
	pub grid_type: GridType,
	pub tile_size: usize,
	pub metatiling: usize,
}

/// `baselevels` from spec.md §6's table: `{zooms: [int...], lower:
/// resampling, higher: resampling, tile_pyramid: TilePyramid}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselevelsSpec {
	pub min_zoom: u8,
	pub max_zoom: u8,
	pub lower: Resampling,
	pub higher: Resampling,
	pub tile_pyramid: PyramidSpec,
}

impl BaselevelsSpec {
	#[must_use]
	pub fn zooms(&self) -> RangeInclusive<u8> {
		self.min_zoom..=self.max_zoom
	}
}

/// `output` from spec.md §6's table: `type`/`format`/`path`/`pixelbuffer`/
/// `metatiling`/`schema` (vector) or `dtype`/`bands`/`nodata` (raster).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSpec {
	pub format: String,
	pub path: String,
	pub pixelbuffer: usize,
	pub pyramid: PyramidSpec,
	/// Vector schema, if this output is vector-typed.
	pub schema: Option<Value>,
	/// Raster dtype, if this output is raster-typed.
	pub dtype: Option<String>,
	pub bands: Option<usize>,
	pub nodata: Option<f32>,
}

/// The serializable configuration for one process run. `input`/`process`
/// from spec.md §6's table aren't here: a process function is a value
/// (`tessera_task::ProcessFn`), and input bindings resolve to per-tile data
/// through closures — neither serializes meaningfully, so both are
/// supplied to [`crate::Scheduler::new`] directly instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessConfig {
	pub zoom_levels: Vec<u8>,
	pub baselevels: Option<BaselevelsSpec>,
	/// Region of interest; `None` processes the whole pyramid extent.
	pub bounds: Option<(f64, f64, f64, f64)>,
	pub mode: ProcessMode,
	pub process_pyramid: PyramidSpec,
	pub output: OutputSpec,
}
