//! Per-tile execution configuration: what a [`crate::TileTask`] needs to
//! run, with every field resolved ahead of time instead of reached for
//! through a dynamic `config` object (REDESIGN FLAG 4 — see SPEC_FULL.md).

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tessera_core::{Tile, TilePyramid};
use tessera_io::{RasterArray, Resampling};

use crate::output::TaskOutput;

/// Write-mode a process run operates under. Unlike the original's runtime
/// string check, an invalid mode simply can't be constructed — this enum
/// being exhaustive is what replaces the "otherwise fail" validation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessMode {
	Memory,
	Continue,
	Overwrite,
}

/// Inputs bound to a process function call: a named map of whatever
/// payload each input binding resolved to for this tile (vector features,
/// a raster window, or a nested preprocessing result), left as an opaque
/// JSON value since `tessera_task` has no opinion on input shapes.
pub type ProcessInputs = HashMap<String, Value>;

/// Everything a user process function is handed for one tile.
pub struct ProcessContext<'a> {
	pub tile: &'a Tile,
	pub params: &'a HashMap<String, Value>,
	pub inputs: &'a ProcessInputs,
	pub output_params: &'a HashMap<String, Value>,
	/// Preprocessing results attached ahead of the call, keyed
	/// `"<input_key>:<task_key>"` — the same composite key
	/// [`crate::TileTask::execute`] derives from dependency ids that don't
	/// start with `tile_task`.
	pub preprocessing_results: &'a HashMap<String, TaskOutput>,
}

pub type ProcessFn = Arc<dyn Fn(&ProcessContext) -> Result<Option<TaskOutput>> + Send + Sync>;

/// Store a [`crate::TileTask`] reads prior zoom-level output from, for
/// baselevel interpolation.
pub trait OutputReader: Send + Sync {
	fn pyramid(&self) -> &TilePyramid;
	fn pixelbuffer(&self) -> usize;
	fn nodata(&self) -> f32;

	/// # Errors
	/// Propagates the underlying driver's read failure.
	fn read(&self, tile: &Tile) -> Result<RasterArray>;
}

/// Baselevel interpolation settings: the zoom range a process function is
/// actually invoked for, plus the resampling used to derive tiles above and
/// below that range from already-written output.
pub struct Baselevels {
	pub zooms: RangeInclusive<u8>,
	pub lower: Resampling,
	pub higher: Resampling,
	/// The pyramid baselevel tiles are addressed against — carries the
	/// output pyramid's pixelbuffer but the process pyramid's metatiling,
	/// matching the original's performance-motivated hybrid (overview tiles
	/// don't need the process pyramid's pixelbuffer).
	pub pyramid: TilePyramid,
}

/// Everything [`crate::TileTask::new`] needs to build one tile's task, with
/// per-tile resolution (which inputs bind, which process params apply)
/// delegated to closures a scheduler supplies rather than looked up through
/// a shared config object.
pub struct TileTaskConfig {
	pub zoom_levels: Vec<u8>,
	pub baselevels: Option<Baselevels>,
	pub mode: ProcessMode,
	pub process: ProcessFn,
	pub inputs_for_tile: Arc<dyn Fn(&Tile) -> ProcessInputs + Send + Sync>,
	pub process_func_params: Arc<dyn Fn(u8) -> HashMap<String, Value> + Send + Sync>,
	pub output_params: HashMap<String, Value>,
	pub output_reader: Option<Arc<dyn OutputReader>>,
}
