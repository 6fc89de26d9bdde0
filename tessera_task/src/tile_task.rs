//! A task bound to one process tile: validates its zoom against the
//! configured levels, runs baselevel interpolation outside the processed
//! range, or calls the user process function inside it.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tessera_core::{Bounds, EngineError, Tile};
use tessera_geometry::geo::Geometry;
use tessera_io::{RasterArray, Resampling, create_mosaic, resample_from_array};

use crate::config::{Baselevels, ProcessContext, TileTaskConfig};
use crate::geometric::Geometric;
use crate::output::TaskOutput;
use crate::result::{TaskOutcome, TaskResult};

fn bbox_geometry(bounds: Bounds) -> Geometry {
	let ring: Vec<[f64; 2]> = bounds.exterior_ring().into_iter().map(|(x, y)| [x, y]).collect();
	Geometry::new_polygon(vec![ring])
}

/// A process task addressed to a single tile of a process pyramid.
///
/// If `skip` is set, the task carries no configuration at all and
/// [`TileTask::execute`] returns [`TaskOutcome::Skipped`] without touching
/// it — the Rust equivalent of the original zeroing out every attribute.
///
/// Cheap to clone: the only heap data is an `Arc`-shared config and small
/// per-tile maps, which a scheduler needs when handing owned tasks off to
/// an executor's worker pool.
#[derive(Clone)]
pub struct TileTask {
	pub id: String,
	pub tile: Tile,
	pub skip: bool,
	config: Option<Arc<TileTaskConfig>>,
	input: HashMap<String, serde_json::Value>,
	process_func_params: HashMap<String, serde_json::Value>,
	output_params: HashMap<String, serde_json::Value>,
	geometry: Geometry,
	bounds: Bounds,
}

impl TileTask {
	#[must_use]
	pub fn new(tile: Tile, id: Option<String>, config: &Arc<TileTaskConfig>, skip: bool) -> Self {
		let id = id.unwrap_or_else(|| format!("tile_task_{}-{}-{}", tile.zoom(), tile.row(), tile.col()));
		let bounds = *tile.bounds();
		let geometry = bbox_geometry(bounds);

		if skip {
			return TileTask {
				id,
				tile,
				skip,
				config: None,
				input: HashMap::new(),
				process_func_params: HashMap::new(),
				output_params: HashMap::new(),
				geometry,
				bounds,
			};
		}

		// Zooms outside the configured levels, or within a configured
		// baselevel's interpolated range, never call the process function —
		// resolving real inputs for them would be wasted I/O.
		let is_interpolated = config.baselevels.as_ref().is_some_and(|b| !b.zooms.contains(&tile.zoom()));
		let needs_no_inputs = !config.zoom_levels.contains(&tile.zoom()) || is_interpolated;

		let (input, process_func_params, output_params) = if needs_no_inputs {
			(HashMap::new(), HashMap::new(), HashMap::new())
		} else {
			((config.inputs_for_tile)(&tile), (config.process_func_params)(tile.zoom()), config.output_params.clone())
		};

		TileTask { id, tile, skip, config: Some(Arc::clone(config)), input, process_func_params, output_params, geometry, bounds }
	}

	/// Runs this tile's task and returns the outcome. Never panics or
	/// propagates an error — failures are folded into
	/// [`TaskOutcome::Failed`], the way REDESIGN FLAG 6 replaces
	/// exception-based empty/failure signaling.
	#[must_use]
	pub fn execute(&self, dependencies: &HashMap<String, TaskResult>) -> TaskOutcome {
		if self.skip {
			return TaskOutcome::Skipped("task marked skip".into());
		}
		let Some(config) = &self.config else {
			return TaskOutcome::Skipped("task marked skip".into());
		};
		if !config.zoom_levels.contains(&self.tile.zoom()) {
			return TaskOutcome::Empty;
		}

		if let Some(baselevels) = &config.baselevels {
			if self.tile.zoom() < *baselevels.zooms.start() {
				return self.finish_baselevel(self.interpolate_lower(baselevels, dependencies));
			}
			if self.tile.zoom() > *baselevels.zooms.end() {
				return self.finish_baselevel(self.interpolate_higher(baselevels));
			}
		}

		self.run_process(config, dependencies)
	}

	fn finish_baselevel(&self, result: Result<RasterArray>) -> TaskOutcome {
		match result {
			Ok(array) => TaskOutcome::Written(TaskOutput::Raster(array)),
			Err(e) => TaskOutcome::Failed(EngineError::ProcessException(e.to_string())),
		}
	}

	fn run_process(&self, config: &Arc<TileTaskConfig>, dependencies: &HashMap<String, TaskResult>) -> TaskOutcome {
		let mut preprocessing_results = HashMap::new();
		for (task_key, task_result) in dependencies {
			if task_key.starts_with("tile_task") {
				continue;
			}
			let mut parts = task_key.splitn(2, ':');
			let inp_key = parts.next().unwrap_or_default();
			let rest = parts.next().unwrap_or_default();
			if rest.is_empty() {
				return TaskOutcome::Failed(EngineError::Config(format!("malformed task key: {task_key}")));
			}
			if let TaskOutcome::Failed(_) = &task_result.outcome {
				return TaskOutcome::Skipped(format!("preprocessing dependency {task_key} failed"));
			}
			if let Some(data) = task_result.data() {
				preprocessing_results.insert(format!("{inp_key}:{rest}"), data.clone());
			}
		}

		let ctx = ProcessContext {
			tile: &self.tile,
			params: &self.process_func_params,
			inputs: &self.input,
			output_params: &self.output_params,
			preprocessing_results: &preprocessing_results,
		};

		match (config.process)(&ctx) {
			Ok(Some(output)) if output.is_empty() => TaskOutcome::Empty,
			Ok(Some(output)) => TaskOutcome::Written(output),
			Ok(None) => TaskOutcome::Failed(EngineError::ProcessOutput("process output is empty".into())),
			Err(e) => {
				log::error!("{}: exception in user process: {e:#}", self.tile.path_segment());
				TaskOutcome::Failed(EngineError::ProcessException(e.to_string()))
			}
		}
	}

	/// Derives this (coarser) tile's data by mosaicking and downsampling its
	/// children's already-computed results, reading from the output store
	/// wherever a dependency didn't provide one.
	fn interpolate_lower(&self, baselevels: &Baselevels, dependencies: &HashMap<String, TaskResult>) -> Result<RasterArray> {
		let Some(output_reader) = &self.output_reader() else {
			anyhow::bail!("baselevel interpolation requires an output reader");
		};
		let tile = baselevels.pyramid.tile(self.tile.zoom(), self.tile.row(), self.tile.col())?;
		let nodata = output_reader.nodata();
		let output_pyramid = output_reader.pyramid();

		let output_tile_coords = output_pyramid.tiles_from_bounds(tile.zoom(), tile.bounds())?;
		let output_tiles: Vec<Tile> =
			output_tile_coords.into_iter().map(|(row, col)| output_pyramid.tile(tile.zoom(), row, col)).collect::<Result<_>>()?;

		let mut src_tiles: HashMap<Tile, RasterArray> = HashMap::new();
		for task_result in dependencies.values() {
			let (Some(process_tile), Some(data)) = (&task_result.tile, task_result.data().and_then(TaskOutput::as_raster)) else {
				continue;
			};
			log::debug!("reading output from dependent tasks for baselevel {}", self.tile.path_segment());
			for (row, col) in output_pyramid.intersecting(process_tile.zoom(), process_tile)? {
				let output_tile = output_pyramid.tile(process_tile.zoom(), row, col)?;
				let extracted = resample_from_array(data, process_tile.affine(), &output_tile, Resampling::NearestNeighbour, nodata)?;
				src_tiles.insert(output_tile, extracted);
			}
		}

		let child_tiles: Vec<Tile> = if output_reader.pixelbuffer() > 0 {
			let mut children = Vec::new();
			for output_tile in &output_tiles {
				let coords = output_pyramid.tiles_from_bounds(output_tile.zoom() + 1, output_tile.bounds())?;
				for (row, col) in coords {
					children.push(output_pyramid.tile(output_tile.zoom() + 1, row, col)?);
				}
			}
			children
		} else {
			let mut children = Vec::new();
			for output_tile in &output_tiles {
				children.extend(output_pyramid.get_children(output_tile)?);
			}
			children
		};

		for child_tile in child_tiles {
			if !src_tiles.contains_key(&child_tile) {
				let data = output_reader.read(&child_tile)?;
				src_tiles.insert(child_tile, data);
			}
		}

		let tiles: Vec<(Tile, RasterArray)> = src_tiles.into_iter().collect();
		let (mosaic, mosaic_affine) = create_mosaic(&tiles, nodata)?;
		let result = resample_from_array(&mosaic, mosaic_affine, &self.tile, baselevels.lower, nodata);
		log::debug!("{}: generated from baselevel (lower)", self.tile.path_segment());
		result
	}

	/// Derives this (finer) tile's data by resampling its already-written
	/// parent tile down.
	fn interpolate_higher(&self, baselevels: &Baselevels) -> Result<RasterArray> {
		let Some(output_reader) = &self.output_reader() else {
			anyhow::bail!("baselevel interpolation requires an output reader");
		};
		let parent_tile =
			baselevels.pyramid.get_parent(&self.tile)?.ok_or_else(|| anyhow::anyhow!("tile {} has no parent to interpolate from", self.tile.path_segment()))?;
		let parent_data = output_reader.read(&parent_tile)?;
		let result = resample_from_array(&parent_data, parent_tile.affine(), &self.tile, baselevels.higher, output_reader.nodata());
		log::debug!("{}: generated from baselevel (higher)", self.tile.path_segment());
		result
	}

	fn output_reader(&self) -> Option<Arc<dyn crate::config::OutputReader>> {
		self.config.as_ref().and_then(|c| c.output_reader.clone())
	}
}

impl Geometric for TileTask {
	fn geometry(&self) -> Option<&Geometry> {
		Some(&self.geometry)
	}

	fn bounds(&self) -> Option<Bounds> {
		Some(self.bounds)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::{ProcessInputs, ProcessMode};
	use std::sync::Arc;
	use tessera_core::{GridType, TilePyramid};

	fn config_with_process(process: crate::config::ProcessFn) -> Arc<TileTaskConfig> {
		Arc::new(TileTaskConfig {
			zoom_levels: vec![0, 1, 2, 3],
			baselevels: None,
			mode: ProcessMode::Memory,
			process,
			inputs_for_tile: Arc::new(|_tile| ProcessInputs::new()),
			process_func_params: Arc::new(|_zoom| HashMap::new()),
			output_params: HashMap::new(),
			output_reader: None,
		})
	}

	fn sample_config() -> Arc<TileTaskConfig> {
		config_with_process(Arc::new(|_ctx| Ok(Some(TaskOutput::Vector(Vec::new())))))
	}

	fn sample_tile(zoom: u8) -> Tile {
		TilePyramid::new(GridType::Geodetic, 256, 1).unwrap().tile(zoom, 0, 0).unwrap()
	}

	#[test]
	fn skip_flag_short_circuits_execution() {
		let config = sample_config();
		let task = TileTask::new(sample_tile(1), None, &config, true);
		let outcome = task.execute(&HashMap::new());
		assert!(matches!(outcome, TaskOutcome::Skipped(_)));
	}

	#[test]
	fn zoom_outside_configured_levels_is_empty() {
		let config = sample_config();
		let task = TileTask::new(sample_tile(9), None, &config, false);
		let outcome = task.execute(&HashMap::new());
		assert!(matches!(outcome, TaskOutcome::Empty));
	}

	#[test]
	fn process_output_is_written() {
		let config = sample_config();
		let task = TileTask::new(sample_tile(1), None, &config, false);
		let outcome = task.execute(&HashMap::new());
		assert!(outcome.is_written());
	}

	#[test]
	fn empty_sentinel_is_reported_as_empty() {
		let config = config_with_process(Arc::new(|_ctx| Ok(Some(TaskOutput::Empty))));
		let task = TileTask::new(sample_tile(1), None, &config, false);
		let outcome = task.execute(&HashMap::new());
		assert!(matches!(outcome, TaskOutcome::Empty));
	}

	#[test]
	fn none_output_is_a_process_output_failure() {
		let config = config_with_process(Arc::new(|_ctx| Ok(None)));
		let task = TileTask::new(sample_tile(1), None, &config, false);
		let outcome = task.execute(&HashMap::new());
		assert!(matches!(outcome, TaskOutcome::Failed(EngineError::ProcessOutput(_))));
	}

	#[test]
	fn process_error_becomes_process_exception() {
		let config = config_with_process(Arc::new(|_ctx| anyhow::bail!("boom")));
		let task = TileTask::new(sample_tile(1), None, &config, false);
		let outcome = task.execute(&HashMap::new());
		assert!(matches!(outcome, TaskOutcome::Failed(EngineError::ProcessException(_))));
	}

	#[test]
	fn failed_preprocessing_dependency_skips_instead_of_running() {
		let config = sample_config();
		let task = TileTask::new(sample_tile(1), None, &config, false);
		let mut deps = HashMap::new();
		deps.insert(
			"cache:pretask".to_string(),
			TaskResult::new("cache:pretask".into(), None, TaskOutcome::Failed(EngineError::ProcessException("boom".into()))),
		);
		let outcome = task.execute(&deps);
		assert!(matches!(outcome, TaskOutcome::Skipped(_)));
	}
}
