//! A group of [`TileTask`]s addressed to one zoom level of one pyramid,
//! keyed by tile so a scheduler can look results up by coordinate and wire
//! dependencies between adjacent zoom levels.

use std::collections::HashMap;

use anyhow::{Result, bail};
use tessera_core::{Bounds, Tile, TilePyramid};

use crate::geometric::Geometric;
use crate::tile_task::TileTask;

/// What a [`TileTaskBatch::intersection`] query can be given.
pub enum TileIntersectionQuery<'a> {
	TileTask(&'a TileTask),
	Bounds(Bounds),
}

/// A batch of tile tasks, all sharing one pyramid and one zoom level —
/// the unit a scheduler submits together and wires dependencies between.
pub struct TileTaskBatch {
	pub id: String,
	tasks: HashMap<Tile, TileTask>,
	bounds: Option<Bounds>,
	zoom: Option<u8>,
	pyramid_id: Option<String>,
}

impl TileTaskBatch {
	/// # Errors
	/// Returns an error if `tasks` is empty, or if its members don't all
	/// share one pyramid id and zoom level.
	pub fn new(tasks: Vec<TileTask>, id: Option<String>) -> Result<Self> {
		if tasks.is_empty() {
			bail!("TileTaskBatch requires at least one TileTask");
		}
		let mut zoom = None;
		let mut pyramid_id: Option<String> = None;
		for task in &tasks {
			match zoom {
				None => zoom = Some(task.tile.zoom()),
				Some(z) if z == task.tile.zoom() => {}
				Some(_) => bail!("TileTaskBatch members must share one zoom level"),
			}
			match &pyramid_id {
				None => pyramid_id = Some(task.tile.pyramid_id().to_string()),
				Some(p) if p == task.tile.pyramid_id() => {}
				Some(_) => bail!("TileTaskBatch members must share one pyramid"),
			}
		}
		let bounds = tasks.iter().filter_map(Geometric::bounds).reduce(|a, b| a + b);
		let tasks = tasks.into_iter().map(|task| (task.tile.clone(), task)).collect();
		Ok(TileTaskBatch { id: id.unwrap_or_else(|| format!("tile_task_batch_{}", uuid::Uuid::new_v4().simple())), tasks, bounds, zoom, pyramid_id })
	}

	#[must_use]
	pub fn bounds(&self) -> Option<Bounds> {
		self.bounds
	}

	#[must_use]
	pub fn zoom(&self) -> Option<u8> {
		self.zoom
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.tasks.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.tasks.is_empty()
	}

	#[must_use]
	pub fn get(&self, tile: &Tile) -> Option<&TileTask> {
		self.tasks.get(tile)
	}

	pub fn iter(&self) -> impl Iterator<Item = &TileTask> {
		self.tasks.values()
	}

	/// Members intersecting `query`.
	///
	/// When `query` is a [`TileTask`] exactly one zoom level coarser than
	/// this batch and from the same pyramid, the coarser tile's children —
	/// not merely its bounding-box overlap — are returned, since that's the
	/// exact dependency set baselevel-lower interpolation needs.
	///
	/// # Errors
	/// Propagates `pyramid`'s child-tile lookup failing.
	pub fn intersection(&self, pyramid: &TilePyramid, query: &TileIntersectionQuery) -> Result<Vec<&TileTask>> {
		if let TileIntersectionQuery::TileTask(other) = query {
			let same_pyramid = self.pyramid_id.as_deref() == Some(other.tile.pyramid_id());
			let one_zoom_finer = self.zoom == Some(other.tile.zoom() + 1);
			if same_pyramid && one_zoom_finer {
				let children = pyramid.get_children(&other.tile)?;
				return Ok(children.iter().filter_map(|child| self.tasks.get(child)).collect());
			}
		}

		let query_bounds = match query {
			TileIntersectionQuery::TileTask(other) => Some(*other.tile.bounds()),
			TileIntersectionQuery::Bounds(bounds) => Some(*bounds),
		};
		let Some(query_bounds) = query_bounds else {
			return Ok(Vec::new());
		};
		Ok(self.tasks.values().filter(|task| task.bounds().is_some_and(|b| b.intersects(&query_bounds))).collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::{ProcessInputs, ProcessMode, TileTaskConfig};
	use crate::output::TaskOutput;
	use std::sync::Arc;
	use tessera_core::GridType;

	fn config() -> Arc<TileTaskConfig> {
		Arc::new(TileTaskConfig {
			zoom_levels: vec![0, 1, 2, 3],
			baselevels: None,
			mode: ProcessMode::Memory,
			process: Arc::new(|_ctx| Ok(Some(TaskOutput::Vector(Vec::new())))),
			inputs_for_tile: Arc::new(|_tile| ProcessInputs::new()),
			process_func_params: Arc::new(|_zoom| std::collections::HashMap::new()),
			output_params: std::collections::HashMap::new(),
			output_reader: None,
		})
	}

	fn pyramid() -> TilePyramid {
		TilePyramid::new(GridType::Geodetic, 256, 1).unwrap()
	}

	#[test]
	fn rejects_mixed_zoom_levels() {
		let pyramid = pyramid();
		let config = config();
		let a = TileTask::new(pyramid.tile(1, 0, 0).unwrap(), None, &config, false);
		let b = TileTask::new(pyramid.tile(2, 0, 0).unwrap(), None, &config, false);
		assert!(TileTaskBatch::new(vec![a, b], None).is_err());
	}

	#[test]
	fn looks_up_tasks_by_tile() {
		let pyramid = pyramid();
		let config = config();
		let tile = pyramid.tile(1, 0, 0).unwrap();
		let task = TileTask::new(tile.clone(), None, &config, false);
		let batch = TileTaskBatch::new(vec![task], None).unwrap();
		assert!(batch.get(&tile).is_some());
	}

	#[test]
	fn intersection_with_parent_returns_children() {
		let pyramid = pyramid();
		let config = config();
		let parent_tile = pyramid.tile(1, 0, 0).unwrap();
		let children = pyramid.get_children(&parent_tile).unwrap();
		let child_tasks: Vec<TileTask> = children.iter().map(|c| TileTask::new(c.clone(), None, &config, false)).collect();
		let batch = TileTaskBatch::new(child_tasks, None).unwrap();

		let parent_task = TileTask::new(parent_tile, None, &config, false);
		let found = batch.intersection(&pyramid, &TileIntersectionQuery::TileTask(&parent_task)).unwrap();
		assert_eq!(found.len(), children.len());
	}
}
