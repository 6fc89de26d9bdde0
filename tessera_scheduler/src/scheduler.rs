//! Run orchestration: preprocessing first, then one [`TileTaskBatch`] per
//! zoom level, high to low, each submitted to an [`Executor`] and its
//! outcomes routed to an [`OutputWriter`].
//!
//! Grounded on `original_source/mapchete/_tasks.py`'s `TaskBatch`/
//! `TileTaskBatch` construction and `original_source/mapchete/_distributed.py`'s
//! `Executor.as_completed` consumption loop, rewired onto this workspace's
//! `futures`-stream idiom instead of a generator.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use futures::StreamExt;
use tessera_core::{Bounds, EngineError, Tile, TilePyramid};
use tessera_derive::context;
use tessera_executor::{CancellationToken, Executor};
use tessera_task::{ProcessMode, Task, TaskOutcome, TaskResult, TileIntersectionQuery, TileTask, TileTaskBatch, TileTaskConfig};

use crate::config::ProcessConfig;
use crate::output_writer::OutputWriter;
use crate::report::RunReport;

/// Drives one process run end to end.
///
/// `config.zoom_levels` and `tile_task_config.zoom_levels` describe the
/// same processed range and must agree — callers build both from the same
/// source rather than this type reconciling two copies.
pub struct Scheduler {
	config: ProcessConfig,
	tile_task_config: Arc<TileTaskConfig>,
	preprocessing_tasks: Vec<Task>,
	output_writer: Arc<dyn OutputWriter>,
	executor: Executor,
	cancellation: CancellationToken,
}

impl Scheduler {
	#[must_use]
	pub fn new(
		config: ProcessConfig,
		tile_task_config: Arc<TileTaskConfig>,
		preprocessing_tasks: Vec<Task>,
		output_writer: Arc<dyn OutputWriter>,
		executor: Executor,
	) -> Self {
		Scheduler { config, tile_task_config, preprocessing_tasks, output_writer, executor, cancellation: CancellationToken::new() }
	}

	/// A handle a caller can use to cancel this run from outside (e.g. on
	/// `Ctrl-C`) without holding a `&mut Scheduler`.
	#[must_use]
	pub fn cancellation(&self) -> CancellationToken {
		self.cancellation.clone()
	}

	/// Runs preprocessing, then every configured zoom level from finest to
	/// coarsest, writing each task's output as it completes.
	///
	/// Baselevel zooms *below* the processed range derive their data from
	/// the immediately finer zoom's in-memory results, which is why zooms
	/// run high to low: each batch's dependencies come from the batch just
	/// finished. Baselevel zooms *above* the processed range instead read
	/// their parent tile back from the output store directly (see
	/// `TileTask::interpolate_higher`) — they don't depend on in-memory
	/// carry-forward, but do depend on that parent having already been
	/// durably written, which this single high-to-low pass does not
	/// guarantee within one run. A config that needs both directions at
	/// once isn't supported; see DESIGN.md.
	///
	/// # Errors
	/// Propagates pyramid/bounds construction failures, or a worker join
	/// failure surfaced through [`tessera_executor::FinishedTask::result`].
	#[context("process run failed (zoom_levels={:?})", self.config.zoom_levels)]
	pub async fn run(&self) -> Result<RunReport> {
		let spec = &self.config.process_pyramid;
		let pyramid = TilePyramid::new(spec.grid_type, spec.tile_size, spec.metatiling)?;
		let region = match self.config.bounds {
			Some((left, bottom, right, top)) => Bounds::new(left, bottom, right, top)?,
			None => pyramid.world_bounds(),
		};

		let mut report = RunReport::default();
		let preprocessing_results = self.run_preprocessing(&mut report).await?;
		if self.cancellation.is_cancelled() {
			return Ok(report);
		}

		let mut zooms = self.config.zoom_levels.clone();
		zooms.sort_unstable();
		zooms.reverse();

		let mut previous_batch: Option<TileTaskBatch> = None;
		let mut previous_results: HashMap<Tile, TaskResult> = HashMap::new();

		for zoom in zooms {
			if self.cancellation.is_cancelled() {
				break;
			}
			let Some(batch) = self.build_batch(&pyramid, zoom, &region)? else {
				previous_batch = None;
				previous_results = HashMap::new();
				continue;
			};

			let jobs = self.wire_dependencies(&pyramid, &batch, &preprocessing_results, previous_batch.as_ref(), &previous_results)?;
			log::info!("processing zoom {zoom}: {} tile(s)", jobs.len());

			let zoom_results = self.submit_and_collect(jobs, &mut report).await?;
			previous_batch = Some(batch);
			previous_results = zoom_results;
		}

		Ok(report)
	}

	fn build_batch(&self, pyramid: &TilePyramid, zoom: u8, region: &Bounds) -> Result<Option<TileTaskBatch>> {
		let coords = pyramid.tiles_from_bounds(zoom, region)?;
		if coords.is_empty() {
			return Ok(None);
		}
		let tasks: Vec<TileTask> = coords
			.into_iter()
			.map(|(row, col)| -> Result<TileTask> { Ok(TileTask::new(pyramid.tile(zoom, row, col)?, None, &self.tile_task_config, false)) })
			.collect::<Result<_>>()?;
		Ok(Some(TileTaskBatch::new(tasks, None)?))
	}

	/// Per-task dependency maps: preprocessing results (keyed by the
	/// producing task's own id — by convention `"<input_key>:<task_id>"`
	/// when that result feeds a process input, which is what
	/// `TileTask::execute` splits on) merged with whichever finer-zoom
	/// results this task's children produced, keyed by their task id so
	/// [`TileTask::execute`]'s `tile_task`-prefix filter skips them when
	/// assembling preprocessing inputs.
	fn wire_dependencies(
		&self,
		pyramid: &TilePyramid,
		batch: &TileTaskBatch,
		preprocessing_results: &HashMap<String, TaskResult>,
		previous_batch: Option<&TileTaskBatch>,
		previous_results: &HashMap<Tile, TaskResult>,
	) -> Result<Vec<(TileTask, HashMap<String, TaskResult>)>> {
		let mut jobs = Vec::with_capacity(batch.len());
		for task in batch.iter() {
			let mut deps = preprocessing_results.clone();
			if let Some(prev) = previous_batch {
				for dep_task in prev.intersection(pyramid, &TileIntersectionQuery::TileTask(task))? {
					if let Some(dep_result) = previous_results.get(&dep_task.tile) {
						deps.insert(dep_task.id.clone(), dep_result.clone());
					}
				}
			}
			jobs.push((task.clone(), deps));
		}
		Ok(jobs)
	}

	async fn submit_and_collect(&self, jobs: Vec<(TileTask, HashMap<String, TaskResult>)>, report: &mut RunReport) -> Result<HashMap<Tile, TaskResult>> {
		let mut stream = self.executor.as_completed(
			jobs.into_iter(),
			|(task, deps): (TileTask, HashMap<String, TaskResult>)| -> std::result::Result<TaskResult, EngineError> {
				Ok(TaskResult::new(task.id.clone(), Some(task.tile.clone()), task.execute(&deps)))
			},
			self.cancellation.clone(),
		);

		let mut zoom_results = HashMap::new();
		while let Some(finished) = stream.next().await {
			let result = finished.result()?;
			self.route_outcome(&result, report);
			if let Some(tile) = result.tile.clone() {
				zoom_results.insert(tile, result);
			}
		}
		Ok(zoom_results)
	}

	async fn run_preprocessing(&self, report: &mut RunReport) -> Result<HashMap<String, TaskResult>> {
		let mut results = HashMap::new();
		if self.preprocessing_tasks.is_empty() {
			return Ok(results);
		}
		log::info!("running {} preprocessing task(s)", self.preprocessing_tasks.len());

		let mut stream = self.executor.as_completed(
			self.preprocessing_tasks.clone().into_iter(),
			|task: Task| -> std::result::Result<TaskResult, EngineError> {
				let id = task.id.clone();
				let outcome = match task.execute(&HashMap::new()) {
					Ok(output) => TaskOutcome::Written(output),
					Err(e) => TaskOutcome::Failed(EngineError::ProcessException(e.to_string())),
				};
				Ok(TaskResult::new(id, None, outcome))
			},
			self.cancellation.clone(),
		);

		while let Some(finished) = stream.next().await {
			let result = finished.result()?;
			self.route_outcome(&result, report);
			results.insert(result.task_id.clone(), result);
		}
		Ok(results)
	}

	fn route_outcome(&self, result: &TaskResult, report: &mut RunReport) {
		match &result.outcome {
			TaskOutcome::Written(output) => {
				let write_failed = match &result.tile {
					Some(tile) => match self.output_writer.write(tile, output) {
						Ok(()) => false,
						Err(e) => {
							log::error!("{}: failed to write output: {e:#}", tile.path_segment());
							report.failed.push((result.task_id.clone(), EngineError::Io(e.to_string())));
							true
						}
					},
					None => false,
				};
				if !write_failed {
					report.written += 1;
				} else {
					self.cancel_unless_continuing();
				}
			}
			TaskOutcome::Empty => report.empty += 1,
			TaskOutcome::Skipped(_) => report.skipped += 1,
			TaskOutcome::Failed(e) => {
				report.failed.push((result.task_id.clone(), e.clone()));
				self.cancel_unless_continuing();
			}
		}
	}

	fn cancel_unless_continuing(&self) {
		if self.config.mode != ProcessMode::Continue {
			self.cancellation.cancel();
		}
	}
}
