//! A named group of independent [`Task`]s sharing one combined bounds,
//! answering the dependency-wiring queries a scheduler needs between
//! adjacent batches.

use anyhow::{Result, bail};
use tessera_core::Bounds;
use uuid::Uuid;

use crate::geometric::Geometric;
use crate::task::Task;

/// What a [`TaskBatch::intersection`] query can be given.
pub enum IntersectionQuery<'a> {
	Task(&'a Task),
	Bounds(Bounds),
}

/// A batch of independent, non-tile-addressed tasks — typically the
/// preprocessing batch a scheduler run starts with (one task per input
/// binding that registers preprocessing work, e.g. vector caching).
pub struct TaskBatch {
	pub id: String,
	tasks: Vec<Task>,
	bounds: Option<Bounds>,
}

impl TaskBatch {
	/// # Errors
	/// Returns an error if `tasks` is empty — a batch with no members isn't
	/// meaningful to schedule.
	pub fn new(tasks: Vec<Task>, id: Option<String>) -> Result<Self> {
		if tasks.is_empty() {
			bail!("TaskBatch requires at least one Task");
		}
		let bounds = tasks.iter().filter_map(Geometric::bounds).reduce(|a, b| a + b);
		Ok(TaskBatch { id: id.unwrap_or_else(|| Uuid::new_v4().simple().to_string()), tasks, bounds })
	}

	#[must_use]
	pub fn bounds(&self) -> Option<Bounds> {
		self.bounds
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.tasks.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.tasks.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Task> {
		self.tasks.iter()
	}

	/// Members whose bounds intersect `query`'s.
	pub fn intersection(&self, query: &IntersectionQuery) -> Vec<&Task> {
		let query_bounds = match query {
			IntersectionQuery::Task(task) => task.bounds(),
			IntersectionQuery::Bounds(bounds) => Some(*bounds),
		};
		let Some(query_bounds) = query_bounds else {
			return Vec::new();
		};
		self.tasks.iter().filter(|task| task.bounds().is_some_and(|b| b.intersects(&query_bounds))).collect()
	}
}
