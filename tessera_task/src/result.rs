//! The result of running one task, and the closed set of outcomes a
//! [`crate::TileTask`] can end in.

use tessera_core::{EngineError, Tile};

use crate::output::TaskOutput;

/// What executing a task produced, replacing the original's
/// exception-for-empty control flow (raising `MapcheteNodataTile` to signal
/// "no data") with an ordinary return value every caller can match on.
#[derive(Debug, Clone)]
pub enum TaskOutcome {
	/// The process function produced data to write.
	Written(TaskOutput),
	/// The tile legitimately has nothing to write (sentinel `"empty"`
	/// return, or its zoom falls outside the configured levels).
	Empty,
	/// The task was never run — `skip` was set, or a dependency it needed
	/// never completed. Carries a human-readable reason.
	Skipped(String),
	/// The process function errored, or its output was structurally
	/// invalid (e.g. `None`/unit where a value was required).
	Failed(EngineError),
}

impl TaskOutcome {
	#[must_use]
	pub fn is_written(&self) -> bool {
		matches!(self, TaskOutcome::Written(_))
	}

	#[must_use]
	pub fn message(&self) -> Option<String> {
		match self {
			TaskOutcome::Written(_) => None,
			TaskOutcome::Empty => Some("no data for this tile".to_string()),
			TaskOutcome::Skipped(reason) => Some(reason.clone()),
			TaskOutcome::Failed(err) => Some(err.to_string()),
		}
	}
}

/// A task's identity plus its finished outcome — what one batch hands the
/// next as its `dependencies` map, keyed by [`crate::Task::id`].
///
/// `message` carries the same human-readable skip/empty reason
/// [`TaskOutcome::message`] does, surfaced separately so callers don't have
/// to re-match on `outcome` just to log it.
#[derive(Debug, Clone)]
pub struct TaskResult {
	pub task_id: String,
	pub tile: Option<Tile>,
	pub outcome: TaskOutcome,
	pub message: Option<String>,
}

impl TaskResult {
	#[must_use]
	pub fn new(task_id: impl Into<String>, tile: Option<Tile>, outcome: TaskOutcome) -> Self {
		let message = outcome.message();
		TaskResult { task_id: task_id.into(), tile, outcome, message }
	}

	/// The produced data, if the task actually wrote something.
	#[must_use]
	pub fn data(&self) -> Option<&TaskOutput> {
		match &self.outcome {
			TaskOutcome::Written(data) => Some(data),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn message_is_none_for_written_outcome() {
		let result = TaskResult::new("t1", None, TaskOutcome::Written(TaskOutput::Vector(Vec::new())));
		assert!(result.message.is_none());
	}

	#[test]
	fn message_carries_skip_reason() {
		let result = TaskResult::new("t1", None, TaskOutcome::Skipped("marked skip".into()));
		assert_eq!(result.message.as_deref(), Some("marked skip"));
	}

	#[test]
	fn data_is_none_unless_written() {
		let result = TaskResult::new("t1", None, TaskOutcome::Empty);
		assert!(result.data().is_none());
	}
}
