//! Generic processing task: a unit of work with an id, a function, and
//! optionally a spatial extent used to build dependencies between tasks.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::Result;
use tessera_core::Bounds;
use tessera_geometry::geo::Geometry;
use uuid::Uuid;

use crate::geometric::Geometric;
use crate::result::TaskResult;

/// A task's function: takes the finished results of its declared
/// dependencies and produces an arbitrary value. Generic processing tasks
/// (preprocessing: vector caching, memory caching, …) don't share a single
/// output shape the way `TileTask` does, so the return type is left to the
/// caller to downcast via `TaskResult::data`.
pub type TaskFn = Arc<dyn Fn(&HashMap<String, TaskResult>) -> Result<crate::TaskOutput> + Send + Sync>;

/// Either a caller-supplied geometry or a bounds rectangle, never both —
/// mirrors the original's `ValueError("only provide one of either...")`
/// check, enforced here at construction instead of at attribute-access
/// time.
pub enum Extent {
	None,
	Geometry(Geometry),
	Bounds(Bounds),
}

/// Generic processing task. Can optionally carry spatial properties, which
/// lets a [`crate::TaskBatch`] answer `intersection` queries against it.
#[derive(Clone)]
pub struct Task {
	pub id: String,
	func: TaskFn,
	geometry: Option<Geometry>,
	bounds: Option<Bounds>,
	dependency_ids: HashSet<String>,
}

impl Task {
	/// # Errors
	/// Propagates whatever building a bounds-derived geometry can fail on
	/// (it can't today, but mirrors [`Bounds::new`]'s fallibility).
	pub fn new(id: Option<String>, func: TaskFn, extent: Extent) -> Result<Self> {
		let (geometry, bounds) = match extent {
			Extent::None => (None, None),
			Extent::Geometry(geometry) => {
				let bounds = geometry.compute_bounds().map(|b| Bounds::new(b[0], b[1], b[2], b[3])).transpose()?;
				(Some(geometry), bounds)
			}
			Extent::Bounds(bounds) => {
				let ring: Vec<[f64; 2]> = bounds.exterior_ring().into_iter().map(|(x, y)| [x, y]).collect();
				(Some(Geometry::new_polygon(vec![ring])), Some(bounds))
			}
		};
		Ok(Task { id: id.unwrap_or_else(|| Uuid::new_v4().simple().to_string()), func, geometry, bounds, dependency_ids: HashSet::new() })
	}

	/// Merges `ids` into this task's declared dependency set — the
	/// non-spatial half of dependency wiring a scheduler may use alongside
	/// [`crate::TaskBatch::intersection`].
	pub fn add_dependencies(&mut self, ids: impl IntoIterator<Item = String>) {
		self.dependency_ids.extend(ids);
	}

	#[must_use]
	pub fn dependency_ids(&self) -> &HashSet<String> {
		&self.dependency_ids
	}

	/// Runs this task's function against `dependencies`, with no
	/// transformation of either: the function closes over whatever
	/// arguments it needs.
	///
	/// # Errors
	/// Propagates the function's own error.
	pub fn execute(&self, dependencies: &HashMap<String, TaskResult>) -> Result<crate::TaskOutput> {
		(self.func)(dependencies)
	}
}

impl Geometric for Task {
	fn geometry(&self) -> Option<&Geometry> {
		self.geometry.as_ref()
	}

	fn bounds(&self) -> Option<Bounds> {
		self.bounds
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::TaskOutput;

	fn noop_fn() -> TaskFn {
		Arc::new(|_deps| Ok(TaskOutput::Empty))
	}

	#[test]
	fn generates_a_fresh_id_when_none_given() {
		let a = Task::new(None, noop_fn(), Extent::None).unwrap();
		let b = Task::new(None, noop_fn(), Extent::None).unwrap();
		assert_ne!(a.id, b.id);
	}

	#[test]
	fn keeps_explicit_id() {
		let task = Task::new(Some("mine".into()), noop_fn(), Extent::None).unwrap();
		assert_eq!(task.id, "mine");
	}

	#[test]
	fn bounds_extent_derives_a_rectangle_geometry() {
		let bounds = Bounds::new(0.0, 0.0, 10.0, 10.0).unwrap();
		let task = Task::new(None, noop_fn(), Extent::Bounds(bounds)).unwrap();
		assert!(task.has_geometry());
		assert_eq!(task.bounds(), Some(bounds));
	}

	#[test]
	fn no_extent_means_no_geometry() {
		let task = Task::new(None, noop_fn(), Extent::None).unwrap();
		assert!(!task.has_geometry());
		assert!(task.bounds().is_none());
	}

	#[test]
	fn execute_runs_the_function() {
		let task = Task::new(None, Arc::new(|_| Ok(TaskOutput::Vector(Vec::new()))), Extent::None).unwrap();
		let out = task.execute(&HashMap::new()).unwrap();
		assert!(out.as_vector().is_some());
	}

	#[test]
	fn add_dependencies_accumulates() {
		let mut task = Task::new(None, noop_fn(), Extent::None).unwrap();
		task.add_dependencies(["a".to_string()]);
		task.add_dependencies(["b".to_string()]);
		assert_eq!(task.dependency_ids().len(), 2);
	}
}
