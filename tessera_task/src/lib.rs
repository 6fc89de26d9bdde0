//! Per-tile process execution: the unit of work a scheduler submits to an
//! executor, and the small result model ([`TaskOutcome`]) callers match on
//! instead of catching exceptions the way the original does.

mod batch;
mod config;
mod geometric;
mod output;
mod result;
mod task;
mod tile_batch;
mod tile_task;

pub use batch::{IntersectionQuery, TaskBatch};
pub use config::{Baselevels, OutputReader, ProcessContext, ProcessFn, ProcessInputs, ProcessMode, TileTaskConfig};
pub use geometric::Geometric;
pub use output::TaskOutput;
pub use result::{TaskOutcome, TaskResult};
pub use task::{Extent, Task, TaskFn};
pub use tile_batch::{TileIntersectionQuery, TileTaskBatch};
pub use tile_task::TileTask;
