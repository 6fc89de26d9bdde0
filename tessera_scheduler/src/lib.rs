//! Turns a [`ProcessConfig`] plus a set of tasks into a finished
//! [`RunReport`]: builds the per-zoom [`tessera_task::TileTaskBatch`]es,
//! wires their dependencies, and drives them through a
//! [`tessera_executor::Executor`].

mod config;
mod output_writer;
mod report;
mod scheduler;

pub use config::{BaselevelsSpec, OutputSpec, ProcessConfig, PyramidSpec};
pub use output_writer::OutputWriter;
pub use report::RunReport;
pub use scheduler::Scheduler;
