//! Parallel worker executor: a thread pool or a (falls-back-to-local)
//! distributed strategy, streaming results in completion order with
//! cooperative cancellation.

mod cancellation;
mod executor;
mod finished_task;

pub use cancellation::CancellationToken;
pub use executor::Executor;
pub use finished_task::FinishedTask;
