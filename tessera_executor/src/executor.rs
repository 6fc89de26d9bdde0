//! Parallel worker strategy and its `as_completed` streaming contract.
//!
//! Grounded on the teacher's CPU-bound parallel pattern
//! (`versatiles_core::types::tile_stream::TileStream::from_iter_coord_parallel`):
//! `futures::stream::iter` + `tokio::task::spawn_blocking` + `buffer_unordered`.
//! No thread-pool or distributed-cluster crate (`rayon`, `dask`-equivalent)
//! exists anywhere in this workspace's dependency stack, so both executor
//! strategies are built on `futures`/`tokio` primitives the teacher already
//! depends on, rather than a fabricated dependency.

use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use tessera_core::{ConcurrencyLimits, EngineError};

use crate::cancellation::CancellationToken;
use crate::finished_task::FinishedTask;

/// A parallel worker strategy, chosen once at construction.
pub enum Executor {
	/// A local thread pool. `max_workers == 1` degrades [`Executor::as_completed`]
	/// to inline, sequential execution — no `spawn_blocking` overhead for a
	/// pool that can only ever run one task at a time anyway.
	ThreadPool { max_workers: usize },
	/// A remote scheduler reached by address. Since no distributed-cluster
	/// crate is part of this workspace's stack, this variant is honest about
	/// what it can actually do: [`Executor::distributed`] probes the address
	/// and, on success, tasks submitted here still run on the local thread
	/// pool sized to the machine's CPU-bound concurrency limit — there is no
	/// real remote dispatch to perform.
	Distributed { address: String },
}

impl Executor {
	#[must_use]
	pub fn thread_pool(max_workers: usize) -> Self {
		Executor::ThreadPool { max_workers: max_workers.max(1) }
	}

	/// Attempts to reach `address`; falls back to a local thread pool with a
	/// logged warning if it can't be reached. Mirrors the original's
	/// `Executor` choosing a `LocalCluster` when no explicit scheduler
	/// address resolves.
	pub async fn distributed(address: impl Into<String>) -> Self {
		let address = address.into();
		match tokio::net::TcpStream::connect(&address).await {
			Ok(_) => Executor::Distributed { address },
			Err(e) => {
				log::warn!("could not reach distributed scheduler at {address}: {e}; falling back to a local thread pool");
				Executor::ThreadPool { max_workers: ConcurrencyLimits::default().cpu_bound }
			}
		}
	}

	fn worker_limit(&self) -> usize {
		match self {
			Executor::ThreadPool { max_workers } => *max_workers,
			Executor::Distributed { .. } => ConcurrencyLimits::default().cpu_bound,
		}
	}

	/// Runs `func` over every item in `iter`, yielding a [`FinishedTask`] for
	/// each as it completes — in completion order, not submission order.
	/// `cancellation` is checked before each item is yielded; once set, the
	/// stream ends without waiting for, or yielding, anything still in
	/// flight. `fargs`/`fkwargs`/`chunksize` from the original's signature
	/// don't have a Rust equivalent: a closure already captures whatever
	/// extra context a call needs, and chunksize's IPC-batching rationale
	/// doesn't apply to a thread-pool executor that schedules individual
	/// `spawn_blocking` tasks cheaply.
	pub fn as_completed<I, O, F>(&self, iter: impl Iterator<Item = I> + Send + 'static, func: F, cancellation: CancellationToken) -> BoxStream<'static, FinishedTask<O>>
	where
		I: Send + 'static,
		O: Send + 'static,
		F: Fn(I) -> Result<O, EngineError> + Send + Sync + 'static,
	{
		let limit = self.worker_limit();
		let func = Arc::new(func);

		if limit <= 1 {
			let cancellation = cancellation.clone();
			return stream::iter(iter)
				.take_while(move |_| {
					let cancelled = cancellation.is_cancelled();
					async move { !cancelled }
				})
				.map(move |item| FinishedTask::from_result(func(item)))
				.boxed();
		}

		stream::iter(iter)
			.map(move |item| {
				let func = Arc::clone(&func);
				tokio::task::spawn_blocking(move || func(item))
			})
			.buffer_unordered(limit)
			.take_while(move |_| {
				let cancelled = cancellation.is_cancelled();
				async move { !cancelled }
			})
			.map(|joined| match joined {
				Ok(result) => FinishedTask::from_result(result),
				Err(join_err) => FinishedTask::err(EngineError::ProcessException(join_err.to_string())),
			})
			.boxed()
	}
}
