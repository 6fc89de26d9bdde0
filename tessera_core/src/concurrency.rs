//! Concurrency limit tuning, grounded on the teacher's `ConcurrencyLimits`
//! (`versatiles_core::concurrency`). The scheduler uses these as defaults
//! for the thread-pool [`crate::RetryPolicy`]-bounded I/O workers versus the
//! CPU-bound tile-task workers.
//!
//! # Examples
//!
//! ```
//! use tessera_core::ConcurrencyLimits;
//!
//! let limits = ConcurrencyLimits::default();
//! assert!(limits.io_bound > limits.cpu_bound);
//! ```

/// Concurrency limits for different workload types.
#[derive(Debug, Clone, Copy)]
pub struct ConcurrencyLimits {
	/// Concurrency for I/O-bound work (vector/raster reads, retries):
	/// set to 3x CPU count since these operations spend most of their time
	/// waiting.
	pub io_bound: usize,
	/// Concurrency for CPU-bound work (geometry repair, reprojection,
	/// resampling): 1x CPU count.
	pub cpu_bound: usize,
	/// Concurrency for the scheduler's mixed per-tile workload: 1.5x CPU
	/// count.
	pub mixed: usize,
}

impl ConcurrencyLimits {
	#[must_use]
	pub fn new(io_bound: usize, cpu_bound: usize, mixed: usize) -> Self {
		Self {
			io_bound: io_bound.max(1),
			cpu_bound: cpu_bound.max(1),
			mixed: mixed.max(1),
		}
	}

	#[must_use]
	pub fn cpu_count() -> usize {
		num_cpus::get()
	}
}

impl Default for ConcurrencyLimits {
	fn default() -> Self {
		let cpus = num_cpus::get();
		Self {
			io_bound: cpus * 3,
			cpu_bound: cpus,
			mixed: cpus + (cpus / 2),
		}
	}
}
