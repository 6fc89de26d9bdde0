//! A single idempotent cancellation flag shared between the scheduler
//! thread and whatever workers an [`crate::Executor`] is driving.
//!
//! Grounded on the teacher's lock-free broadcast pattern
//! (`versatiles_container::runtime::events`'s `Arc<ArcSwap<Vec<_>>>`):
//! readers never block behind a writer, which matters here since every
//! in-flight worker polls this flag on its own.

use std::sync::Arc;

use arc_swap::ArcSwap;

#[derive(Clone)]
pub struct CancellationToken(Arc<ArcSwap<bool>>);

impl CancellationToken {
	#[must_use]
	pub fn new() -> Self {
		CancellationToken(Arc::new(ArcSwap::from_pointee(false)))
	}

	/// Marks this token (and every clone of it) cancelled. Idempotent —
	/// calling it twice has the same effect as calling it once.
	pub fn cancel(&self) {
		self.0.store(Arc::new(true));
	}

	#[must_use]
	pub fn is_cancelled(&self) -> bool {
		**self.0.load()
	}
}

impl Default for CancellationToken {
	fn default() -> Self {
		Self::new()
	}
}
