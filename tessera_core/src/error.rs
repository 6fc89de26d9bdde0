//! The engine's error taxonomy.
//!
//! Every fallible function in the workspace returns `anyhow::Result<T>`, the
//! way the teacher crates do throughout; `EngineError` is the small, closed
//! set of *kinds* that callers are expected to match on (to decide whether a
//! tile failure halts a run, gets retried, or is silently skipped). Anywhere
//! else, errors are just `anyhow::Error` with `.context(...)` attached.
//!
//! Grounded on the original implementation's exception hierarchy
//! (`mapchete/errors.py`): each variant here corresponds to exactly one
//! exception class there, collapsed into one enum instead of a class tree
//! per [`crate::EngineError`]'s REDESIGN note.

use std::fmt;

/// The closed set of error kinds the scheduler and its collaborators
/// reason about. Carried as the root cause of an `anyhow::Error` via
/// `anyhow::Error::new(EngineError::...)` or `.context(EngineError::...)`.
#[derive(Debug, Clone)]
pub enum EngineError {
	/// Invalid `ProcessConfig`; fatal, surfaced to the caller before any
	/// batch is built.
	Config(String),
	/// I/O driver mismatch or missing metadata (e.g. an absent tile
	/// directory metadata record).
	Driver(String),
	/// Transient read/write failure; retried per [`crate::RetryPolicy`],
	/// escalated once retries are exhausted.
	Io(String),
	/// A geometry did not match the type family an operation required.
	GeometryType(String),
	/// A CRS transform failed; triggers a single clip-and-retry in
	/// `reproject_geometry`, then escalates.
	ReprojectionFailed(String),
	/// Expected-empty tile. Not a failure: results in a skipped write.
	NodataTile,
	/// The user process returned invalid output (e.g. `None` where that is
	/// not permitted).
	ProcessOutput(String),
	/// The user process raised; the original error is preserved as the
	/// cause chain via `anyhow::Error::context`.
	ProcessException(String),
	/// The task was cancelled before completion.
	Cancelled,
	/// An input object was expected to carry geometry but did not.
	NoGeo,
	/// An input object was expected to carry a CRS but did not.
	NoCrs,
}

impl fmt::Display for EngineError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			EngineError::Config(msg) => write!(f, "configuration error: {msg}"),
			EngineError::Driver(msg) => write!(f, "driver error: {msg}"),
			EngineError::Io(msg) => write!(f, "I/O error: {msg}"),
			EngineError::GeometryType(msg) => write!(f, "geometry type error: {msg}"),
			EngineError::ReprojectionFailed(msg) => write!(f, "reprojection failed: {msg}"),
			EngineError::NodataTile => write!(f, "nodata tile"),
			EngineError::ProcessOutput(msg) => write!(f, "invalid process output: {msg}"),
			EngineError::ProcessException(msg) => write!(f, "process exception: {msg}"),
			EngineError::Cancelled => write!(f, "cancelled"),
			EngineError::NoGeo => write!(f, "object has no geometry"),
			EngineError::NoCrs => write!(f, "object has no CRS"),
		}
	}
}

impl std::error::Error for EngineError {}

impl EngineError {
	/// True for kinds that represent "no output for this tile" rather than
	/// an operational failure — the scheduler treats these as a skip, not a
	/// run-stopping error, independent of `mode`.
	#[must_use]
	pub fn is_nodata(&self) -> bool {
		matches!(self, EngineError::NodataTile)
	}

	/// True for kinds a bounded retry loop should attempt again.
	#[must_use]
	pub fn is_retryable(&self) -> bool {
		matches!(self, EngineError::Io(_))
	}
}
