//! The write side of a process run: where a [`crate::Scheduler`] sends
//! every tile a task actually produced data for. No concrete driver ships
//! here, matching `tessera_io::raster`'s "interfaces only" precedent — a
//! storage crate would implement this against a tile directory, an object
//! store, or a single-file format.

use anyhow::Result;
use tessera_core::Tile;
use tessera_task::TaskOutput;

pub trait OutputWriter: Send + Sync {
	/// Persists `output` for `tile`.
	///
	/// # Errors
	/// Propagates the underlying driver's write failure.
	fn write(&self, tile: &Tile, output: &TaskOutput) -> Result<()>;
}
