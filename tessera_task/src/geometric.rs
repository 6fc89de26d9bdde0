//! Capability trait for things that may carry spatial extent, standing in
//! for the original's `__geo_interface__` duck-typing check at I/O
//! boundaries.

use tessera_core::Bounds;
use tessera_geometry::geo::Geometry;

pub trait Geometric {
	/// The geometry attached to this value, if any.
	fn geometry(&self) -> Option<&Geometry>;

	/// The bounding box of [`Self::geometry`], if any.
	fn bounds(&self) -> Option<Bounds>;

	#[must_use]
	fn has_geometry(&self) -> bool {
		self.geometry().is_some()
	}
}
