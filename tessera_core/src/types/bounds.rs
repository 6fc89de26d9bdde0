//! Axis-aligned bounding box in whatever CRS its owner (a [`crate::Grid`] or
//! [`crate::Tile`]) says it's in. `Bounds` itself carries no CRS — it's a
//! plain geometric primitive, the way the teacher keeps `GeoBBox` free of
//! anything but four numbers.

use std::ops::{Add, Index};

use anyhow::{Result, ensure};
use tessera_derive::context;

/// A left/bottom/right/top bounding box. Immutable once constructed:
/// `left <= right` and `bottom <= top` are enforced at construction time
/// and hold for the lifetime of the value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
	left: f64,
	bottom: f64,
	right: f64,
	top: f64,
}

impl Bounds {
	/// Builds a `Bounds`, rejecting degenerate ranges.
	///
	/// # Errors
	/// Returns an error if `left > right` or `bottom > top`.
	///
	/// ```
	/// use tessera_core::Bounds;
	/// let b = Bounds::new(0.0, 0.0, 10.0, 5.0).unwrap();
	/// assert_eq!(b.as_tuple(), (0.0, 0.0, 10.0, 5.0));
	/// assert!(Bounds::new(10.0, 0.0, 0.0, 5.0).is_err());
	/// ```
	#[context("failed to build bounds ({left}, {bottom}, {right}, {top})")]
	pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Result<Self> {
		ensure!(left <= right, "left ({left}) must not exceed right ({right})");
		ensure!(bottom <= top, "bottom ({bottom}) must not exceed top ({top})");
		Ok(Bounds { left, bottom, right, top })
	}

	/// Builds from a `(left, bottom, right, top)` tuple, the shape most
	/// callers receive from config or CLI input.
	pub fn from_inp(inp: (f64, f64, f64, f64)) -> Result<Self> {
		Bounds::new(inp.0, inp.1, inp.2, inp.3)
	}

	#[must_use]
	pub fn left(&self) -> f64 {
		self.left
	}

	#[must_use]
	pub fn bottom(&self) -> f64 {
		self.bottom
	}

	#[must_use]
	pub fn right(&self) -> f64 {
		self.right
	}

	#[must_use]
	pub fn top(&self) -> f64 {
		self.top
	}

	#[must_use]
	pub fn width(&self) -> f64 {
		self.right - self.left
	}

	#[must_use]
	pub fn height(&self) -> f64 {
		self.top - self.bottom
	}

	#[must_use]
	pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
		(self.left, self.bottom, self.right, self.top)
	}

	/// True if `self` and `other` share any area (edge-touching counts as
	/// intersecting, matching the teacher's tile-bbox overlap semantics).
	#[must_use]
	pub fn intersects(&self, other: &Bounds) -> bool {
		self.left <= other.right
			&& self.right >= other.left
			&& self.bottom <= other.top
			&& self.top >= other.bottom
	}

	/// The overlap region of `self` and `other`, or `None` if they don't
	/// intersect.
	#[must_use]
	pub fn intersection(&self, other: &Bounds) -> Option<Bounds> {
		if !self.intersects(other) {
			return None;
		}
		Bounds::new(
			self.left.max(other.left),
			self.bottom.max(other.bottom),
			self.right.min(other.right),
			self.top.min(other.top),
		)
		.ok()
	}

	/// Ring of the four corners, counter-clockwise starting at the
	/// bottom-left, closed (first point repeated last) — the shape a
	/// `geo::Polygon` exterior ring expects.
	#[must_use]
	pub fn exterior_ring(&self) -> Vec<(f64, f64)> {
		vec![
			(self.left, self.bottom),
			(self.right, self.bottom),
			(self.right, self.top),
			(self.left, self.top),
			(self.left, self.bottom),
		]
	}
}

/// Indexing mirrors the `[left, bottom, right, top]` ordering callers coming
/// from array-shaped config (`bounds: [0, 0, 10, 10]`) expect.
impl Index<usize> for Bounds {
	type Output = f64;

	fn index(&self, idx: usize) -> &f64 {
		match idx {
			0 => &self.left,
			1 => &self.bottom,
			2 => &self.right,
			3 => &self.top,
			_ => panic!("bounds index out of range: {idx}"),
		}
	}
}

impl IntoIterator for Bounds {
	type Item = f64;
	type IntoIter = std::array::IntoIter<f64, 4>;

	fn into_iter(self) -> Self::IntoIter {
		[self.left, self.bottom, self.right, self.top].into_iter()
	}
}

/// Union of two bounds — the smallest box containing both.
impl Add for Bounds {
	type Output = Bounds;

	fn add(self, other: Bounds) -> Bounds {
		Bounds {
			left: self.left.min(other.left),
			bottom: self.bottom.min(other.bottom),
			right: self.right.max(other.right),
			top: self.top.max(other.top),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[test]
	fn rejects_inverted_ranges() {
		assert!(Bounds::new(10.0, 0.0, 0.0, 10.0).is_err());
		assert!(Bounds::new(0.0, 10.0, 10.0, 0.0).is_err());
	}

	#[test]
	fn width_and_height() {
		let b = Bounds::new(0.0, 0.0, 10.0, 4.0).unwrap();
		assert_eq!(b.width(), 10.0);
		assert_eq!(b.height(), 4.0);
	}

	#[rstest]
	#[case((0.0, 0.0, 10.0, 10.0), (5.0, 5.0, 15.0, 15.0), true)]
	#[case((0.0, 0.0, 10.0, 10.0), (10.0, 10.0, 20.0, 20.0), true)]
	#[case((0.0, 0.0, 10.0, 10.0), (11.0, 11.0, 20.0, 20.0), false)]
	fn intersects_matches_expectation(
		#[case] a: (f64, f64, f64, f64),
		#[case] b: (f64, f64, f64, f64),
		#[case] expected: bool,
	) {
		let a = Bounds::from_inp(a).unwrap();
		let b = Bounds::from_inp(b).unwrap();
		assert_eq!(a.intersects(&b), expected);
	}

	#[test]
	fn intersection_returns_overlap() {
		let a = Bounds::new(0.0, 0.0, 10.0, 10.0).unwrap();
		let b = Bounds::new(5.0, 5.0, 15.0, 15.0).unwrap();
		let overlap = a.intersection(&b).unwrap();
		assert_eq!(overlap.as_tuple(), (5.0, 5.0, 10.0, 10.0));
	}

	#[test]
	fn add_returns_union() {
		let a = Bounds::new(0.0, 0.0, 5.0, 5.0).unwrap();
		let b = Bounds::new(3.0, 3.0, 10.0, 10.0).unwrap();
		assert_eq!((a + b).as_tuple(), (0.0, 0.0, 10.0, 10.0));
	}

	#[test]
	fn index_matches_left_bottom_right_top() {
		let b = Bounds::new(1.0, 2.0, 3.0, 4.0).unwrap();
		assert_eq!(b[0], 1.0);
		assert_eq!(b[1], 2.0);
		assert_eq!(b[2], 3.0);
		assert_eq!(b[3], 4.0);
	}

	#[test]
	fn into_iter_yields_four_values_in_order() {
		let b = Bounds::new(1.0, 2.0, 3.0, 4.0).unwrap();
		let values: Vec<f64> = b.into_iter().collect();
		assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0]);
	}

	#[test]
	fn exterior_ring_is_closed() {
		let b = Bounds::new(0.0, 0.0, 2.0, 1.0).unwrap();
		let ring = b.exterior_ring();
		assert_eq!(ring.first(), ring.last());
		assert_eq!(ring.len(), 5);
	}
}
