use super::*;
use anyhow::Result;
use std::fmt::Debug;

#[derive(Clone, PartialEq)]
pub struct LineStringGeometry(pub Vec<Coordinates>);

impl LineStringGeometry {
	#[must_use]
	pub fn new(c: Vec<Coordinates>) -> Self {
		Self(c)
	}
}

impl GeometryTrait for LineStringGeometry {
	fn area(&self) -> f64 {
		0.0
	}

	fn verify(&self) -> Result<()> {
		anyhow::ensure!(self.0.len() >= 2, "LineString must have at least 2 points");
		Ok(())
	}

	fn to_coord_json(&self, precision: Option<u8>) -> serde_json::Value {
		serde_json::Value::from(self.0.iter().map(|c| c.to_json(precision)).collect::<Vec<_>>())
	}

	fn contains_point(&self, _x: f64, _y: f64) -> bool {
		false
	}

	fn to_mercator(&self) -> LineStringGeometry {
		LineStringGeometry(self.0.iter().map(Coordinates::to_mercator).collect())
	}

	fn compute_bounds(&self) -> Option<[f64; 4]> {
		RingGeometry(self.0.clone()).compute_bounds()
	}
}

impl SingleGeometryTrait<MultiLineStringGeometry> for LineStringGeometry {
	fn into_multi(self) -> MultiLineStringGeometry {
		MultiLineStringGeometry(vec![self])
	}
}

impl CompositeGeometryTrait<Coordinates> for LineStringGeometry {
	fn new() -> Self {
		Self(Vec::new())
	}
	fn as_vec(&self) -> &Vec<Coordinates> {
		&self.0
	}
	fn as_mut_vec(&mut self) -> &mut Vec<Coordinates> {
		&mut self.0
	}
	fn into_inner(self) -> Vec<Coordinates> {
		self.0
	}
}

impl Debug for LineStringGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}

crate::impl_from_array!(LineStringGeometry, Coordinates);

impl From<geo::LineString<f64>> for LineStringGeometry {
	fn from(geometry: geo::LineString<f64>) -> Self {
		LineStringGeometry(geometry.into_iter().map(Coordinates::from).collect())
	}
}

impl From<LineStringGeometry> for geo::LineString<f64> {
	fn from(line: LineStringGeometry) -> Self {
		geo::LineString::new(line.0.into_iter().map(geo::Coord::from).collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn area_is_zero() {
		let line = LineStringGeometry::from(&[[0, 0], [1, 1]]);
		assert_eq!(line.area(), 0.0);
	}

	#[test]
	fn verify_requires_two_points() {
		assert!(LineStringGeometry::from(&[[0, 0]]).verify().is_err());
		assert!(LineStringGeometry::from(&[[0, 0], [1, 1]]).verify().is_ok());
	}

	#[test]
	fn compute_bounds() {
		let line = LineStringGeometry::from(&[[0, 0], [3, 4]]);
		assert_eq!(line.compute_bounds().unwrap(), [0.0, 0.0, 3.0, 4.0]);
	}

	#[test]
	fn into_multi_wraps_single_line() {
		use traits::CompositeGeometryTrait;
		let line = LineStringGeometry::from(&[[0, 0], [1, 1]]);
		let multi = line.clone().into_multi();
		assert_eq!(multi.as_vec(), &vec![line]);
	}
}
