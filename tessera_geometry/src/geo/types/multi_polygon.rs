use super::{CompositeGeometryTrait, GeometryTrait, PolygonGeometry};
use anyhow::Result;
use std::fmt::Debug;

#[derive(Clone, PartialEq)]
pub struct MultiPolygonGeometry(pub Vec<PolygonGeometry>);

impl GeometryTrait for MultiPolygonGeometry {
	fn area(&self) -> f64 {
		self.0.iter().map(GeometryTrait::area).sum()
	}

	fn verify(&self) -> Result<()> {
		for polygon in &self.0 {
			polygon.verify()?;
		}
		Ok(())
	}

	fn to_coord_json(&self, precision: Option<u8>) -> serde_json::Value {
		serde_json::Value::from(
			self
				.0
				.iter()
				.map(|poly| poly.to_coord_json(precision))
				.collect::<Vec<_>>(),
		)
	}

	fn contains_point(&self, x: f64, y: f64) -> bool {
		self.0.iter().any(|poly| poly.contains_point(x, y))
	}

	fn to_mercator(&self) -> MultiPolygonGeometry {
		MultiPolygonGeometry(self.0.iter().map(GeometryTrait::to_mercator).collect())
	}

	fn compute_bounds(&self) -> Option<[f64; 4]> {
		self.0.iter().filter_map(GeometryTrait::compute_bounds).reduce(|a, b| {
			[a[0].min(b[0]), a[1].min(b[1]), a[2].max(b[2]), a[3].max(b[3])]
		})
	}
}

impl CompositeGeometryTrait<PolygonGeometry> for MultiPolygonGeometry {
	fn new() -> Self {
		Self(Vec::new())
	}
	fn as_vec(&self) -> &Vec<PolygonGeometry> {
		&self.0
	}
	fn as_mut_vec(&mut self) -> &mut Vec<PolygonGeometry> {
		&mut self.0
	}
	fn into_inner(self) -> Vec<PolygonGeometry> {
		self.0
	}
}

impl Debug for MultiPolygonGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}

crate::impl_from_array!(MultiPolygonGeometry, PolygonGeometry);

impl From<geo::MultiPolygon<f64>> for MultiPolygonGeometry {
	fn from(geometry: geo::MultiPolygon<f64>) -> Self {
		MultiPolygonGeometry(geometry.0.into_iter().map(PolygonGeometry::from).collect())
	}
}

impl From<MultiPolygonGeometry> for geo::MultiPolygon<f64> {
	fn from(geometry: MultiPolygonGeometry) -> Self {
		geo::MultiPolygon::new(geometry.0.into_iter().map(Into::into).collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn area_sums_member_polygons() {
		let multi = MultiPolygonGeometry::from(&[
			[[[0, 0], [2, 0], [2, 2], [0, 2], [0, 0]]],
			[[[0, 0], [3, 0], [3, 3], [0, 3], [0, 0]]],
		]);
		assert_eq!(multi.area(), 4.0 + 9.0);
	}

	#[test]
	fn contains_point_true_if_any_member_contains() {
		let multi = MultiPolygonGeometry::from(&[[[[0, 0], [2, 0], [2, 2], [0, 2], [0, 0]]]]);
		assert!(multi.contains_point(1.0, 1.0));
		assert!(!multi.contains_point(5.0, 5.0));
	}
}
