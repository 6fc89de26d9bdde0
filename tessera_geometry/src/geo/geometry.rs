#![allow(dead_code)]

use super::*;
use serde_json::{Map, Value, json};
use std::fmt::Debug;

/// The sum type every geometry operation in this crate works over.
///
/// Extends the original six simple-feature variants with `LinearRing` (the
/// undecorated boundary of a polygon, handed back on its own by
/// `multipart_to_singleparts` and the antimeridian repair) and
/// `GeometryCollection` (heterogeneous grouping — the one GeoJSON geometry
/// type the six simple-feature variants can't represent).
#[derive(Clone, PartialEq)]
pub enum Geometry {
	Point(PointGeometry),
	LineString(LineStringGeometry),
	LinearRing(RingGeometry),
	Polygon(PolygonGeometry),
	MultiPoint(MultiPointGeometry),
	MultiLineString(MultiLineStringGeometry),
	MultiPolygon(MultiPolygonGeometry),
	GeometryCollection(Vec<Geometry>),
}

impl Geometry {
	pub fn new_point<T>(value: [T; 2]) -> Self
	where
		Coordinates: From<[T; 2]>,
	{
		Self::Point(PointGeometry::from(value))
	}
	pub fn new_line_string<T>(value: Vec<[T; 2]>) -> Self
	where
		Coordinates: From<[T; 2]>,
	{
		Self::LineString(LineStringGeometry::from(value))
	}
	pub fn new_linear_ring<T>(value: Vec<[T; 2]>) -> Self
	where
		Coordinates: From<[T; 2]>,
	{
		Self::LinearRing(RingGeometry::from(value))
	}
	pub fn new_polygon<T>(value: Vec<Vec<[T; 2]>>) -> Self
	where
		Coordinates: From<[T; 2]>,
	{
		Self::Polygon(PolygonGeometry::from(value))
	}
	pub fn new_multi_point<T>(value: Vec<[T; 2]>) -> Self
	where
		Coordinates: From<[T; 2]>,
	{
		Self::MultiPoint(MultiPointGeometry::from(value))
	}
	pub fn new_multi_line_string<T>(value: Vec<Vec<[T; 2]>>) -> Self
	where
		Coordinates: From<[T; 2]>,
	{
		Self::MultiLineString(MultiLineStringGeometry::from(value))
	}
	pub fn new_multi_polygon<T>(value: Vec<Vec<Vec<[T; 2]>>>) -> Self
	where
		Coordinates: From<[T; 2]>,
	{
		Self::MultiPolygon(MultiPolygonGeometry::from(value))
	}

	#[must_use]
	pub fn get_type(&self) -> &str {
		match self {
			Geometry::Point(_) => "Point",
			Geometry::LineString(_) => "LineString",
			Geometry::LinearRing(_) => "LinearRing",
			Geometry::Polygon(_) => "Polygon",
			Geometry::MultiPoint(_) => "MultiPoint",
			Geometry::MultiLineString(_) => "MultiLineString",
			Geometry::MultiPolygon(_) => "MultiPolygon",
			Geometry::GeometryCollection(_) => "GeometryCollection",
		}
	}

	pub fn into_multi(self) -> Self {
		match self {
			Geometry::Point(g) => Geometry::MultiPoint(g.into_multi()),
			Geometry::LineString(g) => Geometry::MultiLineString(g.into_multi()),
			Geometry::Polygon(g) => Geometry::MultiPolygon(g.into_multi()),
			other => other,
		}
	}

	/// Signed/unsigned area, zero for non-area geometries. `GeometryCollection`
	/// sums its members.
	#[must_use]
	pub fn area(&self) -> f64 {
		match self {
			Geometry::Point(g) => g.area(),
			Geometry::LineString(g) => g.area(),
			Geometry::LinearRing(g) => g.area(),
			Geometry::Polygon(g) => g.area(),
			Geometry::MultiPoint(g) => g.area(),
			Geometry::MultiLineString(g) => g.area(),
			Geometry::MultiPolygon(g) => g.area(),
			Geometry::GeometryCollection(members) => members.iter().map(Geometry::area).sum(),
		}
	}

	/// # Errors
	/// Returns an error if any member geometry fails its own `verify`.
	pub fn verify(&self) -> anyhow::Result<()> {
		match self {
			Geometry::Point(g) => g.verify(),
			Geometry::LineString(g) => g.verify(),
			Geometry::LinearRing(g) => g.verify(),
			Geometry::Polygon(g) => g.verify(),
			Geometry::MultiPoint(g) => g.verify(),
			Geometry::MultiLineString(g) => g.verify(),
			Geometry::MultiPolygon(g) => g.verify(),
			Geometry::GeometryCollection(members) => {
				for member in members {
					member.verify()?;
				}
				Ok(())
			}
		}
	}

	#[must_use]
	pub fn contains_point(&self, x: f64, y: f64) -> bool {
		match self {
			Geometry::Point(g) => g.contains_point(x, y),
			Geometry::LineString(g) => g.contains_point(x, y),
			Geometry::LinearRing(g) => g.contains_point(x, y),
			Geometry::Polygon(g) => g.contains_point(x, y),
			Geometry::MultiPoint(g) => g.contains_point(x, y),
			Geometry::MultiLineString(g) => g.contains_point(x, y),
			Geometry::MultiPolygon(g) => g.contains_point(x, y),
			Geometry::GeometryCollection(members) => members.iter().any(|m| m.contains_point(x, y)),
		}
	}

	#[must_use]
	pub fn to_mercator(&self) -> Geometry {
		match self {
			Geometry::Point(g) => Geometry::Point(g.to_mercator()),
			Geometry::LineString(g) => Geometry::LineString(g.to_mercator()),
			Geometry::LinearRing(g) => Geometry::LinearRing(g.to_mercator()),
			Geometry::Polygon(g) => Geometry::Polygon(g.to_mercator()),
			Geometry::MultiPoint(g) => Geometry::MultiPoint(g.to_mercator()),
			Geometry::MultiLineString(g) => Geometry::MultiLineString(g.to_mercator()),
			Geometry::MultiPolygon(g) => Geometry::MultiPolygon(g.to_mercator()),
			Geometry::GeometryCollection(members) => {
				Geometry::GeometryCollection(members.iter().map(Geometry::to_mercator).collect())
			}
		}
	}

	#[must_use]
	pub fn compute_bounds(&self) -> Option<[f64; 4]> {
		match self {
			Geometry::Point(g) => g.compute_bounds(),
			Geometry::LineString(g) => g.compute_bounds(),
			Geometry::LinearRing(g) => g.compute_bounds(),
			Geometry::Polygon(g) => g.compute_bounds(),
			Geometry::MultiPoint(g) => g.compute_bounds(),
			Geometry::MultiLineString(g) => g.compute_bounds(),
			Geometry::MultiPolygon(g) => g.compute_bounds(),
			Geometry::GeometryCollection(members) => members.iter().filter_map(Geometry::compute_bounds).reduce(|a, b| {
				[a[0].min(b[0]), a[1].min(b[1]), a[2].max(b[2]), a[3].max(b[3])]
			}),
		}
	}

	/// Coordinates only, as a GeoJSON `coordinates` array would render them
	/// (not applicable to `GeometryCollection`, which has `geometries`
	/// instead — see [`Geometry::to_json`]).
	#[must_use]
	pub fn to_coord_json(&self, precision: Option<u8>) -> Value {
		match self {
			Geometry::Point(g) => g.to_coord_json(precision),
			Geometry::LineString(g) => g.to_coord_json(precision),
			Geometry::LinearRing(g) => g.to_coord_json(precision),
			Geometry::Polygon(g) => g.to_coord_json(precision),
			Geometry::MultiPoint(g) => g.to_coord_json(precision),
			Geometry::MultiLineString(g) => g.to_coord_json(precision),
			Geometry::MultiPolygon(g) => g.to_coord_json(precision),
			Geometry::GeometryCollection(_) => Value::Array(Vec::new()),
		}
	}

	/// Full GeoJSON geometry object: `{"type": ..., "coordinates": [...]}`,
	/// or `{"type": "GeometryCollection", "geometries": [...]}`.
	#[must_use]
	pub fn to_json(&self, precision: Option<u8>) -> Value {
		let mut obj = Map::new();
		obj.insert("type".to_string(), json!(self.get_type()));
		if let Geometry::GeometryCollection(members) = self {
			obj.insert(
				"geometries".to_string(),
				Value::Array(members.iter().map(|m| m.to_json(precision)).collect()),
			);
		} else {
			obj.insert("coordinates".to_string(), self.to_coord_json(precision));
		}
		Value::Object(obj)
	}

	pub fn new_example() -> Self {
		Self::new_multi_polygon(vec![
			vec![
				vec![[0.0, 0.0], [5.0, 0.0], [2.5, 4.0], [0.0, 0.0]],
				vec![[2.0, 1.0], [2.5, 2.0], [3.0, 1.0], [2.0, 1.0]],
			],
			vec![
				vec![[6.0, 0.0], [9.0, 0.0], [9.0, 4.0], [6.0, 4.0], [6.0, 0.0]],
				vec![[7.0, 1.0], [7.0, 3.0], [8.0, 3.0], [8.0, 1.0], [7.0, 1.0]],
			],
		])
	}
}

impl From<geo::Polygon<f64>> for Geometry {
	fn from(polygon: geo::Polygon<f64>) -> Self {
		Geometry::Polygon(PolygonGeometry::from(polygon))
	}
}

impl From<geo::MultiPolygon<f64>> for Geometry {
	fn from(multi_polygon: geo::MultiPolygon<f64>) -> Self {
		Geometry::MultiPolygon(MultiPolygonGeometry::from(multi_polygon))
	}
}

impl Debug for Geometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Geometry::Point(g) => f.debug_tuple("Point").field(g).finish(),
			Geometry::LineString(g) => f.debug_tuple("LineString").field(g).finish(),
			Geometry::LinearRing(g) => f.debug_tuple("LinearRing").field(g).finish(),
			Geometry::Polygon(g) => f.debug_tuple("Polygon").field(g).finish(),
			Geometry::MultiPoint(g) => f.debug_tuple("MultiPoint").field(g).finish(),
			Geometry::MultiLineString(g) => f.debug_tuple("MultiLineString").field(g).finish(),
			Geometry::MultiPolygon(g) => f.debug_tuple("MultiPolygon").field(g).finish(),
			Geometry::GeometryCollection(members) => f.debug_tuple("GeometryCollection").field(members).finish(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn into_multi_wraps_singular_variants() {
		assert_eq!(Geometry::new_point([0, 0]).into_multi().get_type(), "MultiPoint");
		assert_eq!(Geometry::new_line_string(vec![[0, 0], [1, 1]]).into_multi().get_type(), "MultiLineString");
	}

	#[test]
	fn geometry_collection_area_sums_members() {
		let collection = Geometry::GeometryCollection(vec![
			Geometry::new_polygon(vec![vec![[0, 0], [2, 0], [2, 2], [0, 2], [0, 0]]]),
			Geometry::new_polygon(vec![vec![[0, 0], [3, 0], [3, 3], [0, 3], [0, 0]]]),
		]);
		assert_eq!(collection.area(), 4.0 + 9.0);
	}

	#[test]
	fn to_json_renders_type_and_coordinates() {
		let point = Geometry::new_point([1.0, 2.0]);
		let json = point.to_json(None);
		assert_eq!(json["type"], "Point");
		assert_eq!(json["coordinates"], serde_json::json!([1.0, 2.0]));
	}

	#[test]
	fn from_geo_multi_polygon() {
		let mp = geo::MultiPolygon::new(vec![geo::Polygon::new(
			geo::LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]),
			vec![],
		)]);
		let geometry = Geometry::from(mp);
		assert_eq!(geometry.get_type(), "MultiPolygon");
	}

	#[test]
	fn to_json_collection_uses_geometries_key() {
		let collection = Geometry::GeometryCollection(vec![Geometry::new_point([0.0, 0.0])]);
		let json = collection.to_json(None);
		assert_eq!(json["type"], "GeometryCollection");
		assert!(json["geometries"].is_array());
	}
}
