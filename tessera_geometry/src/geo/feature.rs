#![allow(dead_code)]

use std::fmt::Debug;

use super::*;

#[derive(Clone, Debug)]
pub struct GeoFeature {
	pub id: Option<u64>,
	pub geometry: Geometry,
	pub properties: GeoProperties,
}

impl GeoFeature {
	pub fn new(geometry: Geometry) -> Self {
		Self {
			id: None,
			geometry,
			properties: GeoProperties::new(),
		}
	}

	pub fn set_id(&mut self, id: u64) {
		self.id = Some(id);
	}

	pub fn set_properties(&mut self, properties: GeoProperties) {
		self.properties = properties;
	}

	/// Collapses a single-member `MultiPoint`/`MultiLineString`/`MultiPolygon`
	/// geometry down to its singular form, so exports don't carry a
	/// pointless wrapper around one feature.
	pub fn to_single_geometry(&mut self) {
		self.geometry = match std::mem::replace(&mut self.geometry, Geometry::GeometryCollection(Vec::new())) {
			Geometry::MultiPoint(g) if g.len() == 1 => Geometry::Point(g.0.into_iter().next().unwrap()),
			Geometry::MultiLineString(g) if g.len() == 1 => Geometry::LineString(g.0.into_iter().next().unwrap()),
			Geometry::MultiPolygon(g) if g.len() == 1 => Geometry::Polygon(g.0.into_iter().next().unwrap()),
			other => other,
		};
	}

	pub fn set_property<T>(&mut self, key: String, value: T)
	where
		GeoValue: From<T>,
	{
		self.properties.insert(key, GeoValue::from(value));
	}

	/// Renders this feature as a GeoJSON `Feature` object: `{"type":
	/// "Feature", "id": ..., "geometry": {...}, "properties": {...}}`. `id`
	/// is omitted if unset.
	#[must_use]
	pub fn to_json(&self, precision: Option<u8>) -> serde_json::Value {
		let mut obj = serde_json::Map::new();
		obj.insert("type".to_string(), serde_json::json!("Feature"));
		if let Some(id) = self.id {
			obj.insert("id".to_string(), serde_json::json!(id));
		}
		obj.insert("geometry".to_string(), self.geometry.to_json(precision));
		obj.insert("properties".to_string(), self.properties.to_json());
		serde_json::Value::Object(obj)
	}

	#[cfg(test)]
	pub fn new_example() -> Self {
		Self {
			id: Some(13),
			geometry: Geometry::new_example(),
			properties: GeoProperties::from(vec![
				("name", GeoValue::from("Nice")),
				("population", GeoValue::from(348085)),
				("is_nice", GeoValue::from(true)),
			]),
		}
	}
}

impl From<geo::MultiPolygon<f64>> for GeoFeature {
	fn from(multi_polygon: geo::MultiPolygon<f64>) -> Self {
		Self::new(Geometry::from(multi_polygon))
	}
}
