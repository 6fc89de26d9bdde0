//! GeoJSON parser for `tessera_geometry`.
//!
//! This module parses GeoJSON text into the crate's internal types
//! (`GeoCollection`, `GeoFeature`, `Geometry`, `GeoProperties`, `GeoValue`),
//! going through `serde_json::Value` as the intermediate representation and
//! attaching precise error contexts via the `#[context]` macro.

use crate::geo::{GeoCollection, GeoFeature, GeoProperties, GeoValue, Geometry};
use anyhow::{Result, anyhow, bail, ensure};
use serde_json::Value;
use tessera_derive::context;

/// Parses a GeoJSON `FeatureCollection` document from a string into a [`GeoCollection`].
#[context("parsing GeoJSON root")]
pub fn parse_geojson(json: &str) -> Result<GeoCollection> {
	let value: Value = serde_json::from_str(json)?;
	parse_geojson_collection(&value)
}

/// Parses a GeoJSON `FeatureCollection` object already decoded as a [`Value`].
#[context("parsing GeoJSON FeatureCollection")]
pub fn parse_geojson_collection(value: &Value) -> Result<GeoCollection> {
	check_type(value, "FeatureCollection")?;

	let features = value
		.get("features")
		.ok_or_else(|| anyhow!("FeatureCollection is missing 'features'"))?
		.as_array()
		.ok_or_else(|| anyhow!("'features' must be an array"))?
		.iter()
		.map(parse_geojson_feature)
		.collect::<Result<Vec<_>>>()?;

	Ok(GeoCollection { features })
}

#[context("validating GeoJSON type '{}'", name)]
fn check_type(value: &Value, name: &str) -> Result<()> {
	let object_type = value
		.get("type")
		.and_then(Value::as_str)
		.ok_or_else(|| anyhow!("{name} must have a type"))?;

	ensure!(object_type == name, "type must be '{name}', got '{object_type}'");
	Ok(())
}

/// Parses a GeoJSON `Feature` object.
#[context("parsing GeoJSON Feature")]
pub fn parse_geojson_feature(value: &Value) -> Result<GeoFeature> {
	check_type(value, "Feature")?;

	let geometry = value
		.get("geometry")
		.ok_or_else(|| anyhow!("feature is missing 'geometry'"))?;
	let geometry = parse_geojson_geometry(geometry)?;

	let id = match value.get("id") {
		Some(Value::Number(n)) => n.as_u64(),
		_ => None,
	};

	let properties = match value.get("properties") {
		Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), GeoValue::from(v))).collect(),
		_ => GeoProperties::new(),
	};

	Ok(GeoFeature { id, geometry, properties })
}

/// Parses a GeoJSON `geometry` object into a [`Geometry`] variant.
///
/// Supports `Point`, `LineString`, `Polygon`, `MultiPoint`, `MultiLineString`,
/// `MultiPolygon`, and `GeometryCollection`.
#[context("parsing GeoJSON geometry")]
fn parse_geojson_geometry(value: &Value) -> Result<Geometry> {
	let geometry_type = value
		.get("type")
		.and_then(Value::as_str)
		.ok_or_else(|| anyhow!("geometry must have a type"))?;

	if geometry_type == "GeometryCollection" {
		let geometries = value
			.get("geometries")
			.and_then(Value::as_array)
			.ok_or_else(|| anyhow!("GeometryCollection must have 'geometries'"))?
			.iter()
			.map(parse_geojson_geometry)
			.collect::<Result<Vec<_>>>()?;
		return Ok(Geometry::GeometryCollection(geometries));
	}

	let coordinates = value
		.get("coordinates")
		.ok_or_else(|| anyhow!("geometry must have coordinates"))?;

	Ok(match geometry_type {
		"Point" => Geometry::new_point(parse_c0(coordinates)?),
		"LineString" => Geometry::new_line_string(parse_c1(coordinates)?),
		"Polygon" => Geometry::new_polygon(parse_c2(coordinates)?),
		"MultiPoint" => Geometry::new_multi_point(parse_c1(coordinates)?),
		"MultiLineString" => Geometry::new_multi_line_string(parse_c2(coordinates)?),
		"MultiPolygon" => Geometry::new_multi_polygon(parse_c3(coordinates)?),
		other => bail!("unknown geometry type '{other}'"),
	})
}

fn parse_number(value: &Value) -> Result<f64> {
	value.as_f64().ok_or_else(|| anyhow!("expected a number, got {value}"))
}

fn parse_c0(value: &Value) -> Result<[f64; 2]> {
	let arr = value.as_array().ok_or_else(|| anyhow!("expected a coordinate pair"))?;
	ensure!(arr.len() >= 2, "points in coordinates must have at least two values");
	Ok([parse_number(&arr[0])?, parse_number(&arr[1])?])
}

fn parse_c1(value: &Value) -> Result<Vec<[f64; 2]>> {
	value
		.as_array()
		.ok_or_else(|| anyhow!("expected an array of coordinate pairs"))?
		.iter()
		.map(parse_c0)
		.collect()
}

fn parse_c2(value: &Value) -> Result<Vec<Vec<[f64; 2]>>> {
	value
		.as_array()
		.ok_or_else(|| anyhow!("expected an array of rings"))?
		.iter()
		.map(parse_c1)
		.collect()
}

fn parse_c3(value: &Value) -> Result<Vec<Vec<Vec<[f64; 2]>>>> {
	value
		.as_array()
		.ok_or_else(|| anyhow!("expected an array of polygons"))?
		.iter()
		.map(parse_c2)
		.collect()
}
