//! Aggregates tile bounding boxes into unified polygonal outlines. Collects
//! multiple tile or geographic bounds, merges them into a single
//! `MultiPolygon`, and exports them as a [`GeoFeature`] suitable for GeoJSON
//! serialization.

use crate::geo::GeoFeature;
use geo::{MultiPolygon, Polygon, unary_union};
use tessera_core::{Bounds, Tile};

/// Represents a collection of tile or geographic bounding boxes that can be
/// merged into a unified polygon outline.
///
/// Used for visualizing or exporting the outline of a set of map tiles.
/// Internally stores polygons and merges them via geometric union operations.
#[derive(Debug, Clone, Default)]
pub struct TileOutline {
	polygons: Vec<geo::Polygon<f64>>,
}

impl TileOutline {
	/// Creates an empty `TileOutline` with no polygons.
	#[must_use]
	pub fn new() -> Self {
		Self { polygons: Vec::new() }
	}

	/// Adds an arbitrary polygon to the outline.
	pub fn add_polygon(&mut self, polygon: Polygon<f64>) {
		self.polygons.push(polygon);
	}

	/// Adds a rectangular polygon corresponding to a given geographic bounding box.
	///
	/// Converts the bounding box corners into a closed ring polygon.
	pub fn add_bounds(&mut self, bounds: &Bounds) {
		self.add_polygon(Polygon::new(
			geo::LineString::from(vec![
				(bounds.left(), bounds.bottom()),
				(bounds.right(), bounds.bottom()),
				(bounds.right(), bounds.top()),
				(bounds.left(), bounds.top()),
				(bounds.left(), bounds.bottom()),
			]),
			vec![],
		));
	}

	/// Adds the geographic bounding box of a single tile.
	pub fn add_tile(&mut self, tile: &Tile) {
		self.add_bounds(tile.bounds());
	}

	/// Returns a [`geo::MultiPolygon`] representing the unified outline of all polygons added.
	///
	/// Uses a geometric union to merge overlapping or adjacent polygons.
	#[must_use]
	pub fn to_multi_polygon(&self) -> MultiPolygon<f64> {
		unary_union(&self.polygons)
	}

	/// Converts the outline into a [`GeoFeature`] suitable for GeoJSON serialization.
	///
	/// The resulting feature contains a single `Polygon` or `MultiPolygon` geometry depending on the data.
	#[must_use]
	pub fn to_feature(&self) -> GeoFeature {
		let multi_polygon = self.to_multi_polygon();
		let mut feature = GeoFeature::from(multi_polygon);
		feature.to_single_geometry();
		feature
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tessera_core::TilePyramid;

	#[test]
	fn empty_outline_is_empty_multipolygon() {
		let outline = TileOutline::new();
		let mp = outline.to_multi_polygon();
		assert_eq!(mp.0.len(), 0, "empty outline should yield empty MultiPolygon");
	}

	#[test]
	fn adjacent_tiles_merge_into_single_polygon() {
		let pyramid = TilePyramid::new(tessera_core::GridType::Mercator, 256, 1).unwrap();
		let mut outline = TileOutline::new();
		outline.add_tile(&pyramid.tile(1, 0, 0).unwrap());
		outline.add_tile(&pyramid.tile(1, 0, 1).unwrap());
		let mp = outline.to_multi_polygon();
		assert_eq!(mp.0.len(), 1, "adjacent tiles should unify into one polygon");
	}

	#[test]
	fn json_is_geojson_feature_with_polygon() {
		let pyramid = TilePyramid::new(tessera_core::GridType::Geodetic, 256, 1).unwrap();
		let mut outline = TileOutline::new();
		outline.add_tile(&pyramid.tile(1, 0, 0).unwrap());
		let json = outline.to_feature().to_json(Some(6));
		assert_eq!(json["type"], "Feature");
		assert_eq!(json["geometry"]["type"], "Polygon");
	}
}
