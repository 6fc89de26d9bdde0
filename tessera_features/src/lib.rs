//! Id-keyed, spatially indexed feature store.
//!
//! [`IndexedFeatures`] holds a flat pool of [`Feature`]s and answers
//! bounds-filtered lookups against an `rtree`-backed spatial index (or a
//! linear scan sharing the same surface, if the `rtree-index` feature is
//! disabled). Features with no geometry can't be spatially indexed, so they
//! live in a side-set and are returned by every `filter` call regardless of
//! the query bounds.

mod feature;
mod index;

pub use feature::Feature;

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use anyhow::Result;
use index::SpatialIndex;
use tessera_core::{Bounds, Crs};

/// Derives a stable id for a feature that didn't bring its own, by hashing
/// its geometry and properties. Always succeeds: both are always
/// representable, so there's no case left to reject.
fn hash_feature(feature: &Feature) -> u64 {
	let mut hasher = DefaultHasher::new();
	match &feature.geometry {
		Some(geometry) => geometry.to_json(None).to_string().hash(&mut hasher),
		None => "no-geometry".hash(&mut hasher),
	}
	format!("{:?}", feature.properties).hash(&mut hasher);
	hasher.finish()
}

/// A spatially indexed, id-keyed feature collection supporting
/// bbox-filtered lookup.
#[derive(Debug)]
pub struct IndexedFeatures {
	crs: Option<Crs>,
	items: HashMap<u64, Feature>,
	index: SpatialIndex,
	non_geo: Vec<u64>,
}

impl IndexedFeatures {
	/// An empty store. `crs` is the CRS features are assumed to be in if the
	/// caller doesn't get one from the source.
	#[must_use]
	pub fn new(crs: Option<Crs>) -> Self {
		Self {
			crs,
			items: HashMap::new(),
			index: SpatialIndex::new(),
			non_geo: Vec::new(),
		}
	}

	/// Builds a store from a batch of features in one pass, bulk-loading the
	/// spatial index instead of inserting one at a time.
	#[must_use]
	pub fn from_features(features: Vec<Feature>, crs: Option<Crs>) -> Self {
		let mut items = HashMap::with_capacity(features.len());
		let mut entries = Vec::new();
		let mut non_geo = Vec::new();

		for feature in features {
			let id = feature.id.unwrap_or_else(|| hash_feature(&feature));
			match feature.bounds() {
				Some(bounds) => entries.push((id, bounds)),
				None => non_geo.push(id),
			}
			items.insert(id, feature);
		}

		Self {
			crs,
			items,
			index: SpatialIndex::bulk_load(entries),
			non_geo,
		}
	}

	/// Inserts a single feature, assigning it an id by hashing if it didn't
	/// bring one, and returns the id it was stored under.
	pub fn insert(&mut self, feature: Feature) -> u64 {
		let id = feature.id.unwrap_or_else(|| hash_feature(&feature));
		match feature.bounds() {
			Some(bounds) => self.index.insert(id, bounds),
			None => self.non_geo.push(id),
		}
		self.items.insert(id, feature);
		id
	}

	#[must_use]
	pub fn crs(&self) -> Option<&Crs> {
		self.crs.as_ref()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.items.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	#[must_use]
	pub fn get(&self, id: u64) -> Option<&Feature> {
		self.items.get(&id)
	}

	/// Features whose bounds intersect `bounds`, plus every non-geo item.
	/// `bounds = None` returns every feature in the store.
	#[must_use]
	pub fn filter(&self, bounds: Option<&Bounds>) -> Vec<&Feature> {
		let Some(bounds) = bounds else {
			return self.items.values().collect();
		};
		let mut out: Vec<&Feature> = self
			.index
			.intersection(bounds)
			.into_iter()
			.filter_map(|id| self.items.get(&id))
			.collect();
		out.extend(self.non_geo.iter().filter_map(|id| self.items.get(id)));
		out
	}

	/// Convenience wrapper over [`Self::filter`] taking a raw
	/// `(left, bottom, right, top)` tuple instead of a [`Bounds`].
	pub fn filter_bbox(&self, bbox: Option<(f64, f64, f64, f64)>) -> Result<Vec<&Feature>> {
		match bbox {
			Some((left, bottom, right, top)) => {
				let bounds = Bounds::new(left, bottom, right, top)?;
				Ok(self.filter(Some(&bounds)))
			}
			None => Ok(self.filter(None)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tessera_geometry::geo::Geometry;

	fn point_feature(x: f64, y: f64) -> Feature {
		Feature::new(Some(Geometry::new_point([x, y])))
	}

	#[test]
	fn insert_derives_id_from_hash_when_absent() {
		let mut store = IndexedFeatures::new(None);
		let id = store.insert(point_feature(1.0, 2.0));
		assert!(store.get(id).is_some());
	}

	#[test]
	fn insert_keeps_explicit_id() {
		let mut store = IndexedFeatures::new(None);
		let id = store.insert(point_feature(1.0, 2.0).with_id(42));
		assert_eq!(id, 42);
	}

	#[test]
	fn filter_returns_features_intersecting_bounds() {
		let store = IndexedFeatures::from_features(
			vec![point_feature(0.0, 0.0).with_id(1), point_feature(10.0, 10.0).with_id(2)],
			None,
		);
		let bounds = Bounds::new(-1.0, -1.0, 1.0, 1.0).unwrap();
		let found = store.filter(Some(&bounds));
		assert_eq!(found.len(), 1);
		assert_eq!(found[0].id, Some(1));
	}

	#[test]
	fn filter_none_returns_everything() {
		let store = IndexedFeatures::from_features(
			vec![point_feature(0.0, 0.0).with_id(1), point_feature(10.0, 10.0).with_id(2)],
			None,
		);
		assert_eq!(store.filter(None).len(), 2);
	}

	#[test]
	fn filter_always_includes_non_geo_items() {
		let store = IndexedFeatures::from_features(
			vec![point_feature(0.0, 0.0).with_id(1), Feature::new(None).with_id(2)],
			None,
		);
		let bounds = Bounds::new(-1.0, -1.0, 1.0, 1.0).unwrap();
		let found = store.filter(Some(&bounds));
		assert_eq!(found.len(), 2);

		let far_bounds = Bounds::new(100.0, 100.0, 101.0, 101.0).unwrap();
		let found_far = store.filter(Some(&far_bounds));
		assert_eq!(found_far.len(), 1);
		assert_eq!(found_far[0].id, Some(2));
	}

	#[test]
	fn from_features_hashes_ids_deterministically_for_duplicate_content() {
		let a = IndexedFeatures::from_features(vec![point_feature(3.0, 4.0)], None);
		let b = IndexedFeatures::from_features(vec![point_feature(3.0, 4.0)], None);
		let id_a = *a.items.keys().next().unwrap();
		let id_b = *b.items.keys().next().unwrap();
		assert_eq!(id_a, id_b);
	}

	#[test]
	fn filter_bbox_wraps_filter() {
		let store = IndexedFeatures::from_features(vec![point_feature(0.0, 0.0).with_id(1)], None);
		let found = store.filter_bbox(Some((-1.0, -1.0, 1.0, 1.0))).unwrap();
		assert_eq!(found.len(), 1);
	}
}
