use tessera_geometry::geo::{GeoFeature, GeoProperties, Geometry};

/// A single item in an [`crate::IndexedFeatures`] store.
///
/// Unlike [`GeoFeature`], the geometry is optional: items with no geometry
/// are still valid features, just never returned by a bounds-filtered
/// lookup (they live in the side-set instead).
#[derive(Debug, Clone)]
pub struct Feature {
	pub id: Option<u64>,
	pub geometry: Option<Geometry>,
	pub properties: GeoProperties,
}

impl Feature {
	#[must_use]
	pub fn new(geometry: Option<Geometry>) -> Self {
		Self {
			id: None,
			geometry,
			properties: GeoProperties::new(),
		}
	}

	#[must_use]
	pub fn with_id(mut self, id: u64) -> Self {
		self.id = Some(id);
		self
	}

	#[must_use]
	pub fn with_properties(mut self, properties: GeoProperties) -> Self {
		self.properties = properties;
		self
	}

	/// Bounds of this feature's geometry, or `None` if it has no geometry
	/// or the geometry itself has no extent (e.g. an empty collection).
	#[must_use]
	pub fn bounds(&self) -> Option<[f64; 4]> {
		self.geometry.as_ref().and_then(Geometry::compute_bounds)
	}
}

impl From<GeoFeature> for Feature {
	fn from(feature: GeoFeature) -> Self {
		Self {
			id: feature.id,
			geometry: Some(feature.geometry),
			properties: feature.properties,
		}
	}
}

impl TryFrom<Feature> for GeoFeature {
	type Error = anyhow::Error;

	fn try_from(feature: Feature) -> Result<Self, Self::Error> {
		let geometry = feature
			.geometry
			.ok_or_else(|| anyhow::anyhow!("feature has no geometry to export"))?;
		let mut geo_feature = GeoFeature::new(geometry);
		if let Some(id) = feature.id {
			geo_feature.set_id(id);
		}
		geo_feature.set_properties(feature.properties);
		Ok(geo_feature)
	}
}
