//! Coordinate reference system identity.
//!
//! `Crs` is intentionally opaque about *how* a spatial reference was
//! specified — an EPSG code, a proj string, or WKT all resolve to the same
//! `Crs` value if they name the same reference. Actual coordinate
//! transforms are performed by `tessera_geometry` (via the `proj` crate,
//! the way `pka-tile-grid`'s optional `projtransform` feature does);
//! `tessera_core` only carries identity and the fixed bounds registry.

use anyhow::{Result, bail};

use crate::Bounds;

/// How a `Crs` was specified. Two `Crs` values with different `Spec`s can
/// still be semantically equal (see [`Crs::eq`]).
#[derive(Debug, Clone)]
enum Spec {
	Epsg(u32),
	Proj(String),
	Wkt(String),
}

/// An opaque coordinate reference system identifier.
///
/// Equality is semantic: two `Crs` values referring to the same spatial
/// reference compare equal even if one was built `from_epsg` and the other
/// `from_proj`, as long as both resolve to the same EPSG code. CRSes that
/// cannot be resolved to an EPSG code fall back to exact string comparison
/// of their normalized definition.
#[derive(Debug, Clone)]
pub struct Crs {
	spec: Spec,
}

impl Crs {
	#[must_use]
	pub fn from_epsg(code: u32) -> Self {
		Crs { spec: Spec::Epsg(code) }
	}

	/// Accepts proj strings either bare (`"+proj=longlat +datum=WGS84..."`)
	/// or an `"EPSG:4326"` shorthand, which is resolved to [`Spec::Epsg`]
	/// so that equality with `Crs::from_epsg(4326)` holds.
	pub fn from_proj(definition: impl Into<String>) -> Result<Self> {
		let definition = definition.into();
		if let Some(code) = epsg_from_shorthand(&definition) {
			return Ok(Crs::from_epsg(code));
		}
		Ok(Crs { spec: Spec::Proj(definition) })
	}

	pub fn from_wkt(wkt: impl Into<String>) -> Result<Self> {
		let wkt = wkt.into();
		if let Some(code) = epsg_from_wkt_authority(&wkt) {
			return Ok(Crs::from_epsg(code));
		}
		Ok(Crs { spec: Spec::Wkt(wkt) })
	}

	/// EPSG:4326 — WGS84 longitude/latitude.
	#[must_use]
	pub fn wgs84() -> Self {
		Crs::from_epsg(4326)
	}

	/// EPSG:3857 — Web Mercator.
	#[must_use]
	pub fn web_mercator() -> Self {
		Crs::from_epsg(3857)
	}

	/// The resolved EPSG code, if this CRS was specified (or resolves) as
	/// one.
	#[must_use]
	pub fn epsg_code(&self) -> Option<u32> {
		match &self.spec {
			Spec::Epsg(code) => Some(*code),
			_ => None,
		}
	}

	/// True for a geographic (longitude/latitude) CRS. Only the registry
	/// entries we know about are consulted; unknown CRSes answer `false`.
	#[must_use]
	pub fn is_latlon(&self) -> bool {
		self.epsg_code() == Some(4326)
	}

	/// A `proj`-crate-compatible definition string, e.g. `"EPSG:4326"`.
	#[must_use]
	pub fn proj_definition(&self) -> String {
		match &self.spec {
			Spec::Epsg(code) => format!("EPSG:{code}"),
			Spec::Proj(def) => def.clone(),
			Spec::Wkt(wkt) => wkt.clone(),
		}
	}

	/// Looks up the known bounding box for this CRS in the fixed registry
	/// from spec §3. Returns `None` (not an error) for CRSes outside the
	/// registry — callers may then fall back to an area-of-use lookup or
	/// fail with a "bounds unknown" error, per spec §3.
	#[must_use]
	pub fn known_bounds(&self) -> Option<Bounds> {
		match self.epsg_code()? {
			4326 => Bounds::new(-180.0, -90.0, 180.0, 90.0).ok(),
			3857 => Bounds::new(-180.0, -85.0511, 180.0, 85.0511).ok(),
			3035 => Bounds::new(-10.67, 34.50, 31.55, 71.05).ok(),
			_ => None,
		}
	}

	/// Like [`Crs::known_bounds`] but fails with a "bounds unknown" error
	/// instead of returning `None`, for callers that require bounds to
	/// proceed (spec §3).
	pub fn require_bounds(&self) -> Result<Bounds> {
		self
			.known_bounds()
			.ok_or_else(|| anyhow::anyhow!("bounds unknown for CRS {}", self.proj_definition()))
	}
}

impl PartialEq for Crs {
	fn eq(&self, other: &Self) -> bool {
		match (self.epsg_code(), other.epsg_code()) {
			(Some(a), Some(b)) => a == b,
			_ => self.proj_definition() == other.proj_definition(),
		}
	}
}

impl Eq for Crs {}

fn epsg_from_shorthand(definition: &str) -> Option<u32> {
	let trimmed = definition.trim();
	let rest = trimmed
		.strip_prefix("EPSG:")
		.or_else(|| trimmed.strip_prefix("epsg:"))?;
	rest.parse().ok()
}

fn epsg_from_wkt_authority(wkt: &str) -> Option<u32> {
	// crude but sufficient: look for the trailing `AUTHORITY["EPSG","4326"]]`
	// clause that every WKT CRS definition carries.
	let idx = wkt.rfind("AUTHORITY[\"EPSG\",\"")?;
	let rest = &wkt[idx + "AUTHORITY[\"EPSG\",\"".len()..];
	let end = rest.find('"')?;
	rest[..end].parse().ok()
}

pub fn require_epsg(crs: &Crs) -> Result<u32> {
	match crs.epsg_code() {
		Some(code) => Ok(code),
		None => bail!("CRS {} has no resolvable EPSG code", crs.proj_definition()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn epsg_and_proj_shorthand_are_equal() {
		let a = Crs::from_epsg(4326);
		let b = Crs::from_proj("EPSG:4326").unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn different_epsg_codes_are_not_equal() {
		assert_ne!(Crs::from_epsg(4326), Crs::from_epsg(3857));
	}

	#[test]
	fn unresolvable_proj_strings_compare_by_string() {
		let a = Crs::from_proj("+proj=longlat +datum=WGS84 +no_defs").unwrap();
		let b = Crs::from_proj("+proj=longlat +datum=WGS84 +no_defs").unwrap();
		let c = Crs::from_proj("+proj=merc").unwrap();
		assert_eq!(a, b);
		assert_ne!(a, c);
	}

	#[test]
	fn known_bounds_registry_matches_spec() {
		assert_eq!(
			Crs::wgs84().known_bounds().unwrap().as_tuple(),
			(-180.0, -90.0, 180.0, 90.0)
		);
		assert_eq!(
			Crs::web_mercator().known_bounds().unwrap().as_tuple(),
			(-180.0, -85.0511, 180.0, 85.0511)
		);
		assert_eq!(
			Crs::from_epsg(3035).known_bounds().unwrap().as_tuple(),
			(-10.67, 34.50, 31.55, 71.05)
		);
	}

	#[test]
	fn unknown_crs_has_no_known_bounds() {
		assert!(Crs::from_epsg(2056).known_bounds().is_none());
		assert!(Crs::from_epsg(2056).require_bounds().is_err());
	}

	#[test]
	fn wkt_with_epsg_authority_resolves() {
		let wkt = r#"GEOGCS["WGS 84",DATUM["WGS_1984"],AUTHORITY["EPSG","4326"]]"#;
		let crs = Crs::from_wkt(wkt).unwrap();
		assert_eq!(crs, Crs::wgs84());
	}

	#[test]
	fn is_latlon_only_true_for_4326() {
		assert!(Crs::wgs84().is_latlon());
		assert!(!Crs::web_mercator().is_latlon());
	}
}
