use serde_json::{Value, json};
use std::fmt::Debug;

/// A single `(x, y)` coordinate pair. In WGS84 this is `(longitude,
/// latitude)`; in a projected CRS it's whatever units that CRS uses.
#[derive(Clone, Copy, PartialEq)]
pub struct Coordinates(f64, f64);

/// Earth radius, in meters, used by the spherical Web Mercator projection
/// (the same constant every WGS84<->3857 slippy-map implementation uses).
const EARTH_RADIUS: f64 = 6_378_137.0;

impl Coordinates {
	#[must_use]
	pub fn new(x: f64, y: f64) -> Self {
		Self(x, y)
	}

	#[must_use]
	pub fn x(&self) -> f64 {
		self.0
	}

	#[must_use]
	pub fn y(&self) -> f64 {
		self.1
	}

	/// Projects this coordinate from WGS84 longitude/latitude (degrees) to
	/// spherical Web Mercator (meters).
	#[must_use]
	pub fn to_mercator(&self) -> Coordinates {
		let x = self.0.to_radians() * EARTH_RADIUS;
		let y = (std::f64::consts::FRAC_PI_4 + self.1.to_radians() / 2.0).tan().ln() * EARTH_RADIUS;
		Coordinates(x, y)
	}

	/// Renders as a `[x, y]` JSON array, rounding to `precision` decimal
	/// places if given.
	#[must_use]
	pub fn to_json(&self, precision: Option<u8>) -> Value {
		match precision {
			Some(p) => {
				let factor = 10f64.powi(i32::from(p));
				json!([(self.0 * factor).round() / factor, (self.1 * factor).round() / factor])
			}
			None => json!([self.0, self.1]),
		}
	}
}

impl Debug for Coordinates {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "[{:?}, {:?}]", self.0, self.1)
	}
}

impl<T> From<[T; 2]> for Coordinates
where
	T: Into<f64> + Copy,
{
	fn from(value: [T; 2]) -> Self {
		Coordinates(value[0].into(), value[1].into())
	}
}

impl<T> From<&[T; 2]> for Coordinates
where
	T: Into<f64> + Copy,
{
	fn from(value: &[T; 2]) -> Self {
		Coordinates(value[0].into(), value[1].into())
	}
}

impl From<geo::Coord<f64>> for Coordinates {
	fn from(coord: geo::Coord<f64>) -> Self {
		Coordinates(coord.x, coord.y)
	}
}

impl From<Coordinates> for geo::Coord<f64> {
	fn from(c: Coordinates) -> Self {
		geo::coord! { x: c.0, y: c.1 }
	}
}

pub type Coordinates1 = Vec<Coordinates>;
pub type Coordinates2 = Vec<Coordinates1>;
pub type Coordinates3 = Vec<Coordinates2>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn new_and_accessors() {
		let c = Coordinates::new(1.0, 2.0);
		assert_eq!(c.x(), 1.0);
		assert_eq!(c.y(), 2.0);
	}

	#[test]
	fn to_mercator_moves_origin_to_origin() {
		let c = Coordinates::new(0.0, 0.0).to_mercator();
		assert!(c.x().abs() < 1e-6);
		assert!(c.y().abs() < 1e-6);
	}

	#[test]
	fn to_mercator_scales_positive_lonlat() {
		let c = Coordinates::new(13.4, 52.5).to_mercator();
		assert!(c.x() > 1_000_000.0);
		assert!(c.y() > 6_000_000.0);
	}

	#[test]
	fn to_json_rounds_to_precision() {
		let c = Coordinates::new(1.234_56, 2.345_67);
		assert_eq!(c.to_json(Some(2)), json!([1.23, 2.35]));
	}

	#[test]
	fn from_int_array() {
		let c = Coordinates::from([1, 2]);
		assert_eq!((c.x(), c.y()), (1.0, 2.0));
	}

	#[test]
	fn roundtrips_through_geo_coord() {
		let c = Coordinates::new(1.5, -2.5);
		let geo_coord: geo::Coord<f64> = c.into();
		assert_eq!(Coordinates::from(geo_coord), c);
	}
}
