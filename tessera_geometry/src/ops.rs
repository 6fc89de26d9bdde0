//! Geometry repair, reprojection, and antimeridian handling.
//!
//! These are the operations the vector I/O pipeline runs a feature's
//! geometry through between "read from the source driver" and "written
//! into a tile": cleaning up topology, clipping to the window a tile task
//! actually needs, and reprojecting into the tile's CRS. Reprojection goes
//! through the `proj` crate behind the `projtransform` feature, the same
//! way `pka-tile-grid` keeps its GDAL/PROJ integration optional.

use crate::geo::Geometry;
use anyhow::{Result, anyhow, bail, ensure};
use geo::BooleanOps;
use tessera_core::Crs;
use tessera_derive::context;

/// Options controlling [`reproject_geometry`]'s clip-and-retry behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReprojectOptions {
	/// Clip to the destination CRS's known lat/lon bounds before the final
	/// transform, via an intermediate lat/lon projection.
	pub clip_to_crs_bounds: bool,
	/// Fail instead of silently clipping if the geometry (reprojected to
	/// lat/lon) isn't fully contained in the destination CRS's bounds.
	pub error_on_clip: bool,
	/// If a direct transform fails with a projection error, retry once
	/// with `clip_to_crs_bounds` forced on.
	pub retry_with_clip: bool,
	/// Densify the input to this segment length (in source CRS units)
	/// before transforming, so long segments don't cut corners across
	/// curved projections.
	pub segmentize: Option<f64>,
}

/// Cleans up a geometry's topology.
///
/// Rings are deduplicated and re-closed; degenerate rings (fewer than 3
/// distinct points) are dropped. This crate has no `geos` binding to run a
/// true buffer-by-zero repair, so this is a best-effort structural clean,
/// not a topology-validity guarantee — see `DESIGN.md`.
///
/// # Errors
/// Returns a topology error (carrying the validity failure) if the
/// geometry is still invalid after cleaning.
pub fn repair(geometry: &Geometry) -> Result<Geometry> {
	let repaired = clean(geometry);
	repaired
		.verify()
		.map_err(|e| anyhow!("geometry failed validity check after repair: {e}"))?;
	Ok(repaired)
}

fn clean(geometry: &Geometry) -> Geometry {
	use crate::geo::{CompositeGeometryTrait, PolygonGeometry};
	match geometry {
		Geometry::LinearRing(ring) => Geometry::LinearRing(dedupe_ring(ring)),
		Geometry::Polygon(polygon) => {
			Geometry::Polygon(PolygonGeometry(polygon.as_vec().iter().map(dedupe_ring).collect()))
		}
		Geometry::MultiPolygon(multi) => Geometry::MultiPolygon(crate::geo::MultiPolygonGeometry(
			multi
				.as_vec()
				.iter()
				.map(|polygon| PolygonGeometry(polygon.as_vec().iter().map(dedupe_ring).collect()))
				.collect(),
		)),
		Geometry::GeometryCollection(members) => Geometry::GeometryCollection(members.iter().map(clean).collect()),
		other => other.clone(),
	}
}

fn dedupe_ring(ring: &crate::geo::RingGeometry) -> crate::geo::RingGeometry {
	ring.deduped().closed()
}

/// Yields the subgeometries of `geometry` matching `target` (a GeoJSON type
/// name such as `"Polygon"`). `GeometryCollection` is unpacked recursively.
/// When `allow_multipart` is set, a geometry matching `target`'s multipart
/// cognate (e.g. `MultiPolygon` for `target = "Polygon"`) is also yielded,
/// split into its single-part members.
#[must_use]
pub fn filter_by_geometry_type(geometry: &Geometry, target: &str, allow_multipart: bool) -> Vec<Geometry> {
	let mut out = Vec::new();
	collect_by_type(geometry, target, allow_multipart, &mut out);
	out
}

fn collect_by_type(geometry: &Geometry, target: &str, allow_multipart: bool, out: &mut Vec<Geometry>) {
	use crate::geo::CompositeGeometryTrait;
	match geometry {
		Geometry::GeometryCollection(members) => {
			for member in members {
				collect_by_type(member, target, allow_multipart, out);
			}
		}
		_ if geometry.get_type() == target => out.push(geometry.clone()),
		Geometry::MultiPoint(g) if allow_multipart && target == "Point" => {
			out.extend(g.as_vec().iter().cloned().map(Geometry::Point));
		}
		Geometry::MultiLineString(g) if allow_multipart && target == "LineString" => {
			out.extend(g.as_vec().iter().cloned().map(Geometry::LineString));
		}
		Geometry::MultiPolygon(g) if allow_multipart && target == "Polygon" => {
			out.extend(g.as_vec().iter().cloned().map(Geometry::Polygon));
		}
		_ => {}
	}
}

/// Recurses into `GeometryCollection`s and multipart geometries, yielding
/// only single-part geometries (`Point`, `LineString`, `LinearRing`,
/// `Polygon`).
#[must_use]
pub fn multipart_to_singleparts(geometry: &Geometry) -> Vec<Geometry> {
	use crate::geo::CompositeGeometryTrait;
	match geometry {
		Geometry::GeometryCollection(members) => members.iter().flat_map(multipart_to_singleparts).collect(),
		Geometry::MultiPoint(g) => g.as_vec().iter().cloned().map(Geometry::Point).collect(),
		Geometry::MultiLineString(g) => g.as_vec().iter().cloned().map(Geometry::LineString).collect(),
		Geometry::MultiPolygon(g) => g.as_vec().iter().cloned().map(Geometry::Polygon).collect(),
		other => vec![other.clone()],
	}
}

/// `min(width, height) / fraction` of `geometry`'s bounding box, the
/// standard way to derive a segmentize length proportional to a
/// geometry's own scale.
#[must_use]
pub fn get_segmentize_value(geometry: &Geometry, fraction: f64) -> f64 {
	match geometry.compute_bounds() {
		Some([x_min, y_min, x_max, y_max]) => ((x_max - x_min).min(y_max - y_min) / fraction).abs(),
		None => 0.0,
	}
}

/// Inserts interpolated points into `geometry` so that no segment exceeds
/// `seg` in length. Supported for `Polygon`, `LineString`, `LinearRing`,
/// and `MultiPolygon`; other geometry types are returned unchanged.
#[must_use]
pub fn segmentize_geometry(geometry: &Geometry, seg: f64) -> Geometry {
	use geo::Densify;
	match geometry {
		Geometry::LineString(g) => {
			let line: geo::LineString<f64> = g.clone().into();
			Geometry::LineString(line.densify(seg).into())
		}
		Geometry::LinearRing(g) => {
			let line: geo::LineString<f64> = g.clone().into();
			Geometry::LinearRing(line.densify(seg).into())
		}
		Geometry::Polygon(g) => {
			let polygon: geo::Polygon<f64> = g.clone().into();
			Geometry::Polygon(polygon.densify(seg).into())
		}
		Geometry::MultiPolygon(g) => {
			let multi: geo::MultiPolygon<f64> = g.clone().into();
			Geometry::MultiPolygon(multi.densify(seg).into())
		}
		other => other.clone(),
	}
}

/// Applies `f` to every coordinate in `geometry`, short-circuiting on the
/// first failure (used for reprojection, where the transform itself can
/// fail per-point).
fn try_map_coords(geometry: &Geometry, f: &mut impl FnMut(f64, f64) -> Result<(f64, f64)>) -> Result<Geometry> {
	use crate::geo::{Coordinates, CompositeGeometryTrait};

	fn map_coord(c: &Coordinates, f: &mut impl FnMut(f64, f64) -> Result<(f64, f64)>) -> Result<Coordinates> {
		let (x, y) = f(c.x(), c.y())?;
		Ok(Coordinates::new(x, y))
	}

	Ok(match geometry {
		Geometry::Point(g) => Geometry::Point(crate::geo::PointGeometry::new(map_coord(g.as_coord(), f)?)),
		Geometry::LineString(g) => Geometry::LineString(crate::geo::LineStringGeometry::new(
			g.as_vec().iter().map(|c| map_coord(c, f)).collect::<Result<Vec<_>>>()?,
		)),
		Geometry::LinearRing(g) => Geometry::LinearRing(crate::geo::RingGeometry(
			g.as_vec().iter().map(|c| map_coord(c, f)).collect::<Result<Vec<_>>>()?,
		)),
		Geometry::Polygon(g) => Geometry::Polygon(crate::geo::PolygonGeometry(
			g.as_vec()
				.iter()
				.map(|ring| match try_map_coords(&Geometry::LinearRing(ring.clone()), f)? {
					Geometry::LinearRing(r) => Ok(r),
					_ => unreachable!(),
				})
				.collect::<Result<Vec<_>>>()?,
		)),
		Geometry::MultiPoint(g) => Geometry::MultiPoint(crate::geo::MultiPointGeometry(
			g.as_vec()
				.iter()
				.map(|p| match try_map_coords(&Geometry::Point(p.clone()), f)? {
					Geometry::Point(p) => Ok(p),
					_ => unreachable!(),
				})
				.collect::<Result<Vec<_>>>()?,
		)),
		Geometry::MultiLineString(g) => Geometry::MultiLineString(crate::geo::MultiLineStringGeometry(
			g.as_vec()
				.iter()
				.map(|l| match try_map_coords(&Geometry::LineString(l.clone()), f)? {
					Geometry::LineString(l) => Ok(l),
					_ => unreachable!(),
				})
				.collect::<Result<Vec<_>>>()?,
		)),
		Geometry::MultiPolygon(g) => Geometry::MultiPolygon(crate::geo::MultiPolygonGeometry(
			g.as_vec()
				.iter()
				.map(|p| match try_map_coords(&Geometry::Polygon(p.clone()), f)? {
					Geometry::Polygon(p) => Ok(p),
					_ => unreachable!(),
				})
				.collect::<Result<Vec<_>>>()?,
		)),
		Geometry::GeometryCollection(members) => {
			Geometry::GeometryCollection(members.iter().map(|m| try_map_coords(m, f)).collect::<Result<Vec<_>>>()?)
		}
	})
}

/// Shifts every negative-x coordinate in `geometry` by `+360`, without
/// reprojecting. Used to merge antimeridian-straddling geometries onto one
/// side before a union or split.
fn shift_negative_lon(geometry: &Geometry) -> Geometry {
	try_map_coords(geometry, &mut |x, y| Ok((if x < 0.0 { x + 360.0 } else { x }, y))).expect("infallible shift")
}

#[cfg(feature = "projtransform")]
fn transform_with(proj: &proj::Proj, geometry: &Geometry) -> Result<Geometry> {
	try_map_coords(geometry, &mut |x, y| {
		proj.convert((x, y)).map_err(|e| anyhow!("PROJ transform failed: {e}"))
	})
}

#[cfg(feature = "projtransform")]
fn proj_for(src: &Crs, dst: &Crs) -> Result<proj::Proj> {
	proj::Proj::new_known_crs(&src.proj_definition(), &dst.proj_definition(), None)
		.map_err(|e| anyhow!("could not build PROJ transform {} -> {}: {e}", src.proj_definition(), dst.proj_definition()))
}

/// Reprojects `geometry` from `src` to `dst`, optionally clipping to the
/// destination CRS's known bounds first and retrying once with clipping on
/// transform failure.
///
/// # Errors
/// Fails if the `projtransform` feature is disabled, if the geometry lies
/// outside the destination CRS's bounds and `opts.error_on_clip` is set, or
/// if the underlying PROJ transform fails (after the retry, if enabled).
#[context("reprojecting geometry to {}", dst.proj_definition())]
pub fn reproject_geometry(geometry: &Geometry, src: &Crs, dst: &Crs, opts: ReprojectOptions) -> Result<Geometry> {
	#[cfg(not(feature = "projtransform"))]
	{
		let _ = (geometry, src, dst, opts);
		bail!("reprojection requires the \"projtransform\" feature");
	}

	#[cfg(feature = "projtransform")]
	{
		let repaired = repair(geometry)?;
		if src == dst || repaired.compute_bounds().is_none() {
			return Ok(repaired);
		}

		let input = match opts.segmentize {
			Some(seg) => segmentize_geometry(&repaired, seg),
			None => repaired,
		};

		if opts.clip_to_crs_bounds && !dst.is_latlon() {
			if let Some(bounds) = dst.known_bounds() {
				let to_latlon = proj_for(src, &Crs::wgs84())?;
				let in_latlon = transform_with(&to_latlon, &input)?;

				if opts.error_on_clip {
					let [x_min, y_min, x_max, y_max] = in_latlon
						.compute_bounds()
						.ok_or_else(|| anyhow!("geometry has no bounds to check against CRS bounds"))?;
					ensure!(
						x_min >= bounds.left() && y_min >= bounds.bottom() && x_max <= bounds.right() && y_max <= bounds.top(),
						"geometry lies outside destination CRS bounds"
					);
				}

				let clipped = clip_to_bounds(&in_latlon, &bounds);
				let to_dst = proj_for(&Crs::wgs84(), dst)?;
				return transform_with(&to_dst, &clipped);
			}
		}

		let direct = proj_for(src, dst)?;
		match transform_with(&direct, &input) {
			Ok(result) => Ok(result),
			Err(e) if opts.retry_with_clip => {
				let retried = ReprojectOptions { clip_to_crs_bounds: true, ..opts };
				reproject_geometry(&input, src, dst, retried)
					.map_err(|retry_err| anyhow!("reprojection failed: {e}; retry with clip also failed: {retry_err}"))
			}
			Err(e) => Err(anyhow!("reprojection failed: {e}")),
		}
	}
}

/// Intersects a `Polygon`/`MultiPolygon` footprint with a bounds rectangle
/// in the geometry's own CRS. Other geometry types pass through unclipped.
/// Exposed beyond this module because the vector I/O read path clips every
/// source feature against the query bbox the same way.
pub fn clip_to_bounds(geometry: &Geometry, bounds: &tessera_core::Bounds) -> Geometry {
	let clip_box = geo::Polygon::new(
		geo::LineString::from(vec![
			(bounds.left(), bounds.bottom()),
			(bounds.right(), bounds.bottom()),
			(bounds.right(), bounds.top()),
			(bounds.left(), bounds.top()),
			(bounds.left(), bounds.bottom()),
		]),
		vec![],
	);
	match geometry {
		Geometry::Polygon(g) => {
			let polygon: geo::Polygon<f64> = g.clone().into();
			Geometry::MultiPolygon(geo::MultiPolygon::new(vec![polygon]).intersection(&clip_box.into()).into())
		}
		Geometry::MultiPolygon(g) => {
			let multi: geo::MultiPolygon<f64> = g.clone().into();
			Geometry::MultiPolygon(multi.intersection(&clip_box.into()).into())
		}
		other => other.clone(),
	}
}

/// Transforms `geometry`'s coordinates from `src_crs` to lat/lon. If the
/// resulting longitudinal extent exceeds `width_threshold` (degrees), the
/// geometry is assumed to cross the antimeridian and negative-x
/// coordinates are shifted by `+360`, so the shape stays contiguous even
/// though it then extends past +180.
///
/// # Errors
/// Fails if the `projtransform` feature is disabled or the underlying
/// transform fails.
pub fn transform_to_latlon(geometry: &Geometry, src_crs: &Crs, width_threshold: f64) -> Result<Geometry> {
	let in_latlon = if src_crs.is_latlon() {
		geometry.clone()
	} else {
		#[cfg(feature = "projtransform")]
		{
			transform_with(&proj_for(src_crs, &Crs::wgs84())?, geometry)?
		}
		#[cfg(not(feature = "projtransform"))]
		{
			bail!("reprojection requires the \"projtransform\" feature");
		}
	};

	Ok(match in_latlon.compute_bounds() {
		Some([x_min, _, x_max, _]) if x_max - x_min > width_threshold => shift_negative_lon(&in_latlon),
		_ => in_latlon,
	})
}

/// Repairs a `Polygon`/`MultiPolygon` that may straddle the antimeridian:
/// shifts negative-longitude vertices by `+360`, splits at `x = 180`,
/// shifts the overflowing part back by `-360`, and unions the two parts
/// into a `MultiPolygon` strictly within `[-180, 180]`.
///
/// Non-polygonal geometries are only shifted (splitting a line or point at
/// x=180 has no clean geometric meaning), not split.
#[must_use]
pub fn repair_antimeridian_geometry(geometry: &Geometry, width_threshold: f64) -> Geometry {
	let Some([x_min, _, x_max, _]) = geometry.compute_bounds() else {
		return geometry.clone();
	};
	if x_max - x_min <= width_threshold {
		return geometry.clone();
	}

	match geometry {
		Geometry::Polygon(_) | Geometry::MultiPolygon(_) => {
			let shifted = shift_negative_lon(geometry);
			let multi: geo::MultiPolygon<f64> = match &shifted {
				Geometry::Polygon(g) => geo::MultiPolygon::new(vec![g.clone().into()]),
				Geometry::MultiPolygon(g) => g.clone().into(),
				_ => unreachable!(),
			};

			let inside_box = half_plane_box(-180.0, 180.0);
			let overflow_box = half_plane_box(180.0, 540.0);

			let inside = multi.intersection(&inside_box);
			let overflow = multi.intersection(&overflow_box);
			let overflow_shifted = shift_negative_lon(&Geometry::MultiPolygon(
				crate::geo::MultiPolygonGeometry::from(overflow),
			));
			let overflow_shifted_back = match &overflow_shifted {
				Geometry::MultiPolygon(_) => shift_multi(&overflow_shifted, -360.0),
				_ => unreachable!(),
			};
			let overflow_geo: geo::MultiPolygon<f64> = match overflow_shifted_back {
				Geometry::MultiPolygon(g) => g.into(),
				_ => unreachable!(),
			};

			let mut polygons = inside.0;
			polygons.extend(overflow_geo.0);
			Geometry::MultiPolygon(crate::geo::MultiPolygonGeometry::from(geo::unary_union(&polygons)))
		}
		_ => shift_negative_lon(geometry),
	}
}

fn shift_multi(geometry: &Geometry, dx: f64) -> Geometry {
	try_map_coords(geometry, &mut |x, y| Ok((x + dx, y))).expect("infallible shift")
}

fn half_plane_box(x_min: f64, x_max: f64) -> geo::MultiPolygon<f64> {
	geo::MultiPolygon::new(vec![geo::Polygon::new(
		geo::LineString::from(vec![
			(x_min, -90.0),
			(x_max, -90.0),
			(x_max, 90.0),
			(x_min, 90.0),
			(x_min, -90.0),
		]),
		vec![],
	)])
}

/// Buffers a lat/lon `Polygon`/`MultiPolygon` footprint by `buffer_m`
/// meters, by reprojecting to the local UTM zone (picked from the
/// geometry's bounding-box center), buffering there, and reprojecting
/// back.
///
/// The buffer itself is an approximate outward offset of each ring's
/// vertices along their local normal, not an exact Minkowski sum — this
/// crate has no `geos`/buffer binding available. Good enough for the
/// tile-bounds footprints this is used on; not a general-purpose buffer.
///
/// # Errors
/// Fails if the `projtransform` feature is disabled or the underlying
/// transforms fail.
pub fn buffer_antimeridian_safe(geometry: &Geometry, buffer_m: f64) -> Result<Geometry> {
	let crosses = geometry
		.compute_bounds()
		.is_some_and(|[x_min, _, x_max, _]| x_max - x_min > 180.0);
	let merged = if crosses { shift_negative_lon(geometry) } else { geometry.clone() };

	let [x_min, y_min, x_max, y_max] = merged
		.compute_bounds()
		.ok_or_else(|| anyhow!("cannot buffer an empty geometry"))?;
	let (center_lon, center_lat) = ((x_min + x_max) / 2.0, (y_min + y_max) / 2.0);
	let utm = latlon_to_utm_crs(center_lat, if center_lon > 180.0 { center_lon - 360.0 } else { center_lon });

	let in_utm = reproject_geometry(&merged, &Crs::wgs84(), &utm, ReprojectOptions::default())?;
	let buffered = approximate_buffer(&in_utm, buffer_m);
	let back = reproject_geometry(&buffered, &utm, &Crs::wgs84(), ReprojectOptions::default())?;

	Ok(if crosses { repair_antimeridian_geometry(&back, 180.0) } else { back })
}

fn approximate_buffer(geometry: &Geometry, dist: f64) -> Geometry {
	use crate::geo::{CompositeGeometryTrait, Coordinates, PolygonGeometry, RingGeometry};

	fn offset_ring(ring: &RingGeometry, dist: f64) -> RingGeometry {
		let points = ring.as_vec();
		if points.len() < 4 {
			return ring.clone();
		}
		let n = points.len() - 1; // last point duplicates first
		let mut out = Vec::with_capacity(points.len());
		for i in 0..n {
			let prev = points[(i + n - 1) % n];
			let curr = points[i];
			let next = points[(i + 1) % n];

			let n1 = outward_normal(&prev, &curr);
			let n2 = outward_normal(&curr, &next);
			let (mut nx, mut ny) = (n1.0 + n2.0, n1.1 + n2.1);
			let len = (nx * nx + ny * ny).sqrt();
			if len > 1e-9 {
				nx /= len;
				ny /= len;
			}
			out.push(Coordinates::new(curr.x() + nx * dist, curr.y() + ny * dist));
		}
		out.push(out[0]);
		RingGeometry(out)
	}

	fn outward_normal(a: &Coordinates, b: &Coordinates) -> (f64, f64) {
		let (dx, dy) = (b.x() - a.x(), b.y() - a.y());
		let len = (dx * dx + dy * dy).sqrt();
		if len < 1e-9 {
			(0.0, 0.0)
		} else {
			(dy / len, -dx / len)
		}
	}

	match geometry {
		Geometry::Polygon(g) => {
			let mut rings = g.as_vec().iter();
			let exterior = rings.next().map(|r| offset_ring(r, dist));
			let interiors: Vec<_> = rings.cloned().collect();
			match exterior {
				Some(exterior) => {
					let mut out = vec![exterior];
					out.extend(interiors);
					Geometry::Polygon(PolygonGeometry(out))
				}
				None => geometry.clone(),
			}
		}
		Geometry::MultiPolygon(g) => Geometry::MultiPolygon(crate::geo::MultiPolygonGeometry(
			g.as_vec()
				.iter()
				.map(|polygon| match approximate_buffer(&Geometry::Polygon(polygon.clone()), dist) {
					Geometry::Polygon(p) => p,
					_ => unreachable!(),
				})
				.collect(),
		)),
		other => other.clone(),
	}
}

/// Picks the UTM zone EPSG code containing `(lat, lon)`.
///
/// Zone = `clamp(floor((lon+180)/6)+1, 1, 60)`; EPSG `326ZZ` for the
/// northern hemisphere (`lat > 0`), `327ZZ` otherwise.
#[must_use]
pub fn latlon_to_utm_crs(lat: f64, lon: f64) -> Crs {
	let zone = (((lon + 180.0) / 6.0).floor() as i64 + 1).clamp(1, 60) as u32;
	let code = if lat > 0.0 { 326_00 + zone } else { 327_00 + zone };
	Crs::from_epsg(code)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::geo::Geometry;

	#[test]
	fn repair_dedupes_ring_points() {
		let polygon = Geometry::new_polygon(vec![vec![[0, 0], [0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]]);
		let repaired = repair(&polygon).unwrap();
		if let Geometry::Polygon(p) = repaired {
			assert_eq!(p.0[0].0.len(), 5);
		} else {
			panic!("expected polygon");
		}
	}

	#[test]
	fn filter_by_geometry_type_unpacks_collection() {
		let collection = Geometry::GeometryCollection(vec![
			Geometry::new_point([0.0, 0.0]),
			Geometry::new_line_string(vec![[0, 0], [1, 1]]),
		]);
		let points = filter_by_geometry_type(&collection, "Point", false);
		assert_eq!(points.len(), 1);
	}

	#[test]
	fn filter_by_geometry_type_allows_multipart_cognate() {
		let multi = Geometry::new_multi_point(vec![[0, 0], [1, 1]]);
		assert_eq!(filter_by_geometry_type(&multi, "Point", true).len(), 2);
		assert_eq!(filter_by_geometry_type(&multi, "Point", false).len(), 0);
	}

	#[test]
	fn multipart_to_singleparts_splits_multipolygon() {
		let multi = Geometry::new_example();
		let parts = multipart_to_singleparts(&multi);
		assert_eq!(parts.len(), 2);
		assert!(parts.iter().all(|g| g.get_type() == "Polygon"));
	}

	#[test]
	fn get_segmentize_value_uses_min_dimension() {
		let line = Geometry::new_line_string(vec![[0, 0], [10, 20]]);
		assert_eq!(get_segmentize_value(&line, 2.0), 5.0);
	}

	#[test]
	fn segmentize_adds_points_to_long_segments() {
		let line = Geometry::new_line_string(vec![[0, 0], [10, 0]]);
		let segmented = segmentize_geometry(&line, 2.0);
		if let Geometry::LineString(g) = segmented {
			assert!(g.0.len() > 2);
		} else {
			panic!("expected linestring");
		}
	}

	#[test]
	fn transform_to_latlon_is_noop_for_latlon_source() {
		let point = Geometry::new_point([13.4, 52.5]);
		let out = transform_to_latlon(&point, &Crs::wgs84(), 180.0).unwrap();
		assert_eq!(out.compute_bounds(), point.compute_bounds());
	}

	#[test]
	fn repair_antimeridian_leaves_non_crossing_geometry_untouched() {
		let polygon = Geometry::new_polygon(vec![vec![[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]]);
		let repaired = repair_antimeridian_geometry(&polygon, 180.0);
		assert_eq!(repaired.compute_bounds(), polygon.compute_bounds());
	}

	#[test]
	fn latlon_to_utm_crs_picks_expected_zone_and_hemisphere() {
		assert_eq!(latlon_to_utm_crs(52.5, 13.4).proj_definition(), "EPSG:32633");
		assert_eq!(latlon_to_utm_crs(-33.9, 18.4).proj_definition(), "EPSG:32734");
	}

	#[test]
	fn latlon_to_utm_crs_clamps_zone_at_edges() {
		assert_eq!(latlon_to_utm_crs(10.0, 179.9).proj_definition(), "EPSG:32660");
		assert_eq!(latlon_to_utm_crs(10.0, -179.9).proj_definition(), "EPSG:32601");
	}
}
