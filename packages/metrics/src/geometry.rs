//! GeoJSON geometry helpers.
//!
//! Converts caller-supplied GeoJSON geometry into [`MultiPolygon`] values
//! and derives an area size from the ring when the caller has no
//! precomputed km² figure.

use geo::{ChamberlainDuquetteArea, MultiPolygon};
use geojson::GeoJson;

/// Parses a GeoJSON string into a [`MultiPolygon`].
///
/// Handles both `Polygon` and `MultiPolygon` geometry types. Returns
/// `None` for anything else or for malformed input.
#[must_use]
pub fn multipolygon_from_geojson(geojson_str: &str) -> Option<MultiPolygon<f64>> {
    let geojson: GeoJson = geojson_str.parse().ok()?;
    let geometry = match geojson {
        GeoJson::Geometry(geom) => geom,
        GeoJson::Feature(feature) => feature.geometry?,
        GeoJson::FeatureCollection(_) => return None,
    };
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

/// Spherical surface area of a WGS84 lon/lat polygon in km².
#[must_use]
pub fn polygon_area_km2(polygon: &MultiPolygon<f64>) -> f64 {
    polygon.chamberlain_duquette_unsigned_area() / 1_000_000.0
}
