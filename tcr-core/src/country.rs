//! Administrative country boundaries.
//!
//! Boundaries arrive as a GeoJSON `FeatureCollection` with one feature per
//! country, keyed by GAUL `ADM0_CODE` and named by `ADM0_NAME`. The geometry
//! is only used to place the map (extent and centroid) and to draw the
//! outline; distance logic happens upstream.

use anyhow::{anyhow, Context};
use geo::{BoundingRect, Centroid, Coord, MapCoords, MultiPolygon};
use geojson::{Feature, GeoJson};
use serde::{Deserialize, Serialize};

/// A country's id, display name and boundary geometry (WGS84 lon/lat).
#[derive(Debug, Clone, PartialEq)]
pub struct CountryBoundary {
    pub country_id: i32,
    pub name: String,
    pub geometry: MultiPolygon<f64>,
}

/// Bounding box and centroid of a country, in the longitude frame that keeps
/// the country contiguous.
///
/// When `crosses_antimeridian` is set, longitudes are expressed in the
/// 0..360 frame (e.g. Fiji spans roughly 177..182) instead of -180..180.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountryExtent {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
    pub centroid_lon: f64,
    pub centroid_lat: f64,
    pub crosses_antimeridian: bool,
}

impl CountryExtent {
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }
}

impl CountryBoundary {
    /// Parse a GeoJSON `FeatureCollection` of country boundaries.
    ///
    /// Features with non-areal geometry are skipped with a warning; a feature
    /// without an id or name fails the parse.
    pub fn parse_geojson(data: &str) -> anyhow::Result<Vec<CountryBoundary>> {
        let geojson: GeoJson = data.parse().context("boundary file is not valid GeoJSON")?;
        let collection = match geojson {
            GeoJson::FeatureCollection(fc) => fc,
            _ => anyhow::bail!("boundary file must be a GeoJSON FeatureCollection"),
        };

        let mut boundaries = Vec::with_capacity(collection.features.len());
        for (i, feature) in collection.features.into_iter().enumerate() {
            let country_id = feature_country_id(&feature)
                .with_context(|| format!("boundary feature {} has no ADM0_CODE", i))?;
            let name = feature_string(&feature, &["ADM0_NAME", "adm0_name", "name"])
                .with_context(|| format!("boundary feature {} has no ADM0_NAME", i))?;

            let Some(geometry) = feature.geometry else {
                log::warn!("Skipping boundary {} ({}): no geometry", name, country_id);
                continue;
            };
            let geometry: geo::Geometry<f64> = geometry
                .try_into()
                .map_err(|e| anyhow!("boundary {} has invalid geometry: {}", name, e))?;
            let geometry = match geometry {
                geo::Geometry::MultiPolygon(mp) => mp,
                geo::Geometry::Polygon(p) => MultiPolygon(vec![p]),
                _ => {
                    log::warn!("Skipping boundary {} ({}): not a polygon", name, country_id);
                    continue;
                }
            };

            boundaries.push(CountryBoundary {
                country_id,
                name,
                geometry,
            });
        }
        Ok(boundaries)
    }

    /// Extent and centroid in whichever longitude frame is narrower.
    ///
    /// Returns `None` for an empty geometry.
    pub fn extent(&self) -> Option<CountryExtent> {
        let standard = self.geometry.bounding_rect()?;
        let shifted_geometry = shift_to_positive_frame(&self.geometry);
        let shifted = shifted_geometry.bounding_rect()?;

        let crosses = shifted.width() + 1e-9 < standard.width();
        let (rect, centroid) = if crosses {
            (shifted, shifted_geometry.centroid()?)
        } else {
            (standard, self.geometry.centroid()?)
        };

        Some(CountryExtent {
            min_lon: rect.min().x,
            min_lat: rect.min().y,
            max_lon: rect.max().x,
            max_lat: rect.max().y,
            centroid_lon: centroid.x(),
            centroid_lat: centroid.y(),
            crosses_antimeridian: crosses,
        })
    }

    /// Serialize the geometry, unmodified, as a GeoJSON geometry object.
    pub fn geometry_geojson(&self) -> anyhow::Result<String> {
        geometry_to_geojson(&self.geometry)
    }
}

/// Move every negative longitude into the 0..360 frame.
pub fn shift_to_positive_frame(geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    geometry.map_coords(|c| Coord {
        x: shift_longitude(c.x),
        y: c.y,
    })
}

/// Map a -180..180 longitude into 0..360.
pub fn shift_longitude(lon: f64) -> f64 {
    if lon < 0.0 {
        lon + 360.0
    } else {
        lon
    }
}

/// Serialize a multipolygon as a GeoJSON geometry object.
pub fn geometry_to_geojson(geometry: &MultiPolygon<f64>) -> anyhow::Result<String> {
    let geometry = geojson::Geometry::new(geojson::Value::from(geometry));
    Ok(serde_json::to_string(&geometry)?)
}

/// Parse a GeoJSON geometry string (as stored alongside each country) back
/// into a multipolygon.
pub fn parse_geometry(geojson_str: &str) -> anyhow::Result<MultiPolygon<f64>> {
    let geometry: geojson::Geometry =
        serde_json::from_str(geojson_str).context("invalid GeoJSON geometry")?;
    let geometry: geo::Geometry<f64> = geometry
        .try_into()
        .map_err(|e| anyhow!("unsupported geometry: {}", e))?;
    match geometry {
        geo::Geometry::MultiPolygon(mp) => Ok(mp),
        geo::Geometry::Polygon(p) => Ok(MultiPolygon(vec![p])),
        _ => anyhow::bail!("boundary geometry must be a polygon or multipolygon"),
    }
}

fn feature_country_id(feature: &Feature) -> Option<i32> {
    ["ADM0_CODE", "adm0_code", "adm0_id"]
        .iter()
        .find_map(|key| feature.property(key))
        .and_then(|value| match value {
            serde_json::Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
}

fn feature_string(feature: &Feature, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| feature.property(key))
        .and_then(|value| value.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
