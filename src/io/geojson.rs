//! GeoJSON reading and writing (RFC 7946 FeatureCollections of polygons).

use anyhow::{Context, Result, anyhow, bail};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{Map, Value, json};

/// A polygonal feature with its raw properties.
#[derive(Debug, Clone)]
pub(crate) struct Feature {
    pub geometry: MultiPolygon<f64>,
    pub properties: Map<String, Value>,
}

/// Read every feature of a FeatureCollection. Polygon and MultiPolygon
/// geometries are supported; a null geometry becomes an empty MultiPolygon.
pub(crate) fn read_features(bytes: &[u8]) -> Result<Vec<Feature>> {
    let value: Value = serde_json::from_slice(bytes).context("[io::geojson] Failed to parse GeoJSON")?;

    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("[io::geojson] expected a FeatureCollection with a \"features\" array"))?;

    features.iter().enumerate()
        .map(|(i, feature)| {
            let geometry = parse_geometry(&feature["geometry"])
                .with_context(|| format!("[io::geojson] invalid geometry in feature {i}"))?;
            let properties = feature["properties"].as_object().cloned().unwrap_or_default();
            Ok(Feature { geometry, properties })
        })
        .collect()
}

fn parse_geometry(geometry: &Value) -> Result<MultiPolygon<f64>> {
    if geometry.is_null() { return Ok(MultiPolygon(vec![])) }

    let coords = geometry["coordinates"].as_array()
        .ok_or_else(|| anyhow!("missing coordinates"))?;

    match geometry["type"].as_str() {
        Some("Polygon") => Ok(MultiPolygon(vec![parse_polygon(coords)?])),
        Some("MultiPolygon") => Ok(MultiPolygon(
            coords.iter()
                .map(|polygon| parse_polygon(polygon.as_array().ok_or_else(|| anyhow!("polygon is not an array"))?))
                .collect::<Result<Vec<_>>>()?
        )),
        Some(other) => bail!("expected Polygon or MultiPolygon, found {other}"),
        None => bail!("geometry has no type"),
    }
}

/// `[exterior, hole, hole, ...]`
fn parse_polygon(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(parse_ring);
    let exterior = rings.next().ok_or_else(|| anyhow!("polygon has no exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// `[[x, y], [x, y], ...]`; extra ordinates (z, m) are ignored.
fn parse_ring(ring: &Value) -> Result<LineString<f64>> {
    let points = ring.as_array().ok_or_else(|| anyhow!("ring is not an array"))?;
    points.iter()
        .map(|point| match point.as_array().map(Vec::as_slice) {
            Some([x, y, ..]) => match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => Ok(Coord { x, y }),
                _ => bail!("non-numeric coordinate {point}"),
            },
            _ => bail!("invalid position {point}"),
        })
        .collect::<Result<Vec<_>>>()
        .map(LineString)
}

/// Serialize features to a FeatureCollection.
pub(crate) fn write_features<'a>(features: impl IntoIterator<Item = (&'a MultiPolygon<f64>, Value)>) -> Result<Vec<u8>> {
    let features = features.into_iter()
        .map(|(geometry, properties)| json!({
            "type": "Feature",
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": multipolygon_coords(geometry),
            },
            "properties": properties,
        }))
        .collect::<Vec<_>>();

    let collection = json!({
        "type": "FeatureCollection",
        "features": features,
    });

    serde_json::to_vec(&collection).context("[io::geojson] Failed to serialize GeoJSON")
}

fn multipolygon_coords(mp: &MultiPolygon<f64>) -> Value {
    let ring = |ls: &LineString<f64>| ls.coords().map(|c| json!([c.x, c.y])).collect::<Vec<_>>();
    mp.0.iter()
        .map(|polygon| {
            std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .map(ring)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>()
        .into()
}
