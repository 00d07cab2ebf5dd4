//! Shapefile reading operations.

use std::path::Path;

use anyhow::{Context, Result, bail};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use shapefile::{PolygonRing, Reader, Shape, dbase::{FieldValue, Record}};

/// Reads all shapes + attribute records from a given `.shp` file path.
pub(crate) fn read_shapefile(path: &Path) -> Result<Vec<(Shape, Record)>> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("[io::shp] Failed to open shapefile: {}", path.display()))?;

    let mut items = Vec::with_capacity(reader.shape_count()?);
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result
            .with_context(|| format!("[io::shp] Error reading shape+record from {}", path.display()))?;
        items.push((shape, record));
    }
    Ok(items)
}

/// Convert a polygonal shape to geo::MultiPolygon<f64>. Null shapes become empty.
pub(crate) fn shape_to_geo(shape: &Shape) -> Result<MultiPolygon<f64>> {
    Ok(match shape {
        Shape::Polygon(p) => rings_to_geo(p.rings(), |pt| (pt.x, pt.y)),
        Shape::PolygonM(p) => rings_to_geo(p.rings(), |pt| (pt.x, pt.y)),
        Shape::PolygonZ(p) => rings_to_geo(p.rings(), |pt| (pt.x, pt.y)),
        Shape::NullShape => MultiPolygon(vec![]),
        other => bail!("[io::shp] expected polygon geometry, found {:?}", other.shapetype()),
    })
}

/// Group rings into polygons: each outer ring owns the inner rings that follow it.
fn rings_to_geo<P>(rings: &[PolygonRing<P>], xy: impl Fn(&P) -> (f64, f64)) -> MultiPolygon<f64> {
    /// Ensure first and last are the same for geo::LineString coords
    fn closed(mut coords: Vec<Coord<f64>>) -> LineString<f64> {
        if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
            if first != last { coords.push(first) }
        }
        LineString(coords)
    }

    let mut polygons = Vec::new();
    let mut exterior: Option<LineString<f64>> = None;
    let mut holes = Vec::new();

    for ring in rings {
        let coords = ring.points().iter()
            .map(|pt| { let (x, y) = xy(pt); Coord { x, y } })
            .collect();
        match ring {
            PolygonRing::Outer(_) => {
                if let Some(ext) = exterior.replace(closed(coords)) {
                    polygons.push(Polygon::new(ext, std::mem::take(&mut holes)));
                }
            }
            PolygonRing::Inner(_) => holes.push(closed(coords)),
        }
    }
    if let Some(ext) = exterior {
        polygons.push(Polygon::new(ext, holes));
    }

    MultiPolygon(polygons)
}

/// Text value of a dBase attribute. A null value is `Ok(None)`;
/// a field absent from the table or of non-text type is an error.
pub(crate) fn text_field(record: &Record, field: &str) -> Result<Option<String>> {
    match record.get(field) {
        Some(FieldValue::Character(value)) => Ok(value.as_deref().map(str::trim).map(str::to_string)),
        Some(FieldValue::Memo(value)) => Ok(Some(value.trim().to_string())),
        Some(other) => bail!("attribute {field:?} is not text (found {other:?})"),
        None => bail!("missing attribute column {field:?}"),
    }
}
