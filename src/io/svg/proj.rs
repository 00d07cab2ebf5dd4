//! Projection and polygon drawing for SVG output.

use std::io::Write;

use anyhow::Result;
use geo::{Coord, CoordsIter, LineString, MultiPolygon, Rect};

use super::escape_xml;

/// Linear lon/lat -> SVG (x, y) frame: aspect preserved, Y pointing down.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    bounds: Rect<f64>,
    margin: f64,
    scale: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    /// Fit `bounds` into `width` pixels, leaving `margin` on every side and
    /// `footer` extra pixels below the map.
    pub(crate) fn fit(bounds: Rect<f64>, width: f64, margin: f64, footer: f64) -> Self {
        // degenerate (zero-width) bounds still get a finite scale
        let extent = bounds.width().max(bounds.height() * 1e-3).max(f64::EPSILON);
        let scale = (width - 2.0 * margin).max(1.0) / extent;
        let height = bounds.height() * scale + 2.0 * margin + footer;
        Self { bounds, margin, scale, width, height }
    }

    #[inline]
    pub(crate) fn project(&self, coord: &Coord<f64>) -> (f64, f64) {
        let x = self.margin + (coord.x - self.bounds.min().x) * self.scale;
        let y = self.margin + (self.bounds.max().y - coord.y) * self.scale; // invert vertically
        (x, y)
    }

    /// Top of the area below the map.
    #[inline] pub(crate) fn map_bottom(&self) -> f64 { self.margin + self.bounds.height() * self.scale }

    #[inline] pub(crate) fn bounds(&self) -> &Rect<f64> { &self.bounds }
}

/// One filled polygon with its tooltip lines.
pub(crate) struct FilledShape<'a> {
    pub geometry: &'a MultiPolygon<f64>,
    pub fill: &'a str,
    pub tooltip: Vec<String>,
}

/// Draw polygons with specified fill colors and `<title>` tooltips.
pub(crate) fn draw_filled_shapes(writer: &mut impl Write, shapes: &[FilledShape<'_>], frame: &Frame) -> Result<()> {
    for shape in shapes {
        if shape.geometry.0.is_empty() { continue }
        writeln!(writer, r#"<path class="district" fill="{}" fill-rule="evenodd" d="{}"><title>{}</title></path>"#,
            shape.fill,
            multipolygon_to_path(shape.geometry, frame),
            escape_xml(&shape.tooltip.join("\n")),
        )?;
    }
    Ok(())
}

/// Build a compact SVG path string for a MultiPolygon (exteriors + holes).
fn multipolygon_to_path(shape: &MultiPolygon<f64>, frame: &Frame) -> String {
    let mut out = String::new();

    for polygon in &shape.0 {
        out.push_str(&ring_to_path(polygon.exterior(), frame));
        for interior in polygon.interiors() {
            out.push_str(&ring_to_path(interior, frame));
        }
    }

    out
}

/// Build a compact SVG path string for a LineString (ring).
fn ring_to_path(ring: &LineString<f64>, frame: &Frame) -> String {
    let mut out = String::new();

    let mut coords = ring.coords_iter()
        .map(|coord| frame.project(&coord));
    if let Some((x, y)) = coords.next() {
        out.push_str(&format!(" M{x:.3},{y:.3}"));
        for (x, y) in coords {
            out.push_str(&format!(" L{x:.3},{y:.3}"));
        }
        out.push('Z');
    }

    out
}

#[cfg(test)]
mod tests {
    use geo::{MultiPolygon, coord, polygon};

    use super::*;
    use crate::io::svg::SvgStringWriter;

    fn frame() -> Frame {
        Frame::fit(Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 5.0 }), 220.0, 10.0, 0.0)
    }

    #[test]
    fn projection_preserves_aspect_and_flips_y() {
        let frame = frame();
        assert_eq!(frame.project(&coord! { x: 0.0, y: 5.0 }), (10.0, 10.0));
        assert_eq!(frame.project(&coord! { x: 10.0, y: 0.0 }), (210.0, 110.0));
        assert_eq!(frame.height, 120.0);
        assert_eq!(frame.map_bottom(), 110.0);
    }

    #[test]
    fn draws_path_with_tooltip() {
        let square = MultiPolygon(vec![polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 0.0)]]);
        let empty = MultiPolygon(vec![]);
        let shapes = [
            FilledShape { geometry: &square, fill: "#FFD166", tooltip: vec!["Wilayah: A & B".into()] },
            FilledShape { geometry: &empty, fill: "#cccccc", tooltip: vec![] },
        ];

        let mut writer = SvgStringWriter::new();
        draw_filled_shapes(&mut writer, &shapes, &frame()).unwrap();
        let svg = writer.into_string().unwrap();

        assert_eq!(svg.lines().count(), 1);
        assert!(svg.contains(r##"fill="#FFD166""##));
        assert!(svg.contains(" M10.000,110.000 L30.000,110.000"));
        assert!(svg.contains("<title>Wilayah: A &amp; B</title>"));
    }
}
