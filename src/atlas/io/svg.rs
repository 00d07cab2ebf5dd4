use std::{io::Write, path::Path};

use anyhow::{Context, Result, anyhow};
use geo::{BoundingRect, Coord, Rect};

use crate::atlas::{Atlas, Category, EnrichedRecord, NEUTRAL_COLOR, cluster_color};
use crate::io::svg::{self, FilledShape, Frame, SvgStringWriter, escape_xml};

const MARGIN: f64 = 20.0;
const TITLE_HEIGHT: f64 = 30.0;
const LEGEND_ROW: f64 = 20.0;
/// Six categories plus the unmatched swatch.
const LEGEND_ROWS: usize = Category::ALL.len() + 1;

impl Atlas {
    /// Small wrapper with defaults.
    pub fn to_svg(&self, path: &Path, province: Option<&str>) -> Result<()> {
        self.to_svg_with_width(path, province, 1100)
    }

    /// Write a choropleth of one province (or all records) to an SVG file.
    pub fn to_svg_with_width(&self, path: &Path, province: Option<&str>, width: u32) -> Result<()> {
        let svg = self.to_svg_string(province, width)?;
        std::fs::write(path, svg)
            .with_context(|| format!("[to_svg] Failed to write {}", path.display()))
    }

    /// Render a choropleth: districts filled by cluster colour, each with a
    /// tooltip, followed by a title and a legend in category rank order.
    pub fn to_svg_string(&self, province: Option<&str>, width: u32) -> Result<String> {
        let records = self.select(province);

        let bounds = records_bounds(&records)
            .ok_or_else(|| anyhow!("[to_svg] No geometries available to draw."))?;

        let footer = TITLE_HEIGHT + LEGEND_ROWS as f64 * LEGEND_ROW + MARGIN;
        let frame = Frame::fit(bounds, width as f64, MARGIN, footer);
        let center = self.summary(province).center;

        let shapes = records.iter()
            .map(|r| FilledShape {
                geometry: &r.boundary.geometry,
                fill: cluster_color(r.cluster()),
                tooltip: tooltip(r),
            })
            .collect::<Vec<_>>();

        let mut writer = SvgStringWriter::new();
        svg::write_svg_header(&mut writer, frame.width, frame.height, frame.bounds(), center)?;
        svg::write_svg_styles(&mut writer)?;
        svg::draw_filled_shapes(&mut writer, &shapes, &frame)?;

        let title = format!("Peta Ketahanan & Kerentanan Pangan – {}", province.unwrap_or("Sumatera"));
        write_legend(&mut writer, &title, frame.map_bottom() + MARGIN)?;

        svg::write_svg_footer(&mut writer)?;
        writer.into_string()
    }
}

/// Union of every record's bounding rectangle.
fn records_bounds(records: &[&EnrichedRecord]) -> Option<Rect<f64>> {
    records.iter()
        .filter_map(|r| r.boundary.geometry.bounding_rect())
        .reduce(|a, b| Rect::new(
            Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
            Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
        ))
}

fn tooltip(record: &EnrichedRecord) -> Vec<String> {
    vec![
        format!("Wilayah: {}", record.district_name()),
        format!("Kategori (SOM): {}", record.category_label().unwrap_or("-")),
        format!("IKP: {}", record.ikp().map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))),
    ]
}

fn write_legend(writer: &mut impl Write, title: &str, top: f64) -> Result<()> {
    writeln!(writer, r#"<text class="title" x="{MARGIN}" y="{:.1}">{}</text>"#, top + 18.0, escape_xml(title))?;
    writeln!(writer, r#"<g class="legend">"#)?;

    let entries = Category::ALL.iter()
        .map(|c| (c.color(), c.label()))
        .chain(std::iter::once((NEUTRAL_COLOR, "Tidak cocok")));

    for (row, (color, label)) in entries.enumerate() {
        let y = top + TITLE_HEIGHT + row as f64 * LEGEND_ROW;
        writeln!(writer, r#"<rect x="{MARGIN}" y="{y:.1}" width="14" height="14" fill="{color}"/>"#)?;
        writeln!(writer, r#"<text x="{:.1}" y="{:.1}">{label}</text>"#, MARGIN + 22.0, y + 12.0)?;
    }

    writeln!(writer, "</g>")?;
    Ok(())
}
