//! SVG document writing.

use std::io::Write;

use anyhow::{Context, Result};

/// String-based SVG writer; callers decide where the document goes.
pub(crate) struct SvgStringWriter {
    buffer: Vec<u8>,
}

/// Implement std::io::Write so `write!` / `writeln!` work.
impl Write for SvgStringWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
}

impl SvgStringWriter {
    pub(crate) fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Get the SVG string
    pub(crate) fn into_string(self) -> Result<String> {
        String::from_utf8(self.buffer)
            .context("[io::svg] SVG output is not valid UTF-8")
    }
}

/// Write the XML declaration and opening <svg> tag, recording the geographic
/// frame and map centre as data attributes.
pub(crate) fn write_svg_header<W: Write>(
    writer: &mut W,
    width: f64,
    height: f64,
    bounds: &geo::Rect,
    center: Option<geo::Point>,
) -> Result<()> {
    writeln!(writer, r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"##)?;
    write!(writer, r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.3} {height:.3}" data-lon-min="{}" data-lon-max="{}" data-lat-min="{}" data-lat-max="{}""##,
        bounds.min().x,
        bounds.max().x,
        bounds.min().y,
        bounds.max().y,
    )?;
    if let Some(center) = center {
        write!(writer, r##" data-center-lon="{}" data-center-lat="{}""##, center.x(), center.y())?;
    }
    writeln!(writer, ">")?;
    writeln!(writer, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##)?;
    Ok(())
}

/// Write SVG styles for district polygons and the legend.
pub(crate) fn write_svg_styles<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, r##"<defs>
<style>
    .district {{ stroke: #000000; stroke-width: 0.6; fill-opacity: 0.8; vector-effect: non-scaling-stroke; }}
    .legend text {{ font-family: sans-serif; font-size: 13px; fill: #1b4332; }}
    .legend rect {{ stroke: #000000; stroke-width: 0.5; }}
    .title {{ font-family: sans-serif; font-size: 18px; font-weight: 700; fill: #1b4332; }}
</style>
</defs>"##)?;
    Ok(())
}

/// Write the closing </svg> tag.
pub(crate) fn write_svg_footer<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "</svg>")?;
    Ok(())
}

/// Escape text for use in SVG element content or attribute values.
pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use geo::{Point, Rect, coord};

    use super::*;

    #[test]
    fn document_frame() {
        let bounds = Rect::new(coord! { x: 95.0, y: -6.0 }, coord! { x: 106.0, y: 6.0 });
        let mut writer = SvgStringWriter::new();
        write_svg_header(&mut writer, 800.0, 600.0, &bounds, Some(Point::new(100.5, 0.25))).unwrap();
        write_svg_styles(&mut writer).unwrap();
        write_svg_footer(&mut writer).unwrap();

        let svg = writer.into_string().unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"data-lon-min="95""#));
        assert!(svg.contains(r#"data-center-lat="0.25""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml(r#"Tom & "Jerry" <x>"#), "Tom &amp; &quot;Jerry&quot; &lt;x&gt;");
        assert_eq!(escape_xml("Aceh Barat"), "Aceh Barat");
    }
}
