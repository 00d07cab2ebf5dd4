//! Format-specific reading and writing, organized by format rather than domain.
//!
//! - `shp` - ESRI shapefiles (boundary polygons + dBase attributes)
//! - `geojson` - GeoJSON FeatureCollections (boundary input and export)
//! - `xlsx` - Excel-family workbooks via calamine (cluster tables)
//! - `csv` - CSV tables via polars (cluster tables and table export)
//! - `svg` - SVG writing for choropleth export

pub(crate) mod csv;
pub(crate) mod geojson;
pub(crate) mod shp;
pub(crate) mod svg;
pub(crate) mod xlsx;
