use std::path::Path;

use anyhow::{Context, Result, anyhow, bail, ensure};
use polars::{frame::DataFrame, prelude::DataType};
use serde_json::{Map, Value};

use crate::{common, io, config::{BoundaryColumns, ClusterColumns}};
use crate::atlas::{BoundaryRecord, ClusterRecord, Indicators};

/// Load boundary records from a `.shp`, a `.zip` holding one, or a GeoJSON file.
pub(crate) fn read_boundaries(path: &Path, columns: &BoundaryColumns) -> Result<Vec<BoundaryRecord>> {
    common::require_file_exists(path)?;

    match common::extension_of(path).as_str() {
        "shp" => boundaries_from_shapefile(path, columns),
        "zip" => {
            let dir = common::extract_zip_to_temp(path)?;
            let shp = common::find_first_with_extension(dir.path(), "shp")
                .ok_or_else(|| anyhow!("No .shp file inside {}", path.display()))?;
            boundaries_from_shapefile(&shp, columns)
        }
        "geojson" | "json" => boundaries_from_geojson(path, columns),
        other => bail!("Unsupported boundary format {other:?} for {} (expected .shp, .zip or .geojson)", path.display()),
    }
}

fn boundaries_from_shapefile(path: &Path, columns: &BoundaryColumns) -> Result<Vec<BoundaryRecord>> {
    io::shp::read_shapefile(path)?
        .iter()
        .enumerate()
        .map(|(i, (shape, record))| {
            let context = || format!("Invalid boundary record {i} in {}", path.display());
            let province = io::shp::text_field(record, &columns.province).with_context(context)?;
            let district = io::shp::text_field(record, &columns.district).with_context(context)?;
            let geometry = io::shp::shape_to_geo(shape).with_context(context)?;
            Ok(BoundaryRecord::new(province.unwrap_or_default(), district, geometry))
        })
        .collect()
}

fn boundaries_from_geojson(path: &Path, columns: &BoundaryColumns) -> Result<Vec<BoundaryRecord>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let features = io::geojson::read_features(&bytes)
        .with_context(|| format!("Invalid GeoJSON in {}", path.display()))?;

    features.into_iter()
        .enumerate()
        .map(|(i, feature)| {
            let context = || format!("Invalid boundary feature {i} in {}", path.display());
            let province = text_property(&feature.properties, &columns.province).with_context(context)?;
            let district = text_property(&feature.properties, &columns.district).with_context(context)?;
            Ok(BoundaryRecord::new(province.unwrap_or_default(), district, feature.geometry))
        })
        .collect()
}

/// A missing key is an error; a null value is `None`.
fn text_property(properties: &Map<String, Value>, field: &str) -> Result<Option<String>> {
    match properties.get(field) {
        Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => bail!("property {field:?} is not text: {other}"),
        None => bail!("missing property {field:?}"),
    }
}

/// Load cluster records from a CSV file or an Excel-family workbook.
pub(crate) fn read_clusters(path: &Path, columns: &ClusterColumns) -> Result<Vec<ClusterRecord>> {
    common::require_file_exists(path)?;

    let ext = common::extension_of(path);
    let df = match ext.as_str() {
        "csv" => io::csv::read_csv(path)?,
        ext if io::xlsx::EXTENSIONS.contains(&ext) => io::xlsx::read_sheet(path, columns.sheet.as_deref())?,
        other => bail!("Unsupported cluster table format {other:?} for {} (expected .csv or a spreadsheet)", path.display()),
    };

    clusters_from_dataframe(&df, columns)
        .with_context(|| format!("Invalid cluster table {}", path.display()))
}

/// Build typed cluster records, validating column presence and cell types.
/// Row numbers in errors count the header as row 1.
pub(crate) fn clusters_from_dataframe(df: &DataFrame, columns: &ClusterColumns) -> Result<Vec<ClusterRecord>> {
    let names = text_column(df, &columns.name)?;
    let clusters = numeric_column(df, &columns.cluster)?;
    let ikp = numeric_column(df, &columns.ikp)?;
    let rice_productivity = numeric_column(df, &columns.rice_productivity)?;
    let rice_production = numeric_column(df, &columns.rice_production)?;
    let pdrb = numeric_column(df, &columns.pdrb)?;
    let rls = optional_numeric_column(df, &columns.rls)?;
    let uhh = optional_numeric_column(df, &columns.uhh)?;
    let tpak = optional_numeric_column(df, &columns.tpak)?;
    let p0 = optional_numeric_column(df, &columns.p0)?;
    let ppk = optional_numeric_column(df, &columns.ppk)?;

    (0..df.height())
        .map(|i| {
            let row = i + 2;
            // a blank id leaves the row unlabelled
            if let Some(cluster) = clusters[i] {
                ensure!(cluster.is_finite() && cluster.fract() == 0.0,
                    "row {row}: cluster id {cluster} in column {:?} is not an integer", columns.cluster);
            }

            let indicators = Indicators {
                ikp: ikp[i],
                rice_productivity: rice_productivity[i],
                rice_production: rice_production[i],
                pdrb: pdrb[i],
                rls: rls[i],
                uhh: uhh[i],
                tpak: tpak[i],
                p0: p0[i],
                ppk: ppk[i],
            };
            Ok(ClusterRecord::new(names[i].clone(), clusters[i].map(|c| c as i64), indicators))
        })
        .collect()
}

/// Trimmed text values; blank cells are `None`.
fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df.column(name)
        .with_context(|| format!("missing required column {name:?}"))?
        .cast(&DataType::String)
        .with_context(|| format!("column {name:?} cannot be read as text"))?;

    Ok(column.str()?
        .into_iter()
        .map(|value| value.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string))
        .collect())
}

/// Numeric values; blank cells are `None`, any other non-number is an error.
fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df.column(name)
        .with_context(|| format!("missing required column {name:?}"))?;

    match column.dtype() {
        DataType::Float64 | DataType::Float32
        | DataType::Int64 | DataType::Int32 | DataType::Int16 | DataType::Int8
        | DataType::UInt64 | DataType::UInt32 | DataType::UInt16 | DataType::UInt8 => {
            let column = column.cast(&DataType::Float64)?;
            Ok(column.f64()?.into_iter().collect())
        }
        DataType::String => column.str()?
            .into_iter()
            .enumerate()
            .map(|(i, value)| match value.map(str::trim) {
                None | Some("") => Ok(None),
                Some(text) => text.parse::<f64>()
                    .map(Some)
                    .with_context(|| format!("row {}: {text:?} in column {name:?} is not a number", i + 2)),
            })
            .collect(),
        DataType::Null => Ok(vec![None; df.height()]),
        other => bail!("column {name:?} has non-numeric type {other}"),
    }
}

/// Like `numeric_column`, but an absent column reads as all blanks.
fn optional_numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    if df.column(name).is_err() { return Ok(vec![None; df.height()]) }
    numeric_column(df, name)
}

#[cfg(test)]
mod tests {
    use polars::prelude::Column;

    use super::*;

    fn table_with(cluster: Column, pdrb: Column) -> DataFrame {
        DataFrame::new(vec![
            Column::new("Kabupaten/Kota".into(), [Some("Kabupaten Aceh Barat"), Some(" Kota Medan "), None]),
            cluster,
            Column::new("IKP".into(), [Some(80.0), None, Some(61.5)]),
            Column::new("Produktivitas_Padi".into(), ["50.1", "", "48"]),
            Column::new("Produksi_Padi".into(), [1000i64, 2000, 3000]),
            pdrb,
            Column::new("RLS".into(), [Some(8.5), Some(9.0), None]),
        ]).unwrap()
    }

    fn table(cluster: Column) -> DataFrame {
        table_with(cluster, Column::new("PDRB".into(), [1.0, 2.0, 3.0]))
    }

    #[test]
    fn typed_records_from_table() {
        let df = table(Column::new("Cluster".into(), [4i64, 1, 0]));
        let records = clusters_from_dataframe(&df, &ClusterColumns::default()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].key, "ACEH BARAT");
        assert_eq!(records[0].cluster, Some(4));
        assert_eq!(records[0].indicators.ikp, Some(80.0));
        assert_eq!(records[0].indicators.rice_productivity, Some(50.1));
        assert_eq!(records[0].indicators.rls, Some(8.5));
        assert_eq!(records[0].indicators.uhh, None);
        assert_eq!(records[1].name.as_deref(), Some("Kota Medan"));
        assert_eq!(records[1].key, "MEDAN");
        assert_eq!(records[1].indicators.ikp, None);
        assert_eq!(records[1].indicators.rice_productivity, None);
        assert_eq!(records[2].name, None);
        assert_eq!(records[2].key, "");
        assert_eq!(records[2].indicators.rice_production, Some(3000.0));
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let df = table(Column::new("Cluster".into(), [4i64, 1, 0])).drop("PDRB").unwrap();
        let err = clusters_from_dataframe(&df, &ClusterColumns::default()).unwrap_err();
        assert!(format!("{err:#}").contains("PDRB"));
    }

    #[test]
    fn blank_cluster_id_is_unset() {
        let df = table(Column::new("Cluster".into(), [Some(4.0), None, Some(0.0)]));
        let records = clusters_from_dataframe(&df, &ClusterColumns::default()).unwrap();
        assert_eq!(records.iter().map(|r| r.cluster).collect::<Vec<_>>(), vec![Some(4), None, Some(0)]);
        assert_eq!(records[1].key, "MEDAN");
    }

    #[test]
    fn fractional_cluster_id_is_fatal() {
        let fractional = table(Column::new("Cluster".into(), [4.0, 1.5, 0.0]));
        let err = clusters_from_dataframe(&fractional, &ClusterColumns::default()).unwrap_err();
        assert!(err.to_string().contains("row 3"));
    }

    #[test]
    fn text_in_numeric_column_is_fatal() {
        let df = table_with(
            Column::new("Cluster".into(), [4i64, 1, 0]),
            Column::new("PDRB".into(), ["1", "n/a", "3"]),
        );
        let err = clusters_from_dataframe(&df, &ClusterColumns::default()).unwrap_err();
        assert!(format!("{err:#}").contains("\"n/a\""));
    }

    #[test]
    fn geojson_properties() {
        let mut properties = Map::new();
        properties.insert("NAME_1".into(), Value::from("Aceh"));
        properties.insert("NAME_2".into(), Value::Null);
        properties.insert("CODE".into(), Value::from(1101));

        assert_eq!(text_property(&properties, "NAME_1").unwrap().as_deref(), Some("Aceh"));
        assert_eq!(text_property(&properties, "NAME_2").unwrap(), None);
        assert_eq!(text_property(&properties, "CODE").unwrap().as_deref(), Some("1101"));
        assert!(text_property(&properties, "NAME_3").is_err());
    }

    #[test]
    fn unsupported_extensions_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clusters.txt");
        std::fs::write(&path, "x").unwrap();
        assert!(read_clusters(&path, &ClusterColumns::default()).is_err());
        assert!(read_boundaries(&path, &BoundaryColumns::default()).is_err());
        assert!(read_boundaries(&dir.path().join("missing.shp"), &BoundaryColumns::default()).is_err());
    }
}
