use std::{fs::File, io::{BufWriter, Write}, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, prelude::Column};

use crate::{atlas::{Atlas, EnrichedRecord, Indicators}, io};

impl Atlas {
    /// Data table for one province (or all records), one row per district.
    pub fn to_dataframe(&self, province: Option<&str>) -> Result<DataFrame> {
        records_to_dataframe(&self.select(province))
    }

    /// Write the data table as CSV to any writer.
    pub fn write_csv(&self, province: Option<&str>, writer: impl Write) -> Result<()> {
        let mut df = self.to_dataframe(province)?;
        io::csv::write_csv(&mut df, writer)
    }

    /// Write the data table as a CSV file.
    pub fn to_csv(&self, path: &Path, province: Option<&str>) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("[to_csv] Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.write_csv(province, &mut writer)?;
        writer.flush().with_context(|| format!("[to_csv] Failed to write {}", path.display()))
    }
}

fn records_to_dataframe(records: &[&EnrichedRecord]) -> Result<DataFrame> {
    let indicator = |name: &str, get: fn(&Indicators) -> Option<f64>| Column::new(
        name.into(),
        records.iter().map(|r| r.indicators().and_then(get)).collect::<Vec<_>>(),
    );

    DataFrame::new(vec![
        Column::new("Provinsi".into(), records.iter().map(|r| r.province().to_string()).collect::<Vec<_>>()),
        Column::new("Wilayah".into(), records.iter().map(|r| r.boundary.district.clone()).collect::<Vec<_>>()),
        Column::new("Cluster".into(), records.iter().map(|r| r.cluster()).collect::<Vec<_>>()),
        Column::new("Kategori".into(), records.iter().map(|r| r.category_label().map(str::to_string)).collect::<Vec<_>>()),
        indicator("IKP", |i| i.ikp),
        indicator("Produktivitas_Padi", |i| i.rice_productivity),
        indicator("Produksi_Padi", |i| i.rice_production),
        indicator("PDRB", |i| i.pdrb),
        indicator("RLS", |i| i.rls),
        indicator("UHH", |i| i.uhh),
        indicator("TPAK", |i| i.tpak),
        indicator("P0", |i| i.p0),
        indicator("PPK", |i| i.ppk),
        Column::new("Pencocokan".into(), records.iter()
            .map(|r| r.matched.as_ref().map(|m| m.kind.as_str().to_string()))
            .collect::<Vec<_>>()),
        Column::new("Skor".into(), records.iter()
            .map(|r| r.matched.as_ref().map(|m| m.kind.score()))
            .collect::<Vec<_>>()),
    ])
    .context("[to_dataframe] Failed to assemble data table")
}

#[cfg(test)]
mod tests {
    use geo::MultiPolygon;

    use crate::atlas::{Atlas, BoundaryRecord, ClusterRecord, Indicators};
    use crate::config::MatchOptions;

    fn atlas() -> Atlas {
        let boundaries = vec![
            BoundaryRecord::new("Aceh", Some("Aceh Barat".into()), MultiPolygon(vec![])),
            BoundaryRecord::new("Aceh", Some("Simeulue".into()), MultiPolygon(vec![])),
            BoundaryRecord::new("Riau", Some("Siak".into()), MultiPolygon(vec![])),
        ];
        let clusters = vec![ClusterRecord::new(Some("KABUPATEN ACEH BARAT".into()), Some(4), Indicators {
            ikp: Some(80.5), pdrb: Some(12.0), ..Default::default()
        })];
        Atlas::build(boundaries, &clusters, &MatchOptions::default())
    }

    #[test]
    fn one_row_per_record() {
        let atlas = atlas();
        assert_eq!(atlas.to_dataframe(None).unwrap().shape(), (3, 15));
        assert_eq!(atlas.to_dataframe(Some("Aceh")).unwrap().height(), 2);
        assert_eq!(atlas.to_dataframe(Some("Jambi")).unwrap().height(), 0);
    }

    #[test]
    fn csv_rows_carry_cluster_fields_or_blanks() {
        let mut out = Vec::new();
        atlas().write_csv(Some("Aceh"), &mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        let lines = csv.lines().collect::<Vec<_>>();

        assert_eq!(lines[0], "Provinsi,Wilayah,Cluster,Kategori,IKP,Produktivitas_Padi,Produksi_Padi,PDRB,RLS,UHH,TPAK,P0,PPK,Pencocokan,Skor");
        let matched = lines[1].split(',').collect::<Vec<_>>();
        assert_eq!(&matched[..4], ["Aceh", "Aceh Barat", "4", "Tahan"]);
        assert_eq!(matched[4].parse::<f64>().unwrap(), 80.5);
        assert_eq!(matched[7].parse::<f64>().unwrap(), 12.0);
        assert_eq!(matched[13], "exact");
        assert_eq!(matched[14].parse::<f64>().unwrap(), 1.0);
        assert!(matched[5].is_empty() && matched[8].is_empty());

        assert_eq!(lines[2], "Aceh,Simeulue,,,,,,,,,,,,,");
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aceh.csv");
        atlas().to_csv(&path, Some("Aceh")).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 3);
    }
}
