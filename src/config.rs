use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::atlas::Similarity;

/// Attribute names read from the boundary file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryColumns {
    /// Province name attribute (GADM level 1)
    pub province: String,
    /// District/city name attribute (GADM level 2)
    pub district: String,
}

impl Default for BoundaryColumns {
    fn default() -> Self {
        Self {
            province: "NAME_1".into(),
            district: "NAME_2".into(),
        }
    }
}

/// Column names read from the cluster table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterColumns {
    /// Worksheet to read; the first sheet when unset. Ignored for CSV.
    pub sheet: Option<String>,
    pub name: String,
    pub cluster: String,
    pub ikp: String,
    pub rice_productivity: String,
    pub rice_production: String,
    pub pdrb: String,
    // Optional indicators, read when present.
    pub rls: String,
    pub uhh: String,
    pub tpak: String,
    pub p0: String,
    pub ppk: String,
}

impl Default for ClusterColumns {
    fn default() -> Self {
        Self {
            sheet: None,
            name: "Kabupaten/Kota".into(),
            cluster: "Cluster".into(),
            ikp: "IKP".into(),
            rice_productivity: "Produktivitas_Padi".into(),
            rice_production: "Produksi_Padi".into(),
            pdrb: "PDRB".into(),
            rls: "RLS".into(),
            uhh: "UHH".into(),
            tpak: "TPAK".into(),
            p0: "P0".into(),
            ppk: "PPK".into(),
        }
    }
}

/// Fuzzy reconciliation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Minimum similarity (0..=1) for a fuzzy candidate to be accepted.
    pub cutoff: f64,
    pub metric: Similarity,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self { cutoff: 0.75, metric: Similarity::Ratio }
    }
}

/// Full configuration for loading and joining an atlas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    pub boundary: BoundaryColumns,
    pub clusters: ClusterColumns,
    pub matching: MatchOptions,
}

impl AtlasConfig {
    /// Read a JSON configuration file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let cutoff = self.matching.cutoff;
        ensure!((0.0..=1.0).contains(&cutoff), "matching.cutoff must lie in [0, 1], got {cutoff}");
        ensure!(!self.boundary.province.is_empty() && !self.boundary.district.is_empty(),
            "boundary column names must not be empty");
        ensure!(!self.clusters.name.is_empty() && !self.clusters.cluster.is_empty(),
            "cluster column names must not be empty");
        Ok(())
    }

    /// Stable serialized form, used when fingerprinting cached inputs.
    pub(crate) fn to_json_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: AtlasConfig = serde_json::from_str(
            r#"{ "matching": { "cutoff": 0.8 }, "boundary": { "district": "KABKOT" } }"#
        ).unwrap();
        assert_eq!(config.matching.cutoff, 0.8);
        assert_eq!(config.matching.metric, Similarity::Ratio);
        assert_eq!(config.boundary.province, "NAME_1");
        assert_eq!(config.boundary.district, "KABKOT");
        assert_eq!(config.clusters.name, "Kabupaten/Kota");
    }

    #[test]
    fn metric_names_are_snake_case() {
        let options: MatchOptions = serde_json::from_str(r#"{ "metric": "jaro_winkler" }"#).unwrap();
        assert_eq!(options.metric, Similarity::JaroWinkler);
        assert_eq!(options.cutoff, 0.75);
    }

    #[test]
    fn cutoff_out_of_range_is_rejected() {
        let mut config = AtlasConfig::default();
        config.matching.cutoff = 1.5;
        assert!(config.validate().is_err());
        config.matching.cutoff = 0.75;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pangan.json");
        std::fs::write(&path, r#"{ "clusters": { "sheet": "Hasil" } }"#).unwrap();
        let config = AtlasConfig::from_json_file(&path).unwrap();
        assert_eq!(config.clusters.sheet.as_deref(), Some("Hasil"));
    }
}
