use std::{collections::BTreeSet, path::PathBuf};

use anyhow::Result;
use tracing::{info, warn};

use crate::config::{AtlasConfig, MatchOptions};
use super::{BoundaryRecord, ClusterRecord, EnrichedRecord, MatchKind, io, join, reconcile};

/// Where an atlas is loaded from.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasSource {
    /// Boundary polygons: `.shp`, zipped shapefile, or GeoJSON.
    pub boundaries: PathBuf,
    /// SOM cluster table: Excel-family workbook or CSV.
    pub clusters: PathBuf,
    pub config: AtlasConfig,
}

impl AtlasSource {
    pub fn new(boundaries: impl Into<PathBuf>, clusters: impl Into<PathBuf>, config: AtlasConfig) -> Self {
        Self { boundaries: boundaries.into(), clusters: clusters.into(), config }
    }
}

/// Outcome counts of a join.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub exact: usize,
    pub fuzzy: usize,
    pub unmatched: usize,
    /// Cluster rows ignored because an earlier row had the same key.
    pub duplicate_keys: usize,
}

/// The enriched boundary collection read by every view.
#[derive(Debug, Clone, PartialEq)]
pub struct Atlas {
    records: Vec<EnrichedRecord>,
    stats: MatchStats,
}

impl Atlas {
    /// Join boundaries to cluster rows: exact pass, then fuzzy repair of the rest.
    pub fn build(boundaries: Vec<BoundaryRecord>, clusters: &[ClusterRecord], options: &MatchOptions) -> Self {
        let index = join::ClusterIndex::new(clusters);

        let mut records = join::exact_join(boundaries, &index);
        let exact = records.iter().filter(|r| r.is_matched()).count();

        let fuzzy = reconcile::reconcile(&mut records, &index, options);
        let unmatched = records.len() - exact - fuzzy;

        for record in records.iter().filter(|r| !r.is_matched()) {
            warn!(province = %record.province(), district = %record.district_name(), "no cluster row for district");
        }

        let stats = MatchStats { exact, fuzzy, unmatched, duplicate_keys: index.duplicates() };
        info!(records = records.len(), exact, fuzzy, unmatched, "[atlas] join complete");

        Self { records, stats }
    }

    /// Read both inputs and build the atlas.
    pub fn load(source: &AtlasSource) -> Result<Self> {
        source.config.validate()?;

        info!(path = %source.boundaries.display(), "[atlas] reading boundaries");
        let boundaries = io::read_boundaries(&source.boundaries, &source.config.boundary)?;

        info!(path = %source.clusters.display(), "[atlas] reading cluster table");
        let clusters = io::read_clusters(&source.clusters, &source.config.clusters)?;

        Ok(Self::build(boundaries, &clusters, &source.config.matching))
    }

    #[inline] pub fn records(&self) -> &[EnrichedRecord] { &self.records }

    #[inline] pub fn len(&self) -> usize { self.records.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.records.is_empty() }

    #[inline] pub fn match_stats(&self) -> MatchStats { self.stats }

    /// Distinct province names, sorted.
    pub fn provinces(&self) -> Vec<&str> {
        self.records.iter()
            .map(EnrichedRecord::province)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn has_province(&self, province: &str) -> bool {
        self.records.iter().any(|r| r.province() == province)
    }

    /// Records of one province, in load order.
    pub fn in_province<'a>(&'a self, province: &'a str) -> impl Iterator<Item = &'a EnrichedRecord> + 'a {
        self.records.iter().filter(move |r| r.province() == province)
    }

    /// Records of one province, or all records when `province` is `None`.
    pub fn select(&self, province: Option<&str>) -> Vec<&EnrichedRecord> {
        match province {
            Some(province) => self.records.iter().filter(|r| r.province() == province).collect(),
            None => self.records.iter().collect(),
        }
    }

    pub fn with_cluster(&self, cluster: i64) -> impl Iterator<Item = &EnrichedRecord> + '_ {
        self.records.iter().filter(move |r| r.cluster() == Some(cluster))
    }

    pub fn unmatched(&self) -> impl Iterator<Item = &EnrichedRecord> + '_ {
        self.records.iter().filter(|r| !r.is_matched())
    }

    /// Fuzzy-matched records with the accepted candidate key and score.
    pub fn reconciled(&self) -> impl Iterator<Item = (&EnrichedRecord, &str, f64)> + '_ {
        self.records.iter().filter_map(|r| match r.matched.as_ref().map(|m| &m.kind) {
            Some(MatchKind::Fuzzy { candidate, score }) => Some((r, candidate.as_str(), *score)),
            _ => None,
        })
    }
}
