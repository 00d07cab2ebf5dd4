use geo::MultiPolygon;

use super::{Category, normalize_name};

/// One administrative unit (regency or city) polygon from the boundary file.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryRecord {
    pub province: String,
    pub district: Option<String>,
    /// Normalized join key derived from `district`.
    pub key: String,
    pub geometry: MultiPolygon<f64>,
}

impl BoundaryRecord {
    pub fn new(province: impl Into<String>, district: Option<String>, geometry: MultiPolygon<f64>) -> Self {
        let key = normalize_name(district.as_deref());
        Self { province: province.into(), district, key, geometry }
    }

    /// Display name, empty when the attribute was null.
    pub fn district_name(&self) -> &str { self.district.as_deref().unwrap_or("") }
}

/// Numeric indicators carried by each cluster row. Blank cells are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Indicators {
    /// Food Security Index (IKP)
    pub ikp: Option<f64>,
    /// Rice productivity, ku/ha
    pub rice_productivity: Option<f64>,
    /// Rice production, ton
    pub rice_production: Option<f64>,
    /// Gross regional domestic product (PDRB)
    pub pdrb: Option<f64>,
    pub rls: Option<f64>,
    pub uhh: Option<f64>,
    pub tpak: Option<f64>,
    pub p0: Option<f64>,
    pub ppk: Option<f64>,
}

/// One row of precomputed SOM output.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterRecord {
    pub name: Option<String>,
    pub key: String,
    /// SOM cluster id; `None` when the cell was blank.
    pub cluster: Option<i64>,
    pub indicators: Indicators,
}

impl ClusterRecord {
    pub fn new(name: Option<String>, cluster: Option<i64>, indicators: Indicators) -> Self {
        let key = normalize_name(name.as_deref());
        Self { name, key, cluster, indicators }
    }
}

/// How a boundary record found its cluster row.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchKind {
    Exact,
    /// Accepted approximate match against `candidate` with similarity `score`.
    Fuzzy { candidate: String, score: f64 },
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::Fuzzy { .. } => "fuzzy",
        }
    }

    pub fn score(&self) -> f64 {
        match self {
            MatchKind::Exact => 1.0,
            MatchKind::Fuzzy { score, .. } => *score,
        }
    }
}

/// The complete cluster row attached to a boundary record.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterMatch {
    pub record: ClusterRecord,
    pub kind: MatchKind,
}

/// A boundary record joined to its cluster row, if any.
///
/// Cluster fields live only inside `matched`, so a record is either fully
/// populated or carries no cluster data at all.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub boundary: BoundaryRecord,
    pub matched: Option<ClusterMatch>,
    pub category: Option<Category>,
}

impl EnrichedRecord {
    pub(crate) fn unmatched(boundary: BoundaryRecord) -> Self {
        Self { boundary, matched: None, category: None }
    }

    /// Attach a cluster row, replacing anything attached before, and relabel.
    pub(crate) fn attach(&mut self, record: ClusterRecord, kind: MatchKind) {
        self.category = record.cluster.and_then(Category::from_cluster);
        self.matched = Some(ClusterMatch { record, kind });
    }

    #[inline] pub fn is_matched(&self) -> bool { self.matched.is_some() }

    #[inline] pub fn cluster(&self) -> Option<i64> { self.matched.as_ref().and_then(|m| m.record.cluster) }

    #[inline] pub fn indicators(&self) -> Option<&Indicators> { self.matched.as_ref().map(|m| &m.record.indicators) }

    #[inline] pub fn ikp(&self) -> Option<f64> { self.indicators().and_then(|i| i.ikp) }

    #[inline] pub fn province(&self) -> &str { &self.boundary.province }

    #[inline] pub fn district_name(&self) -> &str { self.boundary.district_name() }

    pub fn category_label(&self) -> Option<&'static str> { self.category.map(Category::label) }
}
