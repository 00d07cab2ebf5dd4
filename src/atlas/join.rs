use std::collections::BTreeMap;

use ahash::AHashMap;
use tracing::warn;

use super::{BoundaryRecord, ClusterRecord, EnrichedRecord, MatchKind};

/// Lookup structure over the cluster table, keyed by normalized name.
///
/// When several rows share a key only the first (in table order) is indexed.
/// Empty keys are never indexed.
pub(crate) struct ClusterIndex<'a> {
    clusters: &'a [ClusterRecord],
    by_key: AHashMap<&'a str, usize>,
    duplicates: usize,
}

impl<'a> ClusterIndex<'a> {
    pub(crate) fn new(clusters: &'a [ClusterRecord]) -> Self {
        let mut by_key = AHashMap::with_capacity(clusters.len());
        let mut duplicates = 0;

        for (i, record) in clusters.iter().enumerate() {
            if record.key.is_empty() { continue }
            if let Some(&first) = by_key.get(record.key.as_str()) {
                duplicates += 1;
                warn!(key = %record.key, first_row = first, ignored_row = i, "duplicate cluster key, keeping first row");
                continue;
            }
            by_key.insert(record.key.as_str(), i);
        }

        Self { clusters, by_key, duplicates }
    }

    /// First cluster row with exactly this key.
    ///
    /// An empty key (missing or all-prefix name) carries no identity and
    /// never matches, not even another empty key.
    pub(crate) fn get(&self, key: &str) -> Option<&'a ClusterRecord> {
        if key.is_empty() { return None }
        self.by_key.get(key).map(|&i| &self.clusters[i])
    }

    /// Distinct keys with their first row, in lexicographic key order.
    pub(crate) fn sorted_candidates(&self) -> Vec<(&'a str, &'a ClusterRecord)> {
        self.by_key.iter()
            .map(|(&key, &i)| (key, &self.clusters[i]))
            .collect::<BTreeMap<_, _>>()
            .into_iter()
            .collect()
    }

    /// Number of rows ignored because an earlier row had the same key.
    #[inline] pub(crate) fn duplicates(&self) -> usize { self.duplicates }
}

/// Left-outer join of boundaries to cluster rows on key equality.
/// Output preserves input order and has exactly one record per boundary.
pub(crate) fn exact_join(boundaries: Vec<BoundaryRecord>, index: &ClusterIndex<'_>) -> Vec<EnrichedRecord> {
    boundaries.into_iter()
        .map(|boundary| {
            let found = index.get(&boundary.key).cloned();
            let mut record = EnrichedRecord::unmatched(boundary);
            if let Some(cluster) = found {
                record.attach(cluster, MatchKind::Exact);
            }
            record
        })
        .collect()
}
