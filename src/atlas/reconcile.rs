use tracing::debug;

use crate::config::MatchOptions;
use super::{ClusterRecord, EnrichedRecord, MatchKind, join::ClusterIndex};

/// Best-scoring candidate for `key`, if it reaches `options.cutoff`.
///
/// Each candidate is scored as `metric(candidate, key)`; the gestalt ratio is
/// not symmetric, and the candidate is the first sequence. Candidates must be
/// in lexicographic key order; on equal scores the last (largest key) wins.
pub(crate) fn best_match<'a>(
    key: &str,
    candidates: &[(&'a str, &'a ClusterRecord)],
    options: &MatchOptions,
) -> Option<(&'a str, &'a ClusterRecord, f64)> {
    let mut best: Option<(&'a str, &'a ClusterRecord, f64)> = None;

    for &(candidate, record) in candidates {
        let score = options.metric.score(candidate, key);
        if best.is_none_or(|(_, _, top)| score >= top) {
            best = Some((candidate, record, score));
        }
    }

    best.filter(|&(_, _, score)| score >= options.cutoff)
}

/// Try to repair every unmatched record with an approximate match.
/// Returns the number of records reconciled.
pub(crate) fn reconcile(records: &mut [EnrichedRecord], index: &ClusterIndex<'_>, options: &MatchOptions) -> usize {
    let candidates = index.sorted_candidates();
    let mut reconciled = 0;

    for record in records.iter_mut().filter(|r| !r.is_matched()) {
        let key = record.boundary.key.as_str();
        if key.is_empty() { continue }

        match best_match(key, &candidates, options) {
            Some((candidate, cluster, score)) => {
                debug!(key, candidate, score, "fuzzy match accepted");
                let kind = MatchKind::Fuzzy { candidate: candidate.to_string(), score };
                record.attach(cluster.clone(), kind);
                reconciled += 1;
            }
            None => debug!(key, "no candidate above cutoff"),
        }
    }

    reconciled
}

#[cfg(test)]
mod tests {
    use geo::MultiPolygon;

    use super::*;
    use crate::atlas::{BoundaryRecord, Indicators, Similarity, join::exact_join};

    fn cluster(name: &str, id: i64, ikp: f64) -> ClusterRecord {
        ClusterRecord::new(Some(name.into()), Some(id), Indicators { ikp: Some(ikp), ..Default::default() })
    }

    fn unmatched(name: &str) -> EnrichedRecord {
        EnrichedRecord::unmatched(BoundaryRecord::new("Aceh", Some(name.into()), MultiPolygon(vec![])))
    }

    #[test]
    fn close_name_receives_full_cluster_row() {
        let clusters = vec![cluster("ACEH BARAT", 4, 80.5), cluster("ACEH BESAR", 2, 60.0)];
        let index = ClusterIndex::new(&clusters);
        let mut records = vec![unmatched("ACEH BRAT")];

        assert_eq!(reconcile(&mut records, &index, &MatchOptions::default()), 1);
        let matched = records[0].matched.as_ref().unwrap();
        assert_eq!(matched.record, clusters[0]);
        assert_eq!(records[0].category_label(), Some("Tahan"));
        match &matched.kind {
            MatchKind::Fuzzy { candidate, score } => {
                assert_eq!(candidate, "ACEH BARAT");
                assert!(*score >= 0.75);
            }
            other => panic!("expected fuzzy match, got {other:?}"),
        }
    }

    #[test]
    fn below_cutoff_stays_unmatched() {
        let clusters = vec![cluster("ACEH BARAT", 4, 80.5), cluster("ACEH BESAR", 2, 60.0)];
        let index = ClusterIndex::new(&clusters);
        let mut records = vec![unmatched("XYZ UNKNOWN")];

        assert_eq!(reconcile(&mut records, &index, &MatchOptions::default()), 0);
        assert!(records[0].matched.is_none());
        assert!(records[0].category.is_none());
    }

    #[test]
    fn cutoff_is_inclusive() {
        let clusters = vec![cluster("BCDE", 0, 1.0)];
        let index = ClusterIndex::new(&clusters);
        let candidates = index.sorted_candidates();
        // ratio("ABCD", "BCDE") == 0.75 exactly
        assert!(best_match("ABCD", &candidates, &MatchOptions::default()).is_some());
        let strict = MatchOptions { cutoff: 0.76, ..Default::default() };
        assert!(best_match("ABCD", &candidates, &strict).is_none());
    }

    #[test]
    fn ties_go_to_largest_key() {
        // "ABXD" scores 0.75 against both
        let clusters = vec![cluster("ABYD", 1, 0.0), cluster("ABZD", 3, 0.0)];
        let index = ClusterIndex::new(&clusters);
        let candidates = index.sorted_candidates();
        let (key, record, _) = best_match("ABXD", &candidates, &MatchOptions::default()).unwrap();
        assert_eq!(key, "ABZD");
        assert_eq!(record.cluster, Some(3));

        let reversed = vec![cluster("ABZD", 3, 0.0), cluster("ABYD", 1, 0.0)];
        let index = ClusterIndex::new(&reversed);
        let (key, _, _) = best_match("ABXD", &index.sorted_candidates(), &MatchOptions::default()).unwrap();
        assert_eq!(key, "ABZD");
    }

    #[test]
    fn candidate_is_the_first_sequence() {
        // ratio("ACEH BESAR", "A COHBESAR") = 0.8, the reverse order only 0.7
        let clusters = vec![cluster("ACEH BESAR", 2, 60.0)];
        let index = ClusterIndex::new(&clusters);
        let (key, _, score) = best_match("A COHBESAR", &index.sorted_candidates(), &MatchOptions::default()).unwrap();
        assert_eq!(key, "ACEH BESAR");
        assert!((score - 0.8).abs() < 1e-9);

        let mut records = vec![unmatched("A COHBESAR")];
        assert_eq!(reconcile(&mut records, &index, &MatchOptions::default()), 1);
        assert_eq!(records[0].category_label(), Some("Agak Rentan"));
    }

    #[test]
    fn exact_matches_are_left_alone() {
        let clusters = vec![cluster("MEDAN", 1, 70.0)];
        let index = ClusterIndex::new(&clusters);
        let boundaries = vec![BoundaryRecord::new("Sumatera Utara", Some("Kota Medan".into()), MultiPolygon(vec![]))];
        let mut records = exact_join(boundaries, &index);
        assert_eq!(reconcile(&mut records, &index, &MatchOptions::default()), 0);
        assert_eq!(records[0].matched.as_ref().unwrap().kind, MatchKind::Exact);
    }

    #[test]
    fn empty_keys_are_not_reconciled() {
        let clusters = vec![ClusterRecord::new(None, Some(2), Indicators::default()), cluster("KOTA", 1, 0.0)];
        let index = ClusterIndex::new(&clusters);
        let mut records = vec![EnrichedRecord::unmatched(BoundaryRecord::new("Aceh", None, MultiPolygon(vec![])))];
        let options = MatchOptions { cutoff: 0.0, ..Default::default() };

        assert_eq!(reconcile(&mut records, &index, &options), 0);
        assert!(!records[0].is_matched());
    }

    #[test]
    fn metric_is_configurable() {
        let clusters = vec![cluster("ACEH BARAT", 4, 80.5)];
        let index = ClusterIndex::new(&clusters);
        let options = MatchOptions { cutoff: 0.85, metric: Similarity::Levenshtein };
        let mut records = vec![unmatched("ACEH BRAT")];
        assert_eq!(reconcile(&mut records, &index, &options), 1);
    }
}
