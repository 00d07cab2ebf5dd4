use serde::{Deserialize, Serialize};

/// String similarity used for fuzzy reconciliation. All scores lie in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Similarity {
    /// Ratcliff/Obershelp gestalt ratio: 2·M / (|a| + |b|).
    #[default]
    Ratio,
    /// 1 - levenshtein / max(|a|, |b|).
    Levenshtein,
    JaroWinkler,
}

impl Similarity {
    pub fn score(self, a: &str, b: &str) -> f64 {
        match self {
            Similarity::Ratio => gestalt_ratio(a, b),
            Similarity::Levenshtein => strsim::normalized_levenshtein(a, b),
            Similarity::JaroWinkler => strsim::jaro_winkler(a, b),
        }
    }
}

/// Ratcliff/Obershelp similarity over Unicode scalar values.
/// Two empty strings are identical (1.0).
///
/// Not symmetric: the longest common run is taken at its earliest position
/// in `a`, which decides how the remaining halves are split. Fuzzy matching
/// passes the candidate key as `a` and the unmatched key as `b`.
pub fn gestalt_ratio(a: &str, b: &str) -> f64 {
    let a = a.chars().collect::<Vec<_>>();
    let b = b.chars().collect::<Vec<_>>();

    let total = a.len() + b.len();
    if total == 0 { return 1.0 }

    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Characters covered by the longest common run plus, recursively, the runs
/// found to its left and right.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, k) = longest_common_run(a, b);
    if k == 0 { return 0 }
    k + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + k..], &b[j + k..])
}

/// Longest common substring as (start in a, start in b, length).
/// Ties resolve to the earliest start in `a`, then in `b`.
fn longest_common_run(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    // lengths[j + 1] = length of the common run ending at a[i], b[j]
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb { prev[j] + 1 } else { 0 };
            let k = curr[j + 1];
            if k > best.2 { best = (i + 1 - k, j + 1 - k, k) }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}
