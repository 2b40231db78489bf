use serde::{Deserialize, Serialize};
use std::fmt;

///
/// String similarity used by the fuzzy phase. Every metric scores in [0, 1] and
/// scores identical strings 1.0. The metric is fixed per classification run.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SimilarityMetric {
    /// `1 - levenshtein(a, b) / max(len(a), len(b))`
    #[default]
    Levenshtein,
    /// Like `Levenshtein`, with adjacent transpositions costing one edit.
    DamerauLevenshtein,
    JaroWinkler,
}

impl SimilarityMetric {
    pub fn score(&self, a: &str, b: &str) -> f64 {
        match self {
            SimilarityMetric::Levenshtein => strsim::normalized_levenshtein(a, b),
            SimilarityMetric::DamerauLevenshtein => strsim::normalized_damerau_levenshtein(a, b),
            SimilarityMetric::JaroWinkler => strsim::jaro_winkler(a, b),
        }
    }

    ///
    /// Upper bound of `score` for strings of the given char lengths, or `None` when
    /// the metric has no cheap bound.
    ///
    /// An edit distance is never smaller than the length difference, and the bound
    /// is computed with the same floating point steps as the normalized score, so
    /// `score(a, b) <= upper_bound(len(a), len(b))` holds exactly.
    ///
    pub fn upper_bound(&self, len_a: usize, len_b: usize) -> Option<f64> {
        match self {
            SimilarityMetric::Levenshtein | SimilarityMetric::DamerauLevenshtein => {
                let longest = len_a.max(len_b);
                if longest == 0 {
                    return Some(1.0);
                }
                Some(1.0 - (len_a.abs_diff(len_b) as f64) / (longest as f64))
            }
            SimilarityMetric::JaroWinkler => None,
        }
    }
}

impl fmt::Display for SimilarityMetric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            SimilarityMetric::Levenshtein => "levenshtein",
            SimilarityMetric::DamerauLevenshtein => "damerauLevenshtein",
            SimilarityMetric::JaroWinkler => "jaroWinkler",
        };
        f.write_str(name)
    }
}
