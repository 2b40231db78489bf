use crate::error::DedupError;
use crate::key::{build_keys, CompositeKey, FieldSet};
use crate::record::Record;
use crate::similarity::SimilarityMetric;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::debug;

pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.92;

/// Settings for one classification run.
#[derive(Clone, Debug, PartialEq)]
pub struct DedupOptions {
    pub field_set: FieldSet,
    pub fuzzy_threshold: f64,
    pub metric: SimilarityMetric,
}

impl Default for DedupOptions {
    fn default() -> Self {
        Self {
            field_set: FieldSet::default(),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            metric: SimilarityMetric::default(),
        }
    }
}

/// Per-record outcome of a run. Every cluster member is flagged; no survivor is picked.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Classification {
    /// Record shares its composite key with at least one other record.
    pub exact: Vec<bool>,
    /// Record scored at or above the threshold against at least one other record.
    pub fuzzy: Vec<bool>,
    /// Pairs whose similarity was actually computed.
    pub pairs_compared: u64,
    /// Pairs skipped because their length bound was already below the threshold.
    pub pairs_pruned: u64,
}

impl Classification {
    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    pub fn is_duplicate(&self, index: usize) -> bool {
        self.exact[index] || self.fuzzy[index]
    }

    /// Combined verdicts, aligned with the input records.
    pub fn verdicts(&self) -> Vec<bool> {
        self.exact
            .iter()
            .zip(&self.fuzzy)
            .map(|(&exact, &fuzzy)| exact || fuzzy)
            .collect()
    }

    pub fn duplicate_count(&self) -> usize {
        (0..self.len()).filter(|&i| self.is_duplicate(i)).count()
    }
}

/// Validated dedup engine. Holds no state between calls.
#[derive(Clone, Debug)]
pub struct Classifier {
    options: DedupOptions,
}

impl Classifier {
    /// Fails with `InvalidThreshold` when the threshold is NaN or outside [0, 1].
    pub fn new(options: DedupOptions) -> Result<Self, DedupError> {
        validate_threshold(options.fuzzy_threshold)?;
        Ok(Self { options })
    }

    pub fn classify(&self, records: &[Record]) -> Vec<bool> {
        self.classify_detailed(records).verdicts()
    }

    pub fn classify_detailed(&self, records: &[Record]) -> Classification {
        let keys = build_keys(records, &self.options.field_set);
        let exact = exact_duplicates(&keys);
        let (fuzzy, pairs_compared, pairs_pruned) =
            fuzzy_duplicates(&keys, self.options.fuzzy_threshold, self.options.metric);
        let classification = Classification {
            exact,
            fuzzy,
            pairs_compared,
            pairs_pruned,
        };
        debug!(
            records = records.len(),
            metric = %self.options.metric,
            threshold = self.options.fuzzy_threshold,
            exact = classification.exact.iter().filter(|&&f| f).count(),
            fuzzy = classification.fuzzy.iter().filter(|&&f| f).count(),
            pairs_compared,
            pairs_pruned,
            "classified batch"
        );
        classification
    }
}

/// Flags exact and fuzzy duplicates under the default metric, aligned with `records`.
pub fn classify<S: AsRef<str>>(
    records: &[Record],
    fields: &[S],
    fuzzy_threshold: f64,
) -> Result<Vec<bool>, DedupError> {
    let field_set = FieldSet::new(fields.iter().map(|f| f.as_ref().to_string()))?;
    let classifier = Classifier::new(DedupOptions {
        field_set,
        fuzzy_threshold,
        metric: SimilarityMetric::default(),
    })?;
    Ok(classifier.classify(records))
}

fn validate_threshold(threshold: f64) -> Result<(), DedupError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(DedupError::InvalidThreshold(threshold))
    }
}

fn exact_duplicates(keys: &[CompositeKey]) -> Vec<bool> {
    let mut groups: FxHashMap<&CompositeKey, Vec<usize>> = FxHashMap::default();
    for (idx, key) in keys.iter().enumerate() {
        groups.entry(key).or_default().push(idx);
    }
    let mut flags = vec![false; keys.len()];
    for members in groups.values().filter(|members| members.len() > 1) {
        for &idx in members {
            flags[idx] = true;
        }
    }
    flags
}

// Compares every unordered pair (i, j), i < j. Rows are spread over the rayon
// pool; each worker fills a local bitmap and the bitmaps are OR-merged, so a
// flag can only ever go from false to true.
fn fuzzy_duplicates(
    keys: &[CompositeKey],
    threshold: f64,
    metric: SimilarityMetric,
) -> (Vec<bool>, u64, u64) {
    let n = keys.len();
    let lengths: Vec<usize> = keys.iter().map(CompositeKey::char_len).collect();
    let empty = || (vec![false; n], 0_u64, 0_u64);
    (0..n)
        .into_par_iter()
        .fold(empty, |(mut flags, mut compared, mut pruned), i| {
            for j in (i + 1)..n {
                if let Some(bound) = metric.upper_bound(lengths[i], lengths[j]) {
                    if bound < threshold {
                        pruned += 1;
                        continue;
                    }
                }
                compared += 1;
                let score = if keys[i] == keys[j] {
                    1.0
                } else {
                    metric.score(keys[i].as_str(), keys[j].as_str())
                };
                if score >= threshold {
                    flags[i] = true;
                    flags[j] = true;
                }
            }
            (flags, compared, pruned)
        })
        .reduce(empty, |(mut flags, compared, pruned), (other, c, p)| {
            for (flag, other) in flags.iter_mut().zip(other) {
                *flag |= other;
            }
            (flags, compared + c, pruned + p)
        })
}
