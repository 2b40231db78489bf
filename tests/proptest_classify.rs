use ad_dedup_service::{Classifier, CompositeKey, DedupOptions, FieldSet, Record, SimilarityMetric};
use proptest::prelude::*;
use proptest::test_runner::Config;

const FIELDS: [&str; 3] = ["advertiser", "channel", "date"];

fn record_strategy() -> impl Strategy<Value = Record> {
    (
        prop::sample::select(vec!["PepsiCo", "pepsico", "Pepsi Co", "Nike", "NIKE ", "Coca-Cola"]),
        prop::sample::select(vec!["TV", "tv", "OOH", "Digital", ""]),
        "2025-0[78]-1[0-9]",
    )
        .prop_map(|(advertiser, channel, date)| {
            Record::new()
                .with("advertiser", advertiser)
                .with("channel", channel)
                .with("date", date)
        })
}

fn metric_strategy() -> impl Strategy<Value = SimilarityMetric> {
    prop::sample::select(vec![
        SimilarityMetric::Levenshtein,
        SimilarityMetric::DamerauLevenshtein,
        SimilarityMetric::JaroWinkler,
    ])
}

fn classifier(threshold: f64, metric: SimilarityMetric) -> Classifier {
    Classifier::new(DedupOptions {
        field_set: FieldSet::new(FIELDS).unwrap(),
        fuzzy_threshold: threshold,
        metric,
    })
    .unwrap()
}

/// Plain all-pairs reference without any pruning.
fn reference(records: &[Record], threshold: f64, metric: SimilarityMetric) -> Vec<bool> {
    let field_set = FieldSet::new(FIELDS).unwrap();
    let keys: Vec<CompositeKey> = records
        .iter()
        .map(|r| CompositeKey::build(r, &field_set))
        .collect();
    let mut flags = vec![false; keys.len()];
    for i in 0..keys.len() {
        for j in (i + 1)..keys.len() {
            if keys[i] == keys[j] || metric.score(keys[i].as_str(), keys[j].as_str()) >= threshold {
                flags[i] = true;
                flags[j] = true;
            }
        }
    }
    flags
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn matches_unpruned_all_pairs(
        records in prop::collection::vec(record_strategy(), 0..24),
        threshold in 0.0_f64..=1.0,
        metric in metric_strategy()
    ) {
        let got = classifier(threshold, metric).classify(&records);
        prop_assert_eq!(got, reference(&records, threshold, metric));
    }

    #[test]
    fn deterministic(
        records in prop::collection::vec(record_strategy(), 0..24),
        threshold in 0.0_f64..=1.0
    ) {
        let classifier = classifier(threshold, SimilarityMetric::Levenshtein);
        prop_assert_eq!(classifier.classify(&records), classifier.classify(&records));
    }

    #[test]
    fn matching_pairs_flag_both_sides(
        records in prop::collection::vec(record_strategy(), 2..16),
        threshold in 0.5_f64..=1.0,
        metric in metric_strategy()
    ) {
        let verdicts = classifier(threshold, metric).classify(&records);
        let field_set = FieldSet::new(FIELDS).unwrap();
        let keys: Vec<CompositeKey> = records.iter().map(|r| CompositeKey::build(r, &field_set)).collect();
        for i in 0..keys.len() {
            for j in (i + 1)..keys.len() {
                if metric.score(keys[i].as_str(), keys[j].as_str()) >= threshold {
                    prop_assert!(verdicts[i] && verdicts[j]);
                }
                if keys[i] == keys[j] {
                    prop_assert!(verdicts[i] && verdicts[j]);
                }
            }
        }
    }

    #[test]
    fn lowering_threshold_never_unflags(
        records in prop::collection::vec(record_strategy(), 0..24),
        low in 0.0_f64..=1.0,
        high in 0.0_f64..=1.0,
        metric in metric_strategy()
    ) {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        let relaxed = classifier(low, metric).classify(&records);
        let strict = classifier(high, metric).classify(&records);
        for (r, s) in relaxed.iter().zip(&strict) {
            prop_assert!(*r || !*s);
        }
        prop_assert!(
            relaxed.iter().filter(|&&f| f).count() >= strict.iter().filter(|&&f| f).count()
        );
    }

    #[test]
    fn lone_record_is_never_flagged(
        record in record_strategy(),
        threshold in 0.0_f64..=1.0,
        metric in metric_strategy()
    ) {
        prop_assert_eq!(classifier(threshold, metric).classify(&[record]), vec![false]);
    }
}
