use crate::error::DedupError;
use crate::normalize::normalize_value;
use crate::record::Record;
use rustc_hash::FxHashSet;
use serde::Serialize;

/// Records split by verdict, input order preserved within each side.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Partition {
    pub cleaned: Vec<Record>,
    pub duplicates: Vec<Record>,
}

pub fn partition(records: Vec<Record>, verdicts: &[bool]) -> Result<Partition, DedupError> {
    if records.len() != verdicts.len() {
        return Err(DedupError::LengthMismatch {
            records: records.len(),
            verdicts: verdicts.len(),
        });
    }
    let mut split = Partition::default();
    for (record, &is_duplicate) in records.into_iter().zip(verdicts) {
        if is_duplicate {
            split.duplicates.push(record);
        } else {
            split.cleaned.push(record);
        }
    }
    Ok(split)
}

/// Headline figures for a classified batch, computed over the cleaned records.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total_ads: usize,
    pub unique_brands: usize,
    pub total_spend: f64,
    pub duplicates: usize,
}

impl BatchSummary {
    pub fn from_partition(partition: &Partition) -> Self {
        let unique_brands = partition
            .cleaned
            .iter()
            .map(|record| normalize_value(record.get("brand")))
            .filter(|brand| !brand.is_empty())
            .collect::<FxHashSet<_>>()
            .len();
        let total_spend: f64 = partition
            .cleaned
            .iter()
            .filter_map(|record| record.get("spend").and_then(|v| v.as_f64()))
            .sum();
        Self {
            total_ads: partition.cleaned.len(),
            unique_brands,
            total_spend,
            duplicates: partition.duplicates.len(),
        }
    }
}
