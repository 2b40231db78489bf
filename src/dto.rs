use crate::classify::{DedupOptions, DEFAULT_FUZZY_THRESHOLD};
use crate::key::FieldSet;
use crate::partition::BatchSummary;
use crate::similarity::SimilarityMetric;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SOURCE_LABEL: &str = "uploaded";

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DataFile {
    pub bucket: String,
    pub key: String,
}

/// Event payload of the classify service.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyConfig {
    pub data: DataFile,
    #[serde(default)]
    pub field_set: FieldSet,
    #[serde(default = "default_threshold")]
    pub fuzzy_threshold: f64,
    #[serde(default)]
    pub metric: SimilarityMetric,
    #[serde(default = "default_source")]
    pub source: String,
}

impl ClassifyConfig {
    pub fn dedup_options(&self) -> DedupOptions {
        DedupOptions {
            field_set: self.field_set.clone(),
            fuzzy_threshold: self.fuzzy_threshold,
            metric: self.metric,
        }
    }
}

fn default_threshold() -> f64 {
    DEFAULT_FUZZY_THRESHOLD
}

fn default_source() -> String {
    DEFAULT_SOURCE_LABEL.to_string()
}

/// Response body of a successful classify run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyResult {
    pub cleaned: DataFile,
    pub duplicates: DataFile,
    pub summary: BatchSummary,
}
