//! Duplicate detection for advertisement records.
//!
//! Records are reduced to a composite key of normalized fields. Records sharing
//! a key are exact duplicates; records whose keys score at or above a
//! similarity threshold are fuzzy duplicates. Both kinds are flagged on every
//! member, with no survivor chosen.

pub mod classify;
pub mod dto;
pub mod error;
pub mod key;
pub mod normalize;
pub mod partition;
pub mod record;
pub mod response;
pub mod similarity;
pub mod util;

pub use classify::{classify, Classification, Classifier, DedupOptions, DEFAULT_FUZZY_THRESHOLD};
pub use error::{DedupError, ServiceError};
pub use key::{CompositeKey, FieldSet, DEFAULT_AD_FIELDS, KEY_SEPARATOR};
pub use partition::{partition, BatchSummary, Partition};
pub use record::{FieldValue, Record};
pub use similarity::SimilarityMetric;
