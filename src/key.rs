use crate::error::DedupError;
use crate::normalize::normalize_value;
use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Joins normalized field values. A value that itself contains `|` can make two
/// different field sequences collide on the same key; this is accepted.
pub const KEY_SEPARATOR: char = '|';

/// Key fields used for ad records when the caller does not supply any.
pub const DEFAULT_AD_FIELDS: [&str; 5] = ["advertiser", "brand", "channel", "format", "date"];

/// Non-empty, ordered list of field names participating in the composite key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FieldSet(Vec<String>);

impl FieldSet {
    pub fn new<I, S>(fields: I) -> Result<Self, DedupError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if fields.is_empty() {
            return Err(DedupError::InvalidFieldSet);
        }
        Ok(FieldSet(fields))
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        FieldSet(DEFAULT_AD_FIELDS.iter().map(|s| s.to_string()).collect())
    }
}

impl TryFrom<Vec<String>> for FieldSet {
    type Error = DedupError;

    fn try_from(fields: Vec<String>) -> Result<Self, Self::Error> {
        FieldSet::new(fields)
    }
}

impl From<FieldSet> for Vec<String> {
    fn from(field_set: FieldSet) -> Self {
        field_set.0
    }
}

/// Normalized, separator-joined key fields of one record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey(String);

impl CompositeKey {
    pub fn build(record: &Record, field_set: &FieldSet) -> Self {
        let mut key = String::new();
        for (i, field) in field_set.fields().iter().enumerate() {
            if i > 0 {
                key.push(KEY_SEPARATOR);
            }
            key.push_str(&normalize_value(record.get(field)));
        }
        CompositeKey(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in chars, the unit the similarity metrics count in.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds the composite key of every record, positionally aligned with the input.
pub fn build_keys(records: &[Record], field_set: &FieldSet) -> Vec<CompositeKey> {
    records
        .iter()
        .map(|record| CompositeKey::build(record, field_set))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ad(advertiser: &str, brand: &str, channel: &str) -> Record {
        Record::new()
            .with("advertiser", advertiser)
            .with("brand", brand)
            .with("channel", channel)
    }

    #[test]
    fn empty_field_set_rejected() {
        assert_eq!(
            FieldSet::new(Vec::<String>::new()),
            Err(DedupError::InvalidFieldSet)
        );
        let parsed: Result<FieldSet, _> = serde_json::from_str("[]");
        assert!(parsed.is_err());
    }

    #[test]
    fn key_follows_field_set_order() {
        let record = ad(" PepsiCo", "Pepsi ", "TV");
        let forward = FieldSet::new(["advertiser", "brand", "channel"]).unwrap();
        let reverse = FieldSet::new(["channel", "brand", "advertiser"]).unwrap();
        assert_eq!(CompositeKey::build(&record, &forward).as_str(), "pepsico|pepsi|tv");
        assert_eq!(CompositeKey::build(&record, &reverse).as_str(), "tv|pepsi|pepsico");
    }

    #[test]
    fn missing_fields_are_empty_segments() {
        let record = Record::new().with("brand", "Nike");
        let field_set = FieldSet::new(["advertiser", "brand", "spend"]).unwrap();
        assert_eq!(CompositeKey::build(&record, &field_set).as_str(), "|nike|");
    }

    #[test]
    fn fields_outside_the_set_are_ignored() {
        let field_set = FieldSet::new(["advertiser", "brand"]).unwrap();
        let a = ad("Nike", "Nike", "OOH").with("spend", 50000_i64);
        let b = ad("NIKE", "nike", "TV").with("spend", 1_i64);
        assert_eq!(
            CompositeKey::build(&a, &field_set),
            CompositeKey::build(&b, &field_set)
        );
    }

    #[test]
    fn date_like_text_keeps_its_spelling() {
        let record = Record::new().with("date", "2025-8-5");
        let field_set = FieldSet::new(["date"]).unwrap();
        assert_eq!(CompositeKey::build(&record, &field_set).as_str(), "2025-8-5");
    }

    #[test]
    fn default_field_set_excludes_spend() {
        let fields = FieldSet::default();
        assert_eq!(fields.len(), 5);
        assert!(!fields.fields().iter().any(|f| f == "spend"));
    }
}
