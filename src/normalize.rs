use crate::record::FieldValue;

/// Canonical text form of a field value: null becomes the empty string, anything
/// else its textual form trimmed and lowercased.
pub fn normalize_value(value: Option<&FieldValue>) -> String {
    match value {
        None | Some(FieldValue::Null) => String::new(),
        Some(FieldValue::Text(s)) => normalize_text(s),
        Some(other) => normalize_text(&other.to_string()),
    }
}

/// Trims and lowercases. Idempotent.
pub fn normalize_text(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn missing_and_null_are_empty() {
        assert_eq!(normalize_value(None), "");
        assert_eq!(normalize_value(Some(&FieldValue::Null)), "");
    }

    #[test]
    fn text_is_trimmed_and_folded() {
        assert_eq!(normalize_value(Some(&"  PepsiCo \t".into())), "pepsico");
        assert_eq!(normalize_text("ÉCLAIR Inc."), "éclair inc.");
    }

    #[test]
    fn non_text_uses_textual_form() {
        assert_eq!(normalize_value(Some(&FieldValue::Integer(30))), "30");
        let date = NaiveDate::from_ymd_opt(2025, 7, 30).unwrap();
        assert_eq!(normalize_value(Some(&date.into())), "2025-07-30");
    }

    #[test]
    fn idempotent() {
        for raw in ["  Coca-Cola ", "OOH", "", " 30S\n", "Straße"] {
            let once = normalize_text(raw);
            assert_eq!(normalize_text(&once), once);
        }
    }
}
