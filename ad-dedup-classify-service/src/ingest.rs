use ad_dedup_service::error::ServiceError;
use ad_dedup_service::record::{FieldValue, Record};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use csv::{ReaderBuilder, Trim, Writer};
use tracing::warn;
use uuid::Uuid;

/// Columns every ingested ad carries; missing ones are created as placeholders.
pub const REQUIRED_COLUMNS: [&str; 6] = ["advertiser", "brand", "channel", "format", "date", "spend"];
/// Audit columns stamped on every ingested ad.
pub const AUDIT_COLUMNS: [&str; 3] = ["ad_id", "ingested_at", "source"];
pub const DUPLICATE_COLUMN: &str = "is_duplicate";

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Parsed upload: the records and the column order to write them back in.
#[derive(Debug)]
pub struct Batch {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

///
/// Reads an ad CSV with a header row into cleaned, audit-stamped records.
///
/// ## Arguments
///
/// * `bytes` - Raw CSV contents.
/// * `source` - Label written to the `source` audit column.
/// * `ingested_at` - Timestamp written to the `ingested_at` audit column.
///
pub fn read_batch(
    bytes: &[u8],
    source: &str,
    ingested_at: DateTime<Utc>,
) -> Result<Batch, ServiceError> {
    let mut reader = ReaderBuilder::new().trim(Trim::Headers).from_reader(bytes);
    let headers: Vec<String> = reader
        .headers()
        .map_err(ServiceError::bad_request)?
        .iter()
        .map(|h| h.to_lowercase())
        .collect();
    for (i, header) in headers.iter().enumerate() {
        if headers[..i].contains(header) {
            return Err(ServiceError::bad_request(format!(
                "column '{}' appears more than once",
                header
            )));
        }
    }

    let mut columns = headers.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == col))
        .collect();
    for col in &missing {
        warn!(column = *col, "column missing, creating placeholder");
        columns.push(col.to_string());
    }
    for col in AUDIT_COLUMNS {
        if !columns.iter().any(|c| c == col) {
            columns.push(col.to_string());
        }
    }

    let stamp = ingested_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut records = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = row.map_err(|err| ServiceError::bad_request(format!("row {}: {}", line + 1, err)))?;
        let mut record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(name, cell)| (name.clone(), FieldValue::from(cell)))
            .collect();
        for col in &missing {
            record.set(*col, placeholder(col));
        }
        clean_required_columns(&mut record);
        stamp_audit_fields(&mut record, source, &stamp);
        records.push(record);
    }
    Ok(Batch { columns, records })
}

fn placeholder(column: &str) -> FieldValue {
    if column == "spend" {
        FieldValue::Integer(0)
    } else {
        FieldValue::from("")
    }
}

fn clean_required_columns(record: &mut Record) {
    for col in REQUIRED_COLUMNS {
        let raw = match record.get(col) {
            Some(FieldValue::Text(s)) => s.trim().to_string(),
            _ => continue,
        };
        let value = match col {
            "date" => parse_date(&raw).map_or(FieldValue::Text(raw), FieldValue::Date),
            "spend" => parse_spend(&raw),
            _ => FieldValue::Text(title_case(&raw)),
        };
        record.set(col, value);
    }
}

fn stamp_audit_fields(record: &mut Record, source: &str, stamp: &str) {
    let has_id = matches!(record.get("ad_id"), Some(FieldValue::Text(id)) if !id.trim().is_empty());
    if !has_id {
        record.set("ad_id", Uuid::new_v4().to_string());
    }
    let has_stamp =
        matches!(record.get("ingested_at"), Some(FieldValue::Text(at)) if !at.trim().is_empty());
    if !has_stamp {
        record.set("ingested_at", stamp);
    }
    record.set("source", source);
}

/// Uppercases the first letter of every alphabetic run and lowercases the rest.
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_word = false;
    for c in raw.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

fn parse_spend(raw: &str) -> FieldValue {
    if raw.is_empty() {
        return FieldValue::Null;
    }
    if let Ok(v) = raw.parse::<i64>() {
        return FieldValue::Integer(v);
    }
    raw.parse::<f64>()
        .map_or_else(|_| FieldValue::from(raw), FieldValue::Number)
}

///
/// Serializes records to CSV in the given column order, appending the
/// `is_duplicate` flag.
///
pub fn write_batch(
    columns: &[String],
    records: &[Record],
    is_duplicate: bool,
) -> Result<Vec<u8>, ServiceError> {
    let mut writer = Writer::from_writer(vec![]);
    writer
        .write_record(columns.iter().map(String::as_str).chain([DUPLICATE_COLUMN]))
        .map_err(ServiceError::internal_server_error)?;
    let flag = if is_duplicate { "true" } else { "false" };
    for record in records {
        let cells: Vec<String> = columns
            .iter()
            .map(|col| record.get(col).map(ToString::to_string).unwrap_or_default())
            .collect();
        writer
            .write_record(cells.iter().map(String::as_str).chain([flag]))
            .map_err(ServiceError::internal_server_error)?;
    }
    writer.into_inner().map_err(ServiceError::internal_server_error)
}
