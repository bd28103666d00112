//! JSON corpus loading
//!
//! The corpus file is a JSON array of objects. String-valued members become
//! record fields; anything else (numbers, nested objects, image links) is
//! ignored. When a language list is given, only records whose `lang` member
//! is in the list are kept, so record ids depend on the filter.

use super::SourceRecord;
use crate::error::Result;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Member name holding a record's language code
const LANG_FIELD: &str = "lang";

/// Load and filter the corpus file at `path`
pub fn load_records(path: &Path, languages: &[String]) -> Result<Vec<SourceRecord>> {
    let data = fs::read(path)?;
    let records = parse_records(&data, languages)?;
    info!(
        path = %path.display(),
        records = records.len(),
        "loaded corpus"
    );
    Ok(records)
}

/// Parse a JSON corpus from bytes
pub fn parse_records(data: &[u8], languages: &[String]) -> Result<Vec<SourceRecord>> {
    let raw: Vec<Map<String, Value>> = serde_json::from_slice(data)?;
    let total = raw.len();

    let records: Vec<SourceRecord> = raw
        .into_iter()
        .filter(|entry| language_allowed(entry, languages))
        .map(record_from_entry)
        .collect();

    debug!(total, kept = records.len(), "language filter applied");
    Ok(records)
}

fn record_from_entry(entry: Map<String, Value>) -> SourceRecord {
    entry
        .into_iter()
        .filter_map(|(name, value)| match value {
            Value::String(text) => Some((name, text)),
            _ => None,
        })
        .collect()
}

/// Records without a language tag pass any filter
fn language_allowed(entry: &Map<String, Value>, languages: &[String]) -> bool {
    if languages.is_empty() {
        return true;
    }
    match entry.get(LANG_FIELD).and_then(Value::as_str) {
        Some(lang) => languages.iter().any(|l| l == lang),
        None => true,
    }
}
