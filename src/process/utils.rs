use crate::error::{EtlError, Result};
use std::path::Path;

/// Field values read as missing, matching what pandas' `read_csv` treats
/// as NaN by default. Compared verbatim.
pub const MISSING_SENTINELS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(raw: &str) -> bool {
    MISSING_SENTINELS.contains(&raw)
}

/// `None` for a missing-value sentinel, the value otherwise.
pub fn normalize_missing(raw: &str) -> Option<&str> {
    if is_missing(raw) {
        None
    } else {
        Some(raw)
    }
}

/// Table name for an input file: its stem (`data/people-100.csv` → `people-100`).
pub fn table_name_from_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            EtlError::InvalidInput(format!("cannot derive a table name from {:?}", path))
        })
}

pub fn transformed_table_name(table: &str) -> String {
    format!("{}_transformed", table)
}

/// Object key of the uploaded CSV for a raw table.
pub fn transformed_object_key(table: &str) -> String {
    format!("{}.csv", transformed_table_name(table))
}
