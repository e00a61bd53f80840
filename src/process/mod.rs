// src/process/mod.rs
use crate::error::{EtlError, Result};
use crate::schema::types::RAW_COLUMNS;
use arrow::{array::StringArray, record_batch::RecordBatch};
use csv::ReaderBuilder;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};
use tracing::debug;

pub mod convert;
pub mod date_parser;
pub mod transform;
pub mod utils;

pub use transform::transform;

/// Read the CSV at `path` fully into memory as a raw-schema batch.
#[tracing::instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<RecordBatch> {
    let file = File::open(&path)?;
    read_csv_from(BufReader::new(file))
}

/// Parse CSV text into a raw-schema batch, rows in input order.
///
/// The header row must name every raw column exactly; other columns are
/// ignored and column order in the file does not matter. Short records are
/// padded with nulls. Missing-value sentinels become nulls.
pub fn read_csv_from<R: Read>(reader: R) -> Result<RecordBatch> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let positions = RAW_COLUMNS
        .iter()
        .map(|col| {
            headers.iter().position(|h| h == col.name).ok_or_else(|| {
                EtlError::InvalidInput(format!("missing required column `{}`", col.name))
            })
        })
        .collect::<Result<Vec<usize>>>()?;

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); RAW_COLUMNS.len()];
    for (idx, result) in rdr.records().enumerate() {
        let record = result?;
        for (values, &pos) in columns.iter_mut().zip(&positions) {
            let v = record
                .get(pos)
                .and_then(utils::normalize_missing)
                .map(str::to_string);
            values.push(v);
        }
        if idx > 0 && idx % 10_000 == 0 {
            debug!(rows = idx, "reading csv");
        }
    }

    let arrays: Vec<StringArray> = columns.into_iter().map(StringArray::from).collect();
    convert::convert_to_raw_types(arrays)
}
