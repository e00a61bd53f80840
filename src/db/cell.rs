// src/db/cell.rs

use crate::error::{EtlError, Result};
use crate::process::convert::parse_date_column;
use crate::schema::{build_arrow_schema, TableKind};
use arrow::{
    array::{Array, ArrayRef, Date32Array, Date32Builder, Int64Array, Int64Builder, StringArray, StringBuilder},
    datatypes::DataType,
    record_batch::RecordBatch,
};
use chrono::{Datelike, NaiveDate};
use sqlx::{
    mysql::{MySql, MySqlArguments},
    query::Query,
};
use std::sync::Arc;

/// One field of one row on its way between a batch and MySQL.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Int(Option<i64>),
    Text(Option<String>),
    Date(Option<NaiveDate>),
}

impl CellValue {
    /// Bind as the next `?` parameter.
    pub fn bind<'q>(
        self,
        query: Query<'q, MySql, MySqlArguments>,
    ) -> Query<'q, MySql, MySqlArguments> {
        match self {
            CellValue::Int(v) => query.bind(v),
            CellValue::Text(v) => query.bind(v),
            CellValue::Date(v) => query.bind(v),
        }
    }
}

/// Resolve the columns of `kind` in `batch` by name, in table order.
///
/// DATE columns still holding text are parsed here, so a value MySQL would
/// reject as a date is bound as NULL instead of failing the whole insert.
pub fn table_columns(batch: &RecordBatch, kind: TableKind) -> Result<Vec<ArrayRef>> {
    kind.columns()
        .iter()
        .map(|c| {
            let arr = batch.column_by_name(c.name).cloned().ok_or_else(|| {
                EtlError::InvalidInput(format!("batch has no column `{}`", c.name))
            })?;
            match (c.sql_type, arr.data_type()) {
                ("DATE", DataType::Utf8) => Ok(Arc::new(parse_date_column(&arr)?) as ArrayRef),
                _ => Ok(arr),
            }
        })
        .collect()
}

/// Values of row `row`, one per column, ready to bind.
pub fn row_values(columns: &[ArrayRef], row: usize) -> Result<Vec<CellValue>> {
    columns
        .iter()
        .map(|arr| {
            let present = arr.is_valid(row);
            let cell = match arr.data_type() {
                DataType::Int64 => {
                    let a = downcast::<Int64Array>(arr)?;
                    CellValue::Int(present.then(|| a.value(row)))
                }
                DataType::Utf8 => {
                    let a = downcast::<StringArray>(arr)?;
                    CellValue::Text(present.then(|| a.value(row).to_string()))
                }
                DataType::Date32 => {
                    let a = downcast::<Date32Array>(arr)?;
                    let date = if present { a.value_as_date(row) } else { None };
                    // the wire format has an unsigned four-digit year
                    CellValue::Date(date.filter(|d| (0..=9999).contains(&d.year())))
                }
                other => {
                    return Err(EtlError::InvalidInput(format!(
                        "unsupported column type {}",
                        other
                    )))
                }
            };
            Ok(cell)
        })
        .collect()
}

fn downcast<T: 'static>(arr: &ArrayRef) -> Result<&T> {
    arr.as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| EtlError::InvalidInput(format!("unexpected array for {}", arr.data_type())))
}

/// Assemble decoded rows into a batch of the given table layout.
///
/// DATE columns arrive as text (see `select_all_sql`), so with
/// `dates_as_text` they are kept as Utf8.
pub fn batch_from_rows(
    kind: TableKind,
    dates_as_text: bool,
    rows: Vec<Vec<CellValue>>,
) -> Result<RecordBatch> {
    let schema = build_arrow_schema(kind.columns(), dates_as_text);
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

    for (i, fld) in schema.fields().iter().enumerate() {
        let mismatch = |v: &CellValue| {
            EtlError::InvalidInput(format!(
                "column `{}` expected {} but got {:?}",
                fld.name(),
                fld.data_type(),
                v
            ))
        };
        let cells = rows.iter().map(|r| {
            r.get(i).ok_or_else(|| {
                EtlError::InvalidInput(format!("row has no value for `{}`", fld.name()))
            })
        });

        let arr: ArrayRef = match fld.data_type() {
            DataType::Int64 => {
                let mut b = Int64Builder::with_capacity(rows.len());
                for cell in cells {
                    match cell? {
                        CellValue::Int(v) => b.append_option(*v),
                        other => return Err(mismatch(other)),
                    }
                }
                Arc::new(b.finish())
            }
            DataType::Date32 => {
                let mut b = Date32Builder::with_capacity(rows.len());
                for cell in cells {
                    match cell? {
                        CellValue::Date(v) => {
                            b.append_option(v.map(crate::process::date_parser::date_to_days))
                        }
                        other => return Err(mismatch(other)),
                    }
                }
                Arc::new(b.finish())
            }
            _ => {
                let mut b = StringBuilder::new();
                for cell in cells {
                    match cell? {
                        CellValue::Text(v) => b.append_option(v.as_deref()),
                        other => return Err(mismatch(other)),
                    }
                }
                Arc::new(b.finish())
            }
        };
        columns.push(arr);
    }

    RecordBatch::try_new(schema, columns).map_err(Into::into)
}
