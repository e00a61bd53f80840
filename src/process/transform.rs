use crate::error::{EtlError, Result};
use crate::process::convert::parse_date_column;
use crate::schema::{
    transformed_schema,
    types::{DATE_OF_BIRTH, EMAIL, FIRST_NAME, FULL_NAME, LAST_NAME},
};
use arrow::{
    array::{Array, ArrayRef, BooleanArray, StringArray},
    compute::{cast, filter_record_batch},
    datatypes::DataType,
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::{error, info};

/// Columns without which the batch cannot be transformed at all.
const REQUIRED: [&str; 4] = [EMAIL, FIRST_NAME, LAST_NAME, DATE_OF_BIRTH];

/// Apply the row-level transformations to a raw-schema batch:
///
/// 1. drop rows whose `Email` is null or empty,
/// 2. parse `Date of birth` into a date, unparseable values becoming null,
/// 3. derive `Full Name` as `First Name + " " + Last Name` (null when
///    either part is null).
///
/// A batch missing any of the columns involved is a structural error; it is
/// logged here and returned to the caller.
pub fn transform(batch: &RecordBatch) -> Result<RecordBatch> {
    match transform_batch(batch) {
        Ok(out) => {
            info!(
                rows_in = batch.num_rows(),
                rows_out = out.num_rows(),
                dropped = batch.num_rows() - out.num_rows(),
                "Data transformed successfully."
            );
            Ok(out)
        }
        Err(e) => {
            error!("Error during data transformation: {}", e);
            Err(e)
        }
    }
}

fn column(batch: &RecordBatch, name: &str) -> Result<ArrayRef> {
    batch
        .column_by_name(name)
        .cloned()
        .ok_or_else(|| EtlError::Transform(format!("missing column `{}`", name)))
}

fn utf8_column(batch: &RecordBatch, name: &str) -> Result<StringArray> {
    let arr = cast(&column(batch, name)?, &DataType::Utf8)?;
    arr.as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| EtlError::Transform(format!("column `{}` is not text", name)))
}

fn transform_batch(batch: &RecordBatch) -> Result<RecordBatch> {
    for name in REQUIRED {
        column(batch, name)?;
    }

    // 1) drop rows without an email
    let email = utf8_column(batch, EMAIL)?;
    let keep: BooleanArray = email
        .iter()
        .map(|v| Some(v.is_some_and(|s| !s.is_empty())))
        .collect();
    let kept = filter_record_batch(batch, &keep)?;

    // 2) dates
    let dob = parse_date_column(&column(&kept, DATE_OF_BIRTH)?)?;

    // 3) full name
    let first = utf8_column(&kept, FIRST_NAME)?;
    let last = utf8_column(&kept, LAST_NAME)?;
    let full_name: StringArray = first
        .iter()
        .zip(last.iter())
        .map(|(f, l)| match (f, l) {
            (Some(f), Some(l)) => Some(format!("{} {}", f, l)),
            _ => None,
        })
        .collect();

    // assemble in transformed column order
    let schema = transformed_schema();
    let mut out: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());
    for fld in schema.fields() {
        let arr: ArrayRef = match fld.name().as_str() {
            DATE_OF_BIRTH => Arc::new(dob.clone()),
            FULL_NAME => Arc::new(full_name.clone()),
            name => cast(&column(&kept, name)?, fld.data_type())?,
        };
        if !fld.is_nullable() && arr.null_count() > 0 {
            return Err(EtlError::Transform(format!(
                "column `{}` contains nulls",
                fld.name()
            )));
        }
        out.push(arr);
    }

    RecordBatch::try_new(schema, out).map_err(Into::into)
}
