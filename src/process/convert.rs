use crate::error::{EtlError, Result};
use crate::process::date_parser;
use crate::schema::{raw_schema, types::RAW_COLUMNS};
use arrow::{
    array::{Array, ArrayRef, Date32Array, Date32Builder, Int64Array, Int64Builder, StringArray},
    datatypes::DataType,
    record_batch::RecordBatch,
};
use std::sync::Arc;

/// Parse a text column into integers.
///
/// A value that is present but not an integer is an error naming the column
/// and the 1-based data row; so is a null when `required` is set.
pub fn parse_int_column(values: &StringArray, column: &str, required: bool) -> Result<Int64Array> {
    let mut b = Int64Builder::with_capacity(values.len());
    for (i, opt) in values.iter().enumerate() {
        match opt {
            Some(s) => {
                let v = s.trim().parse::<i64>().map_err(|_| {
                    EtlError::InvalidInput(format!(
                        "column `{}` row {}: {:?} is not an integer",
                        column,
                        i + 1,
                        s
                    ))
                })?;
                b.append_value(v);
            }
            None if required => {
                return Err(EtlError::InvalidInput(format!(
                    "column `{}` row {}: value is required",
                    column,
                    i + 1
                )));
            }
            None => b.append_null(),
        }
    }
    Ok(b.finish())
}

/// Coerce a date-of-birth column into Date32.
///
/// Text is parsed leniently and anything unparseable becomes null. A column
/// that is already Date32 passes through unchanged.
pub fn parse_date_column(arr: &ArrayRef) -> Result<Date32Array> {
    match arr.data_type() {
        DataType::Date32 => arr
            .as_any()
            .downcast_ref::<Date32Array>()
            .cloned()
            .ok_or_else(|| EtlError::Transform("date column is not Date32".into())),
        DataType::Utf8 => {
            let sarr = arr
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| EtlError::Transform("date column is not Utf8".into()))?;
            let mut b = Date32Builder::with_capacity(sarr.len());
            for opt in sarr.iter() {
                let days = opt
                    .and_then(date_parser::parse_date)
                    .map(date_parser::date_to_days);
                b.append_option(days);
            }
            Ok(b.finish())
        }
        other => Err(EtlError::Transform(format!(
            "date column has unsupported type {}",
            other
        ))),
    }
}

/// Turn nine text columns (raw column order) into a batch with the raw
/// schema: `Index` and `User Id` become integers, everything else stays text.
pub fn convert_to_raw_types(columns: Vec<StringArray>) -> Result<RecordBatch> {
    if columns.len() != RAW_COLUMNS.len() {
        return Err(EtlError::InvalidInput(format!(
            "expected {} columns, got {}",
            RAW_COLUMNS.len(),
            columns.len()
        )));
    }

    let schema = raw_schema();
    let mut out = Vec::with_capacity(columns.len());
    for (sarr, fld) in columns.into_iter().zip(schema.fields()) {
        match fld.data_type() {
            DataType::Int64 => {
                let ints = parse_int_column(&sarr, fld.name(), !fld.is_nullable())?;
                out.push(Arc::new(ints) as ArrayRef);
            }
            _ => out.push(Arc::new(sarr) as ArrayRef),
        }
    }

    RecordBatch::try_new(schema, out).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[Option<&str>]) -> StringArray {
        values.iter().copied().collect()
    }

    #[test]
    fn test_parse_int_column() {
        let ints = parse_int_column(&strings(&[Some("1"), None, Some(" 42 ")]), "User Id", false)
            .unwrap();
        assert_eq!(ints.value(0), 1);
        assert!(ints.is_null(1));
        assert_eq!(ints.value(2), 42);

        let err = parse_int_column(&strings(&[Some("1"), Some("88F7B33d")]), "User Id", false)
            .unwrap_err();
        assert!(err.to_string().contains("`User Id` row 2"), "{err}");

        let err = parse_int_column(&strings(&[None]), "Index", true).unwrap_err();
        assert!(err.to_string().contains("required"));
    }

    #[test]
    fn test_parse_date_column_from_text() {
        let arr: ArrayRef = Arc::new(strings(&[Some("1990-01-01"), Some("not-a-date"), None]));
        let dates = parse_date_column(&arr).unwrap();
        assert_eq!(dates.value(0), 7305);
        assert!(dates.is_null(1));
        assert!(dates.is_null(2));
    }

    #[test]
    fn test_parse_date_column_passthrough() {
        let arr: ArrayRef = Arc::new(Date32Array::from(vec![Some(1), None]));
        let dates = parse_date_column(&arr).unwrap();
        assert_eq!(dates.value(0), 1);
        assert!(dates.is_null(1));

        let bad: ArrayRef = Arc::new(Int64Array::from(vec![1]));
        assert!(parse_date_column(&bad).is_err());
    }

    #[test]
    fn test_convert_to_raw_types() {
        let row = [
            "1", "100", "Ann", "Lee", "F", "ann@x.com", "555-1234", "1990-01-01", "Engineer",
        ];
        let columns: Vec<StringArray> = row.iter().map(|v| strings(&[Some(*v)])).collect();
        let batch = convert_to_raw_types(columns).unwrap();
        assert_eq!(batch.num_rows(), 1);
        assert_eq!(batch.schema(), raw_schema());

        let short: Vec<StringArray> = row[..3].iter().map(|v| strings(&[Some(*v)])).collect();
        assert!(convert_to_raw_types(short).is_err());
    }
}
