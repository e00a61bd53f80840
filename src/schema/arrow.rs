// src/schema/arrow.rs

use arrow::datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema, SchemaRef};
use std::sync::Arc;

use super::types::{Column, TableKind};

/// Map a MySQL column type into an Arrow DataType.
///
/// - INT, INTEGER, BIGINT → Int64
/// - DATE                 → Date32
/// - CHAR*, VARCHAR*      → Utf8
/// - fallback             → Utf8
pub fn map_to_arrow_type(sql_type: &str) -> DataType {
    let upper = sql_type.to_ascii_uppercase();
    if upper == "INT" || upper == "INTEGER" || upper == "BIGINT" {
        DataType::Int64
    } else if upper == "DATE" {
        DataType::Date32
    } else {
        DataType::Utf8
    }
}

/// Build an Arrow schema from table columns.
///
/// With `dates_as_text` DATE columns stay Utf8: that is how rows look
/// straight out of the CSV or the raw table, before the transformer parses
/// them. The primary key is the only non-nullable field.
pub fn build_arrow_schema(cols: &[Column], dates_as_text: bool) -> SchemaRef {
    let fields: Vec<ArrowField> = cols
        .iter()
        .map(|col| {
            let dt = match map_to_arrow_type(col.sql_type) {
                DataType::Date32 if dates_as_text => DataType::Utf8,
                other => other,
            };
            ArrowField::new(col.name, dt, !col.is_primary_key())
        })
        .collect();

    Arc::new(ArrowSchema::new(fields))
}

/// Schema of batches read from the CSV file or back from the raw table.
pub fn raw_schema() -> SchemaRef {
    build_arrow_schema(TableKind::Raw.columns(), true)
}

/// Schema of transformer output.
pub fn transformed_schema() -> SchemaRef {
    build_arrow_schema(TableKind::Transformed.columns(), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{DATE_OF_BIRTH, FULL_NAME, INDEX};

    #[test]
    fn test_type_mapping() {
        assert_eq!(map_to_arrow_type("INT"), DataType::Int64);
        assert_eq!(map_to_arrow_type("date"), DataType::Date32);
        assert_eq!(map_to_arrow_type("VARCHAR(50)"), DataType::Utf8);
    }

    #[test]
    fn test_raw_keeps_dates_as_text() {
        let schema = raw_schema();
        assert_eq!(schema.fields().len(), 9);
        let dob = schema.field_with_name(DATE_OF_BIRTH).unwrap();
        assert_eq!(dob.data_type(), &DataType::Utf8);
        assert!(!schema.field_with_name(INDEX).unwrap().is_nullable());
    }

    #[test]
    fn test_transformed_parses_dates() {
        let schema = transformed_schema();
        assert_eq!(schema.fields().len(), 10);
        let dob = schema.field_with_name(DATE_OF_BIRTH).unwrap();
        assert_eq!(dob.data_type(), &DataType::Date32);
        assert!(dob.is_nullable());
        assert_eq!(schema.field(9).name(), FULL_NAME);
    }
}
