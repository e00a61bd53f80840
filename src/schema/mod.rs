pub mod arrow;
pub mod ddl;
pub mod types;

pub use self::arrow::{build_arrow_schema, raw_schema, transformed_schema};
pub use types::{Column, TableKind};
