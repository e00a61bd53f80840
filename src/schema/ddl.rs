// src/schema/ddl.rs

use super::types::{Column, TableKind};

/// Backtick-quote a MySQL identifier, doubling embedded backticks.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn column_list(cols: &[Column]) -> String {
    cols.iter()
        .map(|c| quote_ident(c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_ident(table))
}

pub fn create_table_sql(table: &str, kind: TableKind) -> String {
    let defs: Vec<String> = kind
        .columns()
        .iter()
        .map(|c| {
            let mut def = format!("{} {}", quote_ident(c.name), c.sql_type);
            if c.is_primary_key() {
                def.push_str(" PRIMARY KEY");
            }
            def
        })
        .collect();
    format!(
        "CREATE TABLE {} (\n    {}\n)",
        quote_ident(table),
        defs.join(",\n    ")
    )
}

/// Parameterized single-row insert, one `?` per column.
pub fn insert_sql(table: &str, kind: TableKind) -> String {
    let cols = kind.columns();
    let placeholders = vec!["?"; cols.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        column_list(cols),
        placeholders
    )
}

/// Read a whole table back in primary-key order.
///
/// Integers come back as BIGINT and DATE as `YYYY-MM-DD` text so every
/// row decodes the same way regardless of server column flags; a zero date
/// comes back as `0000-00-00` rather than failing to decode.
pub fn select_all_sql(table: &str, kind: TableKind) -> String {
    let exprs: Vec<String> = kind
        .columns()
        .iter()
        .map(|c| {
            let col = quote_ident(c.name);
            match c.sql_type {
                "INT" => format!("CAST({} AS SIGNED)", col),
                "DATE" => format!("DATE_FORMAT({}, '%Y-%m-%d')", col),
                _ => col,
            }
        })
        .collect();
    format!(
        "SELECT {} FROM {} ORDER BY {}",
        exprs.join(", "),
        quote_ident(table),
        quote_ident(kind.columns()[0].name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("people-100"), "`people-100`");
        assert_eq!(quote_ident("we`ird"), "`we``ird`");
    }

    #[test]
    fn test_create_raw_table() {
        let sql = create_table_sql("people", TableKind::Raw);
        assert!(sql.starts_with("CREATE TABLE `people` ("));
        assert!(sql.contains("`Index` INT PRIMARY KEY,"));
        assert!(sql.contains("`Date of birth` DATE,"));
        assert!(sql.contains("`Job Title` VARCHAR(100)\n)"));
        assert!(!sql.contains("Full Name"));
    }

    #[test]
    fn test_create_transformed_table() {
        let sql = create_table_sql("people_transformed", TableKind::Transformed);
        assert!(sql.contains("`Full Name` VARCHAR(150)\n)"));
        assert_eq!(sql.matches("PRIMARY KEY").count(), 1);
    }

    #[test]
    fn test_insert_placeholders_match_columns() {
        let raw = insert_sql("people", TableKind::Raw);
        assert_eq!(raw.matches('?').count(), 9);
        assert!(raw.starts_with(
            "INSERT INTO `people` (`Index`, `User Id`, `First Name`, `Last Name`, `Sex`, `Email`, `Phone`, `Date of birth`, `Job Title`)"
        ));

        let transformed = insert_sql("people_transformed", TableKind::Transformed);
        assert_eq!(transformed.matches('?').count(), 10);
        assert!(transformed.contains("`Job Title`, `Full Name`) VALUES"));
    }

    #[test]
    fn test_select_all() {
        let sql = select_all_sql("people", TableKind::Raw);
        assert!(sql.starts_with("SELECT CAST(`Index` AS SIGNED), CAST(`User Id` AS SIGNED), `First Name`"));
        assert!(sql.contains("DATE_FORMAT(`Date of birth`, '%Y-%m-%d')"));
        assert!(sql.ends_with("FROM `people` ORDER BY `Index`"));
        assert_eq!(drop_table_sql("people"), "DROP TABLE IF EXISTS `people`");
    }
}
