// src/schema/types.rs

/// A single column of the people tables: its name and MySQL type.
#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static str,
}

impl Column {
    const fn new(name: &'static str, sql_type: &'static str) -> Self {
        Self { name, sql_type }
    }

    pub fn is_primary_key(&self) -> bool {
        self.name == INDEX
    }
}

pub const INDEX: &str = "Index";
pub const USER_ID: &str = "User Id";
pub const FIRST_NAME: &str = "First Name";
pub const LAST_NAME: &str = "Last Name";
pub const SEX: &str = "Sex";
pub const EMAIL: &str = "Email";
pub const PHONE: &str = "Phone";
pub const DATE_OF_BIRTH: &str = "Date of birth";
pub const JOB_TITLE: &str = "Job Title";
pub const FULL_NAME: &str = "Full Name";

/// Columns of the raw table, in insert order.
pub const RAW_COLUMNS: [Column; 9] = [
    Column::new(INDEX, "INT"),
    Column::new(USER_ID, "INT"),
    Column::new(FIRST_NAME, "VARCHAR(50)"),
    Column::new(LAST_NAME, "VARCHAR(50)"),
    Column::new(SEX, "VARCHAR(10)"),
    Column::new(EMAIL, "VARCHAR(100)"),
    Column::new(PHONE, "VARCHAR(20)"),
    Column::new(DATE_OF_BIRTH, "DATE"),
    Column::new(JOB_TITLE, "VARCHAR(100)"),
];

/// Raw columns followed by the derived full name.
pub const TRANSFORMED_COLUMNS: [Column; 10] = [
    RAW_COLUMNS[0],
    RAW_COLUMNS[1],
    RAW_COLUMNS[2],
    RAW_COLUMNS[3],
    RAW_COLUMNS[4],
    RAW_COLUMNS[5],
    RAW_COLUMNS[6],
    RAW_COLUMNS[7],
    RAW_COLUMNS[8],
    Column::new(FULL_NAME, "VARCHAR(150)"),
];

/// Which of the two table layouts a table uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Raw,
    Transformed,
}

impl TableKind {
    pub fn columns(self) -> &'static [Column] {
        match self {
            TableKind::Raw => &RAW_COLUMNS,
            TableKind::Transformed => &TRANSFORMED_COLUMNS,
        }
    }
}
