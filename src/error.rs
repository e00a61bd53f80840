use arrow::error::ArrowError;
use thiserror::Error;

/// Every failure the pipeline can surface.
///
/// Which of these abort a run and which are only logged is decided by the
/// driver in [`crate::pipeline`], not here.
#[derive(Debug, Error)]
pub enum EtlError {
    /// Missing or malformed configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// The database connection could not be opened.
    #[error("error connecting to database: {0}")]
    Connect(#[source] sqlx::Error),

    /// DDL or DML failure on an open connection.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("object storage error: {0}")]
    ObjectStore(#[from] object_store::Error),

    /// The input file does not have the shape the raw table expects.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The batch handed to the transformer is structurally unusable.
    #[error("transformation failed: {0}")]
    Transform(String),
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_cause() {
        let err = EtlError::InvalidInput("missing column `Email`".into());
        assert_eq!(err.to_string(), "invalid input: missing column `Email`");

        let err = EtlError::Config("DB_PORT: not a port number".into());
        assert!(err.to_string().starts_with("configuration error"));
    }

    #[test]
    fn test_io_error_converts() {
        fn open() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "people.csv"))?;
            Ok(())
        }
        assert!(matches!(open(), Err(EtlError::Io(_))));
    }
}
