// src/pipeline.rs

use crate::config::EtlConfig;
use crate::db::{self, Database, RdsProcessor};
use crate::error::{EtlError, Result};
use crate::process::{
    transform,
    utils::{table_name_from_path, transformed_object_key, transformed_table_name},
};
use crate::schema::TableKind;
use crate::upload::upload_csv;
use object_store::ObjectStore;
use std::{fmt::Display, path::Path, sync::Arc, time::Instant};
use tracing::{error, info, warn};

/// What happened in one run.
///
/// `None` / `false` marks a write step that failed and was skipped over.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub table: String,
    pub transformed_table: String,
    pub object_key: String,
    pub raw_table_created: bool,
    pub rows_loaded: Option<usize>,
    pub rows_read: usize,
    pub rows_transformed: usize,
    pub transformed_table_created: bool,
    pub rows_stored: Option<usize>,
    pub bytes_uploaded: Option<usize>,
}

impl RunSummary {
    /// Names of the non-fatal steps that failed.
    pub fn failed_steps(&self) -> Vec<&'static str> {
        let mut failed = Vec::new();
        if !self.raw_table_created {
            failed.push("create raw table");
        }
        if self.rows_loaded.is_none() {
            failed.push("load raw data");
        }
        if !self.transformed_table_created {
            failed.push("create transformed table");
        }
        if self.rows_stored.is_none() {
            failed.push("store transformed data");
        }
        if self.bytes_uploaded.is_none() {
            failed.push("upload");
        }
        failed
    }
}

/// Log a failed write step and carry on without its result.
fn non_fatal<T>(result: Result<T>, context: impl Display) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            error!("{}: {}", context, e);
            None
        }
    }
}

/// One-line console message for a finished run. Details stay in the log.
pub fn status_line(result: &Result<RunSummary>) -> &'static str {
    match result {
        Ok(_) => "Data processing pipeline completed successfully.",
        Err(EtlError::Config(_)) => "Configuration error. Check the log file for details.",
        Err(EtlError::Connect(_)) => {
            "Database connection unsuccessful. Check your RDS configuration."
        }
        Err(_) => "An error occurred. Check the log file for details.",
    }
}

/// The create → load → re-read → transform → store → upload sequence.
pub struct Pipeline {
    config: EtlConfig,
    store: Arc<dyn ObjectStore>,
}

impl Pipeline {
    pub fn new(config: EtlConfig, store: Arc<dyn ObjectStore>) -> Self {
        Self { config, store }
    }

    /// Connect to the configured database and run every step.
    pub async fn run(&self) -> Result<RunSummary> {
        let conn = match db::connect(&self.config.db).await {
            Ok(conn) => conn,
            Err(e) => {
                error!("Failed to connect to RDS.");
                return Err(e);
            }
        };
        self.run_with(RdsProcessor::new(conn)).await
    }

    /// Run every step against `db`, closing it afterwards whatever happened.
    pub async fn run_with<D: Database>(&self, mut db: D) -> Result<RunSummary> {
        let start = Instant::now();
        let result = self.run_steps(&mut db).await;

        if let Err(e) = db.close().await {
            warn!("Error closing database connection: {}", e);
        }

        let summary = result?;
        let failed = summary.failed_steps();
        if !failed.is_empty() {
            warn!(?failed, "steps failed during the run");
        }
        info!(
            elapsed = ?start.elapsed(),
            rows_read = summary.rows_read,
            rows_transformed = summary.rows_transformed,
            "Data processing pipeline completed successfully."
        );
        Ok(summary)
    }

    async fn run_steps<D: Database>(&self, db: &mut D) -> Result<RunSummary> {
        let file = Path::new(&self.config.file_name);
        let table = table_name_from_path(file)?;
        let transformed = transformed_table_name(&table);
        let key = transformed_object_key(&table);

        // 1) raw table
        let raw_table_created = non_fatal(
            db.create_table(&table, TableKind::Raw).await,
            "Error during table creation",
        )
        .is_some();
        let rows_loaded = non_fatal(
            db.load_data(file, &table).await,
            format!("Error loading data into `{}`", table),
        );

        // 2) round trip through the database
        let raw = db.read_table(&table).await?;

        // 3) transform
        let out = transform(&raw)?;

        // 4) transformed table
        let transformed_table_created = non_fatal(
            db.create_table(&transformed, TableKind::Transformed).await,
            "Error during table creation",
        )
        .is_some();
        let rows_stored = non_fatal(
            db.store_transformed(&transformed, &out).await,
            "Error storing data in RDS",
        );

        // 5) object storage
        let bytes_uploaded = non_fatal(
            upload_csv(self.store.as_ref(), &self.config.s3.bucket, &key, &out).await,
            "Failed to upload data to S3",
        );

        Ok(RunSummary {
            table,
            transformed_table: transformed,
            object_key: key,
            raw_table_created,
            rows_loaded,
            rows_read: raw.num_rows(),
            rows_transformed: out.num_rows(),
            transformed_table_created,
            rows_stored,
            bytes_uploaded,
        })
    }
}
