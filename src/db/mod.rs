// src/db/mod.rs

use crate::config::DbConfig;
use crate::error::{EtlError, Result};
use crate::process;
use crate::schema::{
    ddl::{create_table_sql, drop_table_sql, insert_sql, select_all_sql},
    types::Column,
    TableKind,
};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use sqlx::{
    mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow},
    Connection, Row,
};
use std::{path::Path, time::Instant};
use tracing::{debug, error, info};

pub mod cell;

use cell::{batch_from_rows, row_values, table_columns, CellValue};

/// Table operations the pipeline driver needs from a database.
#[async_trait]
pub trait Database: Send {
    /// Drop and recreate `table` with the layout of `kind`.
    async fn create_table(&mut self, table: &str, kind: TableKind) -> Result<()>;

    /// Load the CSV at `path` into the raw table `table`; returns rows inserted.
    async fn load_data(&mut self, path: &Path, table: &str) -> Result<usize>;

    /// Read the raw table `table` back in full.
    async fn read_table(&mut self, table: &str) -> Result<RecordBatch>;

    /// Insert transformed rows into `table`; returns rows inserted.
    async fn store_transformed(&mut self, table: &str, batch: &RecordBatch) -> Result<usize>;

    /// Release the connection.
    async fn close(self) -> Result<()>;
}

/// Open the single connection used for the whole run.
///
/// Logs exactly one line: success, or the driver error that prevented it.
pub async fn connect(db: &DbConfig) -> Result<MySqlConnection> {
    let opts = MySqlConnectOptions::new()
        .host(&db.host)
        .port(db.port)
        .username(&db.user)
        .password(&db.password)
        .database(&db.database);

    match MySqlConnection::connect_with(&opts).await {
        Ok(conn) => {
            info!(host = %db.host, port = db.port, database = %db.database, "Successfully connected to RDS.");
            Ok(conn)
        }
        Err(e) => {
            error!("Error connecting to RDS: {}", e);
            Err(EtlError::Connect(e))
        }
    }
}

/// Owns the connection and performs every table operation of a run.
pub struct RdsProcessor {
    conn: MySqlConnection,
}

impl RdsProcessor {
    pub fn new(conn: MySqlConnection) -> Self {
        Self { conn }
    }

    /// Drop `table` if it exists and recreate it with the layout of `kind`.
    #[tracing::instrument(level = "info", skip(self))]
    pub async fn create_table(&mut self, table: &str, kind: TableKind) -> Result<()> {
        sqlx::query(&drop_table_sql(table))
            .execute(&mut self.conn)
            .await?;
        sqlx::query(&create_table_sql(table, kind))
            .execute(&mut self.conn)
            .await?;
        info!("Table creation: successful");
        Ok(())
    }

    /// Read the CSV at `path` and insert every row into the raw table
    /// `table`, in file order, committing once at the end.
    #[tracing::instrument(level = "info", skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn load_data<P: AsRef<Path>>(&mut self, path: P, table: &str) -> Result<usize> {
        let batch = process::read_csv(path)?;
        let inserted = self.insert_batch(table, TableKind::Raw, &batch).await?;
        info!(rows = inserted, "Data loaded into `{}` table successfully", table);
        Ok(inserted)
    }

    /// Insert an already-transformed batch into `table`.
    #[tracing::instrument(level = "info", skip(self, batch), fields(rows = batch.num_rows()))]
    pub async fn store_transformed(&mut self, table: &str, batch: &RecordBatch) -> Result<usize> {
        let inserted = self
            .insert_batch(table, TableKind::Transformed, batch)
            .await?;
        info!(rows = inserted, "Transformed data stored in RDS successfully.");
        Ok(inserted)
    }

    /// One parameterized insert per row inside a single transaction.
    ///
    /// If a row fails the transaction is dropped without commit, which the
    /// driver rolls back.
    async fn insert_batch(
        &mut self,
        table: &str,
        kind: TableKind,
        batch: &RecordBatch,
    ) -> Result<usize> {
        let columns = table_columns(batch, kind)?;
        let sql = insert_sql(table, kind);
        let start = Instant::now();

        let mut tx = self.conn.begin().await?;
        for row in 0..batch.num_rows() {
            let mut query = sqlx::query(&sql);
            for value in row_values(&columns, row)? {
                query = value.bind(query);
            }
            query.execute(&mut *tx).await?;
        }
        tx.commit().await?;

        debug!(table, rows = batch.num_rows(), elapsed = ?start.elapsed(), "committed");
        Ok(batch.num_rows())
    }

    /// Read the whole raw table back, ordered by primary key.
    #[tracing::instrument(level = "info", skip(self))]
    pub async fn read_table(&mut self, table: &str) -> Result<RecordBatch> {
        let kind = TableKind::Raw;
        let rows: Vec<MySqlRow> = sqlx::query(&select_all_sql(table, kind))
            .fetch_all(&mut self.conn)
            .await?;

        let cells = rows
            .iter()
            .map(|row| decode_row(row, kind.columns()))
            .collect::<Result<Vec<_>>>()?;
        let batch = batch_from_rows(kind, true, cells)?;
        info!(rows = batch.num_rows(), "read back `{}`", table);
        Ok(batch)
    }

    /// Close the connection; consumes the processor so it happens once.
    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        info!("Database connection closed.");
        Ok(())
    }
}

fn decode_row(row: &MySqlRow, cols: &[Column]) -> Result<Vec<CellValue>> {
    cols.iter()
        .enumerate()
        .map(|(i, c)| {
            let cell = match c.sql_type {
                "INT" => CellValue::Int(row.try_get::<Option<i64>, _>(i)?),
                _ => CellValue::Text(row.try_get::<Option<String>, _>(i)?),
            };
            Ok(cell)
        })
        .collect()
}

#[async_trait]
impl Database for RdsProcessor {
    async fn create_table(&mut self, table: &str, kind: TableKind) -> Result<()> {
        RdsProcessor::create_table(self, table, kind).await
    }

    async fn load_data(&mut self, path: &Path, table: &str) -> Result<usize> {
        RdsProcessor::load_data(self, path, table).await
    }

    async fn read_table(&mut self, table: &str) -> Result<RecordBatch> {
        RdsProcessor::read_table(self, table).await
    }

    async fn store_transformed(&mut self, table: &str, batch: &RecordBatch) -> Result<usize> {
        RdsProcessor::store_transformed(self, table, batch).await
    }

    async fn close(self) -> Result<()> {
        RdsProcessor::close(self).await
    }
}
