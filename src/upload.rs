// src/upload.rs

use crate::config::S3Config;
use crate::error::{EtlError, Result};
use arrow::{csv::WriterBuilder, record_batch::RecordBatch};
use bytes::Bytes;
use object_store::{aws::AmazonS3Builder, path::Path as ObjectPath, ObjectStore, PutPayload};
use std::sync::Arc;
use tracing::info;

/// Build an S3 client for the configured bucket with static credentials.
pub fn build_s3_store(cfg: &S3Config) -> Result<Arc<dyn ObjectStore>> {
    let mut builder = AmazonS3Builder::new()
        .with_bucket_name(&cfg.bucket)
        .with_region(&cfg.region)
        .with_access_key_id(&cfg.access_key)
        .with_secret_access_key(&cfg.secret_key);

    if let Some(endpoint) = &cfg.endpoint {
        builder = builder
            .with_endpoint(endpoint)
            .with_allow_http(endpoint.starts_with("http://"));
    }

    let store = builder
        .build()
        .map_err(|e| EtlError::Config(format!("failed to build S3 client: {}", e)))?;
    Ok(Arc::new(store))
}

/// Serialize a batch as CSV text: a header row, then one line per row.
///
/// Nulls are written as empty fields and dates as `YYYY-MM-DD`.
pub fn to_csv_bytes(batch: &RecordBatch) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().with_header(true).build(Vec::new());
    writer.write(batch)?;
    Ok(writer.into_inner())
}

/// Upload `batch` as a single CSV object under `key`.
#[tracing::instrument(level = "info", skip(store, batch), fields(rows = batch.num_rows()))]
pub async fn upload_csv(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    batch: &RecordBatch,
) -> Result<usize> {
    let body = to_csv_bytes(batch)?;
    let len = body.len();

    store
        .put(&ObjectPath::from(key), PutPayload::from(Bytes::from(body)))
        .await?;

    info!(bytes = len, "Data uploaded to S3 bucket '{}' as '{}'.", bucket, key);
    Ok(len)
}
