//! End-to-end run against a real MySQL server.
//!
//! Needs `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD` and `DB_NAME` in the
//! environment; run with `cargo test -- --ignored`.

use object_store::{memory::InMemory, path::Path as ObjectPath, ObjectStore};
use rdsetl::{config::EtlConfig, db, pipeline::Pipeline};
use sqlx::{Connection, Row};
use std::{env, io::Write, sync::Arc};

const CSV: &str = "Index,User Id,First Name,Last Name,Sex,Email,Phone,Date of birth,Job Title\n\
                   1,100,Ann,Lee,F,ann@x.com,555-1234,1990-01-01,Engineer\n\
                   2,101,Bob,Ray,M,,555-0000,1980-02-02,Chef\n\
                   3,102,Cy,Dee,M,cy@x.com,555-1111,not-a-date,Pilot\n";

fn config(file_name: &str) -> EtlConfig {
    EtlConfig::from_lookup(|key| match key {
        "bucket_name" => Some("etl-output".into()),
        "aws_access_key" | "aws_secret_key" => Some("unused".into()),
        "file_name" => Some(file_name.into()),
        other => env::var(other).ok(),
    })
    .expect("DB_* variables must be set for this test")
}

#[tokio::test]
#[ignore] // needs a MySQL server
async fn test_pipeline_against_mysql() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("rdsetl_people.csv");
    std::fs::File::create(&path)?.write_all(CSV.as_bytes())?;

    let cfg = config(&path.display().to_string());
    let store = Arc::new(InMemory::new());
    let pipeline = Pipeline::new(cfg.clone(), store.clone());

    let first = pipeline.run().await?;
    assert_eq!(first.rows_loaded, Some(3));
    assert_eq!(first.rows_read, 3);
    assert_eq!(first.rows_stored, Some(2));

    // running again replaces both tables
    let second = pipeline.run().await?;
    assert_eq!(first, second);

    let mut conn = db::connect(&cfg.db).await?;
    let raw: i64 = sqlx::query("SELECT COUNT(*) FROM `rdsetl_people`")
        .fetch_one(&mut conn)
        .await?
        .try_get(0)?;
    assert_eq!(raw, 3);

    let rows = sqlx::query(
        "SELECT `Index`, `Full Name`, `Date of birth` FROM `rdsetl_people_transformed` ORDER BY `Index`",
    )
    .fetch_all(&mut conn)
    .await?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].try_get::<String, _>(1)?, "Ann Lee");
    assert_eq!(
        rows[0].try_get::<Option<chrono::NaiveDate>, _>(2)?,
        chrono::NaiveDate::from_ymd_opt(1990, 1, 1)
    );
    assert_eq!(rows[1].try_get::<Option<chrono::NaiveDate>, _>(2)?, None);

    let body = store
        .get(&ObjectPath::from("rdsetl_people_transformed.csv"))
        .await?
        .bytes()
        .await?;
    assert!(String::from_utf8(body.to_vec())?.contains("Cy Dee"));

    sqlx::query("DROP TABLE IF EXISTS `rdsetl_people`, `rdsetl_people_transformed`")
        .execute(&mut conn)
        .await?;
    conn.close().await?;
    Ok(())
}
