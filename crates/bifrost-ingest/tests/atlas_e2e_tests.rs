//! End-to-end tests for the GeoNames ingestion flow
//!
//! Each test serves a ZIP built in memory from a mock HTTP server, runs the
//! pipeline against a scratch database and reads the result back through
//! `bifrost-lookup`.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use bifrost_ingest::atlas::{AtlasConfig, AtlasPipeline};
use bifrost_ingest::Stage;
use bifrost_lookup::Atlas;
use rusqlite::Connection;
use tokio_util::sync::CancellationToken;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const ARCHIVE_PATH: &str = "/export/zip/allCountries.zip";

const KORAMANGALA: &str = "IN\t560095\tKoramangala VI Bk\tKarnataka\t19\tBengaluru\t583\tBangalore South\t\t13.1077\t77.581\t1";
const BEVERLY_HILLS: &str = "US\t90210\tBeverly Hills\tCalifornia\tCA\tLos Angeles\t037\t\t\t34.0901\t-118.4065\t4";

/// Helper to build a ZIP archive in memory
fn zip_archive(members: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in members {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Helper to serve `archive` at the GeoNames path
async fn serve_archive(server: &MockServer, archive: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(ARCHIVE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/zip")
                .set_body_bytes(archive),
        )
        .mount(server)
        .await;
}

fn config(server: &MockServer, database_path: &Path) -> AtlasConfig {
    AtlasConfig::builder()
        .archive_url(format!("{}{}", server.uri(), ARCHIVE_PATH))
        .database_path(database_path)
        .build()
}

fn database_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("atlas").join("data").join("atlas.db")
}

fn row_count(database_path: &Path) -> i64 {
    Connection::open(database_path)
        .unwrap()
        .query_row("SELECT COUNT(*) FROM geo_location", [], |row| row.get(0))
        .unwrap()
}

// ============================================================================
// Happy Path
// ============================================================================

#[tokio::test]
async fn test_geo_happy_path() {
    let server = MockServer::start().await;
    serve_archive(&server, zip_archive(&[("allCountries.txt", format!("{}\n", KORAMANGALA).as_str())])).await;

    let dir = tempfile::tempdir().unwrap();
    let db = database_path(&dir);

    let summary = AtlasPipeline::new(config(&server, &db))
        .run(&CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.rows, 1);
    assert!(summary.archive_bytes > 0);

    let geo = Atlas::open(&db).unwrap().geo_location_by_postal_code("560095").unwrap();
    assert_eq!(geo.country_code, "IN");
    assert_eq!(geo.place_name, "Koramangala VI Bk");
    assert_eq!(geo.latitude, 13.1077);
    assert_eq!(geo.longitude, 77.581);
    assert_eq!(geo.accuracy, 1);
    assert_eq!(geo.admin_code3, "");
}

#[tokio::test]
async fn test_geo_blank_accuracy_is_zero() {
    let line = KORAMANGALA.strip_suffix("\t1").unwrap().to_string() + "\t ";

    let server = MockServer::start().await;
    serve_archive(&server, zip_archive(&[("allCountries.txt", format!("{}\n", line).as_str())])).await;

    let dir = tempfile::tempdir().unwrap();
    let db = database_path(&dir);

    AtlasPipeline::new(config(&server, &db))
        .run(&CancellationToken::new())
        .await
        .unwrap();

    let geo = Atlas::open(&db).unwrap().geo_location_by_postal_code("560095").unwrap();
    assert_eq!(geo.accuracy, 0);
}

#[tokio::test]
async fn test_geo_ignores_other_members_and_stray_quotes() {
    let quoted = BEVERLY_HILLS.replace("Beverly Hills", "Beverly \"Hills\"");
    let contents = format!("{}\n{}\n", KORAMANGALA, quoted);

    let server = MockServer::start().await;
    serve_archive(
        &server,
        zip_archive(&[("readme.txt", "GeoNames postal codes"), ("allCountries.txt", contents.as_str())]),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let db = database_path(&dir);

    let summary = AtlasPipeline::new(config(&server, &db))
        .run(&CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.rows, 2);

    let geo = Atlas::open(&db).unwrap().geo_location_by_postal_code("90210").unwrap();
    assert_eq!(geo.place_name, "Beverly \"Hills\"");
    assert_eq!(geo.longitude, -118.4065);
}

// ============================================================================
// Idempotence
// ============================================================================

#[tokio::test]
async fn test_geo_rerun_does_not_duplicate_rows() {
    let server = MockServer::start().await;
    serve_archive(
        &server,
        zip_archive(&[("allCountries.txt", format!("{}\n{}\n", KORAMANGALA, BEVERLY_HILLS).as_str())]),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let db = database_path(&dir);
    let pipeline = AtlasPipeline::new(config(&server, &db));

    pipeline.run(&CancellationToken::new()).await.unwrap();
    pipeline.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(row_count(&db), 2);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_geo_missing_member_touches_nothing() {
    let server = MockServer::start().await;
    serve_archive(&server, zip_archive(&[("IN.txt", KORAMANGALA)])).await;

    let dir = tempfile::tempdir().unwrap();
    let db = database_path(&dir);

    let err = AtlasPipeline::new(config(&server, &db))
        .run(&CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.cause(), "member_not_found");
    assert_eq!(err.stage(), Stage::Decode);
    assert!(!db.exists());
}

#[tokio::test]
async fn test_geo_parse_error_keeps_previous_data() {
    let dir = tempfile::tempdir().unwrap();
    let db = database_path(&dir);

    let good = MockServer::start().await;
    serve_archive(&good, zip_archive(&[("allCountries.txt", KORAMANGALA)])).await;
    AtlasPipeline::new(config(&good, &db))
        .run(&CancellationToken::new())
        .await
        .unwrap();

    let bad_line = BEVERLY_HILLS.replace("34.0901", "north");
    let bad = MockServer::start().await;
    serve_archive(
        &bad,
        zip_archive(&[("allCountries.txt", format!("{}\n{}\n", BEVERLY_HILLS, bad_line).as_str())]),
    )
    .await;

    let err = AtlasPipeline::new(config(&bad, &db))
        .run(&CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.cause(), "parse_error");
    assert_eq!(err.stage(), Stage::Normalize);
    assert!(err.to_string().starts_with("Line 2: invalid latitude"));

    let atlas = Atlas::open(&db).unwrap();
    assert!(atlas.geo_location_by_postal_code("560095").is_ok());
    assert!(atlas.geo_location_by_postal_code("90210").unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_geo_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db = database_path(&dir);

    let err = AtlasPipeline::new(config(&server, &db))
        .run(&CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.cause(), "http_status_error");
    assert_eq!(err.stage(), Stage::Acquire);
    assert!(!db.exists());
}

#[tokio::test]
async fn test_geo_canceled_before_start() {
    let server = MockServer::start().await;
    serve_archive(&server, zip_archive(&[("allCountries.txt", KORAMANGALA)])).await;

    let dir = tempfile::tempdir().unwrap();
    let db = database_path(&dir);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = AtlasPipeline::new(config(&server, &db)).run(&cancel).await.unwrap_err();
    assert!(err.is_canceled());
    assert!(!db.exists());
}
