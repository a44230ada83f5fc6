// tests for the log table on a real server (postgres or mysql)
// run with: cargo test --features test-db
// requires DATABASE_URL env var

#![cfg(feature = "test-db")]

use bluum::{Category, ClassificationResult, LogDb, LogRecord, LogTags};
use uuid::Uuid;

fn get_db_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for db tests")
}

#[tokio::test]
async fn test_connect_creates_table() {
    let db = LogDb::connect(&get_db_url()).await;
    assert!(db.is_ok());

    // second connect must not trip over the existing table
    assert!(LogDb::connect(&get_db_url()).await.is_ok());
}

#[tokio::test]
async fn test_insert_and_read_back() {
    let db = LogDb::connect(&get_db_url()).await.unwrap();
    let session = Uuid::new_v4();

    let record = LogRecord::new(
        "What made you smile today?",
        "the first snow of the year",
        &ClassificationResult::new(Category::Positive, "Snow days are magic!"),
    );
    db.insert(&record, &LogTags::new(session, "test"))
        .await
        .unwrap();

    let rows = db.recent(50).await.unwrap();
    let row = rows
        .iter()
        .find(|r| r.session_id == session.to_string())
        .expect("inserted row should be among the most recent");

    assert_eq!(row.record.entry, "the first snow of the year");
    assert_eq!(row.record.category, Category::Positive);
    assert!(!row.record.safety_flagged);
}
