// tests for the csv log and the sqlite log table

use bluum::{Category, ClassificationResult, CsvLog, LogDb, LogRecord, LogTags, Logbook};
use tempfile::TempDir;
use uuid::Uuid;

fn record(entry: &str, category: Category, text: &str) -> LogRecord {
    LogRecord::new(
        "What made you smile today?",
        entry,
        &ClassificationResult::new(category, text),
    )
}

#[test]
fn test_csv_round_trip() {
    let dir = TempDir::new().unwrap();
    let log = CsvLog::new(dir.path().join("journal_log.csv"));

    let first = record("my cat sat on my keyboard", Category::Positive, "Ha, cats!");
    let second = record("I want to kill myself", Category::Safety, "Please reach out.");
    log.append(&first).unwrap();
    log.append(&second).unwrap();

    let records = log.read_all().unwrap();
    assert_eq!(records, vec![first, second]);
    assert!(records[1].safety_flagged);
    assert!(!records[0].safety_flagged);
}

#[test]
fn test_csv_header_written_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("journal_log.csv");
    let log = CsvLog::new(&path);

    log.append(&record("one", Category::Quiet, "More?")).unwrap();
    log.append(&record("two", Category::Quiet, "More?")).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("timestamp,prompt,entry,category,response_text,safety_flagged")
    );
    assert_eq!(text.matches("timestamp,").count(), 1);
    assert_eq!(lines.count(), 2);
}

#[test]
fn test_csv_quotes_awkward_fields() {
    let dir = TempDir::new().unwrap();
    let log = CsvLog::new(dir.path().join("journal_log.csv"));

    let awkward = record(
        "lunch, then a \"quick\" nap\nand an early night",
        Category::Positive,
        "Rest matters, enjoy it!",
    );
    log.append(&awkward).unwrap();

    assert_eq!(log.read_all().unwrap(), vec![awkward]);
}

#[test]
fn test_csv_missing_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let log = CsvLog::new(dir.path().join("nothing.csv"));
    assert!(log.read_all().unwrap().is_empty());
}

#[tokio::test]
async fn test_logbook_swallows_write_failures() {
    let dir = TempDir::new().unwrap();
    let log = CsvLog::new(dir.path().join("missing").join("journal_log.csv"));
    let logbook = Logbook::new(Some(log), None);

    // must not panic or error
    logbook
        .record(
            &record("a quiet evening in", Category::Quiet, "Sounds cosy."),
            &LogTags::new(Uuid::new_v4(), "abc123"),
        )
        .await;

    let csv = logbook.csv().unwrap();
    assert!(!csv.path().exists());
}

#[tokio::test]
async fn test_sqlite_round_trip() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("log.db").display());
    let db = LogDb::connect(&url).await.unwrap();
    assert_eq!(db.dialect_name(), "sqlite");

    let session = Uuid::new_v4();
    let tags = LogTags::new(session, "deadbeef");

    let older = record("quiet day at home", Category::Quiet, "What did you do?");
    let mut newer = record("I can't go on", Category::Safety, "Please reach out.");
    newer.timestamp = older.timestamp + chrono::Duration::seconds(5);

    db.insert(&older, &tags).await.unwrap();
    db.insert(&newer, &tags).await.unwrap();

    let rows = db.recent(10).await.unwrap();
    assert_eq!(rows.len(), 2);

    // newest first
    assert_eq!(rows[0].record, newer);
    assert_eq!(rows[1].record, older);
    assert!(rows[0].record.safety_flagged);
    assert_eq!(rows[0].session_id, session.to_string());
    assert_eq!(rows[0].prompt_version, "deadbeef");
    assert_eq!(rows[0].app_version, env!("CARGO_PKG_VERSION"));

    assert_eq!(db.recent(1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_logbook_writes_to_both_stores() {
    let dir = TempDir::new().unwrap();
    let csv = CsvLog::new(dir.path().join("journal_log.csv"));
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("log.db").display());
    let db = LogDb::connect(&url).await.unwrap();
    let logbook = Logbook::new(Some(csv), Some(db));

    let entry = record("finished my first 5k run", Category::Positive, "Amazing!");
    logbook
        .record(&entry, &LogTags::new(Uuid::new_v4(), "v1"))
        .await;

    assert_eq!(logbook.csv().unwrap().read_all().unwrap(), vec![entry.clone()]);
    let rows = logbook.db().unwrap().recent(5).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].record, entry);
}
