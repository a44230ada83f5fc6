// append-only record of every classification
// csv file and/or sql table; a failed write never reaches the user

use crate::Error;
use crate::core::classifier::Category;
use crate::core::db::LogDb;
use crate::core::response::ClassificationResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub prompt: String,
    pub entry: String,
    pub category: Category,
    pub response_text: String,
    pub safety_flagged: bool,
}

impl LogRecord {
    pub fn new(prompt: &str, entry: &str, result: &ClassificationResult) -> Self {
        Self {
            timestamp: Utc::now(),
            prompt: prompt.to_string(),
            entry: entry.to_string(),
            category: result.category,
            response_text: result.response_text.clone(),
            safety_flagged: result.category == Category::Safety,
        }
    }
}

// extra columns for the sql table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTags {
    pub session_id: Uuid,
    pub app_version: String,
    pub prompt_version: String,
}

impl LogTags {
    pub fn new(session_id: Uuid, prompt_version: &str) -> Self {
        Self {
            session_id,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            prompt_version: prompt_version.to_string(),
        }
    }
}

pub struct CsvLog {
    path: PathBuf,
}

impl CsvLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // header goes in once, when the file is new or empty
    pub fn append(&self, record: &LogRecord) -> Result<(), Error> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_all(&self) -> Result<Vec<LogRecord>, Error> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }
        Ok(records)
    }
}

#[derive(Default)]
pub struct Logbook {
    csv: Option<CsvLog>,
    db: Option<LogDb>,
}

impl Logbook {
    pub fn new(csv: Option<CsvLog>, db: Option<LogDb>) -> Self {
        Self { csv, db }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn csv(&self) -> Option<&CsvLog> {
        self.csv.as_ref()
    }

    pub fn db(&self) -> Option<&LogDb> {
        self.db.as_ref()
    }

    /// Write to every configured store. Failures are logged and swallowed.
    pub async fn record(&self, record: &LogRecord, tags: &LogTags) {
        if let Some(csv) = &self.csv {
            match csv.append(record) {
                Ok(()) => debug!(path = %csv.path().display(), "logged to csv"),
                Err(e) => warn!(error = %e, path = %csv.path().display(), "csv log write failed"),
            }
        }

        if let Some(db) = &self.db {
            match db.insert(record, tags).await {
                Ok(()) => debug!("logged to database"),
                Err(e) => warn!(error = %e, "database log write failed"),
            }
        }
    }
}
