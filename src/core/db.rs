// sql log table
// supports postgres, sqlite, and mysql through the any driver

use crate::Error;
use crate::core::classifier::Category;
use crate::core::logbook::{LogRecord, LogTags};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{AnyPool, any::AnyPoolOptions};
use tracing::info;

const CREATE_TABLE: &str = r#"CREATE TABLE IF NOT EXISTS journal_log (
    logged_at TEXT NOT NULL,
    session_id TEXT NOT NULL,
    app_version TEXT NOT NULL,
    prompt_version TEXT NOT NULL,
    prompt TEXT NOT NULL,
    entry TEXT NOT NULL,
    category TEXT NOT NULL,
    response_text TEXT NOT NULL,
    safety_flagged BIGINT NOT NULL
)"#;

const COLUMNS: &str = "logged_at, session_id, app_version, prompt_version, prompt, entry, \
                       category, response_text, safety_flagged";

pub struct LogDb {
    pool: AnyPool,
    dialect: Dialect,
}

// a row as stored, tags included
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggedRow {
    #[serde(flatten)]
    pub record: LogRecord,
    pub session_id: String,
    pub app_version: String,
    pub prompt_version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Postgres,
    Sqlite,
    Mysql,
}

type RawRow = (String, String, String, String, String, String, String, String, i64);

impl LogDb {
    pub async fn connect(url: &str) -> Result<Self, Error> {
        sqlx::any::install_default_drivers();

        // figure out which database we're talking to
        let dialect = detect_dialect(url);

        let pool = AnyPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;

        sqlx::query(CREATE_TABLE).execute(&pool).await?;

        let db = Self { pool, dialect };
        info!(dialect = db.dialect_name(), "log table ready");
        Ok(db)
    }

    pub fn dialect_name(&self) -> &'static str {
        match self.dialect {
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite",
            Dialect::Mysql => "mysql",
        }
    }

    pub async fn insert(&self, record: &LogRecord, tags: &LogTags) -> Result<(), Error> {
        let sql = format!(
            "INSERT INTO journal_log ({COLUMNS}) VALUES ({})",
            placeholders(self.dialect, 9)
        );

        sqlx::query(&sql)
            .bind(record.timestamp.to_rfc3339())
            .bind(tags.session_id.to_string())
            .bind(tags.app_version.clone())
            .bind(tags.prompt_version.clone())
            .bind(record.prompt.clone())
            .bind(record.entry.clone())
            .bind(record.category.as_str())
            .bind(record.response_text.clone())
            .bind(i64::from(record.safety_flagged))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // newest first
    pub async fn recent(&self, limit: u32) -> Result<Vec<LoggedRow>, Error> {
        let sql = format!("SELECT {COLUMNS} FROM journal_log ORDER BY logged_at DESC LIMIT {limit}");
        let rows: Vec<RawRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        rows.into_iter().map(into_logged_row).collect()
    }
}

fn into_logged_row(row: RawRow) -> Result<LoggedRow, Error> {
    let (logged_at, session_id, app_version, prompt_version, prompt, entry, category, response_text, flagged) =
        row;

    let timestamp = DateTime::parse_from_rfc3339(&logged_at)
        .map_err(|e| Error::LogStore(format!("bad timestamp '{logged_at}': {e}")))?
        .with_timezone(&Utc);

    Ok(LoggedRow {
        record: LogRecord {
            timestamp,
            prompt,
            entry,
            category: Category::parse(&category),
            response_text,
            safety_flagged: flagged != 0,
        },
        session_id,
        app_version,
        prompt_version,
    })
}

// figure out dialect from connection string
fn detect_dialect(url: &str) -> Dialect {
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Dialect::Postgres
    } else if url.starts_with("mysql://") || url.starts_with("mariadb://") {
        Dialect::Mysql
    } else {
        Dialect::Sqlite
    }
}

fn placeholders(dialect: Dialect, count: usize) -> String {
    (1..=count)
        .map(|i| match dialect {
            Dialect::Postgres => format!("${i}"),
            Dialect::Sqlite | Dialect::Mysql => "?".to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
