use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Model API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Model returned no choices")]
    EmptyReply,

    #[error("Missing API key. Set OPENROUTER_API_KEY or pass --api-key")]
    #[diagnostic(help("without a key, entries are classified with local heuristics"))]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Log store error: {0}")]
    LogStore(String),

    #[error("Prompt library error: {0}")]
    Prompts(String),

    #[error("Server error: {0}")]
    Server(String),
}
