// bluum library - daily reflection journal

pub mod cli;
pub mod config;
pub mod core;
mod error;
pub mod logging;
mod output;
mod server;
pub mod tui;

pub use config::Config;
pub use crate::core::{
    Category, ChatClient, ClassificationResult, Classifier, CsvLog, Journal, LogDb, LogRecord,
    LogTags, Logbook, Outcome, Prompts, Relevance, ResponseGenerator, Safety, Session,
    SessionStore, Turn,
};
pub use error::Error;
pub use server::Server;
