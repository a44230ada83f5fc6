// core logic - classification, conversation, responses and the log

pub mod ai;
pub mod classifier;
pub mod conversation;
pub mod db;
pub mod journal;
pub mod logbook;
pub mod prompts;
pub mod response;
pub mod safety;

pub use ai::{ChatClient, Message};
pub use classifier::{Category, Classifier, Sentiment, Vader};
pub use conversation::{Session, SessionStore, Turn};
pub use db::{LogDb, LoggedRow};
pub use journal::{Journal, Outcome};
pub use logbook::{CsvLog, LogRecord, LogTags, Logbook};
pub use prompts::Prompts;
pub use response::{ClassificationResult, Relevance, ResponseGenerator};
pub use safety::Safety;
