// runtime settings and wiring the journal together

use crate::Error;
use crate::core::ai::{self, ChatClient};
use crate::core::safety;
use crate::core::{Classifier, CsvLog, Journal, LogDb, Logbook, Prompts, ResponseGenerator};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub api_url: String,
    pub timeout: Duration,
    pub prompts_dir: Option<PathBuf>,
    pub log_csv: Option<PathBuf>,
    pub log_db: Option<String>,
    pub fuzzy_threshold: f64,
    // keyword/sentiment rules even when a model is available
    pub heuristic_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: ai::DEFAULT_MODEL.to_string(),
            api_url: ai::DEFAULT_API_URL.to_string(),
            timeout: ai::DEFAULT_TIMEOUT,
            prompts_dir: None,
            log_csv: Some(PathBuf::from("journal_log.csv")),
            log_db: None,
            fuzzy_threshold: safety::DEFAULT_THRESHOLD,
            heuristic_only: false,
        }
    }
}

impl Config {
    /// The model client, if a key is configured.
    pub fn chat_client(&self) -> Result<Option<ChatClient>, Error> {
        match self.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            Some(key) => Ok(Some(ChatClient::new(
                key.to_string(),
                &self.api_url,
                &self.model,
                self.timeout,
            )?)),
            None => Ok(None),
        }
    }

    pub async fn logbook(&self) -> Result<Logbook, Error> {
        let csv = self.log_csv.clone().map(CsvLog::new);
        let db = match &self.log_db {
            Some(url) => Some(LogDb::connect(url).await?),
            None => None,
        };
        Ok(Logbook::new(csv, db))
    }

    pub async fn build_journal(&self) -> Result<Journal, Error> {
        let prompts = Prompts::load(self.prompts_dir.as_deref())?;
        let client = self.chat_client()?;

        if client.is_none() {
            warn!("no api key configured; using heuristics and skipping model responses");
        }

        let remote_classifier = if self.heuristic_only {
            None
        } else {
            client.clone()
        };

        info!(
            model = %self.model,
            remote_classifier = remote_classifier.is_some(),
            threshold = self.fuzzy_threshold,
            "journal configured"
        );

        let classifier = Classifier::new(remote_classifier, prompts.classification.clone())
            .with_threshold(self.fuzzy_threshold);
        let responder = ResponseGenerator::new(client, &prompts);
        let logbook = self.logbook().await?;

        Ok(Journal::new(prompts, classifier, responder, logbook))
    }
}
