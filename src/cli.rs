// command line interface

use crate::core::ai;
use crate::core::safety;
use crate::output::Output;
use crate::{Config, Server};
use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "bluum", about = "Daily reflection journal", version)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct Settings {
    /// openrouter api key
    #[arg(long, short = 'k', env = "OPENROUTER_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// model name
    #[arg(long, env = "BLUUM_MODEL", default_value = ai::DEFAULT_MODEL, global = true)]
    model: String,

    /// chat-completions endpoint
    #[arg(long, env = "BLUUM_API_URL", default_value = ai::DEFAULT_API_URL, global = true)]
    base_url: String,

    /// request timeout in seconds
    #[arg(long, env = "BLUUM_TIMEOUT", default_value = "45", global = true)]
    timeout: u64,

    /// directory with prompts.json and the prompt templates
    #[arg(long, env = "BLUUM_PROMPTS_DIR", global = true)]
    prompts_dir: Option<PathBuf>,

    /// csv file the entries are logged to
    #[arg(long, env = "BLUUM_LOG_CSV", default_value = "journal_log.csv", global = true)]
    log_csv: PathBuf,

    /// database url for the log table
    #[arg(long, env = "BLUUM_LOG_DATABASE_URL", global = true)]
    log_db: Option<String>,

    /// similarity (0-100) needed for a safety phrase match
    #[arg(long, env = "BLUUM_FUZZY_THRESHOLD", default_value_t = safety::DEFAULT_THRESHOLD, global = true)]
    fuzzy_threshold: f64,

    /// classify with keyword and sentiment rules only
    #[arg(long, global = true)]
    heuristic: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// start as http server
    Serve {
        /// port number
        #[arg(long, short, default_value = "3000")]
        port: u16,

        /// host to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// classify one entry and print the response
    Check {
        /// the journal entry
        entry: String,

        /// mood to take the prompt from
        #[arg(long, short)]
        mood: Option<String>,

        /// print json instead of text
        #[arg(long)]
        json: bool,
    },

    /// show logged entries
    Log {
        /// how many rows
        #[arg(long, short, default_value = "20")]
        limit: u32,
    },
}

impl From<Settings> for Config {
    fn from(s: Settings) -> Self {
        Config {
            api_key: s.api_key,
            model: s.model,
            api_url: s.base_url,
            timeout: Duration::from_secs(s.timeout),
            prompts_dir: s.prompts_dir,
            log_csv: Some(s.log_csv),
            log_db: s.log_db,
            fuzzy_threshold: s.fuzzy_threshold,
            heuristic_only: s.heuristic,
        }
    }
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from(cli.settings);

    match cli.command {
        Some(Commands::Serve { port, host }) => {
            crate::logging::init_stderr();
            Ok(Server::run(&config, &host, port).await?)
        }

        Some(Commands::Check { entry, mood, json }) => {
            crate::logging::init_stderr();
            let journal = config.build_journal().await?;
            let mut session = journal
                .start(mood.as_deref())
                .ok_or_else(|| miette::miette!("unknown mood: {}", mood.unwrap_or_default()))?;

            let outcome = journal.submit(&mut session, &entry).await;
            if json {
                Output::raw(&outcome);
            } else {
                Output::pretty(&outcome);
            }
            Ok(())
        }

        Some(Commands::Log { limit }) => {
            crate::logging::init_stderr();
            let logbook = config.logbook().await?;

            if let Some(db) = logbook.db() {
                Output::rows(&db.recent(limit).await?);
            } else if let Some(csv) = logbook.csv() {
                let records = csv.read_all()?;
                let skip = records.len().saturating_sub(limit as usize);
                Output::records(&records[skip..]);
            }
            Ok(())
        }

        None => {
            // tui logs go to a file, the screen belongs to ratatui
            crate::logging::init_file(std::path::Path::new("bluum.log")).into_diagnostic()?;
            Ok(crate::tui::run(&config).await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_subcommand_parses() {
        let cli = Cli::try_parse_from([
            "bluum",
            "check",
            "a good day",
            "--mood",
            "calm",
            "--json",
            "--heuristic",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Check { entry, mood, json }) => {
                assert_eq!(entry, "a good day");
                assert_eq!(mood.as_deref(), Some("calm"));
                assert!(json);
            }
            _ => panic!("expected check"),
        }
        assert!(cli.settings.heuristic);
    }

    #[test]
    fn settings_become_config() {
        let cli = Cli::try_parse_from(["bluum", "--timeout", "10", "serve", "--port", "8080"]).unwrap();
        let config = Config::from(cli.settings);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.log_csv.is_some());
        assert!(matches!(cli.command, Some(Commands::Serve { port: 8080, .. })));
    }
}
