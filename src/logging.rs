// tracing setup
// level comes from BLUUM_LOG (default: info)

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt};

const ENV_VAR: &str = "BLUUM_LOG";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to stderr. Used by the server and one-shot commands.
pub fn init_stderr() {
    fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Log to a file so the tui's alternate screen stays clean.
pub fn init_file(path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .init();

    Ok(())
}
