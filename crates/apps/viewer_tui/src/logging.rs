use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Install the global subscriber.
///
/// The viewer owns the terminal, so interactive runs only log when a log file
/// is configured. Headless runs fall back to stderr.
pub fn init_logging(log_file: Option<&Path>, headless: bool) -> Result<(), CliError> {
    if let Some(path) = log_file {
        let file = File::options()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| CliError::LoggingInit(format!("{}: {e}", path.display())))?;
        return tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .try_init()
            .map_err(|e| CliError::LoggingInit(e.to_string()));
    }
    if headless {
        return tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| CliError::LoggingInit(e.to_string()));
    }
    Ok(())
}
