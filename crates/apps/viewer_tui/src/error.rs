//! Start-up and headless failures, reported on stderr with exit status 1.

use std::fmt;
use std::process;

use runtime::LoadError;

#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Invalid combination of arguments
    Usage(String),
    /// Terminal setup, drawing or input failed
    Terminal(std::io::Error),
    /// Headless render could not load the document
    Render(LoadError),
}

impl CliError {
    pub fn exit(&self) -> ! {
        eprintln!("error: {self}");
        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "failed to initialize logging: {msg}"),
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Terminal(e) => write!(f, "terminal error: {e}"),
            CliError::Render(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Terminal(e) => Some(e),
            CliError::Render(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Terminal(e)
    }
}

impl From<LoadError> for CliError {
    fn from(e: LoadError) -> Self {
        CliError::Render(e)
    }
}
