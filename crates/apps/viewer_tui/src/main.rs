use std::path::Path;

use clap::Parser;
use streaming::FileSource;
use tracing::info;
use viewer_tui::config::{Args, ViewerConfig};
use viewer_tui::driver;
use viewer_tui::error::CliError;
use viewer_tui::headless::render_once;
use viewer_tui::logging::init_logging;

fn main() {
    let config = ViewerConfig::from_env(Args::parse());
    let result = driver::run_detached(run(config)).unwrap_or_else(|e| Err(e.into()));
    if let Err(e) = result {
        e.exit();
    }
}

async fn run(config: ViewerConfig) -> Result<(), CliError> {
    init_logging(config.log_file.as_deref(), config.print)?;
    info!(path = ?config.path, print = config.print, "asciimap starting");

    if config.print {
        let Some(path) = config.path.as_deref() else {
            return Err(CliError::Usage("--print requires a PATH".to_string()));
        };
        let (width, height) = config.print_size()?;
        let text = render_once(FileSource, Path::new(path), width, height)?;
        println!("{text}");
        return Ok(());
    }

    driver::run(&config).await
}
