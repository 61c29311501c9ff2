use std::env;
use std::path::PathBuf;

use clap::Parser;

use crate::error::CliError;

pub const ENV_WIDTH: &str = "ASCIIMAP_WIDTH";
pub const ENV_HEIGHT: &str = "ASCIIMAP_HEIGHT";
pub const ENV_LOG: &str = "ASCIIMAP_LOG";

/// Canvas used by `--print` when no size is given.
pub const PRINT_WIDTH: usize = 72;
pub const PRINT_HEIGHT: usize = 16;
/// Largest side accepted by `--print`.
pub const MAX_PRINT_SIDE: usize = 4096;

#[derive(Parser, Debug)]
#[command(name = "asciimap", version, about = "Render GeoJSON as an ASCII map in the terminal")]
pub struct Args {
    /// GeoJSON file to show; opens the path prompt when omitted
    pub path: Option<PathBuf>,

    /// Fixed canvas width in cells (falls back to ASCIIMAP_WIDTH)
    #[arg(long)]
    pub width: Option<usize>,

    /// Fixed canvas height in cells (falls back to ASCIIMAP_HEIGHT)
    #[arg(long)]
    pub height: Option<usize>,

    /// Render once to stdout instead of starting the viewer
    #[arg(long)]
    pub print: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    pub path: Option<String>,
    pub fixed_width: Option<usize>,
    pub fixed_height: Option<usize>,
    pub print: bool,
    pub log_file: Option<PathBuf>,
}

impl ViewerConfig {
    pub fn from_env(args: Args) -> Self {
        Self::resolve(args, |key| env::var(key).ok())
    }

    /// Merge flags with environment fallbacks looked up through `lookup`.
    pub fn resolve(args: Args, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse = |key: &str| lookup(key).and_then(|v| v.trim().parse::<usize>().ok());
        Self {
            path: args.path.map(|p| p.display().to_string()),
            fixed_width: args.width.or_else(|| parse(ENV_WIDTH)),
            fixed_height: args.height.or_else(|| parse(ENV_HEIGHT)),
            print: args.print,
            log_file: lookup(ENV_LOG)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn print_size(&self) -> Result<(usize, usize), CliError> {
        let side = |name: &str, value: usize| {
            if value > MAX_PRINT_SIDE {
                return Err(CliError::Usage(format!(
                    "--{name} must be at most {MAX_PRINT_SIDE}, got {value}"
                )));
            }
            Ok(value.max(1))
        };
        Ok((
            side("width", self.fixed_width.unwrap_or(PRINT_WIDTH))?,
            side("height", self.fixed_height.unwrap_or(PRINT_HEIGHT))?,
        ))
    }
}
