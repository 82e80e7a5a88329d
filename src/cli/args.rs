//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "/etc/ossmirror/config.json";

/// Mirror a remote file into an OSS bucket
///
/// Downloads the file at the given URL into the workspace (unless it is
/// already there) and uploads it under `<host>/<path>`.
#[derive(Parser, Debug)]
#[command(name = "ossmirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "OSSMIRROR_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// URL of the file to mirror
    #[arg(short = 'l', long = "url", env = "OSSMIRROR_URL")]
    pub url: Option<String>,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Log line format
    #[arg(long, value_enum, default_value = "text")]
    pub log_format: LogFormat,
}

impl Cli {
    /// Default tracing filter for the selected verbosity
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "ossmirror=warn";
        }
        match self.verbose {
            0 => "ossmirror=info",
            1 => "ossmirror=debug,opendal=debug",
            _ => "ossmirror=trace,opendal=trace",
        }
    }
}

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}
