use std::path::PathBuf;

use clap::Parser;

/// Spotlight-style fuzzy search palette for the terminal.
#[derive(Debug, Parser)]
#[command(name = "spotlight", version)]
pub struct Cli {
    /// Config file to load (defaults to `$XDG_CONFIG_HOME/spotlight/spotlight.toml`).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// JSON dataset to search instead of the bundled sample records.
    #[arg(long, value_name = "FILE")]
    pub dataset: Option<PathBuf>,

    /// Debounce interval in milliseconds, overriding the config file.
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,
}
