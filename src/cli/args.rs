use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "licwatch")]
#[command(about = "Google Workspace license threshold monitor")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON output format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Initialize fresh configuration
    Init,
    /// Set configuration value
    Set {
        /// Configuration key (e.g., thresholds.Gemini)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch license assignments and refresh the local snapshot
    Sync,

    /// Refresh the snapshot, compare against thresholds and alert on breaches
    Check {
        /// Print the alert instead of sending it
        #[arg(long)]
        dry_run: bool,

        /// Skip fetching and evaluate the stored snapshot
        #[arg(long)]
        offline: bool,
    },

    /// Send a summary of all license counts from the stored snapshot
    Report {
        /// Print the summary instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}
