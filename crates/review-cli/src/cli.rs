//! CLI argument parsing for the review analyzer.
//!
//! CLI flags override every other configuration source.

use clap::{Parser, Subcommand};

/// Banking App Review Analyzer
///
/// Scores sentiment, extracts keywords and assigns themes to a corpus of
/// app-store reviews.
#[derive(Parser, Debug)]
#[command(name = "review-analyzer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/review-analyzer/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Analyzer commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a review corpus and write the result artifacts
    Run {
        /// Input CSV file (overrides input_path)
        #[arg(short, long)]
        input: Option<String>,

        /// Output directory (overrides output_dir)
        #[arg(short, long)]
        output_dir: Option<String>,

        /// Records per processing batch
        #[arg(short, long)]
        batch_size: Option<usize>,
    },

    /// Print the effective configuration as TOML
    Config,

    /// Print the ordered theme pattern table
    Patterns,
}
