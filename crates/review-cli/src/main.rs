//! Banking App Review Analyzer
//!
//! Batch sentiment, keyword and theme analysis of app-store reviews.
//!
//! # Usage
//!
//! ```bash
//! review-analyzer run [--input PATH] [--output-dir PATH] [--batch-size N]
//! review-analyzer config
//! review-analyzer patterns
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/review-analyzer/config.toml)
//! 3. Environment variables (REVIEW_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use review_cli::{run_analysis, show_config, show_patterns, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            output_dir,
            batch_size,
        } => {
            run_analysis(
                cli.config.as_deref(),
                cli.log_level.as_deref(),
                input.as_deref(),
                output_dir.as_deref(),
                batch_size,
            )?;
        }
        Commands::Config => {
            show_config(cli.config.as_deref())?;
        }
        Commands::Patterns => {
            show_patterns(cli.config.as_deref())?;
        }
    }

    Ok(())
}
