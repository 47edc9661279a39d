//! Review analyzer command-line library.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (run, config, patterns)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{render_patterns, render_settings, run_analysis, show_config, show_patterns};
