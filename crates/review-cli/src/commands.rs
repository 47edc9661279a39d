//! Command implementations for the review analyzer.
//!
//! Handles:
//! - run: load the corpus, analyze it, export the artifacts
//! - config: print the effective settings
//! - patterns: print the theme category table

use std::fmt::Write as _;

use anyhow::{Context, Result};
use tracing::info;

use review_analysis::{export_run, load_reviews, ReviewPipeline};
use review_types::{Settings, ThemeConfig};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Load settings and apply CLI overrides (highest precedence).
fn load_settings(
    config_path: Option<&str>,
    log_level_override: Option<&str>,
    input_override: Option<&str>,
    output_dir_override: Option<&str>,
    batch_size_override: Option<usize>,
) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;

    if let Some(log_level) = log_level_override {
        settings.log_level = log_level.to_string();
    }
    if let Some(input) = input_override {
        settings.input_path = input.to_string();
    }
    if let Some(output_dir) = output_dir_override {
        settings.output_dir = output_dir.to_string();
    }
    if let Some(batch_size) = batch_size_override {
        settings.analysis.text.batch_size = batch_size;
    }
    Ok(settings)
}

/// Run the full analysis and write the artifacts.
pub fn run_analysis(
    config_path: Option<&str>,
    log_level_override: Option<&str>,
    input_override: Option<&str>,
    output_dir_override: Option<&str>,
    batch_size_override: Option<usize>,
) -> Result<()> {
    let settings = load_settings(
        config_path,
        log_level_override,
        input_override,
        output_dir_override,
        batch_size_override,
    )?;
    init_logging(&settings.log_level)?;

    info!("Review analyzer starting...");
    info!("  Input: {}", settings.input_path);
    info!("  Output directory: {}", settings.output_dir);
    info!("  Batch size: {}", settings.analysis.text.batch_size);

    let pipeline =
        ReviewPipeline::new(&settings.analysis).context("Invalid analysis configuration")?;

    let input = settings.input_path();
    let raw = load_reviews(&input)
        .with_context(|| format!("Failed to load reviews from {}", input.display()))?;

    let output = pipeline.run(&raw).context("Review analysis failed")?;

    let output_dir = settings.output_dir();
    let files = export_run(&output, &output_dir)
        .with_context(|| format!("Failed to write results to {}", output_dir.display()))?;

    print!("{}", output.summary.render());
    println!("Results:            {}", files.results.display());
    println!("Theme keywords:     {}", files.theme_keywords.display());
    println!("Extracted keywords: {}", files.keywords.display());
    println!("Run summary:        {}", files.summary.display());

    Ok(())
}

/// Effective settings as TOML.
pub fn render_settings(settings: &Settings) -> Result<String> {
    toml::to_string_pretty(settings).context("Failed to serialize settings")
}

/// Print the effective settings.
pub fn show_config(config_path: Option<&str>) -> Result<()> {
    let settings = Settings::load(config_path).context("Failed to load configuration")?;
    print!("{}", render_settings(&settings)?);
    Ok(())
}

/// Theme categories in priority order with their patterns.
pub fn render_patterns(themes: &ThemeConfig) -> String {
    let mut out = String::new();
    for (priority, category) in themes.categories.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", priority + 1, category.name);
        let _ = writeln!(out, "   {}", category.patterns.join(", "));
    }
    let _ = writeln!(
        out,
        "Terms matching no category are assigned to OTHER; reviews with no theme are labeled general."
    );
    out
}

/// Print the theme pattern table.
pub fn show_patterns(config_path: Option<&str>) -> Result<()> {
    let settings = Settings::load(config_path).context("Failed to load configuration")?;
    print!("{}", render_patterns(&settings.analysis.themes));
    Ok(())
}
