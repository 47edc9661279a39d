//! Configuration loading for the review analyzer.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at `~/.config/review-analyzer/config.toml`.
//!
//! [`AnalysisConfig`] carries every tuning knob of the pipeline and is passed
//! by reference into each component constructor.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::ReviewError;
use crate::theme::{GENERAL_LABEL, OTHER_THEME};

/// Text normalization and reduction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextConfig {
    /// Reviews shorter than this (in characters) are dropped.
    #[serde(default = "default_min_review_length")]
    pub min_review_length: usize,

    /// Records per processing batch. Bounds peak memory; never changes results.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Domain words removed before keyword extraction.
    #[serde(default = "default_banking_stop_words")]
    pub banking_stop_words: Vec<String>,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            min_review_length: default_min_review_length(),
            batch_size: default_batch_size(),
            banking_stop_words: default_banking_stop_words(),
        }
    }
}

fn default_min_review_length() -> usize {
    10
}

fn default_batch_size() -> usize {
    1000
}

fn default_banking_stop_words() -> Vec<String> {
    [
        "bank", "banks", "banking", "account", "accounts", "money", "would", "like", "get", "use",
        "also", "really", "one", "even", "much", "many", "well",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Sentiment classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    /// Polarity strictly above this is positive.
    #[serde(default = "default_positive_threshold")]
    pub positive_threshold: f64,

    /// Polarity strictly below this is negative.
    #[serde(default = "default_negative_threshold")]
    pub negative_threshold: f64,

    /// Trimmed text shorter than this gets the neutral/zero result.
    #[serde(default = "default_min_text_length")]
    pub min_text_length: usize,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            positive_threshold: default_positive_threshold(),
            negative_threshold: default_negative_threshold(),
            min_text_length: default_min_text_length(),
        }
    }
}

fn default_positive_threshold() -> f64 {
    0.1
}

fn default_negative_threshold() -> f64 {
    -0.1
}

fn default_min_text_length() -> usize {
    10
}

/// Term-importance (TF-IDF) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfig {
    /// Vocabulary cap, retained by descending weight
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Minimum number of documents a term must appear in
    #[serde(default = "default_min_df")]
    pub min_df: usize,

    /// Maximum fraction of documents a term may appear in
    #[serde(default = "default_max_df")]
    pub max_df: f64,

    /// Longest n-gram considered (1 = unigrams only)
    #[serde(default = "default_max_ngram")]
    pub max_ngram: usize,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            max_features: default_max_features(),
            min_df: default_min_df(),
            max_df: default_max_df(),
            max_ngram: default_max_ngram(),
        }
    }
}

fn default_max_features() -> usize {
    100
}

fn default_min_df() -> usize {
    2
}

fn default_max_df() -> f64 {
    0.9
}

fn default_max_ngram() -> usize {
    3
}

/// A named theme category with its ordered pattern list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeCategory {
    /// Theme name written to the output
    pub name: String,
    /// Case-insensitive regex patterns, tested in order
    pub patterns: Vec<String>,
}

impl ThemeCategory {
    pub fn new(name: impl Into<String>, patterns: &[&str]) -> Self {
        Self {
            name: name.into(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Theme classification settings.
///
/// `categories` order is a priority order: a term goes to the first
/// category with a matching pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Minimum number of patterns each category must define
    #[serde(default = "default_min_theme_keywords")]
    pub min_theme_keywords: usize,

    /// Maximum themes assigned to one review
    #[serde(default = "default_max_themes_per_review")]
    pub max_themes_per_review: usize,

    /// Maximum terms kept per theme bucket
    #[serde(default = "default_max_keywords_per_theme")]
    pub max_keywords_per_theme: usize,

    /// Terms per theme checked when scoring a review
    #[serde(default = "default_match_top_n")]
    pub match_top_n: usize,

    /// Ordered category table
    #[serde(default = "default_theme_categories")]
    pub categories: Vec<ThemeCategory>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            min_theme_keywords: default_min_theme_keywords(),
            max_themes_per_review: default_max_themes_per_review(),
            max_keywords_per_theme: default_max_keywords_per_theme(),
            match_top_n: default_match_top_n(),
            categories: default_theme_categories(),
        }
    }
}

fn default_min_theme_keywords() -> usize {
    3
}

fn default_max_themes_per_review() -> usize {
    2
}

fn default_max_keywords_per_theme() -> usize {
    20
}

fn default_match_top_n() -> usize {
    20
}

/// Built-in banking-domain theme table.
pub fn default_theme_categories() -> Vec<ThemeCategory> {
    vec![
        ThemeCategory::new(
            "UI_UX_DESIGN",
            &[
                "app", "ui", "ux", "interface", "design", "user friendly", "easy to use",
                "intuitive", "navigation", "layout", "dashboard", "menu", "color", "font",
                "appearance", "visual",
            ],
        ),
        ThemeCategory::new(
            "RELIABILITY_PERFORMANCE",
            &[
                "crash", "bug", "glitch", "freeze", "hang", "slow", "lag", "loading",
                "response time", "reliable", "stable", "performance", "speed", "downtime",
                "offline", "error", "not working",
            ],
        ),
        ThemeCategory::new(
            "ACCOUNT_SECURITY",
            &[
                "login", "password", "security", "authentication", "biometric", "face id",
                "fingerprint", "pin", "locked", "hacked", "fraud", "privacy", "two factor",
                "verification", "access",
            ],
        ),
        ThemeCategory::new(
            "TRANSACTION_FEATURES",
            &[
                "transfer", "payment", "bill pay", "deposit", "withdrawal", "atm", "wire",
                "mobile check", "instant", "pending", "failed transaction", "recurring",
                "scheduled", "auto pay",
            ],
        ),
        ThemeCategory::new(
            "CUSTOMER_SUPPORT",
            &[
                "support", "customer service", "help", "assistance", "call center", "chat",
                "email support", "phone", "wait time", "response", "agent", "representative",
                "complaint", "issue resolution", "feedback",
            ],
        ),
        ThemeCategory::new(
            "FEES_CHARGES",
            &[
                "fee", "charge", "cost", "overdraft", "monthly fee", "atm fee",
                "transaction fee", "hidden fee", "service charge", "penalty", "interest",
                "rate", "apr",
            ],
        ),
        ThemeCategory::new(
            "MOBILE_BANKING",
            &[
                "mobile", "app", "iphone", "android", "notification", "push", "alerts",
                "mobile deposit", "qr code", "face id", "touch id", "mobile wallet",
            ],
        ),
    ]
}

/// Final-table and summary settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Review text longer than this many characters is truncated with "..."
    #[serde(default = "default_display_text_limit")]
    pub display_text_limit: usize,

    /// Number of themes listed in the summary distribution
    #[serde(default = "default_summary_top_themes")]
    pub summary_top_themes: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            display_text_limit: default_display_text_limit(),
            summary_top_themes: default_summary_top_themes(),
        }
    }
}

fn default_display_text_limit() -> usize {
    500
}

fn default_summary_top_themes() -> usize {
    5
}

/// Master configuration for the analysis pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub text: TextConfig,

    #[serde(default)]
    pub sentiment: SentimentConfig,

    #[serde(default)]
    pub keywords: KeywordConfig,

    #[serde(default)]
    pub themes: ThemeConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

impl AnalysisConfig {
    /// Validate configuration values.
    ///
    /// Regex syntax of theme patterns is checked where they are compiled.
    pub fn validate(&self) -> Result<(), ReviewError> {
        if self.text.batch_size == 0 {
            return Err(ReviewError::Config("text.batch_size must be > 0".to_string()));
        }
        if self.sentiment.positive_threshold <= self.sentiment.negative_threshold {
            return Err(ReviewError::Config(format!(
                "sentiment.positive_threshold ({}) must be greater than negative_threshold ({})",
                self.sentiment.positive_threshold, self.sentiment.negative_threshold
            )));
        }
        if self.keywords.min_df == 0 {
            return Err(ReviewError::Config("keywords.min_df must be >= 1".to_string()));
        }
        if !(self.keywords.max_df > 0.0 && self.keywords.max_df <= 1.0) {
            return Err(ReviewError::Config(format!(
                "keywords.max_df must be in (0.0, 1.0], got {}",
                self.keywords.max_df
            )));
        }
        if self.keywords.max_ngram == 0 {
            return Err(ReviewError::Config("keywords.max_ngram must be >= 1".to_string()));
        }
        if self.themes.max_themes_per_review == 0 {
            return Err(ReviewError::Config(
                "themes.max_themes_per_review must be >= 1".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for category in &self.themes.categories {
            let name = category.name.trim();
            if name.is_empty() {
                return Err(ReviewError::Config(
                    "theme category name must not be empty".to_string(),
                ));
            }
            if name == OTHER_THEME || name == GENERAL_LABEL {
                return Err(ReviewError::Config(format!(
                    "theme category name '{}' is reserved",
                    name
                )));
            }
            if !seen.insert(name.to_string()) {
                return Err(ReviewError::Config(format!(
                    "duplicate theme category '{}'",
                    name
                )));
            }
            if category.patterns.len() < self.themes.min_theme_keywords {
                return Err(ReviewError::Config(format!(
                    "theme category '{}' defines {} patterns, at least {} required",
                    name,
                    category.patterns.len(),
                    self.themes.min_theme_keywords
                )));
            }
        }
        Ok(())
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// CSV file holding the raw review corpus
    #[serde(default = "default_input_path")]
    pub input_path: String,

    /// Directory receiving the result table and side artifacts
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Pipeline tuning
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

fn default_input_path() -> String {
    "bank_reviews.csv".to_string()
}

fn default_output_dir() -> String {
    ProjectDirs::from("", "", "review-analyzer")
        .map(|p| p.data_local_dir().join("output"))
        .unwrap_or_else(|| PathBuf::from("./output"))
        .to_string_lossy()
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            output_dir: default_output_dir(),
            log_level: default_log_level(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/review-analyzer/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (REVIEW_*, nested keys joined with `__`)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, ReviewError> {
        let config_dir = ProjectDirs::from("", "", "review-analyzer")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("input_path", default_input_path())
            .map_err(|e| ReviewError::Config(e.to_string()))?
            .set_default("output_dir", default_output_dir())
            .map_err(|e| ReviewError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| ReviewError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // e.g. REVIEW_LOG_LEVEL, REVIEW_ANALYSIS__TEXT__BATCH_SIZE
        builder = builder.add_source(
            Environment::with_prefix("REVIEW")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| ReviewError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| ReviewError::Config(e.to_string()))?;

        settings.analysis.validate()?;
        Ok(settings)
    }

    pub fn input_path(&self) -> PathBuf {
        PathBuf::from(&self.input_path)
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.output_dir)
    }
}
