//! # review-types
//!
//! Shared domain types for the review analyzer.
//!
//! This crate defines the data structures passed between pipeline stages:
//! - Reviews: raw input rows and the validated record schema
//! - Sentiment: per-review polarity, subjectivity and label
//! - Themes: the sentinel-aware per-review theme assignment
//! - Analyzed reviews: the final output row
//! - Settings: layered configuration and the analysis tuning knobs
//!
//! ## Usage
//!
//! ```rust
//! use review_types::{AnalysisConfig, RawReview};
//!
//! let config = AnalysisConfig::default();
//! assert!(config.validate().is_ok());
//!
//! let raw = RawReview::new("r-1", "Transfers are instant and reliable");
//! assert_eq!(raw.review_id, "r-1");
//! ```

pub mod analyzed;
pub mod config;
pub mod error;
pub mod review;
pub mod sentiment;
pub mod theme;

pub use analyzed::AnalyzedReview;
pub use config::{
    default_theme_categories, AnalysisConfig, KeywordConfig, ReportConfig, SentimentConfig,
    Settings, TextConfig, ThemeCategory, ThemeConfig,
};
pub use error::ReviewError;
pub use review::{RawReview, Review};
pub use sentiment::{SentimentLabel, SentimentResult};
pub use theme::{ReviewThemes, GENERAL_LABEL, OTHER_THEME, THEME_SEPARATOR};
