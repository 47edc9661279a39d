//! # review-analysis
//!
//! Batch analysis of banking-app reviews.
//!
//! Turns a corpus of raw review rows into a themed, sentiment-scored
//! result table plus keyword tables and a run summary. Each run is a full,
//! stateless pass; nothing is persisted between runs.
//!
//! ## Stages
//! - Record normalization with per-reason drop counts
//! - Text reduction (cleanup, stop words, base forms)
//! - Lexicon sentiment scoring
//! - TF-IDF keyword extraction over unigrams to trigrams
//! - Ordered, first-match theme classification and per-review theme scoring
//!
//! Per-record stages run over fixed-size batches with `rayon`; results do
//! not depend on the batch size.
//!
//! ```
//! use review_analysis::ReviewPipeline;
//! use review_types::{AnalysisConfig, RawReview};
//!
//! let mut config = AnalysisConfig::default();
//! config.keywords.min_df = 1;
//! let pipeline = ReviewPipeline::new(&config).unwrap();
//!
//! let raw = vec![
//!     RawReview::new("a", "Great app, fast transfers!").with_rating(5.0).with_bank("CBE", "CBE"),
//!     RawReview::new("b", "App crashes constantly").with_rating(1.0).with_bank("CBE", "CBE"),
//! ];
//! let output = pipeline.run(&raw).unwrap();
//! assert_eq!(output.results.len(), 2);
//! ```

pub mod batch;
pub mod corpus;
pub mod error;
pub mod export;
pub mod normalizer;
pub mod pipeline;
pub mod sentiment;
pub mod summary;
pub mod text;
pub mod tfidf;
pub mod themes;

pub use corpus::{load_reviews, read_reviews};
pub use error::AnalysisError;
pub use export::{export_run, ExportedFiles};
pub use normalizer::{NormalizationStats, NormalizedCorpus, RecordNormalizer};
pub use pipeline::{PipelineOutput, ReviewPipeline};
pub use sentiment::{SentimentLexicon, SentimentScorer};
pub use summary::{LabelShare, MostThematic, RunSummary, ThemeShare};
pub use text::TextReducer;
pub use tfidf::{TermImportance, TermImportanceTable, TfIdf};
pub use themes::{ThemeAssignments, ThemeBucket, ThemeClassifier, ThemeMatcher};
