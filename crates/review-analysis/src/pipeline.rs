//! Review analysis pipeline.
//!
//! Runs normalization, text reduction, sentiment scoring, keyword
//! extraction and theme classification once each, in that order, and
//! assembles the final result table and run summary.

use std::time::Instant;

use chrono::{DateTime, SecondsFormat, Utc};
use review_types::{AnalysisConfig, AnalyzedReview, RawReview, ReviewThemes, SentimentResult};
use tracing::{debug, info};

use crate::error::AnalysisError;
use crate::normalizer::{NormalizationStats, RecordNormalizer};
use crate::sentiment::SentimentScorer;
use crate::summary::RunSummary;
use crate::text::TextReducer;
use crate::tfidf::{TermImportanceTable, TfIdf};
use crate::themes::{ThemeAssignments, ThemeClassifier, ThemeMatcher};

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// One row per retained review, in canonical order
    pub results: Vec<AnalyzedReview>,
    /// Theme buckets of extracted terms
    pub theme_assignments: ThemeAssignments,
    /// Ranked extracted terms
    pub terms: TermImportanceTable,
    pub stats: NormalizationStats,
    pub summary: RunSummary,
}

/// The assembled analysis pipeline.
///
/// Built once from an [`AnalysisConfig`]; every run is a full, stateless
/// pass over the corpus it is given.
pub struct ReviewPipeline {
    config: AnalysisConfig,
    normalizer: RecordNormalizer,
    reducer: TextReducer,
    scorer: SentimentScorer,
    classifier: ThemeClassifier,
}

impl ReviewPipeline {
    /// Validate the configuration and build every stage.
    ///
    /// Fails on invalid thresholds, sizes, category tables or patterns.
    pub fn new(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;

        let classifier = ThemeClassifier::new(&config.themes)?;
        Ok(Self {
            normalizer: RecordNormalizer::new(&config.text),
            reducer: TextReducer::new(&config.text),
            scorer: SentimentScorer::new(&config.sentiment).with_batch_size(config.text.batch_size),
            classifier,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run over a corpus, stamping rows with the current time.
    pub fn run(&self, raw: &[RawReview]) -> Result<PipelineOutput, AnalysisError> {
        self.run_at(raw, Utc::now())
    }

    /// Run over a corpus with a fixed processing timestamp.
    ///
    /// Two runs with the same input, configuration and timestamp produce
    /// identical output.
    pub fn run_at(
        &self,
        raw: &[RawReview],
        processed_at: DateTime<Utc>,
    ) -> Result<PipelineOutput, AnalysisError> {
        let started = Instant::now();
        info!(records = raw.len(), "Starting review analysis");

        let mut corpus = self.normalizer.normalize(raw);
        self.normalizer
            .drop_short_cleaned(&mut corpus, |text| self.reducer.clean(text));
        let texts: Vec<&str> = corpus
            .reviews
            .iter()
            .map(|r| r.review_text.as_str())
            .collect();

        let reduced = self.reducer.reduce_batch(&texts);
        let sentiments = self.scorer.score_batch(&texts);

        let reduced_refs: Vec<&str> = reduced.iter().map(String::as_str).collect();
        let terms = TfIdf::fit(&reduced_refs, &self.config.keywords);
        let theme_assignments = self.classifier.assign_terms(&terms);

        let matcher = ThemeMatcher::new(&theme_assignments, &self.config.themes)?
            .with_batch_size(self.config.text.batch_size);
        let pairs: Vec<(&str, &str)> = texts
            .iter()
            .copied()
            .zip(reduced_refs.iter().copied())
            .collect();
        let review_themes = matcher.score_batch(&pairs);

        let timestamp = processed_at.to_rfc3339_opts(SecondsFormat::Secs, false);
        let results: Vec<AnalyzedReview> = corpus
            .reviews
            .iter()
            .zip(sentiments.iter())
            .zip(review_themes.iter())
            .map(|((review, sentiment), themes)| {
                self.assemble(
                    &review.review_id,
                    &review.review_text,
                    review.bank_name.clone(),
                    sentiment,
                    themes,
                    &timestamp,
                )
            })
            .collect();

        let summary = RunSummary::build(
            &results,
            corpus.stats.clone(),
            terms.len(),
            timestamp,
            self.config.report.summary_top_themes,
        );

        info!(
            analyzed = results.len(),
            dropped = corpus.stats.total_dropped(),
            terms = terms.len(),
            themes = theme_assignments.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Review analysis complete"
        );

        Ok(PipelineOutput {
            results,
            theme_assignments,
            terms,
            stats: corpus.stats,
            summary,
        })
    }

    fn assemble(
        &self,
        review_id: &str,
        text: &str,
        bank_name: Option<String>,
        sentiment: &SentimentResult,
        themes: &ReviewThemes,
        timestamp: &str,
    ) -> AnalyzedReview {
        debug!(review_id, themes = %themes.label(), "Assembled review");
        AnalyzedReview {
            review_id: review_id.to_string(),
            review_text: truncate_display(text, self.config.report.display_text_limit),
            sentiment_label: sentiment.label,
            sentiment_score: sentiment.score,
            sentiment_confidence: sentiment.confidence,
            subjectivity: sentiment.subjectivity,
            identified_themes: themes.label(),
            theme_count: themes.count(),
            bank_name,
            processing_timestamp: timestamp.to_string(),
        }
    }
}

/// Cut text to `limit` characters, marking the cut with "...".
pub fn truncate_display(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(limit).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use review_types::{SentimentLabel, ThemeCategory};

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn scenario_config() -> AnalysisConfig {
        let mut config = AnalysisConfig::default();
        config.keywords.min_df = 1;
        config
    }

    fn scenario_corpus() -> Vec<RawReview> {
        vec![
            RawReview::new("a", "Great app, fast transfers!")
                .with_rating(5.0)
                .with_bank("CBE", "Commercial Bank of Ethiopia"),
            RawReview::new("b", "App crashes constantly")
                .with_rating(1.0)
                .with_bank("CBE", "Commercial Bank of Ethiopia"),
            RawReview::new("c", "ok").with_rating(3.0).with_bank("CBE", "Commercial Bank of Ethiopia"),
        ]
    }

    #[test]
    fn test_truncate_display() {
        assert_eq!(truncate_display("short", 10), "short");
        assert_eq!(truncate_display("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_display("abcdefghijk", 10), "abcdefghij...");
        assert_eq!(truncate_display("ééééé", 3), "ééé...");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AnalysisConfig::default();
        config.text.batch_size = 0;
        assert!(matches!(
            ReviewPipeline::new(&config),
            Err(AnalysisError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let mut config = AnalysisConfig::default();
        config.themes.min_theme_keywords = 1;
        config.themes.categories = vec![ThemeCategory::new("BROKEN", &["[a-"])];
        assert!(matches!(
            ReviewPipeline::new(&config),
            Err(AnalysisError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_scenario_run() {
        let pipeline = ReviewPipeline::new(&scenario_config()).unwrap();
        let output = pipeline.run_at(&scenario_corpus(), fixed_time()).unwrap();

        assert_eq!(output.results.len(), 2);
        assert_eq!(output.stats.dropped_short_text, 1);
        assert_eq!(output.stats.total_dropped(), 1);

        let a = output.results.iter().find(|r| r.review_id == "a").unwrap();
        assert_eq!(a.sentiment_label, SentimentLabel::Positive);
        assert!(a.identified_themes.contains("TRANSACTION_FEATURES"));

        let b = output.results.iter().find(|r| r.review_id == "b").unwrap();
        assert_eq!(b.sentiment_label, SentimentLabel::Negative);
        assert!(b.identified_themes.contains("RELIABILITY_PERFORMANCE"));

        assert!(output.results.iter().all(|r| r.review_id != "c"));
        assert_eq!(a.processing_timestamp, "2024-06-01T12:00:00+00:00");
    }

    #[test]
    fn test_empty_corpus_is_degenerate_not_error() {
        let pipeline = ReviewPipeline::new(&AnalysisConfig::default()).unwrap();
        let output = pipeline.run_at(&[], fixed_time()).unwrap();
        assert!(output.results.is_empty());
        assert!(output.terms.is_empty());
        assert!(output.theme_assignments.is_empty());
        assert_eq!(output.summary.total_reviews, 0);
    }

    #[test]
    fn test_small_corpus_falls_back_to_general() {
        // Default min_df = 2 cannot be met by a single review
        let pipeline = ReviewPipeline::new(&AnalysisConfig::default()).unwrap();
        let raw = vec![RawReview::new("a", "Transfers fail and fees are high")
            .with_rating(2.0)
            .with_bank("CBE", "CBE")];
        let output = pipeline.run_at(&raw, fixed_time()).unwrap();
        assert!(output.terms.is_empty());
        assert_eq!(output.results[0].identified_themes, "general");
        assert_eq!(output.results[0].theme_count, 0);
    }

    #[test]
    fn test_url_and_symbol_reviews_dropped_after_cleanup() {
        let raw = vec![
            RawReview::new("u", "https://bank.example.com/x ok")
                .with_rating(3.0)
                .with_bank("CBE", "CBE"),
            RawReview::new("e", "★★★★★★★★★★★★ ok")
                .with_rating(5.0)
                .with_bank("CBE", "CBE"),
            RawReview::new("a", "Great app, fast transfers!")
                .with_rating(5.0)
                .with_bank("CBE", "CBE"),
        ];
        let pipeline = ReviewPipeline::new(&scenario_config()).unwrap();
        let output = pipeline.run_at(&raw, fixed_time()).unwrap();

        let ids: Vec<&str> = output.results.iter().map(|r| r.review_id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
        assert_eq!(output.stats.dropped_short_cleaned, 2);
        assert_eq!(output.stats.total_dropped(), 2);
        assert_eq!(output.stats.retained_count, 1);
        assert_eq!(output.summary.total_reviews, 1);
    }

    #[test]
    fn test_display_text_truncated() {
        let mut config = scenario_config();
        config.report.display_text_limit = 12;
        let pipeline = ReviewPipeline::new(&config).unwrap();
        let output = pipeline.run_at(&scenario_corpus(), fixed_time()).unwrap();
        let a = output.results.iter().find(|r| r.review_id == "a").unwrap();
        assert_eq!(a.review_text, "Great app, f...");
    }
}
