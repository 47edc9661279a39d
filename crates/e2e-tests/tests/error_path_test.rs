//! Error path E2E tests.
//!
//! Fatal conditions (missing columns, unreadable input, invalid
//! configuration) must surface as errors naming the culprit, while
//! record-level problems are counted and never abort a run.

use pretty_assertions::assert_eq;

use e2e_tests::{fixed_timestamp, small_corpus_config, TestHarness};
use review_analysis::{load_reviews, AnalysisError, ReviewPipeline};
use review_types::{AnalysisConfig, RawReview, ThemeCategory};

/// A corpus without `review_text` fails naming the column and the file.
#[test]
fn test_missing_review_text_column() {
    let harness = TestHarness::new();
    let path = harness.write_input_text("review_id,rating,bank_code\nr-1,5,CBE\n");

    let err = load_reviews(path).unwrap_err();
    let message = err.to_string();
    assert!(
        matches!(err, AnalysisError::MissingColumn { ref column, .. } if column == "review_text"),
        "unexpected error: {message}"
    );
    assert!(message.contains("review_text"));
    assert!(message.contains("bank_reviews.csv"));
}

/// A corpus without `review_id` fails the same way.
#[test]
fn test_missing_review_id_column() {
    let harness = TestHarness::new();
    let path = harness.write_input_text("review_text,rating\nGreat app overall,5\n");

    let err = load_reviews(path).unwrap_err();
    assert!(err.to_string().contains("'review_id'"));
}

/// A missing input file is an I/O error naming the path.
#[test]
fn test_unreadable_input() {
    let harness = TestHarness::new();
    let err = load_reviews(&harness.input_path).unwrap_err();
    assert!(matches!(err, AnalysisError::Io { .. }));
    assert!(err.to_string().contains("bank_reviews.csv"));
}

/// Threshold ordering is validated before anything runs.
#[test]
fn test_inverted_thresholds_rejected() {
    let mut config = AnalysisConfig::default();
    config.sentiment.positive_threshold = -0.2;
    config.sentiment.negative_threshold = 0.2;

    let err = ReviewPipeline::new(&config).err().unwrap();
    assert!(matches!(err, AnalysisError::InvalidConfig(_)));
}

/// OTHER is reserved for unmatched terms.
#[test]
fn test_reserved_category_name_rejected() {
    let mut config = AnalysisConfig::default();
    config
        .themes
        .categories
        .push(ThemeCategory::new("OTHER", &["misc", "various", "else"]));

    let err = ReviewPipeline::new(&config).err().unwrap();
    assert!(err.to_string().contains("OTHER"));
}

/// A category with fewer patterns than the minimum is rejected.
#[test]
fn test_too_few_patterns_rejected() {
    let mut config = AnalysisConfig::default();
    config
        .themes
        .categories
        .push(ThemeCategory::new("LOYALTY", &["reward"]));

    assert!(ReviewPipeline::new(&config).is_err());
}

/// An uncompilable theme regex names the theme and pattern.
#[test]
fn test_invalid_theme_regex_rejected() {
    let mut config = AnalysisConfig::default();
    config
        .themes
        .categories
        .push(ThemeCategory::new("LOYALTY", &["reward", "points", "(cashback"]));

    let err = ReviewPipeline::new(&config).err().unwrap();
    match err {
        AnalysisError::InvalidPattern { theme, pattern, .. } => {
            assert_eq!(theme, "LOYALTY");
            assert_eq!(pattern, "(cashback");
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// Bad rows are dropped and counted; the run still succeeds.
#[test]
fn test_record_level_problems_are_counted() {
    let raw = vec![
        RawReview::new("ok-1", "Transfers are quick and reliable").with_rating(5.0).with_bank("CBE", "CBE"),
        RawReview {
            review_id: "no-rating".to_string(),
            review_text: Some("Nothing wrong with this text".to_string()),
            bank_code: Some("CBE".to_string()),
            ..Default::default()
        },
        RawReview::new("no-bank", "No bank code or name given").with_rating(3.0),
        RawReview::new("blank", "     ").with_rating(3.0).with_bank("CBE", "CBE"),
        RawReview::new("bad-date", "The date on this one is garbage")
            .with_rating(4.0)
            .with_bank("CBE", "CBE")
            .with_date("31st of Smarch"),
        RawReview::new("zero", "Zero stars is not a valid rating").with_rating(0.0).with_bank("CBE", "CBE"),
    ];

    let pipeline = ReviewPipeline::new(&small_corpus_config()).unwrap();
    let output = pipeline.run_at(&raw, fixed_timestamp()).unwrap();
    let stats = &output.stats;

    assert_eq!(stats.original_count, 6);
    assert_eq!(stats.dropped_missing, 2);
    assert_eq!(stats.dropped_empty_text, 1);
    assert_eq!(stats.dropped_invalid_rating, 1);
    assert_eq!(stats.unparsable_dates, 1);
    assert_eq!(stats.retained_count, 2);
    assert_eq!(stats.total_dropped(), 4);

    let mut ids: Vec<&str> = output.results.iter().map(|r| r.review_id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["bad-date", "ok-1"]);
}
