//! End-to-end test infrastructure for the review analyzer.
//!
//! Provides a shared TestHarness and corpus builders for E2E tests
//! covering the full load-analyze-export path.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};

use review_types::{AnalysisConfig, RawReview};

/// Shared test harness for E2E tests.
///
/// Owns a temp directory with an input file location and an output
/// directory for exported artifacts.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Where `write_input` puts the corpus CSV
    pub input_path: PathBuf,
    /// Export target; not created until a run writes to it
    pub output_dir: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let input_path = temp_dir.path().join("bank_reviews.csv");
        let output_dir = temp_dir.path().join("output");

        Self {
            _temp_dir: temp_dir,
            input_path,
            output_dir,
        }
    }

    /// Write raw reviews as the input CSV.
    pub fn write_input(&self, reviews: &[RawReview]) -> &Path {
        write_reviews_csv(&self.input_path, reviews);
        &self.input_path
    }

    /// Write literal CSV text as the input file.
    pub fn write_input_text(&self, content: &str) -> &Path {
        std::fs::write(&self.input_path, content).expect("Failed to write input CSV");
        &self.input_path
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize raw reviews to a CSV file with a header row.
pub fn write_reviews_csv(path: &Path, reviews: &[RawReview]) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create CSV");
    for review in reviews {
        writer.serialize(review).expect("Failed to write review row");
    }
    writer.flush().expect("Failed to flush CSV");
}

/// Processing timestamp used by deterministic runs.
pub fn fixed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Default configuration with `min_df = 1` so tiny corpora yield terms.
pub fn small_corpus_config() -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.keywords.min_df = 1;
    config
}

/// The three-record scenario: one positive, one negative, one too short.
pub fn scenario_corpus() -> Vec<RawReview> {
    vec![
        RawReview::new("a", "Great app, fast transfers!")
            .with_rating(5.0)
            .with_bank("CBE", "Commercial Bank of Ethiopia")
            .with_date("2024-05-20"),
        RawReview::new("b", "App crashes constantly")
            .with_rating(1.0)
            .with_bank("CBE", "Commercial Bank of Ethiopia")
            .with_date("2024-05-18"),
        RawReview::new("c", "ok")
            .with_rating(3.0)
            .with_bank("CBE", "Commercial Bank of Ethiopia")
            .with_date("2024-05-19"),
    ]
}

/// A dozen realistic reviews across two banks.
pub fn mixed_corpus() -> Vec<RawReview> {
    let texts = [
        ("Great app, fast transfers!", 5.0),
        ("App crashes constantly", 1.0),
        ("Login keeps failing after the update, very frustrating", 2.0),
        ("Customer support never answers the phone", 1.0),
        ("Hidden fees on every transfer, too expensive", 2.0),
        ("Easy to use interface and quick payments", 5.0),
        ("The app is slow and freezes when loading balance", 2.0),
        ("Fingerprint login works well, feels secure", 4.0),
        ("Mobile deposit failed twice this week", 1.0),
        ("Love the new dashboard design", 5.0),
        ("Transfers are pending for days, terrible service", 1.0),
        ("Helpful agent solved my issue quickly", 4.0),
    ];

    texts
        .iter()
        .enumerate()
        .map(|(i, (text, rating))| {
            let (code, name) = if i % 2 == 0 {
                ("CBE", "Commercial Bank of Ethiopia")
            } else {
                ("BOA", "Bank of Abyssinia")
            };
            RawReview::new(format!("r-{i:02}"), *text)
                .with_rating(*rating)
                .with_bank(code, name)
                .with_date(format!("2024-03-{:02}", i + 1))
                .with_user(format!("user{i}"))
        })
        .collect()
}

/// Reviews whose words match none of the default theme patterns.
pub fn themeless_corpus() -> Vec<RawReview> {
    [
        "Sunny weather made the morning walk lovely",
        "Dogs enjoy long walks near the river",
        "Fresh bread smells wonderful every weekend",
    ]
    .iter()
    .enumerate()
    .map(|(i, text)| {
        RawReview::new(format!("t-{i}"), *text)
            .with_rating(3.0)
            .with_bank("DASHEN", "Dashen Bank")
    })
    .collect()
}
