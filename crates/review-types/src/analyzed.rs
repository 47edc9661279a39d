//! Final per-review output row.

use serde::{Deserialize, Serialize};

use crate::sentiment::SentimentLabel;

/// One row of the analyzed result table.
///
/// Field order is the column order of the exported CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedReview {
    pub review_id: String,
    /// Review text, truncated for display
    pub review_text: String,
    pub sentiment_label: SentimentLabel,
    pub sentiment_score: f64,
    pub sentiment_confidence: f64,
    pub subjectivity: f64,
    /// `;`-joined theme names or "general"
    pub identified_themes: String,
    /// Number of assigned themes, 0 for "general"
    pub theme_count: usize,
    pub bank_name: Option<String>,
    /// ISO-8601 timestamp shared by every row of a run
    pub processing_timestamp: String,
}
