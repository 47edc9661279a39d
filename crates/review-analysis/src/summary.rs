//! Aggregate run statistics.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use review_types::{AnalyzedReview, SentimentLabel, GENERAL_LABEL, THEME_SEPARATOR};
use serde::{Deserialize, Serialize};

use crate::normalizer::NormalizationStats;

/// Characters of review text shown for the most thematic review.
const PREVIEW_CHARS: usize = 100;

/// Count and share of one sentiment label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelShare {
    pub label: SentimentLabel,
    pub count: usize,
    /// Percent of analyzed reviews, 0-100
    pub percentage: f64,
}

/// Number of reviews tagged with one theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeShare {
    pub theme: String,
    pub count: usize,
    /// Percent of analyzed reviews, 0-100
    pub percentage: f64,
}

/// The first review carrying the largest number of themes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MostThematic {
    pub review_id: String,
    pub identified_themes: String,
    pub theme_count: usize,
    pub preview: String,
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_reviews: usize,
    /// Distinct non-empty bank names
    pub unique_banks: usize,
    /// By descending count, ties in label order
    pub sentiment_distribution: Vec<LabelShare>,
    /// Top themes by occurrence, ties in first-seen order
    pub theme_distribution: Vec<ThemeShare>,
    /// Number of distinct themes assigned to any review
    pub distinct_themes: usize,
    pub most_thematic: Option<MostThematic>,
    pub normalization: NormalizationStats,
    pub extracted_terms: usize,
    pub processed_at: String,
}

impl RunSummary {
    /// Aggregate the analyzed rows of a run.
    pub fn build(
        results: &[AnalyzedReview],
        normalization: NormalizationStats,
        extracted_terms: usize,
        processed_at: String,
        top_themes: usize,
    ) -> Self {
        let total = results.len();

        let unique_banks = results
            .iter()
            .filter_map(|r| r.bank_name.as_deref())
            .collect::<HashSet<_>>()
            .len();

        let mut sentiment_distribution: Vec<LabelShare> = SentimentLabel::ALL
            .iter()
            .map(|&label| {
                let count = results.iter().filter(|r| r.sentiment_label == label).count();
                LabelShare {
                    label,
                    count,
                    percentage: percent(count, total),
                }
            })
            .filter(|share| share.count > 0)
            .collect();
        sentiment_distribution.sort_by(|a, b| b.count.cmp(&a.count));

        // First-seen order, then a stable sort by count
        let mut theme_order: Vec<&str> = Vec::new();
        let mut theme_counts: HashMap<&str, usize> = HashMap::new();
        for result in results {
            if result.identified_themes == GENERAL_LABEL {
                continue;
            }
            for theme in result.identified_themes.split(THEME_SEPARATOR) {
                let count = theme_counts.entry(theme).or_insert(0);
                if *count == 0 {
                    theme_order.push(theme);
                }
                *count += 1;
            }
        }
        let distinct_themes = theme_order.len();
        theme_order.sort_by(|a, b| theme_counts[b].cmp(&theme_counts[a]));
        let theme_distribution = theme_order
            .into_iter()
            .take(top_themes)
            .map(|theme| ThemeShare {
                theme: theme.to_string(),
                count: theme_counts[theme],
                percentage: percent(theme_counts[theme], total),
            })
            .collect();

        let max_count = results.iter().map(|r| r.theme_count).max();
        let most_thematic = max_count.and_then(|max| {
            results.iter().find(|r| r.theme_count == max).map(|r| MostThematic {
                review_id: r.review_id.clone(),
                identified_themes: r.identified_themes.clone(),
                theme_count: r.theme_count,
                preview: r.review_text.chars().take(PREVIEW_CHARS).collect(),
            })
        });

        Self {
            total_reviews: total,
            unique_banks,
            sentiment_distribution,
            theme_distribution,
            distinct_themes,
            most_thematic,
            normalization,
            extracted_terms,
            processed_at,
        }
    }

    /// Count for a sentiment label, 0 when absent.
    pub fn sentiment_count(&self, label: SentimentLabel) -> usize {
        self.sentiment_distribution
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.count)
            .unwrap_or(0)
    }

    /// Plain-text report for terminal output.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Analysis summary ({})", self.processed_at);
        let _ = writeln!(out, "  Total reviews analyzed: {}", self.total_reviews);
        let _ = writeln!(out, "  Unique banks: {}", self.unique_banks);
        let _ = writeln!(
            out,
            "  Records dropped: {} of {}",
            self.normalization.total_dropped(),
            self.normalization.original_count
        );
        let _ = writeln!(out, "  Extracted keywords: {}", self.extracted_terms);

        let _ = writeln!(out, "Sentiment:");
        for share in &self.sentiment_distribution {
            let _ = writeln!(
                out,
                "  {:8} {:5} ({:.1}%)",
                share.label.as_str().to_uppercase(),
                share.count,
                share.percentage
            );
        }

        let _ = writeln!(out, "Themes ({} identified):", self.distinct_themes);
        if self.theme_distribution.is_empty() {
            let _ = writeln!(out, "  No themes identified");
        }
        for share in &self.theme_distribution {
            let _ = writeln!(
                out,
                "  {:25} {:5} ({:.1}%)",
                share.theme, share.count, share.percentage
            );
        }

        if let Some(most) = &self.most_thematic {
            let _ = writeln!(
                out,
                "Most thematic review: {} [{}]",
                most.review_id, most.identified_themes
            );
        }
        out
    }
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 10_000.0).round() / 100.0
}
