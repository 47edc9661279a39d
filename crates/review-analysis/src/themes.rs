//! Rule-based theme classification.
//!
//! Two steps:
//! 1. [`ThemeClassifier::assign_terms`] puts every extracted term into
//!    exactly one theme bucket, the first configured category with a
//!    matching pattern, or `OTHER`.
//! 2. [`ThemeMatcher::score_review`] scores a review against each bucket's
//!    top terms and keeps the best-scoring themes.
//!
//! Category order is the tie-break in both steps.

use regex::{Regex, RegexBuilder};
use review_types::{ReviewThemes, ThemeConfig, OTHER_THEME};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::batch::map_batched;
use crate::error::AnalysisError;
use crate::tfidf::{TermImportance, TermImportanceTable};

struct CompiledCategory {
    name: String,
    patterns: Vec<Regex>,
}

/// Terms assigned to one theme, by descending weight.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeBucket {
    pub name: String,
    pub terms: Vec<TermImportance>,
}

/// Non-empty theme buckets in category order, `OTHER` last.
///
/// Serializes as an ordered `theme -> [{keyword, tfidf_score, frequency}]`
/// object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeAssignments {
    buckets: Vec<ThemeBucket>,
}

impl ThemeAssignments {
    pub fn buckets(&self) -> &[ThemeBucket] {
        &self.buckets
    }

    pub fn get(&self, theme: &str) -> Option<&ThemeBucket> {
        self.buckets.iter().find(|b| b.name == theme)
    }

    pub fn theme_names(&self) -> Vec<&str> {
        self.buckets.iter().map(|b| b.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Theme a term landed in, if it survived truncation.
    pub fn theme_of(&self, term: &str) -> Option<&str> {
        self.buckets
            .iter()
            .find(|b| b.terms.iter().any(|t| t.term == term))
            .map(|b| b.name.as_str())
    }
}

impl Serialize for ThemeAssignments {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for bucket in &self.buckets {
            map.serialize_entry(&bucket.name, &bucket.terms)?;
        }
        map.end()
    }
}

/// Assigns extracted terms to theme categories.
pub struct ThemeClassifier {
    categories: Vec<CompiledCategory>,
    max_keywords_per_theme: usize,
}

impl ThemeClassifier {
    /// Compile every category pattern, case-insensitive.
    pub fn new(config: &ThemeConfig) -> Result<Self, AnalysisError> {
        let categories = config
            .categories
            .iter()
            .map(|category| {
                let patterns = category
                    .patterns
                    .iter()
                    .map(|pattern| {
                        RegexBuilder::new(pattern)
                            .case_insensitive(true)
                            .build()
                            .map_err(|e| AnalysisError::InvalidPattern {
                                theme: category.name.clone(),
                                pattern: pattern.clone(),
                                message: e.to_string(),
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok::<_, AnalysisError>(CompiledCategory {
                    name: category.name.clone(),
                    patterns,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            categories,
            max_keywords_per_theme: config.max_keywords_per_theme,
        })
    }

    /// First category whose patterns match the term, else `OTHER`.
    pub fn classify_term(&self, term: &str) -> &str {
        self.categories
            .iter()
            .find(|c| c.patterns.iter().any(|p| p.is_match(term)))
            .map(|c| c.name.as_str())
            .unwrap_or(OTHER_THEME)
    }

    /// Bucket every term of the table.
    pub fn assign_terms(&self, table: &TermImportanceTable) -> ThemeAssignments {
        // One slot per category plus OTHER at the end
        let mut slots: Vec<Vec<TermImportance>> = vec![Vec::new(); self.categories.len() + 1];

        for entry in table {
            let slot = self
                .categories
                .iter()
                .position(|c| c.patterns.iter().any(|p| p.is_match(&entry.term)))
                .unwrap_or(self.categories.len());
            debug!(term = %entry.term, theme = self.slot_name(slot), "Assigned term");
            slots[slot].push(entry.clone());
        }

        let buckets: Vec<ThemeBucket> = slots
            .into_iter()
            .enumerate()
            .filter(|(_, terms)| !terms.is_empty())
            .map(|(slot, mut terms)| {
                terms.sort_by(|a, b| {
                    b.weight
                        .partial_cmp(&a.weight)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                terms.truncate(self.max_keywords_per_theme);
                ThemeBucket {
                    name: self.slot_name(slot).to_string(),
                    terms,
                }
            })
            .collect();

        info!(
            terms = table.len(),
            themes = buckets.len(),
            "Assigned terms to themes"
        );
        ThemeAssignments { buckets }
    }

    fn slot_name(&self, slot: usize) -> &str {
        self.categories
            .get(slot)
            .map(|c| c.name.as_str())
            .unwrap_or(OTHER_THEME)
    }
}

struct ThemeTerms {
    name: String,
    /// (whole-word matcher, weight * ln(1 + df))
    terms: Vec<(Regex, f64)>,
}

/// Scores reviews against assigned theme terms.
pub struct ThemeMatcher {
    themes: Vec<ThemeTerms>,
    max_themes_per_review: usize,
    batch_size: usize,
}

impl ThemeMatcher {
    /// Build whole-word matchers for the top terms of every theme
    /// except `OTHER`.
    pub fn new(assignments: &ThemeAssignments, config: &ThemeConfig) -> Result<Self, AnalysisError> {
        let mut themes = Vec::new();
        for bucket in assignments.buckets() {
            if bucket.name == OTHER_THEME {
                continue;
            }
            let mut terms = Vec::new();
            for entry in bucket.terms.iter().take(config.match_top_n) {
                let pattern = format!(r"\b{}\b", regex::escape(&entry.term));
                let regex = Regex::new(&pattern).map_err(|e| AnalysisError::InvalidPattern {
                    theme: bucket.name.clone(),
                    pattern,
                    message: e.to_string(),
                })?;
                let relevance = entry.weight * (entry.document_frequency as f64).ln_1p();
                terms.push((regex, relevance));
            }
            themes.push(ThemeTerms {
                name: bucket.name.clone(),
                terms,
            });
        }

        Ok(Self {
            themes,
            max_themes_per_review: config.max_themes_per_review,
            batch_size: 1000,
        })
    }

    /// Set the number of reviews per parallel batch.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Score one review.
    ///
    /// A term counts when it appears as a whole word in the lower-cased
    /// review text or in its reduced form.
    pub fn score_review(&self, text: &str, reduced: &str) -> ReviewThemes {
        let lowered = text.to_lowercase();

        let mut candidates: Vec<(&str, f64)> = self
            .themes
            .iter()
            .map(|theme| {
                let score: f64 = theme
                    .terms
                    .iter()
                    .filter(|(regex, _)| regex.is_match(&lowered) || regex.is_match(reduced))
                    .map(|(_, relevance)| relevance)
                    .sum();
                (theme.name.as_str(), score)
            })
            .filter(|(_, score)| *score > 0.0)
            .collect();

        // Stable: ties keep category order
        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        ReviewThemes::from_ranked(
            candidates
                .into_iter()
                .take(self.max_themes_per_review)
                .map(|(name, _)| name.to_string())
                .collect(),
        )
    }

    /// Score `(text, reduced)` pairs, preserving input order.
    pub fn score_batch(&self, reviews: &[(&str, &str)]) -> Vec<ReviewThemes> {
        let results = map_batched(reviews, self.batch_size, |(text, reduced)| {
            self.score_review(text, reduced)
        });
        let general = results.iter().filter(|t| t.is_general()).count();
        info!(
            reviews = results.len(),
            general,
            "Scored reviews against themes"
        );
        results
    }
}
