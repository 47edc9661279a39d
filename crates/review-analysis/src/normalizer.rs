//! Record normalization.
//!
//! Turns loosely-filled [`RawReview`] rows into validated [`Review`]
//! records. Nothing here fails: every dropped row is tallied in
//! [`NormalizationStats`] instead.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use review_types::{RawReview, Review, TextConfig};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Author name used when a review has none.
pub const ANONYMOUS_USER: &str = "Anonymous";

/// Date-time layouts tried after RFC 3339.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Date layouts tried last.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%b %d, %Y", "%B %d, %Y"];

/// Tally of what normalization kept and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationStats {
    /// Rows handed in
    pub original_count: usize,
    /// Dropped for a missing id, text, rating or app identifier
    pub dropped_missing: usize,
    /// Dropped because text was empty after whitespace cleanup
    pub dropped_empty_text: usize,
    /// Dropped because text was shorter than the minimum length
    pub dropped_short_text: usize,
    /// Dropped because the rating was outside [1, 5]
    pub dropped_invalid_rating: usize,
    /// Dropped because text fell under the minimum length once URLs and
    /// symbols were stripped
    #[serde(default)]
    pub dropped_short_cleaned: usize,
    /// Kept with a null date because the date did not parse
    pub unparsable_dates: usize,
    /// Rows that survived
    pub retained_count: usize,
}

impl NormalizationStats {
    /// Total rows dropped for any reason.
    pub fn total_dropped(&self) -> usize {
        self.dropped_missing
            + self.dropped_empty_text
            + self.dropped_short_text
            + self.dropped_invalid_rating
            + self.dropped_short_cleaned
    }
}

/// Output of normalization: the cleaned corpus plus its tally.
#[derive(Debug, Clone, Default)]
pub struct NormalizedCorpus {
    pub reviews: Vec<Review>,
    pub stats: NormalizationStats,
}

/// Why a single row was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Missing,
    EmptyText,
    ShortText,
    InvalidRating,
}

/// Validates and cleans raw review rows.
pub struct RecordNormalizer {
    min_review_length: usize,
}

impl RecordNormalizer {
    pub fn new(config: &TextConfig) -> Self {
        Self {
            min_review_length: config.min_review_length,
        }
    }

    /// Normalize a corpus.
    ///
    /// Output is grouped by app identifier, most recent first within each
    /// group, with undated reviews last. The sort is stable.
    pub fn normalize(&self, raw: &[RawReview]) -> NormalizedCorpus {
        let mut stats = NormalizationStats {
            original_count: raw.len(),
            ..Default::default()
        };
        let mut reviews = Vec::with_capacity(raw.len());

        for row in raw {
            match self.normalize_one(row, &mut stats) {
                Ok(review) => reviews.push(review),
                Err(rejection) => match rejection {
                    Rejection::Missing => stats.dropped_missing += 1,
                    Rejection::EmptyText => stats.dropped_empty_text += 1,
                    Rejection::ShortText => stats.dropped_short_text += 1,
                    Rejection::InvalidRating => stats.dropped_invalid_rating += 1,
                },
            }
        }

        reviews.sort_by(|a, b| {
            a.app_id
                .cmp(&b.app_id)
                .then_with(|| match (a.review_date, b.review_date) {
                    (Some(x), Some(y)) => y.cmp(&x),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
        });

        stats.retained_count = reviews.len();

        if stats.total_dropped() > 0 {
            warn!(
                dropped_missing = stats.dropped_missing,
                dropped_empty_text = stats.dropped_empty_text,
                dropped_short_text = stats.dropped_short_text,
                dropped_invalid_rating = stats.dropped_invalid_rating,
                "Dropped invalid review records"
            );
        }
        if stats.unparsable_dates > 0 {
            warn!(
                count = stats.unparsable_dates,
                "Unparsable review dates set to null"
            );
        }
        info!(
            original = stats.original_count,
            retained = stats.retained_count,
            "Normalized review records"
        );

        NormalizedCorpus { reviews, stats }
    }

    /// Drop reviews whose cleaned text is shorter than the minimum length.
    ///
    /// `clean` is the cleanup applied ahead of reduction. Order is kept.
    pub fn drop_short_cleaned<F>(&self, corpus: &mut NormalizedCorpus, clean: F)
    where
        F: Fn(&str) -> String,
    {
        let before = corpus.reviews.len();
        corpus
            .reviews
            .retain(|review| clean(&review.review_text).chars().count() >= self.min_review_length);
        let dropped = before - corpus.reviews.len();

        corpus.stats.dropped_short_cleaned += dropped;
        corpus.stats.retained_count = corpus.reviews.len();
        if dropped > 0 {
            warn!(
                count = dropped,
                min_length = self.min_review_length,
                "Dropped reviews too short after cleanup"
            );
        }
    }

    fn normalize_one(
        &self,
        row: &RawReview,
        stats: &mut NormalizationStats,
    ) -> Result<Review, Rejection> {
        let review_id = row.review_id.trim();
        if review_id.is_empty() {
            return Err(Rejection::Missing);
        }
        let (Some(text), Some(rating), Some(app_id)) =
            (row.review_text.as_deref(), row.rating, row.app_id())
        else {
            return Err(Rejection::Missing);
        };

        let review_text = collapse_whitespace(text);
        if review_text.is_empty() {
            return Err(Rejection::EmptyText);
        }
        let text_length = review_text.chars().count();
        if text_length < self.min_review_length {
            return Err(Rejection::ShortText);
        }

        if !rating.is_finite() || !(1.0..=5.0).contains(&rating) {
            return Err(Rejection::InvalidRating);
        }

        let review_date = match row.review_date.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => {
                let parsed = parse_date(s);
                if parsed.is_none() {
                    stats.unparsable_dates += 1;
                }
                parsed
            }
            _ => None,
        };

        Ok(Review {
            review_id: review_id.to_string(),
            review_text,
            rating,
            review_date,
            review_year: review_date.map(|d| d.year()),
            review_month: review_date.map(|d| d.month()),
            app_id: app_id.to_string(),
            bank_name: non_empty(row.bank_name.as_deref()),
            user_name: non_empty(row.user_name.as_deref())
                .unwrap_or_else(|| ANONYMOUS_USER.to_string()),
            thumbs_up: row.thumbs_up.unwrap_or(0),
            reply_content: row.reply_content.clone().unwrap_or_default(),
            text_length,
            source: non_empty(row.source.as_deref()),
        })
    }
}

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a date permissively; `None` when no known layout matches.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> RecordNormalizer {
        RecordNormalizer::new(&TextConfig::default())
    }

    fn valid(id: &str) -> RawReview {
        RawReview::new(id, "Transfers work well every time").with_rating(4.0).with_bank("CBE", "Commercial Bank of Ethiopia")
    }

    #[test]
    fn test_rating_filter() {
        let raw = vec![
            valid("r-6").with_rating(6.0),
            valid("r-1").with_rating(1.0),
            valid("r-5").with_rating(5.0),
            valid("r-0").with_rating(0.0),
        ];
        let corpus = normalizer().normalize(&raw);
        let ids: Vec<&str> = corpus.reviews.iter().map(|r| r.review_id.as_str()).collect();
        assert!(ids.contains(&"r-1"));
        assert!(ids.contains(&"r-5"));
        assert!(!ids.contains(&"r-6"));
        assert_eq!(corpus.stats.dropped_invalid_rating, 2);
        assert_eq!(corpus.stats.retained_count, 2);
    }

    #[test]
    fn test_missing_critical_fields_dropped() {
        let mut no_text = valid("a");
        no_text.review_text = None;
        let mut no_rating = valid("b");
        no_rating.rating = None;
        let mut no_bank = valid("c");
        no_bank.bank_code = None;
        no_bank.bank_name = None;
        let mut no_id = valid("");
        no_id.review_id = "  ".to_string();

        let corpus = normalizer().normalize(&[no_text, no_rating, no_bank, no_id, valid("d")]);
        assert_eq!(corpus.stats.dropped_missing, 4);
        assert_eq!(corpus.stats.retained_count, 1);
        assert_eq!(corpus.reviews[0].review_id, "d");
    }

    #[test]
    fn test_optional_defaults() {
        let corpus = normalizer().normalize(&[valid("r-1")]);
        let review = &corpus.reviews[0];
        assert_eq!(review.user_name, "Anonymous");
        assert_eq!(review.thumbs_up, 0);
        assert_eq!(review.reply_content, "");
    }

    #[test]
    fn test_whitespace_collapsed_and_trimmed() {
        let raw = RawReview::new("r-1", "  Great \n\n app\t with   fast transfers  ")
            .with_rating(5.0)
            .with_bank("CBE", "CBE");
        let corpus = normalizer().normalize(&[raw]);
        assert_eq!(
            corpus.reviews[0].review_text,
            "Great app with fast transfers"
        );
        assert_eq!(corpus.reviews[0].text_length, 29);
    }

    #[test]
    fn test_empty_and_short_text_dropped() {
        let empty = RawReview::new("e", "   \n ").with_rating(3.0).with_bank("CBE", "CBE");
        let short = RawReview::new("s", "ok").with_rating(3.0).with_bank("CBE", "CBE");
        let corpus = normalizer().normalize(&[empty, short, valid("v")]);
        assert_eq!(corpus.stats.dropped_empty_text, 1);
        assert_eq!(corpus.stats.dropped_short_text, 1);
        assert_eq!(corpus.stats.total_dropped(), 2);
    }

    #[test]
    fn test_unparsable_date_is_kept_as_null() {
        let raw = valid("r-1").with_date("sometime last spring");
        let corpus = normalizer().normalize(&[raw]);
        assert_eq!(corpus.stats.unparsable_dates, 1);
        assert_eq!(corpus.stats.retained_count, 1);
        assert!(corpus.reviews[0].review_date.is_none());
        assert!(corpus.reviews[0].review_year.is_none());
    }

    #[test]
    fn test_date_components_derived() {
        let corpus = normalizer().normalize(&[valid("r-1").with_date("2024-07-15 09:30:00")]);
        let review = &corpus.reviews[0];
        assert_eq!(review.review_date, NaiveDate::from_ymd_opt(2024, 7, 15));
        assert_eq!(review.review_year, Some(2024));
        assert_eq!(review.review_month, Some(7));
    }

    #[test]
    fn test_parse_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(parse_date("2024-03-05"), expected);
        assert_eq!(parse_date("2024/03/05"), expected);
        assert_eq!(parse_date("05/03/2024"), expected);
        assert_eq!(parse_date("2024-03-05T10:00:00Z"), expected);
        assert_eq!(parse_date("Mar 05, 2024"), expected);
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_canonical_ordering() {
        let raw = vec![
            valid("boa-old").with_bank("BOA", "BOA").with_date("2024-01-01"),
            valid("cbe-undated").with_bank("CBE", "CBE"),
            valid("cbe-new").with_bank("CBE", "CBE").with_date("2024-06-01"),
            valid("boa-new").with_bank("BOA", "BOA").with_date("2024-05-01"),
            valid("cbe-old").with_bank("CBE", "CBE").with_date("2023-12-31"),
        ];
        let corpus = normalizer().normalize(&raw);
        let ids: Vec<&str> = corpus.reviews.iter().map(|r| r.review_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["boa-new", "boa-old", "cbe-new", "cbe-old", "cbe-undated"]
        );
    }

    #[test]
    fn test_drop_short_cleaned() {
        let raw = vec![valid("url"), valid("keep")];
        let mut corpus = normalizer().normalize(&raw);
        corpus.reviews[0].review_text = "https://bank.example.com/x ok".to_string();

        let strip = |text: &str| text.replace("https://bank.example.com/x ", "");
        normalizer().drop_short_cleaned(&mut corpus, strip);

        assert_eq!(corpus.reviews.len(), 1);
        assert_eq!(corpus.reviews[0].review_id, "keep");
        assert_eq!(corpus.stats.dropped_short_cleaned, 1);
        assert_eq!(corpus.stats.retained_count, 1);
        assert_eq!(corpus.stats.total_dropped(), 1);
    }

    #[test]
    fn test_empty_corpus() {
        let corpus = normalizer().normalize(&[]);
        assert!(corpus.reviews.is_empty());
        assert_eq!(corpus.stats, NormalizationStats::default());
    }
}
