//! Review record types.
//!
//! [`RawReview`] is the loosely-filled row handed over by the ingestion
//! side. [`Review`] is the validated schema every later stage consumes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A review row as supplied by the acquisition collaborator.
///
/// Only `review_id` is mandatory. Everything else may be absent and is
/// checked once, at the normalization boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReview {
    /// Unique, stable identifier
    pub review_id: String,
    /// Free text of the review
    #[serde(default)]
    pub review_text: Option<String>,
    /// Star rating, expected within 1..=5
    #[serde(default)]
    pub rating: Option<f64>,
    /// Submission date as an unparsed string
    #[serde(default)]
    pub review_date: Option<String>,
    /// Short code of the reviewed app
    #[serde(default)]
    pub bank_code: Option<String>,
    /// Display name of the reviewed app
    #[serde(default)]
    pub bank_name: Option<String>,
    /// Author display name
    #[serde(default)]
    pub user_name: Option<String>,
    /// Helpfulness votes
    #[serde(default)]
    pub thumbs_up: Option<u64>,
    /// Developer reply
    #[serde(default)]
    pub reply_content: Option<String>,
    /// Platform the review came from
    #[serde(default)]
    pub source: Option<String>,
}

impl RawReview {
    /// Create a raw review with an identifier and text.
    pub fn new(review_id: impl Into<String>, review_text: impl Into<String>) -> Self {
        Self {
            review_id: review_id.into(),
            review_text: Some(review_text.into()),
            ..Default::default()
        }
    }

    /// Set the rating.
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Set both bank code and bank name.
    pub fn with_bank(mut self, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.bank_code = Some(code.into());
        self.bank_name = Some(name.into());
        self
    }

    /// Set the unparsed submission date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.review_date = Some(date.into());
        self
    }

    /// Set the author display name.
    pub fn with_user(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    /// Set the helpfulness count.
    pub fn with_thumbs_up(mut self, thumbs_up: u64) -> Self {
        self.thumbs_up = Some(thumbs_up);
        self
    }

    /// App identifier: bank code, falling back to bank name.
    ///
    /// Blank strings count as absent.
    pub fn app_id(&self) -> Option<&str> {
        non_blank(self.bank_code.as_deref()).or_else(|| non_blank(self.bank_name.as_deref()))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// A validated review record.
///
/// Invariants: `review_text` is whitespace-collapsed, trimmed and at least
/// the configured minimum length; `rating` lies within [1, 5].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Unique, stable identifier
    pub review_id: String,
    /// Normalized review text
    pub review_text: String,
    /// Star rating in [1, 5]
    pub rating: f64,
    /// Parsed submission date, `None` when absent or unparsable
    pub review_date: Option<NaiveDate>,
    /// Year derived from `review_date`
    pub review_year: Option<i32>,
    /// Month derived from `review_date`
    pub review_month: Option<u32>,
    /// App identifier used for grouping
    pub app_id: String,
    /// Display name of the reviewed app
    pub bank_name: Option<String>,
    /// Author display name, "Anonymous" when absent
    pub user_name: String,
    /// Helpfulness votes, 0 when absent
    pub thumbs_up: u64,
    /// Developer reply, empty when absent
    pub reply_content: String,
    /// Length of `review_text` in characters
    pub text_length: usize,
    /// Platform the review came from
    pub source: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_review_builder() {
        let raw = RawReview::new("r-1", "Fast transfers")
            .with_rating(5.0)
            .with_bank("CBE", "Commercial Bank")
            .with_date("2024-03-01")
            .with_user("abebe")
            .with_thumbs_up(4);

        assert_eq!(raw.review_id, "r-1");
        assert_eq!(raw.review_text.as_deref(), Some("Fast transfers"));
        assert_eq!(raw.rating, Some(5.0));
        assert_eq!(raw.bank_code.as_deref(), Some("CBE"));
        assert_eq!(raw.thumbs_up, Some(4));
    }

    #[test]
    fn test_app_id_prefers_code() {
        let raw = RawReview::new("r-1", "text").with_bank("BOA", "Bank of Abyssinia");
        assert_eq!(raw.app_id(), Some("BOA"));
    }

    #[test]
    fn test_app_id_falls_back_to_name() {
        let mut raw = RawReview::new("r-1", "text");
        raw.bank_code = Some("   ".to_string());
        raw.bank_name = Some("Dashen Bank".to_string());
        assert_eq!(raw.app_id(), Some("Dashen Bank"));
    }

    #[test]
    fn test_app_id_missing() {
        let raw = RawReview::new("r-1", "text");
        assert_eq!(raw.app_id(), None);
    }

    #[test]
    fn test_raw_review_deserialize_partial() {
        let raw: RawReview =
            serde_json::from_str(r#"{"review_id":"r-9","review_text":"hello there"}"#).unwrap();
        assert_eq!(raw.review_id, "r-9");
        assert!(raw.rating.is_none());
        assert!(raw.bank_name.is_none());
    }
}
