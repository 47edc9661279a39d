//! CSV corpus loading.
//!
//! Reads review rows by header name. `review_id` and `review_text` must be
//! present as columns; every other known column is optional and unknown
//! columns are ignored. Empty cells count as missing.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use review_types::RawReview;
use tracing::{debug, info};

use crate::error::AnalysisError;

/// Columns that must appear in the header.
pub const REQUIRED_COLUMNS: &[&str] = &["review_id", "review_text"];

/// Header positions of the known columns.
struct ColumnIndex {
    review_id: usize,
    review_text: usize,
    rating: Option<usize>,
    review_date: Option<usize>,
    bank_code: Option<usize>,
    bank_name: Option<usize>,
    user_name: Option<usize>,
    thumbs_up: Option<usize>,
    reply_content: Option<usize>,
    source: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord, source_name: &str) -> Result<Self, AnalysisError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| AnalysisError::MissingColumn {
                column: name.to_string(),
                source_name: source_name.to_string(),
            })
        };

        Ok(Self {
            review_id: require("review_id")?,
            review_text: require("review_text")?,
            rating: find("rating"),
            review_date: find("review_date"),
            bank_code: find("bank_code"),
            bank_name: find("bank_name"),
            user_name: find("user_name"),
            thumbs_up: find("thumbs_up"),
            reply_content: find("reply_content"),
            source: find("source"),
        })
    }

    fn row(&self, record: &StringRecord) -> RawReview {
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .filter(|value| !value.trim().is_empty())
                .map(String::from)
        };

        RawReview {
            review_id: cell(Some(self.review_id)).unwrap_or_default(),
            review_text: cell(Some(self.review_text)),
            rating: cell(self.rating).and_then(|v| v.trim().parse::<f64>().ok()),
            review_date: cell(self.review_date),
            bank_code: cell(self.bank_code),
            bank_name: cell(self.bank_name),
            user_name: cell(self.user_name),
            thumbs_up: cell(self.thumbs_up).and_then(|v| parse_count(&v)),
            reply_content: cell(self.reply_content),
            source: cell(self.source),
        }
    }
}

/// Parse a helpfulness count, accepting `"3"` and `"3.0"`.
fn parse_count(value: &str) -> Option<u64> {
    let value = value.trim();
    value.parse::<u64>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v as u64)
    })
}

/// Read raw reviews from any CSV source.
///
/// `source_name` labels errors, usually the file path. A row whose field
/// count differs from the header is malformed and fails the whole load.
pub fn read_reviews<R: Read>(reader: R, source_name: &str) -> Result<Vec<RawReview>, AnalysisError> {
    let mut csv_reader = ReaderBuilder::new().from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| AnalysisError::csv(source_name, e))?
        .clone();
    let columns = ColumnIndex::from_headers(&headers, source_name)?;
    debug!(source = source_name, columns = headers.len(), "Read CSV header");

    let mut reviews = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|e| AnalysisError::csv(source_name, e))?;
        reviews.push(columns.row(&record));
    }

    info!(source = source_name, rows = reviews.len(), "Loaded review corpus");
    Ok(reviews)
}

/// Load raw reviews from a CSV file.
pub fn load_reviews(path: impl AsRef<Path>) -> Result<Vec<RawReview>, AnalysisError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AnalysisError::io(path, e))?;
    read_reviews(file, &path.display().to_string())
}
