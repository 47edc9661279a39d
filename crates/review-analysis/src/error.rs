//! Error types for the analysis pipeline.

use std::path::PathBuf;

use review_types::ReviewError;
use thiserror::Error;

/// Fatal errors that abort a pipeline run.
///
/// Record-level problems never surface here; they are tallied in
/// [`NormalizationStats`](crate::normalizer::NormalizationStats).
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A required input column is absent
    #[error("Missing required column '{column}' in {source_name}")]
    MissingColumn { column: String, source_name: String },

    /// Input or output file could not be accessed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV content
    #[error("CSV error in {source_name}: {message}")]
    Csv {
        source_name: String,
        message: String,
    },

    /// JSON encoding errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid analysis configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A theme pattern failed to compile
    #[error("Invalid pattern '{pattern}' in theme '{theme}': {message}")]
    InvalidPattern {
        theme: String,
        pattern: String,
        message: String,
    },
}

impl AnalysisError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(source_name: &str, err: csv::Error) -> Self {
        AnalysisError::Csv {
            source_name: source_name.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<ReviewError> for AnalysisError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::Config(msg) => AnalysisError::InvalidConfig(msg),
        }
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalysisError::MissingColumn {
            column: "review_text".to_string(),
            source_name: "reviews.csv".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing required column 'review_text' in reviews.csv"
        );

        let err = AnalysisError::InvalidPattern {
            theme: "FEES".to_string(),
            pattern: "(".to_string(),
            message: "unclosed group".to_string(),
        };
        assert!(err.to_string().contains("FEES"));
    }

    #[test]
    fn test_io_error_names_path() {
        let err = AnalysisError::io(
            "data/missing.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.to_string().contains("data/missing.csv"));
    }

    #[test]
    fn test_from_review_error() {
        let err: AnalysisError = ReviewError::Config("bad".to_string()).into();
        assert!(matches!(err, AnalysisError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_serde_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: AnalysisError = json_err.into();
        assert!(matches!(err, AnalysisError::Serialization(_)));
    }
}
