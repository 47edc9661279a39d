//! Error types for the review analyzer.

use thiserror::Error;

/// Unified error type for shared review operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
