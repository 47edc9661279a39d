//! Run artifact export.
//!
//! Writes the result table as CSV and the keyword tables and summary as
//! pretty-printed JSON into one output directory.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::Writer;
use review_types::AnalyzedReview;
use serde::Serialize;
use tracing::info;

use crate::error::AnalysisError;
use crate::pipeline::PipelineOutput;

pub const RESULTS_FILE: &str = "analyzed_reviews.csv";
pub const THEME_KEYWORDS_FILE: &str = "theme_keywords.json";
pub const KEYWORDS_FILE: &str = "extracted_keywords.json";
pub const SUMMARY_FILE: &str = "run_summary.json";

/// Paths of the files written by [`export_run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub results: PathBuf,
    pub theme_keywords: PathBuf,
    pub keywords: PathBuf,
    pub summary: PathBuf,
}

/// Write every artifact of a run into `output_dir`, creating it if needed.
pub fn export_run(output: &PipelineOutput, output_dir: &Path) -> Result<ExportedFiles, AnalysisError> {
    fs::create_dir_all(output_dir).map_err(|e| AnalysisError::io(output_dir, e))?;

    let files = ExportedFiles {
        results: output_dir.join(RESULTS_FILE),
        theme_keywords: output_dir.join(THEME_KEYWORDS_FILE),
        keywords: output_dir.join(KEYWORDS_FILE),
        summary: output_dir.join(SUMMARY_FILE),
    };

    write_results_csv(&output.results, &files.results)?;
    write_json(&output.theme_assignments, &files.theme_keywords)?;
    write_json(&output.terms, &files.keywords)?;
    write_json(&output.summary, &files.summary)?;

    info!(
        dir = %output_dir.display(),
        rows = output.results.len(),
        "Exported run artifacts"
    );
    Ok(files)
}

/// Write the result table with a header row.
pub fn write_results_csv(results: &[AnalyzedReview], path: &Path) -> Result<(), AnalysisError> {
    let file = File::create(path).map_err(|e| AnalysisError::io(path, e))?;
    let source_name = path.display().to_string();
    let mut writer = Writer::from_writer(BufWriter::new(file));

    if results.is_empty() {
        writer
            .write_record(RESULT_COLUMNS)
            .map_err(|e| AnalysisError::csv(&source_name, e))?;
    }
    for row in results {
        writer
            .serialize(row)
            .map_err(|e| AnalysisError::csv(&source_name, e))?;
    }
    writer.flush().map_err(|e| AnalysisError::io(path, e))?;
    Ok(())
}

/// Column order of the result table.
const RESULT_COLUMNS: &[&str] = &[
    "review_id",
    "review_text",
    "sentiment_label",
    "sentiment_score",
    "sentiment_confidence",
    "subjectivity",
    "identified_themes",
    "theme_count",
    "bank_name",
    "processing_timestamp",
];

/// Pretty-print a value as JSON.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), AnalysisError> {
    let file = File::create(path).map_err(|e| AnalysisError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush().map_err(|e| AnalysisError::io(path, e))?;
    Ok(())
}
