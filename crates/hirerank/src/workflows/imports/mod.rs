//! Bulk candidate import from recruiter CSV exports.

mod analyzer;
mod domain;
mod mapping;
mod normalizer;
mod parser;
mod repository;
mod service;

pub use analyzer::{AnalyzerError, GitHubAnalyzer, HeuristicGitHubAnalyzer};
pub use domain::{
    CandidateImportJob, CandidateImportPreview, ImportId, ImportRowResult, ImportStatus, RowStatus,
};
pub use mapping::{
    mapping_from_value, parse_mapping, validate_mapping, FieldMapping, REQUIRED_FIELDS,
    SUPPORTED_FIELDS,
};
pub use parser::CsvRow;
pub use repository::{ImportRepository, InMemoryImportRepository};
pub use service::{CandidateImportService, PendingImport};

use crate::workflows::scoring::RepositoryError;

pub const DEFAULT_PREVIEW_ROWS: usize = 5;
pub const MAX_PREVIEW_ROWS: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    InvalidMapping(String),
    #[error("preview_rows must be between 1 and {MAX_PREVIEW_ROWS} (got {0})")]
    InvalidPreviewRows(usize),
    #[error("Import job not found: {0}")]
    NotFound(ImportId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Headers and the first `preview_rows` rows (default 5, at most 50).
pub fn parse_csv_preview(
    csv: &str,
    preview_rows: Option<usize>,
) -> Result<CandidateImportPreview, ImportError> {
    let limit = preview_rows.unwrap_or(DEFAULT_PREVIEW_ROWS);
    if !(1..=MAX_PREVIEW_ROWS).contains(&limit) {
        return Err(ImportError::InvalidPreviewRows(limit));
    }

    let (headers, mut rows) = parse_csv_rows(csv)?;
    rows.truncate(limit);
    Ok(CandidateImportPreview { headers, rows })
}

pub fn parse_csv_rows(csv: &str) -> Result<(Vec<String>, Vec<CsvRow>), ImportError> {
    Ok(parser::parse_table(csv)?)
}
