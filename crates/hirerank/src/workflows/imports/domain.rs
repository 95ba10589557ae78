use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::mapping::FieldMapping;
use super::parser::CsvRow;
use crate::workflows::scoring::domain::string_id;
use crate::workflows::scoring::{CandidateId, JobId, OwnerId};

string_id!(
    /// Identifier of a candidate import job.
    ImportId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Success,
    Failed,
}

/// Outcome of importing a single CSV row. Row numbers start at 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRowResult {
    pub row_number: usize,
    pub status: RowStatus,
    #[serde(default)]
    pub candidate_id: Option<CandidateId>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ImportRowResult {
    pub(crate) fn success(row_number: usize, candidate_id: CandidateId) -> Self {
        Self {
            row_number,
            status: RowStatus::Success,
            candidate_id: Some(candidate_id),
            errors: Vec::new(),
        }
    }

    pub(crate) fn failed(row_number: usize, errors: Vec<String>) -> Self {
        Self {
            row_number,
            status: RowStatus::Failed,
            candidate_id: None,
            errors,
        }
    }
}

/// Progress record of one bulk import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateImportJob {
    pub import_id: ImportId,
    pub owner_id: OwnerId,
    pub job_id: JobId,
    pub status: ImportStatus,
    pub headers: Vec<String>,
    pub mapping: FieldMapping,
    pub total_rows: usize,
    pub processed_rows: usize,
    pub success_count: usize,
    pub failure_count: usize,
    #[serde(default)]
    pub results: Vec<ImportRowResult>,
    #[serde(default)]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CandidateImportJob {
    pub(crate) fn record(&mut self, result: ImportRowResult, now: DateTime<Utc>) {
        self.processed_rows += 1;
        match result.status {
            RowStatus::Success => self.success_count += 1,
            RowStatus::Failed => self.failure_count += 1,
        }
        self.results.push(result);
        self.updated_at = now;
    }

    pub(crate) fn transition(&mut self, status: ImportStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateImportPreview {
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
}
