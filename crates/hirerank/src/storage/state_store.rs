use std::path::PathBuf;

use chrono::{DateTime, Utc};

use super::json_file::JsonFile;
use crate::workflows::scoring::{
    AnalysisKey, AnalysisStateStore, CandidateAnalysisState, RepositoryError,
};

/// `analysis_state.json`: evidence staged until a candidate is scored.
#[derive(Debug)]
pub struct FileAnalysisStateStore {
    file: JsonFile,
}

impl FileAnalysisStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }
}

impl AnalysisStateStore for FileAnalysisStateStore {
    fn load(&self, key: &AnalysisKey) -> Result<Option<CandidateAnalysisState>, RepositoryError> {
        Ok(self.file.read()?.get(&key.storage_key()))
    }

    fn store(&self, state: CandidateAnalysisState) -> Result<(), RepositoryError> {
        self.file
            .modify(|records| records.insert(state.key.storage_key(), &state))
    }

    fn purge_stale(&self, cutoff: DateTime<Utc>) -> Result<usize, RepositoryError> {
        self.file.modify(|records| {
            Ok(records.retain(|state: &CandidateAnalysisState| state.updated_at >= cutoff))
        })
    }
}
