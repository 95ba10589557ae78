use std::collections::BTreeMap;
use std::path::PathBuf;

use super::json_file::JsonFile;
use crate::workflows::scoring::{
    CandidateId, JobId, OwnerId, RepositoryError, ScoreResult, ScoreResultRepository,
};

/// `scores.json`, keyed `owner:job:candidate`.
#[derive(Debug)]
pub struct FileScoreResultRepository {
    file: JsonFile,
}

impl FileScoreResultRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }
}

impl ScoreResultRepository for FileScoreResultRepository {
    fn save(&self, result: ScoreResult) -> Result<(), RepositoryError> {
        self.file
            .modify(|records| records.insert(result.storage_key(), &result))
    }

    fn list_by_job(
        &self,
        owner_id: Option<&OwnerId>,
        job_id: &JobId,
    ) -> Result<BTreeMap<CandidateId, ScoreResult>, RepositoryError> {
        let results: Vec<ScoreResult> = self.file.read()?.values();
        Ok(results
            .into_iter()
            .filter(|result| &result.job_id == job_id && result.owner_id.as_ref() == owner_id)
            .map(|result| (result.candidate_id.clone(), result))
            .collect())
    }
}
