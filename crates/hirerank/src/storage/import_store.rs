use std::path::PathBuf;

use super::json_file::JsonFile;
use crate::workflows::imports::{CandidateImportJob, ImportId, ImportRepository};
use crate::workflows::scoring::{JobId, OwnerId, RepositoryError};

/// `candidate_imports.json`, keyed by import id.
#[derive(Debug)]
pub struct FileImportRepository {
    file: JsonFile,
}

impl FileImportRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }
}

impl ImportRepository for FileImportRepository {
    fn create(&self, job: CandidateImportJob) -> Result<(), RepositoryError> {
        self.file.modify(|records| {
            let key = job.import_id.to_string();
            if records.contains(&key) {
                return Err(RepositoryError::Conflict);
            }
            records.insert(key, &job)
        })
    }

    fn update(&self, job: CandidateImportJob) -> Result<(), RepositoryError> {
        self.file
            .modify(|records| records.insert(job.import_id.to_string(), &job))
    }

    fn get(
        &self,
        owner_id: &OwnerId,
        job_id: &JobId,
        import_id: &ImportId,
    ) -> Result<Option<CandidateImportJob>, RepositoryError> {
        Ok(self
            .file
            .read()?
            .get::<CandidateImportJob>(import_id.as_str())
            .filter(|job| &job.owner_id == owner_id && &job.job_id == job_id))
    }
}
