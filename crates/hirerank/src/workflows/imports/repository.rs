use std::collections::HashMap;
use std::sync::Mutex;

use super::domain::{CandidateImportJob, ImportId};
use crate::workflows::scoring::{JobId, OwnerId, RepositoryError};

/// Storage for import jobs, partitioned by owner and job.
pub trait ImportRepository: Send + Sync {
    fn create(&self, job: CandidateImportJob) -> Result<(), RepositoryError>;
    fn update(&self, job: CandidateImportJob) -> Result<(), RepositoryError>;
    fn get(
        &self,
        owner_id: &OwnerId,
        job_id: &JobId,
        import_id: &ImportId,
    ) -> Result<Option<CandidateImportJob>, RepositoryError>;
}

#[derive(Debug, Default)]
pub struct InMemoryImportRepository {
    jobs: Mutex<HashMap<ImportId, CandidateImportJob>>,
}

impl ImportRepository for InMemoryImportRepository {
    fn create(&self, job: CandidateImportJob) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.lock().map_err(|_| RepositoryError::Poisoned)?;
        if jobs.contains_key(&job.import_id) {
            return Err(RepositoryError::Conflict);
        }
        jobs.insert(job.import_id.clone(), job);
        Ok(())
    }

    fn update(&self, job: CandidateImportJob) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.lock().map_err(|_| RepositoryError::Poisoned)?;
        jobs.insert(job.import_id.clone(), job);
        Ok(())
    }

    fn get(
        &self,
        owner_id: &OwnerId,
        job_id: &JobId,
        import_id: &ImportId,
    ) -> Result<Option<CandidateImportJob>, RepositoryError> {
        let jobs = self.jobs.lock().map_err(|_| RepositoryError::Poisoned)?;
        Ok(jobs
            .get(import_id)
            .filter(|job| &job.owner_id == owner_id && &job.job_id == job_id)
            .cloned())
    }
}
