use std::sync::Mutex;

use super::domain::CandidateApplication;
use crate::workflows::scoring::{JobId, OwnerId, RepositoryError};

/// Storage for candidate applications, partitioned by owner.
pub trait ApplicationRepository: Send + Sync {
    fn save(&self, application: CandidateApplication) -> Result<(), RepositoryError>;
    fn list_by_job(
        &self,
        owner_id: &OwnerId,
        job_id: &JobId,
    ) -> Result<Vec<CandidateApplication>, RepositoryError>;
}

#[derive(Debug, Default)]
pub struct InMemoryApplicationRepository {
    applications: Mutex<Vec<CandidateApplication>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn save(&self, application: CandidateApplication) -> Result<(), RepositoryError> {
        let mut applications = self
            .applications
            .lock()
            .map_err(|_| RepositoryError::Poisoned)?;
        match applications
            .iter_mut()
            .find(|existing| existing.application_id == application.application_id)
        {
            Some(existing) => *existing = application,
            None => applications.push(application),
        }
        Ok(())
    }

    fn list_by_job(
        &self,
        owner_id: &OwnerId,
        job_id: &JobId,
    ) -> Result<Vec<CandidateApplication>, RepositoryError> {
        let applications = self
            .applications
            .lock()
            .map_err(|_| RepositoryError::Poisoned)?;
        Ok(applications
            .iter()
            .filter(|application| &application.owner_id == owner_id && &application.job_id == job_id)
            .cloned()
            .collect())
    }
}
