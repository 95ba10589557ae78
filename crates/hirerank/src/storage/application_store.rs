use std::path::PathBuf;

use super::json_file::JsonFile;
use crate::workflows::dashboard::{ApplicationRepository, CandidateApplication};
use crate::workflows::scoring::{JobId, OwnerId, RepositoryError};

/// `applications.json`, keyed by application id.
#[derive(Debug)]
pub struct FileApplicationRepository {
    file: JsonFile,
}

impl FileApplicationRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }
}

impl ApplicationRepository for FileApplicationRepository {
    fn save(&self, application: CandidateApplication) -> Result<(), RepositoryError> {
        self.file.modify(|records| {
            records.insert(application.application_id.to_string(), &application)
        })
    }

    fn list_by_job(
        &self,
        owner_id: &OwnerId,
        job_id: &JobId,
    ) -> Result<Vec<CandidateApplication>, RepositoryError> {
        let applications: Vec<CandidateApplication> = self.file.read()?.values();
        Ok(applications
            .into_iter()
            .filter(|application| &application.owner_id == owner_id && &application.job_id == job_id)
            .collect())
    }
}
