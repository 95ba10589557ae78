use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use super::domain::{CandidateId, JobId, OwnerId};
use super::engine::ScoreResult;
use super::weights::{ScoringConfig, WeightError};

/// Per-job scoring policy storage.
pub trait ScoringConfigRepository: Send + Sync {
    /// Stored config for `job_id`, or the defaults when none was saved.
    /// Both weight sets come back normalized to sum to 1.
    fn get(&self, job_id: &JobId) -> Result<ScoringConfig, RepositoryError>;
    /// Replace the config for its job and return it normalized. Invalid
    /// weights are rejected.
    fn save(&self, config: ScoringConfig) -> Result<ScoringConfig, RepositoryError>;
}

/// Final score storage. A save replaces any earlier result for the same
/// owner/job/candidate.
pub trait ScoreResultRepository: Send + Sync {
    fn save(&self, result: ScoreResult) -> Result<(), RepositoryError>;
    fn list_by_job(
        &self,
        owner_id: Option<&OwnerId>,
        job_id: &JobId,
    ) -> Result<BTreeMap<CandidateId, ScoreResult>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error(transparent)]
    InvalidConfiguration(#[from] WeightError),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("failed to serialize records: {0}")]
    Serialization(String),
    #[error("repository lock poisoned")]
    Poisoned,
}

impl From<std::io::Error> for RepositoryError {
    fn from(error: std::io::Error) -> Self {
        Self::Unavailable(error.to_string())
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryScoringConfigRepository {
    configs: Mutex<HashMap<JobId, ScoringConfig>>,
}

impl ScoringConfigRepository for InMemoryScoringConfigRepository {
    fn get(&self, job_id: &JobId) -> Result<ScoringConfig, RepositoryError> {
        let configs = self.configs.lock().map_err(|_| RepositoryError::Poisoned)?;
        Ok(configs
            .get(job_id)
            .cloned()
            .unwrap_or_else(|| ScoringConfig::for_job(job_id.clone())))
    }

    fn save(&self, config: ScoringConfig) -> Result<ScoringConfig, RepositoryError> {
        let normalized = config.normalized()?;
        let mut configs = self.configs.lock().map_err(|_| RepositoryError::Poisoned)?;
        configs.insert(normalized.job_id.clone(), normalized.clone());
        Ok(normalized)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryScoreResultRepository {
    results: Mutex<HashMap<String, ScoreResult>>,
}

impl InMemoryScoreResultRepository {
    pub fn len(&self) -> usize {
        self.results.lock().map(|results| results.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ScoreResultRepository for InMemoryScoreResultRepository {
    fn save(&self, result: ScoreResult) -> Result<(), RepositoryError> {
        let mut results = self.results.lock().map_err(|_| RepositoryError::Poisoned)?;
        results.insert(result.storage_key(), result);
        Ok(())
    }

    fn list_by_job(
        &self,
        owner_id: Option<&OwnerId>,
        job_id: &JobId,
    ) -> Result<BTreeMap<CandidateId, ScoreResult>, RepositoryError> {
        let results = self.results.lock().map_err(|_| RepositoryError::Poisoned)?;
        Ok(filter_by_job(results.values(), owner_id, job_id))
    }
}

fn filter_by_job<'a>(
    results: impl Iterator<Item = &'a ScoreResult>,
    owner_id: Option<&OwnerId>,
    job_id: &JobId,
) -> BTreeMap<CandidateId, ScoreResult> {
    results
        .filter(|result| &result.job_id == job_id && result.owner_id.as_ref() == owner_id)
        .map(|result| (result.candidate_id.clone(), result.clone()))
        .collect()
}
