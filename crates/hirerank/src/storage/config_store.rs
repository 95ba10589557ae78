use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::json_file::JsonFile;
use crate::workflows::scoring::{
    CategoryWeights, JobId, RepositoryError, ResumeSubWeights, ScoringConfig,
    ScoringConfigRepository,
};

/// On-disk shape: category weights as rounded percentages.
#[derive(Debug, Serialize, Deserialize)]
struct StoredConfig {
    job_id: JobId,
    category_weights: CategoryWeights,
    #[serde(default)]
    resume_subweights: ResumeSubWeights,
    #[serde(default)]
    github_required: bool,
}

/// `scoring_configs.json`, keyed by job id.
#[derive(Debug)]
pub struct FileScoringConfigRepository {
    file: JsonFile,
}

impl FileScoringConfigRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }
}

impl ScoringConfigRepository for FileScoringConfigRepository {
    fn get(&self, job_id: &JobId) -> Result<ScoringConfig, RepositoryError> {
        let defaults = || ScoringConfig::for_job(job_id.clone());
        let Some(stored) = self.file.read()?.get::<StoredConfig>(job_id.as_str()) else {
            return Ok(defaults());
        };

        let config = ScoringConfig {
            job_id: job_id.clone(),
            category_weights: CategoryWeights::from_percentages(&stored.category_weights),
            resume_subweights: stored.resume_subweights,
            github_required: stored.github_required,
        };
        match config.normalized() {
            Ok(normalized) => Ok(normalized),
            Err(err) => {
                warn!(job_id = %job_id, error = %err, "stored scoring config invalid; using defaults");
                Ok(defaults())
            }
        }
    }

    fn save(&self, config: ScoringConfig) -> Result<ScoringConfig, RepositoryError> {
        let normalized = config.normalized()?;
        let stored = StoredConfig {
            job_id: normalized.job_id.clone(),
            category_weights: normalized.category_weights.as_percentages()?,
            resume_subweights: normalized.resume_subweights,
            github_required: normalized.github_required,
        };
        self.file
            .modify(|records| records.insert(stored.job_id.to_string(), &stored))?;
        Ok(normalized)
    }
}
