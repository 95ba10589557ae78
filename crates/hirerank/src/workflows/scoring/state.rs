use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::AnalysisKey;
use super::evidence::{GitHubAnalysis, ResumeAnalysis};
use super::repository::RepositoryError;

/// Evidence accumulated so far for one candidate/job pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateAnalysisState {
    #[serde(flatten)]
    pub key: AnalysisKey,
    #[serde(default)]
    pub resume: Option<ResumeAnalysis>,
    #[serde(default)]
    pub github: Option<GitHubAnalysis>,
    #[serde(default)]
    pub github_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl CandidateAnalysisState {
    pub fn new(key: AnalysisKey, now: DateTime<Utc>) -> Self {
        Self {
            key,
            resume: None,
            github: None,
            github_url: None,
            updated_at: now,
        }
    }

    fn has_github_url(&self) -> bool {
        self.github_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    /// Whether enough evidence has arrived to produce a final score.
    ///
    /// A supplied profile URL means GitHub evidence is expected, so the
    /// resume alone is not enough even when the job does not require it.
    pub fn ready_for_scoring(&self, github_required: bool) -> bool {
        if self.resume.is_none() {
            return false;
        }
        if self.github.is_some() {
            return true;
        }
        !github_required && !self.has_github_url()
    }
}

/// Storage for in-flight evidence, keyed by [`AnalysisKey`].
pub trait AnalysisStateStore: Send + Sync {
    fn load(&self, key: &AnalysisKey) -> Result<Option<CandidateAnalysisState>, RepositoryError>;
    fn store(&self, state: CandidateAnalysisState) -> Result<(), RepositoryError>;
    /// Drop states not updated since `cutoff`, returning how many were removed.
    fn purge_stale(&self, cutoff: DateTime<Utc>) -> Result<usize, RepositoryError>;

    fn get_or_create(
        &self,
        key: &AnalysisKey,
        now: DateTime<Utc>,
    ) -> Result<CandidateAnalysisState, RepositoryError> {
        Ok(self
            .load(key)?
            .unwrap_or_else(|| CandidateAnalysisState::new(key.clone(), now)))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryAnalysisStateStore {
    states: Mutex<HashMap<AnalysisKey, CandidateAnalysisState>>,
}

impl InMemoryAnalysisStateStore {
    pub fn len(&self) -> usize {
        self.states.lock().map(|states| states.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AnalysisStateStore for InMemoryAnalysisStateStore {
    fn load(&self, key: &AnalysisKey) -> Result<Option<CandidateAnalysisState>, RepositoryError> {
        let states = self.states.lock().map_err(|_| RepositoryError::Poisoned)?;
        Ok(states.get(key).cloned())
    }

    fn store(&self, state: CandidateAnalysisState) -> Result<(), RepositoryError> {
        let mut states = self.states.lock().map_err(|_| RepositoryError::Poisoned)?;
        states.insert(state.key.clone(), state);
        Ok(())
    }

    fn purge_stale(&self, cutoff: DateTime<Utc>) -> Result<usize, RepositoryError> {
        let mut states = self.states.lock().map_err(|_| RepositoryError::Poisoned)?;
        let before = states.len();
        states.retain(|_, state| state.updated_at >= cutoff);
        Ok(before - states.len())
    }
}
