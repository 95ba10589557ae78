use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tracing::{debug, info};

use super::domain::AnalysisKey;
use super::engine::{compute_score, ScoreResult};
use super::evidence::{GitHubAnalysis, ResumeAnalysis};
use super::repository::{RepositoryError, ScoreResultRepository, ScoringConfigRepository};
use super::state::{AnalysisStateStore, CandidateAnalysisState};
use super::weights::WeightError;

/// Error raised while coordinating evidence into a score.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error(transparent)]
    Configuration(#[from] WeightError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("analysis lock table poisoned")]
    LockPoisoned,
}

/// One mutex per key, created on demand and dropped once nobody holds it.
pub(crate) struct KeyedLocks<K> {
    slots: Mutex<HashMap<K, Arc<Mutex<()>>>>,
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    pub(crate) fn run<T, E>(
        &self,
        key: &K,
        critical: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<ScoringError>,
    {
        let slot = {
            let mut slots = self.slots.lock().map_err(|_| ScoringError::LockPoisoned)?;
            slots
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        let outcome = {
            // The guarded value is `()`, so a panic in another holder leaves
            // nothing inconsistent behind.
            let _held = slot.lock().unwrap_or_else(PoisonError::into_inner);
            critical()
        };

        let mut slots = self.slots.lock().map_err(|_| ScoringError::LockPoisoned)?;
        if slots
            .get(key)
            .is_some_and(|entry| Arc::ptr_eq(entry, &slot) && Arc::strong_count(entry) == 2)
        {
            slots.remove(key);
        }

        outcome
    }

    #[cfg(test)]
    pub(crate) fn active(&self) -> usize {
        self.slots.lock().map(|slots| slots.len()).unwrap_or(0)
    }
}

/// Receives evidence-arrived events and produces a score once a candidate is
/// ready.
///
/// Each event runs load, mutate, readiness check, scoring and persistence as
/// one critical section per [`AnalysisKey`]; events for different keys run
/// concurrently.
pub struct ScoringCoordinator {
    states: Arc<dyn AnalysisStateStore>,
    configs: Arc<dyn ScoringConfigRepository>,
    results: Arc<dyn ScoreResultRepository>,
    locks: KeyedLocks<AnalysisKey>,
}

impl ScoringCoordinator {
    pub fn new(
        states: Arc<dyn AnalysisStateStore>,
        configs: Arc<dyn ScoringConfigRepository>,
        results: Arc<dyn ScoreResultRepository>,
    ) -> Self {
        Self {
            states,
            configs,
            results,
            locks: KeyedLocks::default(),
        }
    }

    pub fn states(&self) -> &Arc<dyn AnalysisStateStore> {
        &self.states
    }

    pub fn configs(&self) -> &Arc<dyn ScoringConfigRepository> {
        &self.configs
    }

    pub fn results(&self) -> &Arc<dyn ScoreResultRepository> {
        &self.results
    }

    /// Record resume evidence together with the profile URL it listed.
    /// Both replace whatever an earlier resume recorded, including a URL
    /// that this resume no longer lists.
    pub fn on_resume_parsed(
        &self,
        key: &AnalysisKey,
        resume: ResumeAnalysis,
        github_url: Option<String>,
    ) -> Result<Option<ScoreResult>, ScoringError> {
        debug!(key = %key.storage_key(), "resume evidence received");
        self.apply(key, move |state| {
            state.resume = Some(resume);
            state.github_url = github_url;
        })
    }

    pub fn on_github_analysis_completed(
        &self,
        key: &AnalysisKey,
        github: GitHubAnalysis,
    ) -> Result<Option<ScoreResult>, ScoringError> {
        debug!(key = %key.storage_key(), "github evidence received");
        self.apply(key, move |state| {
            state.github = Some(github);
        })
    }

    fn apply(
        &self,
        key: &AnalysisKey,
        mutate: impl FnOnce(&mut CandidateAnalysisState),
    ) -> Result<Option<ScoreResult>, ScoringError> {
        self.locks.run(key, || {
            let now = Utc::now();
            let mut state = self.states.get_or_create(key, now)?;
            mutate(&mut state);
            state.updated_at = now;
            self.states.store(state.clone())?;

            let config = self.configs.get(&key.job_id)?;
            if !state.ready_for_scoring(config.github_required) {
                debug!(
                    key = %key.storage_key(),
                    github_required = config.github_required,
                    "waiting for more evidence"
                );
                return Ok(None);
            }

            let result = compute_score(
                &key.candidate_id,
                &key.job_id,
                &config,
                state.resume.as_ref(),
                state.github.as_ref(),
                now,
            )?
            .with_owner(key.owner_id.clone());

            self.results.save(result.clone())?;
            info!(
                key = %key.storage_key(),
                total_score = result.total_score,
                "candidate scored"
            );
            Ok(Some(result))
        })
    }

    #[cfg(test)]
    pub(crate) fn active_locks(&self) -> usize {
        self.locks.active()
    }
}
