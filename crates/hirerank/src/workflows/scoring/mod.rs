//! Candidate scoring core.
//!
//! Evidence about a candidate arrives from two producers in any order: a resume
//! parser and a code-hosting profile analyzer. The [`ScoringCoordinator`]
//! accumulates it per owner/job/candidate, decides when enough has arrived,
//! and runs [`compute_score`] against the job's [`ScoringConfig`]. The engine
//! itself is pure and degrades gracefully when evidence is missing.

pub mod coordinator;
pub mod domain;
pub mod engine;
pub mod evidence;
pub mod repository;
pub mod state;
pub mod weights;

#[cfg(test)]
mod tests;

pub use coordinator::{ScoringCoordinator, ScoringError};
pub use domain::{AnalysisKey, CandidateId, JobId, OwnerId};
pub use engine::{compute_score, ScoreBreakdown, ScoreCategory, ScoreComponent, ScoreResult};
pub use evidence::{GitHubAnalysis, ProjectAnalysis, ResumeAnalysis};
pub use repository::{
    InMemoryScoreResultRepository, InMemoryScoringConfigRepository, RepositoryError,
    ScoreResultRepository, ScoringConfigRepository,
};
pub use state::{AnalysisStateStore, CandidateAnalysisState, InMemoryAnalysisStateStore};
pub use weights::{CategoryWeights, ResumeSubWeights, ScoringConfig, WeightError};
