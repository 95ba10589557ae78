use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::workflows::scoring::{
    AnalysisKey, CandidateId, GitHubAnalysis, InMemoryAnalysisStateStore,
    InMemoryScoreResultRepository, InMemoryScoringConfigRepository, JobId, OwnerId,
    ProjectAnalysis, ResumeAnalysis, ScoringConfig, ScoringCoordinator,
};

pub(super) const EPSILON: f64 = 1e-9;

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn scored_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn candidate() -> CandidateId {
    CandidateId::from("cand-001")
}

pub(super) fn job() -> JobId {
    JobId::from("job-backend")
}

pub(super) fn key() -> AnalysisKey {
    AnalysisKey::new(Some(OwnerId::from("recruiter-a")), job(), candidate())
}

pub(super) fn key_for(candidate_id: &str) -> AnalysisKey {
    AnalysisKey::new(
        Some(OwnerId::from("recruiter-a")),
        job(),
        CandidateId::from(candidate_id),
    )
}

/// 3/5 required skills, 2 of 4 years, no nice-to-have data.
pub(super) fn resume() -> ResumeAnalysis {
    ResumeAnalysis {
        required_skills_matched: 3,
        required_skills_total: 5,
        nice_to_have_matched: 0,
        nice_to_have_total: 0,
        experience_years: 2.0,
        required_experience_years: 4.0,
    }
}

pub(super) fn github(code_quality: f64) -> GitHubAnalysis {
    GitHubAnalysis {
        code_quality_score: code_quality,
        documentation_score: 70.0,
        engineering_practices_score: 65.0,
        projects: vec![ProjectAnalysis {
            originality_score: Some(75.0),
            ..ProjectAnalysis::default()
        }],
    }
}

pub(super) fn config(github_required: bool) -> ScoringConfig {
    let mut config = ScoringConfig::for_job(job());
    config.github_required = github_required;
    config
}

pub(super) struct Harness {
    pub(super) coordinator: ScoringCoordinator,
    pub(super) states: Arc<InMemoryAnalysisStateStore>,
    pub(super) configs: Arc<InMemoryScoringConfigRepository>,
    pub(super) results: Arc<InMemoryScoreResultRepository>,
}

pub(super) fn harness() -> Harness {
    let states = Arc::new(InMemoryAnalysisStateStore::default());
    let configs = Arc::new(InMemoryScoringConfigRepository::default());
    let results = Arc::new(InMemoryScoreResultRepository::default());
    let coordinator = ScoringCoordinator::new(states.clone(), configs.clone(), results.clone());
    Harness {
        coordinator,
        states,
        configs,
        results,
    }
}
