use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::dashboard::{
    dashboard_router, ApplicationId, ApplicationRepository, ApplicationStatus,
    CandidateApplication, DashboardService, DashboardState, InMemoryApplicationRepository,
};
use crate::workflows::imports::{
    CandidateImportService, HeuristicGitHubAnalyzer, InMemoryImportRepository,
};
use crate::workflows::scoring::{
    compute_score, CandidateId, GitHubAnalysis, InMemoryAnalysisStateStore,
    InMemoryScoreResultRepository, InMemoryScoringConfigRepository, JobId, OwnerId,
    ResumeAnalysis, ScoreResultRepository, ScoringConfig, ScoringCoordinator,
};

pub(super) const OWNER: &str = "recruiter-a";
pub(super) const JOB: &str = "job-backend";

pub(super) fn owner() -> OwnerId {
    OwnerId::from(OWNER)
}

pub(super) fn job() -> JobId {
    JobId::from(JOB)
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) struct Fixture {
    pub(super) applications: Arc<InMemoryApplicationRepository>,
    pub(super) scores: Arc<InMemoryScoreResultRepository>,
    pub(super) configs: Arc<InMemoryScoringConfigRepository>,
    pub(super) state: DashboardState,
}

impl Fixture {
    pub(super) fn new() -> Self {
        let applications = Arc::new(InMemoryApplicationRepository::default());
        let scores = Arc::new(InMemoryScoreResultRepository::default());
        let configs = Arc::new(InMemoryScoringConfigRepository::default());
        let coordinator = Arc::new(ScoringCoordinator::new(
            Arc::new(InMemoryAnalysisStateStore::default()),
            configs.clone(),
            scores.clone(),
        ));
        let imports = Arc::new(CandidateImportService::new(
            Arc::new(InMemoryImportRepository::default()),
            applications.clone(),
            coordinator,
            Arc::new(HeuristicGitHubAnalyzer),
        ));
        let dashboard = Arc::new(DashboardService::new(applications.clone(), scores.clone()));

        Self {
            applications,
            scores,
            configs: configs.clone(),
            state: DashboardState {
                dashboard,
                imports,
                configs,
            },
        }
    }

    pub(super) fn router(&self) -> axum::Router {
        dashboard_router(self.state.clone())
    }

    /// Seed an application; `code_quality` of `None` leaves it unscored.
    pub(super) fn seed(
        &self,
        index: i64,
        status: ApplicationStatus,
        skills: &[&str],
        code_quality: Option<f64>,
    ) -> CandidateId {
        let candidate_id = CandidateId(format!("cand-{index:02}"));
        self.applications
            .save(CandidateApplication {
                application_id: ApplicationId(format!("app-{index:02}")),
                candidate_id: candidate_id.clone(),
                job_id: job(),
                owner_id: owner(),
                status,
                skills: skills.iter().map(|skill| skill.to_string()).collect(),
                created_at: base_time() + Duration::minutes(index),
            })
            .expect("application saved");

        if let Some(code_quality) = code_quality {
            let github = GitHubAnalysis {
                code_quality_score: code_quality,
                documentation_score: code_quality,
                engineering_practices_score: code_quality,
                projects: Vec::new(),
            };
            let resume = ResumeAnalysis {
                required_skills_matched: 1,
                required_skills_total: 1,
                nice_to_have_matched: 0,
                nice_to_have_total: 0,
                experience_years: 1.0,
                required_experience_years: 0.0,
            };
            let mut config = ScoringConfig::for_job(job());
            // GitHub categories only, so the total equals `code_quality`.
            config.category_weights.resume_skills = 0.0;
            let result = compute_score(
                &candidate_id,
                &job(),
                &config,
                Some(&resume),
                Some(&github),
                base_time(),
            )
            .expect("scores")
            .with_owner(Some(owner()));
            self.scores.save(result).expect("score saved");
        }

        candidate_id
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
