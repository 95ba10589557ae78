use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::scoring::domain::string_id;
use crate::workflows::scoring::{CandidateId, JobId, OwnerId, ScoreBreakdown};

string_id!(
    /// Identifier of a candidate's application to a job.
    ApplicationId
);

/// Recruiter-facing pipeline status of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    New,
    Shortlisted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 3] = [
        ApplicationStatus::New,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Rejected,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::New => "new",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Case-insensitive lookup; `None` for anything unrecognised.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.label() == normalized)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateApplication {
    pub application_id: ApplicationId,
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    pub owner_id: OwnerId,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Query filters for the candidate list. Empty fields do not filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateFilter {
    pub min_score: Option<f64>,
    pub status: Option<String>,
    pub skills: Vec<String>,
}

/// One row of the ranked candidate list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateDashboardEntry {
    pub application_id: ApplicationId,
    pub candidate_id: CandidateId,
    pub status: ApplicationStatus,
    pub skills: Vec<String>,
    pub total_score: Option<f64>,
    pub breakdown: ScoreBreakdown,
    pub explanation_summary: String,
    pub explanation: String,
    pub score_created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreDistributionBucket {
    pub label: &'static str,
    pub min_score: f64,
    pub max_score: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillMatchCount {
    pub skill: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobInsights {
    pub job_id: JobId,
    pub total_applications: usize,
    pub scored_applications: usize,
    pub unscored_applications: usize,
    pub score_distribution: Vec<ScoreDistributionBucket>,
    pub top_skill_matches: Vec<SkillMatchCount>,
}
