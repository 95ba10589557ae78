//! Recruiter dashboard: ranked candidate lists, job insights and the HTTP
//! routes that front them together with imports and scoring configuration.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationId, ApplicationStatus, CandidateApplication, CandidateDashboardEntry,
    CandidateFilter, JobInsights, ScoreDistributionBucket, SkillMatchCount,
};
pub use repository::{ApplicationRepository, InMemoryApplicationRepository};
pub use router::{dashboard_router, DashboardState, OWNER_HEADER};
pub use service::{DashboardError, DashboardService};
