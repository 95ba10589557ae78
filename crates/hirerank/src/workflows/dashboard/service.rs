use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use super::domain::{
    ApplicationStatus, CandidateApplication, CandidateDashboardEntry, CandidateFilter,
    JobInsights, ScoreDistributionBucket, SkillMatchCount,
};
use super::repository::ApplicationRepository;
use crate::workflows::scoring::{
    JobId, OwnerId, RepositoryError, ScoreBreakdown, ScoreResult, ScoreResultRepository,
};

const SUMMARY_LINES: usize = 2;
const TOP_SKILLS: usize = 5;
const BUCKETS: [(&str, f64, f64); 5] = [
    ("0-20", 0.0, 20.0),
    ("20-40", 20.0, 40.0),
    ("40-60", 40.0, 60.0),
    ("60-80", 60.0, 80.0),
    ("80-100", 80.0, 100.0),
];

/// Error raised while building dashboard views.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Unsupported status '{0}'.")]
    UnsupportedStatus(String),
    #[error("min_score must be between 0 and 100 (got {0})")]
    InvalidMinScore(f64),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Read-side aggregation over applications and their scores.
pub struct DashboardService {
    applications: Arc<dyn ApplicationRepository>,
    scores: Arc<dyn ScoreResultRepository>,
}

impl DashboardService {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        scores: Arc<dyn ScoreResultRepository>,
    ) -> Self {
        Self {
            applications,
            scores,
        }
    }

    /// Candidates for a job, best score first, unscored last.
    pub fn list_candidates_for_job(
        &self,
        owner_id: &OwnerId,
        job_id: &JobId,
        filter: &CandidateFilter,
    ) -> Result<Vec<CandidateDashboardEntry>, DashboardError> {
        let status = match filter.status.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(
                ApplicationStatus::parse(raw)
                    .ok_or_else(|| DashboardError::UnsupportedStatus(raw.to_string()))?,
            ),
            _ => None,
        };
        if let Some(min_score) = filter.min_score {
            if !(0.0..=100.0).contains(&min_score) {
                return Err(DashboardError::InvalidMinScore(min_score));
            }
        }
        let wanted_skills: BTreeSet<String> = filter
            .skills
            .iter()
            .map(|skill| normalize_skill(skill))
            .filter(|skill| !skill.is_empty())
            .collect();

        let applications = self.applications_for(owner_id, job_id)?;
        let scores = self.scores.list_by_job(Some(owner_id), job_id)?;

        let mut entries: Vec<CandidateDashboardEntry> = applications
            .into_iter()
            .filter(|application| status.map_or(true, |wanted| application.status == wanted))
            .filter(|application| {
                wanted_skills.is_empty()
                    || application
                        .skills
                        .iter()
                        .any(|skill| wanted_skills.contains(&normalize_skill(skill)))
            })
            .filter_map(|application| {
                let score = scores.get(&application.candidate_id);
                if let Some(min_score) = filter.min_score {
                    if score.map_or(true, |score| score.total_score < min_score) {
                        return None;
                    }
                }
                Some(entry_for(application, score))
            })
            .collect();

        entries.sort_by(|left, right| match (left.total_score, right.total_score) {
            (Some(left), Some(right)) => right.total_cmp(&left),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        Ok(entries)
    }

    pub fn job_insights(
        &self,
        owner_id: &OwnerId,
        job_id: &JobId,
    ) -> Result<JobInsights, DashboardError> {
        let applications = self.applications_for(owner_id, job_id)?;
        let scores = self.scores.list_by_job(Some(owner_id), job_id)?;

        let totals: Vec<f64> = applications
            .iter()
            .filter_map(|application| scores.get(&application.candidate_id))
            .map(|score| score.total_score)
            .collect();

        Ok(JobInsights {
            job_id: job_id.clone(),
            total_applications: applications.len(),
            scored_applications: totals.len(),
            unscored_applications: applications.len() - totals.len(),
            score_distribution: score_distribution(&totals),
            top_skill_matches: top_skills(&applications),
        })
    }

    fn applications_for(
        &self,
        owner_id: &OwnerId,
        job_id: &JobId,
    ) -> Result<Vec<CandidateApplication>, RepositoryError> {
        let mut applications = self.applications.list_by_job(owner_id, job_id)?;
        applications.sort_by(|left, right| {
            left.created_at
                .cmp(&right.created_at)
                .then_with(|| left.application_id.cmp(&right.application_id))
        });
        Ok(applications)
    }
}

fn normalize_skill(skill: &str) -> String {
    skill.trim().to_lowercase()
}

fn entry_for(
    application: CandidateApplication,
    score: Option<&ScoreResult>,
) -> CandidateDashboardEntry {
    let (total_score, breakdown, explanation_summary, explanation, score_created_at) = match score
    {
        Some(score) => (
            Some(score.total_score),
            score.breakdown.clone(),
            summarize_explanation(&score.explanation),
            score.explanation.clone(),
            Some(score.created_at),
        ),
        None => (
            None,
            ScoreBreakdown::default(),
            "Score pending.".to_string(),
            String::new(),
            None,
        ),
    };

    CandidateDashboardEntry {
        application_id: application.application_id,
        candidate_id: application.candidate_id,
        status: application.status,
        skills: application.skills,
        total_score,
        breakdown,
        explanation_summary,
        explanation,
        score_created_at,
    }
}

fn summarize_explanation(explanation: &str) -> String {
    let summary = explanation
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(SUMMARY_LINES)
        .collect::<Vec<_>>()
        .join("\n");
    if summary.is_empty() {
        "Score explanation pending.".to_string()
    } else {
        summary
    }
}

fn score_distribution(totals: &[f64]) -> Vec<ScoreDistributionBucket> {
    BUCKETS
        .iter()
        .enumerate()
        .map(|(index, &(label, min_score, max_score))| {
            let last = index == BUCKETS.len() - 1;
            let count = totals
                .iter()
                .filter(|&&total| {
                    total >= min_score && (total < max_score || (last && total <= max_score))
                })
                .count();
            ScoreDistributionBucket {
                label,
                min_score,
                max_score,
                count,
            }
        })
        .collect()
}

fn top_skills(applications: &[CandidateApplication]) -> Vec<SkillMatchCount> {
    // (display spelling, count, first-seen position)
    let mut counts: HashMap<String, (String, usize, usize)> = HashMap::new();
    let skills = applications
        .iter()
        .flat_map(|application| application.skills.iter());
    for skill in skills {
        let key = normalize_skill(skill);
        if key.is_empty() {
            continue;
        }
        let position = counts.len();
        counts
            .entry(key)
            .or_insert_with(|| (skill.trim().to_string(), 0, position))
            .1 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = counts.into_values().collect();
    ranked.sort_by(|left, right| right.1.cmp(&left.1).then(left.2.cmp(&right.2)));
    ranked
        .into_iter()
        .take(TOP_SKILLS)
        .map(|(skill, count, _)| SkillMatchCount { skill, count })
        .collect()
}
