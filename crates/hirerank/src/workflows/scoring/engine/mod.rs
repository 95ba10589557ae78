mod rules;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use super::domain::{storage_key, CandidateId, JobId, OwnerId};
use super::evidence::{GitHubAnalysis, ResumeAnalysis};
use super::weights::{CategoryWeights, ScoringConfig, WeightError};

pub(crate) use rules::clamp_score;

const EXPLANATION_HEADER: &str = "Candidate scoring summary:";

/// Scoring categories in breakdown order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    ResumeSkills,
    GithubCodeQuality,
    DocumentationQuality,
    EngineeringPractices,
    ProjectOriginality,
}

impl ScoreCategory {
    pub const ALL: [ScoreCategory; 5] = [
        ScoreCategory::ResumeSkills,
        ScoreCategory::GithubCodeQuality,
        ScoreCategory::DocumentationQuality,
        ScoreCategory::EngineeringPractices,
        ScoreCategory::ProjectOriginality,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            ScoreCategory::ResumeSkills => "resume_skills",
            ScoreCategory::GithubCodeQuality => "github_code_quality",
            ScoreCategory::DocumentationQuality => "documentation_quality",
            ScoreCategory::EngineeringPractices => "engineering_practices",
            ScoreCategory::ProjectOriginality => "project_originality",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ScoreCategory::ResumeSkills => "Resume Skills",
            ScoreCategory::GithubCodeQuality => "Github Code Quality",
            ScoreCategory::DocumentationQuality => "Documentation Quality",
            ScoreCategory::EngineeringPractices => "Engineering Practices",
            ScoreCategory::ProjectOriginality => "Project Originality",
        }
    }

    fn nominal_weight(self, weights: &CategoryWeights) -> f64 {
        match self {
            ScoreCategory::ResumeSkills => weights.resume_skills,
            ScoreCategory::GithubCodeQuality => weights.github_code_quality,
            ScoreCategory::DocumentationQuality => weights.documentation_quality,
            ScoreCategory::EngineeringPractices => weights.engineering_practices,
            ScoreCategory::ProjectOriginality => weights.project_originality,
        }
    }
}

/// One category's contribution to the total.
///
/// `weight` is the nominal normalized weight from the job config; the share
/// actually applied after redistribution is reflected in `weighted_score`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub category: ScoreCategory,
    pub score: Option<f64>,
    pub weight: f64,
    pub weighted_score: f64,
    pub explanation: String,
}

/// The five components of a score, one per category.
///
/// Serialized as an object keyed by category.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreBreakdown {
    components: Vec<ScoreComponent>,
}

impl ScoreBreakdown {
    pub fn components(&self) -> &[ScoreComponent] {
        &self.components
    }

    pub fn get(&self, category: ScoreCategory) -> Option<&ScoreComponent> {
        self.components
            .iter()
            .find(|component| component.category == category)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[derive(Serialize)]
struct ComponentEntry<'a> {
    score: Option<f64>,
    weight: f64,
    weighted_score: f64,
    explanation: &'a str,
}

#[derive(Deserialize)]
struct StoredComponent {
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    weight: f64,
    #[serde(default)]
    weighted_score: f64,
    #[serde(default)]
    explanation: String,
}

impl Serialize for ScoreBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.components.len()))?;
        for component in &self.components {
            map.serialize_entry(
                &component.category,
                &ComponentEntry {
                    score: component.score,
                    weight: component.weight,
                    weighted_score: component.weighted_score,
                    explanation: &component.explanation,
                },
            )?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ScoreBreakdown {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stored = BTreeMap::<ScoreCategory, StoredComponent>::deserialize(deserializer)?;
        let components = stored
            .into_iter()
            .map(|(category, entry)| ScoreComponent {
                category,
                score: entry.score,
                weight: entry.weight,
                weighted_score: entry.weighted_score,
                explanation: entry.explanation,
            })
            .collect();
        Ok(Self { components })
    }
}

/// Final, immutable scoring outcome for a candidate/job pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<OwnerId>,
    pub total_score: f64,
    pub breakdown: ScoreBreakdown,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}

impl ScoreResult {
    pub fn with_owner(mut self, owner_id: Option<OwnerId>) -> Self {
        self.owner_id = owner_id;
        self
    }

    /// `owner:job:candidate`; later results for the same key replace earlier ones.
    pub fn storage_key(&self) -> String {
        storage_key(self.owner_id.as_ref(), &self.job_id, &self.candidate_id)
    }
}

/// Combine whatever evidence is available into a score.
///
/// Missing evidence degrades the result instead of failing; the only error is
/// a weight configuration that cannot be normalized.
pub fn compute_score(
    candidate_id: &CandidateId,
    job_id: &JobId,
    config: &ScoringConfig,
    resume: Option<&ResumeAnalysis>,
    github: Option<&GitHubAnalysis>,
    scored_at: DateTime<Utc>,
) -> Result<ScoreResult, WeightError> {
    let config = config.normalized()?;
    let weights = config.category_weights;

    let mut components: Vec<ScoreComponent> = ScoreCategory::ALL
        .iter()
        .map(|&category| {
            let outcome = rules::evaluate(category, &config.resume_subweights, resume, github);
            ScoreComponent {
                category,
                score: outcome.score.map(clamp_score),
                weight: category.nominal_weight(&weights),
                weighted_score: 0.0,
                explanation: outcome.explanation,
            }
        })
        .collect();

    let available: Vec<ScoreCategory> = components
        .iter()
        .filter(|component| component.score.is_some())
        .map(|component| component.category)
        .collect();
    let shares = redistribute(&weights, &available);

    let mut total = 0.0;
    for component in &mut components {
        if let Some(score) = component.score {
            let share = shares.get(&component.category).copied().unwrap_or(0.0);
            component.weighted_score = score * share;
            total += component.weighted_score;
        }
    }

    let explanation = summarize(&components);

    Ok(ScoreResult {
        candidate_id: candidate_id.clone(),
        job_id: job_id.clone(),
        owner_id: None,
        total_score: clamp_score(total),
        breakdown: ScoreBreakdown { components },
        explanation,
        created_at: scored_at,
    })
}

/// Re-normalize nominal weights over the categories that produced a score.
fn redistribute(
    weights: &CategoryWeights,
    available: &[ScoreCategory],
) -> BTreeMap<ScoreCategory, f64> {
    let total: f64 = available
        .iter()
        .map(|category| category.nominal_weight(weights))
        .sum();

    available
        .iter()
        .map(|&category| {
            let share = if total > 0.0 {
                category.nominal_weight(weights) / total
            } else {
                0.0
            };
            (category, share)
        })
        .collect()
}

fn summarize(components: &[ScoreComponent]) -> String {
    std::iter::once(EXPLANATION_HEADER.to_string())
        .chain(components.iter().map(|component| {
            format!(
                "- {}: {}",
                component.category.label(),
                component.explanation
            )
        }))
        .collect::<Vec<_>>()
        .join("\n")
}
