use serde::{Deserialize, Serialize};

/// Resume parser output for one candidate against one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub required_skills_matched: u32,
    pub required_skills_total: u32,
    pub nice_to_have_matched: u32,
    pub nice_to_have_total: u32,
    pub experience_years: f64,
    pub required_experience_years: f64,
}

/// Code-hosting profile analysis. Scores are on a 0-100 scale but are not
/// guaranteed to be clamped by the producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubAnalysis {
    pub code_quality_score: f64,
    pub documentation_score: f64,
    pub engineering_practices_score: f64,
    #[serde(default)]
    pub projects: Vec<ProjectAnalysis>,
}

/// Per-repository originality signals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub originality_score: Option<f64>,
    #[serde(default)]
    pub is_tutorial: bool,
    #[serde(default)]
    pub tutorial_indicators: Vec<String>,
    #[serde(default)]
    pub green_flags: Vec<String>,
}
