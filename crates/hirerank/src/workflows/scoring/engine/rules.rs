use std::collections::BTreeSet;

use super::super::evidence::{GitHubAnalysis, ProjectAnalysis, ResumeAnalysis};
use super::super::weights::ResumeSubWeights;
use super::ScoreCategory;

/// Neutral credit when the job lists no nice-to-have skills.
const NEUTRAL_NICE_TO_HAVE: f64 = 50.0;

/// Outcome for a single category before weights are applied.
pub(crate) struct CategoryScore {
    pub score: Option<f64>,
    pub explanation: String,
}

pub(crate) fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

fn ratio(numerator: u32, denominator: u32) -> Option<f64> {
    (denominator > 0).then(|| f64::from(numerator) / f64::from(denominator))
}

pub(crate) fn evaluate(
    category: ScoreCategory,
    subweights: &ResumeSubWeights,
    resume: Option<&ResumeAnalysis>,
    github: Option<&GitHubAnalysis>,
) -> CategoryScore {
    match (category, resume, github) {
        (ScoreCategory::ResumeSkills, Some(resume), _) => resume_skills(resume, subweights),
        (ScoreCategory::ResumeSkills, None, _) => {
            missing("Resume analysis missing; resume/skills score not calculated.")
        }
        (ScoreCategory::GithubCodeQuality, _, Some(github)) => direct(
            "Code quality score",
            github.code_quality_score,
        ),
        (ScoreCategory::DocumentationQuality, _, Some(github)) => direct(
            "Documentation quality score",
            github.documentation_score,
        ),
        (ScoreCategory::EngineeringPractices, _, Some(github)) => direct(
            "Engineering practices score",
            github.engineering_practices_score,
        ),
        (ScoreCategory::ProjectOriginality, _, Some(github)) => originality(&github.projects),
        (ScoreCategory::GithubCodeQuality, _, None) => {
            missing("GitHub analysis missing; code quality not scored.")
        }
        (ScoreCategory::DocumentationQuality, _, None) => {
            missing("GitHub analysis missing; documentation not scored.")
        }
        (ScoreCategory::EngineeringPractices, _, None) => {
            missing("GitHub analysis missing; engineering practices not scored.")
        }
        (ScoreCategory::ProjectOriginality, _, None) => {
            missing("GitHub analysis missing; originality not scored.")
        }
    }
}

fn missing(explanation: &str) -> CategoryScore {
    CategoryScore {
        score: None,
        explanation: explanation.to_string(),
    }
}

fn direct(label: &str, raw: f64) -> CategoryScore {
    let score = clamp_score(raw);
    CategoryScore {
        score: Some(score),
        explanation: format!("{label}: {score:.1}."),
    }
}

fn resume_skills(resume: &ResumeAnalysis, subweights: &ResumeSubWeights) -> CategoryScore {
    let required_score = clamp_score(
        ratio(resume.required_skills_matched, resume.required_skills_total).unwrap_or(0.0) * 100.0,
    );

    let nice_score = ratio(resume.nice_to_have_matched, resume.nice_to_have_total)
        .map(|value| clamp_score(value * 100.0))
        .unwrap_or(NEUTRAL_NICE_TO_HAVE);

    let experience_score = if resume.required_experience_years <= 0.0 {
        100.0
    } else {
        clamp_score(resume.experience_years / resume.required_experience_years * 100.0)
    };

    let score = clamp_score(
        required_score * subweights.required_skills
            + experience_score * subweights.experience_fit
            + nice_score * subweights.nice_to_have,
    );

    let mut lines = vec![format!(
        "Required skills match: {}/{}.",
        resume.required_skills_matched, resume.required_skills_total
    )];
    if resume.required_experience_years <= 0.0 {
        lines.push(format!(
            "Experience fit: {:.1} yrs with no minimum required.",
            resume.experience_years
        ));
    } else {
        lines.push(format!(
            "Experience fit: {:.1} yrs vs {:.1} yrs required.",
            resume.experience_years, resume.required_experience_years
        ));
    }
    if resume.nice_to_have_total > 0 {
        lines.push(format!(
            "Nice-to-have skills match: {}/{}.",
            resume.nice_to_have_matched, resume.nice_to_have_total
        ));
    } else {
        lines.push("Nice-to-have skills not specified.".to_string());
    }

    CategoryScore {
        score: Some(score),
        explanation: lines.join(" "),
    }
}

fn originality(projects: &[ProjectAnalysis]) -> CategoryScore {
    if projects.is_empty() {
        return missing("No GitHub projects available to assess originality.");
    }

    let reported: Vec<f64> = projects
        .iter()
        .filter_map(|project| project.originality_score)
        .filter(|score| score.is_finite())
        .collect();

    if reported.is_empty() {
        return missing("Originality score missing from GitHub analysis.");
    }

    let tutorial_indicators: BTreeSet<&str> = projects
        .iter()
        .filter(|project| project.is_tutorial)
        .flat_map(|project| project.tutorial_indicators.iter())
        .map(String::as_str)
        .collect();
    let green_flags: BTreeSet<&str> = projects
        .iter()
        .flat_map(|project| project.green_flags.iter())
        .map(String::as_str)
        .collect();

    let average = reported.iter().sum::<f64>() / reported.len() as f64;
    let score = clamp_score(average);

    let mut lines = vec![format!(
        "Average originality across {} projects: {:.1}.",
        reported.len(),
        average
    )];
    if !tutorial_indicators.is_empty() {
        lines.push(format!(
            "Tutorial indicators: {}.",
            tutorial_indicators.into_iter().collect::<Vec<_>>().join(", ")
        ));
    }
    if !green_flags.is_empty() {
        lines.push(format!(
            "Originality signals: {}.",
            green_flags.into_iter().collect::<Vec<_>>().join(", ")
        ));
    }

    CategoryScore {
        score: Some(score),
        explanation: lines.join(" "),
    }
}
