use super::common::*;

use crate::workflows::scoring::{
    compute_score, CategoryWeights, GitHubAnalysis, ProjectAnalysis, ScoreCategory, ScoreResult,
    ScoringConfig, WeightError,
};

#[test]
fn no_evidence_scores_zero_with_every_component_absent() {
    let result = compute_score(&candidate(), &job(), &config(false), None, None, scored_at())
        .expect("default weights are valid");

    assert_eq!(result.total_score, 0.0);
    assert_eq!(result.breakdown.len(), 5);
    for component in result.breakdown.components() {
        assert!(component.score.is_none(), "{:?} was scored", component.category);
        assert_eq!(component.weighted_score, 0.0);
        assert!(!component.explanation.is_empty());
    }
    assert!(result.explanation.contains("Resume analysis missing"));
    assert!(result.explanation.contains("GitHub analysis missing"));
}

#[test]
fn resume_only_takes_the_whole_weight() {
    let resume = resume();
    let result = compute_score(
        &candidate(),
        &job(),
        &config(false),
        Some(&resume),
        None,
        scored_at(),
    )
    .expect("scores");

    assert_close(result.total_score, 56.0);

    let component = result
        .breakdown
        .get(ScoreCategory::ResumeSkills)
        .expect("resume component");
    assert_close(component.score.expect("resume scored"), 56.0);
    assert_close(component.weight, 0.25);
    assert_close(component.weighted_score, 56.0);
    assert!(component.explanation.contains("Required skills match: 3/5."));
    assert!(component
        .explanation
        .contains("Nice-to-have skills not specified."));
}

#[test]
fn breakdown_keeps_canonical_order_regardless_of_evidence() {
    let resume = resume();
    let github = github(80.0);
    let cases = [
        (None, None),
        (Some(&resume), None),
        (None, Some(&github)),
        (Some(&resume), Some(&github)),
    ];

    for (resume, github) in cases {
        let result = compute_score(&candidate(), &job(), &config(false), resume, github, scored_at())
            .expect("scores");
        let order: Vec<ScoreCategory> = result
            .breakdown
            .components()
            .iter()
            .map(|component| component.category)
            .collect();
        assert_eq!(order, ScoreCategory::ALL.to_vec());
    }
}

#[test]
fn full_evidence_uses_nominal_weights() {
    let resume = resume();
    let github = github(80.0);
    let result = compute_score(
        &candidate(),
        &job(),
        &config(false),
        Some(&resume),
        Some(&github),
        scored_at(),
    )
    .expect("scores");

    // 0.25*56 + 0.30*80 + 0.10*70 + 0.15*65 + 0.20*75
    assert_close(result.total_score, 69.75);
}

#[test]
fn github_scores_are_clamped_before_weighting() {
    let github = GitHubAnalysis {
        code_quality_score: 150.0,
        documentation_score: -20.0,
        engineering_practices_score: 100.0,
        projects: Vec::new(),
    };
    let result = compute_score(&candidate(), &job(), &config(false), None, Some(&github), scored_at())
        .expect("scores");

    let code = result
        .breakdown
        .get(ScoreCategory::GithubCodeQuality)
        .expect("code component");
    assert_eq!(code.score, Some(100.0));
    let docs = result
        .breakdown
        .get(ScoreCategory::DocumentationQuality)
        .expect("docs component");
    assert_eq!(docs.score, Some(0.0));
    assert!(result.total_score <= 100.0);

    let originality = result
        .breakdown
        .get(ScoreCategory::ProjectOriginality)
        .expect("originality component");
    assert!(originality.score.is_none());
    assert_eq!(
        originality.explanation,
        "No GitHub projects available to assess originality."
    );
}

#[test]
fn originality_averages_reporting_projects_only() {
    let github = GitHubAnalysis {
        code_quality_score: 50.0,
        documentation_score: 50.0,
        engineering_practices_score: 50.0,
        projects: vec![
            ProjectAnalysis {
                originality_score: Some(80.0),
                ..ProjectAnalysis::default()
            },
            ProjectAnalysis {
                originality_score: Some(60.0),
                ..ProjectAnalysis::default()
            },
            ProjectAnalysis {
                is_tutorial: true,
                tutorial_indicators: vec!["copy-paste".to_string()],
                ..ProjectAnalysis::default()
            },
        ],
    };

    let result = compute_score(&candidate(), &job(), &config(false), None, Some(&github), scored_at())
        .expect("scores");
    let originality = result
        .breakdown
        .get(ScoreCategory::ProjectOriginality)
        .expect("originality component");

    assert_close(originality.score.expect("scored"), 70.0);
    assert!(originality.explanation.contains("copy-paste"));
}

#[test]
fn projects_without_originality_scores_leave_category_absent() {
    let github = GitHubAnalysis {
        projects: vec![ProjectAnalysis::default()],
        ..github(50.0)
    };
    let result = compute_score(&candidate(), &job(), &config(false), None, Some(&github), scored_at())
        .expect("scores");
    let originality = result
        .breakdown
        .get(ScoreCategory::ProjectOriginality)
        .expect("originality component");

    assert!(originality.score.is_none());
    assert_eq!(
        originality.explanation,
        "Originality score missing from GitHub analysis."
    );
}

#[test]
fn zero_weight_on_available_categories_scores_zero() {
    let config = ScoringConfig {
        category_weights: CategoryWeights {
            resume_skills: 0.0,
            github_code_quality: 0.0,
            project_originality: 1.0,
            documentation_quality: 0.0,
            engineering_practices: 0.0,
        },
        ..config(false)
    };
    let resume = resume();

    let result = compute_score(&candidate(), &job(), &config, Some(&resume), None, scored_at())
        .expect("scores");

    assert_eq!(result.total_score, 0.0);
    let component = result
        .breakdown
        .get(ScoreCategory::ResumeSkills)
        .expect("resume component");
    assert_close(component.score.expect("scored"), 56.0);
    assert_eq!(component.weighted_score, 0.0);
}

#[test]
fn invalid_weights_are_reported() {
    let config = ScoringConfig {
        category_weights: CategoryWeights {
            resume_skills: 0.0,
            github_code_quality: 0.0,
            project_originality: 0.0,
            documentation_quality: 0.0,
            engineering_practices: 0.0,
        },
        ..config(false)
    };

    match compute_score(&candidate(), &job(), &config, None, None, scored_at()) {
        Err(WeightError::InvalidConfiguration { .. }) => {}
        other => panic!("expected invalid configuration, got {other:?}"),
    }
}

#[test]
fn explanation_lists_each_category_under_the_header() {
    let resume = resume();
    let result = compute_score(
        &candidate(),
        &job(),
        &config(false),
        Some(&resume),
        None,
        scored_at(),
    )
    .expect("scores");

    let lines: Vec<&str> = result.explanation.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "Candidate scoring summary:");
    assert!(lines[1].starts_with("- Resume Skills: "));
    assert!(lines[2].starts_with("- Github Code Quality: "));
    assert!(lines[5].starts_with("- Project Originality: "));
}

#[test]
fn serialized_breakdown_is_keyed_by_category() {
    let resume = resume();
    let github = github(80.0);
    let result = compute_score(
        &candidate(),
        &job(),
        &config(false),
        Some(&resume),
        Some(&github),
        scored_at(),
    )
    .expect("scores");

    let value = serde_json::to_value(&result).expect("serializes");
    assert!(value.get("owner_id").is_none());
    let breakdown = value["breakdown"].as_object().expect("breakdown object");
    assert_eq!(breakdown.len(), 5);
    assert_eq!(breakdown["github_code_quality"]["score"], 80.0);

    let restored: ScoreResult = serde_json::from_value(value).expect("deserializes");
    assert_eq!(restored, result);
}
