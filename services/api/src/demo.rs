use crate::commands::{render_insights, render_ranking};
use crate::infra::{Services, Stores};
use chrono::{Duration, Utc};
use clap::Args;
use hirerank::error::AppError;
use hirerank::workflows::dashboard::{
    ApplicationId, ApplicationStatus, CandidateApplication, CandidateFilter,
};
use hirerank::workflows::scoring::{
    AnalysisKey, CandidateId, GitHubAnalysis, JobId, OwnerId, ProjectAnalysis, ResumeAnalysis,
    ScoringConfig,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Hold scores until code-hosting analysis arrives, even without a profile URL.
    #[arg(long)]
    pub(crate) github_required: bool,
}

struct DemoCandidate {
    id: &'static str,
    status: ApplicationStatus,
    skills: &'static [&'static str],
    github_url: Option<&'static str>,
    resume: ResumeAnalysis,
    github: Option<GitHubAnalysis>,
    github_first: bool,
}

fn demo_candidates() -> Vec<DemoCandidate> {
    vec![
        DemoCandidate {
            id: "cand-ada",
            status: ApplicationStatus::Shortlisted,
            skills: &["Rust", "PostgreSQL", "Kubernetes"],
            github_url: Some("https://github.com/ada"),
            resume: ResumeAnalysis {
                required_skills_matched: 4,
                required_skills_total: 5,
                nice_to_have_matched: 2,
                nice_to_have_total: 3,
                experience_years: 6.0,
                required_experience_years: 4.0,
            },
            github: Some(GitHubAnalysis {
                code_quality_score: 88.0,
                documentation_score: 74.0,
                engineering_practices_score: 81.0,
                projects: vec![ProjectAnalysis {
                    originality_score: Some(85.0),
                    green_flags: vec!["custom storage engine".to_string()],
                    ..ProjectAnalysis::default()
                }],
            }),
            github_first: true,
        },
        DemoCandidate {
            id: "cand-grace",
            status: ApplicationStatus::New,
            skills: &["Rust", "Go"],
            github_url: Some("https://github.com/grace"),
            resume: ResumeAnalysis {
                required_skills_matched: 3,
                required_skills_total: 5,
                nice_to_have_matched: 0,
                nice_to_have_total: 3,
                experience_years: 2.0,
                required_experience_years: 4.0,
            },
            github: Some(GitHubAnalysis {
                code_quality_score: 62.0,
                documentation_score: 40.0,
                engineering_practices_score: 55.0,
                projects: vec![ProjectAnalysis {
                    originality_score: Some(60.0),
                    is_tutorial: true,
                    tutorial_indicators: vec!["todo-app template".to_string()],
                    ..ProjectAnalysis::default()
                }],
            }),
            github_first: false,
        },
        DemoCandidate {
            id: "cand-linus",
            status: ApplicationStatus::New,
            skills: &["C", "PostgreSQL"],
            github_url: None,
            resume: ResumeAnalysis {
                required_skills_matched: 2,
                required_skills_total: 5,
                nice_to_have_matched: 1,
                nice_to_have_total: 3,
                experience_years: 10.0,
                required_experience_years: 4.0,
            },
            github: None,
            github_first: false,
        },
    ]
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let services = Services::new(Stores::in_memory());
    let owner_id = OwnerId::from("demo-recruiter");
    let job_id = JobId::from("demo-backend-engineer");

    services.configs.save(ScoringConfig {
        github_required: args.github_required,
        ..ScoringConfig::for_job(job_id.clone())
    })?;

    println!("Candidate scoring demo");
    println!("- job {job_id} | github required: {}", args.github_required);

    let created = Utc::now();
    for (offset, candidate) in demo_candidates().into_iter().enumerate() {
        let candidate_id = CandidateId::from(candidate.id);
        services.applications.save(CandidateApplication {
            application_id: ApplicationId(format!("app-{}", candidate.id)),
            candidate_id: candidate_id.clone(),
            job_id: job_id.clone(),
            owner_id: owner_id.clone(),
            status: candidate.status,
            skills: candidate.skills.iter().map(|skill| skill.to_string()).collect(),
            created_at: created + Duration::seconds(offset as i64),
        })?;

        let key = AnalysisKey::new(Some(owner_id.clone()), job_id.clone(), candidate_id);
        let github_url = candidate.github_url.map(str::to_string);
        let mut steps = Vec::new();

        if candidate.github_first {
            if let Some(github) = candidate.github.clone() {
                let scored = services.coordinator.on_github_analysis_completed(&key, github)?;
                steps.push(("github", scored.map(|result| result.total_score)));
            }
        }
        let scored = services
            .coordinator
            .on_resume_parsed(&key, candidate.resume, github_url)?;
        steps.push(("resume", scored.map(|result| result.total_score)));
        if !candidate.github_first {
            if let Some(github) = candidate.github {
                let scored = services.coordinator.on_github_analysis_completed(&key, github)?;
                steps.push(("github", scored.map(|result| result.total_score)));
            }
        }

        let trace = steps
            .iter()
            .map(|(source, total)| match total {
                Some(total) => format!("{source} -> scored {total:.1}"),
                None => format!("{source} -> waiting"),
            })
            .collect::<Vec<_>>()
            .join(", ");
        println!("- {}: {}", candidate.id, trace);
    }

    println!();
    let entries = services.dashboard.list_candidates_for_job(
        &owner_id,
        &job_id,
        &CandidateFilter::default(),
    )?;
    render_ranking(&job_id, &entries);

    println!();
    render_insights(&services.dashboard.job_insights(&owner_id, &job_id)?);
    Ok(())
}
