use crate::infra::{Services, Stores};
use clap::Args;
use hirerank::config::AppConfig;
use hirerank::error::AppError;
use hirerank::workflows::dashboard::{CandidateDashboardEntry, CandidateFilter, JobInsights};
use hirerank::workflows::imports::{parse_mapping, CandidateImportJob, RowStatus};
use hirerank::workflows::scoring::{JobId, OwnerId};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// Job the candidates applied to
    #[arg(long)]
    pub(crate) job_id: String,
    /// Recruiter who owns the job
    #[arg(long)]
    pub(crate) owner_id: String,
    /// CSV export to import
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Field-to-column mapping, as inline JSON or a path to a JSON file
    #[arg(long)]
    pub(crate) mapping: String,
    /// Storage directory (defaults to HIRERANK_STORAGE_DIR)
    #[arg(long)]
    pub(crate) storage_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    #[arg(long)]
    pub(crate) job_id: String,
    #[arg(long)]
    pub(crate) owner_id: String,
    /// Only show candidates scoring at least this much (0-100)
    #[arg(long)]
    pub(crate) min_score: Option<f64>,
    /// Only show candidates in this status (new, shortlisted, rejected)
    #[arg(long)]
    pub(crate) status: Option<String>,
    /// Only show candidates listing this skill; repeat to match any of several
    #[arg(long)]
    pub(crate) skill: Vec<String>,
    /// Storage directory (defaults to HIRERANK_STORAGE_DIR)
    #[arg(long)]
    pub(crate) storage_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct InsightsArgs {
    #[arg(long)]
    pub(crate) job_id: String,
    #[arg(long)]
    pub(crate) owner_id: String,
    /// Storage directory (defaults to HIRERANK_STORAGE_DIR)
    #[arg(long)]
    pub(crate) storage_dir: Option<PathBuf>,
}

fn open_services(storage_dir: Option<PathBuf>) -> Result<Services, AppError> {
    let dir = match storage_dir {
        Some(dir) => dir,
        None => AppConfig::load()?.storage.dir,
    };
    std::fs::create_dir_all(&dir)?;
    Ok(Services::new(Stores::file_backed(&dir)))
}

fn read_mapping(argument: &str) -> Result<String, AppError> {
    if argument.trim_start().starts_with('{') {
        Ok(argument.to_string())
    } else {
        Ok(std::fs::read_to_string(argument)?)
    }
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let ImportArgs {
        job_id,
        owner_id,
        csv,
        mapping,
        storage_dir,
    } = args;

    let csv = std::fs::read_to_string(csv)?;
    let mapping = parse_mapping(&read_mapping(&mapping)?)?;
    let services = open_services(storage_dir)?;

    let job = services
        .imports
        .run(OwnerId(owner_id), JobId(job_id), &csv, &mapping)?;
    render_import(&job);
    Ok(())
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        job_id,
        owner_id,
        min_score,
        status,
        skill,
        storage_dir,
    } = args;

    let services = open_services(storage_dir)?;
    let owner_id = OwnerId(owner_id);
    let job_id = JobId(job_id);
    let filter = CandidateFilter {
        min_score,
        status,
        skills: skill,
    };

    let entries = services
        .dashboard
        .list_candidates_for_job(&owner_id, &job_id, &filter)?;
    render_ranking(&job_id, &entries);
    Ok(())
}

pub(crate) fn run_insights(args: InsightsArgs) -> Result<(), AppError> {
    let services = open_services(args.storage_dir)?;
    let insights = services
        .dashboard
        .job_insights(&OwnerId(args.owner_id), &JobId(args.job_id))?;
    render_insights(&insights);
    Ok(())
}

pub(crate) fn render_import(job: &CandidateImportJob) {
    println!("Import {} for job {}", job.import_id, job.job_id);
    println!(
        "- {} rows | {} imported | {} failed",
        job.total_rows, job.success_count, job.failure_count
    );
    for result in &job.results {
        if result.status == RowStatus::Failed {
            println!("  - row {}: {}", result.row_number, result.errors.join(" "));
        }
    }
    if let Some(message) = &job.error_message {
        println!("Import stopped: {message}");
    }
}

pub(crate) fn render_ranking(job_id: &JobId, entries: &[CandidateDashboardEntry]) {
    println!("Ranked candidates for job {job_id}");
    if entries.is_empty() {
        println!("- no candidates match");
        return;
    }
    for (position, entry) in entries.iter().enumerate() {
        let score = entry
            .total_score
            .map(|total| format!("{total:.1}"))
            .unwrap_or_else(|| "pending".to_string());
        println!(
            "{:>2}. {} | score {} | {} | skills: {}",
            position + 1,
            entry.candidate_id,
            score,
            entry.status.label(),
            if entry.skills.is_empty() {
                "-".to_string()
            } else {
                entry.skills.join(", ")
            }
        );
        for line in entry.explanation_summary.lines() {
            println!("    {line}");
        }
    }
}

pub(crate) fn render_insights(insights: &JobInsights) {
    println!("Insights for job {}", insights.job_id);
    println!(
        "- {} applications | {} scored | {} pending",
        insights.total_applications, insights.scored_applications, insights.unscored_applications
    );
    println!("Score distribution:");
    for bucket in &insights.score_distribution {
        println!("  - {:>6}: {}", bucket.label, bucket.count);
    }
    if !insights.top_skill_matches.is_empty() {
        println!("Top skills:");
        for skill in &insights.top_skill_matches {
            println!("  - {}: {}", skill.skill, skill.count);
        }
    }
}
