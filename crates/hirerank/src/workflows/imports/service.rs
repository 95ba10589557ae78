use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::analyzer::GitHubAnalyzer;
use super::domain::{CandidateImportJob, ImportId, ImportRowResult, ImportStatus};
use super::mapping::{validate_mapping, FieldMapping};
use super::normalizer::{parse_skills, parse_status, parse_years};
use super::parser::CsvRow;
use super::repository::ImportRepository;
use super::{parse_csv_rows, ImportError};
use crate::workflows::dashboard::{ApplicationId, ApplicationRepository, CandidateApplication};
use crate::workflows::scoring::{
    AnalysisKey, CandidateId, JobId, OwnerId, ResumeAnalysis, ScoringCoordinator, ScoringError,
};

/// A queued import together with the rows it still has to process.
#[derive(Debug, Clone)]
pub struct PendingImport {
    pub job: CandidateImportJob,
    pub rows: Vec<CsvRow>,
}

/// Turns CSV rows into applications and feeds their evidence to scoring.
pub struct CandidateImportService {
    imports: Arc<dyn ImportRepository>,
    applications: Arc<dyn ApplicationRepository>,
    coordinator: Arc<ScoringCoordinator>,
    analyzer: Arc<dyn GitHubAnalyzer>,
}

impl CandidateImportService {
    pub fn new(
        imports: Arc<dyn ImportRepository>,
        applications: Arc<dyn ApplicationRepository>,
        coordinator: Arc<ScoringCoordinator>,
        analyzer: Arc<dyn GitHubAnalyzer>,
    ) -> Self {
        Self {
            imports,
            applications,
            coordinator,
            analyzer,
        }
    }

    /// Validate the mapping and persist a queued job. Nothing is imported yet.
    pub fn create(
        &self,
        owner_id: OwnerId,
        job_id: JobId,
        csv: &str,
        mapping: &FieldMapping,
    ) -> Result<PendingImport, ImportError> {
        let (headers, rows) = parse_csv_rows(csv)?;
        let mapping = validate_mapping(mapping, &headers)?;
        let now = Utc::now();

        let job = CandidateImportJob {
            import_id: ImportId(Uuid::new_v4().to_string()),
            owner_id,
            job_id,
            status: ImportStatus::Queued,
            headers,
            mapping,
            total_rows: rows.len(),
            processed_rows: 0,
            success_count: 0,
            failure_count: 0,
            results: Vec::new(),
            error_message: None,
            created_at: now,
            updated_at: now,
        };
        self.imports.create(job.clone())?;
        info!(
            import_id = %job.import_id,
            job_id = %job.job_id,
            total_rows = job.total_rows,
            "candidate import queued"
        );

        Ok(PendingImport { job, rows })
    }

    /// Process every row of a queued import, persisting progress after each.
    ///
    /// Row failures are recorded and do not stop the import. If progress can
    /// no longer be persisted the job is marked failed.
    pub fn process(&self, pending: PendingImport) -> Result<CandidateImportJob, ImportError> {
        let PendingImport { mut job, rows } = pending;
        job.transition(ImportStatus::Processing, Utc::now());

        let outcome = self.imports.update(job.clone()).and_then(|()| {
            for (index, row) in rows.iter().enumerate() {
                let result = self.process_row(&job, row, index + 1);
                job.record(result, Utc::now());
                self.imports.update(job.clone())?;
            }
            Ok(())
        });

        match outcome {
            Ok(()) => {
                job.transition(ImportStatus::Completed, Utc::now());
                self.imports.update(job.clone())?;
                info!(
                    import_id = %job.import_id,
                    succeeded = job.success_count,
                    failed = job.failure_count,
                    "candidate import completed"
                );
                Ok(job)
            }
            Err(err) => {
                warn!(import_id = %job.import_id, error = %err, "candidate import failed");
                job.error_message = Some(err.to_string());
                job.transition(ImportStatus::Failed, Utc::now());
                if let Err(mark_err) = self.imports.update(job.clone()) {
                    warn!(
                        import_id = %job.import_id,
                        error = %mark_err,
                        "could not record import failure"
                    );
                }
                Err(err.into())
            }
        }
    }

    /// Create and process an import in one call.
    pub fn run(
        &self,
        owner_id: OwnerId,
        job_id: JobId,
        csv: &str,
        mapping: &FieldMapping,
    ) -> Result<CandidateImportJob, ImportError> {
        let pending = self.create(owner_id, job_id, csv, mapping)?;
        self.process(pending)
    }

    pub fn get(
        &self,
        owner_id: &OwnerId,
        job_id: &JobId,
        import_id: &ImportId,
    ) -> Result<CandidateImportJob, ImportError> {
        self.imports
            .get(owner_id, job_id, import_id)?
            .ok_or_else(|| ImportError::NotFound(import_id.clone()))
    }

    fn process_row(
        &self,
        job: &CandidateImportJob,
        row: &CsvRow,
        row_number: usize,
    ) -> ImportRowResult {
        let mapped = map_row(row, &job.mapping);
        let errors = validate_row(&mapped);
        if !errors.is_empty() {
            return ImportRowResult::failed(row_number, errors);
        }

        let candidate_id = CandidateId(Uuid::new_v4().to_string());
        let skills = parse_skills(field(&mapped, "skills"));
        let application = CandidateApplication {
            application_id: ApplicationId(Uuid::new_v4().to_string()),
            candidate_id: candidate_id.clone(),
            job_id: job.job_id.clone(),
            owner_id: job.owner_id.clone(),
            status: parse_status(field(&mapped, "status")),
            skills,
            created_at: Utc::now(),
        };

        let key = AnalysisKey::new(
            Some(job.owner_id.clone()),
            job.job_id.clone(),
            candidate_id.clone(),
        );
        let saved = self
            .applications
            .save(application.clone())
            .map_err(ScoringError::from)
            .and_then(|()| self.submit_evidence(&key, &mapped, &application.skills));

        match saved {
            Ok(()) => ImportRowResult::success(row_number, candidate_id),
            Err(err) => {
                warn!(
                    import_id = %job.import_id,
                    row = row_number,
                    error = %err,
                    "candidate row failed"
                );
                ImportRowResult::failed(row_number, vec![err.to_string()])
            }
        }
    }

    fn submit_evidence(
        &self,
        key: &AnalysisKey,
        mapped: &FieldMapping,
        skills: &[String],
    ) -> Result<(), ScoringError> {
        let github_url = field(mapped, "github_url").map(str::to_string);
        self.coordinator
            .on_resume_parsed(key, resume_from_row(mapped, skills), github_url.clone())?;

        if let Some(url) = github_url {
            match self.analyzer.analyze(&url) {
                Ok(github) => {
                    self.coordinator.on_github_analysis_completed(key, github)?;
                }
                Err(err) => warn!(
                    key = %key.storage_key(),
                    error = %err,
                    "github analysis failed; score stays pending"
                ),
            }
        }
        Ok(())
    }
}

fn map_row(row: &CsvRow, mapping: &FieldMapping) -> FieldMapping {
    mapping
        .iter()
        .map(|(field, column)| {
            let value = row.get(column).map(|value| value.trim()).unwrap_or_default();
            (field.clone(), value.to_string())
        })
        .collect()
}

/// Mapped value, treating blank cells as absent.
fn field<'a>(mapped: &'a FieldMapping, name: &str) -> Option<&'a str> {
    mapped
        .get(name)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

fn validate_row(mapped: &FieldMapping) -> Vec<String> {
    let mut errors = Vec::new();
    if field(mapped, "name").is_none() {
        errors.push("Missing candidate name.".to_string());
    }
    match field(mapped, "email") {
        None => errors.push("Missing candidate email.".to_string()),
        Some(email) if !email.contains('@') => {
            errors.push("Invalid email address.".to_string())
        }
        Some(_) => {}
    }
    errors
}

fn resume_from_row(mapped: &FieldMapping, skills: &[String]) -> ResumeAnalysis {
    let listed = u32::try_from(skills.len()).unwrap_or(u32::MAX);
    let required_skills_total = listed.max(1);
    ResumeAnalysis {
        required_skills_matched: listed.min(required_skills_total),
        required_skills_total,
        nice_to_have_matched: 0,
        nice_to_have_total: 0,
        experience_years: parse_years(field(mapped, "experience_years")),
        required_experience_years: parse_years(field(mapped, "required_experience_years")),
    }
}
