use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use super::domain::CandidateFilter;
use super::service::DashboardService;
use crate::error::AppError;
use crate::workflows::imports::{
    mapping_from_value, parse_csv_preview, parse_mapping, CandidateImportService, FieldMapping,
    ImportError, ImportId,
};
use crate::workflows::scoring::{
    CategoryWeights, JobId, OwnerId, ResumeSubWeights, ScoringConfig,
    ScoringConfigRepository,
};

pub const OWNER_HEADER: &str = "x-owner-id";

/// Services the dashboard routes read from and write to.
#[derive(Clone)]
pub struct DashboardState {
    pub dashboard: Arc<DashboardService>,
    pub imports: Arc<CandidateImportService>,
    pub configs: Arc<dyn ScoringConfigRepository>,
}

pub fn dashboard_router(state: DashboardState) -> Router {
    Router::new()
        .route(
            "/dashboard/jobs/:job_id/candidates",
            get(candidates_handler),
        )
        .route("/dashboard/jobs/:job_id/insights", get(insights_handler))
        .route(
            "/dashboard/jobs/:job_id/imports/preview",
            post(import_preview_handler),
        )
        .route("/dashboard/jobs/:job_id/imports", post(create_import_handler))
        .route(
            "/dashboard/jobs/:job_id/imports/:import_id",
            get(import_status_handler),
        )
        .route(
            "/dashboard/jobs/:job_id/scoring-config",
            get(get_config_handler).put(put_config_handler),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreviewRequest {
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) preview_rows: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImportRequest {
    pub(crate) csv: String,
    /// Either a JSON object or a string containing one.
    pub(crate) mapping: Value,
}

/// Scoring config as exchanged over HTTP, with category weights in percent.
#[derive(Debug, Deserialize)]
pub(crate) struct ScoringConfigPayload {
    #[serde(default)]
    pub(crate) category_weights: Option<CategoryWeights>,
    #[serde(default)]
    pub(crate) resume_subweights: Option<ResumeSubWeights>,
    #[serde(default)]
    pub(crate) github_required: bool,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (status, axum::Json(payload)).into_response()
}

fn owner_from_headers(headers: &HeaderMap) -> Result<OwnerId, Response> {
    headers
        .get(OWNER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(OwnerId::from)
        .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "X-Owner-Id header is required"))
}

fn filter_from_query(params: &[(String, String)]) -> Result<CandidateFilter, Response> {
    let mut filter = CandidateFilter::default();
    for (name, value) in params {
        match name.as_str() {
            "min_score" => {
                let parsed = value.trim().parse::<f64>().map_err(|_| {
                    error_response(StatusCode::BAD_REQUEST, format!("invalid min_score '{value}'"))
                })?;
                filter.min_score = Some(parsed);
            }
            "status" => filter.status = Some(value.clone()),
            "skill" => filter.skills.push(value.clone()),
            _ => {}
        }
    }
    Ok(filter)
}

fn config_view(config: &ScoringConfig) -> Response {
    match config.category_weights.as_percentages() {
        Ok(percentages) => {
            let payload = json!({
                "job_id": config.job_id,
                "category_weights": percentages,
                "resume_subweights": config.resume_subweights,
                "github_required": config.github_required,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn candidates_handler(
    State(state): State<DashboardState>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let owner_id = match owner_from_headers(&headers) {
        Ok(owner_id) => owner_id,
        Err(response) => return response,
    };
    let filter = match filter_from_query(&params) {
        Ok(filter) => filter,
        Err(response) => return response,
    };
    let job_id = JobId(job_id);

    match state
        .dashboard
        .list_candidates_for_job(&owner_id, &job_id, &filter)
    {
        Ok(candidates) => {
            let payload = json!({
                "job_id": job_id,
                "owner_id": owner_id,
                "candidates": candidates,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn insights_handler(
    State(state): State<DashboardState>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let owner_id = match owner_from_headers(&headers) {
        Ok(owner_id) => owner_id,
        Err(response) => return response,
    };
    let job_id = JobId(job_id);

    match state.dashboard.job_insights(&owner_id, &job_id) {
        Ok(insights) => {
            let payload = json!({
                "job_id": job_id,
                "owner_id": owner_id,
                "insights": insights,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn import_preview_handler(
    Path(job_id): Path<String>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<PreviewRequest>,
) -> Response {
    let owner_id = match owner_from_headers(&headers) {
        Ok(owner_id) => owner_id,
        Err(response) => return response,
    };

    match parse_csv_preview(&request.csv, request.preview_rows) {
        Ok(preview) => {
            let payload = json!({
                "job_id": job_id,
                "owner_id": owner_id,
                "headers": preview.headers,
                "rows": preview.rows,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn create_import_handler(
    State(state): State<DashboardState>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<ImportRequest>,
) -> Response {
    let owner_id = match owner_from_headers(&headers) {
        Ok(owner_id) => owner_id,
        Err(response) => return response,
    };

    let mapping: Result<FieldMapping, ImportError> = match &request.mapping {
        Value::String(payload) => parse_mapping(payload),
        other => mapping_from_value(other),
    };
    let pending = match mapping.and_then(|mapping| {
        state
            .imports
            .create(owner_id, JobId(job_id), &request.csv, &mapping)
    }) {
        Ok(pending) => pending,
        Err(error) => return AppError::from(error).into_response(),
    };

    let queued = pending.job.clone();
    let imports = Arc::clone(&state.imports);
    tokio::task::spawn_blocking(move || {
        if let Err(err) = imports.process(pending) {
            warn!(error = %err, "background import failed");
        }
    });

    (StatusCode::ACCEPTED, axum::Json(queued)).into_response()
}

pub(crate) async fn import_status_handler(
    State(state): State<DashboardState>,
    Path((job_id, import_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let owner_id = match owner_from_headers(&headers) {
        Ok(owner_id) => owner_id,
        Err(response) => return response,
    };

    match state
        .imports
        .get(&owner_id, &JobId(job_id), &ImportId(import_id))
    {
        Ok(job) => (StatusCode::OK, axum::Json(job)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn get_config_handler(
    State(state): State<DashboardState>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = owner_from_headers(&headers) {
        return response;
    }

    match state.configs.get(&JobId(job_id)) {
        Ok(config) => config_view(&config),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn put_config_handler(
    State(state): State<DashboardState>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
    axum::Json(payload): axum::Json<ScoringConfigPayload>,
) -> Response {
    if let Err(response) = owner_from_headers(&headers) {
        return response;
    }

    let config = ScoringConfig {
        job_id: JobId(job_id),
        category_weights: payload
            .category_weights
            .map(|weights| CategoryWeights::from_percentages(&weights))
            .unwrap_or_default(),
        resume_subweights: payload.resume_subweights.unwrap_or_default(),
        github_required: payload.github_required,
    };

    match state.configs.save(config) {
        Ok(saved) => config_view(&saved),
        Err(err) => AppError::from(err).into_response(),
    }
}
