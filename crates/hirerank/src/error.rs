use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::dashboard::DashboardError;
use crate::workflows::imports::ImportError;
use crate::workflows::scoring::{RepositoryError, ScoringError, WeightError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use tracing::warn;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Import(ImportError),
    Scoring(ScoringError),
    Repository(RepositoryError),
    Dashboard(DashboardError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Scoring(err) => write!(f, "scoring error: {}", err),
            AppError::Repository(err) => write!(f, "storage error: {}", err),
            AppError::Dashboard(err) => write!(f, "dashboard error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Scoring(err) => Some(err),
            AppError::Repository(err) => Some(err),
            AppError::Dashboard(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Import(ImportError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Import(ImportError::Repository(_))
            | AppError::Dashboard(DashboardError::Repository(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Import(_)
            | AppError::Dashboard(_)
            | AppError::Scoring(ScoringError::Configuration(_))
            | AppError::Repository(RepositoryError::InvalidConfiguration(_)) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Scoring(_)
            | AppError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            warn!(error = %self, "request failed");
        }

        // Clients get the underlying message without the category prefix.
        let message = std::error::Error::source(&self)
            .map(ToString::to_string)
            .unwrap_or_else(|| self.to_string());
        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ImportError> for AppError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<ScoringError> for AppError {
    fn from(value: ScoringError) -> Self {
        Self::Scoring(value)
    }
}

impl From<WeightError> for AppError {
    fn from(value: WeightError) -> Self {
        Self::Scoring(ScoringError::Configuration(value))
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        Self::Repository(value)
    }
}

impl From<DashboardError> for AppError {
    fn from(value: DashboardError) -> Self {
        Self::Dashboard(value)
    }
}
