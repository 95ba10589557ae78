use crate::cli::ServeArgs;
use crate::infra::{AppState, Services, Stores};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use hirerank::config::AppConfig;
use hirerank::error::AppError;
use hirerank::telemetry;
use hirerank::workflows::scoring::AnalysisStateStore;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const PURGE_INTERVAL: Duration = Duration::from_secs(15 * 60);

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    std::fs::create_dir_all(&config.storage.dir)?;
    let services = Services::new(Stores::file_backed(&config.storage.dir));
    spawn_state_purge(services.states.clone(), config.storage.state_ttl());

    let app = with_service_routes(services.dashboard_state())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        storage = %config.storage.dir.display(),
        "candidate scoring service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Periodically drop staged evidence that never became scoreable.
fn spawn_state_purge(states: Arc<dyn AnalysisStateStore>, ttl: chrono::Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            let cutoff = Utc::now() - ttl;
            let store = states.clone();
            match tokio::task::spawn_blocking(move || store.purge_stale(cutoff)).await {
                Ok(Ok(0)) => {}
                Ok(Ok(purged)) => info!(purged, %cutoff, "purged stale analysis state"),
                Ok(Err(err)) => warn!(error = %err, "analysis state purge failed"),
                Err(err) => warn!(error = %err, "analysis state purge task aborted"),
            }
        }
    });
}
