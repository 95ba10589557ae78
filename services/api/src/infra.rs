use hirerank::storage::FileStores;
use hirerank::workflows::dashboard::{
    ApplicationRepository, DashboardService, DashboardState, InMemoryApplicationRepository,
};
use hirerank::workflows::imports::{
    CandidateImportService, HeuristicGitHubAnalyzer, ImportRepository, InMemoryImportRepository,
};
use hirerank::workflows::scoring::{
    AnalysisStateStore, InMemoryAnalysisStateStore, InMemoryScoreResultRepository,
    InMemoryScoringConfigRepository, ScoreResultRepository, ScoringConfigRepository,
    ScoringCoordinator,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Repositories the services are built on.
pub(crate) struct Stores {
    pub(crate) states: Arc<dyn AnalysisStateStore>,
    pub(crate) configs: Arc<dyn ScoringConfigRepository>,
    pub(crate) scores: Arc<dyn ScoreResultRepository>,
    pub(crate) applications: Arc<dyn ApplicationRepository>,
    pub(crate) imports: Arc<dyn ImportRepository>,
}

impl Stores {
    pub(crate) fn file_backed(dir: &Path) -> Self {
        let stores = FileStores::open(dir);
        Self {
            states: stores.states,
            configs: stores.configs,
            scores: stores.scores,
            applications: stores.applications,
            imports: stores.imports,
        }
    }

    pub(crate) fn in_memory() -> Self {
        Self {
            states: Arc::new(InMemoryAnalysisStateStore::default()),
            configs: Arc::new(InMemoryScoringConfigRepository::default()),
            scores: Arc::new(InMemoryScoreResultRepository::default()),
            applications: Arc::new(InMemoryApplicationRepository::default()),
            imports: Arc::new(InMemoryImportRepository::default()),
        }
    }
}

/// Scoring, import and dashboard services sharing one set of stores.
#[derive(Clone)]
pub(crate) struct Services {
    pub(crate) states: Arc<dyn AnalysisStateStore>,
    pub(crate) configs: Arc<dyn ScoringConfigRepository>,
    pub(crate) applications: Arc<dyn ApplicationRepository>,
    pub(crate) coordinator: Arc<ScoringCoordinator>,
    pub(crate) imports: Arc<CandidateImportService>,
    pub(crate) dashboard: Arc<DashboardService>,
}

impl Services {
    pub(crate) fn new(stores: Stores) -> Self {
        let coordinator = Arc::new(ScoringCoordinator::new(
            stores.states.clone(),
            stores.configs.clone(),
            stores.scores.clone(),
        ));
        let imports = Arc::new(CandidateImportService::new(
            stores.imports,
            stores.applications.clone(),
            coordinator.clone(),
            Arc::new(HeuristicGitHubAnalyzer),
        ));
        let dashboard = Arc::new(DashboardService::new(
            stores.applications.clone(),
            stores.scores,
        ));

        Self {
            states: stores.states,
            configs: stores.configs,
            applications: stores.applications,
            coordinator,
            imports,
            dashboard,
        }
    }

    pub(crate) fn dashboard_state(&self) -> DashboardState {
        DashboardState {
            dashboard: self.dashboard.clone(),
            imports: self.imports.clone(),
            configs: self.configs.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_app_state(ready: bool) -> AppState {
    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    AppState {
        readiness: Arc::new(AtomicBool::new(ready)),
        metrics: Arc::new(recorder.handle()),
    }
}
