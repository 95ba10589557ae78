//! Flat-file persistence under the configured storage directory.
//!
//! Each store owns one JSON document. Stores are safe to share across threads
//! within a process; separate processes writing the same directory are not
//! coordinated.

mod application_store;
mod config_store;
mod import_store;
mod json_file;
mod score_store;
mod state_store;

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use application_store::FileApplicationRepository;
pub use config_store::FileScoringConfigRepository;
pub use import_store::FileImportRepository;
pub use score_store::FileScoreResultRepository;
pub use state_store::FileAnalysisStateStore;

pub const SCORING_CONFIGS_FILE: &str = "scoring_configs.json";
pub const SCORES_FILE: &str = "scores.json";
pub const APPLICATIONS_FILE: &str = "applications.json";
pub const IMPORTS_FILE: &str = "candidate_imports.json";
pub const ANALYSIS_STATE_FILE: &str = "analysis_state.json";

/// Every file-backed store rooted at one directory.
#[derive(Debug, Clone)]
pub struct FileStores {
    pub dir: PathBuf,
    pub configs: Arc<FileScoringConfigRepository>,
    pub scores: Arc<FileScoreResultRepository>,
    pub applications: Arc<FileApplicationRepository>,
    pub imports: Arc<FileImportRepository>,
    pub states: Arc<FileAnalysisStateStore>,
}

impl FileStores {
    pub fn open(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        Self {
            configs: Arc::new(FileScoringConfigRepository::new(dir.join(SCORING_CONFIGS_FILE))),
            scores: Arc::new(FileScoreResultRepository::new(dir.join(SCORES_FILE))),
            applications: Arc::new(FileApplicationRepository::new(dir.join(APPLICATIONS_FILE))),
            imports: Arc::new(FileImportRepository::new(dir.join(IMPORTS_FILE))),
            states: Arc::new(FileAnalysisStateStore::new(dir.join(ANALYSIS_STATE_FILE))),
            dir,
        }
    }
}
