use crate::workflows::scoring::GitHubAnalysis;

/// Produces code-hosting evidence for a profile URL.
pub trait GitHubAnalyzer: Send + Sync {
    fn analyze(&self, github_url: &str) -> Result<GitHubAnalysis, AnalyzerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("github analysis unavailable: {0}")]
    Unavailable(String),
}

/// Offline stand-in that derives stable scores from the URL alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicGitHubAnalyzer;

impl GitHubAnalyzer for HeuristicGitHubAnalyzer {
    fn analyze(&self, github_url: &str) -> Result<GitHubAnalysis, AnalyzerError> {
        let base = 60.0 + (github_url.chars().count() % 30) as f64;
        Ok(GitHubAnalysis {
            code_quality_score: base,
            documentation_score: (base + 5.0).min(100.0),
            engineering_practices_score: (base + 10.0).min(100.0),
            projects: Vec::new(),
        })
    }
}
