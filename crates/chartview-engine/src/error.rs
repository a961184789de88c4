//! Engine error types

use chartview_repo::RepoError;
use thiserror::Error;

/// Main engine error type
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Chart not found: {chart} in {repo}")]
    ChartNotFound { chart: String, repo: String },

    #[error("Version not found: {chart}@{version} in {repo}")]
    VersionNotFound {
        chart: String,
        version: String,
        repo: String,
    },

    #[error("Repository error: {0}")]
    Repository(RepoError),

    #[error("helm binary not found: {binary}")]
    HelmNotFound { binary: String },

    #[error("Failed to render {chart}: {message}")]
    Render { chart: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Whether the chart or version could not be located
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::ChartNotFound { .. } | EngineError::VersionNotFound { .. }
        )
    }
}

impl From<RepoError> for EngineError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::ChartNotFound { name, repo } => EngineError::ChartNotFound { chart: name, repo },
            RepoError::VersionNotFound {
                name,
                version,
                repo,
            } => EngineError::VersionNotFound {
                chart: name,
                version,
                repo,
            },
            other => EngineError::Repository(other),
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_not_found_maps_to_chart_not_found() {
        let err: EngineError = RepoError::ChartNotFound {
            name: "app".to_string(),
            repo: "https://charts.example.com".to_string(),
        }
        .into();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Chart not found: app in https://charts.example.com");
    }

    #[test]
    fn test_other_repo_errors_are_wrapped() {
        let err: EngineError = RepoError::Timeout { seconds: 30 }.into();
        assert!(matches!(err, EngineError::Repository(_)));
        assert!(!err.is_not_found());
    }
}
