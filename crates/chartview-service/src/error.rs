//! Service error types

use chartview_core::{ChartCoordinate, CoreError};
use chartview_engine::EngineError;
use chartview_repo::RepoError;
use chartview_store::StoreError;
use thiserror::Error;

/// Errors surfaced by the catalog and render caches
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository not found: {name}")]
    RepositoryNotFound { name: String },

    #[error("Repository already exists: {name}")]
    RepositoryExists { name: String },

    #[error("Failed to fetch index of repository {repo}: {source}")]
    IndexFetch {
        repo: String,
        #[source]
        source: RepoError,
    },

    #[error("Chart not found: {chart}")]
    ChartNotFound {
        chart: String,
        #[source]
        source: EngineError,
    },

    #[error("Failed to render {chart}: {source}")]
    Render {
        chart: String,
        #[source]
        source: EngineError,
    },

    #[error("Failed to parse apiVersion in template {template}: {message}")]
    TemplateParse { template: String, message: String },

    #[error("Corrupted cache entry {key}: {source}")]
    CacheDecode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Background task failed: {message}")]
    Task { message: String },
}

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

impl ServiceError {
    /// Classify a renderer failure for one chart version
    pub(crate) fn from_engine(chart: &ChartCoordinate, err: EngineError) -> Self {
        if err.is_not_found() {
            ServiceError::ChartNotFound {
                chart: chart.to_string(),
                source: err,
            }
        } else {
            ServiceError::Render {
                chart: chart.to_string(),
                source: err,
            }
        }
    }

    /// Short machine-readable kind, used in logs and diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::RepositoryNotFound { .. } => "repository_not_found",
            ServiceError::RepositoryExists { .. } => "repository_exists",
            ServiceError::IndexFetch { .. } => "index_fetch",
            ServiceError::ChartNotFound { .. } => "chart_not_found",
            ServiceError::Render { .. } => "render",
            ServiceError::TemplateParse { .. } => "template_parse",
            ServiceError::CacheDecode { .. } => "cache_decode",
            ServiceError::InvalidInput { .. } => "invalid_input",
            ServiceError::Store(_) => "store",
            ServiceError::Serialization(_) => "serialization",
            ServiceError::Task { .. } => "task",
        }
    }
}

impl From<CoreError> for ServiceError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::TemplateParse { template, message } => {
                ServiceError::TemplateParse { template, message }
            }
            other => ServiceError::InvalidInput {
                message: other.to_string(),
            },
        }
    }
}
