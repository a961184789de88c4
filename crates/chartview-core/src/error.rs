//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to parse apiVersion in template {template}: {message}")]
    TemplateParse { template: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid retrieval path: {path}")]
    InvalidRetrievalPath { path: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
