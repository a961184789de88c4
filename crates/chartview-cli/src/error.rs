//! CLI error types with exit code handling

use chartview_service::ServiceError;
use chartview_store::StoreError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI error type carrying its exit code
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Settings file or flags are unusable
    #[error("Configuration error: {message}")]
    #[diagnostic(code(chartview::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Seed input (repository list, API versions) was rejected
    #[error("Invalid input: {message}")]
    #[diagnostic(code(chartview::cli::input))]
    Input {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Store error: {0}")]
    #[diagnostic(
        code(chartview::cli::store),
        help("check that the store is reachable (see --store and --redis-url)")
    )]
    Store(#[from] StoreError),

    /// Seeding ran to completion with failures
    #[error("Seeding finished with {failures} failure(s)")]
    #[diagnostic(code(chartview::cli::seed))]
    Seed { failures: usize },

    #[error("Service error: {0}")]
    #[diagnostic(code(chartview::cli::service))]
    Service(ServiceError),

    #[error("IO error: {message}")]
    #[diagnostic(code(chartview::cli::io))]
    Io { message: String },

    #[error("Server error: {message}")]
    #[diagnostic(code(chartview::cli::server))]
    Server { message: String },

    #[error("Internal error: {message}")]
    #[diagnostic(code(chartview::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } => exit_codes::USAGE_ERROR,
            CliError::Input { .. } => exit_codes::INPUT_ERROR,
            CliError::Store(_) => exit_codes::STORE_ERROR,
            CliError::Seed { .. } => exit_codes::SEED_INCOMPLETE,
            CliError::Service(ServiceError::Store(_)) => exit_codes::STORE_ERROR,
            CliError::Service(_) => exit_codes::ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Server { .. } => exit_codes::ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    pub fn input_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<ServiceError> for CliError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput { message } => CliError::Input {
                message,
                help: Some(
                    "repository seeds are JSON arrays of {\"name\", \"url\"}; \
                     kube version seeds of {\"kubeVersion\", \"apiVersions\"}"
                        .to_string(),
                ),
            },
            ServiceError::Store(e) => CliError::Store(e),
            other => CliError::Service(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::config("bad").exit_code(), exit_codes::USAGE_ERROR);
        assert_eq!(CliError::Seed { failures: 3 }.exit_code(), exit_codes::SEED_INCOMPLETE);
        assert_eq!(CliError::server("bind").exit_code(), exit_codes::ERROR);
    }

    #[test]
    fn test_service_errors_are_classified() {
        let input: CliError = ServiceError::InvalidInput {
            message: "expected array".to_string(),
        }
        .into();
        assert!(matches!(input, CliError::Input { help: Some(_), .. }));
        assert_eq!(input.exit_code(), exit_codes::INPUT_ERROR);

        let store: CliError = ServiceError::Store(StoreError::Connection {
            message: "refused".to_string(),
        })
        .into();
        assert_eq!(store.exit_code(), exit_codes::STORE_ERROR);

        let missing: CliError = ServiceError::RepositoryNotFound {
            name: "stable".to_string(),
        }
        .into();
        assert_eq!(missing.exit_code(), exit_codes::ERROR);
    }
}
