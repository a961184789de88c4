//! CLI commands

pub mod seed;
pub mod serve;

use std::path::PathBuf;

use chartview_service::ChartService;

use crate::error::{CliError, Result};

/// Where the repository list and API-version catalog come from
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SeedInput {
    /// JSON file holding an array of {"name", "url"} repositories
    #[arg(long, value_name = "PATH")]
    pub repo_seed: Option<PathBuf>,

    /// Repository JSON used when --repo-seed is absent
    #[arg(long = "repos", env = "CHART_REPOS", hide_env_values = true, value_name = "JSON")]
    pub repos_json: Option<String>,

    /// JSON file holding an array of {"kubeVersion", "apiVersions"} entries
    #[arg(long, value_name = "PATH")]
    pub kube_version_seed: Option<PathBuf>,
}

impl SeedInput {
    /// Raw repository payload, if any was given
    pub fn repositories(&self) -> Result<Option<String>> {
        if let Some(path) = &self.repo_seed {
            tracing::info!(path = %path.display(), "populating repositories from file");
            return read_seed_file(path).map(Some);
        }
        if let Some(json) = self.repos_json.as_ref().filter(|j| !j.trim().is_empty()) {
            tracing::info!("populating repositories from CHART_REPOS");
            return Ok(Some(json.clone()));
        }
        Ok(None)
    }

    pub fn api_versions(&self) -> Result<Option<String>> {
        self.kube_version_seed
            .as_ref()
            .map(|path| {
                tracing::info!(path = %path.display(), "populating API versions from file");
                read_seed_file(path)
            })
            .transpose()
    }

    /// Store whatever was given; returns how many repositories were registered
    pub async fn apply(&self, service: &ChartService) -> Result<Option<usize>> {
        if let Some(payload) = self.api_versions()? {
            service.register_api_versions(&payload).await?;
        }

        match self.repositories()? {
            Some(payload) => Ok(Some(service.register_repositories(&payload).await?.len())),
            None => Ok(None),
        }
    }
}

fn read_seed_file(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        CliError::input_with_help(
            format!("cannot read {}: {}", path.display(), e),
            "seed files are JSON documents on the local filesystem",
        )
    })
}
