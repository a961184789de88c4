//! Registered repositories and the Kubernetes API-version catalog
//!
//! Both live in the store as single JSON documents written by the seed
//! command.

use std::sync::Arc;

use chartview_core::{CacheKey, KubeApiVersions, Repository};

use crate::cache::Cache;
use crate::error::{Result, ServiceError};

/// Access to the registered repository set
#[derive(Clone)]
pub struct Registry {
    cache: Arc<Cache>,
}

impl Registry {
    pub fn new(cache: Arc<Cache>) -> Self {
        Self { cache }
    }

    /// Every registered repository; empty when none were seeded
    pub async fn repositories(&self) -> Result<Vec<Repository>> {
        let key = CacheKey::Repositories.to_string();
        Ok(self.cache.read(&key).await?.unwrap_or_default())
    }

    /// Resolve a repository name to its URL
    pub async fn resolve_url(&self, name: &str) -> Result<String> {
        self.repositories()
            .await?
            .into_iter()
            .find(|r| r.name == name)
            .map(|r| r.url)
            .ok_or_else(|| ServiceError::RepositoryNotFound {
                name: name.to_string(),
            })
    }

    /// Store a repository seed document as given
    ///
    /// The payload must be a JSON array of `{name, url}`; it is written
    /// verbatim once it parses.
    pub async fn register_raw(&self, payload: &str) -> Result<Vec<Repository>> {
        let repos: Vec<Repository> =
            serde_json::from_str(payload).map_err(|e| ServiceError::InvalidInput {
                message: format!("repository seed: {}", e),
            })?;

        let key = CacheKey::Repositories.to_string();
        self.cache.store().set(&key, payload).await?;
        tracing::info!(count = repos.len(), "registered repositories");
        Ok(repos)
    }

    /// Append one repository
    pub async fn add(&self, repo: Repository) -> Result<()> {
        let mut repos = self.repositories().await?;
        if repos.iter().any(|r| r.name == repo.name) {
            return Err(ServiceError::RepositoryExists { name: repo.name });
        }

        tracing::info!(repo = %repo.name, url = %repo.url, "adding repository");
        repos.push(repo);
        self.cache
            .write(&CacheKey::Repositories.to_string(), &repos)
            .await
    }

    /// Store a Kubernetes API-version seed document as given
    pub async fn register_api_versions_raw(&self, payload: &str) -> Result<Vec<KubeApiVersions>> {
        let catalog: Vec<KubeApiVersions> =
            serde_json::from_str(payload).map_err(|e| ServiceError::InvalidInput {
                message: format!("kube version seed: {}", e),
            })?;

        let key = CacheKey::ApiVersions.to_string();
        self.cache.store().set(&key, payload).await?;
        tracing::info!(count = catalog.len(), "registered kubernetes versions");
        Ok(catalog)
    }

    /// The whole API-version catalog
    pub async fn api_versions(&self) -> Result<Vec<KubeApiVersions>> {
        let key = CacheKey::ApiVersions.to_string();
        Ok(self.cache.read(&key).await?.unwrap_or_default())
    }

    /// API versions served by one Kubernetes version; empty if unknown
    pub async fn supported_api_versions(&self, kube_version: &str) -> Result<Vec<String>> {
        Ok(self
            .api_versions()
            .await?
            .into_iter()
            .find(|k| k.kube_version == kube_version)
            .map(|k| k.api_versions)
            .unwrap_or_default())
    }
}
