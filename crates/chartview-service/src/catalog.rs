//! Chart lists per repository

use std::sync::Arc;

use chartview_core::{CacheKey, Chart};
use chartview_repo::IndexClient;

use crate::cache::Cache;
use crate::error::{Result, ServiceError};
use crate::registry::Registry;

/// Cache of each repository's chart list, keyed by repository name
#[derive(Clone)]
pub struct Catalog {
    cache: Arc<Cache>,
    registry: Registry,
    client: IndexClient,
}

impl Catalog {
    pub fn new(cache: Arc<Cache>, registry: Registry, client: IndexClient) -> Self {
        Self {
            cache,
            registry,
            client,
        }
    }

    /// Charts published by a repository, ordered by name
    pub async fn list_charts(&self, repo: &str) -> Result<Vec<Chart>> {
        let key = CacheKey::chart_list(repo).to_string();

        self.cache
            .get_or_populate(&key, || async {
                let url = self.registry.resolve_url(repo).await?;
                tracing::info!(repo, url = %url, "fetching repository index");

                let index = self
                    .client
                    .fetch_index(&url)
                    .await
                    .map_err(|source| ServiceError::IndexFetch {
                        repo: repo.to_string(),
                        source,
                    })?;

                Ok(index.charts())
            })
            .await
    }
}
